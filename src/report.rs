//! Human-readable summary of a run.
//!
//! ```text
//! VALID 2/14
//! ANTHROPIC_API_KEY: OK (200)
//! OPENAI_API_KEY: FAIL (401)
//! ...
//! ```

use std::fmt;

use crate::check::CheckResult;

pub struct Report<'a> {
    results: &'a [CheckResult],
}

impl<'a> Report<'a> {
    pub fn new(results: &'a [CheckResult]) -> Self {
        Self { results }
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.ok).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VALID {}/{}", self.passed(), self.total())?;
        for result in self.results {
            let verdict = if result.ok { "OK" } else { "FAIL" };
            writeln!(f, "{}: {} ({})", result.name, verdict, result.detail())?;
        }
        Ok(())
    }
}
