//! Check runner — presence filter, then one probe per usable credential.
//!
//! Every check is isolated: whatever happens to one provider ends up in
//! its own `CheckResult` and never stops the others.

use futures::future::join_all;
use tracing::{info, warn};

use crate::environment::Environment;
use crate::probe::{ProbeError, Prober};
use crate::providers::ProviderSpec;

/// What happened to one credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No usable value configured; no request was sent.
    Missing,
    /// The provider answered with this status.
    Responded(u16),
    /// The request produced no status.
    Failed(ProbeError),
}

/// Result of one credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub ok: bool,
    pub outcome: Outcome,
}

impl CheckResult {
    pub fn missing(name: &str) -> Self {
        Self { name: name.to_string(), ok: false, outcome: Outcome::Missing }
    }

    /// `missing`, the decimal status, or an `error:<kind>` tag.
    pub fn detail(&self) -> String {
        match &self.outcome {
            Outcome::Missing => "missing".to_string(),
            Outcome::Responded(status) => status.to_string(),
            Outcome::Failed(err) => err.tag().to_string(),
        }
    }
}

/// How probes are scheduled. Report order is registration order either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Sequential,
    Parallel,
}

/// Run a single check.
pub async fn run_check(spec: &ProviderSpec, env: &Environment, prober: &dyn Prober) -> CheckResult {
    let Some(secret) = env.usable(spec.name) else {
        info!(provider = spec.name, "No usable credential — skipping probe");
        return CheckResult::missing(spec.name);
    };

    let outcome = match prober.probe(spec, secret, env).await {
        Ok(status) => Outcome::Responded(status),
        Err(e) => {
            warn!(provider = spec.name, error = %e, "Probe failed");
            Outcome::Failed(e)
        }
    };

    let ok = outcome == Outcome::Responded(spec.expected_status);
    if let Outcome::Responded(status) = &outcome {
        let status = *status;
        if ok {
            info!(provider = spec.name, status, "Credential accepted");
        } else {
            warn!(provider = spec.name, status, "Credential rejected");
        }
    }

    CheckResult { name: spec.name.to_string(), ok, outcome }
}

/// Run every check in `specs`, returning results in the same order.
pub async fn run_checks(
    specs: &[ProviderSpec],
    env: &Environment,
    prober: &dyn Prober,
    mode: RunMode,
) -> Vec<CheckResult> {
    match mode {
        RunMode::Sequential => {
            let mut results = Vec::with_capacity(specs.len());
            for spec in specs {
                results.push(run_check(spec, env, prober).await);
            }
            results
        }
        // join_all yields outputs in input order, not completion order.
        RunMode::Parallel => join_all(specs.iter().map(|spec| run_check(spec, env, prober))).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::PROVIDERS;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted prober: answers per provider name and records every call.
    #[derive(Default)]
    struct ScriptedProber {
        answers: HashMap<&'static str, Result<u16, ProbeError>>,
        delays: HashMap<&'static str, Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProber {
        fn answer(mut self, name: &'static str, answer: Result<u16, ProbeError>) -> Self {
            self.answers.insert(name, answer);
            self
        }

        fn delay(mut self, name: &'static str, delay: Duration) -> Self {
            self.delays.insert(name, delay);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(
            &self,
            spec: &ProviderSpec,
            _secret: &str,
            _env: &Environment,
        ) -> Result<u16, ProbeError> {
            if let Some(delay) = self.delays.get(spec.name) {
                tokio::time::sleep(*delay).await;
            }
            self.calls.lock().unwrap().push(spec.name.to_string());
            self.answers.get(spec.name).cloned().unwrap_or(Ok(200))
        }
    }

    fn spec(name: &'static str) -> ProviderSpec {
        ProviderSpec::bearer(name, "https://api.example.com/v1/models")
    }

    #[tokio::test]
    async fn test_missing_credential_never_probes() {
        let prober = ScriptedProber::default();
        let env = Environment::new();
        let result = run_check(&spec("A_KEY"), &env, &prober).await;

        assert!(!result.ok);
        assert_eq!(result.detail(), "missing");
        assert!(prober.calls().is_empty());
    }

    #[tokio::test]
    async fn test_placeholder_counts_as_missing() {
        let prober = ScriptedProber::default();
        let env: Environment = [("A_KEY", "PASTE_YOUR_KEY_HERE")].into_iter().collect();
        let result = run_check(&spec("A_KEY"), &env, &prober).await;

        assert_eq!(result.outcome, Outcome::Missing);
        assert!(prober.calls().is_empty());
    }

    #[tokio::test]
    async fn test_status_200_is_ok() {
        let prober = ScriptedProber::default().answer("A_KEY", Ok(200));
        let env: Environment = [("A_KEY", "secret")].into_iter().collect();
        let result = run_check(&spec("A_KEY"), &env, &prober).await;

        assert!(result.ok);
        assert_eq!(result.detail(), "200");
    }

    #[tokio::test]
    async fn test_status_401_fails_with_code() {
        let prober = ScriptedProber::default().answer("A_KEY", Ok(401));
        let env: Environment = [("A_KEY", "secret")].into_iter().collect();
        let result = run_check(&spec("A_KEY"), &env, &prober).await;

        assert!(!result.ok);
        assert_eq!(result.detail(), "401");
    }

    #[tokio::test]
    async fn test_other_2xx_is_not_ok() {
        let prober = ScriptedProber::default().answer("A_KEY", Ok(204));
        let env: Environment = [("A_KEY", "secret")].into_iter().collect();
        let result = run_check(&spec("A_KEY"), &env, &prober).await;

        assert!(!result.ok);
        assert_eq!(result.detail(), "204");
    }

    #[tokio::test]
    async fn test_transport_error_does_not_stop_run() {
        let prober = ScriptedProber::default()
            .answer("A_KEY", Err(ProbeError::Connect))
            .answer("B_KEY", Err(ProbeError::Timeout))
            .answer("C_KEY", Ok(200));
        let env: Environment =
            [("A_KEY", "a"), ("B_KEY", "b"), ("C_KEY", "c")].into_iter().collect();
        let specs = [spec("A_KEY"), spec("B_KEY"), spec("C_KEY")];

        let results = run_checks(&specs, &env, &prober, RunMode::Sequential).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].detail(), "error:connect");
        assert_eq!(results[1].detail(), "error:timeout");
        assert!(results[2].ok);
        assert_eq!(prober.calls(), vec!["A_KEY", "B_KEY", "C_KEY"]);
    }

    #[tokio::test]
    async fn test_parallel_keeps_registration_order() {
        let prober = ScriptedProber::default()
            .delay("A_KEY", Duration::from_millis(60))
            .delay("B_KEY", Duration::from_millis(30))
            .answer("B_KEY", Ok(403));
        let env: Environment =
            [("A_KEY", "a"), ("B_KEY", "b"), ("C_KEY", "c")].into_iter().collect();
        let specs = [spec("A_KEY"), spec("B_KEY"), spec("C_KEY")];

        let results = run_checks(&specs, &env, &prober, RunMode::Parallel).await;

        let names: Vec<_> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A_KEY", "B_KEY", "C_KEY"]);
        assert_eq!(results[1].detail(), "403");
        // Completion order differs from report order.
        assert_eq!(prober.calls(), vec!["C_KEY", "B_KEY", "A_KEY"]);
    }

    #[tokio::test]
    async fn test_empty_environment_reports_all_missing() {
        let prober = ScriptedProber::default();
        let results =
            run_checks(PROVIDERS, &Environment::new(), &prober, RunMode::Sequential).await;

        assert_eq!(results.len(), PROVIDERS.len());
        assert!(results.iter().all(|r| !r.ok && r.outcome == Outcome::Missing));
        assert!(prober.calls().is_empty());
    }
}
