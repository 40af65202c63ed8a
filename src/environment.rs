//! Credential environment — process env snapshot plus `KEY=VALUE` files.
//!
//! The snapshot is taken once from the real process environment, then
//! config files are merged in additively: a key that already has a value
//! is never overwritten, so the real environment always wins over files
//! and earlier files win over later ones.
//!
//! Nothing here touches `std::env::set_var`. The probe phase receives the
//! finished `Environment` by reference and never mutates it.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zeroize::Zeroize;

/// Substring marking an unedited template value (e.g. `PASTE_YOUR_KEY_HERE`).
/// Any value containing it is treated as unset.
pub const PLACEHOLDER_MARKER: &str = "PASTE_YOUR";

/// Directory under `$HOME` holding the user-level dotfile.
const USER_CONFIG_DIR: &str = ".forgeclaw";
const ENV_FILE_NAME: &str = ".env";

/// Name → value mapping for every variable the checks may read.
#[derive(Default, Clone)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment. Non-UTF-8 entries are
    /// skipped; they cannot hold a usable credential anyway.
    pub fn from_process() -> Self {
        let mut env = Self::new();
        for (key, value) in std::env::vars_os() {
            if let (Ok(key), Ok(value)) = (key.into_string(), value.into_string()) {
                env.vars.insert(key, value);
            }
        }
        env
    }

    /// First-set-wins merge. Returns `true` if the value was stored.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.vars.contains_key(&key) {
            return false;
        }
        self.vars.insert(key, value.into());
        true
    }

    /// Merge a `KEY=VALUE` file. A file that does not exist contributes
    /// nothing and is not an error. Returns the number of new keys.
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Env file not found — skipping");
                return Ok(0);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read env file {}", path.display()));
            }
        };

        let mut added = 0;
        for (key, value) in parse_env_lines(&text) {
            if self.insert_if_absent(key, value) {
                added += 1;
            }
        }

        info!(path = %path.display(), added, "Loaded env file");
        Ok(added)
    }

    /// Raw value, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// The credential value, trimmed, if it is usable: non-empty and not
    /// a template placeholder.
    pub fn usable(&self, key: &str) -> Option<&str> {
        let value = self.get(key)?.trim();
        if value.is_empty() || value.contains(PLACEHOLDER_MARKER) {
            return None;
        }
        Some(value)
    }

    pub fn has_value(&self, key: &str) -> bool {
        self.usable(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (key, value) in iter {
            env.insert_if_absent(key, value);
        }
        env
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        for value in self.vars.values_mut() {
            value.zeroize();
        }
    }
}

// Values are secrets; only the key names are shown.
impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.vars.keys()).finish()
    }
}

/// Parse trivial `KEY=VALUE` lines.
///
/// Blank lines, `#` comments, and lines without `=` are skipped. The line
/// is split at the first `=`; both halves are trimmed. No quoting, escapes,
/// `export` prefixes, or interpolation.
pub fn parse_env_lines(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            let raw = line.trim();
            if raw.is_empty() || raw.starts_with('#') {
                return None;
            }
            let (key, value) = raw.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// The two fixed config locations, in merge order: the user-level dotfile
/// first, then the one in the current directory.
pub fn default_env_files() -> Vec<PathBuf> {
    let mut files = Vec::with_capacity(2);
    if let Some(home) = dirs::home_dir() {
        files.push(home.join(USER_CONFIG_DIR).join(ENV_FILE_NAME));
    }
    if let Ok(cwd) = std::env::current_dir() {
        files.push(cwd.join(ENV_FILE_NAME));
    }
    files
}
