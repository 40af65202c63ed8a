//! keyprobe — verify that configured third-party API credentials are live.
//!
//! Flow: build an [`environment::Environment`] from the process env and
//! `KEY=VALUE` files, run every [`providers::ProviderSpec`] through
//! [`check::run_checks`], then print a [`report::Report`].

pub mod check;
pub mod environment;
pub mod probe;
pub mod providers;
pub mod redact;
pub mod report;

pub use check::{run_check, run_checks, CheckResult, Outcome, RunMode};
pub use environment::Environment;
pub use probe::{HttpProber, ProbeError, Prober};
pub use providers::{ProviderSpec, PROVIDERS};
pub use report::Report;
