//! keyprobe — one read-only request per configured credential.
//!
//! Loads credentials from the process environment, `~/.forgeclaw/.env`,
//! and `./.env` (first value wins), probes each provider once, and prints
//! `VALID <ok>/<total>` followed by one line per credential. The run
//! always completes; failures only show up in the report.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use keyprobe::environment::{self, Environment};
use keyprobe::probe::DEFAULT_TIMEOUT;
use keyprobe::providers::{self, ProviderSpec};
use keyprobe::{run_checks, HttpProber, Report, RunMode};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Extra KEY=VALUE file, merged after the default locations.
    #[arg(long = "env-file", value_name = "PATH")]
    env_files: Vec<PathBuf>,

    /// Skip ~/.forgeclaw/.env and ./.env.
    #[arg(long)]
    no_default_env_files: bool,

    /// Per-request timeout in seconds (at least 1).
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Probe all providers concurrently. Report order is unchanged.
    #[arg(long)]
    parallel: bool,

    /// Only check these credentials (repeatable).
    #[arg(long = "only", value_name = "NAME", value_parser = parse_provider)]
    only: Vec<&'static ProviderSpec>,
}

fn parse_provider(name: &str) -> std::result::Result<&'static ProviderSpec, String> {
    providers::get_provider(name).ok_or_else(|| {
        let known: Vec<_> = providers::PROVIDERS.iter().map(|p| p.name).collect();
        format!("unknown credential '{}' (known: {})", name, known.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keyprobe=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    info!("🔑 keyprobe v{}", env!("CARGO_PKG_VERSION"));

    // ── Environment ─────────────────────────────────────────────────
    let mut env = Environment::from_process();
    let mut files = if args.no_default_env_files {
        Vec::new()
    } else {
        environment::default_env_files()
    };
    files.extend(args.env_files.iter().cloned());

    for path in &files {
        if let Err(e) = env.load_file(path) {
            warn!("{:#} — continuing without it", e);
        }
    }

    // ── Checks ──────────────────────────────────────────────────────
    let specs: Vec<ProviderSpec> = if args.only.is_empty() {
        providers::PROVIDERS.to_vec()
    } else {
        providers::PROVIDERS
            .iter()
            .filter(|p| args.only.iter().any(|o| o.name == p.name))
            .copied()
            .collect()
    };

    let mode = if args.parallel { RunMode::Parallel } else { RunMode::Sequential };
    let prober = HttpProber::new(Duration::from_secs(args.timeout_secs))?;

    info!(checks = specs.len(), mode = ?mode, "Probing credentials");
    let results = run_checks(&specs, &env, &prober, mode).await;

    let report = Report::new(&results);
    info!(passed = report.passed(), total = report.total(), "Probe run complete");
    print!("{}", report);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Args::try_parse_from(["keyprobe", "--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn test_timeout_defaults_and_accepts_positive() {
        let args = Args::try_parse_from(["keyprobe"]).unwrap();
        assert_eq!(args.timeout_secs, DEFAULT_TIMEOUT.as_secs());
        let args = Args::try_parse_from(["keyprobe", "--timeout-secs", "3"]).unwrap();
        assert_eq!(args.timeout_secs, 3);
    }

    #[test]
    fn test_only_rejects_unknown_credential() {
        assert!(Args::try_parse_from(["keyprobe", "--only", "NOT_A_KEY"]).is_err());
        let args = Args::try_parse_from(["keyprobe", "--only", "VERCEL_TOKEN"]).unwrap();
        assert_eq!(args.only[0].name, "VERCEL_TOKEN");
    }
}
