//! # skill-mirror-cli
//!
//! Console front-ends for `skill-mirror`:
//!
//! - `sync-microsoft-skills` - clone upstream and mirror its skills locally
//! - `inspect-microsoft-repo` - print the upstream layout
//! - `skill-coverage` - check which upstream skills a sync would copy
//!
//! Every tool runs without arguments. `--source <DIR>` reads an existing
//! checkout instead of cloning; `--verbose` turns on debug logs.

pub mod cli;
pub mod output;
pub mod telemetry;

use anyhow::{Context, Result};
use skill_mirror::{GitFetcher, MirrorConfig, Snapshot};
use std::path::Path;
use std::process::ExitCode;

/// Clone the configured repository, or wrap a local checkout when one is given.
pub fn acquire_snapshot(config: &MirrorConfig, source: Option<&Path>) -> Result<Snapshot> {
    match source {
        Some(path) => {
            output::location(path);
            Snapshot::local(path).context("cannot read local checkout")
        }
        None => Snapshot::fetch(&GitFetcher::from_config(config))
            .with_context(|| format!("failed to fetch {}", config.repository)),
    }
}

/// Load `.env`, run `body`, and turn any error into a printed report and exit status 1.
pub fn run_tool(verbose: bool, body: impl FnOnce() -> Result<()>) -> ExitCode {
    let _ = dotenvy::dotenv();
    telemetry::init_logging(verbose);

    match body() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::failure(&err);
            ExitCode::from(1)
        }
    }
}
