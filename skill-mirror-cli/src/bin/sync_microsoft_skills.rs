//! Mirror the Microsoft skills repository into `./skills/official/microsoft`.
//!
//! ```bash
//! sync-microsoft-skills
//! sync-microsoft-skills --source ~/src/skills --target-dir /tmp/skills
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use skill_mirror::SkillSynchronizer;
use skill_mirror_cli::cli::SyncCli;
use skill_mirror_cli::{acquire_snapshot, output, run_tool};
use std::process::ExitCode;

fn run(cli: &SyncCli) -> Result<()> {
    let config = cli.config()?;

    output::banner("🚀 Microsoft Skills Sync", 50);
    if cli.source.source.is_none() {
        output::step("🔄", "Cloning Microsoft Skills repository...");
    }
    let snapshot = acquire_snapshot(&config, cli.source.source.as_deref())?;

    output::step("🔗", "Resolving symlinks and preserving directory structure...");
    let report = SkillSynchronizer::new(&config)
        .sync_snapshot(snapshot.path())
        .with_context(|| format!("sync into {} failed", config.output_root().display()))?;

    output::sync_report(&report);
    Ok(())
}

fn main() -> ExitCode {
    let cli = SyncCli::parse();
    run_tool(cli.source.verbose, || run(&cli))
}
