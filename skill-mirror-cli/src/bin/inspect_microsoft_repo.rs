//! Print the directory layout of the Microsoft skills repository.

use anyhow::Result;
use clap::Parser;
use skill_mirror::report::inspect_snapshot;
use skill_mirror_cli::cli::InspectCli;
use skill_mirror_cli::{acquire_snapshot, output, run_tool};
use std::process::ExitCode;

fn run(cli: &InspectCli) -> Result<()> {
    let config = cli.source.load_config()?;

    output::banner("🔍 Inspecting Microsoft Skills Repository Structure", 60);
    if cli.source.source.is_none() {
        output::step("1️⃣", "Cloning repository...");
    }
    let snapshot = acquire_snapshot(&config, cli.source.source.as_deref())?;

    let report = inspect_snapshot(&config, snapshot.path())?;
    output::inspection(&report);
    Ok(())
}

fn main() -> ExitCode {
    let cli = InspectCli::parse();
    run_tool(cli.source.verbose, || run(&cli))
}
