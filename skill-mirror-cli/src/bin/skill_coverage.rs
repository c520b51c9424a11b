//! Verify that the sync covers every SKILL.md in the upstream repository.

use anyhow::Result;
use clap::Parser;
use skill_mirror::report::{analyze_coverage, unlinked_structure_skills};
use skill_mirror_cli::cli::CoverageCli;
use skill_mirror_cli::{acquire_snapshot, output, run_tool};
use std::process::ExitCode;

fn run(cli: &CoverageCli) -> Result<()> {
    let config = cli.source.load_config()?;

    output::banner("🔬 Comprehensive Skill Location Analysis", 60);
    if cli.source.source.is_none() {
        output::step("1️⃣", "Cloning repository...");
    }
    let snapshot = acquire_snapshot(&config, cli.source.source.as_deref())?;

    let summary = analyze_coverage(&config, snapshot.path());
    let unlinked = config
        .structure_root(snapshot.path())
        .is_dir()
        .then(|| unlinked_structure_skills(&config, snapshot.path()));

    output::coverage(&summary, unlinked.as_deref());
    output::verdict(&summary);
    Ok(())
}

fn main() -> ExitCode {
    let cli = CoverageCli::parse();
    run_tool(cli.source.verbose, || run(&cli))
}
