use anyhow::Result;
use clap::{Args, Parser};
use skill_mirror::MirrorConfig;
use std::path::PathBuf;

/// Options shared by every tool: where the upstream tree comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Repository to clone (overrides SKILL_MIRROR_REPOSITORY)
    #[arg(long, value_name = "URL")]
    pub repository: Option<String>,

    /// Read an existing checkout instead of cloning
    #[arg(long, value_name = "DIR", conflicts_with = "repository")]
    pub source: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Environment first, then command-line overrides.
    pub fn load_config(&self) -> Result<MirrorConfig> {
        let mut config = MirrorConfig::from_env()?;
        if let Some(ref repository) = self.repository {
            config.repository = repository.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Mirror Microsoft skills into the local skills tree
#[derive(Parser, Debug)]
#[command(name = "sync-microsoft-skills", version, about, long_about = None)]
pub struct SyncCli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Local skills directory (overrides SKILL_MIRROR_TARGET_DIR)
    #[arg(long, value_name = "DIR")]
    pub target_dir: Option<PathBuf>,
}

impl SyncCli {
    pub fn config(&self) -> Result<MirrorConfig> {
        let mut config = self.source.load_config()?;
        if let Some(ref target) = self.target_dir {
            config.target_dir = target.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Print the layout of the upstream skills repository
#[derive(Parser, Debug)]
#[command(name = "inspect-microsoft-repo", version, about, long_about = None)]
pub struct InspectCli {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Check which upstream skills the sync would pick up
#[derive(Parser, Debug)]
#[command(name = "skill-coverage", version, about, long_about = None)]
pub struct CoverageCli {
    #[command(flatten)]
    pub source: SourceArgs,
}
