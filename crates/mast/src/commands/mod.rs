//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod show;
pub(crate) mod watch;

use std::path::PathBuf;

use clap::Args;
use mast_config::CliSettings;

pub(crate) use check::CheckArgs;
pub(crate) use show::ShowArgs;
pub(crate) use watch::WatchArgs;

/// Arguments shared by every command that loads the site document.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to site document (default: auto-discover mast.toml).
    #[arg(short, long, env = "MAST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Content directory for link checks (overrides config).
    #[arg(short, long)]
    pub source_dir: Option<PathBuf>,

    /// Site base path (overrides config).
    #[arg(long)]
    pub base: Option<String>,

    /// Output directory (overrides config).
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteArgs {
    /// Build CLI settings from args.
    pub(crate) fn settings(&self) -> CliSettings {
        CliSettings {
            base: self.base.clone(),
            dest: self.dest.clone(),
            source_dir: self.source_dir.clone(),
        }
    }
}
