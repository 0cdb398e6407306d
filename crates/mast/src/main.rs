//! mast CLI - Site configuration checker.
//!
//! Provides commands for:
//! - `check`: Validate the site document and its navigation links
//! - `show`: Print the resolved site model
//! - `watch`: Re-resolve the site document on every change

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, ShowArgs, WatchArgs};
use output::Output;

/// mast - Static-site configuration resolver.
#[derive(Parser)]
#[command(name = "mast", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the site document.
    Check(CheckArgs),
    /// Print the resolved site model.
    Show(ShowArgs),
    /// Watch the site document and re-resolve on change.
    Watch(WatchArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Check(args) => args.site.verbose,
            Self::Show(args) => args.site.verbose,
            Self::Watch(args) => args.site.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Show(args) => args.execute(),
        Commands::Watch(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute())
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_flags() {
        let cli = Cli::try_parse_from([
            "mast", "check", "--config", "site/mast.toml", "--strict", "-v",
        ])
        .unwrap();

        assert!(cli.command.verbose());
        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(
            args.site.config.as_deref(),
            Some(std::path::Path::new("site/mast.toml"))
        );
    }

    #[test]
    fn test_strict_conflicts_with_no_links() {
        let result = Cli::try_parse_from(["mast", "check", "--strict", "--no-links"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_show_json() {
        let cli = Cli::try_parse_from(["mast", "show", "--json", "--base", "/docs/"]).unwrap();
        let Commands::Show(args) = cli.command else {
            panic!("expected show command");
        };
        assert_eq!(args.site.settings().base.as_deref(), Some("/docs/"));
    }
}
