//! `mast check` command implementation.

use clap::Args;
use mast_config::Config;
use mast_site::{ContentTree, check_links};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Treat unresolved navigation and sidebar links as errors.
    #[arg(long)]
    strict: bool,

    /// Skip content link checks.
    #[arg(long, conflicts_with = "strict")]
    no_links: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is invalid, or if links don't
    /// resolve and `--strict` is set.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.site.config.as_deref(), Some(&self.site.settings()))?;
        output.info(&format!("Checking {}", config.config_path.display()));

        let model = config.resolve()?;

        let problems = if self.no_links {
            Vec::new()
        } else {
            let tree = ContentTree::scan(&config.source_dir);
            output.info(&format!(
                "Content directory: {} ({} pages)",
                config.source_dir.display(),
                tree.len()
            ));
            check_links(&model, &tree)
        };

        output.problems(&problems);
        if self.strict && !problems.is_empty() {
            return Err(CliError::Validation(format!(
                "{} unresolved link(s)",
                problems.len()
            )));
        }

        output.success(&format!(
            "Site configuration OK: {} nav entries, {} sidebar groups, {} head tags",
            model.nav().len(),
            model.sidebar().len(),
            model.head().len()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use mast_config::ConfigError;
    use pretty_assertions::assert_eq;

    use super::*;

    const SITE: &str = r#"
base = "/"
title = "T"

[theme]
nav = [{ text = "About", link = "/about/" }]
"#;

    fn args(config: &Path, strict: bool) -> CheckArgs {
        CheckArgs {
            site: SiteArgs {
                config: Some(config.to_path_buf()),
                source_dir: None,
                base: None,
                dest: None,
                verbose: false,
            },
            strict,
            no_links: false,
        }
    }

    #[test]
    fn test_check_passes_with_existing_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mast.toml");
        fs::write(&path, SITE).unwrap();
        fs::create_dir(dir.path().join("about")).unwrap();
        fs::write(dir.path().join("about/README.md"), "# About\n").unwrap();

        args(&path, true).execute().unwrap();
    }

    #[test]
    fn test_check_strict_fails_on_missing_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mast.toml");
        fs::write(&path, SITE).unwrap();

        let err = args(&path, true).execute().unwrap_err();
        assert!(matches!(err, CliError::Validation(_)), "got {err:?}");

        // Without --strict missing pages are only warnings
        args(&path, false).execute().unwrap();
    }

    #[test]
    fn test_check_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mast.toml");
        fs::write(&path, "base = \"\"").unwrap();

        let err = args(&path, false).execute().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("base: must be non-empty and start with /"), "got: {msg}");
        assert!(msg.contains("title: is required"), "got: {msg}");
    }

    #[test]
    fn test_check_collects_shape_problems() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mast.toml");
        fs::write(
            &path,
            r#"
base = "/"
title = "T"
head = ["meta"]

[[theme.sidebar]]
title = "G"
children = ["a.md"]
"#,
        )
        .unwrap();

        let err = args(&path, false).execute().unwrap_err();
        let CliError::Config(ConfigError::Invalid(invalid)) = err else {
            panic!("expected validation error, got {err:?}");
        };
        let paths: Vec<_> = invalid.violations.iter().map(|v| v.field_path.as_str()).collect();
        assert_eq!(paths, vec!["theme.sidebar[0].children[0]", "head[0]"]);
    }
}
