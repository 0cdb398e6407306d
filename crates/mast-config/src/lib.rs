//! Site configuration for mast.
//!
//! Parses a `mast.toml` site document (or a `.json` equivalent), validates
//! it and resolves it into an immutable [`SiteModel`]: site metadata, head
//! tags, navigation, sidebar groups, repository link and markdown extension
//! requests for the rendering engine.
//!
//! Validation never stops at the first problem. [`resolve`] returns every
//! violation with the field path it applies to, so a broken document can be
//! fixed in one pass.
//!
//! ## Environment Variable Expansion
//!
//! String values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `base`
//! - `title`
//! - `description`
//! - `dest`
//! - `theme.repo`

mod expand;
mod model;
mod raw;
mod resolve;

use std::path::{Path, PathBuf};

pub use model::{
    HeadTag, MarkdownExtension, NavEntry, RepoLink, SidebarChild, SidebarContent, SidebarGroup,
    SiteMetadata, SiteModel, is_external,
};
pub use raw::{RawConfig, RawDocs, RawMarkdown, RawNavEntry, RawSidebarGroup, RawTheme};
pub use resolve::{ConfigResolver, ConfigValidationError, Violation, resolve};

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "mast.toml";

/// CLI settings that override site document values.
///
/// All fields are optional. Only non-None values override the loaded document.
#[derive(Debug, Clone, Default)]
pub struct CliSettings {
    /// Override site base path.
    pub base: Option<String>,
    /// Override output directory.
    pub dest: Option<PathBuf>,
    /// Override content directory used for link checks.
    pub source_dir: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Document field path (e.g., "`theme.repo`").
        field: String,
        /// Error message (e.g., "${`REPO_OWNER`} not set").
        message: String,
    },
    /// Document failed validation.
    #[error("{0}")]
    Invalid(#[from] ConfigValidationError),
}

/// A loaded site document with its filesystem context.
///
/// Loading parses and expands the document and applies CLI settings; it
/// does not validate. Call [`Config::resolve`] to obtain the [`SiteModel`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed document after expansion and CLI overrides.
    pub document: RawConfig,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Content directory (absolute or relative to the working directory).
    pub source_dir: PathBuf,
    /// Output directory resolved against the config file's directory.
    pub dest_dir: PathBuf,
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mast.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if no config file is found, or reading, parsing or
    /// expansion fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => Self::discover_config().ok_or_else(|| {
                let cwd = std::env::current_dir().unwrap_or_default();
                ConfigError::NotFound(cwd.join(CONFIG_FILENAME))
            })?,
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_source(&content, &path)?;

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        tracing::debug!(path = %config.config_path.display(), "Site document loaded");
        Ok(config)
    }

    /// Build a config from document text as if read from `path`.
    ///
    /// The format is chosen by extension: `.json` is parsed as JSON,
    /// anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or expansion fails.
    pub fn from_source(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut document: RawConfig = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(content)?
        } else {
            toml::from_str(content)?
        };

        Self::expand_env_vars(&mut document)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        Ok(Self {
            source_dir: resolve(document.docs.source_dir.as_deref(), ""),
            dest_dir: resolve(document.dest.as_deref(), "dist"),
            document,
            config_path: path.to_path_buf(),
        })
    }

    /// Validate the document and produce the site model.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` with every violation found.
    pub fn resolve(&self) -> Result<SiteModel, ConfigError> {
        Ok(resolve(&self.document)?)
    }

    /// Resolver seeded with this document, for registering extensions.
    #[must_use]
    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::new(self.document.clone())
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base) = &settings.base {
            self.document.base = Some(base.clone());
        }
        if let Some(dest) = &settings.dest {
            self.document.dest = Some(dest.to_string_lossy().into_owned());
            self.dest_dir.clone_from(dest);
        }
        if let Some(source_dir) = &settings.source_dir {
            self.source_dir.clone_from(source_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Expand environment variable references in document strings.
    fn expand_env_vars(document: &mut RawConfig) -> Result<(), ConfigError> {
        expand::expand_field(&mut document.base, "base")?;
        expand::expand_field(&mut document.title, "title")?;
        expand::expand_field(&mut document.description, "description")?;
        expand::expand_field(&mut document.dest, "dest")?;
        expand::expand_field(&mut document.theme.repo, "theme.repo")?;
        Ok(())
    }
}
