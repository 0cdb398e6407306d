//! Process-wide site snapshot with swap-on-reload.
//!
//! # Thread Safety
//!
//! `SiteHandle` is designed for concurrent access:
//! - `get()` returns `Arc<SiteSnapshot>` with minimal locking (just Arc clone)
//! - `reload()` serializes reloads and swaps the snapshot pointer only after
//!   a new model resolved successfully
//!
//! Readers holding an older `Arc<SiteSnapshot>` keep a consistent view; a
//! snapshot is never modified after it is published.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use mast_config::{CliSettings, Config, MarkdownExtension, SiteModel};

use crate::SiteError;

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Loaded document and the model resolved from it.
#[derive(Debug)]
pub struct SiteSnapshot {
    pub config: Config,
    pub model: SiteModel,
}

/// Result of [`SiteHandle::reload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A new snapshot was published.
    Updated,
    /// The document resolved to the same model; nothing was swapped.
    Unchanged,
}

/// Shared, swappable site snapshot.
pub struct SiteHandle {
    config_path: PathBuf,
    settings: CliSettings,
    extensions: Vec<MarkdownExtension>,
    /// Mutex for serializing reload operations.
    reload_lock: Mutex<()>,
    /// Current snapshot (atomically swappable).
    current: RwLock<Arc<SiteSnapshot>>,
}

impl SiteHandle {
    /// Load and resolve the site document.
    ///
    /// `config_path` of `None` discovers `mast.toml` from the working
    /// directory upwards. The discovered path is reused by later reloads.
    ///
    /// # Errors
    ///
    /// Returns error if the document can't be loaded or is invalid.
    pub fn open(config_path: Option<&Path>, settings: CliSettings) -> Result<Self, SiteError> {
        Self::with_extensions(config_path, settings, Vec::new())
    }

    /// Like [`open`](Self::open), registering markdown extensions on every
    /// resolution.
    ///
    /// # Errors
    ///
    /// Returns error if the document can't be loaded or is invalid.
    pub fn with_extensions(
        config_path: Option<&Path>,
        settings: CliSettings,
        extensions: Vec<MarkdownExtension>,
    ) -> Result<Self, SiteError> {
        let config = Config::load(config_path, Some(&settings))?;
        let snapshot = Self::resolve(config, &extensions)?;

        tracing::info!(
            path = %snapshot.config.config_path.display(),
            nav = snapshot.model.nav().len(),
            groups = snapshot.model.sidebar().len(),
            "Site configuration resolved"
        );

        Ok(Self {
            config_path: snapshot.config.config_path.clone(),
            settings,
            extensions,
            reload_lock: Mutex::new(()),
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Get current snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn get(&self) -> Arc<SiteSnapshot> {
        self.current.read().unwrap().clone()
    }

    /// Path of the site document backing this handle.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Re-read the site document and publish a new snapshot.
    ///
    /// On any error the current snapshot stays in place.
    ///
    /// # Errors
    ///
    /// Returns error if the document can't be loaded or is invalid.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn reload(&self) -> Result<ReloadOutcome, SiteError> {
        let start = Instant::now();
        let _guard = self.reload_lock.lock().unwrap();

        let snapshot = Config::load(Some(&self.config_path), Some(&self.settings))
            .map_err(SiteError::from)
            .and_then(|config| Self::resolve(config, &self.extensions));

        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Site reload failed, keeping current configuration");
                return Err(e);
            }
        };

        let current = self.get();
        if current.model == snapshot.model && current.config.dest_dir == snapshot.config.dest_dir
        {
            tracing::debug!(elapsed_ms = elapsed_ms(start), "Site configuration unchanged");
            return Ok(ReloadOutcome::Unchanged);
        }

        *self.current.write().unwrap() = Arc::new(snapshot);
        tracing::info!(elapsed_ms = elapsed_ms(start), "Site configuration reloaded");
        Ok(ReloadOutcome::Updated)
    }

    fn resolve(config: Config, extensions: &[MarkdownExtension]) -> Result<SiteSnapshot, SiteError> {
        let mut resolver = config.resolver();
        for extension in extensions {
            resolver.register_markdown_extension(extension.clone());
        }
        let model = resolver.resolve().map_err(mast_config::ConfigError::from)?;
        Ok(SiteSnapshot { config, model })
    }
}

#[cfg(test)]
mod tests {
    // Ensure SiteHandle is Send + Sync for use with Arc
    static_assertions::assert_impl_all!(super::SiteHandle: Send, Sync);

    use std::fs;

    use mast_config::ConfigError;

    use super::*;

    const SITE: &str = r#"
base = "/"
title = "First"

[theme]
nav = [{ text = "About", link = "/about/" }]
"#;

    fn site_file(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mast.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_open_resolves_model() {
        let (_dir, path) = site_file(SITE);
        let handle = SiteHandle::open(Some(&path), CliSettings::default()).unwrap();

        let snapshot = handle.get();
        assert_eq!(snapshot.model.metadata().title, "First");
        assert_eq!(handle.config_path(), path);
    }

    #[test]
    fn test_open_invalid_document_fails() {
        let (_dir, path) = site_file(r#"title = "No base""#);
        let err = SiteHandle::open(Some(&path), CliSettings::default())
            .err()
            .unwrap();

        assert!(
            matches!(err, SiteError::Config(ConfigError::Invalid(_))),
            "got {err:?}"
        );
    }

    #[test]
    fn test_open_applies_extensions() {
        let (_dir, path) = site_file(SITE);
        let handle = SiteHandle::with_extensions(
            Some(&path),
            CliSettings::default(),
            vec![MarkdownExtension::new("task-lists")],
        )
        .unwrap();

        assert_eq!(handle.get().model.markdown_extensions()[0].name, "task-lists");
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let (_dir, path) = site_file(SITE);
        let handle = SiteHandle::open(Some(&path), CliSettings::default()).unwrap();
        let before = handle.get();

        fs::write(&path, SITE.replace("First", "Second")).unwrap();
        assert_eq!(handle.reload().unwrap(), ReloadOutcome::Updated);

        // Old readers keep their snapshot
        assert_eq!(before.model.metadata().title, "First");
        assert_eq!(handle.get().model.metadata().title, "Second");
    }

    #[test]
    fn test_reload_unchanged() {
        let (_dir, path) = site_file(SITE);
        let handle = SiteHandle::open(Some(&path), CliSettings::default()).unwrap();
        let before = handle.get();

        assert_eq!(handle.reload().unwrap(), ReloadOutcome::Unchanged);
        assert!(Arc::ptr_eq(&before, &handle.get()));
    }

    #[test]
    fn test_reload_invalid_keeps_current() {
        let (_dir, path) = site_file(SITE);
        let handle = SiteHandle::open(Some(&path), CliSettings::default()).unwrap();
        let before = handle.get();

        fs::write(&path, "base = \"\"\ntitle = \"Broken\"").unwrap();
        let err = handle.reload().unwrap_err();

        assert!(err.to_string().contains("base"), "got: {err}");
        assert!(Arc::ptr_eq(&before, &handle.get()));
    }

    #[test]
    fn test_reload_keeps_cli_settings() {
        let (_dir, path) = site_file(SITE);
        let settings = CliSettings {
            base: Some("/preview/".to_owned()),
            ..Default::default()
        };
        let handle = SiteHandle::open(Some(&path), settings).unwrap();

        fs::write(&path, SITE.replace("First", "Second")).unwrap();
        handle.reload().unwrap();

        assert_eq!(handle.get().model.metadata().base, "/preview/");
    }
}
