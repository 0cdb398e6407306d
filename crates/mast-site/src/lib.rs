//! Site snapshot management for mast.
//!
//! Provides [`SiteHandle`], the process-wide holder of the resolved
//! [`SiteModel`](mast_config::SiteModel), plus the pieces that keep it
//! honest while a site is being worked on:
//! - [`ContentTree`] and [`check_links`] verify that navigation and sidebar
//!   links point at pages that exist
//! - [`ConfigWatcher`] re-resolves the site document when it changes and
//!   swaps the snapshot without disturbing readers
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mast_config::CliSettings;
//! use mast_site::{ConfigWatcher, SiteHandle};
//!
//! let handle = Arc::new(SiteHandle::open(None, CliSettings::default())?);
//! let _watcher = ConfigWatcher::spawn(Arc::clone(&handle), |_| {})?;
//!
//! let snapshot = handle.get();
//! println!("{}", snapshot.model.metadata().title);
//! ```

mod content;
mod handle;
mod watch;

pub use content::{ContentTree, check_links};
pub use handle::{ReloadOutcome, SiteHandle, SiteSnapshot};
pub use watch::ConfigWatcher;

use mast_config::ConfigError;

/// Error returned by site snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Loading or resolving the site document failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// File watcher could not be set up.
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}
