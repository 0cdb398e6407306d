//! Config file watching with debounced reloads.
//!
//! Editors often emit several events per save (truncate, write, rename).
//! Events for the site document are coalesced until the file has been quiet
//! for the debounce window, then [`SiteHandle::reload`] runs once.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};

use crate::SiteError;
use crate::handle::{ReloadOutcome, SiteHandle};

/// Quiet period before a change triggers a reload.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// How often the drain thread checks for settled changes.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Coalesces change notifications into a single deadline.
pub(crate) struct Debouncer {
    deadline: Mutex<Option<Instant>>,
    duration: Duration,
}

impl Debouncer {
    pub fn new(duration: Duration) -> Self {
        Self {
            deadline: Mutex::new(None),
            duration,
        }
    }

    /// Record a change, pushing the deadline out.
    pub fn record(&self) {
        *self.deadline.lock().unwrap() = Some(Instant::now() + self.duration);
    }

    /// Take the pending change if its deadline has passed.
    pub fn take_ready(&self) -> bool {
        let mut deadline = self.deadline.lock().unwrap();
        match *deadline {
            Some(at) if at <= Instant::now() => {
                *deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Whether a notify event touches the watched file.
fn is_relevant(event: &notify::Event, target: &Path) -> bool {
    let kind_matches = matches!(
        event.kind,
        notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
    );
    kind_matches && event.paths.iter().any(|p| p.file_name() == target.file_name())
}

/// Watches the site document and reloads the handle on change.
///
/// Dropping the watcher stops watching and ends the background thread.
pub struct ConfigWatcher {
    _shutdown: mpsc::Sender<()>,
}

impl ConfigWatcher {
    /// Start watching `handle`'s site document.
    ///
    /// `on_reload` runs on the background thread after every reload attempt.
    ///
    /// # Errors
    ///
    /// Returns error if the file watcher can't be created.
    pub fn spawn<F>(handle: Arc<SiteHandle>, on_reload: F) -> Result<Self, SiteError>
    where
        F: Fn(&Result<ReloadOutcome, SiteError>) + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let debouncer = Arc::new(Debouncer::new(DEBOUNCE));

        let target: PathBuf = handle.config_path().to_path_buf();
        // Watch the directory: editors that save by rename replace the inode.
        let watch_dir = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let watcher_debouncer = Arc::clone(&debouncer);
        let watcher_target = target.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let Ok(event) = res else { return };
            if is_relevant(&event, &watcher_target) {
                watcher_debouncer.record();
            }
        })?;
        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %target.display(), "Watching site configuration");

        // Spawn drain thread. The watcher is moved in to keep it alive.
        std::thread::spawn(move || {
            let _watcher = watcher;

            loop {
                match shutdown_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                }

                if debouncer.take_ready() {
                    let result = handle.reload();
                    on_reload(&result);
                }
            }

            tracing::debug!("Site configuration watcher stopped");
        });

        // When dropped, shutdown_tx disconnects, causing the drain thread to exit
        Ok(Self {
            _shutdown: shutdown_tx,
        })
    }
}
