//! `mast watch` command implementation.

use std::sync::Arc;

use clap::Args;
use mast_site::{ConfigWatcher, ReloadOutcome, SiteHandle};

use super::SiteArgs;
use super::show::print_summary;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the watch command.
#[derive(Args)]
pub(crate) struct WatchArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

impl WatchArgs {
    /// Execute the watch command.
    ///
    /// Resolves the site document, then re-resolves it on every change
    /// until interrupted. Invalid edits are reported and the previous
    /// configuration stays active.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial document is invalid or the watcher
    /// fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let handle = Arc::new(SiteHandle::open(
            self.site.config.as_deref(),
            self.site.settings(),
        )?);
        print_summary(&output, &handle.get().model);

        let summary_handle = Arc::clone(&handle);
        let _watcher = ConfigWatcher::spawn(Arc::clone(&handle), move |result| {
            let output = Output::new();
            match result {
                Ok(ReloadOutcome::Updated) => {
                    output.success("Site configuration reloaded");
                    print_summary(&output, &summary_handle.get().model);
                }
                Ok(ReloadOutcome::Unchanged) => output.info("Site configuration unchanged"),
                Err(e) => output.error(&format!(
                    "Reload failed, keeping previous configuration: {e}"
                )),
            }
        })?;

        output.info(&format!(
            "Watching {} (Ctrl+C to stop)",
            handle.config_path().display()
        ));

        tokio::signal::ctrl_c().await?;
        output.info("Stopped");
        Ok(())
    }
}
