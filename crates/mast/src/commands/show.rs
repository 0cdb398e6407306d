//! `mast show` command implementation.

use clap::Args;
use mast_config::{Config, SidebarContent, SiteModel};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Print the resolved model as JSON.
    #[arg(long)]
    json: bool,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document can't be loaded or is invalid.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.site.config.as_deref(), Some(&self.site.settings()))?;
        let model = config.resolve()?;

        if self.json {
            output.data(&serde_json::to_string_pretty(&model)?);
        } else {
            print_summary(&output, &model);
        }
        Ok(())
    }
}

/// Print a human-readable outline of the site.
pub(crate) fn print_summary(output: &Output, model: &SiteModel) {
    let meta = model.metadata();
    output.heading(&meta.title);
    if !meta.description.is_empty() {
        output.info(&meta.description);
    }
    output.info(&format!("Base: {}", meta.base));
    output.info(&format!("Output: {}", meta.dest));
    output.info(&format!("Sidebar depth: {}", model.sidebar_depth()));
    output.info(&format!("Last updated label: {}", model.last_updated_label()));
    if let Some(repo) = model.repo() {
        output.info(&format!("Repository: {} ({})", repo.repo, repo.label));
    }

    for tag in model.head() {
        let attrs: Vec<String> = tag
            .attributes
            .iter()
            .map(|(k, v)| format!("{k}=\"{v}\""))
            .collect();
        output.info(&format!("Head: <{} {}>", tag.tag_name, attrs.join(" ")));
    }

    if !model.nav().is_empty() {
        output.heading("Navigation");
        for entry in model.nav() {
            output.info(&format!("  {} -> {}", entry.text, model.page_link(&entry.link)));
        }
    }

    if !model.sidebar().is_empty() {
        output.heading("Sidebar");
        for group in model.sidebar() {
            let marker = if group.collapsable { "+" } else { "-" };
            match &group.content {
                SidebarContent::Children(children) => {
                    output.info(&format!("  {marker} {}", group.title));
                    for child in children {
                        output.info(&format!(
                            "      {} -> {}",
                            child.label,
                            model.page_link(&child.path)
                        ));
                    }
                }
                SidebarContent::Page(path) => {
                    output.info(&format!(
                        "  {marker} {} -> {}",
                        group.title,
                        model.page_link(path)
                    ));
                }
            }
        }
    }

    if !model.markdown_extensions().is_empty() {
        let names: Vec<&str> = model
            .markdown_extensions()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        output.info(&format!("Markdown extensions: {}", names.join(", ")));
    }
}
