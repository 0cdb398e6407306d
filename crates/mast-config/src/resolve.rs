//! Validation and resolution of a raw site document into a [`SiteModel`].
//!
//! Resolution is a pure function of its input. Every violation is collected
//! before reporting, and no model is produced while any violation exists.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::model::{
    HeadTag, MarkdownExtension, NavEntry, RepoLink, SidebarChild, SidebarContent, SidebarGroup,
    SiteMetadata, SiteModel,
};
use crate::raw::{RawConfig, RawSidebarGroup};

const DEFAULT_SIDEBAR_DEPTH: u32 = 1;
const DEFAULT_DEST: &str = "dist";
const DEFAULT_LAST_UPDATED_LABEL: &str = "Last Updated";

/// A single problem found in the site document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path to the offending field (e.g. `theme.sidebar[2].children[0]`).
    pub field_path: String,
    /// What is wrong with it.
    pub reason: String,
}

impl Violation {
    pub fn new(field_path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_path, self.reason)
    }
}

/// Site document failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid site configuration {}", describe_violations(.violations))]
pub struct ConfigValidationError {
    pub violations: Vec<Violation>,
}

impl ConfigValidationError {
    /// Whether any violation was reported for `field_path`.
    #[must_use]
    pub fn has_violation(&self, field_path: &str) -> bool {
        self.violations.iter().any(|v| v.field_path == field_path)
    }
}

/// Problem count followed by one indented line per violation.
fn describe_violations(violations: &[Violation]) -> String {
    let count = violations.len();
    let mut out = format!("({count} problem{})", if count == 1 { "" } else { "s" });
    for violation in violations {
        out.push_str("\n  ");
        out.push_str(&violation.to_string());
    }
    out
}

/// Resolves a raw document into a [`SiteModel`].
///
/// Holds the raw document and any programmatically registered markdown
/// extensions until [`resolve`](Self::resolve) consumes it.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    raw: RawConfig,
    extensions: Vec<MarkdownExtension>,
}

impl ConfigResolver {
    #[must_use]
    pub fn new(raw: RawConfig) -> Self {
        Self {
            raw,
            extensions: Vec::new(),
        }
    }

    /// Record a markdown extension request for the rendering engine.
    ///
    /// Registered extensions are appended after those declared in the
    /// document, in registration order.
    pub fn register_markdown_extension(&mut self, extension: MarkdownExtension) -> &mut Self {
        tracing::debug!(name = %extension.name, "Markdown extension registered");
        self.extensions.push(extension);
        self
    }

    /// Validate and produce the site model.
    ///
    /// # Errors
    ///
    /// Returns every violation found if the document is invalid.
    pub fn resolve(self) -> Result<SiteModel, ConfigValidationError> {
        resolve_with_extensions(&self.raw, &self.extensions)
    }
}

/// Validate a raw document and produce the site model.
///
/// # Errors
///
/// Returns every violation found if the document is invalid.
pub fn resolve(raw: &RawConfig) -> Result<SiteModel, ConfigValidationError> {
    resolve_with_extensions(raw, &[])
}

fn resolve_with_extensions(
    raw: &RawConfig,
    registered: &[MarkdownExtension],
) -> Result<SiteModel, ConfigValidationError> {
    let violations = validate(raw, registered);
    if !violations.is_empty() {
        tracing::debug!(count = violations.len(), "Site configuration rejected");
        return Err(ConfigValidationError { violations });
    }

    let model = build(raw, registered);
    tracing::debug!(
        nav = model.nav.len(),
        groups = model.sidebar.len(),
        extensions = model.markdown_extensions.len(),
        "Site model resolved"
    );
    Ok(model)
}

/// Run all checks in order and collect violations.
fn validate(raw: &RawConfig, registered: &[MarkdownExtension]) -> Vec<Violation> {
    let mut out = Vec::new();

    // Site metadata
    match raw.base.as_deref() {
        None => out.push(Violation::new("base", "is required")),
        Some(base) if base.is_empty() || !base.starts_with('/') => {
            out.push(Violation::new("base", "must be non-empty and start with /"));
        }
        Some(_) => {}
    }
    if raw.title.is_none() {
        out.push(Violation::new("title", "is required"));
    }

    // Sidebar groups
    for (i, group) in raw.theme.sidebar.iter().enumerate() {
        validate_group(i, group, &mut out);
    }

    // Navigation
    for (i, entry) in raw.theme.nav.iter().enumerate() {
        if entry.link.is_empty() {
            out.push(Violation::new(
                format!("theme.nav[{i}].link"),
                "must be non-empty",
            ));
        }
    }

    // Repository link
    if let Some(repo) = raw.theme.repo.as_deref() {
        if !is_valid_url(repo) {
            out.push(Violation::new("theme.repo", "must be a valid URL"));
        }
    } else if raw.theme.repo_label.is_some() {
        out.push(Violation::new("theme.repo_label", "requires theme.repo"));
    }

    if let Some(depth) = raw.theme.sidebar_depth
        && (depth < 1 || u32::try_from(depth).is_err())
    {
        out.push(Violation::new(
            "theme.sidebar_depth",
            "must be a positive integer",
        ));
    }

    for (i, tag) in raw.head.iter().enumerate() {
        match head_tag(tag) {
            None => out.push(Violation::new(
                format!("head[{i}]"),
                "must be a [tag, attributes] pair",
            )),
            Some(tag) if tag.tag_name.is_empty() => {
                out.push(Violation::new(format!("head[{i}]"), "tag name must be non-empty"));
            }
            Some(_) => {}
        }
    }

    for (i, ext) in raw.markdown.extensions.iter().enumerate() {
        if ext.name.is_empty() {
            out.push(Violation::new(
                format!("markdown.extensions[{i}].name"),
                "must be non-empty",
            ));
        }
    }
    for (i, ext) in registered.iter().enumerate() {
        if ext.name.is_empty() {
            out.push(Violation::new(
                format!("markdown.registered[{i}].name"),
                "must be non-empty",
            ));
        }
    }

    out
}

fn validate_group(index: usize, group: &RawSidebarGroup, out: &mut Vec<Violation>) {
    let field = format!("theme.sidebar[{index}]");

    match (&group.children, &group.path) {
        (Some(_), Some(_)) => out.push(Violation::new(
            field.as_str(),
            "must have exactly one of children or path, found both",
        )),
        (None, None) => out.push(Violation::new(
            field.as_str(),
            "must have exactly one of children or path, found neither",
        )),
        (None, Some(path)) if path.is_empty() => {
            out.push(Violation::new(format!("{field}.path"), "must be non-empty"));
        }
        _ => {}
    }

    for (j, child) in group.children.iter().flatten().enumerate() {
        match sidebar_child(child) {
            Some(child) if child.path.is_empty() => out.push(Violation::new(
                format!("{field}.children[{j}]"),
                "path must be non-empty",
            )),
            Some(_) => {}
            None => out.push(Violation::new(
                format!("{field}.children[{j}]"),
                "must be a [path, label] pair",
            )),
        }
    }
}

/// Read a `[path, label]` pair of strings.
fn sidebar_child(value: &Value) -> Option<SidebarChild> {
    match value.as_array()?.as_slice() {
        [path, label] => Some(SidebarChild {
            path: path.as_str()?.to_owned(),
            label: label.as_str()?.to_owned(),
        }),
        _ => None,
    }
}

/// Read a `[tag, { attr = value }]` pair with string attribute values.
fn head_tag(value: &Value) -> Option<HeadTag> {
    match value.as_array()?.as_slice() {
        [tag_name, attributes] => {
            let attributes = attributes
                .as_object()?
                .iter()
                .map(|(name, value)| Some((name.clone(), value.as_str()?.to_owned())))
                .collect::<Option<BTreeMap<_, _>>>()?;
            Some(HeadTag {
                tag_name: tag_name.as_str()?.to_owned(),
                attributes,
            })
        }
        _ => None,
    }
}

fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok_and(|url| url.has_host())
}

/// Label shown for a repository link when none is authored.
fn derive_repo_label(repo: &str) -> String {
    let host = url::Url::parse(repo)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase));
    match host.as_deref() {
        Some("github.com" | "www.github.com") => "GitHub",
        Some("gitlab.com" | "www.gitlab.com") => "GitLab",
        Some("bitbucket.org" | "www.bitbucket.org") => "Bitbucket",
        _ => "Source",
    }
    .to_owned()
}

/// Build the model from a document that passed validation.
fn build(raw: &RawConfig, registered: &[MarkdownExtension]) -> SiteModel {
    let metadata = SiteMetadata {
        base: raw.base.clone().unwrap_or_default(),
        title: raw.title.clone().unwrap_or_default(),
        description: raw.description.clone().unwrap_or_default(),
        dest: raw.dest.clone().unwrap_or_else(|| DEFAULT_DEST.to_owned()),
    };

    let head = raw.head.iter().filter_map(head_tag).collect();

    let nav = raw
        .theme
        .nav
        .iter()
        .map(|entry| NavEntry {
            text: entry.text.clone(),
            link: entry.link.clone(),
        })
        .collect();

    let sidebar = raw.theme.sidebar.iter().map(build_group).collect();

    let repo = raw.theme.repo.as_ref().map(|repo| RepoLink {
        repo: repo.clone(),
        label: raw
            .theme
            .repo_label
            .clone()
            .unwrap_or_else(|| derive_repo_label(repo)),
    });

    let sidebar_depth = raw
        .theme
        .sidebar_depth
        .and_then(|d| u32::try_from(d).ok())
        .unwrap_or(DEFAULT_SIDEBAR_DEPTH);

    let markdown_extensions = raw
        .markdown
        .extensions
        .iter()
        .chain(registered)
        .cloned()
        .collect();

    SiteModel {
        metadata,
        head,
        nav,
        sidebar,
        repo,
        last_updated_label: raw
            .theme
            .last_updated
            .clone()
            .unwrap_or_else(|| DEFAULT_LAST_UPDATED_LABEL.to_owned()),
        sidebar_depth,
        markdown_extensions,
    }
}

fn build_group(group: &RawSidebarGroup) -> SidebarGroup {
    let content = match (&group.children, &group.path) {
        (Some(children), _) => {
            SidebarContent::Children(children.iter().filter_map(sidebar_child).collect())
        }
        (None, path) => SidebarContent::Page(path.clone().unwrap_or_default()),
    };

    SidebarGroup {
        title: group.title.clone(),
        collapsable: group.collapsable.unwrap_or(true),
        content,
    }
}
