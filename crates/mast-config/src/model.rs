//! Resolved, immutable site model.
//!
//! A [`SiteModel`] is only produced by [`resolve`](crate::resolve) and has no
//! mutating methods. Share it behind an `Arc`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Global descriptive fields applied to every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteMetadata {
    /// Root URL path, always starting with `/`.
    pub base: String,
    pub title: String,
    pub description: String,
    /// Output directory as authored.
    pub dest: String,
}

/// Element injected into the document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadTag {
    pub tag_name: String,
    pub attributes: BTreeMap<String, String>,
}

/// Top-level navigation bar link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub text: String,
    pub link: String,
}

/// Titled, collapsible cluster of sidebar links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarGroup {
    pub title: String,
    pub collapsable: bool,
    pub content: SidebarContent,
}

/// What a sidebar group points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarContent {
    /// Ordered list of pages.
    Children(Vec<SidebarChild>),
    /// Single-page shortcut.
    Page(String),
}

/// Sidebar page link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarChild {
    pub path: String,
    pub label: String,
}

/// Source repository link shown in the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoLink {
    pub repo: String,
    pub label: String,
}

/// Markdown renderer extension request.
///
/// The resolver never loads extension code; the rendering engine looks the
/// extension up by name and applies `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownExtension {
    pub name: String,
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl MarkdownExtension {
    /// Extension request without options.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: serde_json::Map::new(),
        }
    }

    /// Add an option.
    #[must_use]
    pub fn with_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Validated site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteModel {
    pub(crate) metadata: SiteMetadata,
    pub(crate) head: Vec<HeadTag>,
    pub(crate) nav: Vec<NavEntry>,
    pub(crate) sidebar: Vec<SidebarGroup>,
    pub(crate) repo: Option<RepoLink>,
    pub(crate) last_updated_label: String,
    pub(crate) sidebar_depth: u32,
    pub(crate) markdown_extensions: Vec<MarkdownExtension>,
}

impl SiteModel {
    #[must_use]
    pub fn metadata(&self) -> &SiteMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn head(&self) -> &[HeadTag] {
        &self.head
    }

    /// Navigation entries in authored order.
    #[must_use]
    pub fn nav(&self) -> &[NavEntry] {
        &self.nav
    }

    /// Sidebar groups in authored order.
    #[must_use]
    pub fn sidebar(&self) -> &[SidebarGroup] {
        &self.sidebar
    }

    #[must_use]
    pub fn repo(&self) -> Option<&RepoLink> {
        self.repo.as_ref()
    }

    #[must_use]
    pub fn last_updated_label(&self) -> &str {
        &self.last_updated_label
    }

    #[must_use]
    pub fn sidebar_depth(&self) -> u32 {
        self.sidebar_depth
    }

    /// Extensions declared in the document followed by registered ones.
    #[must_use]
    pub fn markdown_extensions(&self) -> &[MarkdownExtension] {
        &self.markdown_extensions
    }

    /// All sidebar targets as `(path, label)` in authored order.
    ///
    /// Single-page groups contribute their path labelled with the group title.
    pub fn sidebar_links(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sidebar.iter().flat_map(|group| {
            let links: Vec<(&str, &str)> = match &group.content {
                SidebarContent::Children(children) => children
                    .iter()
                    .map(|c| (c.path.as_str(), c.label.as_str()))
                    .collect(),
                SidebarContent::Page(path) => vec![(path.as_str(), group.title.as_str())],
            };
            links
        })
    }

    /// Index of the first sidebar group linking to `path`.
    ///
    /// Paths are compared after normalization, so `/guide/a.html` matches a
    /// child authored as `guide/a.md`.
    #[must_use]
    pub fn group_for(&self, path: &str) -> Option<usize> {
        let target = self.page_link(path);
        self.sidebar.iter().position(|group| match &group.content {
            SidebarContent::Children(children) => {
                children.iter().any(|c| self.page_link(&c.path) == target)
            }
            SidebarContent::Page(page) => self.page_link(page) == target,
        })
    }

    /// Convert an authored content path or link into a site URL under `base`.
    ///
    /// # Examples
    ///
    /// With `base = "/"`:
    /// - `"frontend/a.md"` -> `"/frontend/a.html"`
    /// - `"guide/README.md"` -> `"/guide/"`
    /// - `"/about/"` -> `"/about/"`
    /// - `"https://example.com"` -> unchanged
    #[must_use]
    pub fn page_link(&self, path: &str) -> String {
        if is_external(path) {
            return path.to_owned();
        }

        let (path, fragment) = match path.split_once('#') {
            Some((p, f)) => (p, Some(f)),
            None => (path, None),
        };

        let rel = path.trim_start_matches('/');
        let rel = match rel.strip_suffix(".md") {
            Some(stem) => {
                let (dir, file) = stem.rsplit_once('/').unwrap_or(("", stem));
                if file.eq_ignore_ascii_case("readme") || file == "index" {
                    if dir.is_empty() {
                        String::new()
                    } else {
                        format!("{dir}/")
                    }
                } else {
                    format!("{stem}.html")
                }
            }
            None => rel.to_owned(),
        };

        let base = self.metadata.base.trim_end_matches('/');
        let mut link = format!("{base}/{rel}");
        if let Some(fragment) = fragment {
            link.push('#');
            link.push_str(fragment);
        }
        link
    }
}

/// Whether a link points outside the site.
///
/// Protocol-relative links (`//cdn.example.com/x`) count as external.
#[must_use]
pub fn is_external(link: &str) -> bool {
    link.contains("://")
        || link.starts_with("//")
        || link.starts_with("mailto:")
        || link.starts_with("tel:")
}
