//! Content tree discovery and link checking.
//!
//! The content tree is the set of pages that exist under the source
//! directory, keyed by URL path:
//! - `README.md` and `index.md` become their directory's path
//! - `guide.md` becomes `"guide"`, `domain/setup.md` becomes `"domain/setup"`
//!
//! Hidden files and directories (e.g. `.vuepress/`) are skipped.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use mast_config::{SidebarContent, SiteModel, Violation, is_external};

/// Set of URL paths backed by a markdown file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTree {
    pages: BTreeSet<String>,
}

impl ContentTree {
    /// Scan a source directory for markdown pages.
    ///
    /// Returns an empty tree if the directory doesn't exist.
    #[must_use]
    pub fn scan(source_dir: &Path) -> Self {
        let mut tree = Self::default();
        if source_dir.is_dir() {
            tree.scan_directory(source_dir, "");
        }
        tracing::debug!(
            source_dir = %source_dir.display(),
            pages = tree.pages.len(),
            "Content tree scanned"
        );
        tree
    }

    /// Build a tree from known URL paths.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            pages: pages
                .into_iter()
                .map(|p| normalize_link(p.as_ref()))
                .collect(),
        }
    }

    fn scan_directory(&mut self, dir: &Path, url_prefix: &str) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let path: PathBuf = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

            if is_dir {
                let child_prefix = join_url(url_prefix, &name);
                self.scan_directory(&path, &child_prefix);
            } else if let Some(stem) = name.strip_suffix(".md") {
                let url_path = if stem.eq_ignore_ascii_case("readme") || stem == "index" {
                    url_prefix.to_owned()
                } else {
                    join_url(url_prefix, stem)
                };
                self.pages.insert(url_path);
            }
        }
    }

    /// Whether an authored link resolves to a page.
    #[must_use]
    pub fn contains(&self, link: &str) -> bool {
        self.pages.contains(&normalize_link(link))
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// URL paths in sorted order.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(String::as_str)
    }
}

fn join_url(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}/{segment}")
    }
}

/// Reduce an authored link to a content tree key.
///
/// Examples:
/// - `"/about/"` -> `"about"`
/// - `"frontend/a.md"` -> `"frontend/a"`
/// - `"/frontend/a.html#top"` -> `"frontend/a"`
/// - `"guide/README.md"` -> `"guide"`
fn normalize_link(link: &str) -> String {
    let link = link.split(['#', '?']).next().unwrap_or_default();
    let link = link.trim_matches('/');
    let link = link
        .strip_suffix(".md")
        .or_else(|| link.strip_suffix(".html"))
        .unwrap_or(link);

    let (dir, file) = link.rsplit_once('/').unwrap_or(("", link));
    if file.eq_ignore_ascii_case("readme") || file == "index" {
        dir.to_owned()
    } else {
        link.to_owned()
    }
}

/// Find navigation and sidebar links that don't resolve to a page.
///
/// External links are skipped. Results use the same field paths as
/// validation violations.
#[must_use]
pub fn check_links(model: &SiteModel, tree: &ContentTree) -> Vec<Violation> {
    const REASON: &str = "does not resolve to a content page";

    let mut out = Vec::new();
    let mut check = |field: String, link: &str| {
        if !is_external(link) && !tree.contains(link) {
            out.push(Violation::new(field, format!("{REASON}: {link}")));
        }
    };

    for (i, entry) in model.nav().iter().enumerate() {
        check(format!("theme.nav[{i}].link"), entry.link.as_str());
    }

    for (i, group) in model.sidebar().iter().enumerate() {
        match &group.content {
            SidebarContent::Children(children) => {
                for (j, child) in children.iter().enumerate() {
                    check(format!("theme.sidebar[{i}].children[{j}]"), child.path.as_str());
                }
            }
            SidebarContent::Page(path) => check(format!("theme.sidebar[{i}].path"), path.as_str()),
        }
    }

    if !out.is_empty() {
        tracing::warn!(count = out.len(), "Unresolved site links");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use mast_config::{RawConfig, resolve};
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# Page\n").unwrap();
    }

    fn model(toml: &str) -> SiteModel {
        let raw: RawConfig = toml::from_str(toml).unwrap();
        resolve(&raw).unwrap()
    }

    #[test]
    fn test_normalize_link() {
        assert_eq!(normalize_link("/about/"), "about");
        assert_eq!(normalize_link("frontend/a.md"), "frontend/a");
        assert_eq!(normalize_link("/frontend/a.html#top"), "frontend/a");
        assert_eq!(normalize_link("guide/README.md"), "guide");
        assert_eq!(normalize_link("/"), "");
        assert_eq!(normalize_link("index.md"), "");
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tree = ContentTree::scan(&dir.path().join("missing"));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_scan_maps_files_to_url_paths() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "README.md");
        write(dir.path(), "about/README.md");
        write(dir.path(), "frontend/standardPackage.md");
        write(dir.path(), "guide/index.md");
        write(dir.path(), ".vuepress/hidden.md");
        write(dir.path(), "notes.txt");

        let tree = ContentTree::scan(dir.path());
        let pages: Vec<_> = tree.pages().collect();
        assert_eq!(
            pages,
            vec!["", "about", "frontend/standardPackage", "guide"]
        );
    }

    #[test]
    fn test_check_links_reports_missing_pages() {
        let tree = ContentTree::from_pages(["", "about", "frontend/a"]);
        let model = model(
            r#"
base = "/"
title = "T"

[theme]
nav = [
    { text = "About", link = "/about/" },
    { text = "Missing", link = "/missing/" },
    { text = "GitHub", link = "https://github.com/owner/name" },
]

[[theme.sidebar]]
title = "Frontend"
children = [["frontend/a.md", "A"], ["frontend/b.md", "B"]]

[[theme.sidebar]]
title = "Gone"
path = "/gone/"
"#,
        );

        let problems = check_links(&model, &tree);
        let paths: Vec<_> = problems.iter().map(|v| v.field_path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "theme.nav[1].link",
                "theme.sidebar[0].children[1]",
                "theme.sidebar[1].path",
            ]
        );
        assert!(problems[0].reason.ends_with("/missing/"));
    }

    #[test]
    fn test_check_links_all_resolved() {
        let tree = ContentTree::from_pages(["about/README.md", "frontend/a.md"]);
        let model = model(
            r#"
base = "/docs/"
title = "T"

[theme]
nav = [
    { text = "About", link = "/about/" },
    { text = "CDN", link = "//cdn.example.com/assets/" },
]

[[theme.sidebar]]
title = "Frontend"
children = [["frontend/a.md", "A"]]
"#,
        );

        assert!(check_links(&model, &tree).is_empty());
    }
}
