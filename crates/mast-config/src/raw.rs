//! Raw site document as authored in `mast.toml`.
//!
//! Everything here is deliberately loose: required fields are `Option`,
//! head tags and sidebar children are untyped values. Shape problems are
//! reported by
//! [`resolve`](crate::resolve) as violations with field paths instead of
//! surfacing as opaque deserializer errors.

use serde::Deserialize;
use serde_json::Value;

use crate::model::MarkdownExtension;

/// Top-level site document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Root URL path of the site (e.g. `/` or `/docs/`).
    pub base: Option<String>,
    /// Site title.
    pub title: Option<String>,
    /// Site description.
    pub description: Option<String>,
    /// Output directory for the build pipeline.
    pub dest: Option<String>,
    /// Document head tags, authored as `[tag, { attr = value }]`.
    pub head: Vec<Value>,
    /// Navigation and sidebar configuration.
    pub theme: RawTheme,
    /// Markdown renderer configuration.
    pub markdown: RawMarkdown,
    /// Content location used for link checks.
    pub docs: RawDocs,
}

/// Theme section (`[theme]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawTheme {
    pub nav: Vec<RawNavEntry>,
    pub sidebar: Vec<RawSidebarGroup>,
    /// Signed so that negative depths are reported rather than rejected by
    /// the deserializer.
    pub sidebar_depth: Option<i64>,
    pub last_updated: Option<String>,
    pub repo: Option<String>,
    pub repo_label: Option<String>,
}

/// Navigation bar entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawNavEntry {
    pub text: String,
    pub link: String,
}

/// Sidebar group. Exactly one of `children` and `path` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawSidebarGroup {
    pub title: String,
    pub collapsable: Option<bool>,
    /// `[path, label]` pairs.
    pub children: Option<Vec<Value>>,
    pub path: Option<String>,
}

/// Markdown section (`[markdown]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawMarkdown {
    pub extensions: Vec<MarkdownExtension>,
}

/// Docs section (`[docs]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawDocs {
    /// Content root, relative to the config file.
    pub source_dir: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_empty_document() {
        let raw: RawConfig = toml::from_str("").unwrap();
        assert_eq!(raw, RawConfig::default());
    }

    #[test]
    fn test_parse_head_tag_pair() {
        let raw: RawConfig = toml::from_str(
            r#"
head = [["link", { rel = "icon", href = "/favicon.ico" }]]
"#,
        )
        .unwrap();

        assert_eq!(raw.head.len(), 1);
        assert_eq!(raw.head[0][0], "link");
        assert_eq!(raw.head[0][1]["rel"], "icon");
        assert_eq!(raw.head[0][1]["href"], "/favicon.ico");
    }

    #[test]
    fn test_parse_sidebar_groups() {
        let raw: RawConfig = toml::from_str(
            r#"
[[theme.sidebar]]
title = "Frontend"
collapsable = false
children = [["frontend/a.md", "A"], ["frontend/b.md", "B"]]

[[theme.sidebar]]
title = "About"
path = "/about/"
"#,
        )
        .unwrap();

        let sidebar = &raw.theme.sidebar;
        assert_eq!(sidebar.len(), 2);
        assert_eq!(sidebar[0].collapsable, Some(false));
        assert_eq!(
            sidebar[0].children.as_ref().unwrap()[1],
            json!(["frontend/b.md", "B"])
        );
        assert_eq!(sidebar[1].path.as_deref(), Some("/about/"));
        assert!(sidebar[1].children.is_none());
    }

    #[test]
    fn test_parse_keeps_malformed_shapes() {
        let raw: RawConfig = toml::from_str(
            r#"
head = ["meta", ["link", { rel = 1 }]]

[[theme.sidebar]]
title = "G"
children = ["a.md", ["b.md", 1]]
"#,
        )
        .unwrap();

        assert_eq!(raw.head, vec![json!("meta"), json!(["link", { "rel": 1 }])]);
        assert_eq!(
            raw.theme.sidebar[0].children,
            Some(vec![json!("a.md"), json!(["b.md", 1])])
        );
    }

    #[test]
    fn test_parse_markdown_extensions() {
        let raw: RawConfig = toml::from_str(
            r#"
[[markdown.extensions]]
name = "task-lists"
options = { enabled = true, label = "done" }
"#,
        )
        .unwrap();

        let ext = &raw.markdown.extensions[0];
        assert_eq!(ext.name, "task-lists");
        assert_eq!(ext.options["enabled"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_parse_json_document() {
        let raw: RawConfig = serde_json::from_str(
            r#"{"base": "/", "title": "T", "theme": {"nav": [{"text": "About", "link": "/about/"}]}}"#,
        )
        .unwrap();

        assert_eq!(raw.base.as_deref(), Some("/"));
        assert_eq!(raw.theme.nav[0].link, "/about/");
    }
}
