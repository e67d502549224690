//! Sidebar navigation configuration.
//!
//! A sidebar is an ordered list of categories, each holding an ordered
//! list of items. The current version's sidebar comes from caller
//! configuration; older versions carry theirs in a config file inside
//! the tagged tree.

use serde::Deserialize;
use serde::de::Error as _;

use vd_vcs::{TreeObject, Vcs};

use crate::error::SiteError;

/// Historical config file names, checked in this order.
///
/// Only the YAML file is parsed; the JavaScript config is recognized
/// but unsupported.
pub(crate) const CONFIG_PATHS: [&str; 2] = ["gatsby-config.js", "_config.yml"];

/// Key under which the YAML config stores its sidebar.
const SIDEBAR_KEY: &str = "sidebar_categories";

/// One sidebar entry.
///
/// The string-vs-object shape of the config format is resolved here,
/// once, at parse time.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SidebarItem {
    /// Reference to a content file, relative to the content root,
    /// without extension (e.g., "index", "features/caching").
    Doc(String),
    /// External or static link rendered as a plain anchor; never
    /// materialized as a page.
    Anchor {
        /// Link text.
        title: String,
        /// Link target.
        href: String,
    },
}

/// A named, ordered grouping of sidebar items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarCategory {
    /// Category name; `None` for the untitled category (a YAML `null`
    /// key).
    pub title: Option<String>,
    /// Items in navigation order.
    pub items: Vec<SidebarItem>,
}

/// Ordered sidebar categories for one version.
pub type SidebarCategories = Vec<SidebarCategory>;

/// Parse a YAML config document and extract its `sidebar_categories`.
///
/// Returns `Ok(None)` when the document has no such key. Category
/// order and item order follow the document.
///
/// # Errors
///
/// Returns an error for malformed YAML, a non-mapping sidebar value,
/// or a category key that is neither a string nor `null`.
pub fn parse_sidebar_config(text: &str) -> Result<Option<SidebarCategories>, serde_yaml::Error> {
    let document: serde_yaml::Value = serde_yaml::from_str(text)?;
    let Some(sidebar) = document.get(SIDEBAR_KEY) else {
        return Ok(None);
    };
    if sidebar.is_null() {
        return Ok(None);
    }

    let mapping = sidebar
        .as_mapping()
        .ok_or_else(|| serde_yaml::Error::custom(format!("{SIDEBAR_KEY} must be a mapping")))?;

    let mut categories = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let title = match key {
            serde_yaml::Value::Null => None,
            serde_yaml::Value::String(name) => Some(name.clone()),
            other => {
                return Err(serde_yaml::Error::custom(format!(
                    "invalid category name: {other:?}"
                )));
            }
        };
        let items: Vec<SidebarItem> = serde_yaml::from_value(value.clone())?;
        categories.push(SidebarCategory { title, items });
    }
    Ok(Some(categories))
}

/// Load the sidebar configuration for a non-current version from its
/// historical tree.
///
/// Scans `tree` for the recognized config file names and parses the
/// first match.
///
/// # Errors
///
/// - [`SiteError::MissingSidebar`] when no config file is present or
///   the YAML config lacks a sidebar
/// - [`SiteError::UnsupportedConfig`] when the match is the JavaScript
///   config (recognized but not parsed)
/// - [`SiteError::Vcs`] / [`SiteError::Yaml`] on read or parse failure
pub(crate) fn load_historical(
    vcs: &dyn Vcs,
    tree: &[TreeObject],
    tag: &str,
) -> Result<SidebarCategories, SiteError> {
    let existing = CONFIG_PATHS
        .iter()
        .find(|&&candidate| tree.iter().any(|object| object.path == candidate));

    let Some(&config_path) = existing else {
        return Err(SiteError::MissingSidebar {
            tag: tag.to_owned(),
        });
    };

    if !config_path.ends_with(".yml") {
        return Err(SiteError::UnsupportedConfig {
            path: config_path.to_owned(),
            tag: tag.to_owned(),
        });
    }

    let text = vcs.show(tag, config_path)?;
    parse_sidebar_config(&text)?.ok_or_else(|| SiteError::MissingSidebar {
        tag: tag.to_owned(),
    })
}
