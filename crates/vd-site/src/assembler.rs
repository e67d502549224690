//! Version assembly: one structured record per resolved major version.

use rayon::prelude::*;
use serde::Serialize;

use vd_vcs::Vcs;

use crate::content::{Page, VersionContext, resolve_item};
use crate::error::SiteError;
use crate::generate::GenerateOptions;
use crate::sidebar;
use crate::versions::{ResolvedVersions, VersionEntry};

/// One sidebar category with its resolved pages.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryContents {
    /// Category name; `None` for the untitled category.
    pub title: Option<String>,
    /// Pages in sidebar order (skipped symlink misses removed).
    pub pages: Vec<Page>,
}

/// A fully assembled documentation version.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    /// Major version key.
    pub id: String,
    /// `/` for the current version, `/v{MAJOR}/` otherwise. Every page
    /// path in `contents` is prefixed with it.
    pub base_path: String,
    /// Semantic version with the patch component dropped (e.g., "1.5").
    pub major_minor: String,
    /// Categories in sidebar order.
    pub contents: Vec<CategoryContents>,
    /// Repository owner (from `owner/repo`).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// The tag this version was read from.
    pub tag: String,
}

/// A version dropped from the output, with the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionFailure {
    /// Major version key.
    pub key: String,
    /// Tag whose assembly failed.
    pub tag: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Assemble every resolved version, isolating failures per version.
///
/// Versions fan out in parallel; the VCS accessor serializes its own
/// historical reads. Output preserves the descending key order of
/// `versions`, with failed versions removed and reported separately.
pub(crate) fn assemble(
    vcs: &dyn Vcs,
    options: &GenerateOptions,
    versions: &ResolvedVersions,
    owner: &str,
    repo: &str,
    docs_root: &str,
) -> (Vec<VersionRecord>, Vec<VersionFailure>) {
    let current_key = versions.current_key().unwrap_or_default().to_owned();

    let results: Vec<(usize, Result<Option<VersionRecord>, SiteError>)> = versions
        .entries()
        .par_iter()
        .enumerate()
        .map(|(index, entry)| {
            let is_current = entry.key == current_key;
            let result = build_version(vcs, options, entry, is_current, owner, repo, docs_root);
            (index, result)
        })
        .collect();

    let mut records = Vec::new();
    let mut failures = Vec::new();
    for (index, result) in results {
        let entry = &versions.entries()[index];
        match result {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {
                tracing::debug!(tag = %entry.tag, "Empty tree, skipping version");
            }
            Err(err) => {
                tracing::error!(key = %entry.key, tag = %entry.tag, error = %err, "Version assembly failed");
                failures.push(VersionFailure {
                    key: entry.key.clone(),
                    tag: entry.tag.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    (records, failures)
}

/// Assemble a single version, or `None` for an empty tree.
fn build_version(
    vcs: &dyn Vcs,
    options: &GenerateOptions,
    entry: &VersionEntry,
    is_current: bool,
    owner: &str,
    repo: &str,
    docs_root: &str,
) -> Result<Option<VersionRecord>, SiteError> {
    let tree = vcs.ls_tree(&entry.tag)?;
    if tree.is_empty() {
        return Ok(None);
    }

    // The current (latest) version uses the caller-supplied sidebar;
    // older versions carry theirs in the tagged tree.
    let categories = if is_current {
        options.sidebar_categories.clone()
    } else {
        sidebar::load_historical(vcs, &tree, &entry.tag)?
    };

    let markdown: Vec<_> = tree
        .into_iter()
        .filter(|object| object.path.ends_with(".md") || object.path.ends_with(".mdx"))
        .collect();
    let markdown_paths: Vec<String> = markdown.iter().map(|object| object.path.clone()).collect();
    let docs: Vec<_> = markdown
        .into_iter()
        .filter(|object| object.path.starts_with(&options.content_dir))
        .collect();

    let base_path = if is_current {
        "/".to_owned()
    } else {
        format!("/v{}/", entry.key)
    };

    let ctx = VersionContext {
        vcs,
        tag: &entry.tag,
        key: &entry.key,
        base_path: &base_path,
        content_dir: &options.content_dir,
        docs_root,
        docs: &docs,
        markdown_paths: &markdown_paths,
    };

    let mut contents = Vec::with_capacity(categories.len());
    for category in &categories {
        let mut pages = Vec::with_capacity(category.items.len());
        for item in &category.items {
            if let Some(page) = resolve_item(&ctx, item)? {
                pages.push(page);
            }
        }
        contents.push(CategoryContents {
            title: category.title.clone(),
            pages,
        });
    }

    let major_minor = entry
        .semver
        .rsplit_once('.')
        .map_or(entry.semver.clone(), |(head, _)| head.to_owned());

    Ok(Some(VersionRecord {
        id: entry.key.clone(),
        base_path,
        major_minor,
        contents,
        owner: owner.to_owned(),
        repo: repo.to_owned(),
        tag: entry.tag.clone(),
    }))
}
