//! End-to-end generation: tags in, page-creation requests out.

use std::path::{Path, PathBuf};

use vd_vcs::{Vcs, VcsError};

use crate::assembler::{self, VersionFailure, VersionRecord};
use crate::emitter::{EmitError, PageSink, emit_pages};
use crate::sidebar::SidebarCategories;
use crate::versions::resolve_versions;

/// Inputs for one generation run.
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    /// Path prefix of documentation content within the working copy
    /// (e.g., "source").
    pub content_dir: String,
    /// Working-copy root the VCS accessor was opened with.
    pub root: PathBuf,
    /// GitHub repository as `owner/repo`; names the tag scope and the
    /// origin remote.
    pub github_repo: String,
    /// Sidebar for the current (latest) version. Older versions read
    /// theirs from their tagged trees.
    pub sidebar_categories: SidebarCategories,
}

/// Outcome of a generation run.
#[derive(Debug)]
pub struct GenerateSummary {
    /// Assembled versions in descending key order, failed versions
    /// removed.
    pub versions: Vec<VersionRecord>,
    /// Pages handed to the sink (anchors excluded).
    pub pages_created: usize,
    /// Versions dropped from the output, in descending key order.
    pub version_failures: Vec<VersionFailure>,
}

/// Error aborting a whole generation run.
///
/// Per-version failures are not errors at this level; they surface in
/// [`GenerateSummary::version_failures`].
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The configured repository is not of the form `owner/repo`.
    #[error("invalid GitHub repository (expected owner/repo): {0}")]
    InvalidRepo(String),

    /// No tag resolved to a documentation version.
    #[error("no version tags found")]
    NoVersions,

    /// The package-scoped tag pattern could not be built.
    #[error("invalid tag pattern: {0}")]
    TagPattern(#[from] regex::Error),

    /// VCS access failed before version assembly began.
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// The sink rejected a page.
    #[error("page emission failed: {0}")]
    Emit(EmitError),
}

/// Run the whole pipeline: ensure the origin remote, resolve version
/// tags, assemble each version, and emit pages through `sink`.
///
/// # Errors
///
/// Returns [`GenerateError`] when the run cannot proceed at all; a
/// single version failing only drops that version (see
/// [`GenerateSummary::version_failures`]).
pub fn generate(
    vcs: &dyn Vcs,
    options: &GenerateOptions,
    sink: &mut dyn PageSink,
) -> Result<GenerateSummary, GenerateError> {
    let (owner, repo) = options
        .github_repo
        .split_once('/')
        .ok_or_else(|| GenerateError::InvalidRepo(options.github_repo.clone()))?;

    ensure_origin(vcs, &options.github_repo)?;

    let tags = vcs.tags()?;
    let versions = resolve_versions(&tags, repo)?;
    if versions.is_empty() {
        return Err(GenerateError::NoVersions);
    }
    tracing::info!(
        count = versions.entries().len(),
        current = versions.current_key().unwrap_or_default(),
        "Resolved versions"
    );

    let docs_root = docs_root(vcs, &options.root)?;
    let (records, failures) = assembler::assemble(vcs, options, &versions, owner, repo, &docs_root);

    let pages_created = emit_pages(&records, sink).map_err(GenerateError::Emit)?;
    Ok(GenerateSummary {
        versions: records,
        pages_created,
        version_failures: failures,
    })
}

/// Add and fetch the origin remote when the clone has none.
///
/// Shallow CI checkouts often lack both the remote and the tag history;
/// the fetch pulls the tags the resolver needs.
fn ensure_origin(vcs: &dyn Vcs, github_repo: &str) -> Result<(), VcsError> {
    let has_origin = vcs.remotes()?.iter().any(|remote| remote.name == "origin");
    if has_origin {
        return Ok(());
    }

    let url = format!("https://github.com/{github_repo}.git");
    tracing::info!(url = %url, "Adding missing origin remote");
    vcs.add_remote("origin", &url)?;
    vcs.fetch()
}

/// Working-copy root relative to the repository toplevel, as a
/// `/`-separated string ("" when they coincide).
fn docs_root(vcs: &dyn Vcs, root: &Path) -> Result<String, VcsError> {
    let toplevel = vcs.toplevel()?;
    let absolute = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());

    match absolute.strip_prefix(&toplevel) {
        Ok(relative) => Ok(relative.to_string_lossy().replace('\\', "/")),
        Err(_) => {
            tracing::warn!(
                root = %root.display(),
                toplevel = %toplevel,
                "Working copy is not under the repository toplevel"
            );
            Ok(String::new())
        }
    }
}
