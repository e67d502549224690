//! VCS capability trait and supporting types.
//!
//! The generator never inspects repository state directly; everything
//! goes through [`Vcs`] so the pipeline can be tested against an
//! in-memory implementation and the git backend can be swapped out.

/// File mode string git uses for symbolic links in tree listings.
pub const SYMLINK_MODE: &str = "120000";

/// A configured remote of the working copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Remote {
    /// Remote name (e.g., "origin").
    pub name: String,
    /// Fetch URL.
    pub url: String,
}

/// One entry of a recursive tree listing at a revision.
///
/// Immutable snapshot of repository state at a tag; `path` is relative
/// to the working-copy root the accessor was opened with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeObject {
    /// File mode string (e.g., "100644", "120000").
    pub mode: String,
    /// Path relative to the working-copy root.
    pub path: String,
}

impl TreeObject {
    /// True if this entry is a symbolic link.
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.mode == SYMLINK_MODE
    }
}

/// Parse one `ls-tree -r` row into a [`TreeObject`].
///
/// Rows look like `100644 blob a1b2c3...\tsource/index.md`. The mode is
/// everything before the first space and the path everything after the
/// last tab, so paths containing tabs survive intact.
#[must_use]
pub fn parse_tree_row(row: &str) -> Option<TreeObject> {
    let mode_end = row.find(' ')?;
    let path_start = row.rfind('\t')?;
    if path_start + 1 >= row.len() {
        return None;
    }
    Some(TreeObject {
        mode: row[..mode_end].to_owned(),
        path: row[path_start + 1..].to_owned(),
    })
}

/// VCS access error.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    /// Failed to launch the underlying VCS process.
    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),

    /// The VCS command ran but reported failure.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// Subcommand that failed (e.g., "show", "ls-tree").
        command: String,
        /// Trimmed stderr output.
        stderr: String,
    },

    /// A requested object does not exist at the revision.
    #[error("object not found: {rev}:{path}")]
    NotFound {
        /// Revision the object was requested at.
        rev: String,
        /// Path relative to the working-copy root.
        path: String,
    },
}

/// Read-only repository inspection.
///
/// Implementations must be safe to share across threads, but callers
/// should assume historical reads are serialized internally rather than
/// executed in parallel.
pub trait Vcs: Send + Sync {
    /// List configured remotes.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if the repository cannot be queried.
    fn remotes(&self) -> Result<Vec<Remote>, VcsError>;

    /// Add a named remote.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if the remote cannot be added (e.g., the
    /// name already exists).
    fn add_remote(&self, name: &str, url: &str) -> Result<(), VcsError>;

    /// Fetch from the default remote, including tags.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if the fetch fails.
    fn fetch(&self) -> Result<(), VcsError>;

    /// List tag names sorted by descending version refname
    /// (`--sort=-v:refname`), newest first.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if tags cannot be listed.
    fn tags(&self) -> Result<Vec<String>, VcsError>;

    /// Read raw file content at `rev:path`.
    ///
    /// `path` is relative to the working-copy root.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if the object does not exist or cannot be
    /// read.
    fn show(&self, rev: &str, path: &str) -> Result<String, VcsError>;

    /// List the full recursive tree at a revision.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if the tree cannot be listed.
    fn ls_tree(&self, rev: &str) -> Result<Vec<TreeObject>, VcsError>;

    /// Absolute path of the repository toplevel directory.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if the toplevel cannot be resolved.
    fn toplevel(&self) -> Result<String, VcsError>;
}
