//! Mock VCS implementation for testing.
//!
//! Provides [`MockVcs`] for exercising the generation pipeline without
//! a real repository.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::vcs::{Remote, SYMLINK_MODE, TreeObject, Vcs, VcsError};

/// In-memory VCS for testing.
///
/// Tags, trees, and blob content are configured with builder methods.
/// Blob reads are counted so tests can assert that a code path performed
/// no historical fetches.
///
/// # Example
///
/// ```
/// use vd_vcs::{MockVcs, Vcs};
///
/// let vcs = MockVcs::new()
///     .with_tag("v1.0.0")
///     .with_file("v1.0.0", "source/index.md", "---\ntitle: Home\n---\nHi");
///
/// assert_eq!(vcs.tags().unwrap(), vec!["v1.0.0"]);
/// assert_eq!(vcs.show_calls(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MockVcs {
    /// Tag names in the order they should be reported (callers are
    /// expected to configure descending version order, as git would).
    tags: RwLock<Vec<String>>,
    trees: RwLock<HashMap<String, Vec<TreeObject>>>,
    blobs: RwLock<HashMap<(String, String), String>>,
    remotes: RwLock<Vec<Remote>>,
    toplevel: RwLock<String>,
    show_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MockVcs {
    /// Create an empty mock repository with toplevel `/repo`.
    #[must_use]
    pub fn new() -> Self {
        let mock = Self::default();
        *mock.toplevel.write().unwrap() = "/repo".to_owned();
        mock
    }

    /// Append a tag (tags are reported in insertion order).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_tag(self, tag: impl Into<String>) -> Self {
        self.tags.write().unwrap().push(tag.into());
        self
    }

    /// Add a configured remote.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_remote(self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.remotes.write().unwrap().push(Remote {
            name: name.into(),
            url: url.into(),
        });
        self
    }

    /// Set the repository toplevel path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_toplevel(self, toplevel: impl Into<String>) -> Self {
        *self.toplevel.write().unwrap() = toplevel.into();
        self
    }

    /// Add a tree entry without blob content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_entry(
        self,
        rev: impl Into<String>,
        mode: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        self.trees
            .write()
            .unwrap()
            .entry(rev.into())
            .or_default()
            .push(TreeObject {
                mode: mode.into(),
                path: path.into(),
            });
        self
    }

    /// Add a regular file with content at a revision.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(
        self,
        rev: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let rev = rev.into();
        let path = path.into();
        let mock = self.with_entry(rev.clone(), "100644", path.clone());
        mock.blobs.write().unwrap().insert((rev, path), content.into());
        mock
    }

    /// Add a symbolic link at a revision.
    ///
    /// The blob content of a symlink is its target text.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_symlink(
        self,
        rev: impl Into<String>,
        path: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let rev = rev.into();
        let path = path.into();
        let mock = self.with_entry(rev.clone(), SYMLINK_MODE, path.clone());
        mock.blobs.write().unwrap().insert((rev, path), target.into());
        mock
    }

    /// Number of blob reads performed so far.
    pub fn show_calls(&self) -> usize {
        self.show_calls.load(Ordering::Relaxed)
    }

    /// Number of fetches performed so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::Relaxed)
    }
}

impl Vcs for MockVcs {
    fn remotes(&self) -> Result<Vec<Remote>, VcsError> {
        Ok(self.remotes.read().unwrap().clone())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<(), VcsError> {
        self.remotes.write().unwrap().push(Remote {
            name: name.to_owned(),
            url: url.to_owned(),
        });
        Ok(())
    }

    fn fetch(&self) -> Result<(), VcsError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn tags(&self) -> Result<Vec<String>, VcsError> {
        Ok(self.tags.read().unwrap().clone())
    }

    fn show(&self, rev: &str, path: &str) -> Result<String, VcsError> {
        self.show_calls.fetch_add(1, Ordering::Relaxed);
        self.blobs
            .read()
            .unwrap()
            .get(&(rev.to_owned(), path.to_owned()))
            .cloned()
            .ok_or_else(|| VcsError::NotFound {
                rev: rev.to_owned(),
                path: path.to_owned(),
            })
    }

    fn ls_tree(&self, rev: &str) -> Result<Vec<TreeObject>, VcsError> {
        Ok(self
            .trees
            .read()
            .unwrap()
            .get(rev)
            .cloned()
            .unwrap_or_default())
    }

    fn toplevel(&self) -> Result<String, VcsError> {
        Ok(self.toplevel.read().unwrap().clone())
    }
}
