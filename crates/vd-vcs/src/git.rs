//! Git-binary-backed VCS implementation.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use crate::vcs::{Remote, TreeObject, Vcs, VcsError, parse_tree_row};

/// VCS accessor backed by the `git` binary.
///
/// All commands run with the working-copy root as the current
/// directory (`git -C <root>`), so tree and blob paths are relative to
/// that root even when it is a subdirectory of the repository.
///
/// # Thread Safety
///
/// A mutex serializes subprocess invocations. Historical blob reads are
/// not assumed to be safe to interleave, and the pipeline depends on a
/// failed read not corrupting subsequent calls.
pub struct GitRepo {
    root: PathBuf,
    /// Serializes git subprocess execution.
    exec_lock: Mutex<()>,
}

impl GitRepo {
    /// Create an accessor for the working copy at `root`.
    ///
    /// The directory is not validated here; the first command reports
    /// an error if it is not inside a git repository.
    #[must_use]
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exec_lock: Mutex::new(()),
        }
    }

    /// Working-copy root this accessor was opened with.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run a git subcommand and return trimmed-right stdout.
    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let _guard = self.exec_lock.lock().unwrap_or_else(|e| e.into_inner());

        tracing::debug!(args = ?args, root = %self.root.display(), "Running git");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            return Err(VcsError::Command {
                command: args.first().copied().unwrap_or_default().to_owned(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok(stdout.trim_end_matches('\n').to_owned())
    }
}

impl Vcs for GitRepo {
    fn remotes(&self) -> Result<Vec<Remote>, VcsError> {
        let listing = self.run(&["remote", "-v"])?;
        let remotes = listing
            .lines()
            // one fetch and one push row per remote; keep the fetch row
            .filter(|line| line.ends_with("(fetch)"))
            .filter_map(|line| {
                let (name, rest) = line.split_once('\t')?;
                let url = rest.strip_suffix(" (fetch)")?;
                Some(Remote {
                    name: name.to_owned(),
                    url: url.to_owned(),
                })
            })
            .collect();
        Ok(remotes)
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<(), VcsError> {
        self.run(&["remote", "add", name, url])?;
        Ok(())
    }

    fn fetch(&self) -> Result<(), VcsError> {
        self.run(&["fetch"])?;
        Ok(())
    }

    fn tags(&self) -> Result<Vec<String>, VcsError> {
        let listing = self.run(&["tag", "--list", "--sort=-v:refname"])?;
        Ok(listing
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }

    fn show(&self, rev: &str, path: &str) -> Result<String, VcsError> {
        // `./` keeps the path relative to the working-copy root rather
        // than the repository toplevel.
        self.run(&["show", &format!("{rev}:./{path}")])
            .map_err(|err| match err {
                VcsError::Command { stderr, .. }
                    if stderr.contains("does not exist") || stderr.contains("exists on disk") =>
                {
                    VcsError::NotFound {
                        rev: rev.to_owned(),
                        path: path.to_owned(),
                    }
                }
                other => other,
            })
    }

    fn ls_tree(&self, rev: &str) -> Result<Vec<TreeObject>, VcsError> {
        let listing = self.run(&["ls-tree", "-r", rev])?;
        Ok(listing.lines().filter_map(parse_tree_row).collect())
    }

    fn toplevel(&self) -> Result<String, VcsError> {
        self.run(&["rev-parse", "--show-toplevel"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GitRepo>();
    }

    #[test]
    fn test_open_keeps_root() {
        let repo = GitRepo::open("/tmp/docs");
        assert_eq!(repo.root(), Path::new("/tmp/docs"));
    }
}
