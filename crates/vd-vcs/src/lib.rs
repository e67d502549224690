//! Git history access for the vd documentation generator.
//!
//! This crate provides:
//! - [`Vcs`]: capability trait for read-only repository inspection
//!   (remotes, tags, historical trees and blobs)
//! - [`GitRepo`]: implementation backed by the `git` binary
//! - [`MockVcs`]: in-memory implementation for tests (behind the `mock`
//!   feature)
//!
//! # Path Convention
//!
//! All tree and blob paths are relative to the working-copy root the
//! accessor was opened with, which may be a subdirectory of the actual
//! repository (the repository toplevel is available via
//! [`Vcs::toplevel`]).
//!
//! # Thread Safety
//!
//! [`GitRepo`] serializes git subprocess invocations internally, so a
//! single instance can be shared across threads without corrupting
//! concurrent historical reads.

mod git;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod vcs;

pub use git::GitRepo;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVcs;
pub use vcs::{Remote, SYMLINK_MODE, TreeObject, Vcs, VcsError};
