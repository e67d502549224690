//! Versioned documentation assembly.
//!
//! Turns a git working copy's tag history into a structured collection
//! of versioned documentation pages:
//!
//! 1. Resolve one tag per major version ([`resolve_versions`])
//! 2. Read the historical file tree and sidebar configuration per tag
//! 3. Extract front-matter-delimited markdown, following symlinks
//! 4. Emit one page-creation request per content page through a
//!    [`PageSink`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use vd_site::{GenerateOptions, SidebarCategory, SidebarItem, generate};
//! use vd_vcs::GitRepo;
//!
//! let vcs = GitRepo::open("docs");
//! let options = GenerateOptions {
//!     content_dir: "source".to_owned(),
//!     root: "docs".into(),
//!     github_repo: "acme/docs".to_owned(),
//!     sidebar_categories: vec![SidebarCategory {
//!         title: None,
//!         items: vec![SidebarItem::Doc("index".to_owned())],
//!     }],
//! };
//!
//! let mut sink = vd_site::NullSink;
//! let summary = generate(&vcs, &options, &mut sink)?;
//! println!("created {} pages", summary.pages_created);
//! # Ok(())
//! # }
//! ```
//!
//! Failures are isolated per version: a version with a missing sidebar
//! or broken doc reference is dropped (and reported in
//! [`GenerateSummary::version_failures`]) while every other version
//! still produces pages.

pub(crate) mod assembler;
pub(crate) mod content;
pub(crate) mod emitter;
mod error;
pub(crate) mod frontmatter;
pub(crate) mod generate;
pub(crate) mod sidebar;
pub(crate) mod versions;

pub use assembler::{CategoryContents, VersionFailure, VersionRecord};
pub use content::Page;
pub use emitter::{EmitError, NullSink, PAGE_TEMPLATE, PageContext, PageSink};
pub use error::SiteError;
pub use generate::{GenerateError, GenerateOptions, GenerateSummary, generate};
pub use sidebar::{SidebarCategories, SidebarCategory, SidebarItem, parse_sidebar_config};
pub use versions::{ResolvedVersions, VersionEntry, resolve_versions};
