//! Per-version error taxonomy.

use vd_vcs::VcsError;

/// Error aborting the assembly of a single version.
///
/// These never abort the whole run: the assembler logs them, records
/// the failure, and continues with the remaining versions.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// A non-current version has no recognizable sidebar configuration
    /// in its tree.
    #[error("no sidebar configuration found for this version: {tag}")]
    MissingSidebar {
        /// Tag the sidebar was looked up at.
        tag: String,
    },

    /// A recognized config file exists but is in a format this
    /// generator does not parse (the JavaScript config case).
    #[error("unsupported sidebar config format {path} at {tag}")]
    UnsupportedConfig {
        /// Config file path found in the tree.
        path: String,
        /// Tag the config was found at.
        tag: String,
    },

    /// A sidebar item references a doc absent from the version's tree.
    #[error("doc not found: {path}@v{key}")]
    DocNotFound {
        /// Expected markdown file path.
        path: String,
        /// Major version key of the enclosing version.
        key: String,
    },

    /// VCS access failed.
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// A sidebar config or front-matter block failed to parse as YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
