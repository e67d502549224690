//! CLI error types.

use vd_config::ConfigError;
use vd_site::GenerateError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Generate(#[from] GenerateError),

    #[error("{0}")]
    Validation(String),
}
