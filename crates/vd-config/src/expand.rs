//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the config field for error reporting.
///
/// # Errors
///
/// Returns [`ConfigError::EnvVar`] when a referenced variable is unset
/// and has no default.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: err.to_string(),
        })
}
