//! Configuration management for versioned-docs generation.
//!
//! Parses `vd.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.ga_tracking_id`
//! - `site.algolia_api_key`
//! - `site.algolia_index_name`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the working-copy root.
    pub root: Option<PathBuf>,
    /// Override the content directory prefix.
    pub content_dir: Option<String>,
    /// Override the GitHub repository (`owner/repo`).
    pub github_repo: Option<String>,
    /// Override the current-version sidebar file.
    pub sidebar_file: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "vd.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Static site branding, navigation, and analytics values. Carried
    /// through to templates verbatim; nothing here affects generation.
    pub site: SiteConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    root: Option<String>,
    content_dir: Option<String>,
    github_repo: Option<String>,
    sidebar_file: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Working-copy root the generator opens.
    pub root: PathBuf,
    /// Path prefix of documentation content within the working copy.
    pub content_dir: String,
    /// GitHub repository as `owner/repo`.
    pub github_repo: String,
    /// YAML file holding the current version's `sidebar_categories`.
    pub sidebar_file: PathBuf,
}

/// Static site values (branding, navigation, analytics).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name shown in the header.
    pub site_name: Option<String>,
    /// HTML page title.
    pub page_title: Option<String>,
    /// Canonical base URL of the published site.
    pub base_url: Option<String>,
    /// Twitter handle for social cards.
    pub twitter_handle: Option<String>,
    /// Google Analytics tracking ID.
    pub ga_tracking_id: Option<String>,
    /// Algolia search API key.
    pub algolia_api_key: Option<String>,
    /// Algolia search index name.
    pub algolia_index_name: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.algolia_api_key`").
        field: String,
        /// Error message.
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `vd.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root) = &settings.root {
            self.docs_resolved.root.clone_from(root);
        }
        if let Some(content_dir) = &settings.content_dir {
            self.docs_resolved.content_dir.clone_from(content_dir);
        }
        if let Some(github_repo) = &settings.github_repo {
            self.docs_resolved.github_repo.clone_from(github_repo);
        }
        if let Some(sidebar_file) = &settings.sidebar_file {
            self.docs_resolved.sidebar_file.clone_from(sidebar_file);
        }
    }

    /// Get the validated `owner/repo` repository name.
    ///
    /// Use this instead of accessing `docs_resolved.github_repo`
    /// directly when the command requires a repository.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the value is missing or not
    /// of the form `owner/repo`.
    pub fn require_github_repo(&self) -> Result<&str, ConfigError> {
        let repo = &self.docs_resolved.github_repo;
        require_non_empty(repo, "docs.github_repo")?;
        let valid = repo
            .split_once('/')
            .is_some_and(|(owner, name)| !owner.is_empty() && !name.is_empty());
        if !valid {
            return Err(ConfigError::Validation(format!(
                "docs.github_repo must be of the form owner/repo, got: {repo}"
            )));
        }
        Ok(repo)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            site: SiteConfig::default(),
            docs_resolved: DocsConfig {
                root: base.to_path_buf(),
                content_dir: "docs/source".to_owned(),
                github_repo: String::new(),
                sidebar_file: base.join("sidebar.yml"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file. The repository name
    /// is validated lazily via [`Config::require_github_repo`] so CLI
    /// settings can still supply it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.docs_resolved.content_dir, "docs.content_dir")?;
        if self.docs_resolved.content_dir.starts_with('/') {
            return Err(ConfigError::Validation(
                "docs.content_dir must be relative to the working-copy root".to_owned(),
            ));
        }
        if !self.docs_resolved.github_repo.is_empty() {
            self.require_github_repo()?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref id) = self.site.ga_tracking_id {
            self.site.ga_tracking_id = Some(expand::expand_env(id, "site.ga_tracking_id")?);
        }
        if let Some(ref key) = self.site.algolia_api_key {
            self.site.algolia_api_key = Some(expand::expand_env(key, "site.algolia_api_key")?);
        }
        if let Some(ref name) = self.site.algolia_index_name {
            self.site.algolia_index_name =
                Some(expand::expand_env(name, "site.algolia_index_name")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            root: resolve(self.docs.root.as_deref(), "."),
            content_dir: self
                .docs
                .content_dir
                .clone()
                .unwrap_or_else(|| "docs/source".to_owned()),
            github_repo: self.docs.github_repo.clone().unwrap_or_default(),
            sidebar_file: resolve(self.docs.sidebar_file.as_deref(), "sidebar.yml"),
        };
    }
}
