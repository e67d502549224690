//! `vd build` command implementation.

use std::path::PathBuf;

use clap::Args;
use vd_config::{CliSettings, Config};
use vd_site::{GenerateOptions, generate, parse_sidebar_config};
use vd_vcs::GitRepo;

use crate::error::CliError;
use crate::output::Output;
use crate::sink::JsonSink;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover vd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Working-copy root of the documentation repository (overrides config).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Content directory prefix within the working copy (overrides config).
    #[arg(long)]
    content_dir: Option<String>,

    /// GitHub repository as owner/repo (overrides config).
    #[arg(long)]
    github_repo: Option<String>,

    /// Sidebar YAML file for the current version (overrides config).
    #[arg(long)]
    sidebar_file: Option<PathBuf>,

    /// Output directory for page documents.
    #[arg(short, long, default_value = "pages")]
    output: PathBuf,

    /// Enable verbose output (per-version progress logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the sidebar file is
    /// unusable, or generation aborts.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Build CLI settings from args
        let cli_settings = CliSettings {
            root: self.root,
            content_dir: self.content_dir,
            github_repo: self.github_repo,
            sidebar_file: self.sidebar_file,
        };

        // Load config
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let github_repo = config.require_github_repo()?.to_owned();

        // The current version's sidebar lives in the working copy, not
        // in the tag history.
        let sidebar_path = &config.docs_resolved.sidebar_file;
        let sidebar_text = std::fs::read_to_string(sidebar_path)?;
        let sidebar_categories = parse_sidebar_config(&sidebar_text)
            .map_err(|err| CliError::Validation(format!("invalid sidebar file: {err}")))?
            .ok_or_else(|| {
                CliError::Validation(format!(
                    "no sidebar_categories in {}",
                    sidebar_path.display()
                ))
            })?;

        output.info(&format!("Repository: {github_repo}"));
        output.info(&format!(
            "Working copy: {}",
            config.docs_resolved.root.display()
        ));
        output.info(&format!("Output directory: {}", self.output.display()));

        let vcs = GitRepo::open(&config.docs_resolved.root);
        let options = GenerateOptions {
            content_dir: config.docs_resolved.content_dir.clone(),
            root: config.docs_resolved.root.clone(),
            github_repo,
            sidebar_categories,
        };

        let mut sink = JsonSink::new(&self.output);
        let summary = generate(&vcs, &options, &mut sink)?;

        for failure in &summary.version_failures {
            output.warning(&format!(
                "Skipped version {} ({}): {}",
                failure.key, failure.tag, failure.reason
            ));
        }
        output.success(&format!(
            "Created {} pages across {} versions",
            summary.pages_created,
            summary.versions.len()
        ));
        Ok(())
    }
}
