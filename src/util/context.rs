//! Global context for model operations.
//!
//! Provides centralized access to the working directory, the merged tool
//! configuration and the location of the model manifest.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::MANIFEST_NAME;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};
use crate::util::fs::find_upward;

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Merged global and project configuration
    config: Config,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext for the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    ///
    /// The project config is looked up next to the manifest when one exists,
    /// otherwise in the working directory itself.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let project_root = find_upward(&cwd, MANIFEST_NAME)
            .and_then(|m| m.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| cwd.clone());
        let global = global_config_path().unwrap_or_default();
        let config = load_config(&global, &project_config_path(&project_root));

        GlobalContext {
            cwd,
            config,
            verbose: false,
            color: true,
        }
    }

    /// Replace the loaded configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Find `Model.toml` starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Option<PathBuf> {
        find_upward(&self.cwd, MANIFEST_NAME)
    }

    /// Directory relative paths in the model are resolved against.
    pub fn project_root(&self) -> PathBuf {
        self.find_manifest()
            .and_then(|m| m.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.cwd.clone())
    }
}
