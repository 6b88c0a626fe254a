//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.native-model/config.toml` - User-wide defaults
//! - Project: `.native-model/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. The configuration
//! controls the names of the values created by the default rules and how the
//! host tool-chain probe behaves; the model itself lives in `Model.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the per-user and per-project configuration directory.
pub const CONFIG_DIR_NAME: &str = ".native-model";

/// Tool configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Names used by the default-provisioning rules
    pub defaults: DefaultsConfig,

    /// Host tool-chain probing
    pub probe: ProbeConfig,
}

/// Overrides for the values the default rules add to empty axes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DefaultsConfig {
    /// Name of the host platform added when no platform is declared
    pub platform: Option<String>,

    /// Name of the flavor added when no flavor is declared
    pub flavor: Option<String>,

    /// Build types added when none are declared
    pub build_types: Option<Vec<String>>,
}

/// Settings for the host tool-chain probe.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Whether the probe runs at all; unset means enabled
    pub enabled: Option<bool>,

    /// Path to the C compiler (e.g., /usr/bin/clang)
    pub cc: Option<PathBuf>,

    /// Path to the C++ compiler (e.g., /usr/bin/clang++)
    pub cxx: Option<PathBuf>,

    /// Path to the archiver (e.g., /usr/bin/llvm-ar)
    pub ar: Option<PathBuf>,
}

impl ProbeConfig {
    /// Whether host probing should run.
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.defaults.platform.is_some() {
            self.defaults.platform = other.defaults.platform;
        }
        if other.defaults.flavor.is_some() {
            self.defaults.flavor = other.defaults.flavor;
        }
        if other.defaults.build_types.is_some() {
            self.defaults.build_types = other.defaults.build_types;
        }

        if other.probe.enabled.is_some() {
            self.probe.enabled = other.probe.enabled;
        }
        if other.probe.cc.is_some() {
            self.probe.cc = other.probe.cc;
        }
        if other.probe.cxx.is_some() {
            self.probe.cxx = other.probe.cxx;
        }
        if other.probe.ar.is_some() {
            self.probe.ar = other.probe.ar;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.native-model/config.toml)
/// 2. Global config (~/.native-model/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.native-model).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME))
}

/// Get the global config path (~/.native-model/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.native-model/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join("config.toml")
}
