//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/deptree/deptree.toml`
//! 3. Environment variables: `DEPTREE_*` prefix

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::services::InputFormat;
use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_format: Option<InputFormat>,
    pub show_ids: Option<bool>,
    pub records_file: Option<PathBuf>,
}

/// Unified configuration for deptree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Format for records files whose extension is not recognized
    pub default_format: Option<InputFormat>,
    /// Include department ids in rendered labels
    pub show_ids: bool,
    /// Records file used when none is given on the command line
    pub records_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: None,
            show_ids: true,
            records_file: None,
        }
    }
}

/// Get the XDG config directory for deptree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "deptree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("deptree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Boolean env values as the `config` crate spells them.
fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_format: overlay.default_format.or(self.default_format),
            show_ids: overlay.show_ids.unwrap_or(self.show_ids),
            records_file: overlay
                .records_file
                .clone()
                .or_else(|| self.records_file.clone()),
        }
    }

    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(path) = &self.records_file {
            let expanded = expand_env_vars(path.to_string_lossy().as_ref());
            self.records_file = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings from the XDG global config and the environment.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with layered precedence, reading the global config from
    /// `global_path` when given and present.
    pub fn load_from(global_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = global_path {
            if path.exists() {
                debug!("loading global config: {}", path.display());
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply DEPTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("DEPTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_format") {
            let format = InputFormat::from_str(&val, true).map_err(|e| ApplicationError::Config {
                message: format!("DEPTREE_DEFAULT_FORMAT: {}", e),
            })?;
            settings.default_format = Some(format);
        }
        if let Ok(val) = config.get_string("show_ids") {
            settings.show_ids = parse_flag(&val).ok_or_else(|| ApplicationError::Config {
                message: format!("DEPTREE_SHOW_IDS: expected true or false, got '{}'", val),
            })?;
        }
        if let Ok(val) = config.get_string("records_file") {
            settings.records_file = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Render the settings as TOML, as shown by `deptree config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
