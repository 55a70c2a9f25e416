//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/labtable/labtable.toml`
//! 3. Local config: `<dir>/.labtable.toml`
//! 4. Environment variables: `LABTABLE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// CSV output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CsvConfig {
    /// Field delimiter, a single ASCII character
    pub delimiter: char,
    /// Quote every field, not only those that need it
    pub quote_all: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote_all: false,
        }
    }
}

/// Raw CSV config for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCsvConfig {
    pub delimiter: Option<char>,
    pub quote_all: Option<bool>,
}

impl CsvConfig {
    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawCsvConfig) -> Self {
        Self {
            delimiter: overlay.delimiter.unwrap_or(self.delimiter),
            quote_all: overlay.quote_all.unwrap_or(self.quote_all),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub label_heading: Option<String>,
    pub renaming_offset: Option<usize>,
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub csv: RawCsvConfig,
}

/// Unified configuration for labtable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Heading of the row label column (default: "process")
    pub label_heading: String,
    /// Levels below the forest root whose node names are not prefixed with
    /// their parent's name (1: rows are processes, 2: rows are samples)
    pub renaming_offset: usize,
    /// Directory for relative export paths
    pub output_dir: PathBuf,
    /// CSV output settings
    pub csv: CsvConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            label_heading: "process".to_string(),
            renaming_offset: 1,
            output_dir: PathBuf::from("."),
            csv: CsvConfig::default(),
        }
    }
}

/// Get the XDG config directory for labtable.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "labtable").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("labtable.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".labtable.toml")
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

/// Expand `~`, `$VAR`, and `${VAR}` in a path string.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.output_dir.to_string_lossy().as_ref());
        self.output_dir = PathBuf::from(expanded);
    }

    /// Overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            label_heading: overlay
                .label_heading
                .clone()
                .unwrap_or_else(|| self.label_heading.clone()),
            renaming_offset: overlay.renaming_offset.unwrap_or(self.renaming_offset),
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            csv: self.csv.merge(&overlay.csv),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.labtable.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), local_dir)
    }

    /// Load settings from an explicit global config file (tests, `--config`).
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            let raw = load_raw_settings(global_path)?;
            current = current.merge_with(&raw);
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply LABTABLE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("LABTABLE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("label_heading") {
            settings.label_heading = val;
        }
        if let Ok(val) = config.get_int("renaming_offset") {
            settings.renaming_offset = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("renaming_offset must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("csv.delimiter") {
            let mut chars = val.chars();
            settings.csv.delimiter = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(ApplicationError::Config {
                        message: format!("csv.delimiter must be one character: {val:?}"),
                    })
                }
            };
        }
        if let Ok(val) = config.get_bool("csv.quote_all") {
            settings.csv.quote_all = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if !self.csv.delimiter.is_ascii() || self.csv.delimiter == '"' {
            return Err(ApplicationError::Config {
                message: format!("invalid csv.delimiter {:?}", self.csv.delimiter),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# labtable configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/labtable/labtable.toml
#   Local:  <dir>/.labtable.toml
#   Env:    LABTABLE_* environment variables (nested keys use "__",
#           e.g. LABTABLE_CSV__DELIMITER=";")

# Heading of the row label column
# label_heading = "process"

# Levels below the exported object whose node names keep their type name.
# 1 for lab notebooks (rows are processes), 2 for sample series (rows are samples)
# renaming_offset = 1

# Directory for relative export paths
# output_dir = "."

[csv]
# Field delimiter
# delimiter = ","

# Quote every field
# quote_all = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
