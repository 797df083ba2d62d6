//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treekit/treekit.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `TREEKIT_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::SettingsError;
use crate::tree_traits::DEFAULT_EMPTY_MARKER;

/// How depth and path-sum queries walk the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Traversal {
    /// Plain recursion, uses the call stack
    #[default]
    Recursive,
    /// Explicit heap stack, safe for degenerate trees
    Iterative,
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traversal::Recursive => write!(f, "recursive"),
            Traversal::Iterative => write!(f, "iterative"),
        }
    }
}

impl FromStr for Traversal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recursive" => Ok(Traversal::Recursive),
            "iterative" => Ok(Traversal::Iterative),
            other => Err(format!("unknown traversal '{other}', expected recursive or iterative")),
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub traversal: Option<Traversal>,
    pub empty_marker: Option<String>,
}

/// Unified configuration for treekit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Traversal strategy for depth and max-sum queries
    pub traversal: Traversal,
    /// Label for the missing sibling when rendering binary trees
    pub empty_marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            traversal: Traversal::default(),
            empty_marker: DEFAULT_EMPTY_MARKER.to_string(),
        }
    }
}

/// Get the XDG config directory for treekit.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treekit").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treekit.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            traversal: overlay.traversal.unwrap_or(self.traversal),
            empty_marker: overlay
                .empty_marker
                .clone()
                .unwrap_or_else(|| self.empty_marker.clone()),
        }
    }

    /// Load settings with layered precedence, reading the global config from
    /// the XDG location.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_from(global_config_path().as_deref(), config_file)
    }

    /// Load settings from an explicit global config path.
    ///
    /// `config_file` must exist when given; the global file is skipped when
    /// it does not exist.
    #[instrument(level = "debug")]
    pub fn load_from(
        global_config: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(path) = config_file {
            debug!("config file: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply TREEKIT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREEKIT").prefix_separator("_"))
            .build()
            .map_err(|e| SettingsError::Env {
                message: e.to_string(),
            })?;

        if let Ok(val) = config.get_string("traversal") {
            settings.traversal = val
                .parse()
                .map_err(|message| SettingsError::Env { message })?;
        }
        if let Ok(val) = config.get_string("empty_marker") {
            settings.empty_marker = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Serialize(e.to_string()))
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treekit configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treekit/treekit.toml
#   File:   --config <FILE>
#   Env:    TREEKIT_* environment variables

# Traversal for depth and max-sum queries: "recursive" or "iterative".
# Use "iterative" for very deep (list-shaped) trees.
# traversal = "recursive"

# Label printed for the missing sibling of a single child in `show`
# empty_marker = "∅"
"#
        .to_string()
    }
}
