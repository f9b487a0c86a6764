//! CLI configuration file
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments (--format, --compact, --fail-on-error)
//! 2. Config file (`--config <PATH>` or `./.bnk.toml`)
//! 3. Built-in defaults

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Project config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".bnk.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: Option<OutputConfig>,

    /// Loading settings
    pub load: Option<LoadConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (json or text)
    pub format: Option<String>,

    /// Pretty-print JSON output
    pub pretty: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Exit with an error if any file fails to load
    pub fail_on_error: Option<bool>,
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the explicit config file, or the project config if one exists.
    ///
    /// An explicit file that cannot be loaded is an error; a broken project
    /// config only produces a warning.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        let config_path = PathBuf::from(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => Ok(config),
            Err(e) => {
                eprintln!(
                    "{} Failed to load project config from {}: {:#}",
                    "Warning:".yellow().bold(),
                    config_path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Configured output format, if any
    pub fn output_format(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.format.as_deref())
    }

    /// Configured pretty-printing, if any
    pub fn pretty(&self) -> Option<bool> {
        self.output.as_ref().and_then(|o| o.pretty)
    }

    /// Configured strictness, if any
    pub fn fail_on_error(&self) -> Option<bool> {
        self.load.as_ref().and_then(|l| l.fail_on_error)
    }
}
