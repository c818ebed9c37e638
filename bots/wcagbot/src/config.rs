// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration handling for wcagbot

use crate::catalog::Level;
use crate::error::{Result, WcagError};
use crate::report::OutputFormat;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target conformance level for `validate`
    #[serde(default = "default_level", deserialize_with = "deserialize_level")]
    pub level: Level,

    /// Default output format (text, json, sarif)
    #[serde(default = "default_format")]
    pub format: String,

    /// Report warnings as well as errors
    #[serde(default = "default_true")]
    pub include_warnings: bool,

    /// File extensions the scanner picks up
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names to skip while scanning
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            include_warnings: true,
            extensions: default_extensions(),
            exclude: default_exclude(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Parsed output format
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.format.parse().map_err(WcagError::Config)
    }
}

fn default_level() -> Level {
    Level::AA
}

/// Accept the level in any case, as the CLI does
fn deserialize_level<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Level, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec!["html".to_string(), "htm".to_string(), "xhtml".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "target".to_string(),
        "dist".to_string(),
        "build".to_string(),
        "vendor".to_string(),
        "coverage".to_string(),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// EnvFilter directive; overrides the --verbose default when set
    #[serde(default)]
    pub level: Option<String>,
}

/// Load configuration from a path
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    if let Err(e) = config.output_format() {
        return Err(WcagError::Config(format!("{} in {}", e, path.display())));
    }

    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Get the default config path for a repository
pub fn default_config_path() -> PathBuf {
    PathBuf::from("wcagbot.toml")
}
