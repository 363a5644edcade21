// ABOUTME: Logging configuration and environment variable parsing
// ABOUTME: Levels come from NIMTIDE_LOG or RUST_LOG, output targets from flags

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Wrapper for tracing::Level that implements Serialize/Deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(pub Level);

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel(Level::TRACE)),
            "debug" => Ok(LogLevel(Level::DEBUG)),
            "info" => Ok(LogLevel(Level::INFO)),
            "warn" | "warning" => Ok(LogLevel(Level::WARN)),
            "error" => Ok(LogLevel(Level::ERROR)),
            other => anyhow::bail!(
                "Invalid log level: {other}. Must be one of: trace, debug, info, warn, error"
            ),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let level_str = match self.0 {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        serializer.serialize_str(level_str)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<LogLevel, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        LogLevel(level)
    }
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        log_level.0
    }
}

/// Logging configuration for the adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error).
    pub level: LogLevel,

    /// Per-module log level overrides.
    pub module_levels: HashMap<String, LogLevel>,

    /// Mirror events to stdout.
    pub console: bool,

    /// Daily-rolling log file; `None` disables file output.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(Level::INFO),
            module_levels: HashMap::new(),
            console: true,
            file: Some(default_log_file_path()),
        }
    }
}

impl LoggingConfig {
    /// Create a new configuration with environment variable overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides to this configuration.
    ///
    /// NIMTIDE_LOG sets the global level; otherwise RUST_LOG directives
    /// (e.g. "debug" or "nimtide=debug,info") are honored.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(level_str) = env::var("NIMTIDE_LOG") {
            self.level = level_str.parse().context("Invalid NIMTIDE_LOG level")?;
        } else if let Ok(directives) = env::var("RUST_LOG") {
            self.parse_rust_log(&directives)?;
        }

        if env::var("NIMTIDE_LOG_NO_CONSOLE").is_ok() {
            self.console = false;
        }

        if env::var("NIMTIDE_LOG_NO_FILE").is_ok() {
            self.file = None;
        }

        Ok(())
    }

    /// Parse RUST_LOG format directives into this configuration.
    fn parse_rust_log(&mut self, rust_log: &str) -> Result<()> {
        for directive in rust_log.split(',') {
            let directive = directive.trim();
            if directive.is_empty() {
                continue;
            }

            match directive.split_once('=') {
                Some((module, level_str)) => {
                    let level = level_str.parse().context(format!(
                        "Invalid log level '{level_str}' for module '{module}'"
                    ))?;
                    self.module_levels.insert(module.to_string(), level);
                }
                None => {
                    self.level = directive
                        .parse()
                        .context(format!("Invalid global log level '{directive}'"))?;
                }
            }
        }
        Ok(())
    }
}

/// Default log file path: ~/.config/nimtide/nimtide.log
fn default_log_file_path() -> PathBuf {
    match dirs::config_dir() {
        Some(config_dir) => config_dir.join("nimtide").join("nimtide.log"),
        // Fall back to the working directory when no config dir exists
        None => PathBuf::from("nimtide.log"),
    }
}
