// ABOUTME: Completer configuration: where to find the Nim compiler
// ABOUTME: Loads nimtide.toml, then the environment, then PATH discovery

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nimtide_logging::{debug, warn};
use serde::{Deserialize, Serialize};

/// Compiler path used when discovery finds nothing.
pub const DEFAULT_NIM_PATH: &str = "/usr/bin/nim";

/// Environment variable overriding the compiler path.
pub const NIM_PATH_ENV: &str = "NIMTIDE_NIM";

/// Configuration for the idetools adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleterConfig {
    /// Path to the Nim compiler binary.
    pub nim_path: PathBuf,
}

impl Default for CompleterConfig {
    fn default() -> Self {
        Self {
            nim_path: discover_nim(),
        }
    }
}

/// On-disk shape of nimtide.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    nim: NimSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NimSection {
    #[serde(default)]
    path: Option<PathBuf>,
}

impl CompleterConfig {
    /// Load configuration from the user config directory, falling back to
    /// the environment and PATH discovery for anything unspecified.
    pub fn load() -> Result<Self> {
        let dir = dirs::config_dir()
            .context("No user configuration directory available")?
            .join("nimtide");
        Self::load_from_dir(&dir)
    }

    /// Load configuration from `<dir>/nimtide.toml`.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join("nimtide.toml");
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .context(format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&raw)
            .context(format!("Failed to parse {}", path.display()))?;

        Ok(Self {
            nim_path: file.nim.path.unwrap_or_else(discover_nim),
        })
    }
}

/// Find the Nim compiler: NIMTIDE_NIM, then PATH, then /usr/bin/nim.
fn discover_nim() -> PathBuf {
    if let Ok(path) = env::var(NIM_PATH_ENV) {
        return PathBuf::from(path);
    }

    match which::which("nim") {
        Ok(path) => path,
        Err(_) => {
            warn!(fallback = DEFAULT_NIM_PATH, "nim not found on PATH");
            PathBuf::from(DEFAULT_NIM_PATH)
        }
    }
}
