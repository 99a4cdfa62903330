//! # Configuration
//!
//! Optional `thoughtline.toml`:
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [display]
//! enabled = true
//! ```
//!
//! Precedence: CLI flag > environment > file > default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thoughtline_core::LineageError;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "thoughtline.toml";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Console rendering of accepted thoughts on stderr.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration.
    ///
    /// - An explicit `path` must exist and parse.
    /// - Without one, `thoughtline.toml` in the working directory is used if present.
    /// - Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, LineageError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, LineageError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            LineageError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(LineageError::IoError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            LineageError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }

    /// Parse config text.
    pub fn parse(contents: &str) -> Result<Self, LineageError> {
        toml::from_str(contents)
            .map_err(|e| LineageError::SerializationError(format!("Invalid config: {}", e)))
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// - `DISABLE_THOUGHT_LOGGING=true` turns console display off.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup("DISABLE_THOUGHT_LOGGING")
            && value.trim().eq_ignore_ascii_case("true")
        {
            self.display.enabled = false;
        }
        self
    }

    /// Apply CLI flag overrides.
    #[must_use]
    pub fn with_server_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================
