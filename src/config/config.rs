use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::api::client::{DEFAULT_ACCEPTED_STATUSES, DEFAULT_ENDPOINT};
use crate::api::transport::TransportKind;
use crate::utils::app_paths::AppPaths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub defaults: DefaultsConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Lookup endpoint; `s` and `l` are appended as query parameters
    pub endpoint: String,

    /// "http" (native client) or "curl" (subprocess)
    pub transport: TransportKind,

    /// Executable used by the curl transport
    pub curl_program: String,

    /// Status codes that are not treated as transport failures
    pub accepted_statuses: Vec<i32>,

    /// Request timeout in seconds (HTTP transport only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Search term used when --query is not given
    pub query: String,

    /// Language code used when --language is not given
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode box drawing for the formatted view
    pub use_glyphs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            transport: TransportKind::Http,
            curl_program: "curl".to_string(),
            accepted_statuses: DEFAULT_ACCEPTED_STATUSES.to_vec(),
            timeout_secs: None,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            query: "οὐσία".to_string(),
            language: "grc".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { use_glyphs: true }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            debug!(target: "config", "No config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        debug!(target: "config", "Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        AppPaths::config_file()
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# langcurl Configuration File
# Location: ~/.config/langcurl/config.toml (Linux)
#           ~/Library/Application Support/langcurl/config.toml (macOS)
#           %APPDATA%\langcurl\config.toml (Windows)

[client]
# Lookup endpoint of the langnet service
endpoint = "http://localhost:5050/api/q"

# Transport: "http" (built-in client) or "curl" (runs the curl executable)
transport = "http"

# Program used when transport = "curl"
curl_program = "curl"

# Status codes that still get their body parsed.
# 0 is curl's clean exit, 400 carries structured error payloads.
accepted_statuses = [0, 200, 400]

# Request timeout in seconds (leave commented to use the client default)
# timeout_secs = 30

[defaults]
# Used when --query / --language are not given
query = "οὐσία"
language = "grc"

[display]
# Set to false for ASCII-only tables
use_glyphs = true
"#
        .to_string()
    }
}
