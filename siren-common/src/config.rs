//! Configuration loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument
//! 2. Environment variable (1 and 2 are handled by the binary's argument parser)
//! 3. TOML config file
//! 4. Built-in default
//!
//! The resolved [`ServerConfig`] is built once at start-up and handed to the
//! components that need it. Nothing reads configuration from global state.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Gemini `generateContent` endpoint used when none is configured
pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Default HTTP listen address
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Default oracle request timeout in seconds
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the oracle API key
pub const API_KEY_ENV: &str = "SIREN_GEMINI_API_KEY";

/// Bootstrap configuration loaded from TOML file
///
/// Every key is optional. Missing keys fall through to built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// HTTP listen address, e.g. `127.0.0.1:8080`
    #[serde(default)]
    pub bind: Option<String>,

    /// Database connection string, e.g. `sqlite:///var/lib/siren/siren.db?mode=rwc`
    #[serde(default)]
    pub database_url: Option<String>,

    /// Extraction oracle settings
    #[serde(default)]
    pub oracle: OracleToml,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[oracle]` table of the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OracleToml {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Ask the provider for a bare JSON reply (`responseMimeType`)
    #[serde(default)]
    pub json_response_mode: Option<bool>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub database_url: Option<String>,
    pub api_key: Option<String>,
}

/// Settings for the extraction oracle client
#[derive(Clone)]
pub struct OracleSettings {
    pub api_key: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub json_response_mode: bool,
}

impl std::fmt::Debug for OracleSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleSettings")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("json_response_mode", &self.json_response_mode)
            .finish()
    }
}

impl OracleSettings {
    /// Settings with defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
            json_response_mode: true,
        }
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub database_url: String,
    pub oracle: OracleSettings,
    pub log_level: String,
}

impl ServerConfig {
    /// Merge overrides, TOML values and defaults
    ///
    /// Fails when no usable oracle API key is found.
    pub fn resolve(overrides: ConfigOverrides, toml: TomlConfig) -> Result<Self> {
        let api_key = resolve_api_key(overrides.api_key, toml.oracle.api_key)?;

        let bind = overrides
            .bind
            .or(toml.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let database_url = overrides
            .database_url
            .or(toml.database_url)
            .unwrap_or_else(default_database_url);

        let timeout_secs = match toml.oracle.timeout_secs {
            Some(0) => {
                warn!(
                    "oracle.timeout_secs = 0 is not allowed, using {}s",
                    DEFAULT_ORACLE_TIMEOUT_SECS
                );
                DEFAULT_ORACLE_TIMEOUT_SECS
            }
            Some(secs) => secs,
            None => DEFAULT_ORACLE_TIMEOUT_SECS,
        };

        Ok(Self {
            bind,
            database_url,
            oracle: OracleSettings {
                api_key,
                endpoint: toml
                    .oracle
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
                timeout: Duration::from_secs(timeout_secs),
                json_response_mode: toml.oracle.json_response_mode.unwrap_or(true),
            },
            log_level: toml.logging.level,
        })
    }
}

/// Pick the oracle API key: command line / environment first, then TOML
fn resolve_api_key(cli_or_env: Option<String>, toml_key: Option<String>) -> Result<String> {
    if let Some(key) = cli_or_env.filter(|k| is_valid_key(k)) {
        info!("Oracle API key loaded from command line or environment");
        return Ok(key.trim().to_string());
    }

    if let Some(key) = toml_key.filter(|k| is_valid_key(k)) {
        info!("Oracle API key loaded from TOML config");
        return Ok(key.trim().to_string());
    }

    Err(Error::Config(format!(
        "Oracle API key not configured. Provide it with one of:\n\
         1. Command line: --gemini-api-key <KEY>\n\
         2. Environment: {API_KEY_ENV}=<KEY>\n\
         3. TOML config: [oracle] api_key = \"<KEY>\""
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Load a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the config file if there is one
///
/// An explicitly named file must exist. Without one, the platform default
/// location is tried and silently skipped when absent.
pub fn load_optional_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        return load_toml_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Using config file {}", path.display());
            load_toml_config(&path)
        }
        _ => Ok(TomlConfig::default()),
    }
}

/// Platform config file location: `<config_dir>/siren/siren.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("siren").join("siren.toml"))
}

/// Platform database file location: `<data_local_dir>/siren/siren.db`
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("siren"))
        .unwrap_or_else(|| PathBuf::from("./siren_data"))
        .join("siren.db")
}

/// SQLite connection string for the default database file (created on demand)
pub fn default_database_url() -> String {
    format!("sqlite://{}?mode=rwc", default_database_path().display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   \t"));
    }

    #[test]
    fn test_default_database_url_shape() {
        let url = default_database_url();
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("siren.db?mode=rwc"));
    }

    #[test]
    fn test_oracle_settings_debug_redacts_key() {
        let settings = OracleSettings::new("super-secret");
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
