//! TOML Configuration File Support
//!
//! Centralized configuration for the chat widget, with an optional TOML file
//! at `~/.config/tokenchat/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables (`TOKENCHAT_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:8000"
//! cookie = "sessionid=abc; csrftoken=xyz"
//! csrf_cookie_name = "csrftoken"
//!
//! [widget]
//! history_limit = 50
//! initial_tokens = 100
//! single_flight = true
//!
//! [logging]
//! level = "info"
//! file = "/tmp/tokenchat.log"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::DEFAULT_CSRF_COOKIE;

/// Default chat server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default number of history messages requested on mount
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[server]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerToml {
    /// Chat server base URL
    pub base_url: Option<String>,

    /// Cookie string sent with every request; also the CSRF token source
    pub cookie: Option<String>,

    /// Name of the cookie holding the CSRF token
    pub csrf_cookie_name: Option<String>,
}

/// `[widget]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetToml {
    /// How many history messages to load on mount
    pub history_limit: Option<usize>,

    /// Token balance before the server reports one
    pub initial_tokens: Option<i64>,

    /// Reject a send while another is in flight
    pub single_flight: Option<bool>,
}

/// `[logging]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingToml {
    /// Log filter (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log file path
    pub file: Option<PathBuf>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenchatToml {
    /// Server section
    pub server: ServerToml,

    /// Widget section
    pub widget: WidgetToml,

    /// Logging section
    pub logging: LoggingToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved widget configuration
///
/// Use [`load_config`] to build one from all sources, then apply CLI
/// overrides with [`ConfigOverrides::apply`].
#[derive(Clone, Debug)]
pub struct WidgetConfig {
    /// Chat server base URL
    pub base_url: String,

    /// Cookie string (session + CSRF cookie)
    pub cookie: Option<String>,

    /// Name of the CSRF cookie inside `cookie`
    pub csrf_cookie_name: String,

    /// History messages requested on mount
    pub history_limit: usize,

    /// Starting token balance
    pub initial_tokens: i64,

    /// Reject a send while another is in flight
    pub single_flight: bool,

    /// Log filter directive
    pub log_level: String,

    /// Log file override
    pub log_file: Option<PathBuf>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    pub(crate) source: ConfigSource,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cookie: None,
            csrf_cookie_name: DEFAULT_CSRF_COOKIE.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            initial_tokens: 0,
            single_flight: true,
            log_level: "info".to_string(),
            log_file: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl WidgetConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check values that would only fail later at request time
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a base URL that is not
    /// absolute http(s), a zero history limit, or an empty CSRF cookie name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::ValidationError(format!("base_url '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "base_url '{}' must use http or https",
                self.base_url
            )));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::ValidationError(
                "history_limit must be greater than zero".to_string(),
            ));
        }
        if self.csrf_cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "csrf_cookie_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/tokenchat/config.toml` or
/// `~/.config/tokenchat/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tokenchat").join("config.toml"))
}

/// Default log file: `$XDG_STATE_HOME/tokenchat/tokenchat.log`, falling back
/// to the cache dir and then the temp dir
#[must_use]
pub fn default_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("tokenchat")
        .join("tokenchat.log")
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the merged values fail validation. A missing file is not an error.
pub fn load_config() -> Result<WidgetConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<WidgetConfig, ConfigError> {
    let mut config = WidgetConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: TokenchatToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut WidgetConfig, toml: &TokenchatToml) {
    if let Some(ref url) = toml.server.base_url {
        config.base_url = url.clone();
    }
    if toml.server.cookie.is_some() {
        config.cookie = toml.server.cookie.clone();
    }
    if let Some(ref name) = toml.server.csrf_cookie_name {
        config.csrf_cookie_name = name.clone();
    }

    if let Some(limit) = toml.widget.history_limit {
        config.history_limit = limit;
    }
    if let Some(tokens) = toml.widget.initial_tokens {
        config.initial_tokens = tokens;
    }
    if let Some(single_flight) = toml.widget.single_flight {
        config.single_flight = single_flight;
    }

    if let Some(ref level) = toml.logging.level {
        config.log_level = level.clone();
    }
    if toml.logging.file.is_some() {
        config.log_file = toml.logging.file.clone();
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut WidgetConfig) {
    apply_env_with(config, |key| std::env::var(key).ok());
}

/// Apply overrides read through `lookup`
///
/// Unparseable numeric or boolean values are ignored with a warning.
fn apply_env_with<F>(config: &mut WidgetConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("TOKENCHAT_BASE_URL") {
        config.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(cookie) = lookup("TOKENCHAT_COOKIE") {
        config.cookie = Some(cookie);
        config.source = ConfigSource::Env;
    }
    if let Some(name) = lookup("TOKENCHAT_CSRF_COOKIE") {
        config.csrf_cookie_name = name;
        config.source = ConfigSource::Env;
    }
    if let Some(raw) = lookup("TOKENCHAT_INITIAL_TOKENS") {
        match raw.trim().parse::<i64>() {
            Ok(tokens) => {
                config.initial_tokens = tokens;
                config.source = ConfigSource::Env;
            }
            Err(_) => tracing::warn!(value = %raw, "Ignoring TOKENCHAT_INITIAL_TOKENS"),
        }
    }
    if let Some(raw) = lookup("TOKENCHAT_HISTORY_LIMIT") {
        match raw.trim().parse::<usize>() {
            Ok(limit) => {
                config.history_limit = limit;
                config.source = ConfigSource::Env;
            }
            Err(_) => tracing::warn!(value = %raw, "Ignoring TOKENCHAT_HISTORY_LIMIT"),
        }
    }
    if let Some(raw) = lookup("TOKENCHAT_SINGLE_FLIGHT") {
        config.single_flight = raw != "0" && raw.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
    if let Some(level) = lookup("TOKENCHAT_LOG_LEVEL") {
        config.log_level = level;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Base URL override
    pub base_url: Option<String>,

    /// Cookie string override
    pub cookie: Option<String>,

    /// Initial token balance override
    pub initial_tokens: Option<i64>,

    /// History limit override
    pub history_limit: Option<usize>,

    /// Single-flight guard override
    pub single_flight: Option<bool>,

    /// Log level override
    pub log_level: Option<String>,

    /// Log file override
    pub log_file: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override
    #[must_use]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set cookie override
    #[must_use]
    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.cookie = Some(cookie);
        self
    }

    /// Set initial balance override
    #[must_use]
    pub fn with_initial_tokens(mut self, tokens: i64) -> Self {
        self.initial_tokens = Some(tokens);
        self
    }

    /// Set history limit override
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Set single-flight override
    #[must_use]
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = Some(enabled);
        self
    }

    /// Set log level override
    #[must_use]
    pub fn with_log_level(mut self, level: String) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set log file override
    #[must_use]
    pub fn with_log_file(mut self, path: PathBuf) -> Self {
        self.log_file = Some(path);
        self
    }

    fn is_empty(&self) -> bool {
        self.base_url.is_none()
            && self.cookie.is_none()
            && self.initial_tokens.is_none()
            && self.history_limit.is_none()
            && self.single_flight.is_none()
            && self.log_level.is_none()
            && self.log_file.is_none()
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut WidgetConfig) {
        if self.is_empty() {
            return;
        }
        config.source = ConfigSource::Cli;

        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
        }
        if let Some(ref cookie) = self.cookie {
            config.cookie = Some(cookie.clone());
        }
        if let Some(tokens) = self.initial_tokens {
            config.initial_tokens = tokens;
        }
        if let Some(limit) = self.history_limit {
            config.history_limit = limit;
        }
        if let Some(enabled) = self.single_flight {
            config.single_flight = enabled;
        }
        if let Some(ref level) = self.log_level {
            config.log_level = level.clone();
        }
        if let Some(ref path) = self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = WidgetConfig::default();

        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.initial_tokens, 0);
        assert_eq!(config.csrf_cookie_name, "csrftoken");
        assert!(config.single_flight);
        assert!(config.cookie.is_none());
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_paths() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("tokenchat/config.toml"));
        }
        assert!(default_log_path().ends_with("tokenchat/tokenchat.log"));
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_apply_full_toml() {
        let toml_config: TokenchatToml = toml::from_str(
            r#"
[server]
base_url = "https://chat.example.com"
cookie = "sessionid=s; csrftoken=t"
csrf_cookie_name = "csrftoken"

[widget]
history_limit = 20
initial_tokens = 100
single_flight = false

[logging]
level = "debug"
file = "/tmp/tc.log"
"#,
        )
        .unwrap();

        let mut config = WidgetConfig::default();
        apply_toml_config(&mut config, &toml_config);

        assert_eq!(config.base_url, "https://chat.example.com");
        assert_eq!(config.cookie.as_deref(), Some("sessionid=s; csrftoken=t"));
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.initial_tokens, 100);
        assert!(!config.single_flight);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/tc.log")));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let file = toml_file(
            r#"
[widget]
initial_tokens = 7
"#,
        );

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert!(config.config_file_path.is_some());
        // Env vars may leak in from the test environment; the file value is
        // only overridden when TOKENCHAT_INITIAL_TOKENS is set.
        if std::env::var("TOKENCHAT_INITIAL_TOKENS").is_err() {
            assert_eq!(config.initial_tokens, 7);
        }
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        let config = load_config_from_path(Some(path)).unwrap();
        assert!(config.config_file_path.is_none());
        assert!(
            config.source() == ConfigSource::Default || config.source() == ConfigSource::Env,
            "Expected Default or Env source, got: {:?}",
            config.source()
        );
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = toml_file(
            r#"
[widget
history_limit = "lots"
"#,
        );

        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    // =========================================================================
    // Environment Tests
    // =========================================================================

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("TOKENCHAT_BASE_URL", "http://10.0.0.1:9000"),
            ("TOKENCHAT_COOKIE", "csrftoken=zz"),
            ("TOKENCHAT_INITIAL_TOKENS", "42"),
            ("TOKENCHAT_HISTORY_LIMIT", "10"),
            ("TOKENCHAT_SINGLE_FLIGHT", "false"),
        ]);
        let mut config = WidgetConfig::default();
        apply_env_with(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.base_url, "http://10.0.0.1:9000");
        assert_eq!(config.cookie.as_deref(), Some("csrftoken=zz"));
        assert_eq!(config.initial_tokens, 42);
        assert_eq!(config.history_limit, 10);
        assert!(!config.single_flight);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_env_bad_numbers_ignored() {
        let vars = env(&[
            ("TOKENCHAT_INITIAL_TOKENS", "lots"),
            ("TOKENCHAT_HISTORY_LIMIT", "-1"),
        ]);
        let mut config = WidgetConfig::default();
        apply_env_with(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.initial_tokens, 0);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_env_overrides_file() {
        let toml_config: TokenchatToml =
            toml::from_str("[widget]\ninitial_tokens = 5\n").unwrap();
        let vars = env(&[("TOKENCHAT_INITIAL_TOKENS", "9")]);

        let mut config = WidgetConfig::default();
        apply_toml_config(&mut config, &toml_config);
        apply_env_with(&mut config, |k| vars.get(k).cloned());

        assert_eq!(config.initial_tokens, 9);
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = WidgetConfig {
            base_url: "localhost:8000/chat".to_string(),
            ..WidgetConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let config = WidgetConfig {
            history_limit: 0,
            ..WidgetConfig::default()
        };
        assert!(config.validate().is_err());

        let config = WidgetConfig {
            csrf_cookie_name: " ".to_string(),
            ..WidgetConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // ConfigOverrides Tests
    // =========================================================================

    #[test]
    fn test_cli_overrides_env() {
        let mut config = WidgetConfig {
            base_url: "http://env-host".to_string(),
            ..WidgetConfig::default()
        };
        config.set_source(ConfigSource::Env);

        ConfigOverrides::new()
            .with_base_url("http://cli-host".to_string())
            .with_initial_tokens(3)
            .with_single_flight(false)
            .apply(&mut config);

        assert_eq!(config.base_url, "http://cli-host");
        assert_eq!(config.initial_tokens, 3);
        assert!(!config.single_flight);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = WidgetConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_config_error_display() {
        let read_err = ConfigError::ReadError {
            path: PathBuf::from("/test/path"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = read_err.to_string();
        assert!(msg.contains("/test/path"));
        assert!(msg.contains("Failed to read"));
    }
}
