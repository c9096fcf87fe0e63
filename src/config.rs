//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// SQLite database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("medconnect").join("medconnect.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./medconnect.db".to_string())
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Origins of the `medconnect-ui` dev server (`trunk serve`)
fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:8080".to_string(),
    ]
}

fn default_max_upload() -> usize {
    10 * 1024 * 1024 // 10 MB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Token lifetime, password hashing and the bootstrap admin account
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,

    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    #[serde(default = "default_admin_name")]
    pub admin_name: String,

    pub admin_email: Option<String>,

    pub admin_password: Option<String>,
}

fn default_token_ttl() -> i64 {
    30
}

fn default_pbkdf2_iterations() -> u32 {
    100_000
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_minutes: default_token_ttl(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            admin_name: default_admin_name(),
            admin_email: None,
            admin_password: None,
        }
    }
}

impl AuthConfig {
    /// Bootstrap admin credentials, only when both halves are configured
    pub fn bootstrap_admin(&self) -> Option<(&str, &str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((self.admin_name.as_str(), email.as_str(), password.as_str()))
            }
            _ => None,
        }
    }
}

/// Dashboard client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_session_file")]
    pub session_file: String,
}

fn default_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_session_file() -> String {
    dirs::config_dir()
        .map(|p| p.join("medconnect").join("session.toml").to_string_lossy().to_string())
        .unwrap_or_else(|| "./medconnect-session.toml".to_string())
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            session_file: default_session_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("medconnect").join("config.toml")),
            Some(PathBuf::from("/etc/medconnect/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Database overrides
        if let Some(path) = var("MEDCONNECT_DB_PATH") {
            self.database.path = path;
        }

        // API overrides
        if let Some(host) = var("MEDCONNECT_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("MEDCONNECT_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Auth overrides
        if let Some(ttl) = var("MEDCONNECT_TOKEN_TTL_MINUTES") {
            if let Ok(t) = ttl.parse() {
                self.auth.token_ttl_minutes = t;
            }
        }
        if let Some(name) = var("MEDCONNECT_ADMIN_NAME") {
            self.auth.admin_name = name;
        }
        if let Some(email) = var("MEDCONNECT_ADMIN_EMAIL") {
            self.auth.admin_email = Some(email);
        }
        if let Some(password) = var("MEDCONNECT_ADMIN_PASSWORD") {
            self.auth.admin_password = Some(password);
        }

        // Client overrides
        if let Some(url) = var("MEDCONNECT_API_URL") {
            self.client.api_url = url;
        }

        // Logging overrides
        if let Some(level) = var("MEDCONNECT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("MEDCONNECT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# MedConnect Configuration
#
# Environment variables override these settings:
# - MEDCONNECT_DB_PATH
# - MEDCONNECT_API_HOST
# - MEDCONNECT_API_PORT
# - MEDCONNECT_API_URL
# - MEDCONNECT_TOKEN_TTL_MINUTES
# - MEDCONNECT_ADMIN_NAME / MEDCONNECT_ADMIN_EMAIL / MEDCONNECT_ADMIN_PASSWORD
# - MEDCONNECT_LOG_LEVEL
# - MEDCONNECT_LOG_FORMAT

[database]
# SQLite database file
path = "~/.local/share/medconnect/medconnect.db"

[api]
# API server host
host = "127.0.0.1"

# API server port
port = 8000

# Allowed CORS origins (the medconnect-ui dev server)
cors_origins = ["http://localhost:8080", "http://127.0.0.1:8080"]

# Maximum multipart upload size (bytes)
max_upload_bytes = 10485760

[auth]
# Session token lifetime (minutes)
token_ttl_minutes = 30

# PBKDF2-SHA256 rounds for password hashing
pbkdf2_iterations = 100000

# Admin account created at startup when both email and password are set
admin_name = "Administrator"
# admin_email = "admin@clinic.example"
# admin_password = ""

[client]
# Base URL the dashboard talks to
api_url = "http://127.0.0.1:8000"

# Where the dashboard persists its session (token + role)
session_file = "~/.config/medconnect/session.toml"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/medconnect/medconnect.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8000);
        assert_eq!(config.auth.token_ttl_minutes, 30);
        assert_eq!(config.client.api_url, "http://127.0.0.1:8000");
        assert!(config.auth.bootstrap_admin().is_none());
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8000);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.api.cors_origins, Config::default().api.cors_origins);
    }

    #[test]
    fn test_cors_defaults_match_ui_dev_server() {
        let config = Config::default();
        assert_eq!(
            config.api.cors_origins,
            vec!["http://localhost:8080", "http://127.0.0.1:8080"]
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse("[api]\nport = 9100\n").unwrap();
        assert_eq!(config.api.port, 9100);
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.auth.pbkdf2_iterations, 100_000);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MEDCONNECT_API_PORT", "9000"),
            ("MEDCONNECT_API_URL", "http://clinic.local"),
            ("MEDCONNECT_ADMIN_EMAIL", "root@clinic.local"),
            ("MEDCONNECT_ADMIN_PASSWORD", "s3cret"),
            ("MEDCONNECT_TOKEN_TTL_MINUTES", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.client.api_url, "http://clinic.local");
        assert_eq!(config.auth.token_ttl_minutes, 30);
        assert_eq!(
            config.auth.bootstrap_admin(),
            Some(("Administrator", "root@clinic.local", "s3cret"))
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/medconnect.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nport = \"eighty\"\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
