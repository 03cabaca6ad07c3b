//! Server configuration
//!
//! Loaded from a TOML file named by the `ARCADIA_CONFIG` environment
//! variable; every field has a default so a missing file or an empty
//! document is a working configuration.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

/// Environment variable naming the config file path
pub const CONFIG_ENV_VAR: &str = "ARCADIA_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,
    /// Database file path; defaults to the platform data directory
    pub database_path: Option<PathBuf>,
    /// Session lifetime in days
    pub session_ttl_days: i64,
    /// Session cookie name
    pub session_cookie: String,
    /// Mark the session cookie Secure (HTTPS deployments)
    pub cookie_secure: bool,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            database_path: None,
            session_ttl_days: 7,
            session_cookie: "arcadia_session".to_string(),
            cookie_secure: false,
            allowed_origins: vec!["http://localhost:8080".to_string()],
        }
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not determine data directory")]
    NoDataDir,
}

impl ServerConfig {
    /// Load from the given file, or fall back to defaults when no path
    /// is configured
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                Ok(toml::from_str(&raw)?)
            }
            None => Ok(Self::default()),
        }
    }

    /// The database file location, resolving the platform data
    /// directory when no explicit path is configured
    pub fn resolve_database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("dev", "arcadia", "arcadia").ok_or(ConfigError::NoDataDir)?;
        Ok(dirs.data_dir().join("arcadia.db"))
    }

    /// Session lifetime in seconds, for the cookie Max-Age
    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl_days * 86_400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.session_ttl_days, 7);
        assert_eq!(config.session_cookie, "arcadia_session");
        assert!(!config.cookie_secure);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: ServerConfig = toml::from_str(
            r#"
            bind_addr = "0.0.0.0:9000"
            session_ttl_days = 1
            database_path = "/tmp/test.db"
            "#,
        )
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.session_ttl_days, 1);
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/test.db")));
        // Untouched fields keep their defaults
        assert_eq!(config.session_cookie, "arcadia_session");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arcadia.toml");
        fs::write(&path, "bind_addr = \"127.0.0.1:7777\"").unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:7777");

        assert!(ServerConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_explicit_database_path_wins() {
        let config = ServerConfig {
            database_path: Some(PathBuf::from("/tmp/explicit.db")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_database_path().unwrap(),
            PathBuf::from("/tmp/explicit.db")
        );
    }
}
