//! Configuration management for the UserData file manager
//!
//! Configuration is loaded once at startup and never mutated afterwards.
//! Sources, lowest priority first: built-in defaults, an optional
//! `config.toml` in the working directory, then `FM_*` environment variables.

use config::{Config, ConfigError, Environment, File};
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: i64 = 3300;
const DEFAULT_LOG_LEVEL: &str = "INFO";
const DEFAULT_USERDATA_PATH: &str = "/app/UserData";
const DEFAULT_BODY_LIMIT_MB: i64 = 1024;

/// Startup configuration for the file manager
#[derive(Debug, Deserialize, Clone)]
pub struct FileManagerConfig {
    /// IP address the HTTP listener binds to
    /// Environment: FM_BIND_ADDRESS
    pub bind_address: String,

    /// HTTP port
    /// Environment: FM_PORT
    pub port: u16,

    /// One of DEBUG, INFO, WARN, ERROR
    /// Environment: FM_LOG_LEVEL
    pub log_level: String,

    /// Directory exposed as `/UserData`
    /// Environment: FM_USERDATA_PATH
    pub userdata_path: String,

    /// Maximum request body size in MB
    /// Environment: FM_BODY_LIMIT_MB
    pub body_limit_mb: u64,
}

impl Default for FileManagerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT as u16,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            userdata_path: DEFAULT_USERDATA_PATH.to_string(),
            body_limit_mb: DEFAULT_BODY_LIMIT_MB as u64,
        }
    }
}

impl FileManagerConfig {
    /// Load configuration from defaults, `config.toml` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", DEFAULT_PORT)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("userdata_path", DEFAULT_USERDATA_PATH)?
            .set_default("body_limit_mb", DEFAULT_BODY_LIMIT_MB)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("FM").try_parsing(true))
            .build()?;

        let config: FileManagerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.userdata_path.trim().is_empty() {
            return Err(ConfigError::Message(
                "userdata_path cannot be empty".into(),
            ));
        }

        if self.body_limit_mb == 0 {
            return Err(ConfigError::Message(
                "body_limit_mb must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get maximum request body size in bytes
    pub fn body_limit_bytes(&self) -> usize {
        (self.body_limit_mb as usize).saturating_mul(1024 * 1024)
    }

    /// Map the configured level name to a log filter. Unknown names fall back to INFO.
    pub fn log_level_filter(&self) -> LevelFilter {
        match self.log_level.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => LevelFilter::Debug,
            "INFO" => LevelFilter::Info,
            "WARN" => LevelFilter::Warn,
            "ERROR" => LevelFilter::Error,
            _ => LevelFilter::Info,
        }
    }

    /// Make the UserData path absolute, create it if missing and canonicalize it.
    ///
    /// The returned path is the root every client path is resolved against.
    pub fn prepare_root(&self) -> std::io::Result<PathBuf> {
        let absolute = std::path::absolute(Path::new(&self.userdata_path))?;
        std::fs::create_dir_all(&absolute)?;
        absolute.canonicalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = FileManagerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.listen_socket(), "0.0.0.0:3300");
        assert_eq!(config.body_limit_bytes(), 1024 * 1024 * 1024);
    }

    #[test]
    fn rejects_zero_port_and_empty_root() {
        let config = FileManagerConfig {
            port: 0,
            ..FileManagerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FileManagerConfig {
            userdata_path: "  ".into(),
            ..FileManagerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FileManagerConfig {
            body_limit_mb: 0,
            ..FileManagerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn log_level_names() {
        let mut config = FileManagerConfig::default();
        for (name, expected) in [
            ("DEBUG", LevelFilter::Debug),
            ("warn", LevelFilter::Warn),
            ("ERROR", LevelFilter::Error),
            ("", LevelFilter::Info),
            ("verbose", LevelFilter::Info),
        ] {
            config.log_level = name.into();
            assert_eq!(config.log_level_filter(), expected, "level {name:?}");
        }
    }

    #[test]
    fn prepare_root_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let config = FileManagerConfig {
            userdata_path: temp.path().join("a/UserData").to_string_lossy().into(),
            ..FileManagerConfig::default()
        };

        let root = config.prepare_root().unwrap();
        assert!(root.is_dir());
        assert!(root.is_absolute());
        assert!(root.ends_with("a/UserData"));
    }
}
