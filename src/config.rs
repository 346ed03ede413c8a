use crate::client::DEFAULT_BASE_URL;
use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_username: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default = "default_start_path")]
    pub start_path: String,

    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default)]
    pub logging: LogConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        let config = Self::from_toml(&content)?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api_username.is_empty() {
            return Err(ConfigError::MissingField("api_username".to_string()).into());
        }

        if self.api_key.is_empty() {
            return Err(ConfigError::MissingField("api_key".to_string()).into());
        }

        if self.base_url.is_empty() {
            return Err(ConfigError::MissingField("base_url".to_string()).into());
        }
        if !self.base_url.starts_with("http") {
            return Err(ConfigError::InvalidValue(format!(
                "base_url must start with http(s): {}",
                self.base_url
            ))
            .into());
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidValue(
                "request_timeout must be greater than 0".to_string(),
            )
            .into());
        }

        if self.start_path.is_empty() {
            return Err(ConfigError::InvalidValue("start_path cannot be empty".to_string()).into());
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_start_path() -> String {
    "/facilities".to_string()
}

fn default_max_pages() -> usize {
    1
}

fn default_output_dir() -> String {
    "json_data".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "rgp.log".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RgpError;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_toml(
            r#"
            api_username = "apiname"
            api_key = "apikey"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, 30);
        assert_eq!(config.start_path, "/facilities");
        assert_eq!(config.max_pages, 1);
        assert!(config.proxy.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.filename, "rgp.log");
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            api_username = "apiname"
            api_key = "apikey"
            base_url = "https://sandbox.example.com/v1"
            request_timeout = 5
            proxy = "socks5://127.0.0.1:9050"
            start_path = "/checkins/facility/AAA"
            max_pages = 4
            output_dir = "out"

            [logging]
            level = "debug"
            directory = "var/log"
            "#,
        )
        .unwrap();

        assert_eq!(config.request_timeout, 5);
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:9050"));
        assert_eq!(config.max_pages, 4);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.directory, "var/log");
        assert_eq!(config.logging.filename, "rgp.log");
    }

    #[test]
    fn test_missing_credentials() {
        let err = Config::from_toml(r#"api_username = "apiname""#).unwrap_err();
        assert!(matches!(
            err,
            RgpError::Configuration(ConfigError::MissingField(ref field)) if field == "api_key"
        ));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_toml(
            r#"
            api_username = "a"
            api_key = "b"
            base_url = "ftp://example.com"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RgpError::Configuration(ConfigError::InvalidValue(_))));

        let err = Config::from_toml(
            r#"
            api_username = "a"
            api_key = "b"
            request_timeout = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RgpError::Configuration(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_unparseable_toml() {
        let err = Config::from_toml("api_username = ").unwrap_err();
        assert!(matches!(err, RgpError::Configuration(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, RgpError::Configuration(ConfigError::FileRead(_))));
    }
}
