//! Application configuration loading and validation.
//!
//! Configuration lives in a TOML file next to the database directory. Every
//! command falls back to defaults when the file is absent so the tool works
//! in a fresh directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the JSON stores live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the component database, serial registry and presets.
    #[serde(default = "default_db_dir")]
    pub db_dir: PathBuf,
}

fn default_db_dir() -> PathBuf {
    PathBuf::from("DB")
}

/// Defaults applied to generated documents.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    /// Supplier name written into every generated row.
    #[serde(default = "default_supplier")]
    pub supplier: String,
}

fn default_supplier() -> String {
    "TECHRAIL".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_dir: default_db_dir(),
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            supplier: default_supplier(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            document: DocumentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.storage.db_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.db_dir",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.level",
                    reason: format!("unknown level '{other}'"),
                }
                .into())
            }
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.format",
                    reason: format!("unknown format '{other}'"),
                }
                .into())
            }
        }
        Ok(())
    }

    /// Initialize the global tracing subscriber from the logging section.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_apply_when_file_is_absent() {
        let config = Config::load_or_default("does-not-exist.toml").expect("default config");
        assert_eq!(config.storage.db_dir, PathBuf::from("DB"));
        assert_eq!(config.document.supplier, "TECHRAIL");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_file_fills_missing_sections() {
        let file = write_config("[document]\nsupplier = \"ACME\"\n");
        let config = Config::load(file.path()).expect("load config");
        assert_eq!(config.document.supplier, "ACME");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let file = write_config("[logging]\nlevel = \"verbose\"\n");
        let err = Config::load(file.path()).expect_err("should reject");
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let file = write_config("[logging]\nformat = \"xml\"\n");
        assert!(Config::load(file.path()).is_err());
    }
}
