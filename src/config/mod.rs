//! # Configuration
//!
//! TOML-backed configuration for the console, organized into sections:
//!
//! - [`ConsoleConfig`] - Display name and banner for the interactive console
//! - [`BackendConfig`] - Where the bundled backend keeps its snapshot
//! - [`SecurityConfig`] - Admin self-registration policy
//! - [`LoggingConfig`] - Log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ebus::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Console: {}", config.console.name);
//!     Ok(())
//! }
//! ```
//!
//! ## File format
//!
//! ```toml
//! [console]
//! name = "Ebus Management System"
//! welcome_message = "Book bus tickets from anywhere"
//!
//! [backend]
//! data_dir = "./data"
//!
//! [security]
//! admin_registration_code = "EBUS_ADMIN_2024"
//!
//! [logging]
//! level = "info"
//! file = "ebus.log"
//! ```
//!
//! Every section has working defaults, so a missing section never stops
//! startup; `ebus init` writes the full default file for editing.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Console presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub name: String,
    pub welcome_message: String,
}

/// Settings for the bundled in-process backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Directory holding the backend's JSON snapshot.
    pub data_dir: String,
    /// Skip snapshot loading and saving entirely; all data lives in memory.
    #[serde(default)]
    pub ephemeral: bool,
}

impl BackendConfig {
    /// Snapshot file location inside `data_dir`.
    pub fn snapshot_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("backend.json")
    }
}

/// Security and registration policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Code a user must supply to self-register an administrator account.
    /// Deployments should replace the shipped default. The configured value
    /// is compared exactly and never written to any log.
    #[serde(default = "default_admin_registration_code")]
    pub admin_registration_code: String,
}

fn default_admin_registration_code() -> String {
    "EBUS_ADMIN_2024".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            name: "Ebus Management System".to_string(),
            welcome_message: "Book bus tickets from anywhere".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            ephemeral: false,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            admin_registration_code: default_admin_registration_code(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("ebus.log".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            console: ConsoleConfig::default(),
            backend: BackendConfig::default(),
            security: SecurityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let config = Config::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let reparsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.console.name, "Ebus Management System");
        assert_eq!(reparsed.backend.data_dir, "./data");
        assert_eq!(reparsed.security.admin_registration_code, "EBUS_ADMIN_2024");
        assert_eq!(reparsed.logging.level, "info");
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [console]
            name = "Metro Ebus"
            welcome_message = "Hello"
            "#,
        )
        .unwrap();
        assert_eq!(config.console.name, "Metro Ebus");
        assert_eq!(config.security.admin_registration_code, "EBUS_ADMIN_2024");
        assert!(!config.backend.ephemeral);
        assert_eq!(config.logging.file.as_deref(), Some("ebus.log"));
    }

    #[test]
    fn test_snapshot_path_joins_data_dir() {
        let backend = BackendConfig {
            data_dir: "/var/lib/ebus".to_string(),
            ephemeral: false,
        };
        assert_eq!(
            backend.snapshot_path(),
            PathBuf::from("/var/lib/ebus/backend.json")
        );
    }
}
