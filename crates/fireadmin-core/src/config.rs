//! Application configuration module
//!
//! Provides configuration management with TOML file support,
//! emulator environment variable integration, and sensible defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the Firebase Authentication emulator (`host:port`).
pub const AUTH_EMULATOR_HOST_ENV: &str = "FIREBASE_AUTH_EMULATOR_HOST";

/// Environment variable naming the Cloud Firestore emulator (`host:port`).
pub const FIRESTORE_EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Firebase project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
    /// Overrides the project id found in the service-account key.
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_users_collection")]
    pub users_collection: String,
    #[serde(default = "default_database_id")]
    pub database_id: String,
    /// Per-request HTTP timeout. Unset leaves the client's own default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions for serde
fn default_credentials_path() -> PathBuf {
    PathBuf::from("service-account-key.json")
}

fn default_users_collection() -> String {
    "users".to_string()
}

fn default_database_id() -> String {
    "(default)".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            project_id: None,
            users_collection: default_users_collection(),
            database_id: default_database_id(),
            timeout_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Returns the configuration directory path (~/.config/fireadmin/)
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("fireadmin");
        Ok(config_dir)
    }

    /// Returns the configuration file path (~/.config/fireadmin/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, or return defaults if
    /// the file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from an explicit file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.firebase.timeout_secs == Some(0) {
            anyhow::bail!(
                "Invalid config file {}: firebase.timeout_secs must be greater than zero",
                path.display()
            );
        }

        if config.firebase.users_collection.trim().is_empty() {
            anyhow::bail!(
                "Invalid config file {}: firebase.users_collection must not be empty",
                path.display()
            );
        }

        Ok(config)
    }

    /// Get the Authentication emulator host, if one is configured.
    pub fn auth_emulator_host() -> Option<String> {
        non_empty_var(AUTH_EMULATOR_HOST_ENV)
    }

    /// Get the Firestore emulator host, if one is configured.
    pub fn firestore_emulator_host() -> Option<String> {
        non_empty_var(FIRESTORE_EMULATOR_HOST_ENV)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();

        assert_eq!(
            config.firebase.credentials_path,
            PathBuf::from("service-account-key.json")
        );
        assert!(config.firebase.project_id.is_none());
        assert_eq!(config.firebase.users_collection, "users");
        assert_eq!(config.firebase.database_id, "(default)");
        assert_eq!(config.firebase.timeout_secs, None);

        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_load_from_toml() {
        let toml_content = r#"
[firebase]
credentials_path = "/etc/fireadmin/key.json"
project_id = "staging-project"
users_collection = "profiles"
database_id = "secondary"
timeout_secs = 5

[logging]
level = "debug"
"#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(
            config.firebase.credentials_path,
            PathBuf::from("/etc/fireadmin/key.json")
        );
        assert_eq!(config.firebase.project_id, Some("staging-project".to_string()));
        assert_eq!(config.firebase.users_collection, "profiles");
        assert_eq!(config.firebase.database_id, "secondary");
        assert_eq!(config.firebase.timeout_secs, Some(5));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_partial_toml() {
        let toml_content = r#"
[firebase]
project_id = "only-this"
"#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.firebase.project_id, Some("only-this".to_string()));

        // Missing values should use defaults
        assert_eq!(
            config.firebase.credentials_path,
            PathBuf::from("service-account-key.json")
        );
        assert_eq!(config.firebase.users_collection, "users");
        assert_eq!(config.firebase.timeout_secs, None);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path().expect("Failed to get config path");
        assert!(config_path.ends_with("config.toml"));
        assert!(config_path.parent().unwrap().ends_with("fireadmin"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[firebase]\nusers_collection = \"accounts\"\n").unwrap();

        let config = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(config.firebase.users_collection, "accounts");
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("absent.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[firebase\nproject_id = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_from_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[firebase]\ntimeout_secs = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_load_from_rejects_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[firebase]\nusers_collection = \"  \"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        let parsed: Config = toml::from_str(&toml_str).expect("Failed to parse");
        assert_eq!(parsed.firebase.database_id, config.firebase.database_id);
        assert_eq!(parsed.logging.level, config.logging.level);
    }

    #[test]
    fn test_emulator_hosts_unset() {
        temp_env::with_vars_unset([AUTH_EMULATOR_HOST_ENV, FIRESTORE_EMULATOR_HOST_ENV], || {
            assert!(Config::auth_emulator_host().is_none());
            assert!(Config::firestore_emulator_host().is_none());
        });
    }

    #[test]
    fn test_emulator_hosts_set() {
        temp_env::with_vars(
            [
                (AUTH_EMULATOR_HOST_ENV, Some("127.0.0.1:9099")),
                (FIRESTORE_EMULATOR_HOST_ENV, Some("localhost:8080")),
            ],
            || {
                assert_eq!(
                    Config::auth_emulator_host(),
                    Some("127.0.0.1:9099".to_string())
                );
                assert_eq!(
                    Config::firestore_emulator_host(),
                    Some("localhost:8080".to_string())
                );
            },
        );
    }

    #[test]
    fn test_blank_emulator_host_is_ignored() {
        temp_env::with_var(AUTH_EMULATOR_HOST_ENV, Some("  "), || {
            assert!(Config::auth_emulator_host().is_none());
        });
    }
}
