//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::storage::default_database_path;

/// Skillverse configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub user: UserConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database file; the platform data directory is used when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// The learner every request acts on behalf of
    pub username: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            username: "demo".to_string(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid server address: {}:{}", self.host, self.port))
    }
}

impl DatabaseSettings {
    /// Configured database path, or the default location
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_database_path)
    }
}

/// Keys accepted by [`Config::get`] and [`Config::set`]
pub const CONFIG_KEYS: [&str; 4] = ["server.host", "server.port", "database.path", "user.username"];

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("SKILLVERSE_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("skillverse")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or the defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Overwrite the config file with the defaults
    pub fn reset() -> anyhow::Result<Self> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(anyhow!("server.host must not be empty"));
        }
        if self.user.username.trim().is_empty() {
            return Err(anyhow!("user.username must not be empty"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "server.host" => Ok(self.server.host.clone()),
            "server.port" => Ok(self.server.port.to_string()),
            "database.path" => Ok(self.database.resolved_path().display().to_string()),
            "user.username" => Ok(self.user.username.clone()),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `skillverse config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "server.host" => {
                if value.trim().is_empty() {
                    return Err(anyhow!("server.host must not be empty"));
                }
                self.server.host = value.trim().to_string();
            }
            "server.port" => {
                self.server.port = value
                    .parse()
                    .with_context(|| format!("Invalid port value: {}", value))?;
            }
            "database.path" => {
                self.database.path = if value.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "user.username" => {
                if value.trim().is_empty() {
                    return Err(anyhow!("user.username must not be empty"));
                }
                self.user.username = value.trim().to_string();
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `skillverse config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// All (key, value) pairs
    pub fn list(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.user.username, "demo");
        assert!(config.database.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.user.username, "demo");
    }

    #[test]
    fn test_blank_username_rejected() {
        let result = Config::from_toml(
            r#"
            [user]
            username = ""
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_get_and_set() {
        let mut config = Config::default();

        config.set("server.port", "9090").unwrap();
        config.set("user.username", "ada").unwrap();
        config.set("database.path", "/tmp/skills.db").unwrap();

        assert_eq!(config.get("server.port").unwrap(), "9090");
        assert_eq!(config.get("user.username").unwrap(), "ada");
        assert_eq!(config.get("database.path").unwrap(), "/tmp/skills.db");

        assert!(config.set("server.port", "not-a-port").is_err());
        assert!(config.set("user.username", " ").is_err());
        assert!(config.set("unknown.key", "x").is_err());
        assert!(config.get("unknown.key").is_err());
    }

    #[test]
    fn test_list_covers_all_keys() {
        let keys: Vec<&str> = Config::default().list().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, CONFIG_KEYS.to_vec());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.set("database.path", "/var/lib/skillverse.db").unwrap();

        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_socket_addr() {
        let addr = Config::default().server.socket_addr().unwrap();
        assert_eq!(addr.port(), 5000);
    }
}
