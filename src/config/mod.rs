//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/hosp-locate/config.toml

pub mod defaults;

use crate::constants::query::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::overpass::{default_endpoints, Endpoint};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default values for searches
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Overpass endpoints and timeouts
    #[serde(default)]
    pub overpass: OverpassConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Session cache settings
    #[serde(default)]
    pub session: SessionConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Default values for searches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default search radius in meters
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

/// Overpass settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverpassConfig {
    /// Timeout hint sent with every query, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Endpoints, tried in order
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<Endpoint>,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Session cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Override for the session cache file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_radius() -> f64 {
    DEFAULT_RADIUS
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/search/?api=1&query={lat},{lng}".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=17/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            format: default_format(),
        }
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            endpoints: default_endpoints(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "radius"] => Some(self.defaults.radius.to_string()),
            ["defaults", "format"] => Some(self.defaults.format.clone()),

            ["overpass", "timeout_secs"] => Some(self.overpass.timeout_secs.to_string()),
            ["overpass", "endpoints"] => Some(
                self.overpass
                    .endpoints
                    .iter()
                    .map(|e| e.url.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["session", "cache_path"] => Some(
                self.session
                    .cache_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "radius"] => {
                let radius: f64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid radius value: {}", value))
                })?;
                crate::coord::validate_radius(radius)?;
                self.defaults.radius = radius;
            }
            ["defaults", "format"] => {
                if crate::format::get_formatter(value).is_none() {
                    return Err(Error::Config(format!("Unknown format: {}", value)));
                }
                self.defaults.format = value.to_lowercase();
            }

            ["overpass", "timeout_secs"] => {
                let timeout: u64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
                if !(1..=MAX_TIMEOUT_SECS).contains(&timeout) {
                    return Err(Error::Config(format!(
                        "Timeout must be between 1 and {} seconds",
                        MAX_TIMEOUT_SECS
                    )));
                }
                self.overpass.timeout_secs = timeout;
            }
            ["overpass", "endpoints"] => {
                // Replaces the list; per-endpoint timeouts are edited in the file
                let endpoints: Vec<Endpoint> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(Endpoint::new)
                    .collect();
                if endpoints.is_empty() {
                    return Err(Error::Config("At least one endpoint is required".to_string()));
                }
                self.overpass.endpoints = endpoints;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["session", "cache_path"] => {
                self.session.cache_path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }

            ["url", "default"] => {
                if !self.url.providers.contains_key(value) {
                    return Err(Error::Config(format!("Unknown URL provider: {}", value)));
                }
                self.url.default = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "defaults.radius",
            "defaults.format",
            "overpass.timeout_secs",
            "overpass.endpoints",
            "server.host",
            "server.port",
            "session.cache_path",
            "url.default",
        ]
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.defaults.radius, 5000.0);
        assert_eq!(config.defaults.format, "text");
        assert_eq!(config.overpass.timeout_secs, 25);
        assert_eq!(config.overpass.endpoints.len(), 3);
        assert_eq!(config.server.port, 7879);
        assert!(config.session.cache_path.is_none());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("defaults.radius"), Some("5000".to_string()));

        config.set("defaults.radius", "2500").unwrap();
        assert_eq!(config.get("defaults.radius"), Some("2500".to_string()));
        assert_eq!(config.defaults.radius, 2500.0);

        config.set("defaults.format", "JSON").unwrap();
        assert_eq!(config.defaults.format, "json");
    }

    #[test]
    fn test_set_endpoints() {
        let mut config = Config::default();
        config
            .set("overpass.endpoints", "https://a/api, https://b/api")
            .unwrap();

        assert_eq!(config.overpass.endpoints.len(), 2);
        assert_eq!(config.overpass.endpoints[1].url, "https://b/api");
        assert_eq!(
            config.get("overpass.endpoints"),
            Some("https://a/api,https://b/api".to_string())
        );

        assert!(config.set("overpass.endpoints", " , ").is_err());
    }

    #[test]
    fn test_set_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
        assert!(config.set("defaults.radius", "not_a_number").is_err());
        assert!(config.set("defaults.radius", "-1").is_err());
        assert!(config.set("defaults.format", "pdf").is_err());
        assert!(config.set("url.default", "mapquest").is_err());
        assert!(config.set("server.port", "99999").is_err());
    }

    #[test]
    fn test_set_timeout_bounds() {
        let mut config = Config::default();

        assert!(config.set("overpass.timeout_secs", "18446744073709551615").is_err());
        assert!(config.set("overpass.timeout_secs", "0").is_err());
        assert!(config.set("overpass.timeout_secs", "3601").is_err());
        assert_eq!(config.overpass.timeout_secs, 25);

        config.set("overpass.timeout_secs", "180").unwrap();
        assert_eq!(config.overpass.timeout_secs, 180);
    }

    #[test]
    fn test_session_cache_path() {
        let mut config = Config::default();
        assert_eq!(config.get("session.cache_path"), Some(String::new()));

        config.set("session.cache_path", "/tmp/session.json").unwrap();
        assert_eq!(config.session.cache_path, Some(PathBuf::from("/tmp/session.json")));

        config.set("session.cache_path", "").unwrap();
        assert!(config.session.cache_path.is_none());
    }

    #[test]
    fn test_format_url() {
        let config = Config::default();

        let url = config.format_url(Some("google"), 40.4168, -3.7038).unwrap();
        assert_eq!(
            url,
            "https://www.google.com/maps/search/?api=1&query=40.4168,-3.7038"
        );

        let url = config.format_url(None, 40.4168, -3.7038).unwrap();
        assert!(url.contains("openstreetmap.org"));
        assert!(url.contains("mlat=40.4168"));

        assert!(config.format_url(Some("unknown"), 0.0, 0.0).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.defaults.radius = 1500.0;
        config.overpass.endpoints = vec![
            Endpoint::new("https://a/api").with_timeout(10),
            Endpoint::new("https://b/api"),
        ];
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.defaults.radius, 1500.0);
        assert_eq!(loaded.overpass.endpoints, config.overpass.endpoints);
    }

    #[test]
    fn test_load_creates_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sub").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.defaults.radius, 5000.0);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[overpass]
[[overpass.endpoints]]
url = "http://localhost:12345/api/interpreter"
timeout_secs = 5
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.overpass.timeout_secs, 25);
        assert_eq!(config.overpass.endpoints.len(), 1);
        assert_eq!(config.overpass.endpoints[0].timeout_secs, Some(5));
        assert_eq!(config.defaults.radius, 5000.0);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[defaults]"));
        assert!(toml.contains("[[overpass.endpoints]]"));
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[url.providers]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7879");
    }

    #[test]
    fn test_available_keys() {
        let keys = Config::available_keys();
        for key in &keys {
            assert!(Config::default().get(key).is_some(), "missing getter for {}", key);
        }
    }
}
