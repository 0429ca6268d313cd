use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the weather backend API
    pub api_base_url: String,

    /// City shown before any selection is made
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Geolocation acquisition settings
    #[serde(default)]
    pub location: LocationConfig,
}

/// Bounds for coordinate acquisition. These are the only explicit
/// timeouts in the core; network calls rely on the transport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationConfig {
    pub high_accuracy: bool,
    pub timeout_secs: u64,
    pub maximum_age_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_secs: 15,
            maximum_age_secs: 10,
        }
    }
}

fn default_city() -> String {
    "Kyiv".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: std::env::var("SKYCAST_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            default_city: default_city(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base_url).context("Invalid api_base_url")?;

        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!(
                "api_base_url must use http or https scheme, got: {}",
                url.scheme()
            );
        }
        if url.host().is_none() {
            anyhow::bail!("api_base_url must have a host");
        }
        if self.location.timeout_secs == 0 {
            anyhow::bail!("location.timeout_secs must be greater than 0");
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Application config directory (also hosts the key-value store file)
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast"))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_city, "Kyiv");
    }

    #[test]
    fn test_default_location_bounds() {
        let location = LocationConfig::default();
        assert!(location.high_accuracy);
        assert_eq!(location.timeout_secs, 15);
        assert_eq!(location.maximum_age_secs, 10);
    }

    #[test]
    fn test_rejects_bad_scheme() {
        let config = Config {
            api_base_url: "ftp://example.com".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.api_base_url, config.api_base_url);
    }
}
