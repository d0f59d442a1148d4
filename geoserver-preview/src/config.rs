// ABOUTME: Configuration file loading, validation, and hierarchical merging for gspreview
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use crate::constants::env;
use crate::image_protocols::Protocol;
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub default_workspace: Option<String>,
    #[serde(default)]
    pub default_zoom: Option<f64>,
    #[serde(default, deserialize_with = "validate_protocol")]
    pub protocol: Option<Protocol>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// HTTP proxy for all GeoServer requests
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let mut paths = Self::get_config_paths();
        // Lowest precedence first so higher ones are merged over it
        paths.reverse();
        Self::load_from_paths(&paths.iter().map(|p| p.as_str()).collect::<Vec<_>>())
    }

    /// Load configuration from specific file paths; later paths override earlier ones.
    /// Missing files are skipped, unreadable or invalid ones are errors.
    pub fn load_from_paths(paths: &[&str]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            if !Path::new(path).is_file() {
                continue;
            }
            log::debug!("Loading config from {}", path);
            config = config.merge(Self::load_from_file(path)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get standard config file paths in order of precedence (highest first)
    pub fn get_config_paths() -> Vec<String> {
        let mut paths = Vec::new();

        // 1. Project-specific config (highest precedence)
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(
                current_dir
                    .join("gspreview.toml")
                    .to_string_lossy()
                    .to_string(),
            );
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(config_home)
                .join("gspreview")
                .join("config.toml");
            paths.push(path.to_string_lossy().to_string());
        }

        // 3. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir
                .join(".config")
                .join("gspreview")
                .join("config.toml");
            paths.push(path.to_string_lossy().to_string());
        }

        paths
    }

    /// Connection settings from `GEOSERVER_URL`, `GEOSERVER_USER`, and
    /// `GEOSERVER_PASSWORD`, read through `lookup`.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Config {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Config {
            url: get(env::URL),
            username: get(env::USER),
            password: get(env::PASSWORD).map(|p| SecretString::new(p.into_boxed_str())),
            ..Default::default()
        }
    }

    pub fn from_env() -> Config {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            url: other.url.or(self.url),
            username: other.username.or(self.username),
            password: other.password.or(self.password),
            default_workspace: other.default_workspace.or(self.default_workspace),
            default_zoom: other.default_zoom.or(self.default_zoom),
            protocol: other.protocol.or(self.protocol),
            log_file: other.log_file.or(self.log_file),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            proxy: other.proxy.or(self.proxy),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(zoom) = self.default_zoom {
            if !(0.0..=20.0).contains(&zoom) {
                return Err(anyhow!(
                    "Invalid default_zoom {}: must be between 0 and 20",
                    zoom
                ));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(anyhow!("Invalid timeout_secs 0: must be at least 1"));
        }

        if let Some(ref url) = self.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!(
                    "Invalid url '{}': must start with http:// or https://",
                    url
                ));
            }
        }

        Ok(())
    }
}

// Custom deserializer for protocol validation
fn validate_protocol<'de, D>(deserializer: D) -> Result<Option<Protocol>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        Some(name) => name.parse::<Protocol>().map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}
