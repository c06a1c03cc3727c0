//! Configuration loading and endpoint resolution
//!
//! The endpoint base URL follows a priority chain:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`WETMAP_API_URL`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Map center/zoom are process-wide constants with TOML overrides.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default inference endpoint base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Bow River Basin coordinates (latitude, longitude)
pub const DEFAULT_MAP_CENTER: (f64, f64) = (51.0447, -114.0719);

/// Default map zoom level
pub const DEFAULT_MAP_ZOOM: u8 = 10;

/// Environment variable consulted for the endpoint base URL
pub const API_URL_ENV_VAR: &str = "WETMAP_API_URL";

/// Application configuration, fixed at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Inference endpoint base URL (no trailing slash)
    pub api_base_url: String,
    /// Map center coordinate (latitude, longitude)
    pub map_center: (f64, f64),
    /// Map zoom level
    pub map_zoom: u8,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            map_center: DEFAULT_MAP_CENTER,
            map_zoom: DEFAULT_MAP_ZOOM,
        }
    }
}

/// On-disk TOML configuration shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api_base_url: Option<String>,
    pub map_center: Option<[f64; 2]>,
    pub map_zoom: Option<u8>,
}

/// Resolve the application configuration.
///
/// `cli_url` wins over the environment, which wins over the TOML file,
/// which wins over compiled defaults.
pub fn resolve_config(cli_url: Option<&str>) -> AppConfig {
    let toml_config = load_config_file()
        .and_then(|path| parse_config_file(&path))
        .unwrap_or_default();

    resolve_with(cli_url, std::env::var(API_URL_ENV_VAR).ok(), toml_config)
}

/// Pure resolution step, separated for testability
pub fn resolve_with(
    cli_url: Option<&str>,
    env_url: Option<String>,
    toml_config: TomlConfig,
) -> AppConfig {
    let mut config = AppConfig::default();

    if let Some([lat, lon]) = toml_config.map_center {
        config.map_center = (lat, lon);
    }
    if let Some(zoom) = toml_config.map_zoom {
        config.map_zoom = zoom;
    }

    // Priority 1: command-line argument
    if let Some(url) = cli_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
        return config;
    }

    // Priority 2: environment variable
    if let Some(url) = env_url {
        if !url.trim().is_empty() {
            config.api_base_url = url.trim_end_matches('/').to_string();
            return config;
        }
    }

    // Priority 3: TOML config file
    if let Some(url) = toml_config.api_base_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }

    // Priority 4: compiled default (already set)
    config
}

/// Parse a TOML configuration file
pub fn parse_config_file(path: &std::path::Path) -> Option<TomlConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read config file");
            return None;
        }
    };
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file");
            None
        }
    }
}

/// Get the configuration file path for the platform, if one exists
fn load_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("wetmap").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }
    let system_config = PathBuf::from("/etc/wetmap/config.toml");
    if cfg!(target_os = "linux") && system_config.exists() {
        return Some(system_config);
    }
    None
}

/// Validate an endpoint base URL (http/https, non-empty host)
pub fn validate_base_url(url: &str) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::Config(format!(
            "Endpoint base URL must start with http:// or https://: {}",
            url
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.map_center, (51.0447, -114.0719));
        assert_eq!(config.map_zoom, 10);
    }

    #[test]
    fn test_cli_wins_over_env_and_toml() {
        let toml_config = TomlConfig {
            api_base_url: Some("http://from-toml:5000".to_string()),
            ..Default::default()
        };
        let config = resolve_with(
            Some("http://from-cli:5000/"),
            Some("http://from-env:5000".to_string()),
            toml_config,
        );
        assert_eq!(config.api_base_url, "http://from-cli:5000");
    }

    #[test]
    fn test_env_wins_over_toml() {
        let toml_config = TomlConfig {
            api_base_url: Some("http://from-toml:5000".to_string()),
            ..Default::default()
        };
        let config = resolve_with(None, Some("http://from-env:5000".to_string()), toml_config);
        assert_eq!(config.api_base_url, "http://from-env:5000");
    }

    #[test]
    fn test_toml_overrides_map_constants() {
        let toml_config = TomlConfig {
            api_base_url: Some("http://classifier:8080".to_string()),
            map_center: Some([50.0, -110.0]),
            map_zoom: Some(8),
        };
        let config = resolve_with(None, None, toml_config);
        assert_eq!(config.api_base_url, "http://classifier:8080");
        assert_eq!(config.map_center, (50.0, -110.0));
        assert_eq!(config.map_zoom, 8);
    }

    #[test]
    fn test_parse_config_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            "api_base_url = \"http://classifier:9000\"\nmap_zoom = 12"
        )
        .expect("write temp file");

        let parsed = parse_config_file(file.path()).expect("config should parse");
        assert_eq!(parsed.api_base_url.as_deref(), Some("http://classifier:9000"));
        assert_eq!(parsed.map_zoom, Some(12));
        assert!(parsed.map_center.is_none());
    }

    #[test]
    fn test_parse_config_file_invalid_toml_is_none() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "api_base_url = [not toml").expect("write temp file");
        assert!(parse_config_file(file.path()).is_none());
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("http://localhost:5000").is_ok());
        assert!(validate_base_url("https://classifier.example.org").is_ok());
        assert!(validate_base_url("ftp://nope").is_err());
        assert!(validate_base_url("localhost:5000").is_err());
    }
}
