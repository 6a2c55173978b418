use crate::paths::AppPaths;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

fn default_user_name() -> String {
    "User".to_string()
}

fn default_user_email() -> String {
    String::new()
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

// Metro Manila, where the device hardware was trialed.
fn default_latitude() -> f64 {
    14.5995
}

fn default_longitude() -> f64 {
    120.9842
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub token: String,

    #[serde(default = "default_user_name")]
    pub user_name: String,
    #[serde(default = "default_user_email")]
    pub user_email: String,

    /// Device push token, if the companion notification service issued one.
    #[serde(default)]
    pub push_token: Option<String>,

    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,

    /// Sort criterion applied to the inventory on startup.
    #[serde(default)]
    pub default_sort: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = AppPaths::get_config_file_path()?;
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }
        Err(anyhow::anyhow!("Config file not found"))
    }

    pub fn save(&self) -> Result<()> {
        let path = AppPaths::get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get_path_string() -> Result<String> {
        let path = AppPaths::get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            api_url = "https://api.example.com"
            token = "jwt-abc"
            "#,
        )
        .unwrap();
        assert_eq!(config.user_name, "User");
        assert_eq!(config.geocoder_url, "https://nominatim.openstreetmap.org");
        assert!(config.push_token.is_none());
        assert!(config.default_sort.is_none());
        assert!((config.latitude - 14.5995).abs() < 1e-9);
    }

    #[test]
    fn test_full_config_roundtrip() {
        let config: Config = toml::from_str(
            r#"
            api_url = "https://api.example.com"
            token = "jwt-abc"
            user_name = "Ana"
            user_email = "ana@example.com"
            push_token = "ExponentPushToken[xyz]"
            latitude = 51.5
            longitude = -0.12
            default_sort = "expDate"
            "#,
        )
        .unwrap();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(back.user_name, "Ana");
        assert_eq!(back.push_token.as_deref(), Some("ExponentPushToken[xyz]"));
        assert_eq!(back.default_sort.as_deref(), Some("expDate"));
    }
}
