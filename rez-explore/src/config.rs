use log::info;
use rez_core::units::UnitTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the backend endpoint.
pub const API_ENDPOINT_ENV: &str = "REZ_API_ENDPOINT";

pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8000";

/// Runtime settings for the explorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    /// Backend base URL, without a trailing slash.
    pub api_endpoint: String,
    pub units: UnitTable,
    /// RGBA used to paint the filtered-area tiles.
    pub filter_color: String,
    /// Colormap for the LCOE output tiles.
    pub colormap: String,
    /// Sent with raw-data exports.
    pub capacity_factor: f64,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        ExploreConfig {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            units: UnitTable::default(),
            filter_color: "255,0,160,100".to_string(),
            colormap: "viridis".to_string(),
            capacity_factor: 0.8,
        }
    }
}

impl ExploreConfig {
    pub fn from_json(json: &str) -> rez_core::Result<Self> {
        let config: ExploreConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Defaults, overlaid with `path` when given, then with the environment.
    pub fn load(path: Option<&Path>) -> rez_core::Result<Self> {
        let config = match path {
            Some(p) => {
                info!("Loading explorer config from {}", p.display());
                Self::from_json(&std::fs::read_to_string(p)?)?
            }
            None => Self::default(),
        };
        Ok(config.with_env())
    }

    fn with_env(self) -> Self {
        match std::env::var(API_ENDPOINT_ENV) {
            Ok(endpoint) if !endpoint.trim().is_empty() => self.with_endpoint(&endpoint),
            _ => self,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.api_endpoint = endpoint.trim().to_string();
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_endpoint.trim_end_matches('/').len();
        self.api_endpoint.truncate(trimmed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ExploreConfig::from_json(r#"{"api_endpoint": "https://api.example.org/"}"#).unwrap();
        assert_eq!(config.api_endpoint, "https://api.example.org");
        assert_eq!(config.colormap, "viridis");
        assert_eq!(config.filter_color, "255,0,160,100");
        assert_eq!(config.capacity_factor, 0.8);
        assert_eq!(config.units.multiplier(Some("km")), 1000.0);
    }

    #[test]
    fn test_units_override() {
        let config = ExploreConfig::from_json(r#"{"units": {"km": 1000, "ha": 10000}}"#).unwrap();
        assert_eq!(config.units.multiplier(Some("ha")), 10000.0);
    }

    #[test]
    fn test_with_endpoint() {
        let config = ExploreConfig::default().with_endpoint(" http://x:9000// ");
        assert_eq!(config.api_endpoint, "http://x:9000");
    }
}
