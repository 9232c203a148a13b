use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use worldgate_common::Environment;

use crate::error::RedirectError;

/// Errors from loading redirection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scale factor for {environment} must be positive and finite, got {value}")]
    InvalidScale { environment: Environment, value: f64 },
}

/// Configuration handed to the redirector at construction.
///
/// ```yaml
/// scales:
///   normal: 1.0
///   nether: 8.0
///   end: 1.0
/// teleport_entities: true
/// notify_scale: true
/// messages:
///   portal.scaled_travel: "Scaled {source}:{destination}"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Block-density scale per environment kind. An environment missing here
    /// makes every nether crossing involving it fail.
    pub scales: BTreeMap<Environment, f64>,
    /// Route non-player entities out of custom worlds.
    pub teleport_entities: bool,
    /// Tell players the scale ratio after a scaled nether crossing.
    pub notify_scale: bool,
    /// Message template overrides, keyed by notice key.
    pub messages: BTreeMap<String, String>,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            scales: BTreeMap::from([
                (Environment::Normal, 1.0),
                (Environment::Nether, 8.0),
                (Environment::End, 1.0),
            ]),
            teleport_entities: true,
            notify_scale: true,
            messages: BTreeMap::new(),
        }
    }
}

impl RedirectConfig {
    /// Configured scale factor for an environment kind. Factors that are not
    /// strictly positive and finite are refused.
    pub fn scale_for(&self, environment: Environment) -> Result<f64, RedirectError> {
        let value = self
            .scales
            .get(&environment)
            .copied()
            .ok_or(RedirectError::MissingScale(environment))?;
        if !(value.is_finite() && value > 0.0) {
            return Err(RedirectError::InvalidScale { environment, value });
        }
        Ok(value)
    }

    /// Reject non-positive or non-finite scale factors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (&environment, &value) in &self.scales {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidScale { environment, value });
            }
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file. `.json` files are read as JSON,
    /// anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&text)?
        } else {
            serde_yaml::from_str(&text)?
        };
        config.validate()?;
        tracing::info!(path = %path.display(), scales = ?config.scales, "redirect config loaded");
        Ok(config)
    }
}
