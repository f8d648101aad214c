//! Engine settings supplied by the host application.

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tick interval must be a positive number of milliseconds, got {0}")]
    TickInterval(f64),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Wall-clock length of one production tick.
    pub tick_interval_ms: f64,
    /// Key the save record is stored under.
    pub storage_key: String,
    /// Pending notifications kept for the presentation layer; older ones
    /// are dropped first.
    pub notification_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000.0,
            storage_key: "incrementalGameState".to_string(),
            notification_capacity: 50,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if !(config.tick_interval_ms.is_finite() && config.tick_interval_ms > 0.0) {
            return Err(ConfigError::TickInterval(config.tick_interval_ms));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config =
            EngineConfig::from_json(r#"{"tickIntervalMs": 250, "storageKey": "slot2"}"#).unwrap();
        assert!((config.tick_interval_ms - 250.0).abs() < 0.001);
        assert_eq!(config.storage_key, "slot2");
        assert_eq!(config.notification_capacity, 50);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"tickIntervalMs": 0}"#),
            Err(ConfigError::TickInterval(_))
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            EngineConfig::from_json("tick=1"),
            Err(ConfigError::Parse(_))
        ));
    }
}
