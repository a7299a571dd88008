//! Run configuration
//!
//! Loaded from a JSON file next to the binary; any load failure falls back
//! to defaults so a missing or mangled file never stops a run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::CLIP_DISTANCE;

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Verbose per-tick logging
    pub debug: bool,
    /// Margin kept between entity centers and wall faces
    pub clip_distance: f32,
    /// Run seed; `None` derives one from the clock
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            debug: false,
            clip_distance: CLIP_DISTANCE,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("Ignoring malformed config {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the config out as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, json)
    }

    /// Seed to run with, derived from the clock when unset
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert!(!config.debug);
        assert_eq!(config.clip_distance, CLIP_DISTANCE);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig {
            debug: true,
            clip_distance: 0.15,
            seed: Some(99),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimConfig = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        assert!(config.debug);
        assert_eq!(config.clip_distance, CLIP_DISTANCE);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = SimConfig::load("/nonexistent/gridfire-config.json");
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_fixed_seed_is_effective() {
        let config = SimConfig {
            seed: Some(7),
            ..Default::default()
        };
        assert_eq!(config.effective_seed(), 7);
    }
}
