//! Tracker settings, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use yt_engine::TransportConfig;

use crate::error::TrackerError;

/// Everything needed to build a [`Tracker`](crate::Tracker) and its host.
///
/// ```toml
/// pattern_length = 32
///
/// [transport]
/// row_duration = 0.25
/// lookahead = 0.3
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub transport: TransportConfig,
    /// Rows in the default pattern
    pub pattern_length: usize,
    /// Gain applied after all buses are summed
    pub master_gain: f32,
    /// Gain of each channel instrument's bus
    pub channel_gain: f32,
    /// Gain of the keyboard preview bus
    pub preview_gain: f32,
    /// Sample rate for offline rendering. Realtime output uses the device rate.
    pub sample_rate: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            pattern_length: 16,
            master_gain: 1.0,
            channel_gain: 0.5,
            preview_gain: 0.5,
            sample_rate: 48_000,
        }
    }
}

impl TrackerConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, TrackerError> {
        let config: TrackerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, TrackerError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        self.transport.validate()?;
        if self.pattern_length == 0 {
            return Err(TrackerError::Setting {
                name: "pattern_length",
                reason: "must be at least 1",
            });
        }
        for (name, gain) in [
            ("master_gain", self.master_gain),
            ("channel_gain", self.channel_gain),
            ("preview_gain", self.preview_gain),
        ] {
            if !(gain.is_finite() && gain >= 0.0) {
                return Err(TrackerError::Setting {
                    name,
                    reason: "must be a non-negative number",
                });
            }
        }
        if self.sample_rate == 0 {
            return Err(TrackerError::Setting {
                name: "sample_rate",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}
