//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::bus::{BusGains, BusKind};
use crate::error::ConfigResult;
use crate::resolve::DEFAULT_SOUND_BASE_URL;

/// Construction-time engine options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base location relative sound names resolve against
    pub sound_base_url: String,
    /// Initial bus gains
    pub bus_defaults: BusGains,
}

impl EngineConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the sound base location
    pub fn with_sound_base_url(mut self, base: impl Into<String>) -> Self {
        self.sound_base_url = base.into();
        self
    }

    /// Set the initial gain of a bus (clamped to [0, 1])
    pub fn with_bus_gain(mut self, kind: BusKind, gain: f32) -> Self {
        let gain = gain.clamp(0.0, 1.0);
        match kind {
            BusKind::Effects => self.bus_defaults.effects = gain,
            BusKind::Music => self.bus_defaults.music = gain,
            BusKind::Ambience => self.bus_defaults.ambience = gain,
        }
        self
    }

    /// Base location, falling back to the default when unset
    pub fn sound_base_url(&self) -> &str {
        if self.sound_base_url.is_empty() {
            DEFAULT_SOUND_BASE_URL
        } else {
            &self.sound_base_url
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sound_base_url: DEFAULT_SOUND_BASE_URL.to_string(),
            bus_defaults: BusGains::default(),
        }
    }
}
