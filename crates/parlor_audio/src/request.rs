//! Play requests and command packets

use serde::{Deserialize, Serialize};

/// Request to play a one-shot sound effect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundRequest {
    /// Logical sound name or address
    #[serde(default, alias = "sound")]
    pub name: String,
    /// Volume percentage (0 - 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    /// Pitch percentage (50 - 200)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    /// Pan percentage (-100 left, 100 right)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan: Option<f32>,
}

impl SoundRequest {
    /// Create a request with default volume, pitch and pan
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set volume percentage
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Set pitch percentage
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = Some(pitch);
        self
    }

    /// Set pan percentage
    pub fn with_pan(mut self, pan: f32) -> Self {
        self.pan = Some(pan);
        self
    }

    /// Volume multiplier in [0, 1]
    pub fn gain(&self) -> f32 {
        percent(self.volume, 100.0, 0.0, 100.0)
    }

    /// Playback rate in [0.5, 2.0]
    pub fn playback_rate(&self) -> f32 {
        percent(self.pitch, 100.0, 50.0, 200.0)
    }

    /// Stereo pan in [-1, 1]
    pub fn pan(&self) -> f32 {
        percent(self.pan, 0.0, -100.0, 100.0)
    }
}

/// Request to play (or keep playing) background music
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicRequest {
    /// Logical track name or address
    #[serde(default, alias = "music")]
    pub name: String,
    /// Loop the track; defaults to true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
}

impl MusicRequest {
    /// Create a looping music request
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            looping: None,
        }
    }

    /// Set looping explicitly
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = Some(looping);
        self
    }

    /// Effective loop flag
    pub fn looping(&self) -> bool {
        self.looping.unwrap_or(true)
    }
}

/// Already-parsed audio command packet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AudioCommand {
    PlaySound(SoundRequest),
    PlayMusic(MusicRequest),
    StopMusic,
    StopAll,
}

fn percent(value: Option<f32>, default: f32, min: f32, max: f32) -> f32 {
    let value = match value {
        Some(v) if !v.is_nan() => v,
        _ => default,
    };
    value.clamp(min, max) / 100.0
}
