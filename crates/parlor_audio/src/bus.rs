//! Mix buses for effects, music and ambience

use serde::{Deserialize, Serialize};

use crate::environment::{BusNode, ProcessingContext};

/// Bus identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusKind {
    /// One-shot sound effects
    Effects,
    /// Background music
    Music,
    /// Ambience beds
    Ambience,
}

impl BusKind {
    /// All buses, in creation order
    pub const ALL: [BusKind; 3] = [BusKind::Effects, BusKind::Music, BusKind::Ambience];

    /// Bus name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Effects => "effects",
            Self::Music => "music",
            Self::Ambience => "ambience",
        }
    }
}

impl std::fmt::Display for BusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Initial gain for each bus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusGains {
    pub effects: f32,
    pub music: f32,
    pub ambience: f32,
}

impl BusGains {
    /// Gain configured for a bus, clamped to [0, 1]
    pub fn get(&self, kind: BusKind) -> f32 {
        let gain = match kind {
            BusKind::Effects => self.effects,
            BusKind::Music => self.music,
            BusKind::Ambience => self.ambience,
        };
        clamp_gain(gain)
    }
}

impl Default for BusGains {
    fn default() -> Self {
        Self {
            effects: 1.0,
            music: 0.2,
            ambience: 1.0,
        }
    }
}

/// A single gain-controlled output bus
#[derive(Debug)]
pub struct MixBus<B> {
    kind: BusKind,
    gain: f32,
    /// Graph node; `None` when running without a processing graph
    node: Option<B>,
}

impl<B: BusNode> MixBus<B> {
    /// Create a bus
    pub fn new(kind: BusKind, gain: f32, node: Option<B>) -> Self {
        Self {
            kind,
            gain: clamp_gain(gain),
            node,
        }
    }

    /// Bus identifier
    pub fn kind(&self) -> BusKind {
        self.kind
    }

    /// Current gain multiplier
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Set gain (clamped to [0, 1]); a live node is updated too
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = clamp_gain(gain);
        if let Some(node) = self.node.as_mut() {
            node.set_gain(self.gain);
        }
    }

    /// Whether this bus exists in a processing graph
    pub fn is_live(&self) -> bool {
        self.node.is_some()
    }

    /// Graph node, if live
    pub fn node(&self) -> Option<&B> {
        self.node.as_ref()
    }
}

/// The three engine buses, created once per engine
#[derive(Debug)]
pub struct MixBusSet<B> {
    effects: MixBus<B>,
    music: MixBus<B>,
    ambience: MixBus<B>,
}

impl<B: BusNode> MixBusSet<B> {
    /// Create inert buses for running without a processing graph
    pub fn inert(gains: &BusGains) -> Self {
        Self {
            effects: MixBus::new(BusKind::Effects, gains.get(BusKind::Effects), None),
            music: MixBus::new(BusKind::Music, gains.get(BusKind::Music), None),
            ambience: MixBus::new(BusKind::Ambience, gains.get(BusKind::Ambience), None),
        }
    }

    /// Create live buses in `context`. A bus whose node cannot be created
    /// stays inert and its sources play unrouted.
    pub fn create<C>(context: &mut C, gains: &BusGains) -> Self
    where
        C: ProcessingContext<Bus = B>,
    {
        let mut create = |kind: BusKind| {
            let gain = gains.get(kind);
            let node = match context.create_bus(gain) {
                Ok(node) => Some(node),
                Err(e) => {
                    log::warn!("Failed to create {} bus, playing unrouted: {}", kind, e);
                    None
                }
            };
            MixBus::new(kind, gain, node)
        };

        Self {
            effects: create(BusKind::Effects),
            music: create(BusKind::Music),
            ambience: create(BusKind::Ambience),
        }
    }

    /// Get a bus
    pub fn get(&self, kind: BusKind) -> &MixBus<B> {
        match kind {
            BusKind::Effects => &self.effects,
            BusKind::Music => &self.music,
            BusKind::Ambience => &self.ambience,
        }
    }

    /// Get a mutable bus
    pub fn get_mut(&mut self, kind: BusKind) -> &mut MixBus<B> {
        match kind {
            BusKind::Effects => &mut self.effects,
            BusKind::Music => &mut self.music,
            BusKind::Ambience => &mut self.ambience,
        }
    }

    /// Current gain of a bus
    pub fn gain(&self, kind: BusKind) -> f32 {
        self.get(kind).gain()
    }

    /// Set the gain of a bus
    pub fn set_gain(&mut self, kind: BusKind, gain: f32) {
        self.get_mut(kind).set_gain(gain);
    }
}

fn clamp_gain(gain: f32) -> f32 {
    if gain.is_nan() {
        0.0
    } else {
        gain.clamp(0.0, 1.0)
    }
}
