//! Parlor Audio - Client Sound Engine
//!
//! Plays short effect sounds and looping background music for the Parlor
//! game client, mixed through three buses (effects, music, ambience).
//!
//! # Features
//!
//! - One-shot effects with volume, pitch and stereo pan
//! - A single music track with dedup of identical requests
//! - Independent gain per bus
//! - Graph routing with fallback to direct playback when media cannot be
//!   routed (cross-origin, node creation failure, no processing context)
//!
//! Every failure is absorbed: a request either plays or silently does not.
//!
//! # Example
//!
//! ```ignore
//! use parlor_audio::prelude::*;
//!
//! let mut audio = AudioEngine::new(WebEnvironment::new()?, EngineConfig::default());
//!
//! // From a click handler
//! audio.unlock().await;
//!
//! audio.play_sound(&SoundRequest::new("cards/deal.ogg").with_pan(-40.0));
//! audio.play_music(&MusicRequest::new("lobby.ogg"));
//! ```

pub mod bus;
pub mod config;
pub mod effects;
pub mod engine;
pub mod environment;
pub mod error;
pub mod music;
pub mod origin;
pub mod request;
pub mod resolve;
pub mod router;
pub mod source;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;

pub mod prelude {
    pub use crate::bus::{BusGains, BusKind};
    pub use crate::config::EngineConfig;
    pub use crate::effects::EffectOutcome;
    pub use crate::engine::AudioEngine;
    pub use crate::environment::{
        AudioEnvironment, BusNode, ContextState, CrossOriginMode, PlayableSource,
        ProcessingContext, SourceEvent, SourceEventSender, SourceId,
    };
    pub use crate::error::{ConfigError, ContextError, GraphError, PlaybackError};
    pub use crate::music::{MusicInfo, MusicOutcome, MusicState};
    pub use crate::request::{AudioCommand, MusicRequest, SoundRequest};
    pub use crate::source::StartOutcome;

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    pub use crate::web::WebEnvironment;
}

pub use prelude::*;
