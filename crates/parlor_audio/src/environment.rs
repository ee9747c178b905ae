//! Host environment capabilities
//!
//! The engine never touches globals. Everything it needs from the host
//! (page location, processing context, media construction) comes through
//! an [`AudioEnvironment`] handed to [`AudioEngine::new`](crate::AudioEngine::new).
//!
//! ```text
//! AudioEnvironment
//! +-- page_url()                 origin accessor
//! +-- create_context()           processing context factory (optional)
//! |   +-- ProcessingContext
//! |       +-- create_bus()       -> BusNode (gain)
//! |       +-- create_source_node / create_stereo_panner / connect
//! +-- create_source()            media-source factory -> PlayableSource
//! ```

use async_trait::async_trait;
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ContextError, GraphError, PlaybackError};

/// Identifier the engine assigns to every source it creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(u64);

impl SourceId {
    /// Create a source ID from a raw value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// Notifications a source raises about its own playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceEvent {
    /// Playback reached the natural end
    Ended,
    /// Playback paused
    Paused {
        /// Position in seconds at the time of the pause
        position: f64,
        /// Whether the source had reached its end
        ended: bool,
    },
}

/// Queue endpoint handed to each source for reporting [`SourceEvent`]s.
///
/// Events are delivered to the engine on its next operation or
/// [`process_events`](crate::AudioEngine::process_events) call, never
/// re-entrantly.
#[derive(Debug, Clone)]
pub struct SourceEventSender {
    id: SourceId,
    tx: Sender<(SourceId, SourceEvent)>,
}

impl SourceEventSender {
    pub(crate) fn new(id: SourceId, tx: Sender<(SourceId, SourceEvent)>) -> Self {
        Self { id, tx }
    }

    /// Source this sender reports for
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// Queue an event. Sending after the engine is gone is a no-op.
    pub fn send(&self, event: SourceEvent) {
        if self.tx.send((self.id, event)).is_err() {
            log::trace!("Dropped {:?} for {}: engine gone", event, self.id);
        }
    }
}

/// Credential mode for media fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossOriginMode {
    /// Host default (no CORS request)
    #[default]
    Default,
    /// CORS request without credentials, needed to feed cross-origin media into a graph
    Anonymous,
}

/// Processing context lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

/// A single piece of media the host can play
pub trait PlayableSource {
    /// Address the media was created for
    fn url(&self) -> &str;

    /// Intrinsic volume multiplier (0.0 - 1.0)
    fn volume(&self) -> f32;

    /// Set intrinsic volume multiplier
    fn set_volume(&mut self, volume: f32);

    /// Set playback rate (1.0 = normal)
    fn set_playback_rate(&mut self, rate: f32);

    /// Enable or disable looping
    fn set_looping(&mut self, looping: bool);

    /// Ask the host to fetch media eagerly. Hosts without a preload hint ignore it.
    fn set_preload(&mut self, _eager: bool) {}

    /// Start or resume playback
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Pause playback
    fn pause(&mut self) -> Result<(), PlaybackError>;

    /// Move the playhead, in seconds
    fn seek(&mut self, position: f64) -> Result<(), PlaybackError>;

    /// Whether playback is currently paused (a never-started source is paused)
    fn is_paused(&self) -> bool;
}

/// Gain node backing a mix bus
pub trait BusNode {
    /// Set the gain multiplier; callers pass values already clamped to [0, 1]
    fn set_gain(&mut self, gain: f32);
}

/// Audio-processing graph provided by the host
#[async_trait(?Send)]
pub trait ProcessingContext {
    /// Media type this context can wrap in graph nodes
    type Source: PlayableSource;
    /// Gain node used for buses
    type Bus: BusNode;
    /// Any other graph node (media-element source, stereo panner)
    type Node;

    /// Current lifecycle state
    fn state(&self) -> ContextState;

    /// Request resumption. May wait on a user-gesture gated permission.
    async fn resume(&mut self) -> Result<(), ContextError>;

    /// Create a gain node with the given gain, connected to final output
    fn create_bus(&mut self, gain: f32) -> Result<Self::Bus, GraphError>;

    /// Whether stereo panner nodes are available
    fn supports_stereo_pan(&self) -> bool;

    /// Wrap a source in a graph node. A source can be wrapped only once.
    fn create_source_node(&mut self, source: &mut Self::Source) -> Result<Self::Node, GraphError>;

    /// Create a stereo panner with `pan` in [-1, 1]
    fn create_stereo_panner(&mut self, pan: f32) -> Result<Self::Node, GraphError>;

    /// Connect two non-bus nodes
    fn connect(&mut self, from: &Self::Node, to: &Self::Node) -> Result<(), GraphError>;

    /// Connect a node into a bus
    fn connect_to_bus(&mut self, from: &Self::Node, bus: &Self::Bus) -> Result<(), GraphError>;
}

/// Everything the engine needs from its host
pub trait AudioEnvironment {
    /// Media handle type
    type Source: PlayableSource;
    /// Processing context type
    type Context: ProcessingContext<Source = Self::Source>;

    /// Location of the running page, used for origin checks
    fn page_url(&self) -> Option<Url>;

    /// Whether a processing graph can be created at all
    fn supports_processing_graph(&self) -> bool;

    /// Create the processing context. Called once, at engine construction,
    /// and only when [`supports_processing_graph`](Self::supports_processing_graph)
    /// returned true.
    fn create_context(&mut self) -> Option<Self::Context>;

    /// Build a media handle targeting `url`
    fn create_source(
        &mut self,
        url: &str,
        mode: CrossOriginMode,
        events: SourceEventSender,
    ) -> Result<Self::Source, PlaybackError>;
}
