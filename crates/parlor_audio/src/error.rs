//! Error types for the sound engine
//!
//! None of these ever escape the public facade. They exist so the
//! components can report *why* something fell back or did not play.

use thiserror::Error;

/// Failures while building or connecting processing-graph nodes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The media handle already feeds a graph node (one-time-use constraint)
    #[error("Source is already attached to a processing graph")]
    AlreadyAttached,

    /// A node could not be created
    #[error("Failed to create {node} node: {reason}")]
    NodeCreation { node: &'static str, reason: String },

    /// Two nodes could not be connected
    #[error("Failed to connect nodes: {0}")]
    Connection(String),
}

/// Failures reported by a playable source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Playback start refused, typically by an autoplay policy before unlock
    #[error("Playback start refused: {0}")]
    StartRefused(String),

    /// Media could not be decoded or fetched
    #[error("Media error: {0}")]
    Media(String),

    /// Pause or seek failed
    #[error("Failed to stop source: {0}")]
    Stop(String),
}

/// Failures while resuming the processing context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("Processing context is closed")]
    Closed,

    #[error("Failed to resume processing context: {0}")]
    Resume(String),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid engine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for configuration loading
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
