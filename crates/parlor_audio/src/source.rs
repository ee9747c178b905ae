//! Playable source construction

use crossbeam_channel::Sender;

use crate::environment::{
    AudioEnvironment, CrossOriginMode, PlayableSource, ProcessingContext, SourceEvent,
    SourceEventSender, SourceId,
};
use crate::error::PlaybackError;
use crate::origin::OriginClassifier;

/// Graph node type of an environment's processing context
pub type NodeOf<E> = <<E as AudioEnvironment>::Context as ProcessingContext>::Node;

/// Outcome of asking a source to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    NotStarted(PlaybackError),
}

impl StartOutcome {
    /// Whether playback started
    pub fn is_started(&self) -> bool {
        matches!(self, StartOutcome::Started)
    }
}

/// Start `source`, turning a refusal into an outcome instead of an error
pub fn start<S: PlayableSource + ?Sized>(source: &mut S) -> StartOutcome {
    match source.play() {
        Ok(()) => StartOutcome::Started,
        Err(e) => {
            log::debug!("Playback of {} did not start: {}", source.url(), e);
            StartOutcome::NotStarted(e)
        }
    }
}

/// Pause and rewind `source`, logging failures
pub fn halt<S: PlayableSource + ?Sized>(source: &mut S) {
    if let Err(e) = source.pause().and_then(|()| source.seek(0.0)) {
        log::debug!("Ignoring stop failure for {}: {}", source.url(), e);
    }
}

/// Builds media handles through the host environment.
///
/// Cross-origin addresses get [`CrossOriginMode::Anonymous`] so they stay
/// usable by a processing graph; this is best effort and does not guarantee
/// routing later succeeds.
pub struct SourceFactory<E: AudioEnvironment> {
    env: E,
    classifier: OriginClassifier,
    events: Sender<(SourceId, SourceEvent)>,
    next_id: u64,
    created: u64,
}

impl<E: AudioEnvironment> SourceFactory<E> {
    /// Create a factory over `env`, reporting source events into `events`
    pub fn new(env: E, classifier: OriginClassifier, events: Sender<(SourceId, SourceEvent)>) -> Self {
        Self {
            env,
            classifier,
            events,
            next_id: 1,
            created: 0,
        }
    }

    /// Build a new source for `url`
    pub fn create(&mut self, url: &str) -> Result<(SourceId, E::Source), PlaybackError> {
        let id = SourceId::new(self.next_id);
        self.next_id += 1;

        let mode = self.mode_for(url);
        let mut source = self
            .env
            .create_source(url, mode, SourceEventSender::new(id, self.events.clone()))?;
        source.set_preload(true);
        self.created += 1;

        log::trace!("Created {} for {} ({:?})", id, url, mode);
        Ok((id, source))
    }

    /// Credential mode a source for `url` is built with
    pub fn mode_for(&self, url: &str) -> CrossOriginMode {
        if self.classifier.is_cross_origin(url) {
            CrossOriginMode::Anonymous
        } else {
            CrossOriginMode::Default
        }
    }

    /// Total number of sources built so far
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Host environment
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Mutable host environment
    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.env
    }
}
