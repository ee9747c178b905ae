//! Single-track music state machine
//!
//! ```text
//!            play(a)                     play(a) again
//!   Idle ─────────────► Playing(a) ◄──────────────┐ (resume if paused)
//!    ▲                   │    │                   │
//!    │   stop()          │    └───────────────────┘
//!    └───────────────────┘
//!                        │ play(b): stop a, then start b
//!                        ▼
//!                    Playing(b)
//! ```

use crate::bus::BusKind;
use crate::environment::{AudioEnvironment, PlayableSource, SourceId};
use crate::error::PlaybackError;
use crate::request::MusicRequest;
use crate::resolve::resolve_sound_url;
use crate::router::{GraphRouter, RouteNodes, Routing};
use crate::source::{self, NodeOf, SourceFactory, StartOutcome};

/// Music controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    Idle,
    Playing,
}

/// Identity of the current track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicInfo {
    pub id: SourceId,
    pub name: String,
    pub looping: bool,
}

/// Outcome of a music play request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MusicOutcome {
    /// Empty name; state unchanged
    Skipped,
    /// The previous track was stopped but the host could not build a new source
    Failed(PlaybackError),
    /// Identical track already current and playing
    AlreadyPlaying,
    /// Identical track was paused and has been asked to resume
    Resumed(StartOutcome),
    /// A new track became current
    Started {
        id: SourceId,
        attached: bool,
        start: StartOutcome,
    },
}

struct CurrentMusic<E: AudioEnvironment> {
    info: MusicInfo,
    source: E::Source,
    /// Held so the track stays connected to the music bus
    #[allow(dead_code)]
    route: Option<RouteNodes<NodeOf<E>>>,
}

/// Owns the single active music track
pub struct MusicController<E: AudioEnvironment> {
    current: Option<CurrentMusic<E>>,
}

impl<E: AudioEnvironment> MusicController<E> {
    /// Create an idle controller
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Play `request`, deduplicating against the current track.
    ///
    /// A request matching the current (name, looping) never restarts it.
    /// Anything else stops the current track first. The new track is
    /// recorded as current even when its start is refused.
    pub fn play(
        &mut self,
        request: &MusicRequest,
        base_url: &str,
        factory: &mut SourceFactory<E>,
        router: &mut GraphRouter<E::Context>,
    ) -> MusicOutcome {
        let Some(url) = resolve_sound_url(&request.name, base_url) else {
            return MusicOutcome::Skipped;
        };
        let looping = request.looping();

        if let Some(current) = self.current.as_mut() {
            if current.info.name == request.name && current.info.looping == looping {
                if current.source.is_paused() {
                    return MusicOutcome::Resumed(source::start(&mut current.source));
                }
                return MusicOutcome::AlreadyPlaying;
            }
        }

        self.stop();

        let (id, mut media) = match factory.create(&url) {
            Ok(created) => created,
            Err(e) => {
                log::warn!("Could not create music source for {}: {}", url, e);
                return MusicOutcome::Failed(e);
            }
        };
        media.set_looping(looping);
        media.set_volume(1.0);

        let routing = router.route_or_fallback(&mut media, BusKind::Music, 0.0);
        let attached = routing.is_attached();
        let route = match routing {
            Routing::Attached(nodes) => Some(nodes),
            Routing::Direct(_) => None,
        };

        let start = source::start(&mut media);
        log::debug!("Music {} ({}) looping={} attached={} {:?}", id, url, looping, attached, start);

        self.current = Some(CurrentMusic {
            info: MusicInfo {
                id,
                name: request.name.clone(),
                looping,
            },
            source: media,
            route,
        });

        MusicOutcome::Started { id, attached, start }
    }

    /// Stop and release the current track. Idle is a no-op.
    pub fn stop(&mut self) {
        if let Some(mut current) = self.current.take() {
            source::halt(&mut current.source);
            log::debug!("Stopped music {} ({})", current.info.id, current.info.name);
        }
    }

    /// Current state
    pub fn state(&self) -> MusicState {
        if self.current.is_some() {
            MusicState::Playing
        } else {
            MusicState::Idle
        }
    }

    /// Identity of the current track
    pub fn current(&self) -> Option<&MusicInfo> {
        self.current.as_ref().map(|current| &current.info)
    }

    /// Source of the current track
    pub fn current_source(&self) -> Option<&E::Source> {
        self.current.as_ref().map(|current| &current.source)
    }
}

impl<E: AudioEnvironment> Default for MusicController<E> {
    fn default() -> Self {
        Self::new()
    }
}
