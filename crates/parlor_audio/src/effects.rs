//! Tracking of concurrently playing one-shot effects

use std::collections::HashMap;

use crate::bus::BusKind;
use crate::environment::{AudioEnvironment, PlayableSource, SourceEvent, SourceId};
use crate::error::PlaybackError;
use crate::request::SoundRequest;
use crate::resolve::resolve_sound_url;
use crate::router::{GraphRouter, RouteNodes, Routing};
use crate::source::{self, NodeOf, SourceFactory, StartOutcome};

/// Outcome of an effect play request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    /// Empty name; nothing was created
    Skipped,
    /// The host could not build a source
    Failed(PlaybackError),
    /// A source was created and registered
    Played {
        id: SourceId,
        /// Whether the source was routed through the effects bus
        attached: bool,
        start: StartOutcome,
    },
}

struct ActiveEffect<E: AudioEnvironment> {
    source: E::Source,
    /// Held for the lifetime of the source so it stays attached
    #[allow(dead_code)]
    route: Option<RouteNodes<NodeOf<E>>>,
}

/// Owns every playing effect source until it ends or is stopped
pub struct EffectsTracker<E: AudioEnvironment> {
    active: HashMap<SourceId, ActiveEffect<E>>,
}

impl<E: AudioEnvironment> EffectsTracker<E> {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            active: HashMap::new(),
        }
    }

    /// Play a one-shot effect.
    ///
    /// The source is registered before routing and starting so its removal
    /// hook cannot be missed. Start failures are swallowed.
    pub fn play(
        &mut self,
        request: &SoundRequest,
        base_url: &str,
        factory: &mut SourceFactory<E>,
        router: &mut GraphRouter<E::Context>,
    ) -> EffectOutcome {
        let Some(url) = resolve_sound_url(&request.name, base_url) else {
            return EffectOutcome::Skipped;
        };

        let (id, mut media) = match factory.create(&url) {
            Ok(created) => created,
            Err(e) => {
                log::debug!("Could not create effect source for {}: {}", url, e);
                return EffectOutcome::Failed(e);
            }
        };
        media.set_volume(request.gain());
        media.set_playback_rate(request.playback_rate());

        let entry = self.active.entry(id).or_insert(ActiveEffect {
            source: media,
            route: None,
        });

        let routing = router.route_or_fallback(&mut entry.source, BusKind::Effects, request.pan());
        let attached = routing.is_attached();
        if let Routing::Attached(nodes) = routing {
            entry.route = Some(nodes);
        }

        let start = source::start(&mut entry.source);
        log::trace!("Effect {} ({}) attached={} {:?}", id, url, attached, start);

        EffectOutcome::Played {
            id,
            attached,
            start,
        }
    }

    /// Apply a source notification. Returns true if the source was removed.
    ///
    /// A pause only removes the source when it sits at position zero or at
    /// its natural end; a mid-playback pause keeps it tracked.
    pub fn handle_event(&mut self, id: SourceId, event: SourceEvent) -> bool {
        let finished = match event {
            SourceEvent::Ended => true,
            SourceEvent::Paused { position, ended } => ended || position == 0.0,
        };

        finished && self.active.remove(&id).is_some()
    }

    /// Pause and rewind every tracked effect, then forget them all
    pub fn stop_all(&mut self) {
        for (_, mut effect) in self.active.drain() {
            source::halt(&mut effect.source);
        }
    }

    /// Whether `id` is still tracked
    pub fn contains(&self, id: SourceId) -> bool {
        self.active.contains_key(&id)
    }

    /// Tracked source, if any
    pub fn get(&self, id: SourceId) -> Option<&E::Source> {
        self.active.get(&id).map(|effect| &effect.source)
    }

    /// Number of tracked effects
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl<E: AudioEnvironment> Default for EffectsTracker<E> {
    fn default() -> Self {
        Self::new()
    }
}
