//! Engine facade

use crossbeam_channel::Receiver;

use crate::bus::BusKind;
use crate::config::EngineConfig;
use crate::effects::{EffectOutcome, EffectsTracker};
use crate::environment::{AudioEnvironment, ContextState, ProcessingContext, SourceEvent, SourceId};
use crate::music::{MusicController, MusicInfo, MusicOutcome, MusicState};
use crate::origin::OriginClassifier;
use crate::request::{AudioCommand, MusicRequest, SoundRequest};
use crate::router::GraphRouter;
use crate::source::SourceFactory;

/// The sound engine
///
/// Single-threaded and event driven. Source notifications are queued and
/// applied at the start of every operation (or on
/// [`process_events`](Self::process_events)), so nothing re-enters the engine.
pub struct AudioEngine<E: AudioEnvironment> {
    config: EngineConfig,
    factory: SourceFactory<E>,
    router: GraphRouter<E::Context>,
    effects: EffectsTracker<E>,
    music: MusicController<E>,
    events: Receiver<(SourceId, SourceEvent)>,
}

impl<E: AudioEnvironment> AudioEngine<E> {
    /// Create an engine over `env`.
    ///
    /// The processing context and the three buses are created here, once.
    /// Without a context every sound plays directly at its own volume.
    pub fn new(mut env: E, config: EngineConfig) -> Self {
        let classifier = OriginClassifier::new(env.page_url());

        let context = if env.supports_processing_graph() {
            env.create_context()
        } else {
            None
        };
        if context.is_none() {
            log::warn!("No audio processing context; sounds will play unrouted");
        }

        let router = GraphRouter::new(context, &config.bus_defaults, classifier.clone());
        let (tx, rx) = crossbeam_channel::unbounded();

        Self {
            config,
            factory: SourceFactory::new(env, classifier, tx),
            router,
            effects: EffectsTracker::new(),
            music: MusicController::new(),
            events: rx,
        }
    }

    /// Create an engine with default configuration
    pub fn with_defaults(env: E) -> Self {
        Self::new(env, EngineConfig::default())
    }

    /// Resume the processing context so routed playback can be heard.
    ///
    /// Returns false without side effects when there is no context. The wait
    /// on the host permission is unbounded. Call this from a user-interaction
    /// handler.
    pub async fn unlock(&mut self) -> bool {
        let Some(context) = self.router.context_mut() else {
            return false;
        };

        if context.state() != ContextState::Running {
            if let Err(e) = context.resume().await {
                log::warn!("Audio unlock failed: {}", e);
            }
        }

        context.state() == ContextState::Running
    }

    /// Play a one-shot effect. Failures are silent.
    pub fn play_sound(&mut self, request: &SoundRequest) {
        self.play_sound_outcome(request);
    }

    /// Play a one-shot effect and report what happened
    pub fn play_sound_outcome(&mut self, request: &SoundRequest) -> EffectOutcome {
        self.process_events();
        self.effects.play(
            request,
            self.config.sound_base_url(),
            &mut self.factory,
            &mut self.router,
        )
    }

    /// Play background music, keeping an identical current track untouched
    pub fn play_music(&mut self, request: &MusicRequest) {
        self.play_music_outcome(request);
    }

    /// Play background music and report what happened
    pub fn play_music_outcome(&mut self, request: &MusicRequest) -> MusicOutcome {
        self.process_events();
        self.music.play(
            request,
            self.config.sound_base_url(),
            &mut self.factory,
            &mut self.router,
        )
    }

    /// Stop the current music track
    pub fn stop_music(&mut self) {
        self.process_events();
        self.music.stop();
    }

    /// Stop music, then every tracked effect
    pub fn stop_all(&mut self) {
        self.process_events();
        self.music.stop();
        self.effects.stop_all();
    }

    /// Dispatch one command packet
    pub fn handle_command(&mut self, command: &AudioCommand) {
        match command {
            AudioCommand::PlaySound(request) => self.play_sound(request),
            AudioCommand::PlayMusic(request) => self.play_music(request),
            AudioCommand::StopMusic => self.stop_music(),
            AudioCommand::StopAll => self.stop_all(),
        }
    }

    /// Apply queued source notifications. Returns how many were applied.
    pub fn process_events(&mut self) -> usize {
        let mut count = 0;
        while let Ok((id, event)) = self.events.try_recv() {
            if self.effects.handle_event(id, event) {
                log::trace!("Effect {} finished ({:?})", id, event);
            }
            count += 1;
        }
        count
    }

    /// Set a bus gain (clamped to [0, 1]).
    ///
    /// Sources that fell back to direct playback keep the gain they were
    /// created with.
    pub fn set_bus_gain(&mut self, kind: BusKind, gain: f32) {
        self.router.buses_mut().set_gain(kind, gain);
    }

    /// Current gain of a bus
    pub fn bus_gain(&self, kind: BusKind) -> f32 {
        self.router.buses().gain(kind)
    }

    /// Whether the processing context is currently running.
    ///
    /// Reads the live state, so a context the host suspended after an
    /// unlock reports false until the next unlock.
    pub fn is_unlocked(&self) -> bool {
        self.router.context_state() == Some(ContextState::Running)
    }

    /// Whether a processing graph is available
    pub fn has_processing_graph(&self) -> bool {
        self.router.has_context()
    }

    /// Number of effects still tracked
    pub fn active_effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Effects tracker
    pub fn effects(&self) -> &EffectsTracker<E> {
        &self.effects
    }

    /// Music state
    pub fn music_state(&self) -> MusicState {
        self.music.state()
    }

    /// Current music track
    pub fn current_music(&self) -> Option<&MusicInfo> {
        self.music.current()
    }

    /// Source of the current music track
    pub fn current_music_source(&self) -> Option<&E::Source> {
        self.music.current_source()
    }

    /// Configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Host environment
    pub fn environment(&self) -> &E {
        self.factory.environment()
    }

    /// Number of sources created so far
    pub fn sources_created(&self) -> u64 {
        self.factory.created_count()
    }
}
