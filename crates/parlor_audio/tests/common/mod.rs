//! Scripted host environment for driving the engine in tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use parlor_audio::prelude::*;
use url::Url;

pub const PAGE: &str = "https://play.example.com/table/7";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Observable state of one mock source
#[derive(Debug)]
pub struct SourceState {
    pub id: SourceId,
    pub url: String,
    pub mode: CrossOriginMode,
    pub volume: f32,
    pub rate: f32,
    pub looping: bool,
    pub preload: bool,
    pub playing: bool,
    pub position: f64,
    pub play_calls: usize,
    pub attached: bool,
    events: SourceEventSender,
}

/// Knobs and recordings shared between the test and the environment
#[derive(Debug)]
pub struct Shared {
    pub graph: bool,
    pub stereo_pan: bool,
    pub refuse_play: bool,
    pub end_on_play: bool,
    pub fail_source_node: bool,
    pub fail_create: bool,
    /// Index of the `create_bus` call that fails (effects, music, ambience)
    pub fail_create_bus: Option<usize>,
    pub bus_calls: usize,
    pub resume_grants: bool,
    pub context_state: ContextState,
    pub resume_calls: usize,
    pub sources: Vec<Rc<RefCell<SourceState>>>,
    pub bus_gains: Vec<Rc<RefCell<f32>>>,
    pub panners: Vec<f32>,
    pub connections: Vec<String>,
    pub ops: Vec<String>,
}

impl Default for Shared {
    fn default() -> Self {
        Self {
            graph: true,
            stereo_pan: true,
            refuse_play: false,
            end_on_play: false,
            fail_source_node: false,
            fail_create: false,
            fail_create_bus: None,
            bus_calls: 0,
            resume_grants: true,
            context_state: ContextState::Suspended,
            resume_calls: 0,
            sources: Vec::new(),
            bus_gains: Vec::new(),
            panners: Vec::new(),
            connections: Vec::new(),
            ops: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockEnvironment {
    shared: Rc<RefCell<Shared>>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment without a processing graph
    pub fn without_graph() -> Self {
        let env = Self::new();
        env.shared.borrow_mut().graph = false;
        env
    }

    pub fn configure(&self, f: impl FnOnce(&mut Shared)) {
        f(&mut self.shared.borrow_mut());
    }

    pub fn shared(&self) -> std::cell::Ref<'_, Shared> {
        self.shared.borrow()
    }

    pub fn source_count(&self) -> usize {
        self.shared.borrow().sources.len()
    }

    pub fn source(&self, index: usize) -> Rc<RefCell<SourceState>> {
        self.shared.borrow().sources[index].clone()
    }

    pub fn ops(&self) -> Vec<String> {
        self.shared.borrow().ops.clone()
    }

    /// Let a source reach its natural end
    pub fn finish(&self, index: usize) {
        let source = self.source(index);
        let mut state = source.borrow_mut();
        state.playing = false;
        state.events.send(SourceEvent::Ended);
    }

    /// Pause a source from outside the engine at `position`
    pub fn pause_at(&self, index: usize, position: f64) {
        let source = self.source(index);
        let mut state = source.borrow_mut();
        state.playing = false;
        state.position = position;
        state.events.send(SourceEvent::Paused {
            position,
            ended: false,
        });
    }
}

pub struct MockSource {
    url: String,
    state: Rc<RefCell<SourceState>>,
    shared: Rc<RefCell<Shared>>,
}

impl PlayableSource for MockSource {
    fn url(&self) -> &str {
        &self.url
    }

    fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.state.borrow_mut().rate = rate;
    }

    fn set_looping(&mut self, looping: bool) {
        self.state.borrow_mut().looping = looping;
    }

    fn set_preload(&mut self, eager: bool) {
        self.state.borrow_mut().preload = eager;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let (refuse, end_now) = {
            let shared = self.shared.borrow();
            (shared.refuse_play, shared.end_on_play)
        };

        let mut state = self.state.borrow_mut();
        state.play_calls += 1;
        self.shared.borrow_mut().ops.push(format!("play {}", state.url));
        if refuse {
            return Err(PlaybackError::StartRefused("autoplay blocked".to_string()));
        }

        state.playing = true;
        if end_now {
            state.playing = false;
            state.events.send(SourceEvent::Ended);
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        let mut state = self.state.borrow_mut();
        self.shared.borrow_mut().ops.push(format!("pause {}", state.url));
        if state.playing {
            state.playing = false;
            let position = state.position;
            state.events.send(SourceEvent::Paused {
                position,
                ended: false,
            });
        }
        Ok(())
    }

    fn seek(&mut self, position: f64) -> Result<(), PlaybackError> {
        let mut state = self.state.borrow_mut();
        self.shared
            .borrow_mut()
            .ops
            .push(format!("seek {} {}", state.url, position));
        state.position = position;
        Ok(())
    }

    fn is_paused(&self) -> bool {
        !self.state.borrow().playing
    }
}

pub struct MockBus(Rc<RefCell<f32>>);

impl BusNode for MockBus {
    fn set_gain(&mut self, gain: f32) {
        *self.0.borrow_mut() = gain;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MockNode {
    Media(SourceId),
    Panner(f32),
}

pub struct MockContext {
    shared: Rc<RefCell<Shared>>,
}

#[async_trait(?Send)]
impl ProcessingContext for MockContext {
    type Source = MockSource;
    type Bus = MockBus;
    type Node = MockNode;

    fn state(&self) -> ContextState {
        self.shared.borrow().context_state
    }

    async fn resume(&mut self) -> Result<(), ContextError> {
        let mut shared = self.shared.borrow_mut();
        shared.resume_calls += 1;
        if !shared.resume_grants {
            return Err(ContextError::Resume("no user gesture".to_string()));
        }
        shared.context_state = ContextState::Running;
        Ok(())
    }

    fn create_bus(&mut self, gain: f32) -> Result<MockBus, GraphError> {
        let mut shared = self.shared.borrow_mut();
        let call = shared.bus_calls;
        shared.bus_calls += 1;
        if shared.fail_create_bus == Some(call) {
            return Err(GraphError::NodeCreation {
                node: "gain",
                reason: "NotSupportedError".to_string(),
            });
        }

        let node = Rc::new(RefCell::new(gain));
        shared.bus_gains.push(node.clone());
        Ok(MockBus(node))
    }

    fn supports_stereo_pan(&self) -> bool {
        self.shared.borrow().stereo_pan
    }

    fn create_source_node(&mut self, source: &mut MockSource) -> Result<MockNode, GraphError> {
        if self.shared.borrow().fail_source_node {
            return Err(GraphError::NodeCreation {
                node: "media element source",
                reason: "InvalidStateError".to_string(),
            });
        }
        let mut state = source.state.borrow_mut();
        if state.attached {
            return Err(GraphError::AlreadyAttached);
        }
        state.attached = true;
        Ok(MockNode::Media(state.id))
    }

    fn create_stereo_panner(&mut self, pan: f32) -> Result<MockNode, GraphError> {
        self.shared.borrow_mut().panners.push(pan);
        Ok(MockNode::Panner(pan))
    }

    fn connect(&mut self, from: &MockNode, to: &MockNode) -> Result<(), GraphError> {
        self.shared
            .borrow_mut()
            .connections
            .push(format!("{:?} -> {:?}", from, to));
        Ok(())
    }

    fn connect_to_bus(&mut self, from: &MockNode, _bus: &MockBus) -> Result<(), GraphError> {
        self.shared
            .borrow_mut()
            .connections
            .push(format!("{:?} -> bus", from));
        Ok(())
    }
}

impl AudioEnvironment for MockEnvironment {
    type Source = MockSource;
    type Context = MockContext;

    fn page_url(&self) -> Option<Url> {
        Url::parse(PAGE).ok()
    }

    fn supports_processing_graph(&self) -> bool {
        self.shared.borrow().graph
    }

    fn create_context(&mut self) -> Option<MockContext> {
        Some(MockContext {
            shared: self.shared.clone(),
        })
    }

    fn create_source(
        &mut self,
        url: &str,
        mode: CrossOriginMode,
        events: SourceEventSender,
    ) -> Result<MockSource, PlaybackError> {
        if self.shared.borrow().fail_create {
            return Err(PlaybackError::Media("no audio element".to_string()));
        }

        let state = Rc::new(RefCell::new(SourceState {
            id: events.id(),
            url: url.to_string(),
            mode,
            volume: 1.0,
            rate: 1.0,
            looping: false,
            preload: false,
            playing: false,
            position: 0.0,
            play_calls: 0,
            attached: false,
            events,
        }));
        self.shared.borrow_mut().sources.push(state.clone());

        Ok(MockSource {
            url: url.to_string(),
            state,
            shared: self.shared.clone(),
        })
    }
}
