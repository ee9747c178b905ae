//! Browser environment backed by Web Audio
//!
//! ```text
//! HtmlAudioElement ─► MediaElementAudioSourceNode ─► StereoPannerNode ─► GainNode (bus) ─► destination
//!        └───────────── unrouted: element volume = gain × bus gain ──────────────────────► speakers
//! ```

#![cfg(all(target_arch = "wasm32", feature = "web"))]

use async_trait::async_trait;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, AudioContextState, AudioNode, GainNode, HtmlAudioElement};

use crate::environment::{
    AudioEnvironment, BusNode, ContextState, CrossOriginMode, PlayableSource, ProcessingContext,
    SourceEvent, SourceEventSender,
};
use crate::error::{ContextError, GraphError, PlaybackError};

/// Standard constructor first, then the prefixed one older WebKit ships
const CONTEXT_CONSTRUCTORS: [&str; 2] = ["AudioContext", "webkitAudioContext"];

fn context_constructor(window: &web_sys::Window) -> Option<js_sys::Function> {
    CONTEXT_CONSTRUCTORS.iter().find_map(|name| {
        js_sys::Reflect::get(window, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
    })
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// `<audio>` element with its `ended` / `pause` listeners
pub struct WebSource {
    element: HtmlAudioElement,
    url: String,
    on_ended: Closure<dyn FnMut()>,
    on_pause: Closure<dyn FnMut()>,
    attached: bool,
}

impl WebSource {
    fn new(url: &str, mode: CrossOriginMode, events: SourceEventSender) -> Result<Self, PlaybackError> {
        let element = HtmlAudioElement::new().map_err(|e| PlaybackError::Media(js_message(&e)))?;
        if mode == CrossOriginMode::Anonymous {
            element.set_cross_origin(Some("anonymous"));
        }
        element.set_src(url);

        let ended_events = events.clone();
        let on_ended = Closure::<dyn FnMut()>::new(move || ended_events.send(SourceEvent::Ended));

        let paused_element = element.clone();
        let on_pause = Closure::<dyn FnMut()>::new(move || {
            events.send(SourceEvent::Paused {
                position: paused_element.current_time(),
                ended: paused_element.ended(),
            })
        });

        element
            .add_event_listener_with_callback("ended", on_ended.as_ref().unchecked_ref())
            .map_err(|e| PlaybackError::Media(js_message(&e)))?;
        element
            .add_event_listener_with_callback("pause", on_pause.as_ref().unchecked_ref())
            .map_err(|e| PlaybackError::Media(js_message(&e)))?;

        Ok(Self {
            element,
            url: url.to_string(),
            on_ended,
            on_pause,
            attached: false,
        })
    }
}

impl Drop for WebSource {
    fn drop(&mut self) {
        // Listeners must go before their closures are freed
        let _ = self
            .element
            .remove_event_listener_with_callback("ended", self.on_ended.as_ref().unchecked_ref());
        let _ = self
            .element
            .remove_event_listener_with_callback("pause", self.on_pause.as_ref().unchecked_ref());
    }
}

impl PlayableSource for WebSource {
    fn url(&self) -> &str {
        &self.url
    }

    fn volume(&self) -> f32 {
        self.element.volume() as f32
    }

    fn set_volume(&mut self, volume: f32) {
        self.element.set_volume(f64::from(volume.clamp(0.0, 1.0)));
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.element.set_playback_rate(f64::from(rate));
    }

    fn set_looping(&mut self, looping: bool) {
        self.element.set_loop(looping);
    }

    fn set_preload(&mut self, eager: bool) {
        self.element.set_preload(if eager { "auto" } else { "none" });
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let promise = self
            .element
            .play()
            .map_err(|e| PlaybackError::StartRefused(js_message(&e)))?;

        // Autoplay refusals arrive as a rejected promise
        let url = self.url.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::debug!("Playback of {} rejected: {}", url, js_message(&e));
            }
        });
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        self.element
            .pause()
            .map_err(|e| PlaybackError::Stop(js_message(&e)))
    }

    fn seek(&mut self, position: f64) -> Result<(), PlaybackError> {
        self.element.set_current_time(position);
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }
}

/// Gain node used as a bus
pub struct WebBus(GainNode);

impl BusNode for WebBus {
    fn set_gain(&mut self, gain: f32) {
        self.0.gain().set_value(gain);
    }
}

/// Web Audio context
pub struct WebContext {
    context: AudioContext,
    stereo_pan: bool,
}

impl WebContext {
    fn new(context: AudioContext) -> Self {
        let stereo_pan =
            js_sys::Reflect::has(&context, &JsValue::from_str("createStereoPanner")).unwrap_or(false);
        Self {
            context,
            stereo_pan,
        }
    }
}

#[async_trait(?Send)]
impl ProcessingContext for WebContext {
    type Source = WebSource;
    type Bus = WebBus;
    type Node = AudioNode;

    fn state(&self) -> ContextState {
        match self.context.state() {
            AudioContextState::Running => ContextState::Running,
            AudioContextState::Closed => ContextState::Closed,
            _ => ContextState::Suspended,
        }
    }

    async fn resume(&mut self) -> Result<(), ContextError> {
        if self.state() == ContextState::Closed {
            return Err(ContextError::Closed);
        }
        let promise = self
            .context
            .resume()
            .map_err(|e| ContextError::Resume(js_message(&e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| ContextError::Resume(js_message(&e)))?;
        Ok(())
    }

    fn create_bus(&mut self, gain: f32) -> Result<WebBus, GraphError> {
        let node = self.context.create_gain().map_err(|e| GraphError::NodeCreation {
            node: "gain",
            reason: js_message(&e),
        })?;
        node.gain().set_value(gain);
        node.connect_with_audio_node(&self.context.destination())
            .map_err(|e| GraphError::Connection(js_message(&e)))?;
        Ok(WebBus(node))
    }

    fn supports_stereo_pan(&self) -> bool {
        self.stereo_pan
    }

    fn create_source_node(&mut self, source: &mut WebSource) -> Result<AudioNode, GraphError> {
        if source.attached {
            return Err(GraphError::AlreadyAttached);
        }
        let node = self
            .context
            .create_media_element_source(&source.element)
            .map_err(|e| GraphError::NodeCreation {
                node: "media element source",
                reason: js_message(&e),
            })?;
        source.attached = true;
        Ok(node.into())
    }

    fn create_stereo_panner(&mut self, pan: f32) -> Result<AudioNode, GraphError> {
        let node = self
            .context
            .create_stereo_panner()
            .map_err(|e| GraphError::NodeCreation {
                node: "stereo panner",
                reason: js_message(&e),
            })?;
        node.pan().set_value(pan);
        Ok(node.into())
    }

    fn connect(&mut self, from: &AudioNode, to: &AudioNode) -> Result<(), GraphError> {
        from.connect_with_audio_node(to)
            .map(|_| ())
            .map_err(|e| GraphError::Connection(js_message(&e)))
    }

    fn connect_to_bus(&mut self, from: &AudioNode, bus: &WebBus) -> Result<(), GraphError> {
        from.connect_with_audio_node(&bus.0)
            .map(|_| ())
            .map_err(|e| GraphError::Connection(js_message(&e)))
    }
}

/// Environment of the current browser window
pub struct WebEnvironment {
    window: web_sys::Window,
}

impl WebEnvironment {
    /// Bind to the global window; fails outside a window context
    pub fn new() -> Result<Self, PlaybackError> {
        let window = web_sys::window()
            .ok_or_else(|| PlaybackError::Media("no global window".to_string()))?;
        Ok(Self { window })
    }
}

impl AudioEnvironment for WebEnvironment {
    type Source = WebSource;
    type Context = WebContext;

    fn page_url(&self) -> Option<Url> {
        let href = self.window.location().href().ok()?;
        Url::parse(&href).ok()
    }

    fn supports_processing_graph(&self) -> bool {
        context_constructor(&self.window).is_some()
    }

    fn create_context(&mut self) -> Option<WebContext> {
        let constructor = context_constructor(&self.window)?;
        match js_sys::Reflect::construct(&constructor, &js_sys::Array::new()) {
            Ok(context) => Some(WebContext::new(context.unchecked_into::<AudioContext>())),
            Err(e) => {
                log::warn!("Failed to create AudioContext: {}", js_message(&e));
                None
            }
        }
    }

    fn create_source(
        &mut self,
        url: &str,
        mode: CrossOriginMode,
        events: SourceEventSender,
    ) -> Result<WebSource, PlaybackError> {
        WebSource::new(url, mode, events)
    }
}
