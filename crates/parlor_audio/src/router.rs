//! Graph routing with direct-playback fallback
//!
//! Routing is best effort. Every caller goes through
//! [`GraphRouter::route_or_fallback`], which either attaches the source to a
//! bus (gain and pan applied in-graph) or scales the source's own volume by
//! the bus gain once and lets it play unrouted.

use crate::bus::{BusGains, BusKind, MixBusSet};
use crate::environment::{ContextState, PlayableSource, ProcessingContext};
use crate::error::GraphError;
use crate::origin::OriginClassifier;

/// Graph nodes kept alive for an attached source
#[derive(Debug)]
pub struct RouteNodes<N> {
    /// Node wrapping the media handle
    pub source: N,
    /// Optional stereo panner between source and bus
    pub panner: Option<N>,
}

/// Why a source plays unrouted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectReason {
    /// No processing context, or the target bus has no node
    NoGraph,
    /// Cross-origin media is never routed
    CrossOrigin,
    /// Node creation or connection failed
    Graph(GraphError),
}

/// Result of a routing attempt
#[derive(Debug)]
pub enum Routing<N> {
    /// Connected into the bus
    Attached(RouteNodes<N>),
    /// Playing at its own volume
    Direct(DirectReason),
}

impl<N> Routing<N> {
    /// Whether the source was attached
    pub fn is_attached(&self) -> bool {
        matches!(self, Routing::Attached(_))
    }
}

/// Owns the processing context and the buses
pub struct GraphRouter<C: ProcessingContext> {
    context: Option<C>,
    buses: MixBusSet<C::Bus>,
    classifier: OriginClassifier,
}

impl<C: ProcessingContext> GraphRouter<C> {
    /// Create a router. Buses are live when `context` is present.
    pub fn new(mut context: Option<C>, gains: &BusGains, classifier: OriginClassifier) -> Self {
        let buses = match context.as_mut() {
            Some(ctx) => MixBusSet::create(ctx, gains),
            None => MixBusSet::inert(gains),
        };

        Self {
            context,
            buses,
            classifier,
        }
    }

    /// Whether a processing context exists
    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Processing context state, if there is one
    pub fn context_state(&self) -> Option<ContextState> {
        self.context.as_ref().map(|ctx| ctx.state())
    }

    /// Mutable processing context
    pub fn context_mut(&mut self) -> Option<&mut C> {
        self.context.as_mut()
    }

    /// Buses
    pub fn buses(&self) -> &MixBusSet<C::Bus> {
        &self.buses
    }

    /// Mutable buses
    pub fn buses_mut(&mut self) -> &mut MixBusSet<C::Bus> {
        &mut self.buses
    }

    /// Try to connect `source` into `bus`, with `pan` clamped to [-1, 1].
    pub fn attach(&mut self, source: &mut C::Source, bus: BusKind, pan: f32) -> Routing<C::Node> {
        let Some(context) = self.context.as_mut() else {
            return Routing::Direct(DirectReason::NoGraph);
        };
        let Some(bus_node) = self.buses.get(bus).node() else {
            return Routing::Direct(DirectReason::NoGraph);
        };

        // Cross-origin media can be silenced by the graph; never attempt it
        if self.classifier.is_cross_origin(source.url()) {
            return Routing::Direct(DirectReason::CrossOrigin);
        }

        match connect_chain(context, source, bus_node, pan) {
            Ok(nodes) => Routing::Attached(nodes),
            Err(e) => Routing::Direct(DirectReason::Graph(e)),
        }
    }

    /// Attach, or fall back to scaling the source's volume by the bus gain.
    ///
    /// The gain is a snapshot: later bus changes do not reach a source that
    /// fell back. Without a live bus the volume is left untouched.
    pub fn route_or_fallback(
        &mut self,
        source: &mut C::Source,
        bus: BusKind,
        pan: f32,
    ) -> Routing<C::Node> {
        let routing = self.attach(source, bus, pan);

        if let Routing::Direct(reason) = &routing {
            let mix = self.buses.get(bus);
            if mix.is_live() {
                source.set_volume(source.volume() * mix.gain());
            }
            log::debug!("{} source {} plays unrouted: {:?}", bus, source.url(), reason);
        }

        routing
    }
}

fn connect_chain<C: ProcessingContext>(
    context: &mut C,
    source: &mut C::Source,
    bus: &C::Bus,
    pan: f32,
) -> Result<RouteNodes<C::Node>, GraphError> {
    let source_node = context.create_source_node(source)?;

    if context.supports_stereo_pan() {
        let panner = context.create_stereo_panner(clamp_pan(pan))?;
        context.connect(&source_node, &panner)?;
        context.connect_to_bus(&panner, bus)?;
        return Ok(RouteNodes {
            source: source_node,
            panner: Some(panner),
        });
    }

    context.connect_to_bus(&source_node, bus)?;
    Ok(RouteNodes {
        source: source_node,
        panner: None,
    })
}

/// Clamp a pan value to [-1, 1]; NaN pans to center
pub fn clamp_pan(pan: f32) -> f32 {
    if pan.is_nan() {
        0.0
    } else {
        pan.clamp(-1.0, 1.0)
    }
}
