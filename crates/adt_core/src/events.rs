//! Event dispatch system
//!
//! Pointer events are dispatched to a target node and bubble up through its
//! ancestors until a handler stops propagation.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::document::NodeId;
use crate::host::Host;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_OVER: EventType = 1;
    pub const POINTER_LEAVE: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const CLICK: EventType = 4;
    /// Secondary-button press (right click)
    pub const CONTEXT_MENU: EventType = 5;

    /// Whether events of this type propagate to ancestors. Leave events
    /// only concern the node the pointer left.
    pub fn bubbles(event_type: EventType) -> bool {
        event_type != POINTER_LEAVE
    }
}

/// A UI event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    /// Node the event was dispatched to
    pub target: NodeId,
    /// Node whose handlers are currently running
    pub current_target: NodeId,
    pub data: EventData,
    pub timestamp: u64,
    pub propagation_stopped: bool,
    pub default_prevented: bool,
}

/// Event-specific data
#[derive(Clone, Debug)]
pub enum EventData {
    Pointer { x: f32, y: f32, button: u8 },
    None,
}

impl Event {
    pub fn new(event_type: EventType, target: NodeId, data: EventData) -> Self {
        Self {
            event_type,
            target,
            current_target: target,
            data,
            timestamp: 0,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn pointer(event_type: EventType, target: NodeId, x: f32, y: f32) -> Self {
        let button = if event_type == event_types::CONTEXT_MENU {
            2
        } else {
            0
        };
        Self::new(event_type, target, EventData::Pointer { x, y, button })
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        match self.data {
            EventData::Pointer { x, y, .. } => Some((x, y)),
            EventData::None => None,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Event handler function type
pub type EventHandler = Rc<dyn Fn(&Host, &mut Event)>;

type HandlerKey = (NodeId, EventType, &'static str);

/// Registered handlers, one per (node, event type, namespace).
///
/// Registering again under the same key replaces the previous handler.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: FxHashMap<HandlerKey, EventHandler>,
    order: Vec<HandlerKey>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        node: NodeId,
        event_type: EventType,
        namespace: &'static str,
        handler: EventHandler,
    ) {
        let key = (node, event_type, namespace);
        if self.handlers.insert(key, handler).is_none() {
            self.order.push(key);
        }
    }

    pub fn unregister(&mut self, node: NodeId, event_type: EventType, namespace: &'static str) {
        let key = (node, event_type, namespace);
        if self.handlers.remove(&key).is_some() {
            self.order.retain(|k| *k != key);
        }
    }

    /// Drop every handler attached to one of `nodes`
    pub fn forget_nodes(&mut self, nodes: &[NodeId]) {
        self.handlers.retain(|(n, _, _), _| !nodes.contains(n));
        self.order.retain(|(n, _, _)| !nodes.contains(n));
    }

    /// Handlers for a node and event type, in registration order
    pub fn handlers_for(&self, node: NodeId, event_type: EventType) -> Vec<EventHandler> {
        self.order
            .iter()
            .filter(|(n, t, _)| *n == node && *t == event_type)
            .filter_map(|key| self.handlers.get(key).cloned())
            .collect()
    }

    pub fn handler_count(&self, node: NodeId) -> usize {
        self.order.iter().filter(|(n, _, _)| *n == node).count()
    }
}
