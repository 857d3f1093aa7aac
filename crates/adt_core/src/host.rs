//! Render host
//!
//! `Host` owns the document, the event dispatcher and the scheduler that
//! drives timers and opacity transitions. Everything runs on one thread: the
//! embedder installs a host for the current thread, widgets pick it up at
//! construction and the embedder advances the logical clock (one call per
//! animation frame in a real event loop, arbitrary steps in tests).
//!
//! ```rust
//! use adt_core::{ElementKind, Host};
//!
//! let host = Host::new();
//! let body = host.document().body();
//! let node = host.create(ElementKind::Div, body).unwrap();
//!
//! host.transition_opacity(node, 0.0, 500).unwrap();
//! host.advance(500);
//! assert_eq!(host.document().node(node).unwrap().opacity(), 0.0);
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::document::{Document, ElementKind, NodeId};
use crate::error::{CoreError, Result};
use crate::events::{event_types, Event, EventDispatcher, EventType};
use crate::transition::{Easing, ValueTransition};

new_key_type! {
    pub struct TimerId;
}

thread_local! {
    static CURRENT_HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
}

struct Timer {
    due_ms: u64,
    seq: u64,
    callback: Box<dyn FnOnce(&Host)>,
}

#[derive(Default)]
struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    timers: SlotMap<TimerId, Timer>,
    transitions: FxHashMap<NodeId, ValueTransition>,
}

impl Scheduler {
    fn take_due_timer(&mut self) -> Option<Box<dyn FnOnce(&Host)>> {
        let now = self.now_ms;
        let id = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= now)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(id, _)| id)?;
        self.timers.remove(id).map(|t| t.callback)
    }
}

struct HostInner {
    document: RefCell<Document>,
    events: RefCell<EventDispatcher>,
    scheduler: RefCell<Scheduler>,
}

/// Shared handle to a document host. Cloning is cheap.
#[derive(Clone)]
pub struct Host {
    inner: Rc<HostInner>,
}

impl Host {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(HostInner {
                document: RefCell::new(Document::new()),
                events: RefCell::new(EventDispatcher::new()),
                scheduler: RefCell::new(Scheduler::default()),
            }),
        }
    }

    /// Make this host the current one for the calling thread
    pub fn install(&self) {
        CURRENT_HOST.with(|current| *current.borrow_mut() = Some(self.clone()));
        tracing::debug!("host installed");
    }

    /// Remove the current thread's host, returning it
    pub fn uninstall() -> Option<Host> {
        CURRENT_HOST.with(|current| current.borrow_mut().take())
    }

    /// The host installed on the calling thread, if any
    pub fn current() -> Option<Host> {
        CURRENT_HOST.with(|current| current.borrow().clone())
    }

    pub fn ptr_eq(&self, other: &Host) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    pub fn create(&self, kind: ElementKind, parent: NodeId) -> Result<NodeId> {
        self.document_mut().create(kind, parent)
    }

    /// Detach a node, dropping its subtree together with the handlers and
    /// transitions attached to it.
    pub fn remove(&self, node: NodeId) -> Result<()> {
        let dropped = self.document_mut().remove(node)?;
        self.forget(&dropped);
        Ok(())
    }

    /// Remove every child of `node`
    pub fn clear_children(&self, node: NodeId) -> Result<()> {
        let dropped = self.document_mut().clear_children(node)?;
        self.forget(&dropped);
        Ok(())
    }

    fn forget(&self, nodes: &[NodeId]) {
        self.inner.events.borrow_mut().forget_nodes(nodes);
        let mut scheduler = self.inner.scheduler.borrow_mut();
        for node in nodes {
            scheduler.transitions.remove(node);
        }
    }

    // =====================================================================
    // Clock, timers and transitions
    // =====================================================================

    pub fn now_ms(&self) -> u64 {
        self.inner.scheduler.borrow().now_ms
    }

    /// Run `callback` once the clock has advanced by `delay_ms`
    pub fn set_timeout<F>(&self, delay_ms: u64, callback: F) -> TimerId
    where
        F: FnOnce(&Host) + 'static,
    {
        let mut scheduler = self.inner.scheduler.borrow_mut();
        let seq = scheduler.next_seq;
        scheduler.next_seq += 1;
        let due_ms = scheduler.now_ms.saturating_add(delay_ms);
        tracing::trace!(due_ms, "timer scheduled");
        scheduler.timers.insert(Timer {
            due_ms,
            seq,
            callback: Box::new(callback),
        })
    }

    /// Cancel a pending timer. Returns `false` if it already fired.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.scheduler.borrow_mut().timers.remove(id).is_some()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.scheduler.borrow().timers.len()
    }

    /// Animate a node's opacity toward `target`.
    ///
    /// Starting a transition on a node that already has one in flight
    /// replaces it, starting from the current value. A zero duration applies
    /// the target immediately.
    pub fn transition_opacity(&self, node: NodeId, target: f32, duration_ms: u64) -> Result<()> {
        let current = self
            .document()
            .node(node)
            .map(|n| n.opacity())
            .ok_or(CoreError::UnknownNode(node))?;
        let mut scheduler = self.inner.scheduler.borrow_mut();
        if duration_ms == 0 {
            scheduler.transitions.remove(&node);
            drop(scheduler);
            return self.document_mut().set_opacity(node, target);
        }
        scheduler.transitions.insert(
            node,
            ValueTransition::new(current, target, duration_ms, Easing::default()),
        );
        Ok(())
    }

    /// Target opacity of the transition in flight on `node`, if any
    pub fn transition_target(&self, node: NodeId) -> Option<f32> {
        self.inner
            .scheduler
            .borrow()
            .transitions
            .get(&node)
            .map(ValueTransition::target)
    }

    pub fn active_transitions(&self) -> usize {
        self.inner.scheduler.borrow().transitions.len()
    }

    /// Advance the logical clock, stepping transitions and then firing due
    /// timers in due order.
    pub fn advance(&self, ms: u64) {
        {
            let mut scheduler = self.inner.scheduler.borrow_mut();
            scheduler.now_ms = scheduler.now_ms.saturating_add(ms);
            let mut doc = self.inner.document.borrow_mut();
            let mut done = Vec::new();
            for (node, transition) in scheduler.transitions.iter_mut() {
                transition.step(ms as f32);
                if doc.set_opacity(*node, transition.value()).is_err() || transition.is_finished()
                {
                    done.push(*node);
                }
            }
            for node in done {
                scheduler.transitions.remove(&node);
            }
        }

        loop {
            let next = self.inner.scheduler.borrow_mut().take_due_timer();
            match next {
                Some(callback) => callback(self),
                None => break,
            }
        }
    }

    // =====================================================================
    // Events
    // =====================================================================

    /// Register a handler, replacing any previous one for the same node and
    /// event type.
    pub fn on<F>(&self, node: NodeId, event_type: EventType, handler: F)
    where
        F: Fn(&Host, &mut Event) + 'static,
    {
        self.on_ns(node, event_type, "", handler);
    }

    /// Like [`Host::on`], keyed additionally by a namespace so independent
    /// handlers for the same event can coexist.
    pub fn on_ns<F>(&self, node: NodeId, event_type: EventType, namespace: &'static str, handler: F)
    where
        F: Fn(&Host, &mut Event) + 'static,
    {
        self.inner
            .events
            .borrow_mut()
            .register(node, event_type, namespace, Rc::new(handler));
    }

    pub fn off(&self, node: NodeId, event_type: EventType, namespace: &'static str) {
        self.inner
            .events
            .borrow_mut()
            .unregister(node, event_type, namespace);
    }

    pub fn handler_count(&self, node: NodeId) -> usize {
        self.inner.events.borrow().handler_count(node)
    }

    /// Dispatch an event to its target, bubbling to ancestors unless the type
    /// does not bubble. Returns the
    /// event so callers can inspect `default_prevented`.
    pub fn dispatch(&self, mut event: Event) -> Event {
        event.timestamp = self.now_ms();
        let path: Vec<NodeId> = {
            let doc = self.document();
            let mut path = Vec::new();
            let mut cursor = Some(event.target);
            while let Some(id) = cursor {
                let Some(node) = doc.node(id) else {
                    break;
                };
                path.push(id);
                cursor = node.parent();
            }
            path
        };

        for node in path {
            let handlers = self.inner.events.borrow().handlers_for(node, event.event_type);
            event.current_target = node;
            for handler in handlers {
                handler(self, &mut event);
            }
            if event.propagation_stopped || !event_types::bubbles(event.event_type) {
                break;
            }
        }
        event
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}
