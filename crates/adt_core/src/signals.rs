//! Named signals
//!
//! A small publish/subscribe hub: widgets and application code connect
//! handlers to a signal name and anyone can emit a JSON payload on it.

use indexmap::IndexMap;
use serde_json::Value;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct SubscriptionId;
}

type SignalHandler = Box<dyn FnMut(&Value)>;

struct Subscription {
    name: String,
    handler: SignalHandler,
}

#[derive(Default)]
pub struct Signals {
    subscriptions: SlotMap<SubscriptionId, Subscription>,
    /// Subscription ids per signal name, in connection order
    by_name: IndexMap<String, Vec<SubscriptionId>>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect<F>(&mut self, name: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: FnMut(&Value) + 'static,
    {
        let name = name.into();
        let id = self.subscriptions.insert(Subscription {
            name: name.clone(),
            handler: Box::new(handler),
        });
        self.by_name.entry(name).or_default().push(id);
        id
    }

    /// Returns `false` if the subscription was already gone
    pub fn disconnect(&mut self, id: SubscriptionId) -> bool {
        let Some(sub) = self.subscriptions.remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_name.get_mut(&sub.name) {
            ids.retain(|s| *s != id);
            if ids.is_empty() {
                self.by_name.shift_remove(&sub.name);
            }
        }
        true
    }

    /// Run every handler connected to `name`. Returns how many ran.
    pub fn emit(&mut self, name: &str, payload: &Value) -> usize {
        let Some(ids) = self.by_name.get(name) else {
            tracing::trace!(signal = name, "emit without subscribers");
            return 0;
        };
        let mut ran = 0;
        for id in ids {
            if let Some(sub) = self.subscriptions.get_mut(*id) {
                (sub.handler)(payload);
                ran += 1;
            }
        }
        ran
    }

    pub fn handler_count(&self, name: &str) -> usize {
        self.by_name.get(name).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn handlers_run_in_connection_order() {
        let mut signals = Signals::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let log = log.clone();
            signals.connect("data", move |v| log.borrow_mut().push(format!("{tag}:{v}")));
        }
        assert_eq!(signals.emit("data", &json!(3)), 2);
        assert_eq!(*log.borrow(), vec!["first:3", "second:3"]);
    }

    #[test]
    fn disconnect_removes_only_that_handler() {
        let mut signals = Signals::new();
        let a = signals.connect("s", |_| {});
        let _b = signals.connect("s", |_| {});
        assert!(signals.disconnect(a));
        assert!(!signals.disconnect(a));
        assert_eq!(signals.handler_count("s"), 1);
        assert_eq!(signals.emit("missing", &Value::Null), 0);
    }
}
