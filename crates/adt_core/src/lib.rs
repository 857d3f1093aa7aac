//! adt Core Runtime
//!
//! Foundational primitives shared by the adt widget crates:
//!
//! - **Host**: a retained document tree with ids, classes, style properties
//!   and opacity, standing in for the browser DOM
//! - **Scheduling**: timers and opacity transitions on a logical clock
//! - **Event Dispatch**: pointer events that bubble through the tree
//! - **Signals**: named publish/subscribe
//! - **Config**: process-wide toolkit constants

pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod host;
pub mod selector;
pub mod signals;
pub mod transition;

pub use config::ToolkitConfig;
pub use document::{Document, ElementKind, Node, NodeId, NodeSnapshot};
pub use error::{CoreError, Result};
pub use events::{event_types, Event, EventData, EventHandler, EventType};
pub use host::{Host, TimerId};
pub use selector::Selector;
pub use signals::{Signals, SubscriptionId};
pub use transition::{Easing, ValueTransition};
