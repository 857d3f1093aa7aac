//! adt Widget Library
//!
//! The generic widget model and the widgets built on it:
//!
//! - **Attributes**: a per-widget registry of named, defaulted values with
//!   generated fluent setters
//! - **Lifecycle**: `build` once, then `update` and `style` on every render
//! - **Widget core**: placement, uniform resize, description popups,
//!   placeholders and removal
//! - **Widgets**: [`Widget`], [`Label`], [`BarChart`]
//!
//! # Example
//!
//! ```
//! use adt_core::Host;
//! use adt_widgets::prelude::*;
//!
//! let host = Host::new();
//! host.install();
//!
//! let mut label = Label::new("title").unwrap();
//! label.label("Sales").width(120.0).render(0).unwrap();
//! let node = label.core().node().unwrap();
//! assert_eq!(host.document().node(node).unwrap().text(), Some("Sales"));
//! ```

pub mod attribute;
pub mod bar_chart;
mod describe;
pub mod error;
pub mod label;
pub mod lifecycle;
mod placeholder;
pub mod widget;

pub use attribute::{
    AttrValue, AttributeRegistry, Borders, Callback, Category, Colors, Formatter, Interaction,
    Position, SetterFn, Sides, Unit,
};
pub use bar_chart::{Bar, BarChart};
pub use error::{Phase, Result, WidgetError};
pub use label::Label;
pub use lifecycle::{Lifecycle, WidgetExt};
pub use widget::{BaseAttributes, Widget, WidgetCore};

/// Traits and widgets most callers need
pub mod prelude {
    pub use crate::attribute::{Borders, Colors, Interaction, Sides, Unit};
    pub use crate::bar_chart::BarChart;
    pub use crate::label::Label;
    pub use crate::lifecycle::{Lifecycle, WidgetExt};
    pub use crate::widget::{BaseAttributes, Widget};
}
