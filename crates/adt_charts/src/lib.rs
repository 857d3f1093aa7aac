//! adt_charts
//!
//! Stateless coordinate helpers shared by every chart widget:
//! - data boundaries (min/max per axis, categorical domains)
//! - linear, time and band scales from a boundary and a pixel extent
//! - tick formatting
//! - opacity highlighting of elements by class-encoded key

pub mod boundary;
pub mod error;
pub mod format;
pub mod highlight;
pub mod scale;

pub use boundary::{
    boundary, AxisBoundary, AxisConstraint, Boundary, BoundaryConstraints, DataPoint, XKind,
    XValue, YValue,
};
pub use error::{ChartError, Result};
pub use format::{default_tick_format, format_si};
pub use highlight::{decode, encode, highlight_selection};
pub use scale::{
    scale, scale_with_padding, AxisKind, AxisSpec, BandScale, LinearScale, Scale, ScaleSpec, Scales,
};
