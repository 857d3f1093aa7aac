//! Widget error types

use std::fmt;

use adt_charts::ChartError;
use adt_core::CoreError;
use thiserror::Error;

/// Render phases a concrete widget supplies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Build,
    Update,
    Style,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Build => "build",
            Phase::Update => "update",
            Phase::Style => "style",
        })
    }
}

#[derive(Error, Debug)]
pub enum WidgetError {
    /// `add` called twice for the same attribute name
    #[error("attribute `{0}` is already declared (use `redeclare` to change its default)")]
    DuplicateAttribute(String),

    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),

    #[error("attribute `{name}` holds {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A concrete widget did not supply a phase its rendering needs
    #[error("widget `{widget}` does not implement the {phase} phase")]
    PhaseNotImplemented { widget: String, phase: Phase },

    /// The widget was constructed without a render host
    #[error("widget `{0}` has no render host")]
    NoHost(String),

    /// The widget was removed from the document
    #[error("widget `{0}` has been removed")]
    Removed(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

pub type Result<T> = std::result::Result<T, WidgetError>;
