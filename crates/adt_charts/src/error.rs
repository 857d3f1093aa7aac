use adt_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    /// Input records that cannot produce a meaningful boundary
    #[error("malformed data: {0}")]
    DataShape(String),

    /// Axis kind incompatible with the boundary it is built from
    #[error("invalid axis: {0}")]
    Axis(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, ChartError>;
