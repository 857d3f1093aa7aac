//! Core error types

use thiserror::Error;

use crate::document::NodeId;

/// Errors raised by the document host and toolkit configuration
#[derive(Error, Debug)]
pub enum CoreError {
    /// The node was never created or has been detached
    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// Selector outside the supported `tag`, `.class`, `tag.class` grammar
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),

    /// Failed to read a configuration file
    #[error("failed to read config: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// Failed to parse a configuration file
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// `ToolkitConfig::init` was called more than once
    #[error("toolkit config already initialized")]
    ConfigAlreadyInitialized,
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
