//! Toolkit configuration
//!
//! Timing and sizing constants shared by every widget. The configuration is
//! process-wide and initialized at most once; until then readers get the
//! defaults.
//!
//! ```toml
//! render_duration_ms = 300
//! describe_timeout_ms = 10000
//! ```

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

static TOOLKIT_CONFIG: OnceLock<ToolkitConfig> = OnceLock::new();

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Transition duration used by `render` when none is given
    pub render_duration_ms: u64,
    /// Auto-dismiss delay of description popups
    pub describe_timeout_ms: u64,
    /// Fade duration of placeholder swaps
    pub placeholder_fade_ms: u64,
    /// Opacity of non-highlighted elements
    pub highlight_dim_opacity: f32,
    /// Inner and outer padding fraction of band scales
    pub band_padding: f64,
    pub default_width: f64,
    pub default_height: f64,
    pub default_font_size: f64,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            render_duration_ms: 500,
            describe_timeout_ms: 15_000,
            placeholder_fade_ms: 500,
            highlight_dim_opacity: 0.1,
            band_padding: 0.1,
            default_width: 200.0,
            default_height: 150.0,
            default_font_size: 10.0,
        }
    }
}

impl ToolkitConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Install the process-wide configuration (call once at startup)
    pub fn init(config: ToolkitConfig) -> Result<()> {
        TOOLKIT_CONFIG
            .set(config)
            .map_err(|_| CoreError::ConfigAlreadyInitialized)?;
        tracing::debug!("toolkit config initialized");
        Ok(())
    }

    /// The installed configuration, or the defaults
    pub fn current() -> ToolkitConfig {
        TOOLKIT_CONFIG.get().cloned().unwrap_or_default()
    }

    pub fn is_initialized() -> bool {
        TOOLKIT_CONFIG.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = ToolkitConfig::from_toml_str("render_duration_ms = 250").unwrap();
        assert_eq!(cfg.render_duration_ms, 250);
        assert_eq!(cfg.describe_timeout_ms, 15_000);
        assert_eq!(cfg.highlight_dim_opacity, 0.1);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = ToolkitConfig::from_toml_str("render_duration_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse(_)));
    }
}
