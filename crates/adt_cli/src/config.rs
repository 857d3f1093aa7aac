//! adt configuration and data file handling

use anyhow::{Context, Result};
use adt_charts::DataPoint;
use adt_core::ToolkitConfig;
use adt_widgets::{Borders, Colors, Sides, Unit};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level render configuration (adt.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub toolkit: ToolkitConfig,
    #[serde(default, rename = "widget", skip_serializing_if = "Vec::is_empty")]
    pub widgets: Vec<WidgetConfig>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Widget,
    Label,
    BarChart,
}

/// One `[[widget]]` table
#[derive(Debug, Deserialize, Serialize)]
pub struct WidgetConfig {
    pub kind: WidgetKind,
    pub name: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    /// Unit of `x` and `y`
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub relative: bool,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub margins: Option<Sides>,
    #[serde(default)]
    pub borders: Option<Borders>,
    #[serde(default)]
    pub font_color: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub font_weight: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
    /// Label text alignment
    #[serde(default)]
    pub align: Option<String>,
    #[serde(default)]
    pub colors: Option<Colors>,
    /// Uniform resize factor applied before rendering
    #[serde(default)]
    pub resize: Option<f64>,
    /// HTML shown on right click
    #[serde(default)]
    pub describe: Option<String>,
    /// HTML shown instead of the widget
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Key of the widget's records in the data file (defaults to `name`)
    #[serde(default)]
    pub data: Option<String>,
}

impl WidgetConfig {
    pub fn data_key(&self) -> &str {
        self.data.as_deref().unwrap_or(&self.name)
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CliConfig = toml::from_str(content)?;
        let mut seen = std::collections::HashSet::new();
        for widget in &config.widgets {
            if !seen.insert((widget.kind, widget.name.as_str())) {
                anyhow::bail!("duplicate widget `{}`", widget.name);
            }
        }
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Records to plot: one list shared by every chart, or one list per widget
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DataFile {
    Shared(Vec<DataPoint>),
    PerWidget(IndexMap<String, Vec<DataPoint>>),
}

impl Default for DataFile {
    fn default() -> Self {
        DataFile::Shared(Vec::new())
    }
}

impl DataFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn records(&self, key: &str) -> Vec<DataPoint> {
        match self {
            DataFile::Shared(records) => records.clone(),
            DataFile::PerWidget(map) => map.get(key).cloned().unwrap_or_default(),
        }
    }
}
