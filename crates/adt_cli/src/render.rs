//! Headless rendering of a configuration

use anyhow::{Context, Result};
use adt_core::{ElementKind, Host, NodeId, ToolkitConfig};
use adt_widgets::prelude::*;

use crate::config::{CliConfig, DataFile, WidgetConfig, WidgetKind};

#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    pub width: f64,
    pub height: f64,
    pub duration_ms: u64,
}

/// Render every configured widget under a fresh root node and let all
/// transitions settle. Returns the root.
pub fn render_document(
    host: &Host,
    config: &CliConfig,
    data: &DataFile,
    options: RenderOptions,
) -> Result<NodeId> {
    let body = host.document().body();
    let root = host.create(ElementKind::Div, body)?;
    {
        let mut doc = host.document_mut();
        doc.set_dom_id(root, "adt-root")?;
        doc.set_style(root, "position", "relative")?;
        doc.set_style(root, "width", format!("{}px", options.width))?;
        doc.set_style(root, "height", format!("{}px", options.height))?;
    }

    for spec in &config.widgets {
        tracing::info!(kind = ?spec.kind, name = %spec.name, "rendering widget");
        let parent = Some(root);
        match spec.kind {
            WidgetKind::Widget => {
                let mut widget = Widget::with_parent(spec.name.as_str(), parent)?;
                configure(&mut widget, spec, options)?;
            }
            WidgetKind::Label => {
                let mut label = Label::with_parent(spec.name.as_str(), parent)?;
                if let Some(align) = &spec.align {
                    label.align(align);
                }
                configure(&mut label, spec, options)?;
            }
            WidgetKind::BarChart => {
                let mut chart = BarChart::with_parent(spec.name.as_str(), parent)?;
                chart.set_data(data.records(spec.data_key()));
                configure(&mut chart, spec, options)?;
            }
        }
    }

    let settle = options
        .duration_ms
        .max(ToolkitConfig::current().placeholder_fade_ms);
    host.advance(settle);
    Ok(root)
}

fn configure<W: WidgetExt + BaseAttributes>(
    widget: &mut W,
    spec: &WidgetConfig,
    options: RenderOptions,
) -> Result<()> {
    if let Some(x) = spec.x {
        widget.x(x, spec.unit);
    }
    if let Some(y) = spec.y {
        widget.y(y, spec.unit);
    }
    widget.relative(spec.relative);
    if let Some(width) = spec.width {
        widget.width(width);
    }
    if let Some(height) = spec.height {
        widget.height(height);
    }
    if let Some(margins) = spec.margins {
        widget.margins(margins);
    }
    if let Some(borders) = &spec.borders {
        widget.borders(borders.clone());
    }
    if let Some(color) = &spec.font_color {
        widget.font_color(color);
    }
    if let Some(size) = spec.font_size {
        widget.font_size(size);
    }
    if let Some(weight) = &spec.font_weight {
        widget.font_weight(weight);
    }
    if let Some(label) = &spec.label {
        widget.label(label);
    }
    if let Some(label) = &spec.x_label {
        widget.x_label(label);
    }
    if let Some(label) = &spec.y_label {
        widget.y_label(label);
    }
    if let Some(colors) = &spec.colors {
        widget.colors(colors.clone());
    }
    if let Some(factor) = spec.resize {
        widget.resize(factor)?;
    }

    widget
        .render(options.duration_ms)
        .with_context(|| format!("Failed to render `{}`", spec.name))?;

    if let Some(html) = &spec.describe {
        widget.describe(html.as_str())?;
    }
    if let Some(html) = &spec.placeholder {
        widget.placeholder(Some(html.as_str()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[[widget]]
kind = "label"
name = "title"
label = "Quarterly sales"

[[widget]]
kind = "bar_chart"
name = "sales"
x = 0
y = 30
x_label = "Quarter"

[[widget]]
kind = "widget"
name = "pending"
placeholder = "Loading"
"#;

    const DATA: &str = r#"{
        "sales": [
            {"x": "q1", "y": 4},
            {"x": "q2", "y": 6}
        ]
    }"#;

    #[test]
    fn renders_configured_widgets() {
        let host = Host::new();
        host.install();
        let config = CliConfig::from_toml_str(CONFIG).unwrap();
        let data: DataFile = serde_json::from_str(DATA).unwrap();
        let options = RenderOptions {
            width: 640.0,
            height: 480.0,
            duration_ms: 0,
        };

        let root = render_document(&host, &config, &data, options).unwrap();
        let outline = host.document().outline(root);
        assert!(outline.contains("id=\"label-title\""));
        assert!(outline.contains("Quarterly sales"));
        assert!(outline.contains("id=\"bar_chart-sales\""));
        assert_eq!(outline.matches("class=\"bar value\"").count(), 2);
        assert!(outline.contains("id=\"placeholder-pending\""));
        assert!(outline.contains("Loading"));
    }
}
