//! Vertical bar chart
//!
//! One band per distinct x value; records with series mappings draw one bar
//! per series side by side inside the band. The y axis always starts at 0.

use adt_charts::{
    boundary, encode, scale_with_padding, AxisKind, AxisSpec, BoundaryConstraints, DataPoint,
    ScaleSpec, XValue, YValue,
};
use adt_core::{event_types, ElementKind, EventType, Host, NodeId, ToolkitConfig};

use crate::attribute::{AttrValue, Callback, Category, Formatter, Interaction, Sides};
use crate::attribute_setters;
use crate::error::{Phase, Result};
use crate::lifecycle::Lifecycle;
use crate::widget::WidgetCore;

/// Series key used for records with a scalar y value
pub const SCALAR_SERIES: &str = "value";

const Y_TICKS: f64 = 5.0;

/// Nodes created by the build phase
#[derive(Clone, Copy, Debug)]
struct Parts {
    svg: NodeId,
    plot: NodeId,
    x_axis: NodeId,
    y_axis: NodeId,
    x_title: NodeId,
    y_title: NodeId,
}

/// One drawn bar and the datum behind it
#[derive(Clone, Debug)]
pub struct Bar {
    pub node: NodeId,
    pub series: String,
    pub series_index: usize,
    pub x: XValue,
    pub value: f64,
}

pub struct BarChart {
    core: WidgetCore,
    data: Vec<DataPoint>,
    parts: Option<Parts>,
    bars: Vec<Bar>,
    x_ticks: Vec<(NodeId, XValue)>,
    y_ticks: Vec<(NodeId, f64)>,
}

impl BarChart {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_parent(name, None)
    }

    pub fn with_parent(name: impl Into<String>, parent: Option<NodeId>) -> Result<Self> {
        let mut core = WidgetCore::new(name, "bar_chart", ElementKind::Div, parent)?;
        let attrs = core.attrs_mut();
        attrs.add("bar_padding", 2.0, Some(Category::Dimension), None)?;
        attrs.add("y_ticks", Y_TICKS, None, None)?;
        attrs.redeclare(
            "margins",
            Sides {
                top: 10.0,
                right: 10.0,
                bottom: 30.0,
                left: 40.0,
            },
        )?;
        Ok(Self {
            core,
            data: Vec::new(),
            parts: None,
            bars: Vec::new(),
            x_ticks: Vec::new(),
            y_ticks: Vec::new(),
        })
    }

    /// Replace the records; takes effect on the next render
    pub fn set_data(&mut self, data: Vec<DataPoint>) -> &mut Self {
        self.data = data;
        self
    }

    pub fn data(&self) -> &[DataPoint] {
        &self.data
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Group holding the bar rects, once built
    pub fn plot_node(&self) -> Option<NodeId> {
        self.parts.map(|p| p.plot)
    }

    fn parts(&self) -> Result<Parts> {
        self.parts
            .ok_or_else(|| self.core.phase_not_implemented(Phase::Build))
    }
}

attribute_setters! {
    impl BarChart {
        /// Gap between the bars of one band
        bar_padding(value: f64) => "bar_padding", AttrValue::Number(value);
        /// Number of y axis ticks
        y_ticks(count: usize) => "y_ticks", AttrValue::Number(count as f64);
    }
}

impl Lifecycle for BarChart {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn build(&mut self, _duration_ms: u64) -> Result<()> {
        let (host, node) = self.core.live()?;
        let svg = host.create(ElementKind::Svg, node)?;
        let plot = host.create(ElementKind::Group, svg)?;
        let x_axis = host.create(ElementKind::Group, svg)?;
        let y_axis = host.create(ElementKind::Group, svg)?;
        let x_title = host.create(ElementKind::Text, svg)?;
        let y_title = host.create(ElementKind::Text, svg)?;
        {
            let mut doc = host.document_mut();
            doc.add_class(plot, "plot")?;
            doc.add_class(x_axis, "x-axis")?;
            doc.add_class(y_axis, "y-axis")?;
            doc.add_class(x_title, "axis-title")?;
            doc.add_class(y_title, "axis-title")?;
            doc.set_attr(y_title, "transform", "rotate(-90)")?;
        }
        self.parts = Some(Parts {
            svg,
            plot,
            x_axis,
            y_axis,
            x_title,
            y_title,
        });
        Ok(())
    }

    fn update(&mut self, duration_ms: u64) -> Result<()> {
        let (host, _) = self.core.live()?;
        let parts = self.parts()?;
        let attrs = self.core.attrs();
        let width = attrs.number("width")?;
        let height = attrs.number("height")?;
        let margins = attrs.sides("margins")?;
        let bar_padding = attrs.number("bar_padding")?;
        let tick_count = attrs.number("y_ticks")?.max(2.0) as usize;

        let inner_w = (width - margins.left - margins.right).max(0.0);
        let inner_h = (height - margins.top - margins.bottom).max(0.0);

        let extent = boundary(&self.data, Some(&BoundaryConstraints::y_min(0.0)))?;
        let spec = ScaleSpec {
            x: AxisSpec::new(AxisKind::Band),
            y: AxisSpec::default().reversed(),
        };
        let band_padding = ToolkitConfig::current().band_padding;
        let scales = scale_with_padding(&extent, inner_w, inner_h, spec, band_padding)?;
        let baseline = scales.y.map_number(extent.y.min).unwrap_or(inner_h);

        {
            let mut doc = host.document_mut();
            doc.set_attr(parts.svg, "width", width.to_string())?;
            doc.set_attr(parts.svg, "height", height.to_string())?;
            let translate = format!("translate({},{})", margins.left, margins.top);
            doc.set_attr(parts.plot, "transform", translate.clone())?;
            doc.set_attr(parts.y_axis, "transform", translate)?;
            doc.set_attr(
                parts.x_axis,
                "transform",
                format!("translate({},{})", margins.left, margins.top + inner_h),
            )?;
        }

        // Bars are rebound from scratch on every update.
        host.clear_children(parts.plot)?;
        self.bars.clear();
        let band_width = scales.x.band_width();
        for record in &self.data {
            let Some(band_start) = scales.x.map(&record.x) else {
                continue;
            };
            let values: Vec<(&str, f64)> = match &record.y {
                YValue::Scalar(v) => vec![(SCALAR_SERIES, *v)],
                YValue::Series(map) => map.iter().map(|(k, v)| (k.as_str(), *v)).collect(),
            };
            let n = values.len().max(1) as f64;
            let bar_w = ((band_width - bar_padding * (n - 1.0)) / n).max(0.0);

            for (idx, (series, value)) in values.into_iter().enumerate() {
                let top = scales.y.map_number(value).unwrap_or(baseline);
                let x = band_start + idx as f64 * (bar_w + bar_padding);
                let rect = host.create(ElementKind::Rect, parts.plot)?;
                {
                    let mut doc = host.document_mut();
                    doc.add_class(rect, "bar")?;
                    doc.add_class(rect, encode(series))?;
                    doc.set_attr(rect, "x", x.to_string())?;
                    doc.set_attr(rect, "y", top.min(baseline).to_string())?;
                    doc.set_attr(rect, "width", bar_w.to_string())?;
                    doc.set_attr(rect, "height", (top - baseline).abs().to_string())?;
                    doc.set_opacity(rect, 0.0)?;
                }
                host.transition_opacity(rect, 1.0, duration_ms)?;
                self.bars.push(Bar {
                    node: rect,
                    series: series.to_string(),
                    series_index: idx,
                    x: record.x.clone(),
                    value,
                });
            }
        }

        host.clear_children(parts.x_axis)?;
        self.x_ticks.clear();
        let x_ticks = if self.data.is_empty() {
            Vec::new()
        } else {
            scales.x.ticks(0)
        };
        for tick in x_ticks {
            let Some(start) = scales.x.map(&tick) else {
                continue;
            };
            let text = host.create(ElementKind::Text, parts.x_axis)?;
            let mut doc = host.document_mut();
            doc.add_class(text, "tick")?;
            doc.set_attr(text, "x", (start + band_width / 2.0).to_string())?;
            doc.set_attr(text, "text-anchor", "middle")?;
            drop(doc);
            self.x_ticks.push((text, tick));
        }

        host.clear_children(parts.y_axis)?;
        self.y_ticks.clear();
        for tick in scales.y.ticks(tick_count) {
            let XValue::Number(value) = tick else {
                continue;
            };
            let y = scales.y.map_number(value).unwrap_or(baseline);
            let text = host.create(ElementKind::Text, parts.y_axis)?;
            let mut doc = host.document_mut();
            doc.add_class(text, "tick")?;
            doc.set_attr(text, "y", y.to_string())?;
            doc.set_attr(text, "text-anchor", "end")?;
            drop(doc);
            self.y_ticks.push((text, value));
        }

        tracing::debug!(
            widget = %self.core.dom_id(),
            bars = self.bars.len(),
            "bars rebound"
        );
        Ok(())
    }

    fn style(&mut self, _duration_ms: u64) -> Result<()> {
        let (host, node) = self.core.live()?;
        let parts = self.parts()?;
        self.core.apply_font(node)?;

        let attrs = self.core.attrs();
        let colors = attrs.colors("colors")?.clone();
        let x_format = attrs.formatter("x_tick_format")?;
        let y_format = attrs.formatter("y_tick_format")?;
        {
            let mut doc = host.document_mut();
            for bar in &self.bars {
                doc.set_attr(bar.node, "fill", colors.for_series(&bar.series, bar.series_index))?;
            }
            for (text, tick) in &self.x_ticks {
                doc.set_text(*text, format_x(&x_format, tick))?;
            }
            for (text, value) in &self.y_ticks {
                doc.set_text(*text, y_format(*value))?;
            }
            doc.set_text(parts.x_title, attrs.text("x_label")?)?;
            doc.set_text(parts.y_title, attrs.text("y_label")?)?;
        }

        let bindings: [(&str, EventType); 3] = [
            ("mouseover", event_types::POINTER_OVER),
            ("mouseleave", event_types::POINTER_LEAVE),
            ("click", event_types::CLICK),
        ];
        for (attr, event_type) in bindings {
            let callback = attrs.callback(attr)?;
            for bar in &self.bars {
                match &callback {
                    Some(callback) => {
                        bind(&host, self.core.dom_id(), bar, event_type, callback.clone())
                    }
                    None => host.off(bar.node, event_type, ""),
                }
            }
        }
        Ok(())
    }
}

fn format_x(format: &Formatter, tick: &XValue) -> String {
    match tick {
        XValue::Number(v) => format(*v),
        other => other.to_string(),
    }
}

fn bind(
    host: &Host,
    widget: String,
    bar: &Bar,
    event_type: EventType,
    callback: Callback,
) {
    let interaction = Interaction {
        widget,
        series: Some(bar.series.clone()),
        x: Some(bar.x.clone()),
        value: Some(bar.value),
        pointer: None,
    };
    host.on(bar.node, event_type, move |host, event| {
        let mut hit = interaction.clone();
        hit.pointer = event.position();
        callback(host, &hit);
    });
}
