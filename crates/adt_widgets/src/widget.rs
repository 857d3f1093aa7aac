//! Widget core
//!
//! [`WidgetCore`] is the part every widget embeds: it owns the widget's
//! document node and attribute registry, tracks the lifecycle flags and
//! implements the behaviours shared by all widgets (placement, resize,
//! describe popups, placeholders, removal). Concrete widgets hold a
//! `WidgetCore` field and implement [`Lifecycle`] on top of it.
//!
//! # Host
//!
//! Construction picks up the render host installed on the current thread.
//! Without one, the widget is created disabled: construction succeeds and
//! logs a warning, `render` fails with [`WidgetError::NoHost`] and visual
//! operations do nothing.

use std::cell::RefCell;
use std::rc::Rc;

use adt_charts::default_tick_format;
use adt_core::{ElementKind, Host, NodeId, TimerId, ToolkitConfig};

use crate::attribute::{
    position_setter, AttrValue, AttributeRegistry, Borders, Category, Colors, Interaction,
    Position, Sides, Unit,
};
use crate::attribute_setters;
use crate::describe::DescriptionSlot;
use crate::error::{Phase, Result, WidgetError};
use crate::lifecycle::Lifecycle;

pub struct WidgetCore {
    name: String,
    type_tag: String,
    host: Option<Host>,
    node: Option<NodeId>,
    attrs: AttributeRegistry,
    built: bool,
    render_count: u64,
    pending_resize: Option<f64>,
    removed: bool,
    pub(crate) description: DescriptionSlot,
    pub(crate) placeholder_timer: Option<TimerId>,
}

impl WidgetCore {
    /// Create the core using the current thread's host
    pub fn new(
        name: impl Into<String>,
        type_tag: &str,
        element: ElementKind,
        parent: Option<NodeId>,
    ) -> Result<Self> {
        Self::with_host(Host::current(), name, type_tag, element, parent)
    }

    pub fn with_host(
        host: Option<Host>,
        name: impl Into<String>,
        type_tag: &str,
        element: ElementKind,
        parent: Option<NodeId>,
    ) -> Result<Self> {
        let name = name.into();
        let mut attrs = AttributeRegistry::new();
        register_base_attributes(&mut attrs, &ToolkitConfig::current())?;

        let mut core = Self {
            name,
            type_tag: type_tag.to_string(),
            host: None,
            node: None,
            attrs,
            built: false,
            render_count: 0,
            pending_resize: None,
            removed: false,
            description: Rc::new(RefCell::new(None)),
            placeholder_timer: None,
        };

        match host {
            Some(host) => {
                let node = core.attach(&host, element, parent)?;
                core.host = Some(host);
                core.node = Some(node);
            }
            None => {
                tracing::warn!(
                    widget = %core.dom_id(),
                    "no render host installed; widget is disabled"
                );
            }
        }
        Ok(core)
    }

    fn attach(&self, host: &Host, element: ElementKind, parent: Option<NodeId>) -> Result<NodeId> {
        let parent = parent.unwrap_or_else(|| host.document().body());
        let node = host.create(element, parent)?;
        let mut doc = host.document_mut();
        doc.set_dom_id(node, self.dom_id())?;
        doc.add_class(node, "adt-widget")?;
        doc.add_class(node, self.type_tag.clone())?;
        doc.set_style(node, "position", "absolute")?;
        doc.set_style(node, "visibility", "hidden")?;
        doc.set_style(node, "pointer-events", "none")?;
        Ok(node)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Document id: `{type}-{name}`
    pub fn dom_id(&self) -> String {
        format!("{}-{}", self.type_tag, self.name)
    }

    pub fn host(&self) -> Option<&Host> {
        self.host.as_ref()
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn attrs(&self) -> &AttributeRegistry {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut AttributeRegistry {
        &mut self.attrs
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn pending_resize(&self) -> Option<f64> {
        self.pending_resize
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Assign an attribute through the registry
    pub fn set_attr(&mut self, name: &str, value: AttrValue, extra: &[AttrValue]) -> Result<()> {
        if self.removed {
            return Err(WidgetError::Removed(self.dom_id()));
        }
        self.attrs.set(name, value, extra)
    }

    /// Setter used by the generated fluent methods, which cannot fail
    /// without breaking the chain. On a removed widget the value is dropped
    /// with a warning; use [`WidgetCore::set_attr`] to get `Removed` back.
    pub fn set_or_warn(&mut self, name: &str, value: impl Into<AttrValue>) {
        if let Err(err) = self.set_attr(name, value.into(), &[]) {
            tracing::warn!(widget = %self.dom_id(), attribute = name, %err, "attribute not set");
        }
    }

    pub fn phase_not_implemented(&self, phase: Phase) -> WidgetError {
        WidgetError::PhaseNotImplemented {
            widget: self.dom_id(),
            phase,
        }
    }

    pub(crate) fn ensure_renderable(&self) -> Result<()> {
        self.live().map(|_| ())
    }

    /// Host and node of a widget that can still be drawn
    pub fn live(&self) -> Result<(Host, NodeId)> {
        if self.removed {
            return Err(WidgetError::Removed(self.dom_id()));
        }
        match (&self.host, self.node) {
            (Some(host), Some(node)) => Ok((host.clone(), node)),
            _ => Err(WidgetError::NoHost(self.dom_id())),
        }
    }

    /// Like [`WidgetCore::live`], but a missing host is logged and reported
    /// as `None` so visual operations degrade to no-ops.
    pub(crate) fn live_or_skip(&self, operation: &str) -> Result<Option<(Host, NodeId)>> {
        match self.live() {
            Ok(live) => Ok(Some(live)),
            Err(WidgetError::NoHost(widget)) => {
                tracing::warn!(%widget, operation, "ignored without a render host");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub(crate) fn mark_built(&mut self) {
        self.built = true;
    }

    pub(crate) fn finish_render(&mut self) {
        self.render_count += 1;
    }

    pub(crate) fn set_pending_resize(&mut self, factor: f64) -> Result<()> {
        if self.removed {
            return Err(WidgetError::Removed(self.dom_id()));
        }
        self.pending_resize = Some(factor);
        Ok(())
    }

    pub(crate) fn apply_pending_resize(&mut self) {
        if let Some(factor) = self.pending_resize.take() {
            let scaled = self.attrs.scale_category(Category::Dimension, factor);
            tracing::debug!(widget = %self.dom_id(), factor, scaled, "resize applied");
        }
    }

    /// Position and size the widget node from its attributes
    pub(crate) fn apply_placement(&mut self) -> Result<()> {
        let (host, node) = self.live()?;
        let relative = self.attrs.flag("relative")?;
        let x = self.attrs.position("x")?;
        let y = self.attrs.position("y")?;
        let width = self.attrs.number("width")?;
        let height = self.attrs.number("height")?;
        let borders = self.attrs.borders("borders")?.clone();

        let mut doc = host.document_mut();
        doc.set_style(node, "position", if relative { "relative" } else { "absolute" })?;
        for (pos, near, far) in [(x, "left", "right"), (y, "top", "bottom")] {
            if relative {
                doc.remove_style(node, near)?;
                doc.remove_style(node, far)?;
            } else if pos.value < 0.0 {
                doc.remove_style(node, near)?;
                doc.set_style(node, far, pos.css())?;
            } else {
                doc.remove_style(node, far)?;
                doc.set_style(node, near, pos.css())?;
            }
        }
        doc.set_style(node, "width", format!("{width}px"))?;
        doc.set_style(node, "height", format!("{height}px"))?;
        for (side, css) in borders.iter() {
            let property = format!("border-{side}");
            match css {
                Some(css) => doc.set_style(node, property, css)?,
                None => doc.remove_style(node, &property)?,
            }
        }
        Ok(())
    }

    /// Font colour, size and weight as inline style on `node`
    pub fn apply_font(&self, node: NodeId) -> Result<()> {
        let (host, _) = self.live()?;
        let size = self.attrs.number("font_size")?;
        let mut doc = host.document_mut();
        doc.set_style(node, "color", self.attrs.text("font_color")?)?;
        doc.set_style(node, "font-size", format!("{size}px"))?;
        doc.set_style(node, "font-weight", self.attrs.text("font_weight")?)?;
        Ok(())
    }

    pub(crate) fn show(&mut self) -> Result<()> {
        let (host, node) = self.live()?;
        let mut doc = host.document_mut();
        doc.set_style(node, "visibility", "visible")?;
        doc.set_style(node, "pointer-events", "all")?;
        Ok(())
    }

    pub(crate) fn remove(&mut self) -> Result<()> {
        if self.removed {
            return Err(WidgetError::Removed(self.dom_id()));
        }
        self.removed = true;
        let (Some(host), Some(node)) = (self.host.clone(), self.node) else {
            return Ok(());
        };
        crate::describe::dismiss(&host, &self.description);
        if let Some(timer) = self.placeholder_timer.take() {
            host.clear_timeout(timer);
        }
        let overlay = host.document().find_by_dom_id(&self.placeholder_dom_id());
        if let Some(overlay) = overlay {
            host.remove(overlay)?;
        }
        if host.document().contains(node) {
            host.remove(node)?;
        }
        tracing::debug!(widget = %self.dom_id(), "removed");
        Ok(())
    }

    pub(crate) fn placeholder_dom_id(&self) -> String {
        format!("placeholder-{}", self.name)
    }
}

fn register_base_attributes(attrs: &mut AttributeRegistry, config: &ToolkitConfig) -> Result<()> {
    let dim = Some(Category::Dimension);
    let tick_format: AttrValue = AttrValue::Formatter(Rc::new(default_tick_format));

    attrs.add("x", Position::px(0.0), dim, Some(position_setter()))?;
    attrs.add("y", Position::px(0.0), dim, Some(position_setter()))?;
    attrs.add("relative", false, None, None)?;
    attrs.add("width", config.default_width, dim, None)?;
    attrs.add("height", config.default_height, dim, None)?;
    attrs.add("margins", Sides::default(), dim, None)?;
    attrs.add("borders", Borders::default(), None, None)?;
    attrs.add("font_color", "black", None, None)?;
    attrs.add("font_size", config.default_font_size, dim, None)?;
    attrs.add("font_weight", "normal", None, None)?;
    attrs.add("label", "", None, None)?;
    attrs.add("x_label", "", None, None)?;
    attrs.add("y_label", "", None, None)?;
    attrs.add("x_tick_format", tick_format.clone(), None, None)?;
    attrs.add("y_tick_format", tick_format, None, None)?;
    attrs.add("colors", Colors::default(), None, None)?;
    attrs.add("mouseover", AttrValue::None, None, None)?;
    attrs.add("mouseleave", AttrValue::None, None, None)?;
    attrs.add("click", AttrValue::None, None, None)?;
    Ok(())
}

attribute_setters! {
    /// Fluent setters for the attributes every widget declares
    pub trait BaseAttributes {
        /// Horizontal offset; negative values are measured from the right
        x(value: f64, unit: Unit) => "x", AttrValue::Position(Position { value, unit });
        /// Vertical offset; negative values are measured from the bottom
        y(value: f64, unit: Unit) => "y", AttrValue::Position(Position { value, unit });
        /// Flow inside the parent instead of absolute offsets
        relative(value: bool) => "relative", AttrValue::Bool(value);
        width(value: f64) => "width", AttrValue::Number(value);
        height(value: f64) => "height", AttrValue::Number(value);
        margins(value: Sides) => "margins", AttrValue::Sides(value);
        borders(value: Borders) => "borders", AttrValue::Borders(value);
        font_color(value: &str) => "font_color", AttrValue::Text(value.to_string());
        font_size(value: f64) => "font_size", AttrValue::Number(value);
        font_weight(value: &str) => "font_weight", AttrValue::Text(value.to_string());
        label(value: &str) => "label", AttrValue::Text(value.to_string());
        x_label(value: &str) => "x_label", AttrValue::Text(value.to_string());
        y_label(value: &str) => "y_label", AttrValue::Text(value.to_string());
        x_tick_format(f: impl Fn(f64) -> String + 'static) => "x_tick_format", AttrValue::Formatter(Rc::new(f));
        y_tick_format(f: impl Fn(f64) -> String + 'static) => "y_tick_format", AttrValue::Formatter(Rc::new(f));
        colors(value: Colors) => "colors", AttrValue::Colors(value);
        mouseover(f: impl Fn(&Host, &Interaction) + 'static) => "mouseover", AttrValue::Callback(Rc::new(f));
        mouseleave(f: impl Fn(&Host, &Interaction) + 'static) => "mouseleave", AttrValue::Callback(Rc::new(f));
        click(f: impl Fn(&Host, &Interaction) + 'static) => "click", AttrValue::Callback(Rc::new(f));
    }
}

/// The plain base widget: a positioned, styled `div` with no content of its
/// own.
pub struct Widget {
    core: WidgetCore,
}

impl Widget {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_parent(name, None)
    }

    pub fn with_parent(name: impl Into<String>, parent: Option<NodeId>) -> Result<Self> {
        Ok(Self {
            core: WidgetCore::new(name, "widget", ElementKind::Div, parent)?,
        })
    }
}

impl Lifecycle for Widget {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn update(&mut self, _duration_ms: u64) -> Result<()> {
        Ok(())
    }

    fn style(&mut self, _duration_ms: u64) -> Result<()> {
        let (_, node) = self.core.live()?;
        self.core.apply_font(node)
    }
}
