//! Text label widget

use adt_core::{ElementKind, NodeId};

use crate::attribute::AttrValue;
use crate::attribute_setters;
use crate::error::Result;
use crate::lifecycle::Lifecycle;
use crate::widget::WidgetCore;

/// A single line of text. Labels have no subtree, so they keep the default
/// (empty) build phase.
pub struct Label {
    core: WidgetCore,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_parent(name, None)
    }

    pub fn with_parent(name: impl Into<String>, parent: Option<NodeId>) -> Result<Self> {
        let mut core = WidgetCore::new(name, "label", ElementKind::Div, parent)?;
        let attrs = core.attrs_mut();
        attrs.add("align", "left", None, None)?;
        attrs.redeclare("height", 20.0)?;
        Ok(Self { core })
    }
}

attribute_setters! {
    impl Label {
        /// `left`, `center` or `right`
        align(value: &str) => "align", AttrValue::Text(value.to_string());
    }
}

impl Lifecycle for Label {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn update(&mut self, _duration_ms: u64) -> Result<()> {
        let (host, node) = self.core.live()?;
        let text = self.core.attrs().text("label")?;
        host.document_mut().set_text(node, text)?;
        Ok(())
    }

    fn style(&mut self, _duration_ms: u64) -> Result<()> {
        let (host, node) = self.core.live()?;
        self.core.apply_font(node)?;
        let attrs = self.core.attrs();
        let height = attrs.number("height")?;
        let mut doc = host.document_mut();
        doc.set_style(node, "text-align", attrs.text("align")?)?;
        doc.set_style(node, "line-height", format!("{height}px"))?;
        doc.set_style(node, "white-space", "nowrap")?;
        Ok(())
    }
}
