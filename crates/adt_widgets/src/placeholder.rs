//! Placeholder overlays
//!
//! While a placeholder is shown the widget fades out and a text overlay with
//! the same position and size fades in next to it. Clearing the placeholder
//! reverses both fades and drops the overlay once it is invisible.

use adt_core::{ElementKind, Host, NodeId, ToolkitConfig};

use crate::error::Result;
use crate::widget::WidgetCore;

/// Style properties copied from the widget onto its overlay
const MIRRORED: [&str; 7] = ["position", "left", "top", "right", "bottom", "width", "height"];

impl WidgetCore {
    pub(crate) fn placeholder(&mut self, html: Option<&str>) -> Result<()> {
        let Some((host, node)) = self.live_or_skip("placeholder")? else {
            return Ok(());
        };
        let fade_ms = ToolkitConfig::current().placeholder_fade_ms;
        let overlay_id = self.placeholder_dom_id();
        let existing = host.document().find_by_dom_id(&overlay_id);
        // At most one overlay removal may be pending.
        if let Some(timer) = self.placeholder_timer.take() {
            host.clear_timeout(timer);
        }

        match html {
            Some(html) => {
                host.transition_opacity(node, 0.0, fade_ms)?;
                let overlay = match existing {
                    Some(overlay) => overlay,
                    None => create_overlay(&host, node, &overlay_id)?,
                };
                host.document_mut().set_html(overlay, html)?;
                host.transition_opacity(overlay, 1.0, fade_ms)?;
                tracing::debug!(widget = %self.dom_id(), "placeholder shown");
            }
            None => {
                host.transition_opacity(node, 1.0, fade_ms)?;
                if let Some(overlay) = existing {
                    host.transition_opacity(overlay, 0.0, fade_ms)?;
                    let timer = host.set_timeout(fade_ms, move |host| {
                        if host.document().contains(overlay) {
                            if let Err(err) = host.remove(overlay) {
                                tracing::warn!(%err, "placeholder overlay not removed");
                            }
                        }
                    });
                    self.placeholder_timer = Some(timer);
                }
            }
        }
        Ok(())
    }

    /// Overlay node while a placeholder is on screen
    pub fn placeholder_node(&self) -> Option<NodeId> {
        let host = self.host()?;
        let doc = host.document();
        doc.find_by_dom_id(&self.placeholder_dom_id())
    }
}

fn create_overlay(host: &Host, node: NodeId, overlay_id: &str) -> adt_core::Result<NodeId> {
    let (parent, mirrored, height) = {
        let doc = host.document();
        let widget = doc.node(node).ok_or(adt_core::CoreError::UnknownNode(node))?;
        let mirrored: Vec<(&str, String)> = MIRRORED
            .iter()
            .filter_map(|p| widget.style(p).map(|v| (*p, v.to_string())))
            .collect();
        let height = widget.style("height").map(str::to_string);
        (widget.parent().unwrap_or_else(|| doc.body()), mirrored, height)
    };

    let overlay = host.create(ElementKind::Div, parent)?;
    let mut doc = host.document_mut();
    doc.set_dom_id(overlay, overlay_id)?;
    doc.add_class(overlay, "adt-placeholder")?;
    for (property, value) in mirrored {
        doc.set_style(overlay, property, value)?;
    }
    doc.set_style(overlay, "text-align", "center")?;
    if let Some(height) = height {
        doc.set_style(overlay, "line-height", height)?;
    }
    doc.set_opacity(overlay, 0.0)?;
    Ok(overlay)
}
