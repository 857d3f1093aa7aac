//! Right-click description popups

use std::cell::RefCell;
use std::rc::Rc;

use adt_core::{event_types, ElementKind, Host, NodeId, TimerId, ToolkitConfig};

use crate::error::Result;
use crate::widget::WidgetCore;

const NAMESPACE: &str = "describe";
const RULE_KEY: &str = "adt-description";
const RULE_CSS: &str = ".adt-description { position: absolute; padding: 6px 8px; \
background: #fff; border: 1px solid #999; border-radius: 3px; \
box-shadow: 0 2px 6px rgba(0, 0, 0, 0.2); z-index: 1000; }";

/// Popup currently on screen and the timer that will dismiss it
pub(crate) struct OpenDescription {
    node: NodeId,
    timer: TimerId,
}

pub(crate) type DescriptionSlot = Rc<RefCell<Option<OpenDescription>>>;

impl WidgetCore {
    /// Bind the popup handlers to the widget node. Calling again replaces
    /// the html of future popups.
    pub(crate) fn describe(&mut self, html: String) -> Result<()> {
        let Some((host, node)) = self.live_or_skip("describe")? else {
            return Ok(());
        };
        host.document_mut().ensure_rule(RULE_KEY, RULE_CSS);
        let timeout_ms = ToolkitConfig::current().describe_timeout_ms;

        let slot = self.description.clone();
        host.on_ns(node, event_types::CONTEXT_MENU, NAMESPACE, move |host, event| {
            event.prevent_default();
            if slot.borrow().is_some() {
                return;
            }
            let (x, y) = event.position().unwrap_or_default();
            let popup = match open_popup(host, &html, x, y) {
                Ok(popup) => popup,
                Err(err) => {
                    tracing::warn!(%err, "description popup not shown");
                    return;
                }
            };
            let timer_slot = slot.clone();
            let timer = host.set_timeout(timeout_ms, move |host| dismiss(host, &timer_slot));
            *slot.borrow_mut() = Some(OpenDescription { node: popup, timer });
        });

        let slot = self.description.clone();
        host.on_ns(node, event_types::POINTER_LEAVE, NAMESPACE, move |host, _| {
            dismiss(host, &slot)
        });
        Ok(())
    }

    /// Node of the popup on screen, if any
    pub fn description_node(&self) -> Option<NodeId> {
        self.description.borrow().as_ref().map(|open| open.node)
    }
}

fn open_popup(host: &Host, html: &str, x: f32, y: f32) -> adt_core::Result<NodeId> {
    let body = host.document().body();
    let popup = host.create(ElementKind::Div, body)?;
    let mut doc = host.document_mut();
    doc.add_class(popup, "adt-description")?;
    doc.set_html(popup, html)?;
    doc.set_style(popup, "left", format!("{x}px"))?;
    doc.set_style(popup, "top", format!("{y}px"))?;
    Ok(popup)
}

/// Close the open popup, if any
pub(crate) fn dismiss(host: &Host, slot: &DescriptionSlot) {
    let open = slot.borrow_mut().take();
    if let Some(open) = open {
        host.clear_timeout(open.timer);
        if let Err(err) = host.remove(open.node) {
            tracing::trace!(%err, "description popup already gone");
        }
    }
}
