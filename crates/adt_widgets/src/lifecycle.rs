//! Render lifecycle
//!
//! Concrete widgets implement [`Lifecycle`]; [`WidgetExt::render`] drives the
//! phases in a fixed order:
//!
//! 1. apply a pending resize factor
//! 2. `build` (first render only)
//! 3. `update`
//! 4. position and size
//! 5. `style`
//! 6. show the widget

use adt_core::ToolkitConfig;

use crate::error::{Phase, Result};
use crate::widget::WidgetCore;

pub trait Lifecycle {
    fn core(&self) -> &WidgetCore;

    fn core_mut(&mut self) -> &mut WidgetCore;

    /// One-time construction of the widget's subtree. Widgets without
    /// subtree (plain labels) keep the default.
    fn build(&mut self, _duration_ms: u64) -> Result<()> {
        Ok(())
    }

    /// Rebind current data to the built subtree
    fn update(&mut self, _duration_ms: u64) -> Result<()> {
        Err(self.core().phase_not_implemented(Phase::Update))
    }

    /// Apply attribute-driven styling
    fn style(&mut self, _duration_ms: u64) -> Result<()> {
        Err(self.core().phase_not_implemented(Phase::Style))
    }
}

/// Operations shared by every widget
pub trait WidgetExt: Lifecycle + Sized {
    /// Run the render phases. Fails fast on the first phase error.
    fn render(&mut self, duration_ms: u64) -> Result<&mut Self> {
        self.core().ensure_renderable()?;
        self.core_mut().apply_pending_resize();

        if !self.core().is_built() {
            tracing::debug!(widget = %self.core().dom_id(), "build");
            self.build(duration_ms)?;
            self.core_mut().mark_built();
        }
        self.update(duration_ms)?;
        self.core_mut().apply_placement()?;
        self.style(duration_ms)?;
        self.core_mut().show()?;
        self.core_mut().finish_render();
        Ok(self)
    }

    /// Render with the configured default duration
    fn render_default(&mut self) -> Result<&mut Self> {
        self.render(ToolkitConfig::current().render_duration_ms)
    }

    /// Schedule a multiplicative resize, applied on the next render
    fn resize(&mut self, factor: f64) -> Result<&mut Self> {
        self.core_mut().set_pending_resize(factor)?;
        Ok(self)
    }

    /// Show `html` in a popup when the widget is right-clicked
    fn describe(&mut self, html: impl Into<String>) -> Result<&mut Self> {
        self.core_mut().describe(html.into())?;
        Ok(self)
    }

    /// Swap the widget for a centred text overlay, or back with `None`
    fn placeholder(&mut self, html: Option<&str>) -> Result<&mut Self> {
        self.core_mut().placeholder(html)?;
        Ok(self)
    }

    /// Detach the widget. Every later operation fails with `Removed`.
    fn remove(&mut self) -> Result<()> {
        self.core_mut().remove()
    }
}

impl<T: Lifecycle + Sized> WidgetExt for T {}
