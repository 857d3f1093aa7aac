use std::cell::Cell;
use std::rc::Rc;

use adt_charts::{highlight_selection, DataPoint};
use adt_core::{event_types, Event, Host, NodeId, Selector};
use adt_widgets::prelude::*;
use adt_widgets::{AttrValue, Phase, WidgetCore, WidgetError};

fn installed_host() -> Host {
    let host = Host::new();
    host.install();
    host
}

fn style(host: &Host, node: NodeId, property: &str) -> Option<String> {
    host.document()
        .node(node)
        .and_then(|n| n.style(property).map(str::to_string))
}

fn opacity(host: &Host, node: NodeId) -> f32 {
    host.document().node(node).map(|n| n.opacity()).unwrap_or(-1.0)
}

fn count(host: &Host, selector: &str) -> usize {
    let doc = host.document();
    doc.select_all(doc.body(), &Selector::parse(selector).unwrap())
        .unwrap()
        .len()
}

/// Counts how often each phase runs
struct Counting {
    core: WidgetCore,
    builds: Rc<Cell<u32>>,
    updates: Rc<Cell<u32>>,
}

impl Counting {
    fn new(name: &str) -> Self {
        Self {
            core: WidgetCore::new(name, "counting", adt_core::ElementKind::Div, None).unwrap(),
            builds: Rc::new(Cell::new(0)),
            updates: Rc::new(Cell::new(0)),
        }
    }
}

impl Lifecycle for Counting {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn build(&mut self, _duration_ms: u64) -> adt_widgets::Result<()> {
        self.builds.set(self.builds.get() + 1);
        Ok(())
    }

    fn update(&mut self, _duration_ms: u64) -> adt_widgets::Result<()> {
        self.updates.set(self.updates.get() + 1);
        Ok(())
    }

    fn style(&mut self, _duration_ms: u64) -> adt_widgets::Result<()> {
        Ok(())
    }
}

/// Supplies no phases at all
struct Bare {
    core: WidgetCore,
}

impl Lifecycle for Bare {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }
}

#[test]
fn setters_return_the_same_widget() {
    let _host = installed_host();
    let mut widget = Widget::new("chain").unwrap();
    let expected: *const Widget = &widget;
    let returned: *const Widget = widget.width(50.0).height(20.0).font_size(12.0);
    assert!(std::ptr::eq(expected, returned));
    assert_eq!(widget.core().attrs().number("width").unwrap(), 50.0);
}

#[test]
fn construction_inserts_hidden_node() {
    let host = installed_host();
    let widget = Widget::new("box").unwrap();
    let node = widget.core().node().unwrap();
    assert_eq!(host.document().find_by_dom_id("widget-box"), Some(node));
    assert_eq!(style(&host, node, "visibility").as_deref(), Some("hidden"));
    assert_eq!(style(&host, node, "pointer-events").as_deref(), Some("none"));
    assert_eq!(style(&host, node, "position").as_deref(), Some("absolute"));
}

#[test]
fn render_places_and_shows_widget() {
    let host = installed_host();
    let mut widget = Widget::new("placed").unwrap();
    widget
        .x(-15.0, Unit::Px)
        .y(25.0, Unit::Percent)
        .borders(Borders::all("1px solid red"))
        .render(0)
        .unwrap();
    let node = widget.core().node().unwrap();

    assert_eq!(style(&host, node, "visibility").as_deref(), Some("visible"));
    assert_eq!(style(&host, node, "pointer-events").as_deref(), Some("all"));
    assert_eq!(style(&host, node, "right").as_deref(), Some("15px"));
    assert_eq!(style(&host, node, "left"), None);
    assert_eq!(style(&host, node, "top").as_deref(), Some("25%"));
    assert_eq!(style(&host, node, "width").as_deref(), Some("200px"));
    assert_eq!(style(&host, node, "height").as_deref(), Some("150px"));
    assert_eq!(
        style(&host, node, "border-left").as_deref(),
        Some("1px solid red")
    );
    assert_eq!(widget.core().render_count(), 1);

    widget.relative(true).render(0).unwrap();
    assert_eq!(style(&host, node, "position").as_deref(), Some("relative"));
    assert_eq!(style(&host, node, "right"), None);
    assert_eq!(style(&host, node, "top"), None);
}

#[test]
fn resize_is_applied_once() {
    let host = installed_host();
    let mut widget = Widget::new("grow").unwrap();
    widget.x(10.0, Unit::Px).y(50.0, Unit::Percent);
    widget.resize(2.0).unwrap().render(0).unwrap();

    let attrs = widget.core().attrs();
    assert_eq!(attrs.number("width").unwrap(), 400.0);
    assert_eq!(attrs.number("height").unwrap(), 300.0);
    assert_eq!(attrs.number("font_size").unwrap(), 20.0);
    assert_eq!(attrs.position("x").unwrap().value, 20.0);
    assert_eq!(attrs.position("y").unwrap().value, 50.0);
    assert_eq!(widget.core().pending_resize(), None);

    widget.render(0).unwrap();
    assert_eq!(widget.core().attrs().number("width").unwrap(), 400.0);
    let node = widget.core().node().unwrap();
    assert_eq!(style(&host, node, "width").as_deref(), Some("400px"));
}

#[test]
fn build_runs_once_and_update_every_render() {
    let _host = installed_host();
    let mut widget = Counting::new("counter");
    for _ in 0..3 {
        widget.render(0).unwrap();
    }
    assert_eq!(widget.builds.get(), 1);
    assert_eq!(widget.updates.get(), 3);
    assert!(widget.core().is_built());
    assert_eq!(widget.core().render_count(), 3);
}

#[test]
fn missing_phase_fails_first_render() {
    let _host = installed_host();
    let mut widget = Bare {
        core: WidgetCore::new("bare", "bare", adt_core::ElementKind::Div, None).unwrap(),
    };
    let err = widget.render(0).err().unwrap();
    assert!(matches!(
        err,
        WidgetError::PhaseNotImplemented { phase: Phase::Update, ref widget } if widget == "bare-bare"
    ));
    assert_eq!(widget.core().render_count(), 0);
}

#[test]
fn widget_without_host_is_disabled() {
    Host::uninstall();
    let mut widget = Widget::new("orphan").unwrap();
    assert!(widget.core().node().is_none());
    assert!(matches!(
        widget.render(0).err().unwrap(),
        WidgetError::NoHost(_)
    ));
    widget.describe("nothing").unwrap();
    widget.placeholder(Some("nothing")).unwrap();
    widget.remove().unwrap();
}

#[test]
fn duplicate_attribute_is_rejected() {
    let _host = installed_host();
    let mut widget = Widget::new("dup").unwrap();
    let err = widget
        .core_mut()
        .attrs_mut()
        .add("width", 1.0, None, None)
        .unwrap_err();
    assert!(matches!(err, WidgetError::DuplicateAttribute(name) if name == "width"));
}

#[test]
fn placeholder_swaps_widget_for_overlay() {
    let host = installed_host();
    let mut widget = Widget::new("chart").unwrap();
    widget.render(0).unwrap();
    let node = widget.core().node().unwrap();

    widget.placeholder(Some("Loading")).unwrap();
    host.advance(500);
    assert_eq!(opacity(&host, node), 0.0);
    let overlay = host.document().find_by_dom_id("placeholder-chart").unwrap();
    assert_eq!(opacity(&host, overlay), 1.0);
    assert_eq!(
        host.document().node(overlay).unwrap().html(),
        Some("Loading")
    );
    assert_eq!(style(&host, overlay, "width").as_deref(), Some("200px"));

    widget.placeholder(Some("Still loading")).unwrap();
    assert_eq!(count(&host, ".adt-placeholder"), 1);
    assert_eq!(widget.core().placeholder_node(), Some(overlay));
    assert_eq!(
        host.document().node(overlay).unwrap().html(),
        Some("Still loading")
    );

    widget.placeholder(None).unwrap();
    host.advance(500);
    assert_eq!(opacity(&host, node), 1.0);
    assert!(!host.document().contains(overlay));
    assert_eq!(widget.core().placeholder_node(), None);
}

#[test]
fn repeated_placeholder_clears_keep_a_later_overlay() {
    let host = installed_host();
    let mut widget = Widget::new("flicker").unwrap();
    widget.render(0).unwrap();

    widget.placeholder(Some("Loading")).unwrap();
    host.advance(500);
    widget.placeholder(None).unwrap();
    widget.placeholder(None).unwrap();
    widget.placeholder(Some("Again")).unwrap();
    host.advance(500);

    let overlay = widget.core().placeholder_node().unwrap();
    assert_eq!(host.document().node(overlay).unwrap().html(), Some("Again"));
    assert_eq!(opacity(&host, overlay), 1.0);
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn describe_opens_one_popup_until_timeout_or_leave() {
    let host = installed_host();
    let mut widget = Widget::new("info").unwrap();
    widget.render(0).unwrap().describe("<b>Revenue</b>").unwrap();
    let node = widget.core().node().unwrap();

    let event = host.dispatch(Event::pointer(event_types::CONTEXT_MENU, node, 30.0, 40.0));
    assert!(event.default_prevented);
    let popup = widget.core().description_node().unwrap();
    assert_eq!(
        host.document().node(popup).unwrap().html(),
        Some("<b>Revenue</b>")
    );
    assert_eq!(style(&host, popup, "left").as_deref(), Some("30px"));
    assert!(host.document().rule("adt-description").is_some());

    host.dispatch(Event::pointer(event_types::CONTEXT_MENU, node, 1.0, 1.0));
    assert_eq!(count(&host, ".adt-description"), 1);

    host.advance(14_999);
    assert!(host.document().contains(popup));
    host.advance(1);
    assert!(!host.document().contains(popup));
    assert_eq!(widget.core().description_node(), None);

    host.dispatch(Event::pointer(event_types::CONTEXT_MENU, node, 0.0, 0.0));
    assert_eq!(count(&host, ".adt-description"), 1);
    host.dispatch(Event::pointer(event_types::POINTER_LEAVE, node, 0.0, 0.0));
    assert_eq!(count(&host, ".adt-description"), 0);
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn removed_widget_rejects_further_calls() {
    let host = installed_host();
    let mut widget = Widget::new("gone").unwrap();
    widget.render(0).unwrap();
    let node = widget.core().node().unwrap();

    widget.remove().unwrap();
    assert!(!host.document().contains(node));
    assert!(matches!(
        widget.render(0).err().unwrap(),
        WidgetError::Removed(_)
    ));
    assert!(matches!(
        widget.describe("x").err().unwrap(),
        WidgetError::Removed(_)
    ));
    assert!(matches!(
        widget.resize(2.0).err().unwrap(),
        WidgetError::Removed(_)
    ));
    assert!(matches!(
        widget.placeholder(None).err().unwrap(),
        WidgetError::Removed(_)
    ));
    assert!(matches!(widget.remove().unwrap_err(), WidgetError::Removed(_)));
}

#[test]
fn setters_on_removed_widget_leave_attributes_alone() {
    let _host = installed_host();
    let mut widget = Widget::new("gone-too").unwrap();
    widget.remove().unwrap();

    widget.width(10.0).font_color("red");
    assert_eq!(widget.core().attrs().number("width").unwrap(), 200.0);
    assert!(matches!(
        widget
            .core_mut()
            .set_attr("width", AttrValue::Number(10.0), &[])
            .unwrap_err(),
        WidgetError::Removed(_)
    ));
    assert_eq!(widget.core().pending_resize(), None);
}

#[test]
fn label_writes_text_and_alignment() {
    let host = installed_host();
    let mut label = Label::new("title").unwrap();
    label
        .label("Quarterly sales")
        .align("center")
        .font_weight("bold")
        .render(0)
        .unwrap();
    let node = label.core().node().unwrap();
    assert_eq!(
        host.document().node(node).unwrap().text(),
        Some("Quarterly sales")
    );
    assert_eq!(style(&host, node, "text-align").as_deref(), Some("center"));
    assert_eq!(style(&host, node, "font-weight").as_deref(), Some("bold"));
    assert_eq!(style(&host, node, "font-size").as_deref(), Some("10px"));
}

fn sales() -> Vec<DataPoint> {
    vec![
        DataPoint::series("q1", [("new york", 4.0), ("boston", 2.0)]),
        DataPoint::series("q2", [("new york", 6.0), ("boston", 3.0)]),
        DataPoint::series("q3", [("new york", 5.0), ("boston", 8.0)]),
    ]
}

#[test]
fn bar_chart_draws_one_rect_per_series_value() {
    let host = installed_host();
    let mut chart = BarChart::new("sales").unwrap();
    chart
        .set_data(sales())
        .y_tick_format(|v| format!("{v:.0} units"))
        .render(0)
        .unwrap();

    assert_eq!(chart.bars().len(), 6);
    assert_eq!(count(&host, ".bar"), 6);
    assert_eq!(count(&host, ".new__york"), 3);
    assert_eq!(count(&host, ".x-axis"), 1);

    let doc = host.document();
    let tallest = chart.bars().iter().find(|b| b.value == 8.0).unwrap();
    let rect = doc.node(tallest.node).unwrap();
    // margins 10/30 on a 150px chart leave 110px of plot height
    assert_eq!(rect.attr("y"), Some("0"));
    assert_eq!(rect.attr("height"), Some("110"));
    assert!(rect.attr("fill").is_some());

    let y_axis = doc.select_all(doc.body(), &Selector::parse(".y-axis").unwrap()).unwrap()[0];
    let labels: Vec<&str> = doc
        .node(y_axis)
        .unwrap()
        .children()
        .iter()
        .filter_map(|c| doc.node(*c).and_then(|n| n.text()))
        .collect();
    assert_eq!(labels.first(), Some(&"0 units"));
    assert_eq!(labels.last(), Some(&"8 units"));
}

#[test]
fn bar_chart_build_happens_once() {
    let host = installed_host();
    let mut chart = BarChart::new("twice").unwrap();
    chart.set_data(sales()).render(0).unwrap();
    let plot = chart.plot_node().unwrap();
    chart.set_data(sales()[..1].to_vec()).render(0).unwrap();
    assert_eq!(chart.plot_node(), Some(plot));
    assert_eq!(count(&host, "svg"), 1);
    assert_eq!(count(&host, ".bar"), 2);
}

#[test]
fn leaving_a_bar_keeps_the_description_open() {
    let host = installed_host();
    let mut chart = BarChart::new("described").unwrap();
    chart
        .set_data(sales())
        .render(0)
        .unwrap()
        .describe("Sales by city")
        .unwrap();
    let bar = chart.bars()[0].node;

    host.dispatch(Event::pointer(event_types::CONTEXT_MENU, bar, 5.0, 5.0));
    assert!(chart.core().description_node().is_some());
    host.dispatch(Event::pointer(event_types::POINTER_LEAVE, bar, 5.0, 5.0));
    assert!(chart.core().description_node().is_some());

    let node = chart.core().node().unwrap();
    host.dispatch(Event::pointer(event_types::POINTER_LEAVE, node, 5.0, 5.0));
    assert!(chart.core().description_node().is_none());
}

#[test]
fn bar_mouseover_highlights_series() {
    let host = installed_host();
    let hovered = Rc::new(Cell::new(0));
    let seen = hovered.clone();

    let mut chart = BarChart::new("cities").unwrap();
    chart
        .set_data(sales())
        .mouseover(move |host, hit| {
            seen.set(seen.get() + 1);
            let root = host.document().find_by_dom_id("bar_chart-cities").unwrap();
            highlight_selection(host, root, ".bar", hit.series.as_deref(), 0).unwrap();
        })
        .render(0)
        .unwrap();

    let boston = chart
        .bars()
        .iter()
        .find(|b| b.series == "boston")
        .unwrap()
        .node;
    host.dispatch(Event::pointer(event_types::POINTER_OVER, boston, 0.0, 0.0));
    assert_eq!(hovered.get(), 1);
    for bar in chart.bars() {
        let expected = if bar.series == "boston" { 1.0 } else { 0.1 };
        assert!((opacity(&host, bar.node) - expected).abs() < 1e-6);
    }
}
