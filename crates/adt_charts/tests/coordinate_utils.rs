use adt_charts::{
    boundary, decode, encode, highlight_selection, scale, AxisKind, AxisSpec, DataPoint,
    ScaleSpec, XValue, YValue,
};
use adt_core::{ElementKind, Host, NodeId};

#[test]
fn empty_boundary_is_exact_placeholder() {
    let b = boundary(&[], None).unwrap();
    assert_eq!(b.x.min, XValue::Number(0.0));
    assert_eq!(b.x.max, XValue::Number(1.0));
    assert_eq!(b.x.domain, vec![XValue::Number(0.5)]);
    assert_eq!(b.y.min, 0.0);
    assert_eq!(b.y.max, 1.0);
    assert!(b.y.domain.is_empty());
}

#[test]
fn series_boundary_keeps_first_occurrence_domain() {
    let data = vec![
        DataPoint::series(1.0, [("a", 2.0)]),
        DataPoint::series(3.0, [("a", 5.0)]),
        DataPoint::series(2.0, [("a", 1.0)]),
    ];
    let b = boundary(&data, None).unwrap();
    assert_eq!(b.x.min, XValue::Number(1.0));
    assert_eq!(b.x.max, XValue::Number(3.0));
    assert_eq!(
        b.x.domain,
        vec![XValue::Number(1.0), XValue::Number(3.0), XValue::Number(2.0)]
    );
    assert_eq!(b.y.min, 1.0);
    assert_eq!(b.y.max, 5.0);
}

#[test]
fn records_deserialize_from_json() {
    let data: Vec<DataPoint> = serde_json::from_str(
        r#"[
            {"x": "2024-01-01T00:00:00Z", "y": 3},
            {"x": "2024-01-02T00:00:00Z", "y": 4}
        ]"#,
    )
    .unwrap();
    assert!(matches!(data[0].x, XValue::Time(_)));
    assert_eq!(data[1].y, YValue::Scalar(4.0));

    let b = boundary(&data, None).unwrap();
    let spec = ScaleSpec {
        x: AxisSpec::new(AxisKind::Time),
        y: AxisSpec::default(),
    };
    let s = scale(&b, 100.0, 50.0, spec).unwrap();
    assert_eq!(s.x.map(&data[0].x), Some(0.0));
    assert_eq!(s.x.map(&data[1].x), Some(100.0));
}

#[test]
fn band_axis_spreads_categories() {
    let data = vec![
        DataPoint::scalar("north", 1.0),
        DataPoint::scalar("south", 2.0),
        DataPoint::scalar("east", 3.0),
        DataPoint::scalar("west", 4.0),
    ];
    let b = boundary(&data, None).unwrap();
    let spec = ScaleSpec {
        x: AxisSpec::new(AxisKind::Band),
        y: AxisSpec::default().reversed(),
    };
    let s = scale(&b, 400.0, 100.0, spec).unwrap();
    let starts: Vec<f64> = data.iter().filter_map(|d| s.x.map(&d.x)).collect();
    assert_eq!(starts.len(), 4);
    assert!(starts.windows(2).all(|w| w[0] < w[1]));
    assert!(s.x.band_width() > 0.0);
    assert_eq!(s.x.map(&XValue::from("nowhere")), None);
}

#[test]
fn encode_round_trips_without_double_underscores() {
    assert_eq!(encode("foo bar"), "foo__bar");
    assert_eq!(encode(""), "");
    for key in ["north east", "a b c d", "x"] {
        assert_eq!(decode(&encode(key)), key);
    }
}

fn bars(host: &Host, keys: &[&str]) -> (NodeId, Vec<NodeId>) {
    let body = host.document().body();
    let root = host.create(ElementKind::Svg, body).unwrap();
    let ids = keys
        .iter()
        .map(|k| {
            let id = host.create(ElementKind::Rect, root).unwrap();
            let mut doc = host.document_mut();
            doc.add_class(id, "bar").unwrap();
            doc.add_class(id, encode(k)).unwrap();
            id
        })
        .collect();
    (root, ids)
}

fn opacity(host: &Host, id: NodeId) -> f32 {
    host.document().node(id).unwrap().opacity()
}

#[test]
fn highlight_dims_non_matching_and_clears() {
    let host = Host::new();
    let (root, ids) = bars(&host, &["new york", "boston", "new york"]);

    let matched = highlight_selection(&host, root, ".bar", Some("new york"), 0).unwrap();
    assert_eq!(matched, 3);
    assert_eq!(opacity(&host, ids[0]), 1.0);
    assert!((opacity(&host, ids[1]) - 0.1).abs() < 1e-6);
    assert_eq!(opacity(&host, ids[2]), 1.0);

    highlight_selection(&host, root, ".bar", None, 250).unwrap();
    host.advance(250);
    assert!(ids.iter().all(|id| opacity(&host, *id) == 1.0));
}

#[test]
fn highlight_rejects_unsupported_selector() {
    let host = Host::new();
    let (root, _) = bars(&host, &["a"]);
    assert!(highlight_selection(&host, root, "svg rect", None, 0).is_err());
}
