//! Data boundaries
//!
//! A boundary is the extent of a data set along each axis: min/max plus the
//! distinct values in first-occurrence order (the domain of a categorical
//! axis).

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Value on the X axis of a record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Time(DateTime<Utc>),
    Category(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XKind {
    Number,
    Time,
    Category,
}

impl XValue {
    pub fn kind(&self) -> XKind {
        match self {
            XValue::Number(_) => XKind::Number,
            XValue::Time(_) => XKind::Time,
            XValue::Category(_) => XKind::Category,
        }
    }

    /// Numeric position on a continuous axis (timestamps as epoch millis)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            XValue::Number(v) => Some(*v),
            XValue::Time(t) => Some(t.timestamp_millis() as f64),
            XValue::Category(_) => None,
        }
    }

    fn compare(&self, other: &XValue) -> Ordering {
        match (self, other) {
            (XValue::Number(a), XValue::Number(b)) => a.total_cmp(b),
            (XValue::Time(a), XValue::Time(b)) => a.cmp(b),
            (XValue::Category(a), XValue::Category(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    fn dedup_key(&self) -> DomainKey {
        match self {
            // Normalizes -0.0 to 0.0
            XValue::Number(v) => DomainKey::Number((v + 0.0).to_bits()),
            XValue::Time(t) => DomainKey::Time(t.timestamp_nanos_opt().unwrap_or(t.timestamp())),
            XValue::Category(c) => DomainKey::Category(c.clone()),
        }
    }
}

impl std::fmt::Display for XValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XValue::Number(v) => write!(f, "{v}"),
            XValue::Time(t) => write!(f, "{}", t.to_rfc3339()),
            XValue::Category(c) => f.write_str(c),
        }
    }
}

impl From<f64> for XValue {
    fn from(v: f64) -> Self {
        XValue::Number(v)
    }
}

impl From<&str> for XValue {
    fn from(v: &str) -> Self {
        XValue::Category(v.to_string())
    }
}

impl From<DateTime<Utc>> for XValue {
    fn from(v: DateTime<Utc>) -> Self {
        XValue::Time(v)
    }
}

#[derive(Hash, PartialEq, Eq)]
enum DomainKey {
    Number(u64),
    Time(i64),
    Category(String),
}

/// Value on the Y axis of a record: one number, or one number per series
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YValue {
    Scalar(f64),
    Series(IndexMap<String, f64>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: XValue,
    pub y: YValue,
}

impl DataPoint {
    pub fn scalar(x: impl Into<XValue>, y: f64) -> Self {
        Self {
            x: x.into(),
            y: YValue::Scalar(y),
        }
    }

    pub fn series<K, I>(x: impl Into<XValue>, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self {
            x: x.into(),
            y: YValue::Series(values.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisBoundary<T> {
    pub min: T,
    pub max: T,
    pub domain: Vec<T>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boundary {
    pub x: AxisBoundary<XValue>,
    pub y: AxisBoundary<f64>,
}

impl Boundary {
    /// Placeholder extent used before any data arrives
    pub fn empty() -> Self {
        Self {
            x: AxisBoundary {
                min: XValue::Number(0.0),
                max: XValue::Number(1.0),
                domain: vec![XValue::Number(0.5)],
            },
            y: AxisBoundary {
                min: 0.0,
                max: 1.0,
                domain: Vec::new(),
            },
        }
    }
}

/// Per-endpoint overrides; `None` keeps the computed value
#[derive(Clone, Debug, PartialEq)]
pub struct AxisConstraint<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for AxisConstraint<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundaryConstraints {
    pub x: AxisConstraint<XValue>,
    pub y: AxisConstraint<f64>,
}

impl BoundaryConstraints {
    /// Force the Y axis to start at `min`
    pub fn y_min(min: f64) -> Self {
        Self {
            y: AxisConstraint {
                min: Some(min),
                max: None,
            },
            ..Default::default()
        }
    }
}

/// Compute the boundary of `data`.
///
/// Records must agree on the kind of their `x` values and on the shape of
/// `y`: either all scalars or all series mappings with the same keys.
pub fn boundary(data: &[DataPoint], constraints: Option<&BoundaryConstraints>) -> Result<Boundary> {
    let mut out = if data.is_empty() {
        Boundary::empty()
    } else {
        Boundary {
            x: x_boundary(data)?,
            y: y_boundary(data)?,
        }
    };

    if let Some(c) = constraints {
        if let Some(min) = &c.x.min {
            out.x.min = min.clone();
        }
        if let Some(max) = &c.x.max {
            out.x.max = max.clone();
        }
        if let Some(min) = c.y.min {
            out.y.min = min;
        }
        if let Some(max) = c.y.max {
            out.y.max = max;
        }
    }
    Ok(out)
}

fn x_boundary(data: &[DataPoint]) -> Result<AxisBoundary<XValue>> {
    let first = &data[0].x;
    let kind = first.kind();
    let mut min = first;
    let mut max = first;
    let mut seen = FxHashSet::default();
    let mut domain = Vec::new();

    for (i, point) in data.iter().enumerate() {
        let x = &point.x;
        if x.kind() != kind {
            return Err(ChartError::DataShape(format!(
                "record {i}: x is {:?} but record 0 has {kind:?}",
                x.kind()
            )));
        }
        if let XValue::Number(v) = x {
            if !v.is_finite() {
                return Err(ChartError::DataShape(format!("record {i}: x is not finite")));
            }
        }
        if x.compare(min) == Ordering::Less {
            min = x;
        }
        if x.compare(max) == Ordering::Greater {
            max = x;
        }
        if seen.insert(x.dedup_key()) {
            domain.push(x.clone());
        }
    }

    Ok(AxisBoundary {
        min: min.clone(),
        max: max.clone(),
        domain,
    })
}

fn y_boundary(data: &[DataPoint]) -> Result<AxisBoundary<f64>> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut track = |i: usize, v: f64| -> Result<()> {
        if !v.is_finite() {
            return Err(ChartError::DataShape(format!("record {i}: y is not finite")));
        }
        min = min.min(v);
        max = max.max(v);
        Ok(())
    };

    match &data[0].y {
        YValue::Scalar(_) => {
            for (i, point) in data.iter().enumerate() {
                match &point.y {
                    YValue::Scalar(v) => track(i, *v)?,
                    YValue::Series(_) => {
                        return Err(ChartError::DataShape(format!(
                            "record {i}: y is a series mapping but record 0 is scalar"
                        )))
                    }
                }
            }
        }
        YValue::Series(reference) => {
            if reference.is_empty() {
                return Err(ChartError::DataShape("record 0: empty series mapping".into()));
            }
            for (i, point) in data.iter().enumerate() {
                let YValue::Series(series) = &point.y else {
                    return Err(ChartError::DataShape(format!(
                        "record {i}: y is scalar but record 0 is a series mapping"
                    )));
                };
                let same_keys = series.len() == reference.len()
                    && reference.keys().all(|k| series.contains_key(k));
                if !same_keys {
                    return Err(ChartError::DataShape(format!(
                        "record {i}: series keys {:?} differ from {:?}",
                        series.keys().collect::<Vec<_>>(),
                        reference.keys().collect::<Vec<_>>()
                    )));
                }
                for v in series.values() {
                    track(i, *v)?;
                }
            }
        }
    }

    Ok(AxisBoundary {
        min,
        max,
        domain: Vec::new(),
    })
}
