//! Data-space to pixel-space mappings

use chrono::{DateTime, Utc};

use crate::boundary::{Boundary, XKind, XValue};
use crate::error::{ChartError, Result};

/// Inner and outer padding fraction of band scales
pub const BAND_PADDING: f64 = 0.1;

/// Affine map from a numeric domain onto a pixel range. Either end pair
/// may be descending.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < 1e-12 {
            // A single-valued domain sits in the middle of the range.
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) * (r1 - r0) / (d1 - d0)
    }

    /// `count` evenly spaced domain values, both ends included
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let last = count.max(2) - 1;
        (0..=last)
            .map(|i| {
                if i == last {
                    d1
                } else {
                    d0 + (d1 - d0) * i as f64 / last as f64
                }
            })
            .collect()
    }
}

/// Equal slots over `slots` ordinals.
///
/// `padding` is the fraction of a step left empty between neighbouring
/// bands and at each end: the step is `extent / (slots + padding)` and each
/// band is `step * (1 - padding)` wide. A descending range fills slots from
/// the far end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandScale {
    slots: usize,
    origin: f64,
    step: f64,
    width: f64,
    reversed: bool,
}

impl BandScale {
    pub fn new(slots: usize, range: (f64, f64), padding: f64) -> Self {
        let reversed = range.1 < range.0;
        let low = range.0.min(range.1);
        if slots == 0 {
            return Self {
                slots,
                origin: low,
                step: 0.0,
                width: 0.0,
                reversed,
            };
        }
        let extent = (range.1 - range.0).abs();
        let step = extent / (slots as f64 + padding).max(f64::EPSILON);
        Self {
            slots,
            origin: low + step * padding,
            step,
            width: step * (1.0 - padding).max(0.0),
            reversed,
        }
    }

    pub fn band_width(&self) -> f64 {
        self.width
    }

    /// Leading edge of band `index`, `None` past the last band
    pub fn band_start(&self, index: usize) -> Option<f64> {
        if index >= self.slots {
            return None;
        }
        let slot = if self.reversed {
            self.slots - 1 - index
        } else {
            index
        };
        Some(self.origin + self.step * slot as f64)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisKind {
    #[default]
    Linear,
    Time,
    Band,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisSpec {
    pub kind: AxisKind,
    /// Map the domain onto `extent..0` instead of `0..extent`
    pub reversed: bool,
}

impl AxisSpec {
    pub fn new(kind: AxisKind) -> Self {
        Self {
            kind,
            reversed: false,
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScaleSpec {
    pub x: AxisSpec,
    pub y: AxisSpec,
}

/// One axis mapping
#[derive(Clone, Debug, PartialEq)]
pub enum Scale {
    Linear(LinearScale),
    /// Linear over epoch milliseconds
    Time(LinearScale),
    Band {
        scale: BandScale,
        domain: Vec<XValue>,
    },
}

impl Scale {
    /// Pixel position of `value`. For band scales this is the band start;
    /// values outside the domain map to `None`.
    pub fn map(&self, value: &XValue) -> Option<f64> {
        match self {
            Scale::Linear(s) => match value {
                XValue::Number(v) => Some(s.map(*v)),
                _ => None,
            },
            Scale::Time(s) => value.as_f64().map(|v| s.map(v)),
            Scale::Band { scale, domain } => domain
                .iter()
                .position(|d| d == value)
                .and_then(|i| scale.band_start(i)),
        }
    }

    pub fn map_number(&self, value: f64) -> Option<f64> {
        self.map(&XValue::Number(value))
    }

    /// Width of one band; zero for continuous scales
    pub fn band_width(&self) -> f64 {
        match self {
            Scale::Band { scale, .. } => scale.band_width(),
            _ => 0.0,
        }
    }

    /// Tick values: the domain for band scales, evenly spaced values
    /// otherwise.
    pub fn ticks(&self, count: usize) -> Vec<XValue> {
        match self {
            Scale::Linear(s) => s.ticks(count).into_iter().map(XValue::Number).collect(),
            Scale::Time(s) => s
                .ticks(count)
                .into_iter()
                .filter_map(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64))
                .map(XValue::Time)
                .collect(),
            Scale::Band { domain, .. } => domain.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scales {
    pub x: Scale,
    pub y: Scale,
}

/// Build X and Y mappings from `boundary` onto a `width` x `height` pixel
/// area.
pub fn scale(boundary: &Boundary, width: f64, height: f64, spec: ScaleSpec) -> Result<Scales> {
    scale_with_padding(boundary, width, height, spec, BAND_PADDING)
}

pub fn scale_with_padding(
    boundary: &Boundary,
    width: f64,
    height: f64,
    spec: ScaleSpec,
    band_padding: f64,
) -> Result<Scales> {
    if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
        return Err(ChartError::Axis(format!(
            "pixel extent must be finite and non-negative, got {width}x{height}"
        )));
    }

    let x = axis_scale(
        "x",
        &boundary.x.min,
        &boundary.x.max,
        &boundary.x.domain,
        width,
        spec.x,
        band_padding,
    )?;
    let y_domain: Vec<XValue> = boundary.y.domain.iter().copied().map(XValue::Number).collect();
    let y = axis_scale(
        "y",
        &XValue::Number(boundary.y.min),
        &XValue::Number(boundary.y.max),
        &y_domain,
        height,
        spec.y,
        band_padding,
    )?;
    Ok(Scales { x, y })
}

fn axis_scale(
    axis: &str,
    min: &XValue,
    max: &XValue,
    domain: &[XValue],
    extent: f64,
    spec: AxisSpec,
    band_padding: f64,
) -> Result<Scale> {
    let (r0, r1) = if spec.reversed {
        (extent, 0.0)
    } else {
        (0.0, extent)
    };
    match spec.kind {
        AxisKind::Linear => match (min, max) {
            (XValue::Number(lo), XValue::Number(hi)) => {
                Ok(Scale::Linear(LinearScale::new((*lo, *hi), (r0, r1))))
            }
            _ => Err(ChartError::Axis(format!(
                "{axis}: linear axis needs numeric bounds, got {:?}",
                min.kind()
            ))),
        },
        AxisKind::Time => {
            // Plain numbers are accepted as epoch millis.
            let continuous = |k: XKind| matches!(k, XKind::Time | XKind::Number);
            let both_time = continuous(min.kind()) && continuous(max.kind());
            match (both_time, min.as_f64(), max.as_f64()) {
                (true, Some(lo), Some(hi)) => {
                    Ok(Scale::Time(LinearScale::new((lo, hi), (r0, r1))))
                }
                _ => Err(ChartError::Axis(format!(
                    "{axis}: time axis needs timestamp bounds, got {:?}",
                    min.kind()
                ))),
            }
        }
        AxisKind::Band => Ok(Scale::Band {
            scale: BandScale::new(domain.len(), (r0, r1), band_padding),
            domain: domain.to_vec(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::{boundary, DataPoint};

    #[test]
    fn single_valued_domain_maps_to_range_middle() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 80.0));
        assert_eq!(s.map(5.0), 40.0);
        assert_eq!(s.map(100.0), 40.0);
        assert_eq!(s.ticks(3), vec![5.0, 5.0, 5.0]);
    }

    #[test]
    fn ticks_end_exactly_on_domain_max() {
        let s = LinearScale::new((0.0, 0.3), (0.0, 1.0));
        let ticks = s.ticks(4);
        assert_eq!(ticks.len(), 4);
        assert_eq!(ticks[3], 0.3);
        assert_eq!(s.ticks(0).len(), 2);
    }

    #[test]
    fn bands_leave_padding_between_and_around() {
        // step = 310 / (3 + 0.1) = 100
        let b = BandScale::new(3, (0.0, 310.0), 0.1);
        assert!((b.band_width() - 90.0).abs() < 1e-9);
        let starts: Vec<f64> = (0..3).filter_map(|i| b.band_start(i)).collect();
        for (start, expected) in starts.iter().zip([10.0, 110.0, 210.0]) {
            assert!((start - expected).abs() < 1e-9);
        }
        assert!(b.band_start(3).is_none());
    }

    #[test]
    fn descending_range_fills_bands_from_the_far_end() {
        let b = BandScale::new(3, (310.0, 0.0), 0.1);
        assert!((b.band_start(0).unwrap() - 210.0).abs() < 1e-9);
        assert!((b.band_start(2).unwrap() - 10.0).abs() < 1e-9);
        assert!((b.band_width() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn empty_band_domain_maps_nothing() {
        let s = Scale::Band {
            scale: BandScale::new(0, (0.0, 100.0), BAND_PADDING),
            domain: Vec::new(),
        };
        assert_eq!(s.band_width(), 0.0);
        assert_eq!(s.map(&XValue::from("q1")), None);
        assert!(s.ticks(5).is_empty());
    }

    #[test]
    fn linear_axis_rejects_categorical_bounds() {
        let data = vec![DataPoint::scalar("a", 1.0)];
        let b = boundary(&data, None).unwrap();
        assert!(scale(&b, 100.0, 100.0, ScaleSpec::default()).is_err());
        let spec = ScaleSpec {
            x: AxisSpec::new(AxisKind::Band),
            y: AxisSpec::default(),
        };
        assert!(scale(&b, 100.0, 100.0, spec).is_ok());
    }

    #[test]
    fn reversed_linear_axis_maps_max_to_zero() {
        let data = vec![DataPoint::scalar(0.0, 0.0), DataPoint::scalar(1.0, 10.0)];
        let b = boundary(&data, None).unwrap();
        let spec = ScaleSpec {
            x: AxisSpec::default(),
            y: AxisSpec::default().reversed(),
        };
        let s = scale(&b, 200.0, 100.0, spec).unwrap();
        assert_eq!(s.y.map_number(10.0), Some(0.0));
        assert_eq!(s.y.map_number(0.0), Some(100.0));
        assert_eq!(s.x.map_number(1.0), Some(200.0));
    }
}
