//! Value transitions driven by the host clock

/// Easing applied to transition progress
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueTransition {
    start: f32,
    end: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
    value: f32,
}

impl ValueTransition {
    pub fn new(start: f32, end: f32, duration_ms: u64, easing: Easing) -> Self {
        Self {
            start,
            end,
            duration_ms: (duration_ms as f32).max(1e-3),
            elapsed_ms: 0.0,
            easing,
            value: start,
        }
    }

    pub fn step(&mut self, dt_ms: f32) {
        if self.is_finished() {
            self.value = self.end;
            return;
        }
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
        let t = self.easing.apply(self.elapsed_ms / self.duration_ms);
        self.value = if self.is_finished() {
            self.end
        } else {
            lerp_f32(self.start, self.end, t)
        };
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.end
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_reaches_target() {
        let mut t = ValueTransition::new(0.0, 1.0, 1000, Easing::Linear);
        t.step(400.0);
        assert!(t.value() > 0.0 && t.value() < 1.0);
        t.step(600.0);
        assert_eq!(t.value(), 1.0);
        assert!(t.is_finished());
    }

    #[test]
    fn cubic_in_out_is_symmetric_at_midpoint() {
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(Easing::CubicInOut.apply(0.0), 0.0);
        assert_eq!(Easing::CubicInOut.apply(1.0), 1.0);
    }

    #[test]
    fn lerp_clamps_t() {
        assert_eq!(lerp_f32(0.0, 10.0, -1.0), 0.0);
        assert_eq!(lerp_f32(0.0, 10.0, 2.0), 10.0);
    }
}
