use super::fcurve::Curve;
use crate::math::QuatExt;
use glam::Quat;

/// The four component curves of one joint's rotation, in (w, x, y, z) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuaternionCurveGroup {
    curves: [Curve; 4],
}

impl QuaternionCurveGroup {
    pub fn new(curves: [Curve; 4]) -> Self {
        Self { curves }
    }

    /// Linear keys at `times`, one quaternion per time.
    pub fn from_samples(samples: impl IntoIterator<Item = (f32, Quat)>) -> Self {
        let mut curves: [Vec<(f32, f32)>; 4] = Default::default();
        for (time, q) in samples {
            for (curve, value) in curves.iter_mut().zip(q.to_wxyz()) {
                curve.push((time, value));
            }
        }
        Self {
            curves: curves.map(Curve::from_samples),
        }
    }

    #[inline]
    pub fn curves(&self) -> &[Curve; 4] {
        &self.curves
    }

    pub fn into_curves(self) -> [Curve; 4] {
        self.curves
    }

    /// Component values at `time`, not normalised.
    pub fn evaluate_raw(&self, time: f32) -> [f32; 4] {
        [
            self.curves[0].evaluate(time),
            self.curves[1].evaluate(time),
            self.curves[2].evaluate(time),
            self.curves[3].evaluate(time),
        ]
    }

    /// Rotation at `time`, normalised. An all-zero sample reads as identity.
    pub fn evaluate(&self, time: f32) -> Quat {
        let q = Quat::from_wxyz(self.evaluate_raw(time));
        if q.length_squared() <= f32::EPSILON {
            Quat::IDENTITY
        } else {
            q.normalize()
        }
    }

    /// Earliest first key and latest last key over the four curves.
    pub fn time_span(&self) -> Option<(f32, f32)> {
        self.curves
            .iter()
            .filter_map(Curve::time_span)
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }
}
