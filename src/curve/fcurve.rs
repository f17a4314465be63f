use super::keyframe::{Interpolation, Keyframe};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys closer than this in time are the same key.
pub const KEY_TIME_EPSILON: f32 = 1e-4;

const BEZIER_SOLVE_ITERATIONS: usize = 32;

/// Scalar animation curve: keyframes sorted strictly by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Curve {
    keyframes: Vec<Keyframe>,
}

impl From<Vec<Keyframe>> for Curve {
    fn from(keyframes: Vec<Keyframe>) -> Self {
        Self::from_keyframes(keyframes)
    }
}

impl From<Curve> for Vec<Keyframe> {
    fn from(curve: Curve) -> Self {
        curve.keyframes
    }
}

impl Curve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a curve from unordered keys. When two keys share a time the
    /// later one in the input wins.
    pub fn from_keyframes(mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut sorted: Vec<Keyframe> = Vec::with_capacity(keyframes.len());
        for key in keyframes {
            match sorted.last_mut() {
                Some(last) if (key.time - last.time).abs() <= KEY_TIME_EPSILON => *last = key,
                _ => sorted.push(key),
            }
        }
        Self { keyframes: sorted }
    }

    /// Linear curve through `(time, value)` samples.
    pub fn from_samples(samples: impl IntoIterator<Item = (f32, f32)>) -> Self {
        Self::from_keyframes(
            samples
                .into_iter()
                .map(|(time, value)| Keyframe::linear(time, value))
                .collect(),
        )
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Times of the first and last key
    pub fn time_span(&self) -> Option<(f32, f32)> {
        Some((self.keyframes.first()?.time, self.keyframes.last()?.time))
    }

    /// Insert a key, replacing any key at the same time.
    pub fn insert(&mut self, key: Keyframe) {
        let idx = self.keyframes.partition_point(|k| k.time < key.time);

        if idx < self.keyframes.len()
            && (self.keyframes[idx].time - key.time).abs() <= KEY_TIME_EPSILON
        {
            self.keyframes[idx] = key;
        } else if idx > 0 && (key.time - self.keyframes[idx - 1].time).abs() <= KEY_TIME_EPSILON {
            self.keyframes[idx - 1] = key;
        } else {
            self.keyframes.insert(idx, key);
        }
    }

    /// Apply `f` to every key value (and handle value) in place.
    pub fn map_values(&mut self, mut f: impl FnMut(f32) -> f32) {
        for key in &mut self.keyframes {
            key.value = f(key.value);
            if let Some(handles) = key.handles.as_mut() {
                handles.left.y = f(handles.left.y);
                handles.right.y = f(handles.right.y);
            }
        }
    }

    /// Evaluate at `time`. Values hold constant outside the key span.
    pub fn evaluate(&self, time: f32) -> f32 {
        let keys = &self.keyframes;
        let (first, last) = match (keys.first(), keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        let next_idx = keys.partition_point(|k| k.time <= time);
        let prev = &keys[next_idx - 1];
        let next = &keys[next_idx];

        if time == prev.time {
            return prev.value;
        }

        match prev.interpolation {
            Interpolation::Step => prev.value,
            Interpolation::Linear => {
                let segment = next.time - prev.time;
                let t = if segment > 0.0 {
                    (time - prev.time) / segment
                } else {
                    0.0
                };
                prev.value + (next.value - prev.value) * t
            }
            Interpolation::Bezier => bezier_segment(prev, next, time),
        }
    }
}

#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, s: f32) -> f32 {
    let u = 1.0 - s;
    u * u * u * p0 + 3.0 * u * u * s * p1 + 3.0 * u * s * s * p2 + s * s * s * p3
}

#[inline]
fn cubic_bezier_derivative(p0: f32, p1: f32, p2: f32, p3: f32, s: f32) -> f32 {
    let u = 1.0 - s;
    3.0 * u * u * (p1 - p0) + 6.0 * u * s * (p2 - p1) + 3.0 * s * s * (p3 - p2)
}

/// Evaluate the cubic between two keys at `time`.
///
/// The time polynomial is solved for the curve parameter with Newton steps,
/// falling back to bisection when the slope vanishes or a step leaves the
/// bracket. Handle times are clamped into the segment so the time polynomial
/// stays monotonic.
fn bezier_segment(prev: &Keyframe, next: &Keyframe, time: f32) -> f32 {
    let (t0, v0, t1, v1) = (prev.time, prev.value, next.time, next.value);
    let third = Vec2::new(t1 - t0, v1 - v0) / 3.0;

    let out_handle = prev
        .handles
        .map(|h| h.right)
        .unwrap_or(Vec2::new(t0, v0) + third);
    let in_handle = next
        .handles
        .map(|h| h.left)
        .unwrap_or(Vec2::new(t1, v1) - third);

    let x1 = out_handle.x.clamp(t0, t1);
    let x2 = in_handle.x.clamp(t0, t1);

    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut s = (time - t0) / (t1 - t0);
    for _ in 0..BEZIER_SOLVE_ITERATIONS {
        let err = cubic_bezier(t0, x1, x2, t1, s) - time;
        if err.abs() < 1e-6 {
            break;
        }
        if err < 0.0 {
            lo = s;
        } else {
            hi = s;
        }

        let slope = cubic_bezier_derivative(t0, x1, x2, t1, s);
        let newton = s - err / slope;
        s = if slope.abs() > 1e-6 && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
    }

    cubic_bezier(v0, out_handle.y, in_handle.y, v1, s)
}
