//! Quaternion continuity fixing.
//!
//! Rotation curves are resampled on integer frames and walked pairwise, so
//! that neighbouring keys never jump to the opposite hemisphere (sign swap)
//! or by a near half turn (flip).

use crate::config::CleanupOptions;
use crate::curve::{CurveStore, QuaternionCurveGroup};
use crate::math::QuatExt;
use crate::Result;
use glam::Quat;
use std::f32::consts::PI;

/// Clean one rotation group. The result holds one linear key per integer
/// frame over `[floor(first key), ceil(last key)]`.
pub fn cleanup_group(
    group: &QuaternionCurveGroup,
    options: &CleanupOptions,
) -> QuaternionCurveGroup {
    let Some((first, last)) = group.time_span() else {
        return group.clone();
    };
    let start = first.floor() as i32;
    let end = last.ceil() as i32;

    let mut keys: Vec<[f32; 4]> = (start..=end)
        .map(|frame| group.evaluate_raw(frame as f32))
        .collect();

    for i in 1..keys.len() {
        let prev = keys[i - 1];
        let mut cur = keys[i];

        if options.prevent_flips {
            if let Some(fixed) = unflip(prev, cur, options.flip_window) {
                cur = fixed;
            }
        }

        if options.prevent_inverts {
            let change = component_distance(prev, cur);
            if change > options.invert_threshold
                && component_distance(prev, cur.map(|c| -c)) < change
            {
                cur = cur.map(|c| -c);
            }
        }

        keys[i] = cur;
    }

    QuaternionCurveGroup::from_samples(
        (start..=end)
            .zip(keys)
            .map(|(frame, wxyz)| (frame as f32, Quat::from_wxyz(wxyz))),
    )
}

/// Sum of absolute component differences
fn component_distance(a: [f32; 4], b: [f32; 4]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

/// If `cur` sits a near half turn away from `prev`, turn it back by π about
/// the axis of the jump. The axis is taken in `prev`'s local frame, so the
/// fix is `prev · R(axis, π) · (prev⁻¹ · cur)`.
fn unflip(prev: [f32; 4], cur: [f32; 4], window: f32) -> Option<[f32; 4]> {
    let q_prev = Quat::from_wxyz(prev);
    let q_cur = Quat::from_wxyz(cur);
    if q_prev.length_squared() <= f32::EPSILON || q_cur.length_squared() <= f32::EPSILON {
        return None;
    }

    let diff = q_prev.rotation_difference(q_cur);
    let (axis, angle) = diff.to_axis_angle();
    if (angle - PI).abs() >= window {
        return None;
    }

    let fixed = (q_prev.normalize() * Quat::from_axis_angle(axis, PI) * diff).normalize();
    Some(fixed.to_wxyz())
}

/// Clean the rotation group of one joint. Returns false when the joint has
/// no rotation curves.
pub fn cleanup_joint(
    store: &mut CurveStore,
    joint: &str,
    options: &CleanupOptions,
) -> Result<bool> {
    match store.quaternion_group(joint)? {
        Some(group) => {
            store.set_quaternion_group(joint, cleanup_group(&group, options));
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Clean every rotation group of the store. All groups are checked before
/// any is rewritten, so a malformed group leaves the store untouched.
/// Returns the number of groups cleaned.
pub fn cleanup_all(store: &mut CurveStore, options: &CleanupOptions) -> Result<usize> {
    let mut cleaned = Vec::new();
    for joint in store.joint_names() {
        if let Some(group) = store.quaternion_group(joint)? {
            cleaned.push((joint.to_string(), cleanup_group(&group, options)));
        }
    }

    let count = cleaned.len();
    for (joint, group) in cleaned {
        store.set_quaternion_group(&joint, group);
    }
    log::debug!("quaternion cleanup rewrote {} rotation groups", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Channel, Curve};
    use crate::error::RetargetError;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::FRAC_PI_2;
    use wasm_bindgen_test::*;

    fn random_unit_quat(rng: &mut StdRng) -> Quat {
        let axis = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        )
        .try_normalize()
        .unwrap_or(Vec3::Z);
        Quat::from_axis_angle(axis, rng.random_range(0.0..std::f32::consts::TAU))
    }

    /// Smooth motion: a random start rotation turning slowly about a random axis.
    fn smooth_motion(rng: &mut StdRng, frames: i32) -> Vec<Quat> {
        let start = random_unit_quat(rng);
        let axis = random_unit_quat(rng) * Vec3::X;
        let speed = rng.random_range(0.01..0.1);
        (0..frames)
            .map(|f| (start * Quat::from_axis_angle(axis, speed * f as f32)).normalize())
            .collect()
    }

    fn with_random_sign_flips(rng: &mut StdRng, motion: &[Quat]) -> QuaternionCurveGroup {
        QuaternionCurveGroup::from_samples(motion.iter().enumerate().map(|(f, &q)| {
            let q = if rng.random_bool(0.3) { -q } else { q };
            (f as f32, q)
        }))
    }

    fn dot(a: [f32; 4], b: [f32; 4]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    /// Rotation angle taking `a` to `b`, counting a sign swap as a full turn.
    fn key_angle(a: [f32; 4], b: [f32; 4]) -> f32 {
        2.0 * dot(a, b).clamp(-1.0, 1.0).acos()
    }

    #[test]
    fn test_output_has_one_key_per_integer_frame() {
        let mut curves: [Curve; 4] = Default::default();
        curves[0] = Curve::from_samples([(0.5, 1.0), (4.2, 1.0)]);
        curves[1] = Curve::from_samples([(1.0, 0.0), (3.0, 0.0)]);
        curves[2] = Curve::from_samples([(1.0, 0.0)]);
        curves[3] = Curve::from_samples([(2.0, 0.0)]);
        let group = QuaternionCurveGroup::new(curves);

        let cleaned = cleanup_group(&group, &CleanupOptions::default());
        for curve in cleaned.curves() {
            let times: Vec<f32> = curve.keyframes().iter().map(|k| k.time).collect();
            assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        }
    }

    #[test]
    fn test_continuity_after_sign_flips() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let motion = smooth_motion(&mut rng, 60);
            let group = with_random_sign_flips(&mut rng, &motion);
            let cleaned = cleanup_group(&group, &CleanupOptions::default());

            for f in 1..60 {
                let a = cleaned.evaluate_raw((f - 1) as f32);
                let b = cleaned.evaluate_raw(f as f32);
                assert!(key_angle(a, b) <= FRAC_PI_2, "jump at frame {}", f);
            }
        }
    }

    #[test]
    fn test_invert_guard_preserves_rotation() {
        let options = CleanupOptions {
            prevent_flips: false,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let motion = smooth_motion(&mut rng, 40);
            let group = with_random_sign_flips(&mut rng, &motion);
            let cleaned = cleanup_group(&group, &options);

            for (f, q) in motion.iter().enumerate() {
                let got = Quat::from_wxyz(cleaned.evaluate_raw(f as f32));
                assert!(got.same_rotation(*q, 1e-5), "rotation changed at frame {}", f);
            }
        }
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(23);
        let options = CleanupOptions::default();
        for _ in 0..20 {
            let mut motion = smooth_motion(&mut rng, 30);
            // A glitch frame a half turn away
            motion[12] = motion[12] * Quat::from_rotation_y(PI);
            let group = with_random_sign_flips(&mut rng, &motion);

            let once = cleanup_group(&group, &options);
            let twice = cleanup_group(&once, &options);
            for f in 0..30 {
                let a = once.evaluate_raw(f as f32);
                let b = twice.evaluate_raw(f as f32);
                for j in 0..4 {
                    assert!((a[j] - b[j]).abs() < 1e-5, "frame {} component {}", f, j);
                }
            }
        }
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_invert_guard_negates_swapped_sign() {
        let q_prev = Quat::from_xyzw(0.0, 0.0, 0.0, 1.0);
        let q_cur = Quat::from_xyzw(0.0, 0.0, 0.0, -0.999);
        let group = QuaternionCurveGroup::from_samples([(0.0, q_prev), (1.0, q_cur)]);

        let cleaned = cleanup_group(&group, &CleanupOptions::default());
        assert_eq!(cleaned.evaluate_raw(0.0), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(cleaned.evaluate_raw(1.0), [0.999, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invert_threshold_is_tunable() {
        // A fast genuine turn, just outside the flip window
        let q_prev = Quat::IDENTITY;
        let q_cur = Quat::from_rotation_z(3.8);
        let group = QuaternionCurveGroup::from_samples([(0.0, q_prev), (1.0, q_cur)]);

        let strict = cleanup_group(&group, &CleanupOptions::default());
        let loose = cleanup_group(
            &group,
            &CleanupOptions {
                invert_threshold: 4.0,
                ..Default::default()
            },
        );
        assert_eq!(strict.evaluate_raw(1.0), (-q_cur).to_wxyz());
        assert_eq!(loose.evaluate_raw(1.0), q_cur.to_wxyz());
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_flip_guard_undoes_half_turn() {
        let q0 = Quat::from_rotation_z(0.2);
        let q1 = Quat::from_rotation_z(0.25) * Quat::from_rotation_x(PI - 0.1);
        let group = QuaternionCurveGroup::from_samples([(0.0, q0), (1.0, q1)]);
        let cleaned = cleanup_group(&group, &CleanupOptions::default());

        let fixed = Quat::from_wxyz(cleaned.evaluate_raw(1.0));
        assert!(fixed.angle_between(q0) < 0.5);
        assert!(dot(cleaned.evaluate_raw(0.0), fixed.to_wxyz()) > 0.0);
    }

    #[test]
    fn test_continuity_across_half_turn_flip() {
        // From frame 5 on the motion carries an extra half turn about X
        let samples: Vec<(f32, Quat)> = (0..10)
            .map(|f| {
                let q = Quat::from_rotation_z(0.05 * f as f32);
                let q = if f >= 5 { q * Quat::from_rotation_x(PI) } else { q };
                (f as f32, q)
            })
            .collect();
        let group = QuaternionCurveGroup::from_samples(samples);

        let unguarded = cleanup_group(
            &group,
            &CleanupOptions {
                prevent_flips: false,
                ..Default::default()
            },
        );
        assert!(key_angle(unguarded.evaluate_raw(4.0), unguarded.evaluate_raw(5.0)) > FRAC_PI_2);

        let cleaned = cleanup_group(&group, &CleanupOptions::default());
        for f in 1..10 {
            let a = cleaned.evaluate_raw((f - 1) as f32);
            let b = cleaned.evaluate_raw(f as f32);
            assert!(key_angle(a, b) <= FRAC_PI_2, "jump at frame {}", f);
        }
    }

    #[test]
    fn test_cleanup_all_rejects_partial_group_untouched() {
        let mut store = CurveStore::new();
        store.set_quaternion_group(
            "Hips",
            QuaternionCurveGroup::from_samples([(0.0, Quat::IDENTITY), (1.0, -Quat::IDENTITY)]),
        );
        store.set_curve("Spine", Channel::RotationW, Curve::from_samples([(0.0, 1.0)]));
        let before = store.clone();

        let err = cleanup_all(&mut store, &CleanupOptions::default());
        assert!(matches!(err, Err(RetargetError::MalformedCurveGroup { .. })));
        assert_eq!(store, before);
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_cleanup_joint_without_rotation() {
        let mut store = CurveStore::new();
        store.insert_key("Hips", Channel::TranslationX, 0.0, 1.0);
        assert!(!cleanup_joint(&mut store, "Hips", &CleanupOptions::default()).unwrap());
        assert!(!cleanup_joint(&mut store, "Nope", &CleanupOptions::default()).unwrap());
    }
}
