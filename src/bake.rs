//! Transform composition and visual-keyed baking.
//!
//! A bake samples a world-space expression on every integer frame of the
//! clip and stores the result as linear keys: either on a transient helper
//! ([`TransformCurves`]) or back onto a joint's own channels.

use crate::animation::{AnimationClip, FrameRange};
use crate::config::CleanupOptions;
use crate::curve::{ChannelSet, Curve};
use crate::math::{QuatExt, Transform};
use crate::quat_cleanup::cleanup_group;
use crate::skeleton::{JointId, Skeleton};
use crate::Result;
use glam::{BVec3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Which part of the source rotation a bake keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMask {
    /// Identity rotation
    #[default]
    None,
    /// Only the rotation about world Z
    Yaw,
    Full,
}

/// World-space expression sampled by [`bake`]: the joint's world
/// transform, masked, offset and clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceExpr {
    pub joint: JointId,
    /// Translation axes copied from the joint (others are zero)
    pub translation: [bool; 3],
    pub rotation: RotationMask,
    /// Added to the masked translation
    pub offset: Vec3,
    /// Lower bound on the resulting Z
    pub min_z: Option<f32>,
}

impl SourceExpr {
    /// Full world translation and rotation of `joint`.
    pub fn world_of(joint: JointId) -> Self {
        Self {
            joint,
            translation: [true; 3],
            rotation: RotationMask::Full,
            offset: Vec3::ZERO,
            min_z: None,
        }
    }

    /// Evaluate against the joint's world transform.
    pub fn apply(&self, world: &Transform) -> Transform {
        let mask = BVec3::from_array(self.translation);
        let mut translation = Vec3::select(mask, world.translation, Vec3::ZERO) + self.offset;
        if let Some(min_z) = self.min_z {
            translation.z = translation.z.max(min_z);
        }

        let rotation = match self.rotation {
            RotationMask::None => Quat::IDENTITY,
            RotationMask::Yaw => Quat::from_rotation_z(world.rotation.yaw()),
            RotationMask::Full => world.rotation,
        };

        Transform {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }
}

/// Baked translation, rotation and scale curves of a transient helper.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformCurves {
    pub frame_range: FrameRange,
    pub channels: ChannelSet,
}

impl TransformCurves {
    pub fn from_transforms(frame_range: FrameRange, transforms: &[Transform]) -> Self {
        let frames: Vec<i32> = frame_range.frames().collect();
        Self {
            frame_range,
            channels: ChannelSet::from_transforms(&frames, transforms),
        }
    }

    #[inline]
    pub fn sample(&self, frame: i32) -> Transform {
        self.channels.sample(frame as f32)
    }

    /// Run the continuity fixer over the rotation curves.
    pub fn cleanup(&mut self, label: &str, options: &CleanupOptions) -> Result<()> {
        if let Some(group) = self.channels.quaternion_group(label)? {
            self.channels.set_quaternion_group(cleanup_group(&group, options));
        }
        Ok(())
    }
}

/// Check that every curve of the clip can be sampled over its frame range:
/// a valid range, finite key times and values, and a key domain that
/// overlaps the range.
pub fn ensure_common_domain(clip: &AnimationClip) -> Result<()> {
    let range = clip.frame_range;
    range.validate()?;

    for (joint, channels) in clip.curves.iter() {
        for (channel, curve) in channels.iter() {
            check_curve(&range, curve).map_err(|reason| {
                range.incompatible(format!("{} {:?}: {}", joint, channel, reason))
            })?;
        }
    }
    Ok(())
}

fn check_curve(range: &FrameRange, curve: &Curve) -> std::result::Result<(), &'static str> {
    let (first, last) = curve.time_span().ok_or("curve has no keys")?;
    if curve
        .keyframes()
        .iter()
        .any(|k| !k.time.is_finite() || !k.value.is_finite())
    {
        return Err("non-finite keyframe");
    }
    if last < range.start as f32 || first > range.end as f32 {
        return Err("keys lie outside the frame range");
    }
    Ok(())
}

/// Sample `expr` on every frame of the clip into helper curves.
pub fn bake(
    skeleton: &Skeleton,
    clip: &AnimationClip,
    expr: &SourceExpr,
) -> Result<TransformCurves> {
    clip.frame_range.validate()?;

    let transforms: Vec<Transform> = clip
        .frame_range
        .frames()
        .map(|frame| {
            let world = skeleton.world_transform(&clip.curves, expr.joint, frame as f32);
            expr.apply(&world)
        })
        .collect();

    Ok(TransformCurves::from_transforms(clip.frame_range, &transforms))
}

/// Visual keying: make `joint` follow the world transforms returned by
/// `target`, which receives the frame and the joint's current world
/// transform.
///
/// Every frame is solved against the clip as it is before the call; the ten
/// channels of the joint are then replaced in one step. Nothing is written
/// when a frame fails.
pub fn bake_world_onto_joint<F>(
    skeleton: &Skeleton,
    clip: &mut AnimationClip,
    joint: JointId,
    mut target: F,
) -> Result<()>
where
    F: FnMut(i32, &Transform) -> Transform,
{
    let range = clip.frame_range;
    range.validate()?;

    let frames: Vec<i32> = range.frames().collect();
    let mut locals = Vec::with_capacity(frames.len());
    for &frame in &frames {
        let time = frame as f32;
        let own_world = skeleton.world_transform(&clip.curves, joint, time);
        let wanted = target(frame, &own_world);
        let space = skeleton.channel_space(&clip.curves, joint, time);
        let local = space.inverse().mul_transform(&wanted);

        if !(local.translation.is_finite()
            && local.rotation.is_finite()
            && local.scale.is_finite())
        {
            return Err(range.incompatible(format!(
                "non-finite transform for '{}' at frame {}",
                skeleton.joint(joint).name,
                frame
            )));
        }
        locals.push(local);
    }

    let name = skeleton.joint(joint).name.clone();
    clip.curves.write_transform_keys(&name, &frames, &locals);
    log::debug!("baked {} frames onto '{}'", frames.len(), name);
    Ok(())
}
