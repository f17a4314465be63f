//! Rest-pose correctives. Each one edits the skeleton's rest data and, where
//! needed, the curves so that the animated world motion stays put.

use crate::curve::{Channel, CurveStore};
use crate::error::{RetargetError, Result};
use crate::math::Transform;
use crate::skeleton::{JointId, Skeleton};
use glam::{Quat, Vec3};
use std::f32::consts::PI;

/// Move the whole rest pose by `offset` (world units and axes), keeping the
/// hip's animated motion where it was.
///
/// Every joint below the root shifts by `offset` at rest. The hip's
/// translation keys take the opposite shift, expressed in the space they
/// live in. A hip channel without a curve gets a single key at `frame`.
pub fn apply_rest_offset(
    skeleton: &mut Skeleton,
    curves: &mut CurveStore,
    root: JointId,
    hip: JointId,
    offset: Vec3,
    frame: i32,
) -> Result<()> {
    if offset == Vec3::ZERO {
        return Ok(());
    }

    let edit_offset = skeleton.rest_world(root).inverse().transform_vector(offset);
    let top_level: Vec<JointId> = skeleton.children(root).collect();
    for id in top_level {
        skeleton.joint_mut(id).rest.translation += edit_offset;
    }

    // The hip's channels live in its rest-world frame
    let compensation = skeleton.rest_world(hip).inverse().transform_vector(-offset);
    let hip_name = skeleton.joint(hip).name.clone();
    for (channel, delta) in Channel::TRANSLATION.into_iter().zip(compensation.to_array()) {
        match curves.get_curve_mut(&hip_name, channel) {
            Some(curve) => curve.map_values(|v| v + delta),
            None => curves.insert_key(&hip_name, channel, frame as f32, delta),
        }
    }

    log::debug!(
        "rest offset {:?} applied, hip keys shifted by {:?}",
        offset,
        compensation
    );
    Ok(())
}

fn resolve(skeleton: &Skeleton, names: &[String]) -> Result<Vec<JointId>> {
    names.iter().map(|name| skeleton.require(name)).collect()
}

/// Rewrite the children of `id` so their rest-world placement survives `id`
/// changing its local rest from `before` to its current value.
fn keep_children_in_place(skeleton: &mut Skeleton, id: JointId, before: &Transform) {
    let after = skeleton.joint(id).rest_local();
    let correction = after.inverse().mul_transform(before);
    let children: Vec<JointId> = skeleton.children(id).collect();
    for child in children {
        let rest = skeleton.joint(child).rest;
        skeleton.joint_mut(child).rest = correction.mul_transform(&rest);
    }
}

/// Put the head of a connected joint on `head` (parent space) and re-aim it
/// so its tail stays where it was. Its children do not move.
fn move_connected_head(skeleton: &mut Skeleton, id: JointId, head: Vec3) {
    let before = skeleton.joint(id).rest_local();
    let tail_point = before.transform_point(skeleton.joint(id).tail);
    let old_dir = tail_point - before.translation;
    let new_dir = tail_point - head;

    let joint = skeleton.joint_mut(id);
    joint.rest.translation = head;
    if old_dir.length_squared() > f32::EPSILON && new_dir.length_squared() > f32::EPSILON {
        let arc = Quat::from_rotation_arc(old_dir.normalize(), new_dir.normalize());
        joint.rest.rotation = (arc * joint.rest.rotation).normalize();
        joint.tail *= new_dir.length() / old_dir.length();
    }

    keep_children_in_place(skeleton, id, &before);
}

/// Move the tails of `names` by `offset` (world). Connected children keep
/// their heads on the moved tails and their own tails in place. Curves are
/// left alone, so this is only an approximate fix for knees that flicker
/// after export.
pub fn apply_knee_fix(skeleton: &mut Skeleton, offset: Vec3, names: &[String]) -> Result<()> {
    let ids = resolve(skeleton, names)?;
    for id in ids {
        let delta = skeleton.rest_world(id).inverse().transform_vector(offset);
        let tail = skeleton.joint(id).tail + delta;
        skeleton.joint_mut(id).tail = tail;

        let connected: Vec<JointId> = skeleton
            .children(id)
            .filter(|&child| skeleton.joint(child).connected)
            .collect();
        for child in connected {
            move_connected_head(skeleton, child, tail);
        }
    }
    Ok(())
}

/// Roll `names` by half a turn. Children keep their rest placement.
pub fn apply_foot_roll_fix(skeleton: &mut Skeleton, names: &[String]) -> Result<()> {
    let ids = resolve(skeleton, names)?;
    for id in ids {
        let before = skeleton.joint(id).rest_local();
        skeleton.joint_mut(id).roll = PI;
        keep_children_in_place(skeleton, id, &before);
    }
    Ok(())
}

/// Multiply the root's rest scale by `factor` and drop its scale curves.
pub fn apply_scale_factor(
    skeleton: &mut Skeleton,
    curves: &mut CurveStore,
    root: JointId,
    factor: f32,
) {
    let name = skeleton.joint(root).name.clone();
    for channel in Channel::SCALE {
        curves.remove_curve(&name, channel);
    }
    skeleton.joint_mut(root).rest.scale *= factor;
}

/// Fold the root's rest rotation and/or scale into the joints below it.
///
/// World positions and rotations of every descendant are unchanged. A
/// folded scale ends up in the rest translations, tails and translation
/// curves of the descendants, so it must be uniform.
pub fn apply_root_transform(
    skeleton: &mut Skeleton,
    curves: &mut CurveStore,
    root: JointId,
    rotation: bool,
    scale: bool,
) -> Result<()> {
    let rest = skeleton.joint(root).rest;

    if rotation && rest.rotation != Quat::IDENTITY {
        let top_level: Vec<JointId> = skeleton.children(root).collect();
        for id in top_level {
            let child = skeleton.joint(id).rest;
            skeleton.joint_mut(id).rest = Transform {
                translation: rest.rotation * child.translation,
                rotation: (rest.rotation * child.rotation).normalize(),
                scale: child.scale,
            };
        }
        skeleton.joint_mut(root).rest.rotation = Quat::IDENTITY;
    }

    if scale && rest.scale != Vec3::ONE {
        let s = rest.scale;
        if (s.x - s.y).abs() > 1e-6 || (s.x - s.z).abs() > 1e-6 {
            return Err(RetargetError::InvalidSkeleton(format!(
                "cannot apply non-uniform root scale {:?}",
                s
            )));
        }
        let factor = s.x;

        let descendants: Vec<JointId> = skeleton
            .ids()
            .filter(|&id| id != root && skeleton.is_descendant(id, root))
            .collect();
        for id in descendants {
            let joint = skeleton.joint_mut(id);
            joint.rest.translation *= factor;
            joint.tail *= factor;
            let name = joint.name.clone();
            for channel in Channel::TRANSLATION {
                if let Some(curve) = curves.get_curve_mut(&name, channel) {
                    curve.map_values(|v| v * factor);
                }
            }
        }
        skeleton.joint_mut(root).rest.scale = Vec3::ONE;
    }

    Ok(())
}
