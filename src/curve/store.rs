use super::channel::Channel;
use super::fcurve::Curve;
use super::group::QuaternionCurveGroup;
use super::keyframe::Keyframe;
use crate::error::{RetargetError, Result};
use crate::math::{QuatExt, Transform};
use crate::skeleton::Skeleton;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// All curves of one joint, indexed by [`Channel`].
///
/// Serialized as a map from channel name to keyframe list so documents only
/// carry the channels that are actually animated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Channel, Curve>", into = "BTreeMap<Channel, Curve>")]
pub struct ChannelSet {
    curves: [Option<Curve>; Channel::COUNT],
}

impl From<BTreeMap<Channel, Curve>> for ChannelSet {
    fn from(map: BTreeMap<Channel, Curve>) -> Self {
        let mut set = ChannelSet::default();
        for (channel, curve) in map {
            set.set(channel, curve);
        }
        set
    }
}

impl From<ChannelSet> for BTreeMap<Channel, Curve> {
    fn from(set: ChannelSet) -> Self {
        Channel::ALL
            .into_iter()
            .zip(set.curves)
            .filter_map(|(channel, curve)| curve.map(|c| (channel, c)))
            .collect()
    }
}

impl ChannelSet {
    /// Ten linear curves reproducing `transforms` at `frames`.
    pub fn from_transforms(frames: &[i32], transforms: &[Transform]) -> Self {
        let mut set = ChannelSet::default();
        for channel in Channel::ALL {
            let samples = frames
                .iter()
                .zip(transforms)
                .map(|(&frame, transform)| (frame as f32, channel_value(transform, channel)));
            set.set(channel, Curve::from_samples(samples));
        }
        set
    }

    #[inline]
    pub fn get(&self, channel: Channel) -> Option<&Curve> {
        self.curves[channel.index()].as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, channel: Channel) -> Option<&mut Curve> {
        self.curves[channel.index()].as_mut()
    }

    pub fn set(&mut self, channel: Channel, curve: Curve) {
        self.curves[channel.index()] = Some(curve);
    }

    pub fn remove(&mut self, channel: Channel) -> Option<Curve> {
        self.curves[channel.index()].take()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.iter().all(Option::is_none)
    }

    /// Present curves with their channel
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &Curve)> {
        Channel::ALL
            .into_iter()
            .zip(self.curves.iter())
            .filter_map(|(channel, curve)| curve.as_ref().map(|c| (channel, c)))
    }

    /// Value of `channel` at `time`; the identity value when not animated.
    #[inline]
    pub fn evaluate(&self, channel: Channel, time: f32) -> f32 {
        self.get(channel)
            .filter(|curve| !curve.is_empty())
            .map_or(channel.rest_value(), |curve| curve.evaluate(time))
    }

    /// Local animation transform at `time`.
    pub fn sample(&self, time: f32) -> Transform {
        let [tx, ty, tz] = Channel::TRANSLATION.map(|c| self.evaluate(c, time));
        let [sx, sy, sz] = Channel::SCALE.map(|c| self.evaluate(c, time));
        let q = Quat::from_wxyz(Channel::ROTATION.map(|c| self.evaluate(c, time)));
        let rotation = if q.length_squared() <= f32::EPSILON {
            Quat::IDENTITY
        } else {
            q.normalize()
        };

        Transform {
            translation: Vec3::new(tx, ty, tz),
            rotation,
            scale: Vec3::new(sx, sy, sz),
        }
    }

    /// The rotation curves as a group.
    ///
    /// `Ok(None)` when the joint has no rotation curves at all. A partial
    /// group or an empty component is an error, `joint` names it.
    pub fn quaternion_group(&self, joint: &str) -> Result<Option<QuaternionCurveGroup>> {
        let components = Channel::ROTATION.map(|c| self.get(c));
        let present = components.iter().filter(|c| c.is_some()).count();

        match present {
            0 => Ok(None),
            4 => {
                let mut curves: [Curve; 4] = Default::default();
                for (slot, (channel, curve)) in
                    curves.iter_mut().zip(Channel::ROTATION.iter().zip(components))
                {
                    let curve = curve.ok_or_else(|| malformed(joint, "missing component"))?;
                    if curve.is_empty() {
                        return Err(malformed(joint, &format!("{:?} has no keys", channel)));
                    }
                    *slot = curve.clone();
                }
                Ok(Some(QuaternionCurveGroup::new(curves)))
            }
            n => Err(malformed(joint, &format!("{} of 4 components present", n))),
        }
    }

    pub fn set_quaternion_group(&mut self, group: QuaternionCurveGroup) {
        for (channel, curve) in Channel::ROTATION.into_iter().zip(group.into_curves()) {
            self.set(channel, curve);
        }
    }
}

fn malformed(joint: &str, reason: &str) -> RetargetError {
    RetargetError::MalformedCurveGroup {
        joint: joint.to_string(),
        reason: reason.to_string(),
    }
}

/// Scalar component of `transform` driven by `channel`.
pub fn channel_value(transform: &Transform, channel: Channel) -> f32 {
    let t = transform.translation;
    let q = transform.rotation;
    let s = transform.scale;
    match channel {
        Channel::TranslationX => t.x,
        Channel::TranslationY => t.y,
        Channel::TranslationZ => t.z,
        Channel::RotationW => q.w,
        Channel::RotationX => q.x,
        Channel::RotationY => q.y,
        Channel::RotationZ => q.z,
        Channel::ScaleX => s.x,
        Channel::ScaleY => s.y,
        Channel::ScaleZ => s.z,
    }
}

/// Curves of a clip, keyed by joint name.
///
/// Joints iterate in name order so every pass over the store is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveStore {
    joints: BTreeMap<String, ChannelSet>,
}

impl CurveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Animated joint names, in order
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.joints.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelSet)> {
        self.joints.iter().map(|(name, set)| (name.as_str(), set))
    }

    pub fn channels(&self, joint: &str) -> Option<&ChannelSet> {
        self.joints.get(joint)
    }

    pub fn get_curve(&self, joint: &str, channel: Channel) -> Option<&Curve> {
        self.joints.get(joint)?.get(channel)
    }

    pub fn get_curve_mut(&mut self, joint: &str, channel: Channel) -> Option<&mut Curve> {
        self.joints.get_mut(joint)?.get_mut(channel)
    }

    /// Replace (or create) one curve. Creates the joint's channel set when
    /// the joint was not animated.
    pub fn set_curve(&mut self, joint: &str, channel: Channel, curve: Curve) {
        self.joints
            .entry(joint.to_string())
            .or_default()
            .set(channel, curve);
    }

    /// Remove one curve. A joint left without curves disappears.
    pub fn remove_curve(&mut self, joint: &str, channel: Channel) -> Option<Curve> {
        let set = self.joints.get_mut(joint)?;
        let removed = set.remove(channel);
        if set.is_empty() {
            self.joints.remove(joint);
        }
        removed
    }

    /// Insert a linear key, creating the curve if needed.
    pub fn insert_key(&mut self, joint: &str, channel: Channel, time: f32, value: f32) {
        let set = self.joints.entry(joint.to_string()).or_default();
        match set.get_mut(channel) {
            Some(curve) => curve.insert(Keyframe::linear(time, value)),
            None => set.set(channel, Curve::from_samples([(time, value)])),
        }
    }

    pub fn quaternion_group(&self, joint: &str) -> Result<Option<QuaternionCurveGroup>> {
        match self.joints.get(joint) {
            Some(set) => set.quaternion_group(joint),
            None => Ok(None),
        }
    }

    pub fn set_quaternion_group(&mut self, joint: &str, group: QuaternionCurveGroup) {
        self.joints
            .entry(joint.to_string())
            .or_default()
            .set_quaternion_group(group);
    }

    /// Local animation transform of `joint`; identity when not animated.
    pub fn sample_local(&self, joint: &str, time: f32) -> Transform {
        self.joints
            .get(joint)
            .map_or(Transform::IDENTITY, |set| set.sample(time))
    }

    /// Replace every channel of `joint` with linear keys through
    /// `transforms` at `frames`, in a single commit.
    pub fn write_transform_keys(&mut self, joint: &str, frames: &[i32], transforms: &[Transform]) {
        self.joints.insert(
            joint.to_string(),
            ChannelSet::from_transforms(frames, transforms),
        );
    }

    /// Move a joint's curves to a new name, replacing whatever was there.
    pub fn rename_joint(&mut self, old: &str, new: &str) {
        if old == new {
            return;
        }
        if let Some(set) = self.joints.remove(old) {
            self.joints.insert(new.to_string(), set);
        }
    }

    /// Rename several joints at once; joints missing from `names` keep
    /// their name. Swaps are fine.
    pub fn rename_joints(&mut self, names: &HashMap<String, String>) {
        self.joints = std::mem::take(&mut self.joints)
            .into_iter()
            .map(|(name, set)| match names.get(&name) {
                Some(new) => (new.clone(), set),
                None => (name, set),
            })
            .collect();
    }

    /// Key the current translation and rotation of every non-root joint at
    /// `frame`, creating curves where a joint had none.
    pub fn key_all_joints(&mut self, skeleton: &Skeleton, frame: i32) {
        let time = frame as f32;
        for joint in skeleton.joints().iter().skip(1) {
            let values: Vec<(Channel, f32)> = Channel::TRANSLATION
                .into_iter()
                .chain(Channel::ROTATION)
                .map(|channel| {
                    let value = self
                        .joints
                        .get(&joint.name)
                        .map_or(channel.rest_value(), |set| set.evaluate(channel, time));
                    (channel, value)
                })
                .collect();

            for (channel, value) in values {
                self.insert_key(&joint.name, channel, time, value);
            }
        }
    }
}
