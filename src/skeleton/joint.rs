use crate::math::Transform;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Index of a joint in its [`Skeleton`](super::Skeleton).
/// Parents always have a smaller id than their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointId(pub usize);

impl JointId {
    /// The single root joint
    pub const ROOT: JointId = JointId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

fn default_tail() -> Vec3 {
    Vec3::Y
}

/// One joint of the rig in its rest (edit) pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub name: String,
    #[serde(default)]
    pub parent: Option<JointId>,
    /// Rest transform relative to the parent
    #[serde(default)]
    pub rest: Transform,
    /// End point of the bone in its own rest frame
    #[serde(default = "default_tail")]
    pub tail: Vec3,
    /// Twist about the head→tail axis, radians
    #[serde(default)]
    pub roll: f32,
    /// Head sits on the parent's tail
    #[serde(default)]
    pub connected: bool,
}

impl Joint {
    pub fn new(name: impl Into<String>, parent: Option<JointId>, rest: Transform) -> Self {
        Self {
            name: name.into(),
            parent,
            rest,
            tail: default_tail(),
            roll: 0.0,
            connected: false,
        }
    }

    /// Rest transform with the roll folded into the rotation.
    pub fn rest_local(&self) -> Transform {
        if self.roll == 0.0 {
            return self.rest;
        }
        let axis = self.tail.normalize_or_zero();
        if axis == Vec3::ZERO {
            return self.rest;
        }
        Transform {
            rotation: (self.rest.rotation * Quat::from_axis_angle(axis, self.roll)).normalize(),
            ..self.rest
        }
    }
}
