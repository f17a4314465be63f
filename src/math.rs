//! Linear algebra primitives on top of glam.
//!
//! World space is right-handed with Z up. Rotations are unit quaternions;
//! scales are expected to be uniform wherever a transform gets inverted.

pub use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

fn default_scale() -> Vec3 {
    Vec3::ONE
}

/// Translation, rotation and scale, applied in scale → rotate → translate order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default)]
    pub rotation: Quat,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Compose `self ∘ child`: the child expressed in `self`'s space.
    #[inline]
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(child.translation),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }

    #[inline]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * (self.scale * vector)
    }

    /// Inverse transform. Exact for uniform scale.
    pub fn inverse(&self) -> Transform {
        let rotation = self.rotation.inverse();
        let scale = self.scale.recip();
        Transform {
            translation: -(scale * (rotation * self.translation)),
            rotation,
            scale,
        }
    }

    /// Approximate equality; rotations compare up to quaternion sign.
    pub fn abs_diff_eq(&self, other: &Transform, max_abs_diff: f32) -> bool {
        self.translation
            .abs_diff_eq(other.translation, max_abs_diff)
            && self.scale.abs_diff_eq(other.scale, max_abs_diff)
            && self.rotation.same_rotation(other.rotation, max_abs_diff)
    }
}

/// Quaternion helpers used by curve cleanup and motion extraction.
pub trait QuatExt {
    /// Rotation taking `self` to `other`, in `self`'s local frame: `self⁻¹ · other`.
    fn rotation_difference(self, other: Quat) -> Quat;

    /// Angle about world Z, taken from a Z·Y·X decomposition.
    fn yaw(self) -> f32;

    /// True when both quaternions encode the same rotation (q and -q are equal).
    fn same_rotation(self, other: Quat, max_abs_diff: f32) -> bool;

    /// Components in curve-channel order (w, x, y, z).
    fn to_wxyz(self) -> [f32; 4];

    fn from_wxyz(wxyz: [f32; 4]) -> Quat;
}

impl QuatExt for Quat {
    fn rotation_difference(self, other: Quat) -> Quat {
        (self.normalize().inverse() * other.normalize()).normalize()
    }

    fn yaw(self) -> f32 {
        let (z, _y, _x) = self.normalize().to_euler(EulerRot::ZYX);
        z
    }

    fn same_rotation(self, other: Quat, max_abs_diff: f32) -> bool {
        self.abs_diff_eq(other, max_abs_diff) || self.abs_diff_eq(-other, max_abs_diff)
    }

    #[inline]
    fn to_wxyz(self) -> [f32; 4] {
        [self.w, self.x, self.y, self.z]
    }

    #[inline]
    fn from_wxyz(wxyz: [f32; 4]) -> Quat {
        Quat::from_xyzw(wxyz[1], wxyz[2], wxyz[3], wxyz[0])
    }
}
