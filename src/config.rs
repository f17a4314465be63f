use crate::joint_names::JointNaming;
use crate::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Options of the quaternion continuity fixer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// Undo near-half-turn jumps between neighbouring frames
    pub prevent_flips: bool,
    /// Negate quaternions whose sign swapped between neighbouring frames
    pub prevent_inverts: bool,
    /// A jump counts as a flip when its angle is within this of π (radians)
    pub flip_window: f32,
    /// Summed component change above which a sign swap is suspected
    pub invert_threshold: f32,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            prevent_flips: true,
            prevent_inverts: true,
            flip_window: 0.5,
            invert_threshold: 1.0,
        }
    }
}

/// Settings of one conversion. Built once per batch and shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig {
    /// Copy the hip's world X onto the root
    pub use_x: bool,
    /// Copy the hip's world Y onto the root
    pub use_y: bool,
    /// Copy the hip's world Z onto the root
    pub use_z: bool,
    /// Keep the root at or above the ground (needs `use_z`)
    pub on_ground: bool,
    /// Copy the hip's yaw onto the root
    pub use_rotation: bool,
    /// Uniform factor multiplied into the root's scale
    pub scale: f32,
    /// World-space translation added to the rest pose of every joint
    pub rest_offset: Vec3,
    /// Extra hip name tried after the built-in aliases
    pub hip_name: String,
    /// Bind a placeholder mesh when none is bound
    pub fix_bind: bool,
    /// Fold the root's rest rotation into its descendants
    pub apply_rotation: bool,
    /// Fold the root's rest scale into its descendants
    pub apply_scale: bool,
    pub quaternion_clean_pre: bool,
    pub quaternion_clean_post: bool,
    /// Roll the foot joints by half a turn
    pub foot_bone_workaround: bool,
    /// World offset moved onto the knee tails after conversion
    pub knee_offset: Vec3,
    pub joint_naming: JointNaming,
    /// Overrides the naming's default knee joints
    pub knee_joints: Option<Vec<String>>,
    /// Overrides the naming's default foot joints
    pub foot_joints: Option<Vec<String>>,
    pub cleanup: CleanupOptions,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            use_x: true,
            use_y: true,
            use_z: true,
            on_ground: true,
            use_rotation: true,
            scale: 1.0,
            rest_offset: Vec3::ZERO,
            hip_name: String::new(),
            fix_bind: true,
            apply_rotation: true,
            apply_scale: false,
            quaternion_clean_pre: true,
            quaternion_clean_post: true,
            foot_bone_workaround: false,
            knee_offset: Vec3::ZERO,
            joint_naming: JointNaming::default(),
            knee_joints: None,
            foot_joints: None,
            cleanup: CleanupOptions::default(),
        }
    }
}

impl RetargetConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Joints whose tails the knee fix moves
    pub fn knee_joint_names(&self) -> Vec<String> {
        match &self.knee_joints {
            Some(names) => names.clone(),
            None => to_owned(self.joint_naming.knee_joints()),
        }
    }

    /// Joints the foot workaround rolls
    pub fn foot_joint_names(&self) -> Vec<String> {
        match &self.foot_joints {
            Some(names) => names.clone(),
            None => to_owned(self.joint_naming.foot_joints()),
        }
    }
}

fn to_owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
