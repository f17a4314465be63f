//! Joint name tables shared by hip lookup, renaming and the correctives.

use serde::{Deserialize, Serialize};

/// Names tried, in order, when looking for the hip joint.
/// The configured hip name is tried after these.
pub const HIP_ALIASES: [&str; 6] = [
    "Hips",
    "mixamorig:Hips",
    "mixamorig_Hips",
    "Pelvis",
    "mixamorig:Pelvis",
    "mixamorig_Pelvis",
];

/// Name the skeleton root gets once the hip has been found.
pub const ROOT_NAME: &str = "root";

/// Mesh binding added when a scene has no mesh bound to the skeleton.
pub const BIND_PLACEHOLDER_NAME: &str = "binddummy";

/// Source name → Unreal mannequin name.
pub const UNREAL_NAMES: [(&str, &str); 41] = [
    ("Root", "Root"),
    ("Pelvis", "Pelvis"),
    ("spine_01", "spine_01"),
    ("spine_02", "spine_02"),
    ("spine_03", "spine_03"),
    ("clavicle_l", "clavicle_l"),
    ("UpperArm_L", "upperarm_l"),
    ("lowerarm_l", "lowerarm_l"),
    ("Hand_L", "hand_l"),
    ("clavicle_r", "clavicle_r"),
    ("UpperArm_R", "upperarm_r"),
    ("lowerarm_r", "lowerarm_r"),
    ("Hand_R", "hand_r"),
    ("neck_01", "neck_01"),
    ("head", "head"),
    ("Thigh_L", "thigh_l"),
    ("calf_l", "calf_l"),
    ("Foot_L", "foot_l"),
    ("Thigh_R", "thigh_r"),
    ("calf_r", "calf_r"),
    ("Foot_R", "foot_r"),
    ("indexFinger_01_l", "index_01_l"),
    ("indexFinger_02_l", "index_02_l"),
    ("indexFinger_03_l", "index_03_l"),
    ("finger_01_l", "middle_01_l"),
    ("finger_02_l", "middle_02_l"),
    ("finger_03_l", "middle_03_l"),
    ("thumb_01_l", "thumb_01_l"),
    ("thumb_02_l", "thumb_02_l"),
    ("thumb_03_l", "thumb_03_l"),
    ("indexFinger_01_r", "index_01_r"),
    ("indexFinger_02_r", "index_02_r"),
    ("indexFinger_03_r", "index_03_r"),
    ("finger_01_r", "middle_01_r"),
    ("finger_02_r", "middle_02_r"),
    ("finger_03_r", "middle_03_r"),
    ("thumb_01_r", "thumb_01_r"),
    ("thumb_02_r", "thumb_02_r"),
    ("thumb_03_r", "thumb_03_r"),
    ("ball_l", "ball_l"),
    ("ball_r", "ball_r"),
];

/// Strip everything up to and including the last `:` or `_`.
///
/// `mixamorig:Hips` becomes `Hips`. Note that underscores count too, so
/// `spine_01` becomes `01`.
pub fn remove_namespace(name: &str) -> &str {
    match name.rfind(|c: char| c == ':' || c == '_') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

pub fn unreal_name(name: &str) -> Option<&'static str> {
    UNREAL_NAMES
        .iter()
        .find(|(source, _)| *source == name)
        .map(|(_, target)| *target)
}

/// Naming convention of the rig being converted. Picks the default joints
/// for the knee and foot correctives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointNaming {
    #[default]
    Mixamo,
    Unreal,
}

impl JointNaming {
    pub const fn knee_joints(self) -> &'static [&'static str] {
        match self {
            JointNaming::Mixamo => &["RightUpLeg", "LeftUpLeg"],
            JointNaming::Unreal => &["calf_r", "calf_l"],
        }
    }

    pub const fn foot_joints(self) -> &'static [&'static str] {
        match self {
            JointNaming::Mixamo => &["RightToeBase", "LeftToeBase"],
            JointNaming::Unreal => &["ball_r", "ball_l"],
        }
    }
}

/// Renaming applied to a scene's joints before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoneRenaming {
    Keep,
    #[default]
    StripNamespace,
    Unreal,
}

impl BoneRenaming {
    /// New name for `name`. Unreal renaming keeps names missing from the table.
    pub fn apply(self, name: &str) -> String {
        match self {
            BoneRenaming::Keep => name.to_string(),
            BoneRenaming::StripNamespace => remove_namespace(name).to_string(),
            BoneRenaming::Unreal => {
                let stripped = remove_namespace(name);
                match unreal_name(stripped) {
                    Some(target) => target.to_string(),
                    None => {
                        log::warn!("joint '{}' has no Unreal name, keeping it", stripped);
                        stripped.to_string()
                    }
                }
            }
        }
    }

    /// Naming convention the renamed rig follows
    pub const fn naming(self) -> JointNaming {
        match self {
            BoneRenaming::Unreal => JointNaming::Unreal,
            _ => JointNaming::Mixamo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[test]
    #[wasm_bindgen_test]
    fn test_remove_namespace() {
        assert_eq!(remove_namespace("mixamorig:Hips"), "Hips");
        assert_eq!(remove_namespace("mixamorig_LeftUpLeg"), "LeftUpLeg");
        assert_eq!(remove_namespace("a:b:Spine"), "Spine");
        assert_eq!(remove_namespace("Hips"), "Hips");
        assert_eq!(remove_namespace("trailing:"), "");
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_unreal_table() {
        assert_eq!(unreal_name("UpperArm_L"), Some("upperarm_l"));
        assert_eq!(unreal_name("finger_02_r"), Some("middle_02_r"));
        assert_eq!(unreal_name("Hips"), None);
    }

    #[test]
    fn test_renaming_modes() {
        assert_eq!(BoneRenaming::Keep.apply("mixamorig:Hips"), "mixamorig:Hips");
        assert_eq!(BoneRenaming::StripNamespace.apply("mixamorig:Hips"), "Hips");
        assert_eq!(BoneRenaming::Unreal.apply("rig:Pelvis"), "Pelvis");
        assert_eq!(BoneRenaming::Unreal.apply("rig:Spine"), "Spine");
    }

    #[test]
    fn test_default_corrective_joints() {
        assert_eq!(JointNaming::Mixamo.knee_joints(), &["RightUpLeg", "LeftUpLeg"]);
        assert_eq!(JointNaming::Unreal.foot_joints(), &["ball_r", "ball_l"]);
        assert_eq!(BoneRenaming::Unreal.naming(), JointNaming::Unreal);
    }
}
