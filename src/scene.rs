use crate::animation::AnimationClip;
use crate::error::Result;
use crate::joint_names::{BoneRenaming, BIND_PLACEHOLDER_NAME};
use crate::skeleton::{JointId, Skeleton};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A mesh as far as binding is concerned: which armature deforms it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshBinding {
    pub name: String,
    /// Name of the root joint of the skeleton that deforms the mesh
    #[serde(default)]
    pub armature: Option<String>,
    /// Added by the bind fix, carries no geometry
    #[serde(default)]
    pub placeholder: bool,
}

/// Interchange document: one skeleton, its clip and the meshes around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub skeleton: Skeleton,
    pub clip: AnimationClip,
    #[serde(default)]
    pub meshes: Vec<MeshBinding>,
}

impl Scene {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rename one joint along with its curves and the mesh bindings that
    /// point at it.
    pub fn rename_joint(&mut self, id: JointId, name: &str) -> Result<()> {
        let old = self.skeleton.joint(id).name.clone();
        if old == name {
            return Ok(());
        }
        self.skeleton.rename(id, name)?;
        self.clip.curves.rename_joint(&old, name);
        for mesh in &mut self.meshes {
            if mesh.armature.as_deref() == Some(old.as_str()) {
                mesh.armature = Some(name.to_string());
            }
        }
        Ok(())
    }

    /// Rename every joint with `rename`. Two joints ending up with the same
    /// name is an error and leaves the scene as it was.
    pub fn rename_joints(&mut self, rename: impl Fn(&str) -> String) -> Result<()> {
        let mut joints = self.skeleton.joints().to_vec();
        let mut names = HashMap::with_capacity(joints.len());
        for joint in &mut joints {
            let new = rename(&joint.name);
            if new != joint.name {
                names.insert(joint.name.clone(), new.clone());
                joint.name = new;
            }
        }
        if names.is_empty() {
            return Ok(());
        }

        self.skeleton = Skeleton::new(joints)?;
        self.clip.curves.rename_joints(&names);
        for mesh in &mut self.meshes {
            if let Some(new) = mesh.armature.as_ref().and_then(|a| names.get(a)) {
                mesh.armature = Some(new.clone());
            }
        }
        log::debug!("renamed {} joints", names.len());
        Ok(())
    }

    pub fn apply_renaming(&mut self, renaming: BoneRenaming) -> Result<()> {
        match renaming {
            BoneRenaming::Keep => Ok(()),
            _ => self.rename_joints(|name| renaming.apply(name)),
        }
    }

    /// Meshes deformed by this scene's skeleton
    pub fn bound_meshes(&self) -> impl Iterator<Item = &MeshBinding> {
        let root = self.skeleton.root().name.as_str();
        self.meshes
            .iter()
            .filter(move |m| m.armature.as_deref() == Some(root))
    }

    /// Bind a placeholder mesh when nothing is bound to the skeleton, so
    /// exporters keep the armature. Returns whether one was added.
    pub fn fix_bind(&mut self) -> bool {
        if self.bound_meshes().next().is_some() {
            return false;
        }
        self.meshes.push(MeshBinding {
            name: BIND_PLACEHOLDER_NAME.to_string(),
            armature: Some(self.skeleton.root().name.clone()),
            placeholder: true,
        });
        true
    }
}
