//! Joint hierarchy in rest pose and forward kinematics over it.

mod joint;
mod pose;

pub use joint::{Joint, JointId};

use crate::error::{RetargetError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Joints in topological order: index 0 is the only root and every parent
/// precedes its children. Names are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Joint>", into = "Vec<Joint>")]
pub struct Skeleton {
    joints: Vec<Joint>,
}

impl TryFrom<Vec<Joint>> for Skeleton {
    type Error = RetargetError;

    fn try_from(joints: Vec<Joint>) -> Result<Self> {
        Self::new(joints)
    }
}

impl From<Skeleton> for Vec<Joint> {
    fn from(skeleton: Skeleton) -> Self {
        skeleton.joints
    }
}

impl Skeleton {
    pub fn new(joints: Vec<Joint>) -> Result<Self> {
        if joints.is_empty() {
            return Err(RetargetError::InvalidSkeleton("no joints".into()));
        }

        let mut names = HashSet::with_capacity(joints.len());
        for (index, joint) in joints.iter().enumerate() {
            if !names.insert(joint.name.as_str()) {
                return Err(RetargetError::InvalidSkeleton(format!(
                    "duplicate joint name '{}'",
                    joint.name
                )));
            }
            match (index, joint.parent) {
                (0, None) => {}
                (0, Some(_)) => {
                    return Err(RetargetError::InvalidSkeleton(format!(
                        "first joint '{}' must be the root",
                        joint.name
                    )))
                }
                (_, None) => {
                    return Err(RetargetError::InvalidSkeleton(format!(
                        "second root '{}'",
                        joint.name
                    )))
                }
                (_, Some(parent)) if parent.index() >= index => {
                    return Err(RetargetError::InvalidSkeleton(format!(
                        "parent of '{}' does not precede it",
                        joint.name
                    )))
                }
                _ => {}
            }
        }

        Ok(Self { joints })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    #[inline]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[inline]
    pub fn root(&self) -> &Joint {
        &self.joints[JointId::ROOT.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = JointId> {
        (0..self.joints.len()).map(JointId)
    }

    pub fn get(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id.index())
    }

    /// Panics on an id from another skeleton.
    #[inline]
    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.index()]
    }

    #[inline]
    pub fn joint_mut(&mut self, id: JointId) -> &mut Joint {
        &mut self.joints[id.index()]
    }

    pub fn find(&self, name: &str) -> Option<JointId> {
        self.joints.iter().position(|j| j.name == name).map(JointId)
    }

    /// Like [`find`](Self::find), but a missing joint is an error.
    pub fn require(&self, name: &str) -> Result<JointId> {
        self.find(name)
            .ok_or_else(|| RetargetError::UnknownJoint(name.to_string()))
    }

    /// Direct children of `id`
    pub fn children(&self, id: JointId) -> impl Iterator<Item = JointId> + '_ {
        self.joints
            .iter()
            .enumerate()
            .skip(id.index() + 1)
            .filter(move |(_, j)| j.parent == Some(id))
            .map(|(index, _)| JointId(index))
    }

    /// True when `ancestor` lies on the parent chain of `id` (or is `id`).
    pub fn is_descendant(&self, id: JointId, ancestor: JointId) -> bool {
        let mut current = Some(id);
        while let Some(joint) = current {
            if joint == ancestor {
                return true;
            }
            current = self.joints[joint.index()].parent;
        }
        false
    }

    /// Rename a joint. Fails if another joint already has the name.
    pub fn rename(&mut self, id: JointId, name: &str) -> Result<()> {
        if let Some(existing) = self.find(name) {
            if existing != id {
                return Err(RetargetError::InvalidSkeleton(format!(
                    "joint name '{}' already in use",
                    name
                )));
            }
            return Ok(());
        }
        self.joints[id.index()].name = name.to_string();
        Ok(())
    }
}
