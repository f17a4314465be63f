use super::{JointId, Skeleton};
use crate::curve::CurveStore;
use crate::math::Transform;

impl Skeleton {
    /// World transform of `id` at `time`:
    /// `world(parent) ∘ rest_local(id) ∘ anim(id, time)`.
    pub fn world_transform(&self, curves: &CurveStore, id: JointId, time: f32) -> Transform {
        let joint = self.joint(id);
        let local = joint
            .rest_local()
            .mul_transform(&curves.sample_local(&joint.name, time));

        match joint.parent {
            Some(parent) => self
                .world_transform(curves, parent, time)
                .mul_transform(&local),
            None => local,
        }
    }

    /// World transform of `id` with no animation applied.
    pub fn rest_world(&self, id: JointId) -> Transform {
        let joint = self.joint(id);
        match joint.parent {
            Some(parent) => self.rest_world(parent).mul_transform(&joint.rest_local()),
            None => joint.rest_local(),
        }
    }

    /// World transform of the space `id`'s local channels live in:
    /// `world(parent) ∘ rest_local(id)`.
    pub fn channel_space(&self, curves: &CurveStore, id: JointId, time: f32) -> Transform {
        let joint = self.joint(id);
        match joint.parent {
            Some(parent) => self
                .world_transform(curves, parent, time)
                .mul_transform(&joint.rest_local()),
            None => joint.rest_local(),
        }
    }

    /// World transforms of every joint at `time`, indexed by [`JointId`].
    /// One pass in topological order.
    pub fn world_transforms(&self, curves: &CurveStore, time: f32) -> Vec<Transform> {
        let mut world: Vec<Transform> = Vec::with_capacity(self.len());
        for joint in self.joints() {
            let local = joint
                .rest_local()
                .mul_transform(&curves.sample_local(&joint.name, time));
            let transform = match joint.parent {
                Some(parent) => world[parent.index()].mul_transform(&local),
                None => local,
            };
            world.push(transform);
        }
        world
    }
}
