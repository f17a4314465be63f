//! Hip-to-root conversion, one stage at a time.
//!
//! [`convert`] returns a [`Conversion`], a pull-driven stream of [`Status`]
//! values. Every call to `next` runs exactly one stage to completion; a
//! stage's changes to the scene are committed by the time its status is
//! returned. The stream ends after [`Stage::Done`] or after the first error.

use crate::bake::{
    bake, bake_world_onto_joint, ensure_common_domain, RotationMask, SourceExpr, TransformCurves,
};
use crate::bind_pose::{
    apply_foot_roll_fix, apply_knee_fix, apply_rest_offset, apply_root_transform,
    apply_scale_factor,
};
use crate::config::RetargetConfig;
use crate::error::{RetargetError, Result};
use crate::joint_names::{HIP_ALIASES, ROOT_NAME};
use crate::math::Transform;
use crate::quat_cleanup::{cleanup_all, cleanup_joint};
use crate::scene::Scene;
use crate::skeleton::{JointId, Skeleton};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;

/// Conversion stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    HipLocated,
    Scaled,
    PreCleaned,
    RestOffsetApplied,
    RootBakerBuilt,
    HipsBakerBuilt,
    RootApplied,
    HipsApplied,
    PostCleaned,
    HelpersDestroyed,
    BindFixed,
    Done,
}

impl Stage {
    pub const COUNT: usize = 13;

    pub const ALL: [Stage; Self::COUNT] = [
        Stage::Init,
        Stage::HipLocated,
        Stage::Scaled,
        Stage::PreCleaned,
        Stage::RestOffsetApplied,
        Stage::RootBakerBuilt,
        Stage::HipsBakerBuilt,
        Stage::RootApplied,
        Stage::HipsApplied,
        Stage::PostCleaned,
        Stage::HelpersDestroyed,
        Stage::BindFixed,
        Stage::Done,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stage after this one; `None` after `Done`
    pub fn next(self) -> Option<Stage> {
        Self::ALL.get(self.index() + 1).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Progress,
    /// The stage had nothing to do under the current config
    Skipped,
}

/// Report of one finished stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub stage: Stage,
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    fn progress(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind: StatusKind::Progress,
            message: message.into(),
        }
    }

    fn skipped(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind: StatusKind::Skipped,
            message: message.into(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StatusKind::Progress => write!(f, "{:?}: {}", self.stage, self.message),
            StatusKind::Skipped => write!(f, "{:?} (skipped): {}", self.stage, self.message),
        }
    }
}

/// Find the hip: the built-in aliases first, then `extra` if non-empty.
pub fn locate_hip(skeleton: &Skeleton, extra: &str) -> Result<JointId> {
    let mut searched: Vec<String> = HIP_ALIASES.iter().map(|s| s.to_string()).collect();
    if !extra.is_empty() {
        searched.push(extra.to_string());
    }

    searched
        .iter()
        .find_map(|name| skeleton.find(name))
        .ok_or(RetargetError::MissingRootJoint { searched })
}

/// Start converting `scene`. Nothing happens until the stream is advanced.
pub fn convert<'a>(scene: &'a mut Scene, config: &'a RetargetConfig) -> Conversion<'a> {
    Conversion {
        scene,
        config,
        next_stage: Some(Stage::Init),
        hip: None,
        root_baker: None,
        hips_baker: None,
    }
}

/// Run every stage, returning the statuses in order.
pub fn run(scene: &mut Scene, config: &RetargetConfig) -> Result<Vec<Status>> {
    convert(scene, config).collect()
}

/// [`run`], followed by the knee fix when a knee offset is configured.
pub fn retarget(scene: &mut Scene, config: &RetargetConfig) -> Result<Vec<Status>> {
    let statuses = run(scene, config)?;
    if config.knee_offset != Vec3::ZERO {
        apply_knee_fix(
            &mut scene.skeleton,
            config.knee_offset,
            &config.knee_joint_names(),
        )?;
        log::info!("knee fix applied with offset {:?}", config.knee_offset);
    }
    Ok(statuses)
}

/// Lazy conversion of one scene. See the module docs.
pub struct Conversion<'a> {
    scene: &'a mut Scene,
    config: &'a RetargetConfig,
    next_stage: Option<Stage>,
    hip: Option<JointId>,
    root_baker: Option<TransformCurves>,
    hips_baker: Option<TransformCurves>,
}

impl Iterator for Conversion<'_> {
    type Item = Result<Status>;

    fn next(&mut self) -> Option<Self::Item> {
        let stage = self.next_stage?;
        let result = self.run_stage(stage);
        match &result {
            Ok(status) => {
                log::info!("{}", status);
                self.next_stage = stage.next();
            }
            Err(err) => {
                log::warn!(
                    "conversion of '{}' failed at {:?}: {}",
                    self.scene.clip.name,
                    stage,
                    err
                );
                self.next_stage = None;
            }
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next_stage {
            Some(stage) => (0, Some(Stage::COUNT - stage.index())),
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for Conversion<'_> {}

impl Conversion<'_> {
    /// Stage the next call to `next` runs
    pub fn pending_stage(&self) -> Option<Stage> {
        self.next_stage
    }

    fn run_stage(&mut self, stage: Stage) -> Result<Status> {
        match stage {
            Stage::Init => self.init(),
            Stage::HipLocated => self.locate(),
            Stage::Scaled => self.scale(),
            Stage::PreCleaned => self.clean(stage, self.config.quaternion_clean_pre),
            Stage::RestOffsetApplied => self.rest_offset(),
            Stage::RootBakerBuilt => {
                self.root_baker = Some(self.build_root_baker()?);
                Ok(Status::progress(stage, "root motion sampled from the hip"))
            }
            Stage::HipsBakerBuilt => {
                self.hips_baker = Some(self.build_hips_baker()?);
                Ok(Status::progress(stage, "hip world motion sampled"))
            }
            Stage::RootApplied => self.apply_root(),
            Stage::HipsApplied => self.apply_hips(),
            Stage::PostCleaned => self.clean(stage, self.config.quaternion_clean_post),
            Stage::HelpersDestroyed => {
                self.root_baker = None;
                self.hips_baker = None;
                Ok(Status::progress(stage, "helper curves dropped"))
            }
            Stage::BindFixed => self.fix_bind(),
            Stage::Done => Ok(Status::progress(
                stage,
                format!("'{}' converted", self.scene.clip.name),
            )),
        }
    }

    fn hip(&self) -> Result<JointId> {
        match self.hip {
            Some(hip) => Ok(hip),
            None => locate_hip(&self.scene.skeleton, &self.config.hip_name),
        }
    }

    fn init(&mut self) -> Result<Status> {
        ensure_common_domain(&self.scene.clip)?;
        let range = self.scene.clip.frame_range;
        Ok(Status::progress(
            Stage::Init,
            format!(
                "converting '{}', frames {}..={}",
                self.scene.clip.name, range.start, range.end
            ),
        ))
    }

    fn locate(&mut self) -> Result<Status> {
        let hip = locate_hip(&self.scene.skeleton, &self.config.hip_name)?;
        if hip == JointId::ROOT {
            return Err(RetargetError::InvalidSkeleton(
                "the hip is the skeleton root, there is no joint to carry root motion".into(),
            ));
        }

        self.scene.rename_joint(JointId::ROOT, ROOT_NAME)?;
        let Scene { skeleton, clip, .. } = &mut *self.scene;
        clip.key_all_joints(skeleton);
        self.hip = Some(hip);

        Ok(Status::progress(
            Stage::HipLocated,
            format!("hip joint '{}'", self.scene.skeleton.joint(hip).name),
        ))
    }

    fn scale(&mut self) -> Result<Status> {
        let factor = self.config.scale;
        if factor == 1.0 {
            return Ok(Status::skipped(Stage::Scaled, "scale factor is 1"));
        }
        let Scene { skeleton, clip, .. } = &mut *self.scene;
        apply_scale_factor(skeleton, &mut clip.curves, JointId::ROOT, factor);
        Ok(Status::progress(Stage::Scaled, format!("root scaled by {}", factor)))
    }

    fn clean(&mut self, stage: Stage, enabled: bool) -> Result<Status> {
        if !enabled {
            return Ok(Status::skipped(stage, "quaternion cleanup disabled"));
        }
        let count = cleanup_all(&mut self.scene.clip.curves, &self.config.cleanup)?;
        Ok(Status::progress(
            stage,
            format!("{} rotation groups cleaned", count),
        ))
    }

    fn rest_offset(&mut self) -> Result<Status> {
        let hip = self.hip()?;
        let config = self.config;
        let Scene { skeleton, clip, .. } = &mut *self.scene;

        if config.foot_bone_workaround {
            apply_foot_roll_fix(skeleton, &config.foot_joint_names())?;
        }
        apply_rest_offset(
            skeleton,
            &mut clip.curves,
            JointId::ROOT,
            hip,
            config.rest_offset,
            clip.frame_range.start,
        )?;

        Ok(Status::progress(
            Stage::RestOffsetApplied,
            format!("rest offset {:?}", config.rest_offset),
        ))
    }

    /// Hip motion reduced to what the root should carry: masked world
    /// translation, lifted so the rest pose stands at zero when grounded,
    /// and the hip's yaw.
    fn root_expr(&self, hip: JointId) -> SourceExpr {
        let config = self.config;
        let grounded = config.use_z && config.on_ground;
        let rest_z = self.scene.skeleton.rest_world(hip).translation.z;

        SourceExpr {
            joint: hip,
            translation: [config.use_x, config.use_y, config.use_z],
            rotation: if config.use_rotation {
                RotationMask::Yaw
            } else {
                RotationMask::None
            },
            offset: if grounded {
                Vec3::new(0.0, 0.0, -rest_z)
            } else {
                Vec3::ZERO
            },
            min_z: grounded.then_some(0.0),
        }
    }

    fn build_root_baker(&self) -> Result<TransformCurves> {
        let expr = self.root_expr(self.hip()?);
        let mut baked = bake(&self.scene.skeleton, &self.scene.clip, &expr)?;
        baked.cleanup("rootbaker", &self.config.cleanup)?;
        Ok(baked)
    }

    fn build_hips_baker(&self) -> Result<TransformCurves> {
        let expr = SourceExpr::world_of(self.hip()?);
        let mut baked = bake(&self.scene.skeleton, &self.scene.clip, &expr)?;
        baked.cleanup("hipsbaker", &self.config.cleanup)?;
        Ok(baked)
    }

    fn apply_root(&mut self) -> Result<Status> {
        let root_motion = match self.root_baker.take() {
            Some(baked) => baked,
            None => self.build_root_baker()?,
        };
        let config = self.config;
        let Scene { skeleton, clip, .. } = &mut *self.scene;

        if config.apply_rotation || config.apply_scale {
            apply_root_transform(
                skeleton,
                &mut clip.curves,
                JointId::ROOT,
                config.apply_rotation,
                config.apply_scale,
            )?;
        }

        bake_world_onto_joint(skeleton, clip, JointId::ROOT, |frame, own| {
            let target = root_motion.sample(frame);
            Transform {
                translation: target.translation,
                rotation: (target.rotation * own.rotation).normalize(),
                scale: own.scale,
            }
        })?;
        let root_name = skeleton.root().name.clone();
        cleanup_joint(&mut clip.curves, &root_name, &config.cleanup)?;

        self.root_baker = Some(root_motion);
        Ok(Status::progress(Stage::RootApplied, "root motion baked onto the root"))
    }

    fn apply_hips(&mut self) -> Result<Status> {
        let hip = self.hip()?;
        let hip_world = match self.hips_baker.take() {
            Some(baked) => baked,
            None => self.build_hips_baker()?,
        };
        let Scene { skeleton, clip, .. } = &mut *self.scene;

        bake_world_onto_joint(skeleton, clip, hip, |frame, own| {
            let target = hip_world.sample(frame);
            Transform {
                translation: target.translation,
                rotation: target.rotation,
                scale: own.scale,
            }
        })?;

        self.hips_baker = Some(hip_world);
        Ok(Status::progress(
            Stage::HipsApplied,
            "hip rebaked under the moving root",
        ))
    }

    fn fix_bind(&mut self) -> Result<Status> {
        if !self.config.fix_bind {
            return Ok(Status::skipped(Stage::BindFixed, "bind fix disabled"));
        }
        if self.scene.fix_bind() {
            Ok(Status::progress(Stage::BindFixed, "placeholder mesh bound"))
        } else {
            Ok(Status::skipped(Stage::BindFixed, "a mesh is already bound"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationClip, FrameRange};
    use crate::curve::{Channel, Curve, CurveStore};
    use crate::math::QuatExt;
    use crate::scene::MeshBinding;
    use crate::skeleton::Joint;
    use glam::Quat;
    use wasm_bindgen_test::*;

    fn key_transform(curves: &mut CurveStore, joint: &str, frame: i32, t: Transform) {
        let time = frame as f32;
        for (channel, value) in Channel::TRANSLATION.into_iter().zip(t.translation.to_array()) {
            curves.insert_key(joint, channel, time, value);
        }
        for (channel, value) in Channel::ROTATION.into_iter().zip(t.rotation.to_wxyz()) {
            curves.insert_key(joint, channel, time, value);
        }
    }

    /// Armature > Hips > Spine, the hip standing 1 m up, walking along Y
    /// while bobbing, crouching below rest height and turning.
    fn walking_scene() -> Scene {
        let skeleton = Skeleton::new(vec![
            Joint::new("Armature", None, Transform::IDENTITY),
            Joint::new(
                "mixamorig:Hips",
                Some(JointId(0)),
                Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
            ),
            Joint::new(
                "mixamorig:Spine",
                Some(JointId(1)),
                Transform::from_translation(Vec3::new(0.0, 0.0, 0.3)),
            ),
        ])
        .unwrap();

        let mut clip = AnimationClip::new("walk", FrameRange::new(1, 24));
        for frame in 1..=24 {
            let f = frame as f32;
            let hip = Transform {
                translation: Vec3::new(0.02 * f, 0.1 * f, 0.1 * (f * 0.5).sin() - 0.05),
                rotation: Quat::from_rotation_z(0.05 * f)
                    * Quat::from_rotation_x(0.1 * (f * 0.3).sin()),
                scale: Vec3::ONE,
            };
            key_transform(&mut clip.curves, "mixamorig:Hips", frame, hip);
            key_transform(
                &mut clip.curves,
                "mixamorig:Spine",
                frame,
                Transform::from_rotation(Quat::from_rotation_y(0.02 * f)),
            );
        }

        Scene {
            skeleton,
            clip,
            meshes: Vec::new(),
        }
    }

    fn hip_world(scene: &Scene, frame: i32) -> Transform {
        let hip = locate_hip(&scene.skeleton, "").unwrap();
        scene
            .skeleton
            .world_transform(&scene.clip.curves, hip, frame as f32)
    }

    #[test]
    fn test_stages_run_in_order() {
        let mut scene = walking_scene();
        let statuses = run(&mut scene, &RetargetConfig::default()).unwrap();
        let stages: Vec<Stage> = statuses.iter().map(|s| s.stage).collect();
        assert_eq!(stages, Stage::ALL.to_vec());
        assert_eq!(statuses[Stage::Scaled.index()].kind, StatusKind::Skipped);
        assert_eq!(statuses[Stage::BindFixed.index()].kind, StatusKind::Progress);
        assert_eq!(scene.skeleton.root().name, ROOT_NAME);
    }

    #[test]
    fn test_conversion_is_lazy_and_fused() {
        let mut scene = walking_scene();
        let before = scene.clone();
        let config = RetargetConfig::default();
        {
            let mut conversion = convert(&mut scene, &config);
            assert_eq!(conversion.pending_stage(), Some(Stage::Init));
            let first = conversion.next().unwrap().unwrap();
            assert_eq!(first.stage, Stage::Init);
            assert_eq!(conversion.pending_stage(), Some(Stage::HipLocated));
        }
        // Only Init ran, and it does not touch the scene
        assert_eq!(scene, before);

        let mut conversion = convert(&mut scene, &config);
        assert_eq!(conversion.by_ref().count(), Stage::COUNT);
        assert!(conversion.next().is_none());
    }

    #[test]
    fn test_recomposition_identity() {
        let mut scene = walking_scene();
        let before: Vec<Transform> = (1..=24).map(|f| hip_world(&scene, f)).collect();

        run(&mut scene, &RetargetConfig::default()).unwrap();

        let hip = scene.skeleton.find("mixamorig:Hips").unwrap();
        for (i, frame) in (1..=24).enumerate() {
            let time = frame as f32;
            let root = scene.skeleton.world_transform(&scene.clip.curves, JointId::ROOT, time);
            let local = scene.skeleton.joint(hip).rest_local().mul_transform(
                &scene.clip.curves.sample_local("mixamorig:Hips", time),
            );
            let recomposed = root.mul_transform(&local);
            assert!(
                recomposed.abs_diff_eq(&before[i], 1e-4),
                "frame {}: {:?} != {:?}",
                frame,
                recomposed,
                before[i]
            );
        }
    }

    #[test]
    fn test_root_carries_ground_motion_and_yaw() {
        let mut scene = walking_scene();
        let before: Vec<Transform> = (1..=24).map(|f| hip_world(&scene, f)).collect();
        run(&mut scene, &RetargetConfig::default()).unwrap();

        for (i, frame) in (1..=24).enumerate() {
            let root = scene
                .skeleton
                .world_transform(&scene.clip.curves, JointId::ROOT, frame as f32);
            assert!((root.translation.x - before[i].translation.x).abs() < 1e-4);
            assert!((root.translation.y - before[i].translation.y).abs() < 1e-4);
            // Ground clamp: never below zero, otherwise height above rest
            let lift = before[i].translation.z - 1.0;
            assert!(root.translation.z >= 0.0);
            assert!((root.translation.z - lift.max(0.0)).abs() < 1e-4);
            assert!((root.rotation.yaw() - before[i].rotation.yaw()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ground_clamp_with_rest_offset() {
        let mut scene = walking_scene();
        let config = RetargetConfig {
            rest_offset: Vec3::new(0.0, 0.0, -0.2),
            ..Default::default()
        };
        run(&mut scene, &config).unwrap();
        for frame in 1..=24 {
            let root = scene
                .skeleton
                .world_transform(&scene.clip.curves, JointId::ROOT, frame as f32);
            assert!(root.translation.z >= 0.0, "frame {}", frame);
        }
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_scenario_root_takes_hip_translation() {
        let skeleton = Skeleton::new(vec![
            Joint::new("Armature", None, Transform::IDENTITY),
            Joint::new("Hips", Some(JointId(0)), Transform::IDENTITY),
        ])
        .unwrap();
        let mut clip = AnimationClip::new("slide", FrameRange::new(0, 2));
        for (frame, y) in [(0, 0.0), (1, 5.0), (2, 10.0)] {
            clip.curves.insert_key("Hips", Channel::TranslationY, frame as f32, y);
        }
        let mut scene = Scene {
            skeleton,
            clip,
            meshes: Vec::new(),
        };
        let config = RetargetConfig {
            use_y: true,
            use_z: false,
            on_ground: false,
            ..Default::default()
        };

        run(&mut scene, &config).unwrap();

        let root_y = scene.clip.curves.get_curve("root", Channel::TranslationY).unwrap();
        let keys: Vec<(f32, f32)> = root_y.keyframes().iter().map(|k| (k.time, k.value)).collect();
        assert_eq!(keys.len(), 3);
        for ((time, value), (et, ev)) in keys.iter().zip([(0.0, 0.0), (1.0, 5.0), (2.0, 10.0)]) {
            assert_eq!(*time, et);
            assert!((value - ev).abs() < 1e-5);
        }

        let hip_y = scene.clip.curves.get_curve("Hips", Channel::TranslationY).unwrap();
        for frame in 0..=2 {
            assert!(hip_y.evaluate(frame as f32).abs() < 1e-5);
        }
    }

    #[test]
    #[wasm_bindgen_test]
    fn test_scenario_missing_hip_fails_untouched() {
        let skeleton = Skeleton::new(vec![
            Joint::new("Armature", None, Transform::IDENTITY),
            Joint::new("Torso", Some(JointId(0)), Transform::IDENTITY),
        ])
        .unwrap();
        let mut clip = AnimationClip::new("idle", FrameRange::new(0, 1));
        clip.curves.insert_key("Torso", Channel::TranslationX, 0.0, 1.0);
        let mut scene = Scene {
            skeleton,
            clip,
            meshes: Vec::new(),
        };
        let before = scene.clone();

        let config = RetargetConfig::default();
        let results: Vec<Result<Status>> = convert(&mut scene, &config).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(RetargetError::MissingRootJoint { searched }) => {
                assert_eq!(searched.len(), HIP_ALIASES.len());
            }
            other => panic!("expected MissingRootJoint, got {:?}", other),
        }
        assert_eq!(scene, before);
    }

    #[test]
    fn test_configured_hip_name() {
        let mut scene = walking_scene();
        scene
            .rename_joints(|name| name.replace("mixamorig:Hips", "CC_Base_Hip"))
            .unwrap();
        assert!(run(&mut scene, &RetargetConfig::default()).is_err());

        let mut scene = walking_scene();
        scene
            .rename_joints(|name| name.replace("mixamorig:Hips", "CC_Base_Hip"))
            .unwrap();
        let config = RetargetConfig {
            hip_name: "CC_Base_Hip".into(),
            ..Default::default()
        };
        assert!(run(&mut scene, &config).is_ok());
    }

    #[test]
    fn test_hip_as_root_is_rejected() {
        let skeleton = Skeleton::new(vec![Joint::new("Hips", None, Transform::IDENTITY)]).unwrap();
        let mut scene = Scene {
            skeleton,
            clip: AnimationClip::new("pose", FrameRange::new(0, 0)),
            meshes: Vec::new(),
        };
        let result = run(&mut scene, &RetargetConfig::default());
        assert!(matches!(result, Err(RetargetError::InvalidSkeleton(_))));
    }

    #[test]
    fn test_empty_curve_fails_at_init() {
        let mut scene = walking_scene();
        scene.clip.curves.set_curve("mixamorig:Spine", Channel::RotationX, Curve::new());
        let before = scene.clone();

        let config = RetargetConfig::default();
        let results: Vec<Result<Status>> = convert(&mut scene, &config).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Err(RetargetError::IncompatibleFrameRange { start: 1, end: 24, .. })
        ));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_bound_mesh_is_kept() {
        let mut scene = walking_scene();
        scene.meshes.push(MeshBinding {
            name: "Body".into(),
            armature: Some("Armature".into()),
            placeholder: false,
        });
        let statuses = run(&mut scene, &RetargetConfig::default()).unwrap();
        assert_eq!(statuses[Stage::BindFixed.index()].kind, StatusKind::Skipped);
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].armature.as_deref(), Some(ROOT_NAME));
    }

    #[test]
    fn test_retarget_applies_knee_fix() {
        let mut scene = walking_scene();
        let config = RetargetConfig {
            knee_offset: Vec3::new(0.0, 0.01, 0.0),
            knee_joints: Some(vec!["mixamorig:Spine".into()]),
            ..Default::default()
        };
        retarget(&mut scene, &config).unwrap();
        let spine = scene.skeleton.find("mixamorig:Spine").unwrap();
        assert!(scene.skeleton.joint(spine).tail.abs_diff_eq(Vec3::new(0.0, 1.01, 0.0), 1e-5));

        let mut scene = walking_scene();
        let config = RetargetConfig {
            knee_offset: Vec3::X,
            ..Default::default()
        };
        assert!(matches!(
            retarget(&mut scene, &config),
            Err(RetargetError::UnknownJoint(_))
        ));
    }
}
