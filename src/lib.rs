//! Hip-to-root motion retargeting.
//!
//! Takes a skeleton and a clip whose locomotion lives on the hip joint and
//! moves the ground-plane part of it (translation and yaw) onto a dedicated
//! root joint, leaving the hip with in-place motion. Runs natively and, as
//! a wasm module, in the browser.

pub mod animation;
pub mod bake;
pub mod bind_pose;
pub mod config;
pub mod curve;
mod error;
pub mod joint_names;
pub mod math;
pub mod quat_cleanup;
pub mod retarget;
pub mod scene;
pub mod skeleton;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        mod wasm;
        pub use wasm::{convert_scene, convert_scene_json, init};
    } else {
        pub mod batch;
        pub use batch::{batch_convert, BatchOptions};
    }
}

pub use animation::{AnimationClip, FrameRange};
pub use config::{CleanupOptions, RetargetConfig};
pub use error::{Result, RetargetError};
pub use joint_names::{BoneRenaming, JointNaming};
pub use math::Transform;
pub use retarget::{convert, retarget, run, Conversion, Stage, Status, StatusKind};
pub use scene::{MeshBinding, Scene};
pub use skeleton::{Joint, JointId, Skeleton};
