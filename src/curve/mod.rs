//! Keyframed scalar curves and the per-joint curve store.

mod channel;
mod fcurve;
mod group;
mod keyframe;
mod store;

pub use channel::Channel;
pub use fcurve::{Curve, KEY_TIME_EPSILON};
pub use group::QuaternionCurveGroup;
pub use keyframe::{BezierHandles, Interpolation, Keyframe};
pub use store::{channel_value, ChannelSet, CurveStore};
