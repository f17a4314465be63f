use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a curve moves from a keyframe to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Hold the left value until the next key
    Step,
    #[default]
    Linear,
    /// Cubic segment shaped by the keys' handles
    Bezier,
}

/// Bezier handles of a key, as absolute (time, value) points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierHandles {
    pub left: Vec2,
    pub right: Vec2,
}

/// A single sample of a scalar channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handles: Option<BezierHandles>,
}

impl Keyframe {
    /// Linear key, the only kind the baker writes
    pub fn linear(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            interpolation: Interpolation::Linear,
            handles: None,
        }
    }

    pub fn step(time: f32, value: f32) -> Self {
        Self {
            interpolation: Interpolation::Step,
            ..Self::linear(time, value)
        }
    }

    pub fn bezier(time: f32, value: f32, handles: BezierHandles) -> Self {
        Self {
            time,
            value,
            interpolation: Interpolation::Bezier,
            handles: Some(handles),
        }
    }
}
