use serde::{Deserialize, Serialize};

/// Animated scalar property of a joint.
/// Ordered translation, rotation (w, x, y, z), scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Channel {
    TranslationX = 0,
    TranslationY = 1,
    TranslationZ = 2,

    RotationW = 3,
    RotationX = 4,
    RotationY = 5,
    RotationZ = 6,

    ScaleX = 7,
    ScaleY = 8,
    ScaleZ = 9,
}

impl Channel {
    pub const COUNT: usize = 10;

    pub const ALL: [Channel; Self::COUNT] = [
        Channel::TranslationX,
        Channel::TranslationY,
        Channel::TranslationZ,
        Channel::RotationW,
        Channel::RotationX,
        Channel::RotationY,
        Channel::RotationZ,
        Channel::ScaleX,
        Channel::ScaleY,
        Channel::ScaleZ,
    ];

    pub const TRANSLATION: [Channel; 3] = [
        Channel::TranslationX,
        Channel::TranslationY,
        Channel::TranslationZ,
    ];

    /// Quaternion components in (w, x, y, z) order
    pub const ROTATION: [Channel; 4] = [
        Channel::RotationW,
        Channel::RotationX,
        Channel::RotationY,
        Channel::RotationZ,
    ];

    pub const SCALE: [Channel; 3] = [Channel::ScaleX, Channel::ScaleY, Channel::ScaleZ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Value of the channel when no curve drives it (identity transform)
    pub const fn rest_value(self) -> f32 {
        match self {
            Channel::RotationW | Channel::ScaleX | Channel::ScaleY | Channel::ScaleZ => 1.0,
            _ => 0.0,
        }
    }
}
