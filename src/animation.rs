use crate::curve::CurveStore;
use crate::error::{RetargetError, Result};
use crate::skeleton::Skeleton;
use serde::{Deserialize, Serialize};

/// Inclusive range of integer frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: i32,
    pub end: i32,
}

impl FrameRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Fails on an inverted range.
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(self.incompatible("start is after end"));
        }
        Ok(())
    }

    /// Number of frames, both ends included
    #[inline]
    pub fn len(&self) -> usize {
        (self.end - self.start + 1).max(0) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn frames(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }

    pub(crate) fn incompatible(&self, reason: impl Into<String>) -> RetargetError {
        RetargetError::IncompatibleFrameRange {
            start: self.start,
            end: self.end,
            reason: reason.into(),
        }
    }
}

/// Keyframed motion of one skeleton over a frame range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub frame_range: FrameRange,
    #[serde(default)]
    pub curves: CurveStore,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, frame_range: FrameRange) -> Self {
        Self {
            name: name.into(),
            frame_range,
            curves: CurveStore::new(),
        }
    }

    /// Key every joint's current pose at the first frame of the clip.
    pub fn key_all_joints(&mut self, skeleton: &Skeleton) {
        self.curves.key_all_joints(skeleton, self.frame_range.start);
    }
}
