use thiserror::Error;

/// Everything that can stop a conversion.
#[derive(Error, Debug)]
pub enum RetargetError {
    /// No joint matched any of the recognised hip names.
    #[error("no hip joint found (looked for {searched:?})")]
    MissingRootJoint { searched: Vec<String> },

    /// A rotation channel does not carry exactly four usable component curves.
    #[error("malformed quaternion curves on joint '{joint}': {reason}")]
    MalformedCurveGroup { joint: String, reason: String },

    /// The clip's curves cannot be sampled over its frame range.
    #[error("curves do not share the frame range {start}..={end}: {reason}")]
    IncompatibleFrameRange { start: i32, end: i32, reason: String },

    #[error("unknown joint '{0}'")]
    UnknownJoint(String),

    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RetargetError>;
