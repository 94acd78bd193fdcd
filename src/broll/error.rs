use thiserror::Error;

use super::model::TrackIndex;

/// Problems with user-supplied settings. Always raised before any placement.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {field} seconds: {value}")]
    InvalidSeconds { field: &'static str, value: f64 },

    #[error("Minimum segment length rounds down to zero frames")]
    EmptyMinimum,

    #[error("Minimum segment length ({min} frames) exceeds maximum ({max} frames)")]
    InvertedRange { min: u64, max: u64 },

    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    #[error("Invalid track selection: {0}")]
    InvalidTrackSelection(String),

    #[error("Track {track} does not exist (timeline has {count} video tracks)")]
    TrackOutOfRange { track: TrackIndex, count: u32 },

    #[error("Destination track {0} is also the reference track")]
    DestinationIsReference(TrackIndex),

    #[error("Invalid include pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("No source items to choose from")]
    NoItems,

    #[error("Nothing remains to be filled")]
    NothingRemaining,

    #[error("Clip {0} has no usable frames")]
    EmptyClip(String),
}

/// Failures that stop a fill before it starts.
#[derive(Error, Debug)]
pub enum FillError {
    #[error("No valid source items found")]
    NoEligibleItems,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error("Host error: {0}")]
    Host(#[from] anyhow::Error),
}
