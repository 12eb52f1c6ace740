use thiserror::Error;

/// Errors raised while setting up raid tracking for a video.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RaidError {
    /// Both midline endpoints are the same point.
    #[error("degenerate midline: both endpoints are ({x}, {y})")]
    DegenerateLine { x: f64, y: f64 },
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Configuration or calibration text could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for RaidError {
    fn from(err: serde_json::Error) -> Self {
        RaidError::Parse(err.to_string())
    }
}
