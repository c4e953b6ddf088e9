//! Error types for reward scoring

use thiserror::Error;

/// Result type for reward scoring operations
pub type Result<T> = std::result::Result<T, RewardError>;

/// Reward scoring error types
///
/// Every variant except `Io` and `Serialization` is a precondition fault:
/// the caller or the track configuration is wrong, and no reward can be
/// produced for the tick.
#[derive(Debug, Error)]
pub enum RewardError {
    /// Waypoint sequence has no points
    #[error("Empty waypoints: {0}")]
    EmptyWaypoints(String),

    /// Densification factor of zero
    #[error("Invalid upsample factor: {0} (must be at least 1)")]
    InvalidUpsampleFactor(usize),

    /// Lookahead radius that is zero, negative or not finite
    #[error("Invalid lookahead radius: {0} (must be positive and finite)")]
    InvalidLookahead(f64),

    /// Track width that is zero, negative or not finite
    #[error("Invalid track width: {0} (must be positive and finite)")]
    InvalidTrackWidth(f64),

    /// Bad configuration value or missing track data
    #[error("Config error: {0}")]
    Config(String),

    /// Failed to read a config or track file
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RewardError {
    fn from(err: serde_json::Error) -> Self {
        RewardError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for RewardError {
    fn from(err: std::io::Error) -> Self {
        RewardError::Io(err.to_string())
    }
}
