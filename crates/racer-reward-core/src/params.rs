//! Per-tick simulator parameters

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{RewardError, Result};
use crate::geometry::Waypoint;

/// Snapshot of the car and track the simulator hands over every tick
///
/// Keys the simulator sends beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardParams {
    /// Car position
    pub x: f64,
    pub y: f64,

    /// Car heading in degrees, counter-clockwise from +x
    pub heading: f64,

    /// Front wheel angle in degrees
    #[serde(default)]
    pub steering_angle: f64,

    /// Speed in m/s
    #[serde(default)]
    pub speed: f64,

    /// Track width in track units
    pub track_width: f64,

    /// Distance of the car from the track centre line
    #[serde(default)]
    pub distance_from_center: f64,

    #[serde(default = "default_true")]
    pub all_wheels_on_track: bool,

    /// Lap progress, 0 to 100
    #[serde(default)]
    pub progress: f64,

    /// Car drives clockwise
    #[serde(default)]
    pub is_reversed: bool,

    /// Track centre line, counter-clockwise
    pub waypoints: Vec<Waypoint>,
}

fn default_true() -> bool {
    true
}

impl RewardParams {
    pub fn car(&self) -> Waypoint {
        Waypoint::new(self.x, self.y)
    }

    /// Reject ticks the geometry cannot work with
    pub fn validate(&self) -> Result<()> {
        self.validate_track_width()?;
        if self.waypoints.is_empty() {
            return Err(RewardError::EmptyWaypoints("params carry no waypoints".into()));
        }
        Ok(())
    }

    /// Only the lookahead input; for ticks scored against a loaded track
    pub fn validate_track_width(&self) -> Result<()> {
        if !(self.track_width.is_finite() && self.track_width > 0.0) {
            return Err(RewardError::InvalidTrackWidth(self.track_width));
        }
        Ok(())
    }
}

/// Hex SHA-256 of the canonical JSON encoding of `params`
///
/// Two ticks with equal hashes must score identically.
pub fn state_hash(params: &RewardParams) -> Result<String> {
    let bytes = serde_json::to_vec(params)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
