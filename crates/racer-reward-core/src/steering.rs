//! Pure-pursuit target steering

use tracing::debug;

use crate::config::RewardConfig;
use crate::error::Result;
use crate::geometry::{Waypoint, normalize_degrees, polar};
use crate::params::RewardParams;
use crate::waypoints::{densify, orient, select_target};

/// Steering angle, relative to `heading_deg`, that points the car at `target`
///
/// Result is in `(-180, 180]`. A target on top of the car gives
/// `-heading` wrapped, since `atan2(0, 0)` is taken as 0.
pub fn target_steering_degrees(car: Waypoint, heading_deg: f64, target: Waypoint) -> f64 {
    let (_, target_angle) = polar(target.x - car.x, target.y - car.y);
    normalize_degrees(target_angle - heading_deg)
}

/// Point on the densified track the car should aim for this tick
pub fn target_point(params: &RewardParams, config: &RewardConfig) -> Result<Waypoint> {
    config.validate()?;
    match config.track {
        Some(_) => params.validate_track_width()?,
        None => params.validate()?,
    }

    let waypoints = orient(config.waypoints_for(params), params.is_reversed);
    let polyline = densify(&waypoints, config.upsample_factor)?;
    select_target(&polyline, params.car(), config.lookahead_radius(params.track_width))
}

/// Ideal steering angle in degrees for the car described by `params`
pub fn compute_target_steering(params: &RewardParams, config: &RewardConfig) -> Result<f64> {
    let target = target_point(params, config)?;
    let steering = target_steering_degrees(params.car(), params.heading, target);
    debug!(
        "Target steering {:.2} deg (heading {:.2}, target ({:.3}, {:.3}))",
        steering, params.heading, target.x, target.y
    );
    Ok(steering)
}
