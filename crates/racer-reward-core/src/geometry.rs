//! Track-plane geometry: points, polar conversions and angle wrapping

use serde::{Deserialize, Serialize};

/// A point in track-plane coordinates
///
/// Serialized as a `[x, y]` pair, which is how the simulator sends
/// waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Waypoint) -> f64 {
        distance(*self, *other)
    }

    /// Point at fraction `t` of the way from `self` to `other`
    ///
    /// `t == 0.0` returns `self` bit-for-bit.
    pub fn lerp(&self, other: &Waypoint, t: f64) -> Waypoint {
        Waypoint {
            x: t * other.x + (1.0 - t) * self.x,
            y: t * other.y + (1.0 - t) * self.y,
        }
    }
}

impl From<[f64; 2]> for Waypoint {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Waypoint> for [f64; 2] {
    fn from(p: Waypoint) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Waypoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

pub fn distance(a: Waypoint, b: Waypoint) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Cartesian to polar. Returns `(r, theta)` with theta in degrees.
///
/// The origin maps to theta 0 whatever the signs of its zeros; IEEE
/// `atan2(0, -0)` would give 180.
pub fn polar(x: f64, y: f64) -> (f64, f64) {
    if x == 0.0 && y == 0.0 {
        return (0.0, 0.0);
    }
    (x.hypot(y), y.atan2(x).to_degrees())
}

/// Polar to cartesian, theta in degrees
pub fn rect(r: f64, theta: f64) -> (f64, f64) {
    let radians = theta.to_radians();
    (r * radians.cos(), r * radians.sin())
}

/// Wrap an angle in degrees into `(-180, 180]`
///
/// ```
/// use racer_reward_core::geometry::normalize_degrees;
/// assert_eq!(normalize_degrees(362.0), 2.0);
/// assert_eq!(normalize_degrees(270.0), -90.0);
/// assert_eq!(normalize_degrees(-180.0), 180.0);
/// ```
pub fn normalize_degrees(angle: f64) -> f64 {
    let turns = (angle / 360.0).floor();
    let wrapped = angle - turns * 360.0;

    if wrapped <= 180.0 {
        wrapped
    } else {
        wrapped - 360.0
    }
}
