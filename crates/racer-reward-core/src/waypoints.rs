//! Waypoint orientation, densification and lookahead target selection

use tracing::{debug, warn};

use crate::error::{RewardError, Result};
use crate::geometry::Waypoint;

/// Order waypoints in the direction the car is driving
///
/// The simulator always supplies waypoints counter-clockwise; a reversed
/// car drives clockwise.
pub fn orient(waypoints: &[Waypoint], is_reversed: bool) -> Vec<Waypoint> {
    if is_reversed {
        waypoints.iter().rev().copied().collect()
    } else {
        waypoints.to_vec()
    }
}

/// Insert `factor - 1` interpolated points after every waypoint
///
/// The track is treated as closed, so the last waypoint is joined back to
/// the first. `densify(w, f)[i * f] == w[i]` for every `i`.
pub fn densify(waypoints: &[Waypoint], factor: usize) -> Result<Vec<Waypoint>> {
    if factor == 0 {
        return Err(RewardError::InvalidUpsampleFactor(factor));
    }
    if waypoints.is_empty() {
        return Err(RewardError::EmptyWaypoints("cannot densify".into()));
    }

    let n = waypoints.len();
    let mut polyline = Vec::with_capacity(n * factor);
    for (j, start) in waypoints.iter().enumerate() {
        let end = &waypoints[(j + 1) % n];
        for i in 0..factor {
            polyline.push(start.lerp(end, i as f64 / factor as f64));
        }
    }
    Ok(polyline)
}

/// Index of the polyline point nearest to `car`, lowest index on ties
pub fn closest_index(polyline: &[Waypoint], car: Waypoint) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in polyline.iter().enumerate() {
        let d = p.distance(&car);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Pick the point the car should steer towards
///
/// Starting at the polyline point closest to the car and walking forward,
/// returns the first point that is not inside the lookahead circle. When
/// the whole track fits inside the circle the closest point is returned.
pub fn select_target(
    polyline: &[Waypoint],
    car: Waypoint,
    lookahead_radius: f64,
) -> Result<Waypoint> {
    if !(lookahead_radius.is_finite() && lookahead_radius > 0.0) {
        return Err(RewardError::InvalidLookahead(lookahead_radius));
    }
    let i_closest = closest_index(polyline, car)
        .ok_or_else(|| RewardError::EmptyWaypoints("no polyline to select a target from".into()))?;

    let n = polyline.len();
    let target = (0..n)
        .map(|offset| polyline[(i_closest + offset) % n])
        .find(|p| p.distance(&car) >= lookahead_radius);

    match target {
        Some(target) => {
            debug!(
                "Closest index {} of {}, target ({:.4}, {:.4})",
                i_closest, n, target.x, target.y
            );
            Ok(target)
        }
        None => {
            warn!(
                "No waypoint outside lookahead radius {:.3}, falling back to closest point",
                lookahead_radius
            );
            Ok(polyline[i_closest])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Waypoint> {
        vec![
            Waypoint::new(1.0, 0.0),
            Waypoint::new(0.0, 1.0),
            Waypoint::new(-1.0, 0.0),
            Waypoint::new(0.0, -1.0),
        ]
    }

    #[test]
    fn test_orient() {
        let w = square();
        assert_eq!(orient(&w, false), w);

        let reversed = orient(&w, true);
        assert_eq!(reversed[0], Waypoint::new(0.0, -1.0));
        assert_eq!(reversed[3], Waypoint::new(1.0, 0.0));
        assert_eq!(orient(&reversed, true), w);
    }

    #[test]
    fn test_densify_keeps_waypoints() {
        let w = square();
        for factor in [1, 2, 3, 20] {
            let dense = densify(&w, factor).unwrap();
            assert_eq!(dense.len(), w.len() * factor);
            for (i, p) in w.iter().enumerate() {
                assert_eq!(dense[i * factor], *p);
            }
        }
    }

    #[test]
    fn test_densify_wraps_last_segment() {
        let w = vec![Waypoint::new(0.0, 0.0), Waypoint::new(4.0, 0.0)];
        let dense = densify(&w, 4).unwrap();
        let xs: Vec<f64> = dense.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_densify_preconditions() {
        assert!(matches!(
            densify(&square(), 0),
            Err(RewardError::InvalidUpsampleFactor(0))
        ));
        assert!(matches!(densify(&[], 20), Err(RewardError::EmptyWaypoints(_))));
    }

    #[test]
    fn test_closest_index_ties_take_lowest() {
        let w = square();
        assert_eq!(closest_index(&w, Waypoint::new(0.0, 0.0)), Some(0));
        assert_eq!(closest_index(&w, Waypoint::new(-0.9, 0.1)), Some(2));
        assert_eq!(closest_index(&[], Waypoint::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_select_target_first_outside() {
        // Straight line along x, car sits at x = 2.1
        let line: Vec<Waypoint> = (0..10).map(|i| Waypoint::new(i as f64, 0.0)).collect();
        let car = Waypoint::new(2.1, 0.0);

        let target = select_target(&line, car, 1.5).unwrap();
        assert_eq!(target, Waypoint::new(4.0, 0.0));

        // Exactly on the radius counts as outside
        let target = select_target(&line, Waypoint::new(2.0, 0.0), 2.0).unwrap();
        assert_eq!(target, Waypoint::new(4.0, 0.0));
    }

    #[test]
    fn test_select_target_walks_forward_cyclically() {
        let line: Vec<Waypoint> = (0..10).map(|i| Waypoint::new(i as f64, 0.0)).collect();
        // Closest is the last point; walking forward wraps to index 0, which is far away
        let target = select_target(&line, Waypoint::new(9.0, 0.0), 1.5).unwrap();
        assert_eq!(target, Waypoint::new(0.0, 0.0));
    }

    #[test]
    fn test_select_target_no_earlier_point_outside() {
        let dense = densify(&square(), 20).unwrap();
        let car = Waypoint::new(0.3, -0.2);
        let radius = 0.8;
        let target = select_target(&dense, car, radius).unwrap();

        let start = closest_index(&dense, car).unwrap();
        let n = dense.len();
        let pos = (0..n)
            .position(|k| dense[(start + k) % n] == target)
            .unwrap();
        assert!(target.distance(&car) >= radius);
        for k in 0..pos {
            assert!(dense[(start + k) % n].distance(&car) < radius);
        }
    }

    #[test]
    fn test_select_target_falls_back_to_closest() {
        let dense = densify(&square(), 5).unwrap();
        let car = Waypoint::new(0.0, -0.9);
        let target = select_target(&dense, car, 100.0).unwrap();
        assert_eq!(target, Waypoint::new(0.0, -1.0));
    }

    #[test]
    fn test_select_target_preconditions() {
        let car = Waypoint::new(0.0, 0.0);
        assert!(matches!(
            select_target(&square(), car, 0.0),
            Err(RewardError::InvalidLookahead(_))
        ));
        assert!(matches!(
            select_target(&square(), car, -1.0),
            Err(RewardError::InvalidLookahead(_))
        ));
        assert!(matches!(
            select_target(&square(), car, f64::NAN),
            Err(RewardError::InvalidLookahead(_))
        ));
        assert!(matches!(
            select_target(&[], car, 1.0),
            Err(RewardError::EmptyWaypoints(_))
        ));
    }
}
