//! Reward shaping tables
//!
//! A [`RewardPolicy`] turns the ideal steering angle plus the tick's car
//! state into a scalar. All thresholds are data so a policy can be loaded
//! from a config file instead of edited in code.

use serde::{Deserialize, Serialize};

use crate::config::DrivingMode;
use crate::params::RewardParams;
use crate::reward::{Reward, RewardComponents};

/// What a centre-line band is worth and which limits apply inside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandLimits {
    /// Position weight
    pub weight: f64,
    /// Steering beyond this many degrees is penalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_abs_steering: Option<f64>,
    /// Driving slower than this is penalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<f64>,
}

/// Band of distance from the centre line, as a fraction of track width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterBand {
    pub max_offset_fraction: f64,
    #[serde(flatten)]
    pub limits: BandLimits,
}

/// Speed cap that applies once the ideal steering angle reaches `min_abs_target_angle`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimit {
    pub min_abs_target_angle: f64,
    pub max_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardPolicy {
    /// Steering error that drives alignment to zero
    pub error_scale_degrees: f64,
    /// Lower bound on alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_floor: Option<f64>,
    /// Bands checked in order, innermost first
    pub center_bands: Vec<CenterBand>,
    /// Limits beyond the last band
    pub outside_band: BandLimits,
    /// Replaces the distance band when alignment is not positive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub misaligned_band: Option<BandLimits>,
    /// Ascending by angle; the last entry not above `|target|` applies
    pub speed_limits: Vec<SpeedLimit>,
    /// Weight of lap progress (0..=1) added to position
    pub progress_weight: f64,
    pub steering_penalty: f64,
    pub overspeed_penalty: f64,
    pub underspeed_penalty: f64,
    pub off_track_factor: f64,
    /// Added once progress reaches 100
    pub lap_bonus: f64,
    /// The optimizer gets nothing lower than this
    pub min_reward: f64,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn band(
    max_offset_fraction: f64,
    weight: f64,
    max_abs_steering: Option<f64>,
    min_speed: Option<f64>,
) -> CenterBand {
    CenterBand {
        max_offset_fraction,
        limits: BandLimits {
            weight,
            max_abs_steering,
            min_speed,
        },
    }
}

const MAX_SPEED: f64 = 3.0;

impl RewardPolicy {
    /// Centre-line following with speed capped by how hard the car must turn
    pub fn standard() -> Self {
        Self {
            error_scale_degrees: 60.0,
            alignment_floor: Some(1e-3),
            center_bands: vec![
                band(0.2, 1.0, None, None),
                band(0.3, 0.8, None, None),
                band(0.4, 0.5, None, None),
            ],
            outside_band: BandLimits {
                weight: 0.2,
                max_abs_steering: None,
                min_speed: None,
            },
            misaligned_band: None,
            speed_limits: vec![
                SpeedLimit {
                    min_abs_target_angle: 0.0,
                    max_speed: MAX_SPEED,
                },
                SpeedLimit {
                    min_abs_target_angle: 10.0,
                    max_speed: 0.6 * MAX_SPEED,
                },
                SpeedLimit {
                    min_abs_target_angle: 20.0,
                    max_speed: 0.3 * MAX_SPEED,
                },
                SpeedLimit {
                    min_abs_target_angle: 30.0,
                    max_speed: 0.1 * MAX_SPEED,
                },
            ],
            progress_weight: 1.0,
            steering_penalty: 0.5,
            overspeed_penalty: 0.5,
            underspeed_penalty: 0.5,
            off_track_factor: 1e-3,
            lap_bonus: 0.0,
            min_reward: 0.01,
        }
    }

    /// Tight racing line: narrower bands, steering and minimum-speed limits, lap bonus
    pub fn shortcut() -> Self {
        Self {
            error_scale_degrees: 60.0,
            alignment_floor: None,
            center_bands: vec![
                band(0.1, 1.0, Some(5.0), Some(2.0)),
                band(0.2, 0.7, Some(10.0), Some(1.0)),
                band(0.3, 0.5, Some(20.0), Some(0.5)),
                band(0.4, 0.1, Some(30.0), Some(0.5)),
            ],
            outside_band: BandLimits {
                weight: 1e-3,
                max_abs_steering: Some(40.0),
                min_speed: Some(0.1),
            },
            misaligned_band: Some(BandLimits {
                weight: 1e-3,
                max_abs_steering: Some(20.0),
                min_speed: Some(1.0),
            }),
            speed_limits: Vec::new(),
            progress_weight: 0.0,
            steering_penalty: 0.5,
            overspeed_penalty: 0.5,
            underspeed_penalty: 0.5,
            off_track_factor: 1e-3,
            lap_bonus: 10000.0,
            min_reward: 0.01,
        }
    }

    pub fn for_mode(mode: DrivingMode) -> Self {
        match mode {
            DrivingMode::Standard => Self::standard(),
            DrivingMode::Shortcut => Self::shortcut(),
        }
    }

    /// Limits for a car `distance_from_center` away from the centre line
    pub fn band_for(&self, distance_from_center: f64, track_width: f64) -> &BandLimits {
        self.center_bands
            .iter()
            .find(|b| distance_from_center <= b.max_offset_fraction * track_width)
            .map(|b| &b.limits)
            .unwrap_or(&self.outside_band)
    }

    /// Speed cap for the given ideal steering angle, if any
    pub fn speed_limit(&self, target_steering: f64) -> Option<f64> {
        let angle = target_steering.abs();
        self.speed_limits
            .iter()
            .rev()
            .find(|l| angle >= l.min_abs_target_angle)
            .map(|l| l.max_speed)
    }

    /// Score a tick given the ideal steering angle for it
    pub fn score(&self, params: &RewardParams, target_steering: f64) -> Reward {
        let error = (params.steering_angle - target_steering) / self.error_scale_degrees;
        let mut alignment = 1.0 - error.abs();
        if let Some(floor) = self.alignment_floor {
            alignment = alignment.max(floor);
        }

        let band = match &self.misaligned_band {
            Some(band) if alignment <= 0.0 => band,
            _ => self.band_for(params.distance_from_center, params.track_width),
        };
        let position = band.weight + self.progress_weight * params.progress / 100.0;

        let mut penalty = 1.0;
        if band
            .max_abs_steering
            .is_some_and(|max| params.steering_angle.abs() > max)
        {
            penalty *= self.steering_penalty;
        }
        if self
            .speed_limit(target_steering)
            .is_some_and(|max| params.speed > max)
        {
            penalty *= self.overspeed_penalty;
        }
        if !params.all_wheels_on_track {
            penalty *= self.off_track_factor;
        } else if band.min_speed.is_some_and(|min| params.speed < min) {
            penalty *= self.underspeed_penalty;
        }

        let lap_bonus = if params.progress >= 100.0 {
            self.lap_bonus
        } else {
            0.0
        };

        let value = (alignment * position * penalty + lap_bonus).max(self.min_reward);

        let mut components = RewardComponents::new();
        components.insert("alignment".into(), alignment);
        components.insert("position".into(), position);
        components.insert("penalty".into(), penalty);
        components.insert("lap_bonus".into(), lap_bonus);
        components.insert("target_steering".into(), target_steering);

        Reward { value, components }
    }
}
