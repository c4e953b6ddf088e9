//! # racer-reward-core
//!
//! Reward scoring for a reinforcement-learning driving simulator.
//!
//! Every tick the simulator reports the car's pose and the track's
//! waypoints. This crate turns that snapshot into a scalar reward:
//! - Orient and densify the waypoints into a closed polyline
//! - Pick a pure-pursuit target point at the edge of a lookahead circle
//! - Derive the ideal steering angle towards it
//! - Score the car's actual steering, position and speed with a data-driven policy
//!
//! Scoring is a pure function of the tick and the configuration; nothing
//! is carried over between calls.

pub mod config;
pub mod error;
pub mod geometry;
pub mod params;
pub mod policy;
pub mod reward;
pub mod steering;
pub mod waypoints;

pub use config::{DrivingMode, RewardConfig, TrackData};
pub use error::{RewardError, Result};
pub use geometry::{Waypoint, normalize_degrees};
pub use params::{RewardParams, state_hash};
pub use policy::RewardPolicy;
pub use reward::{Reward, RewardComponents, RewardFunction, SteerToPointReward, reward_function};
pub use steering::{compute_target_steering, target_point, target_steering_degrees};
pub use waypoints::{densify, orient, select_target};
