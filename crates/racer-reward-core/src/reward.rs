//! Reward types and the steer-to-point reward function

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::config::RewardConfig;
use crate::error::Result;
use crate::params::RewardParams;
use crate::policy::RewardPolicy;
use crate::steering::compute_target_steering;

/// Scalar reward with optional decomposition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    /// Total scalar reward
    pub value: f64,
    /// Decomposed components for analysis
    #[serde(default)]
    pub components: RewardComponents,
}

/// Decomposed reward components
pub type RewardComponents = HashMap<String, f64>;

/// Definition of a reward component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardComponentDef {
    /// Component name
    pub name: String,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Expected range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

impl RewardComponentDef {
    fn new(name: &str, description: &str, range: Option<[f64; 2]>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            range,
        }
    }
}

/// Trait for computing rewards from simulator state
pub trait RewardFunction: Send + Sync {
    /// State type for this reward function
    type State;

    /// Compute reward for one tick
    fn compute(&self, state: &Self::State) -> Result<Reward>;

    /// List available reward components
    fn components(&self) -> Vec<RewardComponentDef>;
}

/// Rewards steering towards a lookahead point on the track
///
/// Holds no per-tick state; the same instance can score ticks from any
/// number of threads.
#[derive(Debug, Clone)]
pub struct SteerToPointReward {
    config: RewardConfig,
    policy: RewardPolicy,
}

impl SteerToPointReward {
    pub fn new(config: RewardConfig) -> Self {
        let policy = config.policy();
        Self { config, policy }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    pub fn policy(&self) -> &RewardPolicy {
        &self.policy
    }
}

impl Default for SteerToPointReward {
    fn default() -> Self {
        Self::new(RewardConfig::default())
    }
}

impl RewardFunction for SteerToPointReward {
    type State = RewardParams;

    fn compute(&self, params: &RewardParams) -> Result<Reward> {
        let target_steering = compute_target_steering(params, &self.config)?;
        let reward = self.policy.score(params, target_steering);
        debug!(
            "Reward {:.4} (steering {:.2} vs target {:.2})",
            reward.value, params.steering_angle, target_steering
        );
        Ok(reward)
    }

    fn components(&self) -> Vec<RewardComponentDef> {
        vec![
            RewardComponentDef::new(
                "alignment",
                "1 - |steering error| / error scale",
                Some([-2.0, 1.0]),
            ),
            RewardComponentDef::new(
                "position",
                "Centre-line band weight plus weighted lap progress",
                None,
            ),
            RewardComponentDef::new(
                "penalty",
                "Product of steering, speed and off-track penalties",
                Some([0.0, 1.0]),
            ),
            RewardComponentDef::new("lap_bonus", "Bonus for completing the lap", None),
            RewardComponentDef::new(
                "target_steering",
                "Ideal steering angle in degrees",
                Some([-180.0, 180.0]),
            ),
        ]
    }
}

/// Scalar reward for one tick
pub fn reward_function(params: &RewardParams, config: &RewardConfig) -> Result<f64> {
    let target_steering = compute_target_steering(params, config)?;
    Ok(config.policy().score(params, target_steering).value)
}
