//! Scoring configuration and external track data

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{RewardError, Result};
use crate::geometry::Waypoint;
use crate::params::RewardParams;
use crate::policy::RewardPolicy;

/// Which racing line the car follows
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DrivingMode {
    /// Follow the simulator's centre line
    #[default]
    Standard,
    /// Follow a custom racing line from a track file, looking half as far ahead
    Shortcut,
}

impl DrivingMode {
    /// Multiplier applied to `max_sight`
    pub fn sight_scale(self) -> f64 {
        match self {
            DrivingMode::Standard => 1.0,
            DrivingMode::Shortcut => 0.5,
        }
    }
}

/// Track waypoints loaded from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackData {
    /// Track name
    pub name: String,
    /// Racing line, counter-clockwise
    pub waypoints: Vec<Waypoint>,
}

impl TrackData {
    /// Load and check a track file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RewardError::Io(format!("{}: {}", path.display(), e)))?;
        let track: TrackData = serde_json::from_str(&text)?;
        if track.waypoints.is_empty() {
            return Err(RewardError::EmptyWaypoints(format!(
                "track file {}",
                path.display()
            )));
        }
        info!(
            "Loaded track {} ({} waypoints) from {}",
            track.name,
            track.waypoints.len(),
            path.display()
        );
        Ok(track)
    }
}

/// Everything that shapes a reward besides the tick itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Racing line selection
    #[serde(default)]
    pub mode: DrivingMode,

    /// Points per waypoint segment after densification
    #[serde(default = "default_upsample_factor")]
    pub upsample_factor: usize,

    /// Lookahead radius as a fraction of track width
    #[serde(default = "default_max_sight")]
    pub max_sight: f64,

    /// Track file overriding the simulator waypoints, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_file: Option<PathBuf>,

    /// Scoring weights; the mode's preset when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<RewardPolicy>,

    /// Loaded contents of `track_file`
    #[serde(skip)]
    pub track: Option<TrackData>,
}

fn default_upsample_factor() -> usize {
    20
}

fn default_max_sight() -> f64 {
    1.0
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            mode: DrivingMode::Standard,
            upsample_factor: default_upsample_factor(),
            max_sight: default_max_sight(),
            track_file: None,
            policy: None,
            track: None,
        }
    }
}

impl RewardConfig {
    /// Shortcut preset driving the given racing line
    pub fn shortcut(track: TrackData) -> Self {
        Self {
            mode: DrivingMode::Shortcut,
            ..Self::default()
        }
        .with_track(track)
    }

    pub fn with_track(mut self, track: TrackData) -> Self {
        self.track = Some(track);
        self
    }

    /// Read a JSON config file and the track file it points to
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RewardError::Io(format!("{}: {}", path.display(), e)))?;
        let mut config: RewardConfig = serde_json::from_str(&text)?;

        if let Some(track_file) = &config.track_file {
            let resolved = match path.parent() {
                Some(dir) if track_file.is_relative() => dir.join(track_file),
                _ => track_file.clone(),
            };
            config.track = Some(TrackData::load(resolved)?);
        }

        config.validate()?;
        info!(
            "Loaded config from {} (mode {:?}, upsample {}, sight {})",
            path.display(),
            config.mode,
            config.upsample_factor,
            config.max_sight
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.upsample_factor == 0 {
            return Err(RewardError::Config("upsample_factor must be at least 1".into()));
        }
        if !(self.max_sight.is_finite() && self.max_sight > 0.0) {
            return Err(RewardError::Config(format!(
                "max_sight must be positive, got {}",
                self.max_sight
            )));
        }
        if self.mode == DrivingMode::Shortcut && self.track.is_none() {
            return Err(RewardError::Config(
                "shortcut mode needs a track_file with the racing line".into(),
            ));
        }
        Ok(())
    }

    /// Lookahead radius for a track of the given width
    pub fn lookahead_radius(&self, track_width: f64) -> f64 {
        track_width * self.max_sight * self.mode.sight_scale()
    }

    /// Waypoints to follow: the loaded track if any, else the simulator's
    pub fn waypoints_for<'a>(&'a self, params: &'a RewardParams) -> &'a [Waypoint] {
        match &self.track {
            Some(track) => &track.waypoints,
            None => &params.waypoints,
        }
    }

    /// Scoring policy in effect
    pub fn policy(&self) -> RewardPolicy {
        match &self.policy {
            Some(policy) => policy.clone(),
            None => RewardPolicy::for_mode(self.mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("racer-reward-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults() {
        let config: RewardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.mode, DrivingMode::Standard);
        assert_eq!(config.upsample_factor, 20);
        assert_eq!(config.max_sight, 1.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.lookahead_radius(0.8), 0.8);
    }

    #[test]
    fn test_shortcut_halves_sight() {
        let track = TrackData {
            name: "t".into(),
            waypoints: vec![Waypoint::new(0.0, 0.0)],
        };
        let config = RewardConfig::shortcut(track);
        assert_eq!(config.lookahead_radius(0.8), 0.4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_shortcut_requires_track() {
        let config: RewardConfig = serde_json::from_str(r#"{"mode": "shortcut"}"#).unwrap();
        assert!(matches!(config.validate(), Err(RewardError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_values() {
        let config: RewardConfig = serde_json::from_str(r#"{"upsample_factor": 0}"#).unwrap();
        assert!(matches!(config.validate(), Err(RewardError::Config(_))));
        let config: RewardConfig = serde_json::from_str(r#"{"max_sight": -0.5}"#).unwrap();
        assert!(matches!(config.validate(), Err(RewardError::Config(_))));
    }

    #[test]
    fn test_load_resolves_track_relative_to_config() {
        let dir = scratch_dir("load");
        fs::write(
            dir.join("line.json"),
            r#"{"name": "line", "waypoints": [[0, 0], [1, 0], [1, 1]]}"#,
        )
        .unwrap();
        fs::write(
            dir.join("config.json"),
            r#"{"mode": "shortcut", "track_file": "line.json", "upsample_factor": 10}"#,
        )
        .unwrap();

        let config = RewardConfig::load(dir.join("config.json")).unwrap();
        assert_eq!(config.mode, DrivingMode::Shortcut);
        assert_eq!(config.upsample_factor, 10);
        let track = config.track.as_ref().unwrap();
        assert_eq!(track.name, "line");
        assert_eq!(track.waypoints[2], Waypoint::new(1.0, 1.0));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_rejects_empty_track() {
        let dir = scratch_dir("empty");
        let path = dir.join("empty.json");
        fs::write(&path, r#"{"name": "empty", "waypoints": []}"#).unwrap();
        assert!(matches!(TrackData::load(&path), Err(RewardError::EmptyWaypoints(_))));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let err = RewardConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, RewardError::Io(_)));
    }

    #[test]
    fn test_shipped_shortcut_config() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let config = RewardConfig::load(root.join("configs/shortcut.json")).unwrap();
        assert_eq!(config.mode, DrivingMode::Shortcut);
        let track = config.track.as_ref().unwrap();
        assert_eq!(track.name, "reinvent2019-shortcut");
        assert_eq!(track.waypoints.len(), 155);
        assert_eq!(config.policy(), RewardPolicy::shortcut());
    }
}
