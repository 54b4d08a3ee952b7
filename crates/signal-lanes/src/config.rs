use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Closed range of seconds a message may stay on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DurationRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.min_secs.is_finite() && self.max_secs.is_finite()) || self.min_secs <= 0.0 {
            return Err(Error::Config(format!(
                "{name} must be positive and finite, got {}..{}",
                self.min_secs, self.max_secs
            )));
        }
        if self.max_secs < self.min_secs {
            return Err(Error::Config(format!(
                "{name} max ({}) is below min ({})",
                self.max_secs, self.min_secs
            )));
        }
        Ok(())
    }
}

/// Lane geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneConfig {
    /// Number of horizontal lanes
    pub count: usize,
    /// Height of one lane's band, in layout units
    pub height: f64,
    /// Upper bound of the random vertical offset inside a band
    pub jitter_max: f64,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            count: 8,
            height: 60.0,
            jitter_max: 20.0,
        }
    }
}

impl LaneConfig {
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::Config("lane count must be at least 1".into()));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::Config(format!(
                "lane height must be positive, got {}",
                self.height
            )));
        }
        if !(self.jitter_max.is_finite() && self.jitter_max >= 0.0) {
            return Err(Error::Config(format!(
                "lane jitter must be non-negative, got {}",
                self.jitter_max
            )));
        }
        Ok(())
    }
}

/// Arrival pattern for seeded batches: messages arrive in small groups,
/// each group `group_delay_secs` after the previous one, and members of a
/// group `in_group_step_secs` apart plus a little jitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerConfig {
    pub group_size: usize,
    pub group_delay_secs: f64,
    pub in_group_step_secs: f64,
    pub jitter_max_secs: f64,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            group_size: 3,
            group_delay_secs: 3.0,
            in_group_step_secs: 1.0,
            jitter_max_secs: 0.5,
        }
    }
}

impl StaggerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.group_size == 0 {
            return Err(Error::Config("batch group size must be at least 1".into()));
        }
        for (name, value) in [
            ("group_delay_secs", self.group_delay_secs),
            ("in_group_step_secs", self.in_group_step_secs),
            ("jitter_max_secs", self.jitter_max_secs),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::Config(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// How a live submission picks its lane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivePlacement {
    /// Uniform random lane, starts immediately. May overlap.
    #[default]
    Random,
    /// Earliest-free lane given what the registry holds; waits if needed.
    EarliestFree,
}

/// Timer-driven synthetic messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub enabled: bool,
    pub interval_secs: f64,
    pub duration: DurationRange,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 3.0,
            duration: DurationRange::new(12.0, 20.0),
        }
    }
}

/// Top-level feed configuration. Every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub lanes: LaneConfig,
    pub stagger: StaggerConfig,
    pub preset_duration: DurationRange,
    pub live_duration: DurationRange,
    pub live_placement: LivePlacement,
    pub ambient: AmbientConfig,
    /// Time a finished message is kept before eviction
    pub eviction_grace_secs: f64,
    /// How often the runner evicts
    pub eviction_interval_secs: f64,
    /// Hard cap on stored messages
    pub max_messages: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            lanes: LaneConfig::default(),
            stagger: StaggerConfig::default(),
            preset_duration: DurationRange::new(8.0, 16.0),
            live_duration: DurationRange::new(8.0, 16.0),
            live_placement: LivePlacement::default(),
            ambient: AmbientConfig::default(),
            eviction_grace_secs: 16.0,
            eviction_interval_secs: 5.0,
            max_messages: 96,
        }
    }
}

impl FeedConfig {
    /// Load from a YAML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FeedConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.lanes.validate()?;
        self.stagger.validate()?;
        self.preset_duration.validate("preset_duration")?;
        self.live_duration.validate("live_duration")?;
        self.ambient.duration.validate("ambient.duration")?;
        if self.ambient.enabled {
            validate_interval("ambient.interval_secs", self.ambient.interval_secs)?;
        }
        if !(self.eviction_grace_secs.is_finite() && self.eviction_grace_secs >= 0.0) {
            return Err(Error::Config(format!(
                "eviction grace must be non-negative, got {}",
                self.eviction_grace_secs
            )));
        }
        validate_interval("eviction_interval_secs", self.eviction_interval_secs)?;
        if self.max_messages == 0 {
            return Err(Error::Config("max_messages must be at least 1".into()));
        }
        Ok(())
    }
}

/// Upper bound for timer periods.
pub const MAX_INTERVAL_SECS: f64 = 86_400.0;

/// Timer periods must be positive and at most a day.
fn validate_interval(name: &str, secs: f64) -> Result<()> {
    if secs.is_finite() && secs > 0.0 && secs <= MAX_INTERVAL_SECS {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be in (0, {}], got {}",
            name, MAX_INTERVAL_SECS, secs
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = FeedConfig::default();
        config.validate().unwrap();
        assert_eq!(config.lanes.count, 8);
        assert_eq!(config.lanes.height, 60.0);
        assert_eq!(config.stagger.group_size, 3);
        assert_eq!(config.live_placement, LivePlacement::Random);
        assert!(!config.ambient.enabled);
    }

    #[test]
    fn test_zero_lanes_rejected() {
        let mut config = FeedConfig::default();
        config.lanes.count = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("lane count"));
    }

    #[test]
    fn test_non_positive_lane_height_rejected() {
        for height in [0.0, -60.0, f64::NAN] {
            let mut config = FeedConfig::default();
            config.lanes.height = height;
            assert!(
                matches!(config.validate(), Err(Error::Config(_))),
                "height {} should be rejected",
                height
            );
        }
    }

    #[test]
    fn test_inverted_duration_range_rejected() {
        let mut config = FeedConfig::default();
        config.live_duration = DurationRange::new(10.0, 5.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_group_size_rejected() {
        let mut config = FeedConfig::default();
        config.stagger.group_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_interval_bounds() {
        for secs in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e20, MAX_INTERVAL_SECS + 1.0] {
            let mut config = FeedConfig::default();
            config.eviction_interval_secs = secs;
            assert!(
                matches!(config.validate(), Err(Error::Config(_))),
                "eviction interval {} should be rejected",
                secs
            );

            let mut config = FeedConfig::default();
            config.ambient.enabled = true;
            config.ambient.interval_secs = secs;
            assert!(
                matches!(config.validate(), Err(Error::Config(_))),
                "ambient interval {} should be rejected",
                secs
            );
        }

        let mut config = FeedConfig::default();
        config.eviction_interval_secs = MAX_INTERVAL_SECS;
        config.ambient.enabled = true;
        config.ambient.interval_secs = MAX_INTERVAL_SECS;
        config.validate().unwrap();
    }

    #[test]
    fn test_huge_interval_fails_construction() {
        let mut config = FeedConfig::default();
        config.eviction_interval_secs = 1e20;
        let result = crate::FeedController::new(
            config,
            std::sync::Arc::new(crate::ManualClock::new(0.0)),
            rand::SeedableRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
lanes:
  count: 4
live_placement: earliest_free
ambient:
  enabled: true
  interval_secs: 2.5
max_messages: 40
"#
        )
        .unwrap();

        let config = FeedConfig::load(file.path()).unwrap();
        assert_eq!(config.lanes.count, 4);
        assert_eq!(config.lanes.height, 60.0);
        assert_eq!(config.live_placement, LivePlacement::EarliestFree);
        assert!(config.ambient.enabled);
        assert_eq!(config.ambient.interval_secs, 2.5);
        assert_eq!(config.ambient.duration, DurationRange::new(12.0, 20.0));
        assert_eq!(config.max_messages, 40);
    }

    #[test]
    fn test_load_rejects_invalid_yaml_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lanes:\n  count: 0\n").unwrap();
        assert!(matches!(FeedConfig::load(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FeedConfig::load(Path::new("/nonexistent/signal-feed.yaml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
