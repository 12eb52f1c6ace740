use serde::{Deserialize, Serialize};

use crate::error::RaidError;

/// Thresholds for the raid lifecycle. All counts are in frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaidConfig {
    /// Home-side observations required before an identity may start a raid.
    pub baseline_frames: u32,
    /// Frames the raider must be missing before a substitute is searched for.
    pub recovery_min_missing: u32,
    /// Frames the raider may be missing before the raid is force-ended.
    pub raider_missing_tolerance: u32,
    /// Frames after a successful substitution during which no other is made.
    pub recovery_cooldown: u32,
    /// Maximum distance in pixels from the midline for a substitute.
    pub recovery_distance_cap: f64,
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self {
            baseline_frames: 5,
            recovery_min_missing: 5,
            raider_missing_tolerance: 100,
            recovery_cooldown: 30,
            recovery_distance_cap: 100.0,
        }
    }
}

impl RaidConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, RaidError> {
        let config: RaidConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RaidError> {
        if !self.recovery_distance_cap.is_finite() || self.recovery_distance_cap <= 0.0 {
            return Err(RaidError::InvalidConfig(format!(
                "recovery_distance_cap must be finite and positive, got {}",
                self.recovery_distance_cap
            )));
        }
        Ok(())
    }

    pub fn with_baseline_frames(mut self, frames: u32) -> Self {
        self.baseline_frames = frames;
        self
    }

    pub fn with_recovery_min_missing(mut self, frames: u32) -> Self {
        self.recovery_min_missing = frames;
        self
    }

    pub fn with_raider_missing_tolerance(mut self, frames: u32) -> Self {
        self.raider_missing_tolerance = frames;
        self
    }

    pub fn with_recovery_cooldown(mut self, frames: u32) -> Self {
        self.recovery_cooldown = frames;
        self
    }

    pub fn with_recovery_distance_cap(mut self, pixels: f64) -> Self {
        self.recovery_distance_cap = pixels;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RaidConfig::default();
        assert_eq!(config.baseline_frames, 5);
        assert_eq!(config.recovery_min_missing, 5);
        assert_eq!(config.raider_missing_tolerance, 100);
        assert_eq!(config.recovery_cooldown, 30);
        assert_eq!(config.recovery_distance_cap, 100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let config =
            RaidConfig::from_json(r#"{"raider_missing_tolerance": 60, "recovery_distance_cap": 80.0}"#)
                .unwrap();
        assert_eq!(config.raider_missing_tolerance, 60);
        assert_eq!(config.recovery_distance_cap, 80.0);
        assert_eq!(config.baseline_frames, 5);
    }

    #[test]
    fn test_invalid_cap() {
        let err = RaidConfig::default()
            .with_recovery_distance_cap(-1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, RaidError::InvalidConfig(_)));
        assert!(RaidConfig::from_json(r#"{"recovery_distance_cap": 0}"#).is_err());
        assert!(matches!(
            RaidConfig::from_json("{not json"),
            Err(RaidError::Parse(_))
        ));
    }
}
