//! # Simulation Configuration
//!
//! Tunables loaded once at startup from TOML. Defaults reproduce the
//! original tuning; overriding them is for tooling and tests, not for
//! gameplay balancing at runtime.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its legal range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// System-level simulation tunables.
///
/// Per-body tunables (move speed, gravity, drag, ...) live on
/// [`crate::components::PhysicsBody`]; these are the constants shared by
/// every body.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Fixed substep rate. A frame's delta time is subdivided so no
    /// substep exceeds `1 / updates_per_second` seconds.
    pub updates_per_second: f32,
    /// Per-substep displacement clamp per axis, applied at integration
    /// time regardless of velocity magnitude. Prevents tunneling
    /// through thin colliders during lag spikes.
    pub max_step_displacement: f32,
    /// Scale factor for the shallow-penetration tolerance that gates
    /// directional collision resolution.
    pub collision_precision: f32,
    /// Maximum number of entities. All storage is allocated upfront.
    pub entity_capacity: usize,
    /// Capacity of the outbound event channel.
    pub event_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            updates_per_second: 300.0,
            max_step_displacement: 1.75,
            collision_precision: 12.0,
            entity_capacity: 4096,
            event_capacity: 1024,
        }
    }
}

impl SimConfig {
    /// Parses a config from a TOML string and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::Invalid`] on out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, plus the
    /// errors of [`SimConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks every value is in its legal range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.updates_per_second > 0.0) {
            return Err(ConfigError::Invalid(
                "updates_per_second must be positive".into(),
            ));
        }
        if !(self.max_step_displacement > 0.0) {
            return Err(ConfigError::Invalid(
                "max_step_displacement must be positive".into(),
            ));
        }
        if !(self.collision_precision > 0.0) {
            return Err(ConfigError::Invalid(
                "collision_precision must be positive".into(),
            ));
        }
        if self.entity_capacity == 0 {
            return Err(ConfigError::Invalid(
                "entity_capacity must be greater than zero".into(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_the_original_tuning() {
        let config = SimConfig::default();
        assert!((config.updates_per_second - 300.0).abs() < f32::EPSILON);
        assert!((config.max_step_displacement - 1.75).abs() < f32::EPSILON);
        assert!((config.collision_precision - 12.0).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = SimConfig::from_toml_str("entity_capacity = 64\n").unwrap();
        assert_eq!(config.entity_capacity, 64);
        assert!((config.updates_per_second - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            SimConfig::from_toml_str("updates_per_second = 0.0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimConfig::from_toml_str("entity_capacity = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(matches!(
            SimConfig::from_toml_str("grativy = 100.0\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
