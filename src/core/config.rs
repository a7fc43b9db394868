//! Scene configuration with documented constants
//!
//! All tuning values are collected here with explanations of their purpose
//! and how they interact. Every field has a default, so a config file only
//! needs to name the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::palette::{Color, WHITE};
use crate::color::rules::{MixPolicy, RuleSet};
use crate::core::error::{KasaneError, Result};
use crate::core::types::Seconds;

/// Configuration for the proximity session tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Distance below which two cards count as overlapping (world units)
    ///
    /// The comparison is strict: a pair exactly at this distance is separated.
    /// Printed cards are ~8.5cm wide, so 5cm means the cards physically overlap.
    pub overlap_distance: f32,

    /// Continuous overlap time before a mix is finalized into a spawn
    pub dwell_duration: Seconds,

    /// Height of the mixing effect above the higher of the two cards
    pub effect_height_offset: f32,

    /// How long a card must have been visible and held its color before it
    /// can take part in a mix
    ///
    /// Filters out detector flicker. 0 disables the requirement. Enforced by
    /// the card color holder the scene builds from this value; the tracker
    /// itself only asks `ColorStateSource::is_stable`.
    pub stability_window: Seconds,

    /// Delay between a session ending and its effect being released
    ///
    /// The session itself is always torn down on the tick the pair separates;
    /// only the release signal to the presentation layer is deferred.
    pub effect_release_delay: Seconds,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            overlap_distance: 0.05,
            dwell_duration: 1.5,
            effect_height_offset: 0.02,
            stability_window: 0.5,
            effect_release_delay: 0.0,
        }
    }
}

/// Configuration for the color mixing rule engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MixingConfig {
    /// Which pairs may start a session at all
    pub policy: MixPolicy,

    /// Built-in rule table, ignored when `rules_file` is set
    pub rule_set: RuleSet,

    /// Optional TOML rule table replacing the built-in one
    pub rules_file: Option<PathBuf>,

    /// Per-channel tolerance for mapping a mixed color to a spawn category
    pub similarity_tolerance: f32,

    /// Color treated as "no color" by the restrictive policy
    pub neutral_color: Color,
}

impl Default for MixingConfig {
    fn default() -> Self {
        Self {
            policy: MixPolicy::Restrictive,
            rule_set: RuleSet::Classic,
            rules_file: None,
            similarity_tolerance: 0.15,
            neutral_color: WHITE,
        }
    }
}

/// Configuration for the scene around the tracker (pots and spawned objects)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Distance within which a card picks up a pot's color
    pub pot_activation_radius: f32,

    /// Reset a colored card to uncolored before applying a new pot color
    pub reset_to_neutral_first: bool,

    /// Final uniform scale of a spawned object
    pub spawn_scale: f32,

    /// Duration of the grow-in animation of a spawned object
    pub spawn_grow_duration: Seconds,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            pot_activation_radius: 0.045,
            reset_to_neutral_first: false,
            spawn_scale: 0.1,
            spawn_grow_duration: 0.5,
        }
    }
}

/// Top-level configuration, one section per subsystem
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KasaneConfig {
    pub tracker: TrackerConfig,
    pub mixing: MixingConfig,
    pub scene: SceneConfig,
}

impl KasaneConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: KasaneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    ///
    /// A relative `mixing.rules_file` is resolved against the config file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if let (Some(rules), Some(dir)) = (config.mixing.rules_file.as_mut(), path.parent()) {
            if rules.is_relative() {
                *rules = dir.join(&*rules);
            }
        }
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let t = &self.tracker;
        if !(t.overlap_distance > 0.0) {
            return Err(KasaneError::InvalidConfig(format!(
                "tracker.overlap_distance ({}) must be positive",
                t.overlap_distance
            )));
        }

        for (name, value) in [
            ("tracker.dwell_duration", t.dwell_duration),
            ("tracker.stability_window", t.stability_window),
            ("tracker.effect_release_delay", t.effect_release_delay),
            ("scene.spawn_grow_duration", self.scene.spawn_grow_duration),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(KasaneError::InvalidConfig(format!(
                    "{} ({}) must be a finite, non-negative duration",
                    name, value
                )));
            }
        }

        let tolerance = self.mixing.similarity_tolerance;
        if !(tolerance > 0.0 && tolerance <= 1.0) {
            return Err(KasaneError::InvalidConfig(format!(
                "mixing.similarity_tolerance ({}) must be in (0, 1]",
                tolerance
            )));
        }

        if !(self.scene.pot_activation_radius > 0.0) {
            return Err(KasaneError::InvalidConfig(format!(
                "scene.pot_activation_radius ({}) must be positive",
                self.scene.pot_activation_radius
            )));
        }

        if !(self.scene.spawn_scale > 0.0) {
            return Err(KasaneError::InvalidConfig(format!(
                "scene.spawn_scale ({}) must be positive",
                self.scene.spawn_scale
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette::{BLACK, RED};

    #[test]
    fn test_defaults_are_valid() {
        assert!(KasaneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = KasaneConfig::from_toml_str(
            r#"
            [tracker]
            overlap_distance = 0.03

            [mixing]
            policy = "permissive"
            rule_set = "extended"
            neutral_color = "black"
            "#,
        )
        .unwrap();

        assert_eq!(config.tracker.overlap_distance, 0.03);
        assert_eq!(config.tracker.dwell_duration, 1.5);
        assert_eq!(config.mixing.policy, MixPolicy::Permissive);
        assert_eq!(config.mixing.rule_set, RuleSet::Extended);
        assert_eq!(config.mixing.neutral_color, BLACK);
        assert_eq!(config.scene.pot_activation_radius, 0.045);
    }

    #[test]
    fn test_neutral_color_as_array() {
        let config = KasaneConfig::from_toml_str(
            r#"
            [mixing]
            neutral_color = [1.0, 0.0, 0.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.mixing.neutral_color, RED);
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        let mut config = KasaneConfig::default();
        config.tracker.overlap_distance = 0.0;
        assert!(matches!(
            config.validate(),
            Err(KasaneError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_negative_dwell() {
        let mut config = KasaneConfig::default();
        config.tracker.dwell_duration = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_tolerance_out_of_range() {
        let mut config = KasaneConfig::default();
        config.mixing.similarity_tolerance = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let result = KasaneConfig::from_toml_str(
            r#"
            [mixing]
            policy = "anything-goes"
            "#,
        );
        assert!(matches!(result, Err(KasaneError::Toml(_))));
    }
}
