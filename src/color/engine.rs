//! The mixing engine: rule table, policy and spawn categories in one value
//!
//! Built once at startup and owned by the tracker. Every operation is pure.

use super::category::{CategoryTable, SpawnCategory};
use super::loader::load_rule_table;
use super::palette::Color;
use super::rules::{MixPolicy, MixingRuleTable};
use crate::core::config::MixingConfig;
use crate::core::error::Result;

#[derive(Debug, Clone)]
pub struct MixingEngine {
    table: MixingRuleTable,
    policy: MixPolicy,
    neutral: Color,
    categories: CategoryTable,
    tolerance: f32,
}

impl MixingEngine {
    pub fn new(
        table: MixingRuleTable,
        policy: MixPolicy,
        neutral: Color,
        categories: CategoryTable,
        tolerance: f32,
    ) -> Self {
        Self {
            table,
            policy,
            neutral,
            categories,
            tolerance,
        }
    }

    /// Build the engine described by the config, loading `rules_file` if set
    pub fn from_config(config: &MixingConfig) -> Result<Self> {
        let table = match &config.rules_file {
            Some(path) => load_rule_table(path)?,
            None => config.rule_set.table(),
        };
        tracing::debug!(
            rules = table.len(),
            policy = ?config.policy,
            "Mixing engine ready"
        );
        Ok(Self::new(
            table,
            config.policy,
            config.neutral_color,
            CategoryTable::default(),
            config.similarity_tolerance,
        ))
    }

    /// Mixed color of two card colors; order-independent and total
    pub fn resolve(&self, a: &Color, b: &Color) -> Color {
        self.table.resolve(a, b)
    }

    /// Whether two card colors may start a session under the active policy
    pub fn can_mix(&self, a: &Color, b: &Color) -> bool {
        self.policy.can_mix(a, b, &self.neutral)
    }

    /// Spawn category of a mixed color, using the configured tolerance
    pub fn classify(&self, color: &Color) -> Option<SpawnCategory> {
        self.categories.classify(color, self.tolerance)
    }

    pub fn policy(&self) -> MixPolicy {
        self.policy
    }

    pub fn neutral(&self) -> Color {
        self.neutral
    }

    pub fn table(&self) -> &MixingRuleTable {
        &self.table
    }
}

impl Default for MixingEngine {
    fn default() -> Self {
        let config = MixingConfig::default();
        Self::new(
            config.rule_set.table(),
            config.policy,
            config.neutral_color,
            CategoryTable::default(),
            config.similarity_tolerance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette::{BLUE, PURPLE, RED, WHITE};
    use crate::color::rules::RuleSet;

    #[test]
    fn test_default_engine_is_restrictive_classic() {
        let engine = MixingEngine::default();
        assert_eq!(engine.policy(), MixPolicy::Restrictive);
        assert_eq!(engine.neutral(), WHITE);
        assert_eq!(engine.resolve(&RED, &BLUE), PURPLE);
        assert!(!engine.can_mix(&RED, &RED));
        assert_eq!(engine.classify(&PURPLE), Some(SpawnCategory::Purple));
    }

    #[test]
    fn test_from_config_permissive_extended() {
        let config = MixingConfig {
            policy: MixPolicy::Permissive,
            rule_set: RuleSet::Extended,
            ..MixingConfig::default()
        };
        let engine = MixingEngine::from_config(&config).unwrap();
        assert!(engine.can_mix(&RED, &RED));
        assert_eq!(engine.resolve(&RED, &RED), RED);
        assert_eq!(engine.table().len(), 15);
    }
}
