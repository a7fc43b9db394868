//! Color mixing rules: the immutable pair → result table and mixing policies
//!
//! Lookups are order-independent. Each unordered pair is stored once under
//! its canonical (smaller key first) form, so `resolve(a, b)` and
//! `resolve(b, a)` read the same entry by construction.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::palette::{
    Color, ColorKey, BLUE, BROWN, GREEN, LEAF_GREEN, LIGHT_BLUE, LIGHT_GREEN, LIGHT_YELLOW, LIME,
    ORANGE, PINK, PURPLE, RED, TEAL, WHITE, YELLOW,
};
use crate::core::error::{KasaneError, Result};

/// Which color pairs are allowed to start a mix session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixPolicy {
    /// Any two colored cards mix; same-color results come from the table
    Permissive,
    /// Neutral cards and identical colors never mix
    #[default]
    Restrictive,
}

impl MixPolicy {
    /// Whether two card colors may start a session under this policy
    pub fn can_mix(&self, a: &Color, b: &Color, neutral: &Color) -> bool {
        match self {
            MixPolicy::Permissive => true,
            MixPolicy::Restrictive => a != neutral && b != neutral && a != b,
        }
    }
}

/// Built-in rule tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSet {
    /// Two-color mixes of the four primaries
    #[default]
    Classic,
    /// Classic plus white mixes and explicit same-color rules
    Extended,
}

impl RuleSet {
    /// Rule triples of this set
    pub fn rules(&self) -> Vec<(Color, Color, Color)> {
        let mut rules = vec![
            (RED, BLUE, PURPLE),
            (RED, YELLOW, ORANGE),
            (RED, GREEN, BROWN),
            (BLUE, YELLOW, LEAF_GREEN),
            (BLUE, GREEN, TEAL),
            (GREEN, YELLOW, LIME),
        ];

        if *self == RuleSet::Extended {
            rules.extend([
                (WHITE, RED, PINK),
                (WHITE, BLUE, LIGHT_BLUE),
                (WHITE, GREEN, LIGHT_GREEN),
                (WHITE, YELLOW, LIGHT_YELLOW),
                (RED, RED, RED),
                (BLUE, BLUE, BLUE),
                (GREEN, GREEN, GREEN),
                (YELLOW, YELLOW, YELLOW),
                (WHITE, WHITE, WHITE),
            ]);
        }

        rules
    }

    /// Build the immutable table for this set
    pub fn table(&self) -> MixingRuleTable {
        let mut table = MixingRuleTable::new();
        for (a, b, result) in self.rules() {
            table.rules.insert(canonical_pair(&a, &b), result);
        }
        table
    }
}

fn canonical_pair(a: &Color, b: &Color) -> (ColorKey, ColorKey) {
    let (ka, kb) = (a.key(), b.key());
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// Immutable lookup of unordered color pairs to their mixed result
#[derive(Debug, Clone, Default)]
pub struct MixingRuleTable {
    rules: AHashMap<(ColorKey, ColorKey), Color>,
}

impl MixingRuleTable {
    /// Create an empty table (every lookup falls back to the average)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rule triples
    ///
    /// Listing the same unordered pair twice is allowed only if both entries
    /// agree on the result; a disagreement would break lookup symmetry.
    pub fn from_rules(rules: impl IntoIterator<Item = (Color, Color, Color)>) -> Result<Self> {
        let mut table = Self::new();
        for (a, b, result) in rules {
            let key = canonical_pair(&a, &b);
            if let Some(existing) = table.rules.get(&key) {
                if *existing != result {
                    return Err(KasaneError::InvalidRule(format!(
                        "{} + {} maps to both {} and {}",
                        a, b, existing, result
                    )));
                }
                continue;
            }
            table.rules.insert(key, result);
        }
        Ok(table)
    }

    /// Explicit rule for a pair, if one is defined
    pub fn get(&self, a: &Color, b: &Color) -> Option<Color> {
        self.rules.get(&canonical_pair(a, b)).copied()
    }

    /// Mixed color of a pair: the table entry, or the componentwise average
    pub fn resolve(&self, a: &Color, b: &Color) -> Color {
        self.get(a, b).unwrap_or_else(|| a.average(b))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette::BLACK;

    #[test]
    fn test_classic_table_is_symmetric() {
        let table = RuleSet::Classic.table();
        assert_eq!(table.len(), 6);
        assert_eq!(table.resolve(&RED, &BLUE), PURPLE);
        assert_eq!(table.resolve(&BLUE, &RED), PURPLE);
        assert_eq!(table.resolve(&YELLOW, &BLUE), LEAF_GREEN);
    }

    #[test]
    fn test_extended_adds_white_and_same_color() {
        let table = RuleSet::Extended.table();
        assert_eq!(table.len(), 15);
        assert_eq!(table.resolve(&RED, &WHITE), PINK);
        assert_eq!(table.resolve(&RED, &RED), RED);
        assert_eq!(table.resolve(&WHITE, &WHITE), WHITE);
    }

    #[test]
    fn test_classic_same_color_falls_back_to_average() {
        let table = RuleSet::Classic.table();
        assert_eq!(table.get(&RED, &RED), None);
        assert_eq!(table.resolve(&RED, &RED), RED);
    }

    #[test]
    fn test_unknown_pair_averages() {
        let table = RuleSet::Classic.table();
        let a = Color::rgb(0.2, 0.4, 0.6);
        let b = Color::rgb(0.4, 0.0, 0.2);
        let mixed = table.resolve(&a, &b);
        assert!((mixed.r - 0.3).abs() < 1e-6);
        assert!((mixed.g - 0.2).abs() < 1e-6);
        assert!((mixed.b - 0.4).abs() < 1e-6);
        assert_eq!(mixed.a, 1.0);
    }

    #[test]
    fn test_from_rules_rejects_conflicting_entries() {
        let result = MixingRuleTable::from_rules([(RED, BLUE, PURPLE), (BLUE, RED, BLACK)]);
        assert!(matches!(result, Err(KasaneError::InvalidRule(_))));
    }

    #[test]
    fn test_from_rules_accepts_agreeing_duplicates() {
        let table =
            MixingRuleTable::from_rules([(RED, BLUE, PURPLE), (BLUE, RED, PURPLE)]).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_restrictive_policy() {
        let policy = MixPolicy::Restrictive;
        assert!(policy.can_mix(&RED, &BLUE, &WHITE));
        assert!(!policy.can_mix(&RED, &RED, &WHITE));
        assert!(!policy.can_mix(&WHITE, &BLUE, &WHITE));
        assert!(!policy.can_mix(&RED, &WHITE, &WHITE));
    }

    #[test]
    fn test_permissive_policy() {
        let policy = MixPolicy::Permissive;
        assert!(policy.can_mix(&RED, &RED, &WHITE));
        assert!(policy.can_mix(&WHITE, &BLUE, &WHITE));
    }
}
