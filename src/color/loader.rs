//! Load mixing rule tables from TOML files
//!
//! ```toml
//! base = "classic"          # optional built-in set underneath the file's rules
//!
//! [[rule]]
//! a = "red"
//! b = "white"
//! result = [1.0, 0.6, 0.6]  # overrides the base entry for the same pair
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::palette::Color;
use super::rules::{MixingRuleTable, RuleSet};
use crate::core::error::{KasaneError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    base: Option<RuleSet>,
    #[serde(default, rename = "rule")]
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleEntry {
    a: Color,
    b: Color,
    result: Color,
}

/// Load a rule table from a TOML file
pub fn load_rule_table(path: &Path) -> Result<MixingRuleTable> {
    let content = fs::read_to_string(path)?;
    parse_rule_table(&content).map_err(|e| match e {
        KasaneError::InvalidRule(msg) => {
            KasaneError::InvalidRule(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Parse a rule table from TOML text
pub fn parse_rule_table(content: &str) -> Result<MixingRuleTable> {
    let file: RuleFile = toml::from_str(content)?;

    let mut triples: Vec<(Color, Color, Color)> = file
        .rules
        .into_iter()
        .map(|entry| (entry.a, entry.b, entry.result))
        .collect();

    // Validate the file's own entries before layering the base underneath
    let explicit = MixingRuleTable::from_rules(triples.iter().copied())?;

    if let Some(base) = file.base {
        triples.extend(
            base.rules()
                .into_iter()
                .filter(|(a, b, _)| explicit.get(a, b).is_none()),
        );
    }

    if triples.is_empty() {
        return Err(KasaneError::InvalidRule(
            "rule file defines no rules and no base set".into(),
        ));
    }

    MixingRuleTable::from_rules(triples)
}
