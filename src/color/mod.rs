//! Color mixing rule engine

pub mod category;
pub mod engine;
pub mod loader;
pub mod palette;
pub mod rules;

pub use category::{CategoryTable, SpawnCategory};
pub use engine::MixingEngine;
pub use loader::{load_rule_table, parse_rule_table};
pub use palette::Color;
pub use rules::{MixPolicy, MixingRuleTable, RuleSet};
