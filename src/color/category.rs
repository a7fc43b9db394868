//! Reverse lookup from a mixed color to the kind of object it spawns

use serde::{Deserialize, Serialize};

use super::palette::{
    Color, BLUE, BROWN, GREEN, LEAF_GREEN, LIGHT_BLUE, LIGHT_GREEN, LIGHT_YELLOW, LIME, ORANGE,
    PINK, PURPLE, RED, TEAL, WHITE, YELLOW,
};

/// Object kinds that a finished mix can spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnCategory {
    Purple,
    Orange,
    Brown,
    Green,
    Teal,
    LimeGreen,
    Pink,
    LightBlue,
    LightGreen,
    LightYellow,
    Red,
    Blue,
    Yellow,
    BrightGreen,
    White,
}

impl SpawnCategory {
    pub fn name(&self) -> &'static str {
        match self {
            SpawnCategory::Purple => "purple",
            SpawnCategory::Orange => "orange",
            SpawnCategory::Brown => "brown",
            SpawnCategory::Green => "green",
            SpawnCategory::Teal => "teal",
            SpawnCategory::LimeGreen => "lime_green",
            SpawnCategory::Pink => "pink",
            SpawnCategory::LightBlue => "light_blue",
            SpawnCategory::LightGreen => "light_green",
            SpawnCategory::LightYellow => "light_yellow",
            SpawnCategory::Red => "red",
            SpawnCategory::Blue => "blue",
            SpawnCategory::Yellow => "yellow",
            SpawnCategory::BrightGreen => "bright_green",
            SpawnCategory::White => "white",
        }
    }
}

impl std::fmt::Display for SpawnCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered list of categories and their reference colors
///
/// Order matters: `classify` returns the first entry within tolerance.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: Vec<(SpawnCategory, Color)>,
}

impl CategoryTable {
    pub fn new(entries: Vec<(SpawnCategory, Color)>) -> Self {
        Self { entries }
    }

    /// First category whose reference color differs from `color` by less than
    /// `tolerance` on every rgb channel
    pub fn classify(&self, color: &Color, tolerance: f32) -> Option<SpawnCategory> {
        self.entries
            .iter()
            .find(|(_, reference)| color.is_similar(reference, tolerance))
            .map(|(category, _)| *category)
    }

    pub fn entries(&self) -> &[(SpawnCategory, Color)] {
        &self.entries
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(vec![
            (SpawnCategory::Purple, PURPLE),
            (SpawnCategory::Orange, ORANGE),
            (SpawnCategory::Brown, BROWN),
            (SpawnCategory::Green, LEAF_GREEN),
            (SpawnCategory::Teal, TEAL),
            (SpawnCategory::LimeGreen, LIME),
            (SpawnCategory::Pink, PINK),
            (SpawnCategory::LightBlue, LIGHT_BLUE),
            (SpawnCategory::LightGreen, LIGHT_GREEN),
            (SpawnCategory::LightYellow, LIGHT_YELLOW),
            (SpawnCategory::Red, RED),
            (SpawnCategory::Blue, BLUE),
            (SpawnCategory::Yellow, YELLOW),
            (SpawnCategory::BrightGreen, GREEN),
            (SpawnCategory::White, WHITE),
        ])
    }
}
