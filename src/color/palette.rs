//! Color definitions: the RGBA type, named palette entries and name parsing

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::error::KasaneError;

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorSpec", into = "ColorSpec")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Componentwise average of two colors, alpha included
    pub fn average(&self, other: &Color) -> Color {
        Color {
            r: (self.r + other.r) * 0.5,
            g: (self.g + other.g) * 0.5,
            b: (self.b + other.b) * 0.5,
            a: (self.a + other.a) * 0.5,
        }
    }

    /// Largest per-channel absolute difference over r, g and b
    pub fn channel_distance(&self, other: &Color) -> f32 {
        (self.r - other.r)
            .abs()
            .max((self.g - other.g).abs())
            .max((self.b - other.b).abs())
    }

    /// True if every rgb channel differs by strictly less than `tolerance`
    pub fn is_similar(&self, other: &Color, tolerance: f32) -> bool {
        self.channel_distance(other) < tolerance
    }

    /// Exact, hashable form of this color
    pub fn key(&self) -> ColorKey {
        ColorKey([
            OrderedFloat(self.r),
            OrderedFloat(self.g),
            OrderedFloat(self.b),
            OrderedFloat(self.a),
        ])
    }

    /// Palette name of this color, if it is exactly a named entry
    pub fn name(&self) -> Option<&'static str> {
        NAMED_COLORS
            .iter()
            .find(|(_, c)| c == self)
            .map(|(name, _)| *name)
    }

    /// Parse a palette name (case-insensitive, `-`/space/`_` interchangeable)
    /// or a `#rrggbb` / `#rrggbbaa` hex string
    pub fn parse(text: &str) -> Result<Color, KasaneError> {
        let trimmed = text.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| KasaneError::UnknownColor(text.to_string()));
        }

        let normalized = trimmed.to_ascii_lowercase().replace(['-', ' '], "_");
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| KasaneError::UnknownColor(text.to_string()))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "rgba({:.3}, {:.3}, {:.3}, {:.3})", self.r, self.g, self.b, self.a),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let channel = |i: usize| -> Option<f32> {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
    Some(Color::new(channel(0)?, channel(2)?, channel(4)?, a))
}

/// Bit-exact color used as a map key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorKey(pub [OrderedFloat<f32>; 4]);

/// Serialized forms accepted for a color
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Named(String),
    Rgb([f32; 3]),
    Rgba([f32; 4]),
}

impl TryFrom<ColorSpec> for Color {
    type Error = KasaneError;

    fn try_from(spec: ColorSpec) -> Result<Self, Self::Error> {
        let color = match spec {
            ColorSpec::Named(name) => return Color::parse(&name),
            ColorSpec::Rgb([r, g, b]) => Color::rgb(r, g, b),
            ColorSpec::Rgba([r, g, b, a]) => Color::new(r, g, b, a),
        };
        let channels = [color.r, color.g, color.b, color.a];
        if channels.iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c)) {
            Ok(color)
        } else {
            Err(KasaneError::UnknownColor(format!(
                "channels out of range: {:?}",
                channels
            )))
        }
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        match color.name() {
            Some(name) => ColorSpec::Named(name.to_string()),
            None => ColorSpec::Rgba([color.r, color.g, color.b, color.a]),
        }
    }
}

// Pot colors
pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
/// Slightly warm yellow, as printed on the pot labels
pub const YELLOW: Color = Color::rgb(1.0, 0.92, 0.016);
pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

// Mix results
pub const PURPLE: Color = Color::rgb(0.6, 0.1, 0.8);
pub const ORANGE: Color = Color::rgb(1.0, 0.65, 0.0);
pub const BROWN: Color = Color::rgb(0.6, 0.3, 0.1);
pub const LEAF_GREEN: Color = Color::rgb(0.1, 0.7, 0.2);
pub const TEAL: Color = Color::rgb(0.0, 0.8, 0.8);
pub const LIME: Color = Color::rgb(0.7, 1.0, 0.2);
pub const PINK: Color = Color::rgb(1.0, 0.5, 0.8);
pub const LIGHT_BLUE: Color = Color::rgb(0.2, 0.85, 1.0);
pub const LIGHT_GREEN: Color = Color::rgb(0.5, 1.0, 0.7);
pub const LIGHT_YELLOW: Color = Color::rgb(1.0, 1.0, 0.6);

/// Every named palette entry, in lookup order
pub const NAMED_COLORS: &[(&str, Color)] = &[
    ("white", WHITE),
    ("red", RED),
    ("blue", BLUE),
    ("green", GREEN),
    ("yellow", YELLOW),
    ("black", BLACK),
    ("purple", PURPLE),
    ("orange", ORANGE),
    ("brown", BROWN),
    ("leaf_green", LEAF_GREEN),
    ("teal", TEAL),
    ("lime", LIME),
    ("pink", PINK),
    ("light_blue", LIGHT_BLUE),
    ("light_green", LIGHT_GREEN),
    ("light_yellow", LIGHT_YELLOW),
];
