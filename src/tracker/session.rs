//! Mix session state for one overlapping pair

use serde::{Deserialize, Serialize};

use crate::color::palette::Color;
use crate::core::types::{Seconds, Vec3};

/// Opaque reference to an effect instance owned by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectHandle(pub u64);

/// Where the mixing effect of two cards sits: their midpoint, raised to
/// `height_offset` above the higher card
pub fn effect_position(a: Vec3, b: Vec3, height_offset: f32) -> Vec3 {
    let mut position = (a + b) * 0.5;
    position.y = a.y.max(b.y) + height_offset;
    position
}

/// In-progress mix of an overlapping pair
#[derive(Debug, Clone)]
pub struct MixSession {
    created_at: Seconds,
    /// Resolved once on creation
    mixed_color: Color,
    positions: (Vec3, Vec3),
    effect_position: Vec3,
    /// Only ever goes false -> true
    spawned: bool,
    effect: Option<EffectHandle>,
}

impl MixSession {
    pub(crate) fn new(
        created_at: Seconds,
        mixed_color: Color,
        positions: (Vec3, Vec3),
        effect_position: Vec3,
        effect: Option<EffectHandle>,
    ) -> Self {
        Self {
            created_at,
            mixed_color,
            positions,
            effect_position,
            spawned: false,
            effect,
        }
    }

    pub(crate) fn refresh(&mut self, positions: (Vec3, Vec3), effect_position: Vec3) {
        self.positions = positions;
        self.effect_position = effect_position;
    }

    /// Mark the dwell spawn as fired; returns false if it already had
    pub(crate) fn mark_spawned(&mut self) -> bool {
        !std::mem::replace(&mut self.spawned, true)
    }

    pub fn created_at(&self) -> Seconds {
        self.created_at
    }

    pub fn age(&self, now: Seconds) -> Seconds {
        now - self.created_at
    }

    pub fn mixed_color(&self) -> Color {
        self.mixed_color
    }

    /// Last known positions of the low and high member
    pub fn positions(&self) -> (Vec3, Vec3) {
        self.positions
    }

    pub fn effect_position(&self) -> Vec3 {
        self.effect_position
    }

    pub fn spawned(&self) -> bool {
        self.spawned
    }

    pub fn effect(&self) -> Option<EffectHandle> {
        self.effect
    }
}
