//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

pub use glam::Vec3;

/// Stable identifier of a tracked card, as assigned by the detection layer
///
/// Ordering is significant: pairs and sessions are iterated in ascending
/// id order so repeated runs over identical input emit identical events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scene time in seconds
pub type Seconds = f64;

/// Returns true if every component of the position is finite
#[inline]
pub fn is_finite_position(pos: Vec3) -> bool {
    pos.x.is_finite() && pos.y.is_finite() && pos.z.is_finite()
}
