//! Registry of objects spawned by finished mixes
//!
//! Owned by the scene and handed to whoever needs it. The external
//! "clear everything" gesture maps to `clear_all`.

use std::collections::BTreeMap;

use serde::Serialize;

use super::animation::ScaleAnimation;
use crate::color::category::SpawnCategory;
use crate::color::palette::Color;
use crate::core::types::{Seconds, Vec3};
use crate::tracker::events::SpawnEvent;
use crate::tracker::pair::PairKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obj-{}", self.0)
    }
}

/// An object placed into the scene by a completed mix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpawnedObject {
    pub id: ObjectId,
    pub category: SpawnCategory,
    pub color: Color,
    pub position: Vec3,
    pub pair: PairKey,
    pub spawned_at: Seconds,
    pub growth: ScaleAnimation,
}

impl SpawnedObject {
    pub fn scale_at(&self, now: Seconds) -> f32 {
        self.growth.scale_at(now)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpawnRegistry {
    objects: BTreeMap<ObjectId, SpawnedObject>,
    next_id: u64,
}

impl SpawnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the object produced by a spawn event
    pub fn register(
        &mut self,
        spawn: &SpawnEvent,
        category: SpawnCategory,
        growth: ScaleAnimation,
    ) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        self.objects.insert(
            id,
            SpawnedObject {
                id,
                category,
                color: spawn.color,
                position: spawn.position,
                pair: spawn.pair,
                spawned_at: spawn.at,
                growth,
            },
        );
        tracing::info!(
            "Registered {} ({}), total objects: {}",
            id,
            category,
            self.objects.len()
        );
        id
    }

    /// Remove one object; unknown ids are ignored
    pub fn unregister(&mut self, id: ObjectId) -> Option<SpawnedObject> {
        let removed = self.objects.remove(&id);
        if removed.is_none() {
            tracing::debug!("Unregister of unknown object {}", id);
        }
        removed
    }

    /// Remove every object, returning them in id order
    pub fn clear_all(&mut self) -> Vec<SpawnedObject> {
        if self.objects.is_empty() {
            tracing::debug!("No objects to remove");
            return Vec::new();
        }
        tracing::info!("Removing {} spawned objects", self.objects.len());
        std::mem::take(&mut self.objects).into_values().collect()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SpawnedObject> {
        self.objects.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpawnedObject> + '_ {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
