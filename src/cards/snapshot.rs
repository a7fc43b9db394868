//! Per-tick view of the cards reported by the detection layer

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, Vec3};

/// Detection result for one card on one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardSample {
    /// World position of the card's center
    pub position: Vec3,
    /// Whether the detector is actively tracking the card this tick
    pub tracked: bool,
}

impl CardSample {
    pub fn tracked(position: Vec3) -> Self {
        Self {
            position,
            tracked: true,
        }
    }

    pub fn lost(position: Vec3) -> Self {
        Self {
            position,
            tracked: false,
        }
    }
}

/// All cards present this tick, keyed and iterated in ascending id order
#[derive(Debug, Clone, Default)]
pub struct EntitySnapshot {
    cards: BTreeMap<EntityId, CardSample>,
}

impl EntitySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a card, returning the previous sample
    pub fn insert(&mut self, id: EntityId, sample: CardSample) -> Option<CardSample> {
        self.cards.insert(id, sample)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<CardSample> {
        self.cards.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&CardSample> {
        self.cards.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut CardSample> {
        self.cards.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.cards.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &CardSample)> + '_ {
        self.cards.iter().map(|(id, sample)| (*id, sample))
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.cards.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl FromIterator<(EntityId, CardSample)> for EntitySnapshot {
    /// Later entries for the same id replace earlier ones
    fn from_iter<I: IntoIterator<Item = (EntityId, CardSample)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (id, sample) in iter {
            if snapshot.insert(id, sample).is_some() {
                tracing::debug!("Duplicate detection for card {}, keeping the latest", id);
            }
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_is_sorted_by_id() {
        let snapshot: EntitySnapshot = [
            (EntityId(9), CardSample::tracked(Vec3::ZERO)),
            (EntityId(2), CardSample::tracked(Vec3::X)),
            (EntityId(5), CardSample::lost(Vec3::Y)),
        ]
        .into_iter()
        .collect();

        let ids: Vec<u64> = snapshot.ids().map(|id| id.0).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn test_duplicate_ids_keep_latest() {
        let snapshot: EntitySnapshot = [
            (EntityId(1), CardSample::tracked(Vec3::ZERO)),
            (EntityId(1), CardSample::lost(Vec3::X)),
        ]
        .into_iter()
        .collect();

        assert_eq!(snapshot.len(), 1);
        let sample = snapshot.get(EntityId(1)).unwrap();
        assert!(!sample.tracked);
        assert_eq!(sample.position, Vec3::X);
    }
}
