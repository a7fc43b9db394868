//! Boundary to the presentation layer that draws mixing effects
//!
//! The tracker never owns an effect. It asks the host for one when a session
//! starts, tells it where to move, and signals when to let it go.

use std::collections::BTreeMap;

use serde::Serialize;

use super::pair::PairKey;
use super::session::EffectHandle;
use crate::color::palette::Color;
use crate::core::types::Vec3;

pub trait EffectHost {
    /// Create an effect for a new session; None if the host cannot show one
    fn spawn_effect(&mut self, pair: PairKey, color: Color, position: Vec3)
        -> Option<EffectHandle>;

    /// Move an effect; returns false if the handle is no longer live
    fn move_effect(&mut self, handle: EffectHandle, position: Vec3) -> bool;

    /// Release an effect; returns false if it was already released
    fn release_effect(&mut self, handle: EffectHandle) -> bool;
}

/// Host without any presentation; sessions run without effects
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEffects;

impl EffectHost for NullEffects {
    fn spawn_effect(&mut self, _: PairKey, _: Color, _: Vec3) -> Option<EffectHandle> {
        None
    }

    fn move_effect(&mut self, _: EffectHandle, _: Vec3) -> bool {
        false
    }

    fn release_effect(&mut self, _: EffectHandle) -> bool {
        false
    }
}

/// A live effect as the pool sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectInstance {
    pub pair: PairKey,
    pub color: Color,
    pub position: Vec3,
}

/// In-memory effect host that keeps every live effect addressable
#[derive(Debug, Clone, Default)]
pub struct EffectPool {
    live: BTreeMap<EffectHandle, EffectInstance>,
    next_handle: u64,
}

impl EffectPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: EffectHandle) -> Option<&EffectInstance> {
        self.live.get(&handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectHandle, &EffectInstance)> + '_ {
        self.live.iter().map(|(handle, effect)| (*handle, effect))
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl EffectHost for EffectPool {
    fn spawn_effect(
        &mut self,
        pair: PairKey,
        color: Color,
        position: Vec3,
    ) -> Option<EffectHandle> {
        self.next_handle += 1;
        let handle = EffectHandle(self.next_handle);
        self.live.insert(
            handle,
            EffectInstance {
                pair,
                color,
                position,
            },
        );
        Some(handle)
    }

    fn move_effect(&mut self, handle: EffectHandle, position: Vec3) -> bool {
        match self.live.get_mut(&handle) {
            Some(effect) => {
                effect.position = position;
                true
            }
            None => false,
        }
    }

    fn release_effect(&mut self, handle: EffectHandle) -> bool {
        self.live.remove(&handle).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette::TEAL;
    use crate::core::types::EntityId;

    #[test]
    fn test_pool_lifecycle() {
        let mut pool = EffectPool::new();
        let pair = PairKey::new(EntityId(1), EntityId(2)).unwrap();

        let handle = pool.spawn_effect(pair, TEAL, Vec3::ZERO).unwrap();
        assert_eq!(pool.len(), 1);

        assert!(pool.move_effect(handle, Vec3::Y));
        assert_eq!(pool.get(handle).unwrap().position, Vec3::Y);

        assert!(pool.release_effect(handle));
        assert!(!pool.release_effect(handle));
        assert!(!pool.move_effect(handle, Vec3::X));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut pool = EffectPool::new();
        let pair = PairKey::new(EntityId(1), EntityId(2)).unwrap();
        let first = pool.spawn_effect(pair, TEAL, Vec3::ZERO).unwrap();
        pool.release_effect(first);
        let second = pool.spawn_effect(pair, TEAL, Vec3::ZERO).unwrap();
        assert_ne!(first, second);
    }
}
