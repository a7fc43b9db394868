use serde::{Deserialize, Serialize};

use crate::core::types::EntityId;

/// Unordered pair of two distinct cards, stored lower id first
///
/// `PairKey::new(a, b) == PairKey::new(b, a)`, so a pair can only ever map to
/// one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    low: EntityId,
    high: EntityId,
}

impl PairKey {
    /// Canonical pair of `a` and `b`, or None for a self-pair
    pub fn new(a: EntityId, b: EntityId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> EntityId {
        self.low
    }

    pub fn high(&self) -> EntityId {
        self.high
    }

    /// The member that is not `id`
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if id == self.low {
            Some(self.high)
        } else if id == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_order_independent() {
        let ab = PairKey::new(EntityId(4), EntityId(1)).unwrap();
        let ba = PairKey::new(EntityId(1), EntityId(4)).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.low(), EntityId(1));
        assert_eq!(ab.high(), EntityId(4));
    }

    #[test]
    fn test_self_pair_is_rejected() {
        assert_eq!(PairKey::new(EntityId(3), EntityId(3)), None);
    }

    #[test]
    fn test_other_member() {
        let pair = PairKey::new(EntityId(1), EntityId(2)).unwrap();
        assert_eq!(pair.other(EntityId(1)), Some(EntityId(2)));
        assert_eq!(pair.other(EntityId(2)), Some(EntityId(1)));
        assert_eq!(pair.other(EntityId(3)), None);
        assert_eq!(pair.to_string(), "#1+#2");
    }
}
