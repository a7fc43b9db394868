//! Card color state and the holder that the tracker reads it from

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::snapshot::EntitySnapshot;
use crate::color::palette::{Color, WHITE};
use crate::core::types::{EntityId, Seconds};

/// Color carried by a card
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "color", rename_all = "snake_case")]
pub enum ColorState {
    /// Fresh card, never dipped in a pot
    #[default]
    Uncolored,
    Colored(Color),
}

impl ColorState {
    pub fn color(&self) -> Option<Color> {
        match self {
            ColorState::Uncolored => None,
            ColorState::Colored(color) => Some(*color),
        }
    }

    pub fn is_colored(&self) -> bool {
        matches!(self, ColorState::Colored(_))
    }

    /// Color to show for the card; uncolored cards are plain white
    pub fn display_color(&self) -> Color {
        self.color().unwrap_or(WHITE)
    }
}

impl std::fmt::Display for ColorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorState::Uncolored => f.write_str("uncolored"),
            ColorState::Colored(color) => write!(f, "{}", color),
        }
    }
}

/// Read access to card colors, as needed by the proximity tracker
pub trait ColorStateSource {
    /// Current state of a card; unknown cards are uncolored
    fn color_state(&self, id: EntityId) -> ColorState;

    fn is_colored(&self, id: EntityId) -> bool {
        self.color_state(id).is_colored()
    }

    /// Whether the card has been continuously visible and held its current
    /// color long enough to take part in a mix
    fn is_stable(&self, id: EntityId, now: Seconds) -> bool;
}

#[derive(Debug, Clone)]
struct CardRecord {
    state: ColorState,
    /// When `state` last changed
    color_since: Seconds,
    /// Start of the current visible stretch, None while untracked
    visible_since: Option<Seconds>,
}

/// Cards currently known to the scene and their colors
#[derive(Debug, Clone)]
pub struct CardRegistry {
    cards: AHashMap<EntityId, CardRecord>,
    stability_window: Seconds,
}

/// Changes in card membership caused by one snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardChanges {
    pub added: Vec<EntityId>,
    pub removed: Vec<EntityId>,
}

impl CardRegistry {
    pub fn new(stability_window: Seconds) -> Self {
        Self {
            cards: AHashMap::new(),
            stability_window,
        }
    }

    /// Sync membership and visibility with this tick's detections
    ///
    /// Cards missing from the snapshot are forgotten, along with their color.
    pub fn observe(&mut self, now: Seconds, snapshot: &EntitySnapshot) -> CardChanges {
        let mut changes = CardChanges::default();

        for (id, sample) in snapshot.iter() {
            let record = self.cards.entry(id).or_insert_with(|| {
                changes.added.push(id);
                CardRecord {
                    state: ColorState::Uncolored,
                    color_since: now,
                    visible_since: None,
                }
            });

            match (sample.tracked, record.visible_since) {
                (true, None) => record.visible_since = Some(now),
                (false, Some(_)) => record.visible_since = None,
                _ => {}
            }
        }

        self.cards.retain(|id, _| {
            let keep = snapshot.contains(*id);
            if !keep {
                changes.removed.push(*id);
            }
            keep
        });
        changes.removed.sort();

        changes
    }

    /// Give a card a new color, returning false if it already had it or is unknown
    pub fn apply_color(&mut self, id: EntityId, color: Color, now: Seconds) -> bool {
        let Some(record) = self.cards.get_mut(&id) else {
            tracing::debug!("Ignoring color for unknown card {}", id);
            return false;
        };
        let next = ColorState::Colored(color);
        if record.state == next {
            return false;
        }
        tracing::info!("Card {} color changing from {} to {}", id, record.state, color);
        record.state = next;
        record.color_since = now;
        true
    }

    /// Return a card to the uncolored state
    pub fn reset_color(&mut self, id: EntityId, now: Seconds) -> bool {
        match self.cards.get_mut(&id) {
            Some(record) if record.state.is_colored() => {
                record.state = ColorState::Uncolored;
                record.color_since = now;
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.cards.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Known card ids in ascending order
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.cards.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn stability_window(&self) -> Seconds {
        self.stability_window
    }
}

impl ColorStateSource for CardRegistry {
    fn color_state(&self, id: EntityId) -> ColorState {
        self.cards
            .get(&id)
            .map(|record| record.state)
            .unwrap_or_default()
    }

    fn is_stable(&self, id: EntityId, now: Seconds) -> bool {
        let Some(record) = self.cards.get(&id) else {
            return false;
        };
        let Some(visible_since) = record.visible_since else {
            return false;
        };
        now - visible_since >= self.stability_window
            && now - record.color_since >= self.stability_window
    }
}
