//! Color pots: touching a tracked card to a pot gives the card its color

use serde::{Deserialize, Serialize};

use super::snapshot::EntitySnapshot;
use super::state::{CardRegistry, ColorState, ColorStateSource};
use crate::color::palette::Color;
use crate::core::types::{is_finite_position, EntityId, Seconds, Vec3};

/// A pot of paint at a fixed world position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorPot {
    pub color: Color,
    pub position: Vec3,
    /// Cards closer than this pick up the pot's color
    pub activation_radius: f32,
}

impl ColorPot {
    pub fn new(color: Color, position: Vec3, activation_radius: f32) -> Self {
        Self {
            color,
            position,
            activation_radius,
        }
    }

    pub fn touches(&self, card_position: Vec3) -> bool {
        card_position.distance(self.position) < self.activation_radius
    }
}

/// A card that changed color by touching a pot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recolor {
    pub card: EntityId,
    /// Index of the pot in the list passed to `apply_pot_contacts`
    pub pot: usize,
    pub from: ColorState,
    pub to: Color,
}

/// Recolor every tracked card touching a pot
///
/// The first pot in list order that the card touches wins. A card that
/// already has that pot's color is left alone. With `reset_first`, a colored
/// card passes through the uncolored state before taking the new color.
pub fn apply_pot_contacts(
    now: Seconds,
    snapshot: &EntitySnapshot,
    pots: &[ColorPot],
    cards: &mut CardRegistry,
    reset_first: bool,
) -> Vec<Recolor> {
    let mut recolored = Vec::new();

    for (id, sample) in snapshot.iter() {
        if !sample.tracked || !is_finite_position(sample.position) {
            continue;
        }

        let Some((pot_index, pot)) = pots
            .iter()
            .enumerate()
            .find(|(_, pot)| pot.touches(sample.position))
        else {
            continue;
        };

        let from = cards.color_state(id);
        if from == ColorState::Colored(pot.color) {
            continue;
        }

        if reset_first && cards.reset_color(id, now) {
            tracing::debug!("Card {} reset to uncolored before recoloring", id);
        }

        if cards.apply_color(id, pot.color, now) {
            recolored.push(Recolor {
                card: id,
                pot: pot_index,
                from,
                to: pot.color,
            });
        }
    }

    recolored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::snapshot::CardSample;
    use crate::color::palette::{BLUE, RED};

    fn setup() -> (EntitySnapshot, CardRegistry) {
        let snapshot: EntitySnapshot = [
            (EntityId(1), CardSample::tracked(Vec3::new(0.0, 0.0, 0.0))),
            (EntityId(2), CardSample::tracked(Vec3::new(1.0, 0.0, 0.0))),
            (EntityId(3), CardSample::lost(Vec3::new(0.01, 0.0, 0.0))),
        ]
        .into_iter()
        .collect();
        let mut cards = CardRegistry::new(0.0);
        cards.observe(0.0, &snapshot);
        (snapshot, cards)
    }

    #[test]
    fn test_card_touching_pot_takes_color() {
        let (snapshot, mut cards) = setup();
        let pots = [ColorPot::new(RED, Vec3::new(0.02, 0.0, 0.0), 0.045)];

        let recolored = apply_pot_contacts(0.0, &snapshot, &pots, &mut cards, false);
        assert_eq!(recolored.len(), 1);
        assert_eq!(recolored[0].card, EntityId(1));
        assert_eq!(recolored[0].from, ColorState::Uncolored);
        assert_eq!(cards.color_state(EntityId(1)), ColorState::Colored(RED));

        // Untracked card 3 is in range but ignored
        assert!(!cards.is_colored(EntityId(3)));
    }

    #[test]
    fn test_same_color_is_not_reapplied() {
        let (snapshot, mut cards) = setup();
        let pots = [ColorPot::new(RED, Vec3::ZERO, 0.045)];
        apply_pot_contacts(0.0, &snapshot, &pots, &mut cards, false);
        let again = apply_pot_contacts(0.1, &snapshot, &pots, &mut cards, false);
        assert!(again.is_empty());
    }

    #[test]
    fn test_first_pot_wins() {
        let (snapshot, mut cards) = setup();
        let pots = [
            ColorPot::new(BLUE, Vec3::new(0.0, 0.0, 0.01), 0.045),
            ColorPot::new(RED, Vec3::ZERO, 0.045),
        ];
        let recolored = apply_pot_contacts(0.0, &snapshot, &pots, &mut cards, false);
        assert_eq!(recolored[0].pot, 0);
        assert_eq!(cards.color_state(EntityId(1)), ColorState::Colored(BLUE));
    }

    #[test]
    fn test_recolor_with_reset_first() {
        let (snapshot, mut cards) = setup();
        cards.apply_color(EntityId(1), BLUE, 0.0);
        let pots = [ColorPot::new(RED, Vec3::ZERO, 0.045)];
        let recolored = apply_pot_contacts(0.5, &snapshot, &pots, &mut cards, true);
        assert_eq!(recolored[0].from, ColorState::Colored(BLUE));
        assert_eq!(cards.color_state(EntityId(1)), ColorState::Colored(RED));
    }
}
