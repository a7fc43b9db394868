//! Scene - orchestrates one tick of the tabletop
//!
//! This is the loop that ties together:
//! card observation -> pot recoloring -> proximity tracking -> object spawning
//!
//! Each step consumes one detection snapshot and returns everything that
//! happened, in order, for the presentation layer and the log.

use serde::Serialize;

use crate::cards::pots::{apply_pot_contacts, ColorPot, Recolor};
use crate::cards::snapshot::EntitySnapshot;
use crate::cards::state::CardRegistry;
use crate::color::category::SpawnCategory;
use crate::color::engine::MixingEngine;
use crate::color::palette::Color;
use crate::core::config::KasaneConfig;
use crate::core::error::Result;
use crate::core::types::{EntityId, Seconds, Vec3};
use crate::spawn::animation::ScaleAnimation;
use crate::spawn::registry::{ObjectId, SpawnRegistry, SpawnedObject};
use crate::tracker::effects::{EffectHost, EffectPool};
use crate::tracker::events::{MixEvent, SpawnEvent};
use crate::tracker::proximity::ProximityTracker;

/// Events generated during a scene step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneEvent {
    /// The very first card entered the scene (pots can be laid out now)
    FirstCardDetected { card: EntityId },
    CardAdded { card: EntityId },
    /// A card left the scene and lost its color
    CardRemoved { card: EntityId },
    CardRecolored(Recolor),
    Mix(MixEvent),
    ObjectSpawned {
        id: ObjectId,
        category: SpawnCategory,
        position: Vec3,
    },
    ObjectsCleared { count: usize },
}

pub struct Scene<H: EffectHost = EffectPool> {
    config: KasaneConfig,
    cards: CardRegistry,
    pots: Vec<ColorPot>,
    tracker: ProximityTracker,
    spawned: SpawnRegistry,
    effects: H,
    first_card_seen: bool,
    now: Seconds,
}

impl Scene<EffectPool> {
    /// Scene with an in-memory effect pool
    pub fn new(config: KasaneConfig) -> Result<Self> {
        Self::with_effects(config, EffectPool::new())
    }
}

impl<H: EffectHost> Scene<H> {
    pub fn with_effects(config: KasaneConfig, effects: H) -> Result<Self> {
        config.validate()?;
        let engine = MixingEngine::from_config(&config.mixing)?;
        Ok(Self {
            cards: CardRegistry::new(config.tracker.stability_window),
            pots: Vec::new(),
            tracker: ProximityTracker::new(config.tracker.clone(), engine),
            spawned: SpawnRegistry::new(),
            effects,
            first_card_seen: false,
            now: 0.0,
            config,
        })
    }

    /// Place a pot using the configured activation radius
    pub fn add_pot(&mut self, color: Color, position: Vec3) -> usize {
        self.pots.push(ColorPot::new(
            color,
            position,
            self.config.scene.pot_activation_radius,
        ));
        self.pots.len() - 1
    }

    pub fn clear_pots(&mut self) {
        self.pots.clear();
    }

    /// Advance the scene to `now` with this tick's detections
    pub fn step(&mut self, now: Seconds, snapshot: &EntitySnapshot) -> Vec<SceneEvent> {
        if now < self.now {
            tracing::warn!("Scene time went backwards ({} -> {})", self.now, now);
        }
        self.now = now;

        let mut events = Vec::new();

        let changes = self.cards.observe(now, snapshot);
        if !self.first_card_seen {
            if let Some(&card) = changes.added.first() {
                self.first_card_seen = true;
                tracing::info!("First card detected: {}", card);
                events.push(SceneEvent::FirstCardDetected { card });
            }
        }
        events.extend(changes.added.into_iter().map(|card| SceneEvent::CardAdded { card }));
        events.extend(
            changes
                .removed
                .into_iter()
                .map(|card| SceneEvent::CardRemoved { card }),
        );

        let recolored = apply_pot_contacts(
            now,
            snapshot,
            &self.pots,
            &mut self.cards,
            self.config.scene.reset_to_neutral_first,
        );
        events.extend(recolored.into_iter().map(SceneEvent::CardRecolored));

        let report = self
            .tracker
            .evaluate(now, snapshot, &self.cards, &mut self.effects);

        for event in report.events {
            let spawned = match &event {
                MixEvent::DwellCompleted(spawn) => self.register_spawn(now, spawn),
                _ => None,
            };
            events.push(SceneEvent::Mix(event));
            events.extend(spawned);
        }

        events
    }

    fn register_spawn(&mut self, now: Seconds, spawn: &SpawnEvent) -> Option<SceneEvent> {
        let Some(category) = spawn.category else {
            tracing::debug!("Mix color {} matches no object, nothing spawned", spawn.color);
            return None;
        };
        let growth = ScaleAnimation::new(
            now,
            self.config.scene.spawn_grow_duration,
            self.config.scene.spawn_scale,
        );
        let id = self.spawned.register(spawn, category, growth);
        Some(SceneEvent::ObjectSpawned {
            id,
            category,
            position: spawn.position,
        })
    }

    /// Remove every spawned object (the external "clear all" gesture)
    pub fn clear_spawned(&mut self) -> (Vec<SpawnedObject>, SceneEvent) {
        let removed = self.spawned.clear_all();
        let event = SceneEvent::ObjectsCleared {
            count: removed.len(),
        };
        (removed, event)
    }

    /// End every session and release their effects
    pub fn reset_sessions(&mut self) -> Vec<SceneEvent> {
        self.tracker
            .reset(self.now, &mut self.effects)
            .events
            .into_iter()
            .map(SceneEvent::Mix)
            .collect()
    }

    pub fn cards(&self) -> &CardRegistry {
        &self.cards
    }

    /// Mutable card access, for colors set outside of pots
    pub fn cards_mut(&mut self) -> &mut CardRegistry {
        &mut self.cards
    }

    pub fn pots(&self) -> &[ColorPot] {
        &self.pots
    }

    pub fn tracker(&self) -> &ProximityTracker {
        &self.tracker
    }

    pub fn spawned(&self) -> &SpawnRegistry {
        &self.spawned
    }

    pub fn effects(&self) -> &H {
        &self.effects
    }

    pub fn config(&self) -> &KasaneConfig {
        &self.config
    }

    pub fn now(&self) -> Seconds {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::snapshot::CardSample;
    use crate::cards::state::{ColorState, ColorStateSource};
    use crate::color::palette::{BLUE, RED};

    fn config() -> KasaneConfig {
        let mut config = KasaneConfig::default();
        config.tracker.overlap_distance = 0.03;
        config.tracker.dwell_duration = 1.0;
        config.tracker.stability_window = 0.5;
        config
    }

    fn snapshot(cards: &[(u64, Vec3)]) -> EntitySnapshot {
        cards
            .iter()
            .map(|&(id, pos)| (EntityId(id), CardSample::tracked(pos)))
            .collect()
    }

    #[test]
    fn test_first_card_detected_once() {
        let mut scene = Scene::new(config()).unwrap();
        let events = scene.step(0.0, &snapshot(&[(3, Vec3::ZERO), (1, Vec3::X)]));
        assert_eq!(events[0], SceneEvent::FirstCardDetected { card: EntityId(1) });

        let events = scene.step(0.1, &snapshot(&[(3, Vec3::ZERO), (1, Vec3::X), (4, Vec3::Y)]));
        assert!(!events
            .iter()
            .any(|e| matches!(e, SceneEvent::FirstCardDetected { .. })));
        assert!(events.contains(&SceneEvent::CardAdded { card: EntityId(4) }));
    }

    #[test]
    fn test_pot_recolor_then_mix_then_spawn() {
        let mut scene = Scene::new(config()).unwrap();
        scene.add_pot(RED, Vec3::new(1.0, 0.0, 0.0));
        scene.add_pot(BLUE, Vec3::new(2.0, 0.0, 0.0));

        // Dip each card in its pot
        let dipped = snapshot(&[(1, Vec3::new(1.0, 0.0, 0.0)), (2, Vec3::new(2.0, 0.0, 0.0))]);
        let events = scene.step(0.0, &dipped);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SceneEvent::CardRecolored(_)))
                .count(),
            2
        );
        assert_eq!(scene.cards().color_state(EntityId(1)), ColorState::Colored(RED));

        // Bring them together; too fresh to mix until the stability window passes
        let together = snapshot(&[(1, Vec3::ZERO), (2, Vec3::new(0.02, 0.0, 0.0))]);
        assert!(scene.step(0.25, &together).is_empty());
        let events = scene.step(0.5, &together);
        assert!(matches!(events[0], SceneEvent::Mix(MixEvent::SessionStarted { .. })));

        scene.step(1.0, &together);
        let events = scene.step(1.5, &together);
        let spawned: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SceneEvent::ObjectSpawned { category, .. } => Some(*category),
                _ => None,
            })
            .collect();
        assert_eq!(spawned, vec![SpawnCategory::Purple]);
        assert_eq!(scene.spawned().len(), 1);

        let (removed, event) = scene.clear_spawned();
        assert_eq!(removed.len(), 1);
        assert_eq!(event, SceneEvent::ObjectsCleared { count: 1 });
        assert!(scene.spawned().is_empty());
    }

    #[test]
    fn test_reset_sessions_releases_effects() {
        let mut config = config();
        config.tracker.stability_window = 0.0;
        let mut scene = Scene::new(config).unwrap();
        let cards = snapshot(&[(1, Vec3::ZERO), (2, Vec3::new(0.01, 0.0, 0.0))]);
        scene.step(0.0, &cards);
        scene.cards_mut().apply_color(EntityId(1), RED, 0.0);
        scene.cards_mut().apply_color(EntityId(2), BLUE, 0.0);
        scene.step(0.1, &cards);
        assert_eq!(scene.effects().len(), 1);

        let events = scene.reset_sessions();
        assert_eq!(events.len(), 1);
        assert!(scene.effects().is_empty());
    }

    #[test]
    fn test_stability_window_gates_mixing_through_cards() {
        let mut scene = Scene::new(config()).unwrap();
        assert_eq!(scene.cards().stability_window(), 0.5);

        let cards = snapshot(&[(1, Vec3::ZERO), (2, Vec3::new(0.01, 0.0, 0.0))]);
        scene.step(0.0, &cards);
        scene.cards_mut().apply_color(EntityId(1), RED, 0.0);
        scene.cards_mut().apply_color(EntityId(2), BLUE, 0.0);

        assert!(scene.step(0.25, &cards).is_empty());
        let events = scene.step(0.5, &cards);
        assert!(matches!(events[0], SceneEvent::Mix(MixEvent::SessionStarted { .. })));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = config();
        config.tracker.overlap_distance = -1.0;
        assert!(Scene::new(config).is_err());
    }
}
