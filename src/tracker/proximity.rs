//! Pairwise proximity session tracker
//!
//! One `evaluate` call per tick:
//! snapshot -> pair enumeration -> session create/refresh -> dwell spawn -> sweep
//!
//! Cards are visited in ascending id order and sessions are kept in a sorted
//! map, so identical input always yields identical event order.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};

use super::effects::EffectHost;
use super::events::{EndReason, MixEvent, SpawnEvent, TickReport};
use super::pair::PairKey;
use super::session::{effect_position, EffectHandle, MixSession};
use crate::cards::snapshot::{CardSample, EntitySnapshot};
use crate::cards::state::ColorStateSource;
use crate::color::engine::MixingEngine;
use crate::color::palette::Color;
use crate::core::config::TrackerConfig;
use crate::core::deferred::DeferredQueue;
use crate::core::types::{is_finite_position, EntityId, Seconds, Vec3};

/// Outcome of checking one candidate pair this tick
#[derive(Debug, Clone, Copy)]
enum PairState {
    /// Valid and within the overlap distance, with both members' colors
    Overlapping(Color, Color),
    /// Valid but too far apart
    Apart,
    /// Not eligible to mix this tick
    Invalid,
}

pub struct ProximityTracker {
    config: TrackerConfig,
    engine: MixingEngine,
    sessions: BTreeMap<PairKey, MixSession>,
    pending_releases: DeferredQueue<EffectHandle>,
}

impl ProximityTracker {
    pub fn new(config: TrackerConfig, engine: MixingEngine) -> Self {
        Self {
            config,
            engine,
            sessions: BTreeMap::new(),
            pending_releases: DeferredQueue::new(),
        }
    }

    /// Run one tick over the current set of cards
    pub fn evaluate<S, H>(
        &mut self,
        now: Seconds,
        snapshot: &EntitySnapshot,
        colors: &S,
        effects: &mut H,
    ) -> TickReport
    where
        S: ColorStateSource + ?Sized,
        H: EffectHost + ?Sized,
    {
        let mut events = Vec::new();

        for handle in self.pending_releases.drain_due(now) {
            release(effects, handle);
        }

        let cards: Vec<(EntityId, &CardSample)> = snapshot.iter().collect();
        let mut overlapping: AHashSet<PairKey> = AHashSet::new();
        let mut lost: AHashMap<PairKey, EndReason> = AHashMap::new();

        for (i, &(id_a, a)) in cards.iter().enumerate() {
            for &(id_b, b) in &cards[i + 1..] {
                let Some(pair) = PairKey::new(id_a, id_b) else {
                    tracing::debug!("Skipping self-pair for card {}", id_a);
                    continue;
                };

                match self.check_pair(now, pair, a, b, colors) {
                    PairState::Overlapping(color_a, color_b) => {
                        overlapping.insert(pair);
                        self.advance_session(
                            now,
                            pair,
                            (a.position, b.position),
                            (color_a, color_b),
                            effects,
                            &mut events,
                        );
                    }
                    PairState::Apart if self.sessions.contains_key(&pair) => {
                        lost.insert(pair, EndReason::Separated);
                    }
                    PairState::Invalid if self.sessions.contains_key(&pair) => {
                        lost.insert(pair, EndReason::Invalidated);
                    }
                    _ => {}
                }
            }
        }

        // Sessions whose pair was not overlapping this tick, including pairs
        // that were not even candidates because a card is gone
        let ended: Vec<PairKey> = self
            .sessions
            .keys()
            .filter(|pair| !overlapping.contains(pair))
            .copied()
            .collect();

        for pair in ended {
            let reason = lost.get(&pair).copied().unwrap_or(EndReason::Vanished);
            self.end_session(now, pair, reason, effects, &mut events);
        }

        TickReport { now, events }
    }

    fn check_pair<S>(
        &self,
        now: Seconds,
        pair: PairKey,
        a: &CardSample,
        b: &CardSample,
        colors: &S,
    ) -> PairState
    where
        S: ColorStateSource + ?Sized,
    {
        if !a.tracked || !b.tracked {
            return PairState::Invalid;
        }
        if !is_finite_position(a.position) || !is_finite_position(b.position) {
            tracing::debug!("Pair {} has a non-finite position, skipping", pair);
            return PairState::Invalid;
        }

        let (Some(color_a), Some(color_b)) = (
            colors.color_state(pair.low()).color(),
            colors.color_state(pair.high()).color(),
        ) else {
            return PairState::Invalid;
        };

        if !colors.is_stable(pair.low(), now) || !colors.is_stable(pair.high(), now) {
            return PairState::Invalid;
        }

        if !self.engine.can_mix(&color_a, &color_b) {
            return PairState::Invalid;
        }

        if a.position.distance(b.position) < self.config.overlap_distance {
            PairState::Overlapping(color_a, color_b)
        } else {
            PairState::Apart
        }
    }

    /// Create the pair's session if needed, refresh it, and fire the dwell
    /// spawn; creation and refresh share the same dwell check
    fn advance_session<H>(
        &mut self,
        now: Seconds,
        pair: PairKey,
        positions: (Vec3, Vec3),
        colors: (Color, Color),
        effects: &mut H,
        events: &mut Vec<MixEvent>,
    ) where
        H: EffectHost + ?Sized,
    {
        let position = effect_position(positions.0, positions.1, self.config.effect_height_offset);

        let session = match self.sessions.entry(pair) {
            Entry::Vacant(slot) => {
                let color = self.engine.resolve(&colors.0, &colors.1);
                let effect = effects.spawn_effect(pair, color, position);
                tracing::info!(
                    "Started mixing {}: {} + {} = {}",
                    pair,
                    colors.0,
                    colors.1,
                    color
                );
                events.push(MixEvent::SessionStarted {
                    pair,
                    color,
                    position,
                    effect,
                });
                slot.insert(MixSession::new(now, color, positions, position, effect))
            }
            Entry::Occupied(slot) => {
                let session = slot.into_mut();
                session.refresh(positions, position);
                if let Some(handle) = session.effect() {
                    if !effects.move_effect(handle, position) {
                        tracing::debug!("Effect {:?} for {} is gone, not moving it", handle, pair);
                    }
                }
                events.push(MixEvent::SessionMoved { pair, position });
                session
            }
        };

        if session.age(now) >= self.config.dwell_duration && session.mark_spawned() {
            let color = session.mixed_color();
            let category = self.engine.classify(&color);
            tracing::info!(
                "Mix {} completed after {:.2}s: {} -> {}",
                pair,
                session.age(now),
                color,
                category.map_or("nothing", |c| c.name())
            );
            events.push(MixEvent::DwellCompleted(SpawnEvent {
                pair,
                color,
                position,
                category,
                at: now,
            }));
        }
    }

    fn end_session<H>(
        &mut self,
        now: Seconds,
        pair: PairKey,
        reason: EndReason,
        effects: &mut H,
        events: &mut Vec<MixEvent>,
    ) where
        H: EffectHost + ?Sized,
    {
        let Some(session) = self.sessions.remove(&pair) else {
            return;
        };

        if let Some(handle) = session.effect() {
            if self.config.effect_release_delay > 0.0 {
                self.pending_releases
                    .schedule(now + self.config.effect_release_delay, handle);
            } else {
                release(effects, handle);
            }
        }

        tracing::debug!("Session {} ended ({:?})", pair, reason);
        events.push(MixEvent::SessionEnded {
            pair,
            reason,
            spawned: session.spawned(),
        });
    }

    /// End every session and release every effect immediately
    pub fn reset<H>(&mut self, now: Seconds, effects: &mut H) -> TickReport
    where
        H: EffectHost + ?Sized,
    {
        let mut events = Vec::new();
        let pairs: Vec<PairKey> = self.sessions.keys().copied().collect();
        for pair in pairs {
            self.end_session(now, pair, EndReason::Reset, effects, &mut events);
        }
        for handle in self.pending_releases.drain_all() {
            release(effects, handle);
        }
        TickReport { now, events }
    }

    pub fn session(&self, pair: PairKey) -> Option<&MixSession> {
        self.sessions.get(&pair)
    }

    pub fn sessions(&self) -> impl Iterator<Item = (PairKey, &MixSession)> + '_ {
        self.sessions.iter().map(|(pair, session)| (*pair, session))
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Effects waiting for a delayed release
    pub fn pending_releases(&self) -> usize {
        self.pending_releases.len()
    }

    pub fn engine(&self) -> &MixingEngine {
        &self.engine
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}

fn release<H: EffectHost + ?Sized>(effects: &mut H, handle: EffectHandle) {
    if !effects.release_effect(handle) {
        tracing::warn!("Effect {:?} was already released", handle);
    }
}
