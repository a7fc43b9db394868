//! Events produced by one tracker evaluation

use serde::Serialize;

use super::pair::PairKey;
use super::session::EffectHandle;
use crate::color::category::SpawnCategory;
use crate::color::palette::Color;
use crate::core::types::{Seconds, Vec3};

/// Why a session was torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Both cards present and valid, but no longer close enough
    Separated,
    /// A card lost tracking, lost its color, or the pair stopped being mixable
    Invalidated,
    /// A card disappeared from the snapshot
    Vanished,
    /// The tracker was reset
    Reset,
}

/// A pair that dwelled long enough to produce an object
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnEvent {
    pub pair: PairKey,
    pub color: Color,
    /// Current effect position (midpoint raised above the cards)
    pub position: Vec3,
    /// None means no object matches the color and nothing should be spawned
    pub category: Option<SpawnCategory>,
    pub at: Seconds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MixEvent {
    SessionStarted {
        pair: PairKey,
        color: Color,
        position: Vec3,
        effect: Option<EffectHandle>,
    },
    SessionMoved {
        pair: PairKey,
        position: Vec3,
    },
    DwellCompleted(SpawnEvent),
    SessionEnded {
        pair: PairKey,
        reason: EndReason,
        spawned: bool,
    },
}

/// Everything one evaluation produced, in emission order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub now: Seconds,
    pub events: Vec<MixEvent>,
}

impl TickReport {
    pub fn spawns(&self) -> impl Iterator<Item = &SpawnEvent> + '_ {
        self.events.iter().filter_map(|event| match event {
            MixEvent::DwellCompleted(spawn) => Some(spawn),
            _ => None,
        })
    }

    pub fn started(&self) -> impl Iterator<Item = PairKey> + '_ {
        self.events.iter().filter_map(|event| match event {
            MixEvent::SessionStarted { pair, .. } => Some(*pair),
            _ => None,
        })
    }

    pub fn ended(&self) -> impl Iterator<Item = (PairKey, EndReason)> + '_ {
        self.events.iter().filter_map(|event| match event {
            MixEvent::SessionEnded { pair, reason, .. } => Some((*pair, *reason)),
            _ => None,
        })
    }
}
