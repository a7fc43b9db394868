//! Proximity session tracker: detects overlapping card pairs and drives their mixes

pub mod effects;
pub mod events;
pub mod pair;
pub mod proximity;
pub mod session;

pub use effects::{EffectHost, EffectInstance, EffectPool, NullEffects};
pub use events::{EndReason, MixEvent, SpawnEvent, TickReport};
pub use pair::PairKey;
pub use proximity::ProximityTracker;
pub use session::{effect_position, EffectHandle, MixSession};
