pub mod config;
pub mod deferred;
pub mod error;
pub mod types;

pub use config::{KasaneConfig, MixingConfig, SceneConfig, TrackerConfig};
pub use deferred::DeferredQueue;
pub use error::{KasaneError, Result};
pub use types::{EntityId, Seconds, Vec3};
