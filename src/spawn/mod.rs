//! Objects produced by completed mixes

pub mod animation;
pub mod registry;

pub use animation::ScaleAnimation;
pub use registry::{ObjectId, SpawnRegistry, SpawnedObject};
