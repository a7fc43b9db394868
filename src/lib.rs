//! Kasane - tabletop card tracking with proximity-driven color mixing

pub mod cards;
pub mod color;
pub mod core;
pub mod simulation;
pub mod spawn;
pub mod tracker;
