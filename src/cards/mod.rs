//! Card-side collaborators of the tracker: detections, color state and pots

pub mod pots;
pub mod snapshot;
pub mod state;

pub use pots::{apply_pot_contacts, ColorPot, Recolor};
pub use snapshot::{CardSample, EntitySnapshot};
pub use state::{CardChanges, CardRegistry, ColorState, ColorStateSource};
