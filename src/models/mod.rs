//! Core data models for the racha organizer.

mod game;
mod history;
mod ids;
mod player;
mod stats;

pub use game::*;
pub use history::*;
pub use ids::*;
pub use player::*;
pub use stats::*;
