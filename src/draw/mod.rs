//! Team balancing.
//!
//! A draw splits the confirmed players of a game into two teams of equal
//! size. Players are scored from their lifetime statistics, sorted strongest
//! first, and placed one at a time on the team where the combined cost of
//! strength gap, position imbalance and recently repeated teammates is
//! lowest.

pub mod engine;
pub mod jitter;
pub mod pairing;
pub mod strength;

pub use engine::{assign_teams, draw_teams, position_imbalance, teammate_penalty, Side, Teams};
pub use jitter::{Jitter, NoJitter, RandomJitter};
pub use pairing::{count_pairs, PairCounts, PairKey};
pub use strength::{base_strength, score_candidates, Candidate};

use thiserror::Error;

use crate::models::DrawResult;
use crate::sources::SourceError;

/// Errors that can occur during a draw.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Need {required} confirmed players, have {confirmed}")]
    InsufficientPlayers { required: usize, confirmed: usize },

    #[error("Invalid team size: {0}")]
    InvalidTeamSize(usize),

    #[error("Game is finished; drawing is disabled")]
    GameFinished,

    #[error("Teams already drawn; overwrite must be confirmed")]
    AlreadyDrawn,

    #[error("Failed to load game: {0}")]
    Source(#[from] SourceError),

    #[error("Draw computed but not saved: {source}")]
    Persistence {
        result: Box<DrawResult>,
        source: SourceError,
    },
}

impl DrawError {
    /// How many more confirmed players are needed, for `InsufficientPlayers`.
    pub fn shortfall(&self) -> Option<usize> {
        match self {
            DrawError::InsufficientPlayers {
                required,
                confirmed,
            } => Some(required.saturating_sub(*confirmed)),
            _ => None,
        }
    }

    /// The computed result when only saving it failed.
    pub fn into_unsaved_result(self) -> Option<DrawResult> {
        match self {
            DrawError::Persistence { result, .. } => Some(*result),
            _ => None,
        }
    }
}
