//! Rosters of previously drawn games.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Game, GameId, IdentityKey};

/// Who played on which side in a past drawn game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentGame {
    pub game_id: GameId,
    pub date: NaiveDate,
    pub team1: Vec<IdentityKey>,
    pub team2: Vec<IdentityKey>,
}

impl RecentGame {
    /// Build the roster record from a game's current team assignment.
    pub fn from_game(game: &Game) -> Self {
        let keys = |team: u8| {
            game.team(team)
                .into_iter()
                .map(|p| p.identity_key())
                .collect::<Vec<_>>()
        };

        Self {
            game_id: game.id.clone(),
            date: game.date,
            team1: keys(1),
            team2: keys(2),
        }
    }
}
