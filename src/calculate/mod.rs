//! Statistics calculation.
//!
//! Folds a finished game into players' lifetime counters.

use serde::{Deserialize, Serialize};

use crate::models::PlayerAggregateStats;

/// Result of a game from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Win,
    Loss,
    Draw,
}

impl MatchOutcome {
    /// Outcome for the given team (1 or 2) from the final score.
    pub fn for_team(team_number: u8, score_team1: u32, score_team2: u32) -> Self {
        let (own, other) = if team_number == 1 {
            (score_team1, score_team2)
        } else {
            (score_team2, score_team1)
        };

        match own.cmp(&other) {
            std::cmp::Ordering::Greater => MatchOutcome::Win,
            std::cmp::Ordering::Less => MatchOutcome::Loss,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::Win => write!(f, "win"),
            MatchOutcome::Loss => write!(f, "loss"),
            MatchOutcome::Draw => write!(f, "draw"),
        }
    }
}

/// Add one played game to a player's counters.
pub fn apply_match(
    stats: &PlayerAggregateStats,
    outcome: MatchOutcome,
    goals: u32,
    assists: u32,
) -> PlayerAggregateStats {
    let mut next = *stats;
    next.total_games += 1;
    next.total_goals += goals;
    next.total_assists += assists;
    match outcome {
        MatchOutcome::Win => next.wins += 1,
        MatchOutcome::Loss => next.losses += 1,
        MatchOutcome::Draw => next.draws += 1,
    }
    next
}

/// Calculate win rate from wins/losses/draws.
pub fn calculate_win_rate(wins: u32, losses: u32, draws: u32) -> f64 {
    let total = wins + losses + draws;
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64
    }
}
