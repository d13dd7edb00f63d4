//! Strength scoring of confirmed players.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::Jitter;
use crate::models::{IdentityKey, Player, PlayerAggregateStats, Position};

/// Skill proxy from lifetime counters, before jitter.
pub fn base_strength(stats: &PlayerAggregateStats) -> f64 {
    f64::from(stats.wins) * 2.0
        + f64::from(stats.total_goals)
        + f64::from(stats.total_assists) * 0.5
        + f64::from(stats.draws) * 0.5
        - f64::from(stats.losses) * 0.5
}

/// A player prepared for one draw.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub player: Player,
    pub key: IdentityKey,
    pub strength: f64,
    pub position: Option<Position>,
}

/// Score every player and sort strongest first.
///
/// Players without a stats entry score as if all counters were zero. The sort
/// is stable, so equal strengths keep their input order.
pub fn score_candidates(
    players: &[Player],
    stats: &HashMap<IdentityKey, PlayerAggregateStats>,
    strength_jitter: f64,
    jitter: &mut dyn Jitter,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = players
        .iter()
        .map(|player| {
            let key = player.identity_key();
            let base = stats.get(&key).map(base_strength).unwrap_or(0.0);
            Candidate {
                strength: base + jitter.sample(strength_jitter),
                position: player.position(),
                player: player.clone(),
                key,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.strength
            .partial_cmp(&a.strength)
            .unwrap_or(Ordering::Equal)
    });
    candidates
}
