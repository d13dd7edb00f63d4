//! Greedy two-team assignment.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::pairing::{count_pairs, PairCounts};
use super::strength::{score_candidates, Candidate};
use super::{DrawError, Jitter};
use crate::config::DrawConfig;
use crate::models::{IdentityKey, Player, PlayerAggregateStats, Position, RecentGame};

/// Two rosters filled by one draw.
#[derive(Debug, Clone, Default)]
pub struct Teams {
    pub team1: Vec<Candidate>,
    pub team2: Vec<Candidate>,
}

impl Teams {
    pub fn strength(team: &[Candidate]) -> f64 {
        team.iter().map(|c| c.strength).sum()
    }

    pub fn into_players(self) -> (Vec<Player>, Vec<Player>) {
        (
            self.team1.into_iter().map(|c| c.player).collect(),
            self.team2.into_iter().map(|c| c.player).collect(),
        )
    }
}

/// Which roster a hypothetical placement targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Team1,
    Team2,
}

fn position_counts(team: &[Candidate]) -> [i64; 3] {
    let mut counts = [0i64; 3];
    for position in team.iter().filter_map(|c| c.position) {
        counts[position.index()] += 1;
    }
    counts
}

/// Sum over positions of `|team1 - team2|` after placing the candidate.
pub fn position_imbalance(
    team1: &[Candidate],
    team2: &[Candidate],
    candidate: &Candidate,
    side: Side,
) -> f64 {
    let mut counts1 = position_counts(team1);
    let mut counts2 = position_counts(team2);

    if let Some(position) = candidate.position {
        match side {
            Side::Team1 => counts1[position.index()] += 1,
            Side::Team2 => counts2[position.index()] += 1,
        }
    }

    Position::ALL
        .iter()
        .map(|p| (counts1[p.index()] - counts2[p.index()]).abs())
        .sum::<i64>() as f64
}

/// Total recent shared-team count between the candidate and a roster.
pub fn teammate_penalty(team: &[Candidate], candidate: &Candidate, pairs: &PairCounts) -> f64 {
    team.iter()
        .map(|member| f64::from(pairs.get(&member.key, &candidate.key)))
        .sum()
}

fn placement_cost(
    team1: &[Candidate],
    team2: &[Candidate],
    candidate: &Candidate,
    side: Side,
    config: &DrawConfig,
    pairs: &PairCounts,
    jitter: &mut dyn Jitter,
) -> f64 {
    let strength1 = Teams::strength(team1);
    let strength2 = Teams::strength(team2);
    let (strength_gap, own_team) = match side {
        Side::Team1 => (((strength1 + candidate.strength) - strength2).abs(), team1),
        Side::Team2 => ((strength1 - (strength2 + candidate.strength)).abs(), team2),
    };

    let weights = &config.weights;
    weights.strength * strength_gap
        + weights.position * position_imbalance(team1, team2, candidate, side)
        + weights.teammate * teammate_penalty(own_team, candidate, pairs)
        + jitter.sample(config.cost_jitter)
}

/// Assign strength-sorted candidates to two teams of `players_per_team`.
///
/// When one team is full the rest go to the other; when both have room the
/// cheaper placement wins, with exact ties going to team 1. Candidates left
/// over once both teams are full are not assigned.
pub fn assign_teams(
    candidates: Vec<Candidate>,
    players_per_team: usize,
    config: &DrawConfig,
    pairs: &PairCounts,
    jitter: &mut dyn Jitter,
) -> Result<Teams, DrawError> {
    if players_per_team == 0 {
        return Err(DrawError::InvalidTeamSize(players_per_team));
    }

    let required = players_per_team * 2;
    if candidates.len() < required {
        return Err(DrawError::InsufficientPlayers {
            required,
            confirmed: candidates.len(),
        });
    }

    let total = candidates.len();
    let mut teams = Teams {
        team1: Vec::with_capacity(players_per_team),
        team2: Vec::with_capacity(players_per_team),
    };

    for candidate in candidates {
        let room1 = teams.team1.len() < players_per_team;
        let room2 = teams.team2.len() < players_per_team;

        let side = match (room1, room2) {
            (false, false) => break,
            (true, false) => Side::Team1,
            (false, true) => Side::Team2,
            (true, true) => {
                let cost1 = placement_cost(
                    &teams.team1,
                    &teams.team2,
                    &candidate,
                    Side::Team1,
                    config,
                    pairs,
                    jitter,
                );
                let cost2 = placement_cost(
                    &teams.team1,
                    &teams.team2,
                    &candidate,
                    Side::Team2,
                    config,
                    pairs,
                    jitter,
                );
                debug!(
                    "Candidate {} (strength {:.2}): cost team1 {:.3}, team2 {:.3}",
                    candidate.key, candidate.strength, cost1, cost2
                );
                if cost1 <= cost2 {
                    Side::Team1
                } else {
                    Side::Team2
                }
            }
        };

        match side {
            Side::Team1 => teams.team1.push(candidate),
            Side::Team2 => teams.team2.push(candidate),
        }
    }

    let excluded = total - teams.team1.len() - teams.team2.len();
    if excluded > 0 {
        debug!("{} confirmed players left out of full teams", excluded);
    }

    Ok(teams)
}

/// Score, count recent pairings and assign in one pass.
pub fn draw_teams(
    confirmed: &[Player],
    players_per_team: usize,
    stats: &HashMap<IdentityKey, PlayerAggregateStats>,
    recent_games: &[RecentGame],
    config: &DrawConfig,
    jitter: &mut dyn Jitter,
) -> Result<Teams, DrawError> {
    if players_per_team == 0 {
        return Err(DrawError::InvalidTeamSize(players_per_team));
    }
    let required = players_per_team * 2;
    if confirmed.len() < required {
        return Err(DrawError::InsufficientPlayers {
            required,
            confirmed: confirmed.len(),
        });
    }

    let keys: HashSet<IdentityKey> = confirmed.iter().map(|p| p.identity_key()).collect();
    let window = recent_games.len().min(config.recent_window);
    let pairs = count_pairs(&keys, &recent_games[..window]);

    let candidates = score_candidates(confirmed, stats, config.strength_jitter, jitter);
    let teams = assign_teams(candidates, players_per_team, config, &pairs, jitter)?;

    info!(
        "Drew {} vs {} players (strength {:.2} vs {:.2}, {} recent pairs)",
        teams.team1.len(),
        teams.team2.len(),
        Teams::strength(&teams.team1),
        Teams::strength(&teams.team2),
        pairs.len()
    );

    Ok(teams)
}
