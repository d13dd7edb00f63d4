//! Teammate co-occurrence counts from recent drawn games.

use std::collections::{HashMap, HashSet};

use crate::models::{IdentityKey, RecentGame};

/// Unordered pair of identity keys, stored in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(IdentityKey, IdentityKey);

impl PairKey {
    pub fn new(a: &IdentityKey, b: &IdentityKey) -> Self {
        if a <= b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }
}

/// How often each pair of current players shared a team recently.
#[derive(Debug, Clone, Default)]
pub struct PairCounts {
    counts: HashMap<PairKey, u32>,
}

impl PairCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for the pair, in either order. Zero when never teamed up.
    pub fn get(&self, a: &IdentityKey, b: &IdentityKey) -> u32 {
        self.counts.get(&PairKey::new(a, b)).copied().unwrap_or(0)
    }

    /// Record one more shared team. Self-pairs are ignored.
    pub fn increment(&mut self, a: &IdentityKey, b: &IdentityKey) {
        if a == b {
            return;
        }
        *self.counts.entry(PairKey::new(a, b)).or_insert(0) += 1;
    }

    /// Number of distinct pairs with a nonzero count.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count intra-team pairs among the confirmed players over recent games.
///
/// Keys outside `confirmed` are dropped from each roster first. Opponents
/// (team 1 vs team 2 of the same game) are never paired.
pub fn count_pairs(confirmed: &HashSet<IdentityKey>, recent_games: &[RecentGame]) -> PairCounts {
    let mut counts = PairCounts::new();

    for game in recent_games {
        for roster in [&game.team1, &game.team2] {
            let present: Vec<&IdentityKey> =
                roster.iter().filter(|k| confirmed.contains(*k)).collect();

            for (i, a) in present.iter().enumerate() {
                for b in &present[i + 1..] {
                    counts.increment(a, b);
                }
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(s: &str) -> IdentityKey {
        IdentityKey::from(s)
    }

    fn game(team1: &[&str], team2: &[&str]) -> RecentGame {
        RecentGame {
            game_id: "g".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            team1: team1.iter().map(|s| key(s)).collect(),
            team2: team2.iter().map(|s| key(s)).collect(),
        }
    }

    fn confirmed(keys: &[&str]) -> HashSet<IdentityKey> {
        keys.iter().map(|s| key(s)).collect()
    }

    #[test]
    fn test_pair_key_canonical() {
        assert_eq!(PairKey::new(&key("b"), &key("a")), PairKey::new(&key("a"), &key("b")));
        assert_eq!(
            PairKey::new(&key("zeca"), &key("ana")),
            PairKey(key("ana"), key("zeca"))
        );
    }

    #[test]
    fn test_counts_teammates_only() {
        let games = vec![game(&["a", "b", "c"], &["d", "e"])];
        let counts = count_pairs(&confirmed(&["a", "b", "c", "d", "e"]), &games);

        assert_eq!(counts.get(&key("a"), &key("b")), 1);
        assert_eq!(counts.get(&key("a"), &key("c")), 1);
        assert_eq!(counts.get(&key("b"), &key("c")), 1);
        assert_eq!(counts.get(&key("d"), &key("e")), 1);
        assert_eq!(counts.get(&key("a"), &key("d")), 0);
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn test_counts_symmetric() {
        let games = vec![
            game(&["a", "b"], &["c"]),
            game(&["b", "a"], &["c"]),
            game(&["a"], &["b", "c"]),
        ];
        let counts = count_pairs(&confirmed(&["a", "b", "c"]), &games);

        assert_eq!(counts.get(&key("a"), &key("b")), 2);
        assert_eq!(counts.get(&key("b"), &key("a")), 2);
        assert_eq!(counts.get(&key("b"), &key("c")), 1);
        assert_eq!(counts.get(&key("c"), &key("b")), 1);
    }

    #[test]
    fn test_ignores_players_not_confirmed() {
        let games = vec![game(&["a", "x", "b"], &["y", "z"])];
        let counts = count_pairs(&confirmed(&["a", "b"]), &games);

        assert_eq!(counts.get(&key("a"), &key("b")), 1);
        assert_eq!(counts.get(&key("a"), &key("x")), 0);
        assert_eq!(counts.get(&key("y"), &key("z")), 0);
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_never_pairs_with_self() {
        let games = vec![game(&["a", "a", "b"], &[])];
        let counts = count_pairs(&confirmed(&["a", "b"]), &games);

        assert_eq!(counts.get(&key("a"), &key("a")), 0);
        assert_eq!(counts.get(&key("a"), &key("b")), 2);
    }

    #[test]
    fn test_empty_history() {
        let counts = count_pairs(&confirmed(&["a", "b"]), &[]);
        assert!(counts.is_empty());
        assert_eq!(counts.get(&key("a"), &key("b")), 0);
    }
}
