//! Gathers the history a draw needs.
//!
//! Every lookup here is best effort: a failing collaborator is logged and
//! treated as "no history", so the draw still runs on whatever signal is
//! left.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{IdentityKey, Player, PlayerAggregateStats, RecentGame};
use crate::sources::{HistorySource, StatsSource};

/// A lookup that failed and was replaced by an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryGap {
    StatsByContact,
    StatsByName,
    RecentGames,
}

impl std::fmt::Display for HistoryGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryGap::StatsByContact => write!(f, "stats_by_contact"),
            HistoryGap::StatsByName => write!(f, "stats_by_name"),
            HistoryGap::RecentGames => write!(f, "recent_games"),
        }
    }
}

/// Inputs for one draw besides the confirmed players.
#[derive(Debug, Clone, Default)]
pub struct LoadedHistory {
    pub stats: HashMap<IdentityKey, PlayerAggregateStats>,
    pub recent_games: Vec<RecentGame>,
    pub gaps: Vec<HistoryGap>,
}

impl LoadedHistory {
    pub fn is_degraded(&self) -> bool {
        !self.gaps.is_empty()
    }
}

/// Fetch statistics for the confirmed players and the recent drawn games.
///
/// Players with a contact are looked up by contact, the rest by name. Name
/// rows are keyed by their lower-cased name so they join the players'
/// identity keys.
pub async fn load_history(
    stats_source: &dyn StatsSource,
    history_source: &dyn HistorySource,
    confirmed: &[Player],
    window: usize,
) -> LoadedHistory {
    let mut loaded = LoadedHistory::default();

    let contacts: Vec<String> = confirmed
        .iter()
        .filter_map(|p| p.contact().map(str::to_string))
        .collect();
    let names: Vec<String> = confirmed
        .iter()
        .filter(|p| p.contact().is_none())
        .map(|p| p.name.clone())
        .collect();

    if !contacts.is_empty() {
        match stats_source.stats_by_contact(&contacts).await {
            Ok(rows) => {
                debug!("Loaded {} stats rows by contact", rows.len());
                for row in rows {
                    if let Some(contact) = row.whatsapp.as_deref().map(str::trim) {
                        loaded.stats.insert(IdentityKey::from(contact), row.stats);
                    }
                }
            }
            Err(e) => {
                warn!("Stats lookup by contact failed, continuing without: {}", e);
                loaded.gaps.push(HistoryGap::StatsByContact);
            }
        }
    }

    if !names.is_empty() {
        match stats_source.stats_by_name(&names).await {
            Ok(rows) => {
                debug!("Loaded {} stats rows by name", rows.len());
                for row in rows {
                    loaded.stats.insert(IdentityKey::from_name(&row.name), row.stats);
                }
            }
            Err(e) => {
                warn!("Stats lookup by name failed, continuing without: {}", e);
                loaded.gaps.push(HistoryGap::StatsByName);
            }
        }
    }

    match history_source.recent_drawn_games(window).await {
        Ok(mut games) => {
            games.truncate(window);
            debug!("Loaded {} recent drawn games", games.len());
            loaded.recent_games = games;
        }
        Err(e) => {
            warn!("Recent games lookup failed, continuing without: {}", e);
            loaded.gaps.push(HistoryGap::RecentGames);
        }
    }

    loaded
}


#[cfg(test)]
mod tests {
    use super::fakes::{FakeHistory, FakeStats};
    use super::*;
    use crate::models::{EntityId, PlayerStatisticsRecord, RsvpStatus};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn player(name: &str) -> Player {
        Player::new(name, RsvpStatus::Confirmed)
    }

    fn row(name: &str, whatsapp: Option<&str>, wins: u32) -> PlayerStatisticsRecord {
        let mut record = PlayerStatisticsRecord::new(name.to_string(), whatsapp.map(String::from));
        record.stats.wins = wins;
        record
    }

    fn recent(n: usize) -> Vec<RecentGame> {
        (0..n)
            .map(|i| RecentGame {
                game_id: EntityId::from(format!("g{}", i)),
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                team1: vec![],
                team2: vec![],
            })
            .collect()
    }

    fn stats_with(rows: Vec<PlayerStatisticsRecord>) -> FakeStats {
        FakeStats {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_keys_by_contact_and_name() {
        let stats = stats_with(vec![
            row("Ana", Some("11900000001"), 3),
            row("Bruno", None, 5),
            row("Someone Else", None, 9),
        ]);
        let history = FakeHistory::default();
        let confirmed = vec![player("Ana").with_whatsapp("11900000001"), player("Bruno")];

        let loaded = load_history(&stats, &history, &confirmed, 12).await;

        assert!(!loaded.is_degraded());
        assert_eq!(loaded.stats.len(), 2);
        assert_eq!(loaded.stats[&IdentityKey::from("11900000001")].wins, 3);
        assert_eq!(loaded.stats[&IdentityKey::from("bruno")].wins, 5);
    }

    #[tokio::test]
    async fn test_skips_empty_queries() {
        let stats = FakeStats::default();
        let history = FakeHistory::default();
        let confirmed = vec![player("Caio"), player("Duda")];

        load_history(&stats, &history, &confirmed, 12).await;

        assert_eq!(*stats.calls.lock().unwrap(), vec!["name"]);
    }

    #[tokio::test]
    async fn test_failures_degrade_to_empty() {
        let stats = FakeStats {
            rows: Mutex::new(vec![row("Bruno", None, 5)]),
            fail_contact: true,
            ..Default::default()
        };
        let history = FakeHistory {
            games: recent(3),
            fail: true,
        };
        let confirmed = vec![player("Ana").with_whatsapp("11900000001"), player("Bruno")];

        let loaded = load_history(&stats, &history, &confirmed, 12).await;

        assert_eq!(loaded.gaps, vec![HistoryGap::StatsByContact, HistoryGap::RecentGames]);
        assert!(loaded.recent_games.is_empty());
        // The name lookup still contributes.
        assert_eq!(loaded.stats[&IdentityKey::from("bruno")].wins, 5);
    }

    #[test]
    fn test_recent_games_bounded_by_window() {
        let stats = FakeStats::default();
        let history = FakeHistory {
            games: recent(20),
            fail: false,
        };

        let loaded = tokio_test::block_on(load_history(&stats, &history, &[player("Ana")], 12));

        assert_eq!(loaded.recent_games.len(), 12);
        assert_eq!(loaded.recent_games[0].game_id.as_str(), "g0");
    }
}
