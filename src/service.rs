//! Game, RSVP, draw and result workflows over the collaborator traits.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::{apply_match, MatchOutcome};
use crate::config::DrawConfig;
use crate::draw::{draw_teams, DrawError, Jitter};
use crate::loader::{load_history, HistoryGap};
use crate::models::{
    DrawResult, Game, GameId, IdentityKey, NewPlayer, Player, PlayerId, PlayerStatisticsRecord,
    RosterError, RsvpStatus, MAX_PLAYERS_PER_TEAM, MIN_PLAYERS_PER_TEAM,
};
use crate::sources::{GameStore, HistorySource, SourceError, StatsSource};
use crate::validation::{clamp_count, sanitize_name};

/// Upper bound accepted for a score or a per-player goal/assist count.
pub const MAX_COUNT: u32 = 1000;

/// Options for one draw request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawOptions {
    /// Replace an existing draw for the game.
    pub overwrite: bool,
}

/// A saved draw plus the history lookups that had to be skipped.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub result: DrawResult,
    pub gaps: Vec<HistoryGap>,
}

/// Goals and assists entered for one player when closing a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub player_id: PlayerId,
    pub goals: i64,
    pub assists: i64,
}

/// A finished game and the statistics rows written for it.
#[derive(Debug, Clone)]
pub struct FinishedGame {
    pub game: Game,
    pub statistics: Vec<PlayerStatisticsRecord>,
}

/// Errors that can occur while recording a final score.
#[derive(Debug, Error)]
pub enum ResultError {
    #[error("Game is already finished")]
    AlreadyFinished,

    #[error("Teams have not been drawn for this game")]
    TeamsNotDrawn,

    #[error("Unknown player in game: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Runs draws and records results for games held by a `GameStore`.
pub struct DrawService {
    games: Arc<dyn GameStore>,
    stats: Arc<dyn StatsSource>,
    history: Arc<dyn HistorySource>,
    config: DrawConfig,
}

impl DrawService {
    pub fn new(
        games: Arc<dyn GameStore>,
        stats: Arc<dyn StatsSource>,
        history: Arc<dyn HistorySource>,
        config: DrawConfig,
    ) -> Self {
        Self {
            games,
            stats,
            history,
            config,
        }
    }

    /// Schedule a new game. The team size is clamped into the accepted range.
    pub async fn create_game(
        &self,
        date: NaiveDate,
        time: &str,
        location: &str,
        players_per_team: i64,
    ) -> Result<Game, RosterError> {
        let time = sanitize_name(time);
        let location = sanitize_name(location);
        if time.is_empty() {
            return Err(RosterError::MissingField("time"));
        }
        if location.is_empty() {
            return Err(RosterError::MissingField("location"));
        }

        let players_per_team = players_per_team.clamp(
            MIN_PLAYERS_PER_TEAM as i64,
            MAX_PLAYERS_PER_TEAM as i64,
        ) as usize;
        let game = Game::new(date, &time, &location, players_per_team);

        match self.games.load_game(&game.id).await {
            Ok(_) => return Err(RosterError::GameExists(game.id)),
            Err(SourceError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        self.games.save_game(&game).await?;
        info!("Created game {} on {} at {}", game.id, game.date, game.location);
        Ok(game)
    }

    /// Add an RSVP to a game.
    pub async fn add_player(
        &self,
        game_id: &GameId,
        input: NewPlayer,
    ) -> Result<Player, RosterError> {
        let mut game = self.games.load_game(game_id).await?;
        let player = game.add_player(input)?.clone();
        self.games.save_game(&game).await?;

        info!("Added {} ({}) to game {}", player.name, player.status, game.id);
        Ok(player)
    }

    /// Change an RSVP status; the player leaves any drawn team.
    pub async fn set_player_status(
        &self,
        game_id: &GameId,
        player_id: &PlayerId,
        status: RsvpStatus,
    ) -> Result<(), RosterError> {
        let mut game = self.games.load_game(game_id).await?;
        game.set_status(player_id, status)?;
        self.games.save_game(&game).await?;

        info!("Player {} in game {} is now {}", player_id, game.id, status);
        Ok(())
    }

    /// Draw teams for a game from its confirmed players and save them.
    ///
    /// Any previous draw is discarded, but only when `options.overwrite` is
    /// set. If saving fails the error still carries the computed result.
    pub async fn draw(
        &self,
        game_id: &GameId,
        options: DrawOptions,
        jitter: &mut dyn Jitter,
    ) -> Result<DrawOutcome, DrawError> {
        let game = self.games.load_game(game_id).await?;

        if game.finished {
            return Err(DrawError::GameFinished);
        }
        if game.teams_drawn && !options.overwrite {
            return Err(DrawError::AlreadyDrawn);
        }
        if !(MIN_PLAYERS_PER_TEAM..=MAX_PLAYERS_PER_TEAM).contains(&game.players_per_team) {
            return Err(DrawError::InvalidTeamSize(game.players_per_team));
        }

        let confirmed = game.confirmed_players();
        let required = game.players_per_team * 2;
        if confirmed.len() < required {
            return Err(DrawError::InsufficientPlayers {
                required,
                confirmed: confirmed.len(),
            });
        }

        info!(
            "Drawing teams for game {} ({} confirmed, {} per team)",
            game.id,
            confirmed.len(),
            game.players_per_team
        );

        let history = load_history(
            self.stats.as_ref(),
            self.history.as_ref(),
            &confirmed,
            self.config.recent_window,
        )
        .await;
        if history.is_degraded() {
            warn!("Drawing game {} with partial history: {:?}", game.id, history.gaps);
        }

        let teams = draw_teams(
            &confirmed,
            game.players_per_team,
            &history.stats,
            &history.recent_games,
            &self.config,
            jitter,
        )?;
        let (team1, team2) = teams.into_players();
        let result = DrawResult::new(game.id.clone(), team1, team2);

        if let Err(source) = self.games.save_draw(&result).await {
            return Err(DrawError::Persistence {
                result: Box::new(result),
                source,
            });
        }

        Ok(DrawOutcome {
            result,
            gaps: history.gaps,
        })
    }

    /// Retry saving a draw whose first save failed.
    pub async fn save_draw(&self, result: &DrawResult) -> Result<(), SourceError> {
        self.games.save_draw(result).await
    }

    /// Record the final score and fold it into lifetime statistics.
    ///
    /// Every player on team 1 or 2 gets one game added along with a win,
    /// loss or draw. Negative goal and assist entries count as zero.
    ///
    /// Statistics are written before the game is marked finished, so a failed
    /// statistics write leaves the game open for another attempt.
    pub async fn finish_game(
        &self,
        game_id: &GameId,
        score_team1: i64,
        score_team2: i64,
        player_stats: &[PlayerMatchStats],
    ) -> Result<FinishedGame, ResultError> {
        let mut game = self.games.load_game(game_id).await?;

        if game.finished {
            return Err(ResultError::AlreadyFinished);
        }
        if !game.teams_drawn {
            return Err(ResultError::TeamsNotDrawn);
        }

        let mut entered: HashMap<PlayerId, (u32, u32)> = HashMap::new();
        for s in player_stats {
            if !game.players.iter().any(|p| p.id == s.player_id) {
                return Err(ResultError::UnknownPlayer(s.player_id.clone()));
            }
            entered.insert(
                s.player_id.clone(),
                (clamp_count(s.goals, MAX_COUNT), clamp_count(s.assists, MAX_COUNT)),
            );
        }

        let score1 = clamp_count(score_team1, MAX_COUNT);
        let score2 = clamp_count(score_team2, MAX_COUNT);

        game.apply_result(score1, score2, &entered);

        let records = self.updated_statistics(&game, score1, score2).await?;
        self.stats.upsert_stats(records.clone()).await?;
        self.games.save_game(&game).await?;

        info!("Finished game {} at {} x {}", game.id, score1, score2);
        Ok(FinishedGame {
            game,
            statistics: records,
        })
    }

    async fn updated_statistics(
        &self,
        game: &Game,
        score1: u32,
        score2: u32,
    ) -> Result<Vec<PlayerStatisticsRecord>, SourceError> {
        let players: Vec<_> = game
            .players
            .iter()
            .filter(|p| matches!(p.team_number, Some(1) | Some(2)))
            .collect();

        let contacts: Vec<String> = players
            .iter()
            .filter_map(|p| p.contact().map(str::to_string))
            .collect();
        let names: Vec<String> = players
            .iter()
            .filter(|p| p.contact().is_none())
            .map(|p| p.name.clone())
            .collect();

        let mut existing: HashMap<IdentityKey, PlayerStatisticsRecord> = HashMap::new();
        if !contacts.is_empty() {
            for row in self.stats.stats_by_contact(&contacts).await? {
                existing.insert(row.identity_key(), row);
            }
        }
        if !names.is_empty() {
            for row in self.stats.stats_by_name(&names).await? {
                existing.insert(IdentityKey::from_name(&row.name), row);
            }
        }

        // Entries sharing an identity fold into one row, one game each.
        let mut records: Vec<PlayerStatisticsRecord> = Vec::new();
        let mut slots: HashMap<IdentityKey, usize> = HashMap::new();
        for p in players {
            let key = p.identity_key();
            let slot = *slots.entry(key.clone()).or_insert_with(|| {
                let mut record =
                    PlayerStatisticsRecord::new(p.name.clone(), p.contact().map(str::to_string));
                record.stats = existing.remove(&key).map(|r| r.stats).unwrap_or_default();
                records.push(record);
                records.len() - 1
            });

            let outcome = MatchOutcome::for_team(p.team_number.unwrap_or(1), score1, score2);
            let record = &mut records[slot];
            record.stats = apply_match(&record.stats, outcome, p.goals, p.assists);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{NoJitter, RandomJitter};
    use crate::loader::fakes::{FakeGames, FakeHistory, FakeStats};
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    fn game_with(names: &[&str], players_per_team: usize) -> Game {
        let mut game = Game::new(
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            "19:00",
            "Quadra do Parque",
            players_per_team,
        );
        game.players = names
            .iter()
            .map(|n| Player::new(n, RsvpStatus::Confirmed))
            .collect();
        game
    }

    fn service(
        games: Arc<FakeGames>,
        stats: Arc<FakeStats>,
        history: FakeHistory,
    ) -> DrawService {
        DrawService::new(games, stats, Arc::new(history), DrawConfig::default())
    }

    const SIX: [&str; 6] = ["Ana", "Bia", "Caio", "Duda", "Edu", "Fábio"];

    #[tokio::test]
    async fn test_draw_saves_teams() {
        let game = game_with(&SIX, 3);
        let id = game.id.clone();
        let games = Arc::new(FakeGames::with_game(game));
        let svc = service(games.clone(), Arc::new(FakeStats::default()), FakeHistory::default());

        let outcome = svc
            .draw(&id, DrawOptions::default(), &mut RandomJitter::new())
            .await
            .unwrap();

        assert_eq!(outcome.result.team1.len(), 3);
        assert_eq!(outcome.result.team2.len(), 3);
        assert!(outcome.gaps.is_empty());

        let saved = games.get(&id);
        assert!(saved.teams_drawn);
        assert_eq!(saved.team(1).len(), 3);
        assert_eq!(saved.team(2).len(), 3);
    }

    #[tokio::test]
    async fn test_draw_insufficient_players_leaves_game_untouched() {
        let mut game = game_with(&SIX[..5], 3);
        game.players.push(Player::new("Gil", RsvpStatus::Maybe));
        let id = game.id.clone();
        let games = Arc::new(FakeGames::with_game(game));
        let svc = service(games.clone(), Arc::new(FakeStats::default()), FakeHistory::default());

        let err = svc
            .draw(&id, DrawOptions::default(), &mut NoJitter)
            .await
            .unwrap_err();

        assert_eq!(err.shortfall(), Some(1));
        let saved = games.get(&id);
        assert!(!saved.teams_drawn);
        assert!(saved.players.iter().all(|p| p.team_number.is_none()));
    }

    #[tokio::test]
    async fn test_draw_requires_overwrite_confirmation() {
        let game = game_with(&SIX, 3);
        let id = game.id.clone();
        let games = Arc::new(FakeGames::with_game(game));
        let svc = service(games, Arc::new(FakeStats::default()), FakeHistory::default());

        svc.draw(&id, DrawOptions::default(), &mut NoJitter)
            .await
            .unwrap();

        let err = svc
            .draw(&id, DrawOptions::default(), &mut NoJitter)
            .await
            .unwrap_err();
        assert!(matches!(err, DrawError::AlreadyDrawn));

        let redraw = svc
            .draw(&id, DrawOptions { overwrite: true }, &mut NoJitter)
            .await
            .unwrap();
        assert_eq!(redraw.result.team1.len() + redraw.result.team2.len(), 6);
    }

    #[tokio::test]
    async fn test_draw_refused_for_finished_game() {
        let mut game = game_with(&SIX, 3);
        game.finished = true;
        let id = game.id.clone();
        let svc = service(
            Arc::new(FakeGames::with_game(game)),
            Arc::new(FakeStats::default()),
            FakeHistory::default(),
        );

        let err = svc
            .draw(&id, DrawOptions { overwrite: true }, &mut NoJitter)
            .await
            .unwrap_err();
        assert!(matches!(err, DrawError::GameFinished));
    }

    #[tokio::test]
    async fn test_draw_rejects_out_of_range_team_size() {
        let game = game_with(&SIX, 2);
        let id = game.id.clone();
        let svc = service(
            Arc::new(FakeGames::with_game(game)),
            Arc::new(FakeStats::default()),
            FakeHistory::default(),
        );

        let err = svc
            .draw(&id, DrawOptions::default(), &mut NoJitter)
            .await
            .unwrap_err();
        assert!(matches!(err, DrawError::InvalidTeamSize(2)));
    }

    #[tokio::test]
    async fn test_draw_unknown_game() {
        let svc = service(
            Arc::new(FakeGames::default()),
            Arc::new(FakeStats::default()),
            FakeHistory::default(),
        );

        let err = svc
            .draw(&GameId::from("missing"), DrawOptions::default(), &mut NoJitter)
            .await
            .unwrap_err();
        assert!(matches!(err, DrawError::Source(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_draw_survives_history_failures() {
        let game = game_with(&SIX, 3);
        let id = game.id.clone();
        let stats = FakeStats {
            fail_name: true,
            ..Default::default()
        };
        let history = FakeHistory {
            games: vec![],
            fail: true,
        };
        let svc = service(Arc::new(FakeGames::with_game(game)), Arc::new(stats), history);

        let outcome = svc
            .draw(&id, DrawOptions::default(), &mut NoJitter)
            .await
            .unwrap();

        assert_eq!(outcome.result.team1.len(), 3);
        assert_eq!(outcome.gaps, vec![HistoryGap::StatsByName, HistoryGap::RecentGames]);
    }

    #[tokio::test]
    async fn test_persistence_failure_keeps_result() {
        let game = game_with(&SIX, 3);
        let id = game.id.clone();
        let mut store = FakeGames::with_game(game);
        store.fail_save = true;
        let games = Arc::new(store);
        let svc = service(games.clone(), Arc::new(FakeStats::default()), FakeHistory::default());

        let err = svc
            .draw(&id, DrawOptions::default(), &mut NoJitter)
            .await
            .unwrap_err();
        assert!(matches!(err, DrawError::Persistence { .. }));

        let result = err.into_unsaved_result().unwrap();
        assert_eq!(result.team1.len(), 3);
        assert_eq!(result.team2.len(), 3);
        assert!(!games.get(&id).teams_drawn);
    }

    #[tokio::test]
    async fn test_draw_uses_stored_statistics() {
        let game = game_with(&["Ana", "Bia", "Caio", "Duda", "Edu", "Fábio"], 3);
        let id = game.id.clone();
        let mut rows = Vec::new();
        for (name, wins) in [("Ana", 10), ("Bia", 9), ("Caio", 1)] {
            let mut row = PlayerStatisticsRecord::new(name.to_string(), None);
            row.stats.wins = wins;
            rows.push(row);
        }
        let stats = FakeStats {
            rows: Mutex::new(rows),
            ..Default::default()
        };
        let svc = service(
            Arc::new(FakeGames::with_game(game)),
            Arc::new(stats),
            FakeHistory::default(),
        );

        let outcome = svc
            .draw(&id, DrawOptions::default(), &mut NoJitter)
            .await
            .unwrap();

        // The two strongest players end up on opposite teams.
        let team1: Vec<_> = outcome.result.team1.iter().map(|p| p.name.as_str()).collect();
        assert!(team1.contains(&"Ana") != team1.contains(&"Bia"));
    }

    async fn drawn_game() -> (Arc<FakeGames>, Arc<FakeStats>, DrawService, Game) {
        let mut game = game_with(&SIX, 3);
        game.players[0] = game.players[0].clone().with_whatsapp("11900000001");
        for (i, p) in game.players.iter_mut().enumerate() {
            p.team_number = Some(if i < 3 { 1 } else { 2 });
        }
        game.teams_drawn = true;

        let mut existing = PlayerStatisticsRecord::new("Ana".to_string(), Some("11900000001".to_string()));
        existing.stats.wins = 4;
        existing.stats.total_games = 4;
        let stats = Arc::new(FakeStats {
            rows: Mutex::new(vec![existing]),
            ..Default::default()
        });
        let games = Arc::new(FakeGames::with_game(game.clone()));
        let svc = service(games.clone(), stats.clone(), FakeHistory::default());
        (games, stats, svc, game)
    }

    #[tokio::test]
    async fn test_finish_game_updates_statistics() {
        let (games, stats, svc, game) = drawn_game().await;
        let entries = vec![
            PlayerMatchStats {
                player_id: game.players[0].id.clone(),
                goals: 2,
                assists: 1,
            },
            PlayerMatchStats {
                player_id: game.players[4].id.clone(),
                goals: -3,
                assists: 1,
            },
        ];

        let finished = svc.finish_game(&game.id, 3, 1, &entries).await.unwrap();

        assert!(finished.game.finished);
        assert_eq!(finished.game.final_score_team1, Some(3));
        assert!(games.get(&game.id).finished);
        assert_eq!(finished.statistics.len(), 6);
        assert!(finished
            .statistics
            .iter()
            .any(|r| r.whatsapp.is_none() && r.name == "Edu"));

        let ana = stats.get("11900000001").unwrap();
        assert_eq!(ana.stats.wins, 5);
        assert_eq!(ana.stats.total_games, 5);
        assert_eq!(ana.stats.total_goals, 2);
        assert_eq!(ana.stats.total_assists, 1);

        let edu = stats.get("edu").unwrap();
        assert_eq!(edu.stats.losses, 1);
        assert_eq!(edu.stats.total_games, 1);
        assert_eq!(edu.stats.total_goals, 0);
        assert_eq!(edu.stats.total_assists, 1);
    }

    #[tokio::test]
    async fn test_finish_game_draw_counts_for_everyone() {
        let (_games, stats, svc, game) = drawn_game().await;

        svc.finish_game(&game.id, 2, 2, &[]).await.unwrap();

        for key in ["11900000001", "bia", "caio", "duda", "edu", "fábio"] {
            let row = stats.get(key).unwrap();
            assert_eq!(row.stats.draws, 1, "draw missing for {}", key);
        }
    }

    #[tokio::test]
    async fn test_finish_game_guards() {
        let (_games, _stats, svc, game) = drawn_game().await;

        let unknown = vec![PlayerMatchStats {
            player_id: PlayerId::from("stranger"),
            goals: 1,
            assists: 0,
        }];
        assert!(matches!(
            svc.finish_game(&game.id, 1, 0, &unknown).await,
            Err(ResultError::UnknownPlayer(_))
        ));

        svc.finish_game(&game.id, 1, 0, &[]).await.unwrap();
        assert!(matches!(
            svc.finish_game(&game.id, 1, 0, &[]).await,
            Err(ResultError::AlreadyFinished)
        ));
    }

    #[tokio::test]
    async fn test_finish_game_requires_draw() {
        let game = game_with(&SIX, 3);
        let id = game.id.clone();
        let svc = service(
            Arc::new(FakeGames::with_game(game)),
            Arc::new(FakeStats::default()),
            FakeHistory::default(),
        );

        assert!(matches!(
            svc.finish_game(&id, 1, 0, &[]).await,
            Err(ResultError::TeamsNotDrawn)
        ));
    }

    #[tokio::test]
    async fn test_same_name_players_split_across_teams() {
        let mut game = game_with(&["Ana", "Bia", "Caio", "Duda"], 3);
        for contact in ["11911111111", "11922222222"] {
            game.players
                .push(Player::new("Pedro", RsvpStatus::Confirmed).with_whatsapp(contact));
        }
        let id = game.id.clone();
        let mut rows = Vec::new();
        for contact in ["11911111111", "11922222222"] {
            let mut row = PlayerStatisticsRecord::new("Pedro".to_string(), Some(contact.to_string()));
            row.stats.wins = 5;
            rows.push(row);
        }
        let games = Arc::new(FakeGames::with_game(game));
        let stats = Arc::new(FakeStats {
            rows: Mutex::new(rows),
            ..Default::default()
        });
        let svc = service(games.clone(), stats, FakeHistory::default());

        let outcome = svc
            .draw(&id, DrawOptions::default(), &mut NoJitter)
            .await
            .unwrap();

        let contacts = |team: &[Player]| -> Vec<String> {
            team.iter().filter_map(|p| p.whatsapp.clone()).collect()
        };
        assert_eq!(contacts(&outcome.result.team1), vec!["11911111111"]);
        assert_eq!(contacts(&outcome.result.team2), vec!["11922222222"]);

        let saved = games.get(&id);
        assert_eq!(saved.team(1).len(), 3);
        assert_eq!(saved.team(2).len(), 3);
    }

    #[tokio::test]
    async fn test_finish_game_folds_shared_identity_once_per_entry() {
        let mut game = game_with(&["Ana", "Bia", "Caio", "Duda", "Pedro", "Pedro"], 3);
        for (i, p) in game.players.iter_mut().enumerate() {
            p.team_number = Some(if i % 2 == 0 { 1 } else { 2 });
        }
        game.teams_drawn = true;
        let id = game.id.clone();

        let mut pedro = PlayerStatisticsRecord::new("Pedro".to_string(), None);
        pedro.stats.wins = 10;
        pedro.stats.total_games = 10;
        let stats = Arc::new(FakeStats {
            rows: Mutex::new(vec![pedro]),
            ..Default::default()
        });
        let svc = service(
            Arc::new(FakeGames::with_game(game)),
            stats.clone(),
            FakeHistory::default(),
        );

        let finished = svc.finish_game(&id, 1, 0, &[]).await.unwrap();

        let row = stats.get("pedro").unwrap();
        assert_eq!(row.stats.wins, 11);
        assert_eq!(row.stats.losses, 1);
        assert_eq!(row.stats.total_games, 12);
        let pedro_rows = finished
            .statistics
            .iter()
            .filter(|r| r.name == "Pedro")
            .count();
        assert_eq!(pedro_rows, 1);
    }

    #[tokio::test]
    async fn test_failed_statistics_write_keeps_game_open() {
        let (games, stats, svc, game) = drawn_game().await;
        stats.fail_upsert.store(true, Ordering::SeqCst);

        let err = svc.finish_game(&game.id, 2, 0, &[]).await.unwrap_err();
        assert!(matches!(err, ResultError::Source(_)));
        assert!(!games.get(&game.id).finished);
        assert_eq!(stats.get("11900000001").unwrap().stats.total_games, 4);

        stats.fail_upsert.store(false, Ordering::SeqCst);
        svc.finish_game(&game.id, 2, 0, &[]).await.unwrap();
        assert!(games.get(&game.id).finished);
        assert_eq!(stats.get("11900000001").unwrap().stats.wins, 5);
    }

    #[tokio::test]
    async fn test_create_game() {
        let games = Arc::new(FakeGames::default());
        let svc = service(games.clone(), Arc::new(FakeStats::default()), FakeHistory::default());
        let date = NaiveDate::from_ymd_opt(2025, 7, 5).unwrap();

        let game = svc
            .create_game(date, "19:30", "  Quadra\tdo Parque ", 20)
            .await
            .unwrap();
        assert_eq!(game.location, "Quadra do Parque");
        assert_eq!(game.players_per_team, MAX_PLAYERS_PER_TEAM);
        assert_eq!(games.get(&game.id).time, "19:30");

        assert!(matches!(
            svc.create_game(date, "19:30", "Quadra do Parque", 5).await,
            Err(RosterError::GameExists(_))
        ));
        assert!(matches!(
            svc.create_game(date, "19:30", "  ", 5).await,
            Err(RosterError::MissingField("location"))
        ));

        let small = svc.create_game(date, "08:00", "Arena", 1).await.unwrap();
        assert_eq!(small.players_per_team, MIN_PLAYERS_PER_TEAM);
    }

    #[tokio::test]
    async fn test_rsvp_changes_are_saved() {
        let game = game_with(&SIX, 3);
        let id = game.id.clone();
        let games = Arc::new(FakeGames::with_game(game));
        let svc = service(games.clone(), Arc::new(FakeStats::default()), FakeHistory::default());

        let gil = svc
            .add_player(
                &id,
                NewPlayer {
                    name: "Gil".to_string(),
                    whatsapp: Some("11933334444".to_string()),
                    preferred_position: Some("Zagueiro".to_string()),
                    status: RsvpStatus::Confirmed,
                },
            )
            .await
            .unwrap();
        assert_eq!(games.get(&id).players.len(), 7);

        svc.draw(&id, DrawOptions::default(), &mut NoJitter)
            .await
            .unwrap();
        let drawn = games.get(&id);
        let assigned = drawn.players.iter().find(|p| p.team_number.is_some()).unwrap();

        svc.set_player_status(&id, &assigned.id, RsvpStatus::NotGoing)
            .await
            .unwrap();
        let saved = games.get(&id);
        let changed = saved.players.iter().find(|p| p.id == assigned.id).unwrap();
        assert_eq!(changed.status, RsvpStatus::NotGoing);
        assert_eq!(changed.team_number, None);

        assert!(matches!(
            svc.add_player(
                &id,
                NewPlayer {
                    name: "gil".to_string(),
                    ..Default::default()
                }
            )
            .await,
            Err(RosterError::DuplicatePlayer(_))
        ));
        assert_eq!(gil.position(), Some(crate::models::Position::Zagueiro));
    }
}
