//! JSONL-backed implementation of the collaborator traits.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::{JsonlReader, JsonlWriter, StorageConfig};
use crate::models::{DrawResult, Game, GameId, PlayerStatisticsRecord, RecentGame};
use crate::sources::{GameStore, HistorySource, SourceError, StatsSource};

/// Games and statistics stored in the data directory.
///
/// Writes rewrite the whole file; a process-local lock keeps two writers in
/// this process from interleaving. Separate processes are not coordinated.
pub struct JsonlStore {
    config: StorageConfig,
    write_lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    fn games(&self) -> Result<Vec<Game>, SourceError> {
        Ok(JsonlReader::new(self.config.games_path()).read_all()?)
    }

    fn write_games(&self, games: &[Game]) -> Result<(), SourceError> {
        JsonlWriter::new(self.config.games_path()).write_all(games)?;
        Ok(())
    }

    fn statistics(&self) -> Result<Vec<PlayerStatisticsRecord>, SourceError> {
        Ok(JsonlReader::new(self.config.statistics_path()).read_all()?)
    }

    /// All games, in file order.
    pub fn list_games(&self) -> Result<Vec<Game>, SourceError> {
        self.games()
    }
}

#[async_trait]
impl StatsSource for JsonlStore {
    async fn stats_by_contact(
        &self,
        contacts: &[String],
    ) -> Result<Vec<PlayerStatisticsRecord>, SourceError> {
        Ok(self
            .statistics()?
            .into_iter()
            .filter(|r| r.whatsapp.as_ref().is_some_and(|w| contacts.contains(w)))
            .collect())
    }

    async fn stats_by_name(
        &self,
        names: &[String],
    ) -> Result<Vec<PlayerStatisticsRecord>, SourceError> {
        Ok(self
            .statistics()?
            .into_iter()
            .filter(|r| names.contains(&r.name))
            .collect())
    }

    async fn upsert_stats(&self, records: Vec<PlayerStatisticsRecord>) -> Result<(), SourceError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SourceError::Unavailable("store lock poisoned".to_string()))?;

        let mut rows = self.statistics()?;
        let count = records.len();
        for mut record in records {
            record.updated_at = Utc::now();
            let key = record.identity_key();
            match rows.iter_mut().find(|r| r.identity_key() == key) {
                Some(existing) => *existing = record,
                None => rows.push(record),
            }
        }

        JsonlWriter::new(self.config.statistics_path()).write_all(&rows)?;
        info!("Upserted {} statistics rows", count);
        Ok(())
    }
}

#[async_trait]
impl HistorySource for JsonlStore {
    async fn recent_drawn_games(&self, limit: usize) -> Result<Vec<RecentGame>, SourceError> {
        let mut drawn: Vec<Game> = self.games()?.into_iter().filter(|g| g.teams_drawn).collect();
        drawn.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(drawn.iter().take(limit).map(RecentGame::from_game).collect())
    }
}

#[async_trait]
impl GameStore for JsonlStore {
    async fn load_game(&self, id: &GameId) -> Result<Game, SourceError> {
        self.games()?
            .into_iter()
            .find(|g| &g.id == id)
            .ok_or_else(|| SourceError::NotFound(format!("game {}", id)))
    }

    async fn save_draw(&self, draw: &DrawResult) -> Result<(), SourceError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SourceError::Unavailable("store lock poisoned".to_string()))?;

        let mut games = self.games()?;
        let game = games
            .iter_mut()
            .find(|g| g.id == draw.game_id)
            .ok_or_else(|| SourceError::NotFound(format!("game {}", draw.game_id)))?;
        game.apply_draw(draw);

        self.write_games(&games)?;
        info!("Saved draw {} for game {}", draw.id, draw.game_id);
        Ok(())
    }

    async fn save_game(&self, game: &Game) -> Result<(), SourceError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SourceError::Unavailable("store lock poisoned".to_string()))?;

        let mut games = self.games()?;
        match games.iter_mut().find(|g| g.id == game.id) {
            Some(existing) => *existing = game.clone(),
            None => games.push(game.clone()),
        }

        self.write_games(&games)
    }
}
