//! Collaborator contracts for games, statistics and draw history.
//!
//! The draw core never talks to storage directly. Services take these traits
//! so the backing store (the bundled JSONL store, a remote database, or an
//! in-memory fake in tests) can be swapped freely.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DrawResult, Game, GameId, PlayerStatisticsRecord, RecentGame};
use crate::storage::StorageError;

/// Errors reported by collaborators.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Lifetime statistics lookup and update.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Rows whose contact matches one of `contacts`.
    async fn stats_by_contact(
        &self,
        contacts: &[String],
    ) -> Result<Vec<PlayerStatisticsRecord>, SourceError>;

    /// Rows whose name matches one of `names` exactly.
    async fn stats_by_name(
        &self,
        names: &[String],
    ) -> Result<Vec<PlayerStatisticsRecord>, SourceError>;

    /// Insert or replace rows, matched by contact when present, else by name.
    async fn upsert_stats(&self, records: Vec<PlayerStatisticsRecord>) -> Result<(), SourceError>;
}

/// Rosters of previously drawn games.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Up to `limit` drawn games, most recent first.
    async fn recent_drawn_games(&self, limit: usize) -> Result<Vec<RecentGame>, SourceError>;
}

/// Game records and draw persistence.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn load_game(&self, id: &GameId) -> Result<Game, SourceError>;

    /// Record the team of every player in the draw and flag the game as drawn.
    async fn save_draw(&self, draw: &DrawResult) -> Result<(), SourceError>;

    /// Replace the whole game record.
    async fn save_game(&self, game: &Game) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::NotFound("game abc".to_string());
        assert_eq!(err.to_string(), "Not found: game abc");
    }

    #[test]
    fn test_source_error_from_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: SourceError = StorageError::from(io).into();
        assert!(matches!(err, SourceError::Storage(_)));
    }
}
