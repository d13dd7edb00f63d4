//! Local file storage.
//!
//! Games and lifetime statistics are kept as JSON Lines files under a data
//! directory:
//! - `games.jsonl`: one game per line, RSVPs and team assignments included
//! - `player_statistics.jsonl`: one lifetime statistics row per identity

mod jsonl;
mod store;

pub use jsonl::*;
pub use store::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn path_for(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }

    pub fn games_path(&self) -> PathBuf {
        self.path_for(EntityType::Game)
    }

    pub fn statistics_path(&self) -> PathBuf {
        self.path_for(EntityType::PlayerStatistics)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
