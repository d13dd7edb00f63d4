//! Lifetime player statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::IdentityKey;

/// Lifetime counters for one player identity.
///
/// Fields default to zero so rows written before assists were tracked still
/// deserialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAggregateStats {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub total_goals: u32,
    #[serde(default)]
    pub total_assists: u32,
}

/// A persisted statistics row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatisticsRecord {
    /// Display name at the time of the last update
    pub name: String,

    /// Contact number, the primary join key when present
    #[serde(default)]
    pub whatsapp: Option<String>,

    #[serde(flatten)]
    pub stats: PlayerAggregateStats,

    /// When this row was last written
    pub updated_at: DateTime<Utc>,
}

impl PlayerStatisticsRecord {
    /// Create an empty record for a player.
    pub fn new(name: String, whatsapp: Option<String>) -> Self {
        Self {
            name,
            whatsapp,
            stats: PlayerAggregateStats::default(),
            updated_at: Utc::now(),
        }
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::derive(&self.name, self.whatsapp.as_deref())
    }
}
