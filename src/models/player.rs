//! Player (RSVP) model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EntityId, IdentityKey, PlayerId};
use crate::validation::sanitize_name;

/// Preferred field position. The set is closed; anything else is ignored
/// when balancing positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Zagueiro,
    #[serde(rename = "Meio-Campo")]
    MeioCampo,
    Atacante,
}

impl Position {
    /// All positions, in the order used for imbalance accounting.
    pub const ALL: [Position; 3] = [Position::Zagueiro, Position::MeioCampo, Position::Atacante];

    /// Parse a stored position label. Matching is exact.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Zagueiro" => Some(Position::Zagueiro),
            "Meio-Campo" => Some(Position::MeioCampo),
            "Atacante" => Some(Position::Atacante),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Position::Zagueiro => 0,
            Position::MeioCampo => 1,
            Position::Atacante => 2,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Zagueiro => write!(f, "Zagueiro"),
            Position::MeioCampo => write!(f, "Meio-Campo"),
            Position::Atacante => write!(f, "Atacante"),
        }
    }
}

/// RSVP status for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Confirmed,
    #[default]
    Maybe,
    NotGoing,
}

impl std::str::FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(RsvpStatus::Confirmed),
            "maybe" => Ok(RsvpStatus::Maybe),
            "not_going" | "not-going" => Ok(RsvpStatus::NotGoing),
            other => Err(format!("unknown RSVP status '{}'", other)),
        }
    }
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsvpStatus::Confirmed => write!(f, "confirmed"),
            RsvpStatus::Maybe => write!(f, "maybe"),
            RsvpStatus::NotGoing => write!(f, "not_going"),
        }
    }
}

/// A player's RSVP entry for a specific game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier (per game)
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Contact number, used as the identity key when present
    #[serde(default)]
    pub whatsapp: Option<String>,

    /// Preferred position label as entered
    #[serde(default)]
    pub preferred_position: Option<String>,

    /// RSVP status
    #[serde(default)]
    pub status: RsvpStatus,

    /// Team assignment (1 or 2) once teams are drawn
    #[serde(default)]
    pub team_number: Option<u8>,

    /// Goals scored in this game
    #[serde(default)]
    pub goals: u32,

    /// Assists in this game
    #[serde(default)]
    pub assists: u32,
}

impl Player {
    /// Create a new player entry with a fresh random ID.
    ///
    /// Names are not unique within a game, so the ID never derives from them.
    pub fn new(name: &str, status: RsvpStatus) -> Self {
        Self {
            id: EntityId::new(Uuid::new_v4().to_string()),
            name: sanitize_name(name),
            whatsapp: None,
            preferred_position: None,
            status,
            team_number: None,
            goals: 0,
            assists: 0,
        }
    }

    /// Builder method to set the contact number.
    pub fn with_whatsapp(mut self, whatsapp: impl Into<String>) -> Self {
        self.whatsapp = Some(whatsapp.into());
        self
    }

    /// Builder method to set the preferred position label.
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.preferred_position = Some(position.into());
        self
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::derive(&self.name, self.whatsapp.as_deref())
    }

    /// Parsed position, `None` when unset or outside the known set.
    pub fn position(&self) -> Option<Position> {
        self.preferred_position.as_deref().and_then(Position::parse)
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == RsvpStatus::Confirmed
    }

    /// Contact number if it is present and non-blank.
    pub fn contact(&self) -> Option<&str> {
        self.whatsapp
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }

    /// Digits of the contact number, empty when there is none.
    pub fn contact_digits(&self) -> String {
        self.whatsapp
            .as_deref()
            .unwrap_or_default()
            .chars()
            .filter(char::is_ascii_digit)
            .collect()
    }
}
