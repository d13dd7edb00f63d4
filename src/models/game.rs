//! Game model and drawn-team results.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::{EntityId, GameId, Player, PlayerId, RsvpStatus};
use crate::sources::SourceError;
use crate::validation::{is_valid_whatsapp, sanitize_name};

/// Smallest team size the game form accepts.
pub const MIN_PLAYERS_PER_TEAM: usize = 3;

/// Largest team size the game form accepts.
pub const MAX_PLAYERS_PER_TEAM: usize = 11;

/// Errors from editing a game's RSVP list.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Game is finished; RSVP changes are disabled")]
    GameFinished,

    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Game already exists: {0}")]
    GameExists(GameId),

    #[error("Player already on the list: {0}")]
    DuplicatePlayer(String),

    #[error("Unknown player in game: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// RSVP form input for one player.
#[derive(Debug, Clone, Default)]
pub struct NewPlayer {
    pub name: String,
    pub whatsapp: Option<String>,
    pub preferred_position: Option<String>,
    pub status: RsvpStatus,
}

/// A scheduled pickup game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Unique identifier
    pub id: GameId,

    /// Match day
    pub date: NaiveDate,

    /// Kick-off time as entered (e.g. "19:30")
    pub time: String,

    /// Pitch or venue
    pub location: String,

    /// Team size
    pub players_per_team: usize,

    /// RSVP list
    #[serde(default)]
    pub players: Vec<Player>,

    /// Whether teams have been drawn
    #[serde(default)]
    pub teams_drawn: bool,

    /// Whether the final score has been recorded
    #[serde(default)]
    pub finished: bool,

    #[serde(default)]
    pub final_score_team1: Option<u32>,

    #[serde(default)]
    pub final_score_team2: Option<u32>,
}

impl Game {
    /// Create a new Game with auto-generated ID.
    pub fn new(date: NaiveDate, time: &str, location: &str, players_per_team: usize) -> Self {
        let id = EntityId::generate(&[&date.to_string(), time, location]);

        Self {
            id,
            date,
            time: time.to_string(),
            location: location.to_string(),
            players_per_team,
            players: Vec::new(),
            teams_drawn: false,
            finished: false,
            final_score_team1: None,
            final_score_team2: None,
        }
    }

    /// Players whose RSVP is confirmed, in list order.
    pub fn confirmed_players(&self) -> Vec<Player> {
        self.players
            .iter()
            .filter(|p| p.is_confirmed())
            .cloned()
            .collect()
    }

    /// Players assigned to the given team (1 or 2).
    pub fn team(&self, team_number: u8) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.team_number == Some(team_number))
            .collect()
    }

    /// Replace any previous team assignment with the given draw.
    pub fn apply_draw(&mut self, draw: &DrawResult) {
        for player in &mut self.players {
            player.team_number = if draw.team1.iter().any(|p| p.id == player.id) {
                Some(1)
            } else if draw.team2.iter().any(|p| p.id == player.id) {
                Some(2)
            } else {
                None
            };
        }
        self.teams_drawn = true;
    }

    /// Add an RSVP entry.
    ///
    /// The name is sanitized and an invalid contact is dropped. A player whose
    /// contact digits match an existing entry is a duplicate; without a
    /// contact, a case-insensitive name match is.
    pub fn add_player(&mut self, input: NewPlayer) -> Result<&Player, RosterError> {
        if self.finished {
            return Err(RosterError::GameFinished);
        }

        let name = sanitize_name(&input.name);
        if name.is_empty() {
            return Err(RosterError::MissingField("name"));
        }

        let mut player = Player::new(&name, input.status);
        match input.whatsapp.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
            Some(w) if is_valid_whatsapp(w) => player = player.with_whatsapp(w),
            Some(w) => debug!("Dropping invalid contact '{}' for {}", w, name),
            None => {}
        }
        if let Some(position) = input
            .preferred_position
            .as_deref()
            .map(sanitize_name)
            .filter(|p| !p.is_empty())
        {
            player = player.with_position(position);
        }

        let digits = player.contact_digits();
        let name_key = name.to_lowercase();
        let duplicate = self.players.iter().any(|p| {
            if digits.is_empty() {
                p.name.to_lowercase() == name_key
            } else {
                p.contact_digits() == digits
            }
        });
        if duplicate {
            return Err(RosterError::DuplicatePlayer(name));
        }

        self.players.push(player);
        Ok(&self.players[self.players.len() - 1])
    }

    /// Change a player's RSVP status. Any team assignment is cleared.
    pub fn set_status(
        &mut self,
        player_id: &PlayerId,
        status: RsvpStatus,
    ) -> Result<(), RosterError> {
        if self.finished {
            return Err(RosterError::GameFinished);
        }

        let player = self
            .players
            .iter_mut()
            .find(|p| &p.id == player_id)
            .ok_or_else(|| RosterError::UnknownPlayer(player_id.clone()))?;
        player.status = status;
        player.team_number = None;
        Ok(())
    }

    /// Close the game with its final score and per-player (goals, assists).
    ///
    /// Players missing from `lines` keep their current counters.
    pub fn apply_result(
        &mut self,
        score_team1: u32,
        score_team2: u32,
        lines: &HashMap<PlayerId, (u32, u32)>,
    ) {
        self.finished = true;
        self.final_score_team1 = Some(score_team1);
        self.final_score_team2 = Some(score_team2);
        for player in &mut self.players {
            if let Some(&(goals, assists)) = lines.get(&player.id) {
                player.goals = goals;
                player.assists = assists;
            }
        }
    }
}

/// Output of one draw, handed to the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawResult {
    /// Unique identifier for this draw
    pub id: String,

    /// Game the draw belongs to
    pub game_id: GameId,

    pub team1: Vec<Player>,

    pub team2: Vec<Player>,

    /// When the draw was computed
    pub drawn_at: DateTime<Utc>,
}

impl DrawResult {
    pub fn new(game_id: GameId, team1: Vec<Player>, team2: Vec<Player>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            game_id,
            team1,
            team2,
            drawn_at: Utc::now(),
        }
    }
}
