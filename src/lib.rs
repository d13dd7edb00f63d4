//! # Racha
//!
//! Pickup soccer organizer core: balanced team draws from confirmed RSVPs.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (games, players, statistics, draws)
//! - **draw**: Strength scoring, teammate history and the team assignment engine
//! - **loader**: Best-effort loading of statistics and recent rosters
//! - **sources**: Collaborator traits for games, statistics and history
//! - **service**: Game creation, RSVP, draw and final-score workflows
//! - **storage**: JSONL-backed collaborator implementation
//! - **calculate**: Folding results into lifetime statistics
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod draw;
pub mod loader;
pub mod models;
pub mod service;
pub mod sources;
pub mod storage;
pub mod validation;

pub use models::*;
