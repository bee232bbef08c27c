// Provider seams: the stats feed (schedule, play-by-play, boxscore) and the
// player register. Both are constructed by the caller and passed in so the
// aggregation code can run against an in-memory substitute.

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::play::PlayByPlay;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// MLBAM player id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GamePk(pub u64);

impl fmt::Display for GamePk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn as_str(self) -> &'static str {
        match self {
            TeamSide::Home => "home",
            TeamSide::Away => "away",
        }
    }
}

/// First and last name as stored by the register (case not normalized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName {
    pub first: String,
    pub last: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("player register unavailable: {0}")]
    Register(String),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Games scheduled in the inclusive date range, in schedule order.
    async fn scheduled_games(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<GamePk>, ProviderError>;

    /// Full play-by-play document for one game.
    async fn play_by_play(&self, game: GamePk) -> Result<PlayByPlay, ProviderError>;

    /// Batting order for one side of a game, leadoff first.
    async fn batting_order(
        &self,
        game: GamePk,
        side: TeamSide,
    ) -> Result<Vec<PlayerId>, ProviderError>;

    /// Games scheduled on a single date.
    async fn games_on(&self, date: NaiveDate) -> Result<Vec<GamePk>, ProviderError> {
        self.scheduled_games(date, date).await
    }
}

#[async_trait]
pub trait PlayerLookup: Send + Sync {
    async fn reverse_lookup(&self, id: PlayerId) -> Result<Option<PlayerName>, ProviderError>;

    async fn forward_lookup(
        &self,
        last: &str,
        first: &str,
    ) -> Result<Option<PlayerId>, ProviderError>;
}
