// Recent-games resolver: for each player, the most recent games (within a
// day window) in which that player came to bat.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ZoneError;
use crate::provider::{GamePk, PlayerId, StatsProvider};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RecentGamesQuery {
    /// Days back from the anchor to search. The anchor day itself is excluded.
    pub window_days: u32,
    /// Defaults to today (local time).
    pub anchor: Option<NaiveDate>,
    /// Maximum games kept per player.
    pub games_per_player: usize,
}

impl Default for RecentGamesQuery {
    fn default() -> Self {
        RecentGamesQuery {
            window_days: 10,
            anchor: None,
            games_per_player: 5,
        }
    }
}

impl RecentGamesQuery {
    /// Inclusive date range `[anchor - window_days, anchor - 1]`.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), ZoneError> {
        if self.window_days == 0 {
            return Err(ZoneError::InvalidQuery(
                "window_days must be greater than 0".into(),
            ));
        }
        let anchor = self.anchor.unwrap_or_else(|| Local::now().date_naive());
        let start = anchor - Duration::days(i64::from(self.window_days));
        let end = anchor - Duration::days(1);
        Ok((start, end))
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerGames {
    pub player: PlayerId,
    /// Oldest first, most recent last.
    pub games: Vec<GamePk>,
}

/// Games per player, in lineup order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentGames {
    entries: Vec<PlayerGames>,
}

impl RecentGames {
    fn for_lineup(lineup: &[PlayerId]) -> Self {
        let mut entries: Vec<PlayerGames> = Vec::with_capacity(lineup.len());
        for player in lineup {
            if entries.iter().any(|e| e.player == *player) {
                continue;
            }
            entries.push(PlayerGames {
                player: *player,
                games: Vec::new(),
            });
        }
        RecentGames { entries }
    }

    pub fn get(&self, player: PlayerId) -> Option<&[GamePk]> {
        self.entries
            .iter()
            .find(|e| e.player == player)
            .map(|e| e.games.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerGames> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total games found across all players.
    pub fn total_games(&self) -> usize {
        self.entries.iter().map(|e| e.games.len()).sum()
    }

    fn keep_trailing(&mut self, n: usize) {
        for entry in &mut self.entries {
            keep_last(&mut entry.games, n);
        }
    }
}

fn keep_last<T>(items: &mut Vec<T>, n: usize) {
    if items.len() > n {
        items.drain(..items.len() - n);
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Find up to `games_per_player` recent games for each player in `lineup`.
///
/// Games are visited in schedule order and "most recent" is positional.
/// Any provider failure stops the scan and returns what was collected so
/// far. A schedule with no games is reported as `NoGamesScheduled`.
pub async fn resolve_recent_games(
    provider: &dyn StatsProvider,
    lineup: &[PlayerId],
    query: &RecentGamesQuery,
) -> Result<RecentGames, ZoneError> {
    let (start, end) = query.date_range()?;
    let mut recent = RecentGames::for_lineup(lineup);

    let games = match provider.scheduled_games(start, end).await {
        Ok(games) => games,
        Err(e) => {
            warn!("Error in resolve_recent_games: schedule {start}..{end}: {e}");
            return Ok(recent);
        }
    };
    if games.is_empty() {
        return Err(ZoneError::NoGamesScheduled { start, end });
    }
    info!(
        "Scanning {} games between {} and {} for {} players",
        games.len(),
        start,
        end,
        recent.len()
    );

    let window = query.window_days as usize;
    for game in games {
        let doc = match provider.play_by_play(game).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Error in resolve_recent_games: game {game}: {e}");
                break;
            }
        };
        for entry in &mut recent.entries {
            if doc.has_batter(entry.player) {
                entry.games.push(game);
                keep_last(&mut entry.games, window);
            }
        }
    }

    recent.keep_trailing(query.games_per_player);
    Ok(recent)
}

/// Games scheduled on a single date. No games is an error: it usually means
/// the date is wrong (off-season, typo) rather than a quiet day.
pub async fn games_on_date(
    provider: &dyn StatsProvider,
    date: NaiveDate,
) -> Result<Vec<GamePk>, ZoneError> {
    let games = provider.games_on(date).await?;
    if games.is_empty() {
        return Err(ZoneError::NoGamesScheduled {
            start: date,
            end: date,
        });
    }
    Ok(games)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
