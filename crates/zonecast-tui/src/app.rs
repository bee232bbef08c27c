// Orchestration: resolve the configured lineup to player ids, run the zone
// metrics, and assemble named, plot-ready charts.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use zonecast_core::names::{ids_to_names, names_to_ids};
use zonecast_core::recent::games_on_date;
use zonecast_core::{
    GamePk, MetricKind, PlayerId, PlayerLookup, PlayerZoneRates, ProviderError, RecentGamesQuery,
    StatsProvider, ZoneCoord, ZoneError,
};

use crate::config::LineupConfig;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Zone(#[from] ZoneError),

    #[error("failed to load batting order: {0}")]
    BattingOrder(#[from] ProviderError),

    #[error("lineup resolved to no players")]
    EmptyLineup,
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// One player's pitcher-POV rates keyed by plot coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerChart {
    pub name: String,
    pub player: PlayerId,
    /// Games the rates were aggregated over.
    pub games: usize,
    pub points: BTreeMap<ZoneCoord, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSet {
    pub metric: MetricKind,
    pub charts: Vec<PlayerChart>,
}

impl ChartSet {
    pub fn to_json(&self) -> Value {
        let players: Vec<Value> = self
            .charts
            .iter()
            .map(|chart| {
                let zones: Vec<Value> = chart
                    .points
                    .iter()
                    .map(|(coord, value)| json!({ "x": coord.x, "y": coord.y, "value": value }))
                    .collect();
                json!({
                    "name": chart.name,
                    "player_id": chart.player,
                    "games": chart.games,
                    "zones": zones,
                })
            })
            .collect();
        json!({
            "metric": self.metric.key(),
            "label": self.metric.label(),
            "players": players,
        })
    }
}

// ---------------------------------------------------------------------------
// Lineup
// ---------------------------------------------------------------------------

/// Resolve the configured lineup: batting orders first (one game, or every
/// game on a date in schedule order), then the explicit ids, then the names.
/// Duplicates keep their first position.
pub async fn resolve_lineup(
    lineup: &LineupConfig,
    provider: &dyn StatsProvider,
    lookup: &dyn PlayerLookup,
) -> Result<Vec<PlayerId>, AppError> {
    let mut ids = Vec::new();

    if let (Some(game_pk), Some(side)) = (lineup.game_pk, lineup.side) {
        let order = provider.batting_order(GamePk(game_pk), side).await?;
        info!(
            "Batting order for game {} ({}): {} players",
            game_pk,
            side.as_str(),
            order.len()
        );
        ids.extend(order);
    }

    if let (Some(date), Some(side)) = (lineup.date, lineup.side) {
        for game in games_on_date(provider, date).await? {
            match provider.batting_order(game, side).await {
                Ok(order) => ids.extend(order),
                Err(e) => warn!("Skipping batting order for game {}: {}", game, e),
            }
        }
    }

    ids.extend(lineup.ids.iter().copied().map(PlayerId));

    if !lineup.names.is_empty() {
        let named = names_to_ids(lookup, &lineup.names).await;
        if named.len() < lineup.names.len() {
            warn!(
                "{} of {} lineup names could not be resolved",
                lineup.names.len() - named.len(),
                lineup.names.len()
            );
        }
        ids.extend(named);
    }

    let mut unique: Vec<PlayerId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }

    if unique.is_empty() {
        return Err(AppError::EmptyLineup);
    }
    Ok(unique)
}

// ---------------------------------------------------------------------------
// Metric runs
// ---------------------------------------------------------------------------

/// Compute one metric and attach display names. Players the register cannot
/// name are left out of the chart set.
pub async fn build_chart_set(
    provider: &dyn StatsProvider,
    lookup: &dyn PlayerLookup,
    lineup: &[PlayerId],
    query: &RecentGamesQuery,
    metric: MetricKind,
) -> Result<ChartSet, ZoneError> {
    let report = metric.compute(provider, lineup, query).await?;
    let entries: Vec<(PlayerId, &PlayerZoneRates)> =
        report.players.iter().map(|p| (p.player, p)).collect();
    let named = ids_to_names(lookup, entries).await;

    let charts = named
        .into_iter()
        .map(|(name, rates)| PlayerChart {
            name,
            player: rates.player,
            games: rates.games.len(),
            points: rates.plot_points(),
        })
        .collect();

    Ok(ChartSet { metric, charts })
}

/// Compute every metric, in `MetricKind::ALL` order.
pub async fn build_all_chart_sets(
    provider: &dyn StatsProvider,
    lookup: &dyn PlayerLookup,
    lineup: &[PlayerId],
    query: &RecentGamesQuery,
) -> Result<Vec<ChartSet>, ZoneError> {
    let mut sets = Vec::with_capacity(MetricKind::ALL.len());
    for metric in MetricKind::ALL {
        sets.push(build_chart_set(provider, lookup, lineup, query, metric).await?);
    }
    Ok(sets)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
