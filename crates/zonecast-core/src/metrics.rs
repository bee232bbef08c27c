// Per-zone metric calculators.
//
// Every calculator runs the same pipeline: resolve recent games, walk each
// player's play-by-play, accumulate per-zone counters, convert counters to
// rounded rates. The metrics differ only in their counter record, zone
// domain, and what a pitch adds to the counters.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::counters::{
    ratio, AverageCounts, CalledStrikeCounts, OnBaseCounts, SluggingCounts, SwingCounts,
    ZoneCounters,
};
use crate::error::ZoneError;
use crate::play::{batter_pitches, PitchRecord};
use crate::pitch::{PitchOutcome, PlayOutcome};
use crate::provider::{GamePk, PlayerId, StatsProvider};
use crate::recent::{resolve_recent_games, RecentGamesQuery};
use crate::zone::{remap_for_pitchers_pov, remap_to_coordinates, Zone, ZoneCoord};

// ---------------------------------------------------------------------------
// MetricKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    SwingAndMiss,
    CalledStrike,
    Slugging,
    OnBase,
    BattingAverage,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [
        MetricKind::SwingAndMiss,
        MetricKind::CalledStrike,
        MetricKind::Slugging,
        MetricKind::OnBase,
        MetricKind::BattingAverage,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MetricKind::SwingAndMiss => "swing_and_miss",
            MetricKind::CalledStrike => "called_strike",
            MetricKind::Slugging => "slugging",
            MetricKind::OnBase => "on_base",
            MetricKind::BattingAverage => "batting_average",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::SwingAndMiss => "Swing & Miss",
            MetricKind::CalledStrike => "Called Strike",
            MetricKind::Slugging => "SLG",
            MetricKind::OnBase => "OBP",
            MetricKind::BattingAverage => "AVG",
        }
    }

    /// Run this metric's calculator.
    pub async fn compute(
        self,
        provider: &dyn StatsProvider,
        lineup: &[PlayerId],
        query: &RecentGamesQuery,
    ) -> Result<ZoneReport, ZoneError> {
        match self {
            MetricKind::SwingAndMiss => compute_zone_metric(provider, &SwingAndMiss, lineup, query).await,
            MetricKind::CalledStrike => compute_zone_metric(provider, &CalledStrike, lineup, query).await,
            MetricKind::Slugging => compute_zone_metric(provider, &Slugging, lineup, query).await,
            MetricKind::OnBase => compute_zone_metric(provider, &OnBase, lineup, query).await,
            MetricKind::BattingAverage => {
                compute_zone_metric(provider, &BattingAverage, lineup, query).await
            }
        }
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKind::ALL
            .into_iter()
            .find(|m| m.key() == s.trim())
            .ok_or_else(|| format!("unknown metric `{s}`"))
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ZoneMetric trait
// ---------------------------------------------------------------------------

pub trait ZoneMetric: Sync {
    type Counts: Default + Send;

    fn kind(&self) -> MetricKind;

    /// Zones this metric reports on.
    fn zones(&self) -> &'static [Zone] {
        &Zone::ALL
    }

    /// Whether a pitch in `zone` counts toward this metric.
    fn tracks(&self, _zone: Zone) -> bool {
        true
    }

    /// Add one pitch to its zone's counters.
    fn record(&self, counts: &mut Self::Counts, pitch: &PitchRecord);

    fn rate(&self, counts: &Self::Counts) -> f64;
}

/// How a completed plate appearance is charged. When several conditions
/// hold, the first match in this order wins: hit-by-pitch, walk, sacrifice
/// fly, at-bat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateAppearance {
    HitByPitch,
    Walk,
    SacFly,
    AtBat { hit: bool },
    /// Sac bunts and catcher interference, plus plays that ended on a
    /// baserunning out before the batter finished.
    Uncharged,
}

impl PlateAppearance {
    /// Classify the concluding pitch of a plate appearance. `None` for every
    /// other pitch.
    pub fn classify(pitch: &PitchRecord) -> Option<PlateAppearance> {
        let outcome = pitch.concludes.as_ref()?;
        let pa = if pitch.outcome == PitchOutcome::HitByPitch
            || *outcome == PlayOutcome::HitByPitch
        {
            PlateAppearance::HitByPitch
        } else if (pitch.outcome.is_ball() && pitch.balls == 4) || outcome.is_walk() {
            PlateAppearance::Walk
        } else if outcome.is_sac_fly() {
            PlateAppearance::SacFly
        } else if Self::batter_finished(pitch, outcome) && outcome.is_at_bat() {
            PlateAppearance::AtBat {
                hit: pitch.is_in_play && !pitch.is_out,
            }
        } else {
            PlateAppearance::Uncharged
        };
        Some(pa)
    }

    /// The pitch ended the batter's turn: put in play or strike three.
    fn batter_finished(pitch: &PitchRecord, outcome: &PlayOutcome) -> bool {
        pitch.is_in_play || pitch.strikes >= 3 || outcome.is_strikeout()
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Misses per swing.
pub struct SwingAndMiss;

impl ZoneMetric for SwingAndMiss {
    type Counts = SwingCounts;

    fn kind(&self) -> MetricKind {
        MetricKind::SwingAndMiss
    }

    fn record(&self, counts: &mut SwingCounts, pitch: &PitchRecord) {
        if pitch.outcome.is_swing() {
            counts.swings += 1;
            if pitch.outcome.is_miss() {
                counts.misses += 1;
            }
        }
    }

    fn rate(&self, counts: &SwingCounts) -> f64 {
        ratio(counts.misses, counts.swings)
    }
}

/// Called strikes per pitch, inside the strike zone only.
pub struct CalledStrike;

impl ZoneMetric for CalledStrike {
    type Counts = CalledStrikeCounts;

    fn kind(&self) -> MetricKind {
        MetricKind::CalledStrike
    }

    fn zones(&self) -> &'static [Zone] {
        &Zone::STRIKE
    }

    fn tracks(&self, zone: Zone) -> bool {
        zone.in_strike_zone()
    }

    fn record(&self, counts: &mut CalledStrikeCounts, pitch: &PitchRecord) {
        counts.total_pitches += 1;
        if pitch.outcome == PitchOutcome::CalledStrike {
            counts.called_strikes += 1;
        }
    }

    fn rate(&self, counts: &CalledStrikeCounts) -> f64 {
        ratio(counts.called_strikes, counts.total_pitches)
    }
}

/// Total bases per at-bat.
pub struct Slugging;

impl ZoneMetric for Slugging {
    type Counts = SluggingCounts;

    fn kind(&self) -> MetricKind {
        MetricKind::Slugging
    }

    fn record(&self, counts: &mut SluggingCounts, pitch: &PitchRecord) {
        let Some(PlateAppearance::AtBat { .. }) = PlateAppearance::classify(pitch) else {
            return;
        };
        counts.at_bats += 1;
        if pitch.outcome.is_in_play_safe() {
            if let Some(outcome) = &pitch.concludes {
                counts.total_bases += outcome.total_bases();
            }
        }
    }

    fn rate(&self, counts: &SluggingCounts) -> f64 {
        ratio(counts.total_bases, counts.at_bats)
    }
}

/// (H + BB + HBP) / (AB + BB + HBP + SF).
pub struct OnBase;

impl ZoneMetric for OnBase {
    type Counts = OnBaseCounts;

    fn kind(&self) -> MetricKind {
        MetricKind::OnBase
    }

    fn record(&self, counts: &mut OnBaseCounts, pitch: &PitchRecord) {
        match PlateAppearance::classify(pitch) {
            Some(PlateAppearance::HitByPitch) => counts.hbp += 1,
            Some(PlateAppearance::Walk) => counts.walks += 1,
            Some(PlateAppearance::SacFly) => counts.sf += 1,
            Some(PlateAppearance::AtBat { hit }) => {
                counts.at_bats += 1;
                if hit {
                    counts.hits += 1;
                }
            }
            Some(PlateAppearance::Uncharged) | None => {}
        }
    }

    fn rate(&self, counts: &OnBaseCounts) -> f64 {
        on_base_rate(counts)
    }
}

pub fn on_base_rate(counts: &OnBaseCounts) -> f64 {
    let denominator = counts.at_bats + counts.walks + counts.hbp + counts.sf;
    ratio(counts.hits + counts.walks + counts.hbp, denominator)
}

/// Hits per at-bat.
pub struct BattingAverage;

impl ZoneMetric for BattingAverage {
    type Counts = AverageCounts;

    fn kind(&self) -> MetricKind {
        MetricKind::BattingAverage
    }

    fn record(&self, counts: &mut AverageCounts, pitch: &PitchRecord) {
        if let Some(PlateAppearance::AtBat { hit }) = PlateAppearance::classify(pitch) {
            counts.at_bats += 1;
            if hit {
                counts.hits += 1;
            }
        }
    }

    fn rate(&self, counts: &AverageCounts) -> f64 {
        ratio(counts.hits, counts.at_bats)
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Catcher-POV rates for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerZoneRates {
    pub player: PlayerId,
    pub games: Vec<GamePk>,
    pub rates: BTreeMap<Zone, f64>,
}

impl PlayerZoneRates {
    pub fn pitchers_pov(&self) -> BTreeMap<Zone, f64> {
        remap_for_pitchers_pov(self.rates.clone())
    }

    /// Pitcher-POV rates keyed by plot coordinate, ready for rendering.
    pub fn plot_points(&self) -> BTreeMap<ZoneCoord, f64> {
        remap_to_coordinates(self.pitchers_pov())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneReport {
    pub metric: MetricKind,
    pub players: Vec<PlayerZoneRates>,
}

impl ZoneReport {
    /// Plot-ready rates per player, in lineup order.
    pub fn plot_points(&self) -> Vec<(PlayerId, BTreeMap<ZoneCoord, f64>)> {
        self.players
            .iter()
            .map(|p| (p.player, p.plot_points()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Accumulate one player's pitches from one game into `counters`.
pub fn accumulate<M: ZoneMetric>(
    metric: &M,
    counters: &mut ZoneCounters<M::Counts>,
    pitches: &[PitchRecord],
) -> Result<(), ZoneError> {
    for pitch in pitches {
        if !metric.tracks(pitch.zone) {
            continue;
        }
        metric.record(counters.get_mut(pitch.zone)?, pitch);
    }
    Ok(())
}

/// Compute `metric` per zone for every player in `lineup`.
pub async fn compute_zone_metric<M: ZoneMetric>(
    provider: &dyn StatsProvider,
    metric: &M,
    lineup: &[PlayerId],
    query: &RecentGamesQuery,
) -> Result<ZoneReport, ZoneError> {
    let kind = metric.kind();
    let recent = resolve_recent_games(provider, lineup, query).await?;

    let mut players = Vec::with_capacity(recent.len());
    for entry in recent.iter() {
        let mut counters: ZoneCounters<M::Counts> = ZoneCounters::new(kind.key(), metric.zones());
        let mut used = Vec::with_capacity(entry.games.len());

        for game in &entry.games {
            let doc = match provider.play_by_play(*game).await {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("Error fetching data for game {}: {}", game, e);
                    continue;
                }
            };
            let pitches = batter_pitches(&doc, entry.player, *game)?;
            accumulate(metric, &mut counters, &pitches)?;
            used.push(*game);
        }

        info!(
            "{}: player {} aggregated over {} games",
            kind.key(),
            entry.player,
            used.len()
        );
        players.push(PlayerZoneRates {
            player: entry.player,
            games: used,
            rates: counters.map_values(|c| metric.rate(c)),
        });
    }

    Ok(ZoneReport {
        metric: kind,
        players,
    })
}

pub async fn swing_and_miss_rate_by_zone(
    provider: &dyn StatsProvider,
    lineup: &[PlayerId],
    query: &RecentGamesQuery,
) -> Result<ZoneReport, ZoneError> {
    compute_zone_metric(provider, &SwingAndMiss, lineup, query).await
}

pub async fn called_strike_rate_by_zone(
    provider: &dyn StatsProvider,
    lineup: &[PlayerId],
    query: &RecentGamesQuery,
) -> Result<ZoneReport, ZoneError> {
    compute_zone_metric(provider, &CalledStrike, lineup, query).await
}

pub async fn slugging_percentage_by_zone(
    provider: &dyn StatsProvider,
    lineup: &[PlayerId],
    query: &RecentGamesQuery,
) -> Result<ZoneReport, ZoneError> {
    compute_zone_metric(provider, &Slugging, lineup, query).await
}

pub async fn on_base_percentage_by_zone(
    provider: &dyn StatsProvider,
    lineup: &[PlayerId],
    query: &RecentGamesQuery,
) -> Result<ZoneReport, ZoneError> {
    compute_zone_metric(provider, &OnBase, lineup, query).await
}

pub async fn batting_average_by_zone(
    provider: &dyn StatsProvider,
    lineup: &[PlayerId],
    query: &RecentGamesQuery,
) -> Result<ZoneReport, ZoneError> {
    compute_zone_metric(provider, &BattingAverage, lineup, query).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
