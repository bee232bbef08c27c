// Integration tests for the zone metric pipeline.
//
// These run the resolver and the calculators end-to-end against an in-memory
// stats provider, checking schedule ordering, caps, failure handling, and
// the final plot-ready output.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use zonecast_core::metrics::{
    called_strike_rate_by_zone, on_base_percentage_by_zone, slugging_percentage_by_zone,
    swing_and_miss_rate_by_zone,
};
use zonecast_core::play::PlayByPlay;
use zonecast_core::recent::{games_on_date, resolve_recent_games};
use zonecast_core::{
    GamePk, MetricKind, PlayerId, ProviderError, RecentGamesQuery, StatsProvider, TeamSide, Zone,
    ZoneCoord, ZoneError,
};

// ===========================================================================
// Fake provider
// ===========================================================================

#[derive(Default)]
struct FakeFeed {
    schedule: Vec<GamePk>,
    docs: BTreeMap<u64, Value>,
    failing: HashSet<u64>,
    schedule_fails: bool,
    requested_ranges: Mutex<Vec<(NaiveDate, NaiveDate)>>,
}

#[async_trait]
impl StatsProvider for FakeFeed {
    async fn scheduled_games(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<GamePk>, ProviderError> {
        self.requested_ranges.lock().unwrap().push((start, end));
        if self.schedule_fails {
            return Err(ProviderError::Status {
                url: "schedule".into(),
                status: 503,
            });
        }
        Ok(self.schedule.clone())
    }

    async fn play_by_play(&self, game: GamePk) -> Result<PlayByPlay, ProviderError> {
        if self.failing.contains(&game.0) {
            return Err(ProviderError::Transport {
                url: format!("game/{game}"),
                message: "connection reset".into(),
            });
        }
        let doc = self.docs.get(&game.0).cloned().unwrap_or_else(|| json!({}));
        serde_json::from_value(doc).map_err(|e| ProviderError::Decode {
            url: format!("game/{game}"),
            message: e.to_string(),
        })
    }

    async fn batting_order(
        &self,
        _game: GamePk,
        _side: TeamSide,
    ) -> Result<Vec<PlayerId>, ProviderError> {
        Ok(vec![])
    }
}

// ===========================================================================
// Fixture helpers
// ===========================================================================

fn pitch(zone: i64, call: &str, balls: u8) -> Value {
    json!({
        "isPitch": true,
        "details": {
            "call": { "description": call },
            "description": call,
            "isInPlay": call.starts_with("In play"),
            "isOut": call == "In play, out(s)"
        },
        "pitchData": { "zone": zone },
        "count": { "balls": balls, "strikes": 0 }
    })
}

fn plate_appearance(batter: u64, event: &str, pitches: Vec<Value>) -> Value {
    json!({
        "result": { "type": "atBat", "event": event },
        "matchup": { "batter": { "id": batter } },
        "playEvents": pitches
    })
}

fn game(plays: Vec<Value>) -> Value {
    json!({ "allPlays": plays })
}

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()
}

fn query() -> RecentGamesQuery {
    RecentGamesQuery {
        window_days: 10,
        anchor: Some(anchor()),
        games_per_player: 5,
    }
}

fn zone(z: i64) -> Zone {
    Zone::new(z).unwrap()
}

// ===========================================================================
// Recent-games resolver
// ===========================================================================

#[tokio::test]
async fn resolver_caps_games_and_keeps_schedule_order() {
    let mut feed = FakeFeed::default();
    // Eight games, deliberately not sorted by pk.
    let pks = [108, 101, 107, 102, 106, 103, 105, 104];
    for pk in pks {
        feed.schedule.push(GamePk(pk));
        feed.docs.insert(
            pk,
            game(vec![plate_appearance(1, "Single", vec![pitch(5, "In play, no out", 0)])]),
        );
    }
    // Player 2 only bats in two games.
    feed.docs.insert(
        106,
        game(vec![
            plate_appearance(1, "Single", vec![pitch(5, "In play, no out", 0)]),
            plate_appearance(2, "Groundout", vec![pitch(5, "In play, out(s)", 0)]),
        ]),
    );
    feed.docs.insert(
        104,
        game(vec![
            plate_appearance(1, "Single", vec![pitch(5, "In play, no out", 0)]),
            plate_appearance(2, "Groundout", vec![pitch(5, "In play, out(s)", 0)]),
        ]),
    );

    let recent = resolve_recent_games(&feed, &[PlayerId(1), PlayerId(2), PlayerId(3)], &query())
        .await
        .unwrap();

    let p1: Vec<u64> = recent.get(PlayerId(1)).unwrap().iter().map(|g| g.0).collect();
    // trailing five in schedule order, not sorted by pk
    assert_eq!(p1, vec![102, 106, 103, 105, 104]);
    let p2: Vec<u64> = recent.get(PlayerId(2)).unwrap().iter().map(|g| g.0).collect();
    assert_eq!(p2, vec![106, 104]);
    assert!(recent.get(PlayerId(3)).unwrap().is_empty());

    let ranges = feed.requested_ranges.lock().unwrap();
    assert_eq!(
        ranges[0],
        (
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        )
    );
}

#[tokio::test]
async fn resolver_returns_partial_results_on_failure() {
    let mut feed = FakeFeed::default();
    for pk in [1, 2, 3] {
        feed.schedule.push(GamePk(pk));
        feed.docs.insert(
            pk,
            game(vec![plate_appearance(9, "Walk", vec![pitch(11, "Ball", 4)])]),
        );
    }
    feed.failing.insert(2);

    let recent = resolve_recent_games(&feed, &[PlayerId(9)], &query()).await.unwrap();
    assert_eq!(recent.get(PlayerId(9)).unwrap(), &[GamePk(1)]);
}

#[tokio::test]
async fn resolver_schedule_failure_yields_empty_mapping() {
    let feed = FakeFeed {
        schedule_fails: true,
        ..Default::default()
    };
    let recent = resolve_recent_games(&feed, &[PlayerId(9)], &query()).await.unwrap();
    assert_eq!(recent.total_games(), 0);
    assert_eq!(recent.len(), 1);
}

#[tokio::test]
async fn empty_schedule_is_an_explicit_error() {
    let feed = FakeFeed::default();
    let err = resolve_recent_games(&feed, &[PlayerId(9)], &query()).await.unwrap_err();
    match err {
        ZoneError::NoGamesScheduled { start, end } => {
            assert_eq!(start, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
            assert_eq!(end, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        }
        other => panic!("expected NoGamesScheduled, got {other}"),
    }

    let err = MetricKind::Slugging
        .compute(&feed, &[PlayerId(9)], &query())
        .await
        .unwrap_err();
    assert!(matches!(err, ZoneError::NoGamesScheduled { .. }));
}

#[tokio::test]
async fn single_date_lookup_rejects_empty_day() {
    let feed = FakeFeed::default();
    let err = games_on_date(&feed, anchor()).await.unwrap_err();
    assert!(matches!(err, ZoneError::NoGamesScheduled { .. }));

    let feed = FakeFeed {
        schedule: vec![GamePk(77)],
        ..Default::default()
    };
    assert_eq!(games_on_date(&feed, anchor()).await.unwrap(), vec![GamePk(77)]);
}

// ===========================================================================
// Calculators
// ===========================================================================

fn two_game_feed() -> FakeFeed {
    let mut feed = FakeFeed::default();
    feed.schedule = vec![GamePk(1), GamePk(2)];
    feed.docs.insert(
        1,
        game(vec![
            plate_appearance(
                7,
                "Single",
                vec![
                    pitch(1, "Swinging Strike", 0),
                    pitch(1, "Called Strike", 0),
                    pitch(1, "In play, no out", 0),
                ],
            ),
            plate_appearance(8, "Strikeout", vec![pitch(5, "Swinging Strike", 0)]),
        ]),
    );
    feed.docs.insert(
        2,
        game(vec![
            plate_appearance(
                7,
                "Home Run",
                vec![pitch(11, "Foul", 0), pitch(1, "In play, run(s)", 0)],
            ),
            plate_appearance(7, "Walk", vec![pitch(14, "Ball", 4)]),
        ]),
    );
    feed
}

#[tokio::test]
async fn swing_and_miss_report_is_pitcher_pov() {
    let feed = two_game_feed();
    let report = swing_and_miss_rate_by_zone(&feed, &[PlayerId(7)], &query()).await.unwrap();
    assert_eq!(report.metric, MetricKind::SwingAndMiss);
    assert_eq!(report.players.len(), 1);

    let player = &report.players[0];
    assert_eq!(player.games, vec![GamePk(1), GamePk(2)]);
    assert_eq!(player.rates.len(), 13);
    // zone 1: swinging strike, in play, in play -> 1 / 3
    assert_eq!(player.rates[&zone(1)], 0.333);
    assert_eq!(player.rates[&zone(11)], 0.0);

    let points = player.plot_points();
    assert_eq!(points.len(), 13);
    // catcher zone 1 is pitcher zone 3, drawn at (7, 3)
    assert_eq!(points[&ZoneCoord::new(7, 3)], 0.333);
}

#[tokio::test]
async fn called_strike_report_has_nine_zones() {
    let feed = two_game_feed();
    let report = called_strike_rate_by_zone(&feed, &[PlayerId(7)], &query()).await.unwrap();
    let rates = &report.players[0].rates;
    assert_eq!(rates.len(), 9);
    assert!(!rates.contains_key(&zone(11)));
    assert!(!rates.contains_key(&zone(14)));
    // zone 1: four pitches, one called strike
    assert_eq!(rates[&zone(1)], 0.25);
}

#[tokio::test]
async fn slugging_and_on_base_across_games() {
    let feed = two_game_feed();
    let slg = slugging_percentage_by_zone(&feed, &[PlayerId(7)], &query()).await.unwrap();
    // zone 1: single + home run over two at-bats
    assert_eq!(slg.players[0].rates[&zone(1)], 2.5);

    let obp = on_base_percentage_by_zone(&feed, &[PlayerId(7)], &query()).await.unwrap();
    assert_eq!(obp.players[0].rates[&zone(1)], 1.0);
    // ball four in zone 14: one walk, no at-bats
    assert_eq!(obp.players[0].rates[&zone(14)], 1.0);
    assert_eq!(obp.players[0].rates[&zone(5)], 0.0);
}

#[tokio::test]
async fn failed_game_is_skipped_by_calculator() {
    // The resolver sees both games, then game 2 starts failing.
    struct Flaky {
        inner: FakeFeed,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl StatsProvider for Flaky {
        async fn scheduled_games(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<GamePk>, ProviderError> {
            self.inner.scheduled_games(start, end).await
        }

        async fn play_by_play(&self, game: GamePk) -> Result<PlayByPlay, ProviderError> {
            let n = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            // calls 1-2 are the resolver; call 4 is the calculator's game 2
            if n == 4 {
                return Err(ProviderError::Status {
                    url: format!("game/{game}"),
                    status: 500,
                });
            }
            self.inner.play_by_play(game).await
        }

        async fn batting_order(
            &self,
            game: GamePk,
            side: TeamSide,
        ) -> Result<Vec<PlayerId>, ProviderError> {
            self.inner.batting_order(game, side).await
        }
    }

    let feed = Flaky {
        inner: two_game_feed(),
        calls: Mutex::new(0),
    };
    let report = MetricKind::BattingAverage
        .compute(&feed, &[PlayerId(7)], &query())
        .await
        .unwrap();
    let player = &report.players[0];
    assert_eq!(player.games, vec![GamePk(1)]);
    assert_eq!(player.rates[&zone(1)], 1.0);
    assert_eq!(player.rates.len(), 13);
}

#[tokio::test]
async fn unknown_zone_aborts_calculation() {
    let mut feed = FakeFeed::default();
    feed.schedule = vec![GamePk(1)];
    feed.docs.insert(
        1,
        game(vec![plate_appearance(7, "Strikeout", vec![pitch(10, "Swinging Strike", 0)])]),
    );
    let err = MetricKind::SwingAndMiss
        .compute(&feed, &[PlayerId(7)], &query())
        .await
        .unwrap_err();
    assert!(matches!(err, ZoneError::UnknownZone(10)));
}

#[tokio::test]
async fn report_plot_points_follow_lineup_order() {
    let mut feed = two_game_feed();
    feed.docs.insert(
        3,
        game(vec![plate_appearance(8, "Single", vec![pitch(9, "In play, no out", 0)])]),
    );
    feed.schedule.push(GamePk(3));
    let report = MetricKind::BattingAverage
        .compute(&feed, &[PlayerId(8), PlayerId(7)], &query())
        .await
        .unwrap();
    let points = report.plot_points();
    assert_eq!(points[0].0, PlayerId(8));
    assert_eq!(points[1].0, PlayerId(7));
    // catcher zone 9 -> pitcher zone 7 -> (3, -1)
    assert_eq!(points[0].1[&ZoneCoord::new(3, -1)], 1.0);
}
