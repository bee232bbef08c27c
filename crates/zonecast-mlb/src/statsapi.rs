// MLB Stats API client.
//
// Implements `StatsProvider` over three endpoints: the schedule, a game's
// play-by-play, and a game's boxscore. Play-by-play documents are cached for
// the life of the client so every metric computed in one session reuses the
// same fetch.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use zonecast_core::play::PlayByPlay;
use zonecast_core::{GamePk, PlayerId, ProviderError, StatsProvider, TeamSide};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://statsapi.mlb.com";
const SPORT_ID_MLB: u32 = 1;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StatsApiSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for StatsApiSettings {
    fn default() -> Self {
        StatsApiSettings {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("zonecast/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDate {
    #[serde(default)]
    games: Vec<ScheduleGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleGame {
    game_pk: u64,
}

#[derive(Debug, Deserialize)]
struct BoxscoreResponse {
    teams: BoxscoreTeams,
}

#[derive(Debug, Deserialize)]
struct BoxscoreTeams {
    home: BoxscoreTeam,
    away: BoxscoreTeam,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoxscoreTeam {
    #[serde(default)]
    batting_order: Vec<u64>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Game ids from a schedule document, flattened across dates in order.
pub fn parse_schedule(body: &str) -> Result<Vec<GamePk>, serde_json::Error> {
    let schedule: ScheduleResponse = serde_json::from_str(body)?;
    Ok(schedule
        .dates
        .into_iter()
        .flat_map(|d| d.games)
        .map(|g| GamePk(g.game_pk))
        .collect())
}

/// One side's batting order from a boxscore document.
pub fn parse_batting_order(body: &str, side: TeamSide) -> Result<Vec<PlayerId>, serde_json::Error> {
    let boxscore: BoxscoreResponse = serde_json::from_str(body)?;
    let team = match side {
        TeamSide::Home => boxscore.teams.home,
        TeamSide::Away => boxscore.teams.away,
    };
    Ok(team.batting_order.into_iter().map(PlayerId).collect())
}

// ---------------------------------------------------------------------------
// StatsApiClient
// ---------------------------------------------------------------------------

pub struct StatsApiClient {
    http: reqwest::Client,
    base_url: String,
    play_by_play_cache: Mutex<HashMap<GamePk, PlayByPlay>>,
}

impl StatsApiClient {
    pub fn new(settings: &StatsApiSettings) -> Result<Self, ProviderError> {
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| ProviderError::Transport {
                url: base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            base_url,
            play_by_play_cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn schedule_url(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/api/v1/schedule?sportId={}&startDate={}&endDate={}",
            self.base_url,
            SPORT_ID_MLB,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }

    fn game_url(&self, game: GamePk, endpoint: &str) -> String {
        format!("{}/api/v1/game/{}/{}", self.base_url, game, endpoint)
    }

    /// GET `url` and return the body of a 2xx response.
    async fn get_text(&self, url: &str) -> Result<String, ProviderError> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| ProviderError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| decode_error(url, e))
    }

    fn cached_play_by_play(&self, game: GamePk) -> Option<PlayByPlay> {
        let cache = self
            .play_by_play_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.get(&game).cloned()
    }

    fn cache_play_by_play(&self, game: GamePk, doc: &PlayByPlay) {
        let mut cache = self
            .play_by_play_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(game, doc.clone());
    }

    /// Number of play-by-play documents held in the session cache.
    pub fn cached_games(&self) -> usize {
        self.play_by_play_cache
            .lock()
            .map(|c| c.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }
}

fn decode_error(url: &str, e: serde_json::Error) -> ProviderError {
    ProviderError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    }
}

#[async_trait]
impl StatsProvider for StatsApiClient {
    async fn scheduled_games(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<GamePk>, ProviderError> {
        let url = self.schedule_url(start, end);
        let body = self.get_text(&url).await?;
        let games = parse_schedule(&body).map_err(|e| decode_error(&url, e))?;
        info!("Schedule {}..{}: {} games", start, end, games.len());
        Ok(games)
    }

    async fn play_by_play(&self, game: GamePk) -> Result<PlayByPlay, ProviderError> {
        if let Some(doc) = self.cached_play_by_play(game) {
            debug!("play-by-play cache hit for game {}", game);
            return Ok(doc);
        }
        let url = self.game_url(game, "playByPlay");
        let doc: PlayByPlay = self.get_json(&url).await?;
        self.cache_play_by_play(game, &doc);
        Ok(doc)
    }

    async fn batting_order(
        &self,
        game: GamePk,
        side: TeamSide,
    ) -> Result<Vec<PlayerId>, ProviderError> {
        let url = self.game_url(game, "boxscore");
        let body = self.get_text(&url).await?;
        parse_batting_order(&body, side).map_err(|e| decode_error(&url, e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
