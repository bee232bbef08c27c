// Configuration loading and parsing (config/zonecast.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use zonecast_core::{MetricKind, RecentGamesQuery, TeamSide};
use zonecast_mlb::StatsApiSettings;

pub const CONFIG_FILE: &str = "zonecast.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// zonecast.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub lineup: LineupConfig,
    pub window: WindowConfig,
    pub output: OutputConfig,
    pub stats_api: StatsApiConfig,
    pub register: RegisterConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineupConfig {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub ids: Vec<u64>,
    /// Take one side's batting order from this game's boxscore.
    #[serde(default)]
    pub game_pk: Option<u64>,
    /// Take one side's batting order from every game on this date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub side: Option<TeamSide>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub days: u32,
    pub games_per_player: usize,
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Tui,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub mode: OutputMode,
    pub metric: MetricKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterConfig {
    pub path: String,
}

impl Config {
    pub fn recent_query(&self) -> RecentGamesQuery {
        RecentGamesQuery {
            window_days: self.window.days,
            anchor: self.window.from_date,
            games_per_player: self.window.games_per_player,
        }
    }

    pub fn stats_api_settings(&self) -> StatsApiSettings {
        StatsApiSettings {
            base_url: self.stats_api.base_url.clone(),
            timeout: Duration::from_secs(self.stats_api.timeout_secs),
            user_agent: self.stats_api.user_agent.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/zonecast.toml` relative to `base_dir`, without
/// copying defaults.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/zonecast.toml` to `config/zonecast.toml` unless the user
/// already has a copy. Returns the path written, if any.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let default_file = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if target.exists() {
        return Ok(None);
    }
    if !default_file.is_file() {
        // No user copy and nothing to seed it from.
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither {} nor {} found; run from the crate root",
                target.display(),
                default_file.display()
            ),
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create {}: {e}", config_dir.display()),
    })?;
    std::fs::copy(&default_file, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", default_file.display(), target.display()),
    })?;

    info!("Wrote default configuration to {}", target.display());
    Ok(Some(target))
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let lineup = &config.lineup;
    let from_games = lineup.game_pk.is_some() || lineup.date.is_some();
    if lineup.names.is_empty() && lineup.ids.is_empty() && !from_games {
        return Err(invalid(
            "lineup",
            "at least one of `names`, `ids`, `game_pk` or `date` is required",
        ));
    }
    if lineup.game_pk.is_some() && lineup.date.is_some() {
        return Err(invalid("lineup.date", "cannot be combined with `game_pk`"));
    }
    if from_games && lineup.side.is_none() {
        return Err(invalid("lineup.side", "required when `game_pk` or `date` is set"));
    }

    if config.window.days == 0 {
        return Err(invalid("window.days", "must be greater than 0"));
    }
    if config.window.games_per_player == 0 {
        return Err(invalid("window.games_per_player", "must be greater than 0"));
    }

    let base_url = &config.stats_api.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "stats_api.base_url",
            format!("must be an http(s) URL, got `{base_url}`"),
        ));
    }
    if config.stats_api.timeout_secs == 0 {
        return Err(invalid("stats_api.timeout_secs", "must be greater than 0"));
    }

    if config.register.path.trim().is_empty() {
        return Err(invalid("register.path", "must not be empty"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
