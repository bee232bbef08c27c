// Zonecast entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the Stats API client and load the player register
// 4. Resolve the lineup
// 5. Compute zone metrics
// 6. Print JSON or run the TUI

use std::path::Path;

use anyhow::Context;
use tracing::{error, info};

use zonecast_core::ZoneError;
use zonecast_mlb::{load_register, StatsApiClient};
use zonecast_tui::app;
use zonecast_tui::config::{self, OutputMode};
use zonecast_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Zonecast starting up");

    let config = config::load_config().context("failed to load configuration")?;
    let query = config.recent_query();
    info!(
        "Config loaded: {} days, {} games per player, output {:?}",
        query.window_days, query.games_per_player, config.output.mode
    );

    let provider =
        StatsApiClient::new(&config.stats_api_settings()).context("failed to build HTTP client")?;
    let register = load_register(Path::new(&config.register.path))
        .context("failed to load player register")?;

    let lineup = app::resolve_lineup(&config.lineup, &provider, &register)
        .await
        .context("failed to resolve lineup")?;
    info!("Lineup resolved to {} players", lineup.len());

    let result = match config.output.mode {
        OutputMode::Json => {
            app::build_chart_set(&provider, &register, &lineup, &query, config.output.metric)
                .await
                .map(|set| vec![set])
        }
        OutputMode::Tui => app::build_all_chart_sets(&provider, &register, &lineup, &query).await,
    };

    let sets = match result {
        Ok(sets) => sets,
        Err(ZoneError::NoGamesScheduled { start, end }) => {
            error!("No games scheduled between {} and {}", start, end);
            anyhow::bail!(
                "no games scheduled between {start} and {end}; \
                 check window.from_date and window.days"
            );
        }
        Err(e) => {
            error!("Metric computation failed: {}", e);
            return Err(e).context("failed to compute zone metrics");
        }
    };
    info!("Computed {} chart sets ({} cached games)", sets.len(), provider.cached_games());

    match config.output.mode {
        OutputMode::Json => {
            for set in &sets {
                println!("{}", serde_json::to_string_pretty(&set.to_json())?);
            }
        }
        OutputMode::Tui => {
            if let Err(e) = tui::run(sets, config.output.metric).await {
                error!("TUI error: {}", e);
                return Err(e);
            }
        }
    }

    info!("Zonecast shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("zonecast.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("zonecast=info,zonecast_core=info,zonecast_mlb=info,zonecast_tui=info,warn")
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
