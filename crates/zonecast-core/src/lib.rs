// Library root: zone geometry, pitch model, per-zone metrics, and the
// provider seams the Stats API and player register plug into.

pub mod counters;
pub mod error;
pub mod metrics;
pub mod names;
pub mod pitch;
pub mod play;
pub mod provider;
pub mod recent;
pub mod zone;

pub use error::ZoneError;
pub use metrics::{MetricKind, PlayerZoneRates, ZoneReport};
pub use provider::{GamePk, PlayerId, PlayerLookup, PlayerName, ProviderError, StatsProvider, TeamSide};
pub use recent::{RecentGames, RecentGamesQuery};
pub use zone::{Zone, ZoneCoord};
