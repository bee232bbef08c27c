// Error taxonomy for zone aggregation.
//
// Upstream fetch failures and missing fields are logged and skipped where
// they happen; only the variants below ever reach a caller.

use chrono::NaiveDate;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::zone::Zone;

#[derive(Debug, Error)]
pub enum ZoneError {
    /// A zone value outside {1..9, 11..14}. Either the upstream feed changed
    /// or a lookup table is wrong; both corrupt aggregates if absorbed.
    #[error("zone {0} is outside the 13-zone domain")]
    UnknownZone(i64),

    #[error("zone {zone} is not tracked by the {metric} counters")]
    UntrackedZone { zone: Zone, metric: &'static str },

    #[error("unrecognized pitch outcome `{0}`")]
    UnknownPitchOutcome(String),

    #[error("no games scheduled between {start} and {end}")]
    NoGamesScheduled { start: NaiveDate, end: NaiveDate },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("could not parse player name `{0}`: expected `First Last`")]
    MalformedName(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
