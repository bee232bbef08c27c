// MLB data sources: the public Stats API over HTTP and the Chadwick Bureau
// player register.

pub mod register;
pub mod statsapi;

pub use register::{load_register, PlayerRegister, RegisterError};
pub use statsapi::{StatsApiClient, StatsApiSettings};
