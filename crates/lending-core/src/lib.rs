pub mod amortization;
pub mod config;
pub mod deal;
pub mod error;
pub mod settlement;
pub mod time_value;
pub mod types;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "placement")]
pub mod placement;

pub use config::EngineConfig;
pub use deal::{Deal, DealCategory, DealStatus, Grade, RepaymentMethod};
pub use error::LendingError;
pub use settlement::SettlementState;
pub use types::*;

/// Standard result type for all lending engine operations
pub type LendingResult<T> = Result<T, LendingError>;
