pub mod amortization;
pub mod placement;
pub mod portfolio;
pub mod schedule;
pub mod settlement;
