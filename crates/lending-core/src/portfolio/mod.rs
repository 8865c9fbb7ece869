pub mod breakdown;
pub mod delinquency;
pub mod history;
pub mod limits;
pub mod record;
pub mod summary;

pub use breakdown::{Bucket, CategoryGroup, GradeGroup, PortfolioBreakdown, RateBand};
pub use delinquency::{delinquency_rollup, realized_earning_rate, DelinquencyRollup};
pub use history::{investment_history, HistoryItem};
pub use limits::{investment_capacity, investment_overview, InvestmentCapacity, InvestmentOverview};
pub use record::InvestmentRecord;
pub use summary::{
    aggregate, analyze_portfolio, investor_summary, InvestorSummary, PortfolioAnalysis,
    PortfolioInput, PortfolioReport,
};
