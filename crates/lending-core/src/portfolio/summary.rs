use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::deal::DealStatus;
use crate::portfolio::breakdown::{breakdown, PortfolioBreakdown};
use crate::portfolio::delinquency::{delinquency_rollup, DelinquencyRollup};
use crate::portfolio::limits::{
    investment_capacity, investment_overview, InvestmentCapacity, InvestmentOverview,
};
use crate::portfolio::record::InvestmentRecord;
use crate::settlement::SettlementState;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub records: Vec<InvestmentRecord>,
    pub today: NaiveDate,
    /// Uninvested cash held for the investor, counted in the overview.
    #[serde(default)]
    pub deposit_balance: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorSummary {
    pub investment_count: usize,
    pub total_invested: Money,
    /// Net receipts (principal + interest - tax - commission) of rounds
    /// already due.
    pub total_collected: Money,
    pub interest_collected: Money,
    pub paid_principal: Money,
    pub paid_interest: Money,
    /// Investments per deal status; every status is present.
    pub status_counts: BTreeMap<DealStatus, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub investor_summary: InvestorSummary,
    pub portfolio_breakdown: PortfolioBreakdown,
    pub delinquency_rollup: DelinquencyRollup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    #[serde(flatten)]
    pub report: PortfolioReport,
    pub capacity: InvestmentCapacity,
    pub overview: InvestmentOverview,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fold investment records into the three report views. Settlement states
/// are read as stored; an empty slice gives zero-valued aggregates.
pub fn aggregate(records: &[InvestmentRecord], today: NaiveDate) -> PortfolioReport {
    tracing::debug!(records = records.len(), %today, "aggregating portfolio");
    PortfolioReport {
        investor_summary: investor_summary(records, today),
        portfolio_breakdown: breakdown(records),
        delinquency_rollup: delinquency_rollup(records),
    }
}

pub fn investor_summary(records: &[InvestmentRecord], today: NaiveDate) -> InvestorSummary {
    let mut status_counts: BTreeMap<DealStatus, usize> =
        DealStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut summary = InvestorSummary {
        investment_count: records.len(),
        total_invested: Decimal::ZERO,
        total_collected: Decimal::ZERO,
        interest_collected: Decimal::ZERO,
        paid_principal: Decimal::ZERO,
        paid_interest: Decimal::ZERO,
        status_counts: BTreeMap::new(),
    };

    for record in records {
        summary.total_invested += record.amount;
        *status_counts.entry(record.deal.status).or_insert(0) += 1;

        for entry in &record.entries {
            if entry.state.is_resolved() && entry.due_date <= today {
                summary.total_collected += entry.net_receipt();
                summary.interest_collected += entry.interest;
            }
            if entry.state == SettlementState::Paid {
                summary.paid_principal += entry.principal;
                summary.paid_interest += entry.interest;
            }
        }
    }

    summary.status_counts = status_counts;
    summary
}

/// Full portfolio analysis for one investor, in the computation envelope.
pub fn analyze_portfolio(
    input: &PortfolioInput,
    config: &EngineConfig,
) -> LendingResult<ComputationOutput<PortfolioAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;
    for record in &input.records {
        record.validate()?;
        if record.entries.is_empty() {
            warnings.push(format!(
                "Investment {} has no schedule entries",
                record.investment_id
            ));
        }
    }
    if input.records.is_empty() {
        warnings.push("No investment records supplied; aggregates are zero".into());
    }

    let report = aggregate(&input.records, input.today);
    let capacity = investment_capacity(&input.records, &config.limits);
    let overview = investment_overview(
        &input.records,
        input.deposit_balance.unwrap_or(Decimal::ZERO),
    );

    if report.delinquency_rollup.loss > Decimal::ZERO {
        tracing::warn!(loss = %report.delinquency_rollup.loss, "portfolio carries written-off principal");
    }

    let output = PortfolioAnalysis {
        report,
        capacity,
        overview,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Portfolio aggregation over persisted payback schedules",
        &serde_json::json!({
            "today": input.today,
            "records": input.records.len(),
            "grade_groups": "A/B/C/D tiers, other",
            "rate_bands_pct": "<8, 8-10, 10-12, >=12",
            "total_limit": config.limits.total_limit.to_string(),
            "real_estate_limit": config.limits.real_estate_limit.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
