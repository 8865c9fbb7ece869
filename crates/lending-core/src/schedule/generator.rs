//! Payback schedule generation for one investor-deal pair.
//!
//! Runs the amortization calculator once on the investor's amount, lays the
//! periods onto the payback calendar and withholds tax and commission from
//! each round's interest. Entries come out classified against the caller's
//! "today".

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::calculator::amortize_with_warnings;
use crate::config::{EngineConfig, SettlementPolicy, WithholdingPolicy};
use crate::deal::Deal;
use crate::error::LendingError;
use crate::schedule::calendar::due_dates;
use crate::settlement::{classify_state_with, SettlementState};
use crate::types::{floor_to_multiple, with_metadata, ComputationOutput, Money, Rate};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One round's obligation for an investor-deal pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub round: u32,
    pub due_date: NaiveDate,
    pub interest: Money,
    pub principal: Money,
    pub tax: Money,
    pub commission: Money,
    pub state: SettlementState,
}

impl ScheduleEntry {
    /// Interest left to the investor after withholding.
    pub fn net_interest(&self) -> Money {
        self.interest - self.tax - self.commission
    }

    /// Cash the investor receives for the round.
    pub fn net_receipt(&self) -> Money {
        self.principal + self.net_interest()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub deal: Deal,
    pub investor_amount: Money,
    /// "Today" for settlement classification.
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub rounds: u32,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_tax: Money,
    pub total_commission: Money,
    pub net_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub deal_id: u64,
    pub investor_amount: Money,
    pub annualized_earning_rate: Rate,
    pub entries: Vec<ScheduleEntry>,
    pub summary: ScheduleSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Tax and commission withheld from one round's interest:
/// commission = floor(interest * commission_rate),
/// tax = floor(interest * tax_rate / unit) * unit.
pub fn withhold(interest: Money, policy: &WithholdingPolicy) -> (Money, Money) {
    let tax = floor_to_multiple(interest * policy.tax_rate, policy.tax_rounding_unit);
    let commission = (interest * policy.commission_rate).floor();
    (tax, commission)
}

/// Schedule anchored on the deal's own anchor date.
pub fn generate_schedule(
    deal: &Deal,
    investor_amount: Money,
    as_of: NaiveDate,
    config: &EngineConfig,
) -> LendingResult<Vec<ScheduleEntry>> {
    generate_schedule_from(deal, investor_amount, deal.anchor_date(), as_of, config)
}

/// Schedule anchored on an explicit date.
pub fn generate_schedule_from(
    deal: &Deal,
    investor_amount: Money,
    anchor: NaiveDate,
    as_of: NaiveDate,
    config: &EngineConfig,
) -> LendingResult<Vec<ScheduleEntry>> {
    let mut warnings = Vec::new();
    generate_entries(deal, investor_amount, anchor, as_of, config, &mut warnings)
        .map(|(entries, _)| entries)
}

/// Recompute the settlement state of existing entries. Only `state`
/// changes; returns how many entries moved.
pub fn reclassify(
    entries: &mut [ScheduleEntry],
    deal: &Deal,
    today: NaiveDate,
    policy: &SettlementPolicy,
) -> usize {
    let mut changed = 0;
    for entry in entries.iter_mut() {
        let state = classify_state_with(policy, deal.status, entry.due_date, today, deal.end_date);
        if state != entry.state {
            entry.state = state;
            changed += 1;
        }
    }
    tracing::debug!(deal_id = deal.id, changed, "reclassified schedule");
    changed
}

pub fn summarize(entries: &[ScheduleEntry]) -> ScheduleSummary {
    let mut summary = ScheduleSummary {
        rounds: entries.len() as u32,
        total_interest: Decimal::ZERO,
        total_principal: Decimal::ZERO,
        total_tax: Decimal::ZERO,
        total_commission: Decimal::ZERO,
        net_interest: Decimal::ZERO,
        first_due_date: entries.iter().map(|e| e.due_date).min(),
        last_due_date: entries.iter().map(|e| e.due_date).max(),
    };
    for e in entries {
        summary.total_interest += e.interest;
        summary.total_principal += e.principal;
        summary.total_tax += e.tax;
        summary.total_commission += e.commission;
        summary.net_interest += e.net_interest();
    }
    summary
}

/// Generate and summarise a schedule inside the computation envelope.
pub fn build_schedule(
    request: &ScheduleRequest,
    config: &EngineConfig,
) -> LendingResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;
    let (entries, annualized_earning_rate) = generate_entries(
        &request.deal,
        request.investor_amount,
        request.deal.anchor_date(),
        request.as_of,
        config,
        &mut warnings,
    )?;

    let summary = summarize(&entries);

    let output = ScheduleOutput {
        deal_id: request.deal.id,
        investor_amount: request.investor_amount,
        annualized_earning_rate,
        entries,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payback schedule: amortization periods on the payback calendar, net of withholding",
        &serde_json::json!({
            "deal_id": request.deal.id,
            "method": request.deal.repayment_method,
            "anchor_date": request.deal.anchor_date(),
            "payment_day": request.deal.payment_day,
            "first_payment_lag_months": config.schedule.first_payment_lag_months,
            "day_overflow": config.schedule.day_overflow,
            "as_of": request.as_of,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Entries plus the projected earning rate of the amortization behind them.
pub(crate) fn generate_entries(
    deal: &Deal,
    investor_amount: Money,
    anchor: NaiveDate,
    as_of: NaiveDate,
    config: &EngineConfig,
    warnings: &mut Vec<String>,
) -> LendingResult<(Vec<ScheduleEntry>, Rate)> {
    deal.validate()?;
    if investor_amount > deal.principal {
        return Err(LendingError::invalid(
            "investor_amount",
            format!(
                "Investment {investor_amount} exceeds the deal's principal {}",
                deal.principal
            ),
        ));
    }

    let amortization = amortize_with_warnings(
        investor_amount,
        deal.periodic_rate,
        deal.term,
        deal.repayment_method,
        warnings,
    )?;
    let dates = due_dates(
        anchor,
        deal.payment_day,
        config.schedule.first_payment_lag_months,
        deal.term,
        config.schedule.day_overflow,
    )?;

    tracing::debug!(
        deal_id = deal.id,
        %investor_amount,
        rounds = dates.len(),
        "generating payback schedule"
    );

    let entries = amortization
        .periods
        .iter()
        .zip(dates)
        .map(|(period, due_date)| {
            let (tax, commission) = withhold(period.interest, &config.withholding);
            ScheduleEntry {
                round: period.round,
                due_date,
                interest: period.interest,
                principal: period.principal,
                tax,
                commission,
                state: classify_state_with(
                    &config.settlement,
                    deal.status,
                    due_date,
                    as_of,
                    deal.end_date,
                ),
            }
        })
        .collect();

    Ok((entries, amortization.annualized_earning_rate))
}
