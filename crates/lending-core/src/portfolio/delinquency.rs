//! Delinquency rollup and realized earning rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::deal::DealStatus;
use crate::portfolio::record::InvestmentRecord;
use crate::time_value::PERIODS_PER_YEAR;
use crate::types::{Money, Rate};

/// Invested principal split by repayment standing.
///
/// `complete` holds principal already returned; the remaining buckets
/// hold each investment's outstanding principal under its deal's status,
/// so `complete + outstanding` equals the total invested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DelinquencyRollup {
    pub complete: Money,
    pub normal: Money,
    pub delay: Money,
    pub overdue: Money,
    pub nonperform: Money,
    pub loss: Money,
    pub outstanding: Money,
    /// Percent per year.
    pub realized_earning_rate: Rate,
}

pub fn delinquency_rollup(records: &[InvestmentRecord]) -> DelinquencyRollup {
    let mut rollup = DelinquencyRollup::default();

    for record in records {
        rollup.complete += record.paid_principal();
        let outstanding = record.outstanding_principal();
        match record.deal.status {
            DealStatus::Delay => rollup.delay += outstanding,
            DealStatus::Overdue => rollup.overdue += outstanding,
            DealStatus::Nonperform => rollup.nonperform += outstanding,
            DealStatus::NonperformCompletion => rollup.loss += outstanding,
            DealStatus::Applying
            | DealStatus::Normal
            | DealStatus::NormalCompletion
            | DealStatus::Scheduled => rollup.normal += outstanding,
        }
    }

    rollup.outstanding =
        rollup.normal + rollup.delay + rollup.overdue + rollup.nonperform + rollup.loss;
    rollup.realized_earning_rate = realized_earning_rate(records);
    rollup
}

/// Annualized return on funded investments, in percent:
///
/// `sum(collected interest) / sum(invested) * annualization * 100`
///
/// Collected interest covers every round already due, paid or unpaid.
/// The annualization factor is `12 / R`, where `R` is the amount-weighted
/// number of monthly rounds the investments have run. Deals that have not
/// been funded are left out.
pub fn realized_earning_rate(records: &[InvestmentRecord]) -> Rate {
    let mut interest = Decimal::ZERO;
    let mut invested = Decimal::ZERO;
    let mut weighted_rounds = Decimal::ZERO;

    for record in records.iter().filter(|r| r.deal.status.is_serviced()) {
        interest += record.collected_interest();
        invested += record.amount;
        weighted_rounds += record.amount * Decimal::from(record.settled_rounds() as u64);
    }

    if invested.is_zero() || weighted_rounds.is_zero() {
        return Decimal::ZERO;
    }
    let annualization = Decimal::from(PERIODS_PER_YEAR) * invested / weighted_rounds;
    interest * annualization / invested * dec!(100)
}
