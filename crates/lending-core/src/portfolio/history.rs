//! Per-investment history rows.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::deal::{DealStatus, Grade};
use crate::portfolio::record::InvestmentRecord;
use crate::types::{truncate_unit, Money, Rate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub investment_id: u64,
    pub deal_id: u64,
    pub deal_name: String,
    pub grade: Grade,
    pub earning_rate: Rate,
    pub term: u32,
    pub status: DealStatus,
    pub amount: Money,
    pub paid_principal: Money,
    /// Interest over the whole schedule.
    pub total_interest: Money,
    /// Whole percent of the investment already repaid.
    pub repayment_pct: Decimal,
    pub paid_rounds: usize,
    /// The deal is still raising funds.
    pub is_cancelable: bool,
}

/// History rows, newest investment first.
pub fn investment_history(records: &[InvestmentRecord]) -> Vec<HistoryItem> {
    let mut items: Vec<HistoryItem> = records.iter().map(history_item).collect();
    items.sort_by(|a, b| b.investment_id.cmp(&a.investment_id));
    items
}

fn history_item(record: &InvestmentRecord) -> HistoryItem {
    let paid_principal = record.paid_principal();
    let repayment_pct = if record.amount.is_zero() {
        Decimal::ZERO
    } else {
        truncate_unit(paid_principal / record.amount * dec!(100))
    };

    HistoryItem {
        investment_id: record.investment_id,
        deal_id: record.deal.id,
        deal_name: record.deal.name.clone(),
        grade: record.deal.grade,
        earning_rate: record.deal.earning_rate,
        term: record.deal.term,
        status: record.deal.status,
        amount: record.amount,
        paid_principal,
        total_interest: record.scheduled_interest(),
        repayment_pct,
        paid_rounds: record.paid_rounds(),
        is_cancelable: record.deal.status == DealStatus::Applying,
    }
}
