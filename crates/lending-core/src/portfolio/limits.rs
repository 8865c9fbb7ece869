//! Remaining investment capacity and the investor's headline figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LimitsPolicy;
use crate::deal::DealCategory;
use crate::portfolio::delinquency::realized_earning_rate;
use crate::portfolio::record::InvestmentRecord;
use crate::types::{Money, Rate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentCapacity {
    pub total_limit: Money,
    pub remaining_total: Money,
    pub real_estate_limit: Money,
    pub remaining_real_estate: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentOverview {
    pub realized_earning_rate: Rate,
    /// Outstanding principal plus uninvested deposit.
    pub asset: Money,
    /// Interest received net of commission.
    pub paid_revenue: Money,
}

/// How much more the investor may place before hitting the limits.
pub fn investment_capacity(records: &[InvestmentRecord], limits: &LimitsPolicy) -> InvestmentCapacity {
    let outstanding: Money = records.iter().map(|r| r.outstanding_principal()).sum();
    let real_estate: Money = records
        .iter()
        .filter(|r| r.deal.category == DealCategory::Mortgage)
        .map(|r| r.outstanding_principal())
        .sum();

    InvestmentCapacity {
        total_limit: limits.total_limit,
        remaining_total: (limits.total_limit - outstanding).max(Decimal::ZERO),
        real_estate_limit: limits.real_estate_limit,
        remaining_real_estate: (limits.real_estate_limit - real_estate).max(Decimal::ZERO),
    }
}

pub fn investment_overview(records: &[InvestmentRecord], deposit_balance: Money) -> InvestmentOverview {
    let outstanding: Money = records.iter().map(|r| r.outstanding_principal()).sum();
    let paid_interest: Money = records.iter().map(|r| r.paid_interest()).sum();
    let paid_commission: Money = records.iter().map(|r| r.paid_commission()).sum();

    InvestmentOverview {
        realized_earning_rate: realized_earning_rate(records),
        asset: outstanding + deposit_balance,
        paid_revenue: paid_interest - paid_commission,
    }
}
