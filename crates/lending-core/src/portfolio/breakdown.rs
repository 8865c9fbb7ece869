//! Portfolio breakdown along three fixed axes.
//!
//! Each axis is a closed set of buckets; every investment falls into
//! exactly one bucket per axis, so bucket amounts always add up to the
//! total invested.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::deal::{Deal, DealCategory, Grade};
use crate::portfolio::record::InvestmentRecord;
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradeGroup {
    ATier,
    BTier,
    CTier,
    DTier,
    Other,
}

impl GradeGroup {
    pub const ALL: [GradeGroup; 5] = [
        GradeGroup::ATier,
        GradeGroup::BTier,
        GradeGroup::CTier,
        GradeGroup::DTier,
        GradeGroup::Other,
    ];

    pub fn of(grade: Grade) -> Self {
        match grade {
            Grade::APlus | Grade::A | Grade::AMinus => GradeGroup::ATier,
            Grade::BPlus | Grade::B | Grade::BMinus => GradeGroup::BTier,
            Grade::CPlus | Grade::C | Grade::CMinus => GradeGroup::CTier,
            Grade::DPlus | Grade::D | Grade::DMinus => GradeGroup::DTier,
            Grade::Unrated => GradeGroup::Other,
        }
    }
}

/// Bands on the deal's stored annualized earning rate (percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateBand {
    Below8,
    From8To10,
    From10To12,
    From12,
}

impl RateBand {
    pub const ALL: [RateBand; 4] = [
        RateBand::Below8,
        RateBand::From8To10,
        RateBand::From10To12,
        RateBand::From12,
    ];

    pub fn of(earning_rate: Rate) -> Self {
        if earning_rate < dec!(8) {
            RateBand::Below8
        } else if earning_rate < dec!(10) {
            RateBand::From8To10
        } else if earning_rate < dec!(12) {
            RateBand::From10To12
        } else {
            RateBand::From12
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryGroup {
    PersonalCredit,
    Corporate,
    Special,
    RealEstate,
    Other,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 5] = [
        CategoryGroup::PersonalCredit,
        CategoryGroup::Corporate,
        CategoryGroup::Special,
        CategoryGroup::RealEstate,
        CategoryGroup::Other,
    ];

    pub fn of(category: DealCategory) -> Self {
        match category {
            DealCategory::PersonalCredit => CategoryGroup::PersonalCredit,
            DealCategory::Corporate => CategoryGroup::Corporate,
            DealCategory::Special => CategoryGroup::Special,
            DealCategory::Mortgage => CategoryGroup::RealEstate,
            DealCategory::Other => CategoryGroup::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket<K> {
    pub key: K,
    /// Total invested in the bucket.
    pub amount: Money,
    /// Distinct deals in the bucket.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioBreakdown {
    pub by_grade: Vec<Bucket<GradeGroup>>,
    pub by_rate_band: Vec<Bucket<RateBand>>,
    pub by_category: Vec<Bucket<CategoryGroup>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn breakdown(records: &[InvestmentRecord]) -> PortfolioBreakdown {
    PortfolioBreakdown {
        by_grade: bucket_by(records, &GradeGroup::ALL, |d| GradeGroup::of(d.grade)),
        by_rate_band: bucket_by(records, &RateBand::ALL, |d| RateBand::of(d.earning_rate)),
        by_category: bucket_by(records, &CategoryGroup::ALL, |d| {
            CategoryGroup::of(d.category)
        }),
    }
}

fn bucket_by<K, F>(records: &[InvestmentRecord], keys: &[K], key_of: F) -> Vec<Bucket<K>>
where
    K: Copy + PartialEq,
    F: Fn(&Deal) -> K,
{
    keys.iter()
        .map(|&key| {
            let mut amount = Decimal::ZERO;
            let mut deals = BTreeSet::new();
            for record in records.iter().filter(|r| key_of(&r.deal) == key) {
                amount += record.amount;
                deals.insert(record.deal.id);
            }
            Bucket {
                key,
                amount,
                count: deals.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_band_edges() {
        assert_eq!(RateBand::of(dec!(7.99)), RateBand::Below8);
        assert_eq!(RateBand::of(dec!(8)), RateBand::From8To10);
        assert_eq!(RateBand::of(dec!(10)), RateBand::From10To12);
        assert_eq!(RateBand::of(dec!(11.99)), RateBand::From10To12);
        assert_eq!(RateBand::of(dec!(12)), RateBand::From12);
        assert_eq!(RateBand::of(dec!(-1)), RateBand::Below8);
    }

    #[test]
    fn test_every_grade_has_one_group() {
        for grade in Grade::RATED {
            assert_ne!(GradeGroup::of(grade), GradeGroup::Other);
        }
        assert_eq!(GradeGroup::of(Grade::Unrated), GradeGroup::Other);
        assert_eq!(GradeGroup::of(Grade::BMinus), GradeGroup::BTier);
    }

    #[test]
    fn test_mortgage_is_real_estate() {
        assert_eq!(CategoryGroup::of(DealCategory::Mortgage), CategoryGroup::RealEstate);
    }

    #[test]
    fn test_empty_portfolio_has_zeroed_buckets() {
        let b = breakdown(&[]);
        assert_eq!(b.by_grade.len(), 5);
        assert_eq!(b.by_rate_band.len(), 4);
        assert_eq!(b.by_category.len(), 5);
        assert!(b
            .by_grade
            .iter()
            .all(|bucket| bucket.amount.is_zero() && bucket.count == 0));
    }
}
