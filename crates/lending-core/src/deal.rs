//! Deal records and the closed code tables that describe them.
//!
//! Storage keeps repayment method, status, category and grade as small
//! integer codes. Each table decodes through `TryFrom<u8>` so an unknown
//! code is rejected at the boundary instead of defaulting silently.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amortization::MAX_TERM;
use crate::error::LendingError;
use crate::types::{Money, Rate};
use crate::LendingResult;

/// Days from start date to end date used to anchor schedules of deals
/// whose end date has not been fixed yet.
pub const ANCHOR_TERM_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Code tables
// ---------------------------------------------------------------------------

/// How a deal repays principal and interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepaymentMethod {
    /// Fixed payment of principal / 20 per period, split into interest
    /// and principal on the declining balance.
    Mixed,
    /// Annuity: constant total payment per period.
    EqualInstallment,
    /// Interest only, full principal at the final period.
    Balloon,
    /// Constant principal per period, declining interest.
    EqualPrincipal,
}

impl RepaymentMethod {
    pub const ALL: [RepaymentMethod; 4] = [
        RepaymentMethod::Mixed,
        RepaymentMethod::EqualInstallment,
        RepaymentMethod::Balloon,
        RepaymentMethod::EqualPrincipal,
    ];

    pub fn code(self) -> u8 {
        match self {
            RepaymentMethod::Mixed => 1,
            RepaymentMethod::EqualInstallment => 2,
            RepaymentMethod::Balloon => 3,
            RepaymentMethod::EqualPrincipal => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepaymentMethod::Mixed => "Mixed",
            RepaymentMethod::EqualInstallment => "Equal installment",
            RepaymentMethod::Balloon => "Balloon",
            RepaymentMethod::EqualPrincipal => "Equal principal",
        }
    }
}

impl TryFrom<u8> for RepaymentMethod {
    type Error = LendingError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        RepaymentMethod::ALL
            .into_iter()
            .find(|m| m.code() == code)
            .ok_or(LendingError::UnsupportedMethod(code))
    }
}

impl fmt::Display for RepaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Servicing status of a deal. Set by collections, only read here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStatus {
    Applying,
    Normal,
    Delay,
    Overdue,
    Nonperform,
    NormalCompletion,
    NonperformCompletion,
    Scheduled,
}

impl DealStatus {
    pub const ALL: [DealStatus; 8] = [
        DealStatus::Applying,
        DealStatus::Normal,
        DealStatus::Delay,
        DealStatus::Overdue,
        DealStatus::Nonperform,
        DealStatus::NormalCompletion,
        DealStatus::NonperformCompletion,
        DealStatus::Scheduled,
    ];

    pub fn code(self) -> u8 {
        match self {
            DealStatus::Applying => 1,
            DealStatus::Normal => 2,
            DealStatus::Delay => 3,
            DealStatus::Overdue => 4,
            DealStatus::Nonperform => 5,
            DealStatus::NormalCompletion => 6,
            DealStatus::NonperformCompletion => 7,
            DealStatus::Scheduled => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DealStatus::Applying => "Applying",
            DealStatus::Normal => "Normal",
            DealStatus::Delay => "Delayed",
            DealStatus::Overdue => "Overdue",
            DealStatus::Nonperform => "Non-performing",
            DealStatus::NormalCompletion => "Repaid",
            DealStatus::NonperformCompletion => "Closed with loss",
            DealStatus::Scheduled => "Scheduled",
        }
    }

    /// True once money has been lent out, i.e. the deal has a repayment
    /// history to speak of.
    pub fn is_serviced(self) -> bool {
        !matches!(self, DealStatus::Scheduled | DealStatus::Applying)
    }
}

impl TryFrom<u8> for DealStatus {
    type Error = LendingError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        DealStatus::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or_else(|| LendingError::UnknownCode {
                kind: "deal status".into(),
                code,
            })
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealCategory {
    /// Real-estate backed loan.
    Mortgage,
    PersonalCredit,
    Special,
    Corporate,
    Other,
}

impl DealCategory {
    pub const ALL: [DealCategory; 5] = [
        DealCategory::Mortgage,
        DealCategory::PersonalCredit,
        DealCategory::Special,
        DealCategory::Corporate,
        DealCategory::Other,
    ];

    pub fn code(self) -> u8 {
        match self {
            DealCategory::Mortgage => 1,
            DealCategory::PersonalCredit => 2,
            DealCategory::Special => 3,
            DealCategory::Corporate => 4,
            DealCategory::Other => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DealCategory::Mortgage => "Real-estate mortgage",
            DealCategory::PersonalCredit => "Personal credit",
            DealCategory::Special => "Special deal",
            DealCategory::Corporate => "Corporate",
            DealCategory::Other => "Other",
        }
    }
}

impl TryFrom<u8> for DealCategory {
    type Error = LendingError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        DealCategory::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| LendingError::UnknownCode {
                kind: "deal category".into(),
                code,
            })
    }
}

/// Credit grade, A+ (best) through D-.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grade {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    /// No grade assigned; has no storage code.
    Unrated,
}

impl Grade {
    pub const RATED: [Grade; 12] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::DMinus,
    ];

    pub fn code(self) -> Option<u8> {
        Grade::RATED
            .iter()
            .position(|g| *g == self)
            .map(|idx| idx as u8 + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::Unrated => "Unrated",
        }
    }
}

impl TryFrom<u8> for Grade {
    type Error = LendingError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1..=12 => Ok(Grade::RATED[code as usize - 1]),
            _ => Err(LendingError::UnknownCode {
                kind: "grade".into(),
                code,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Deal
// ---------------------------------------------------------------------------

/// A funding request pooled from many investors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: u64,
    pub name: String,
    pub category: DealCategory,
    pub grade: Grade,
    /// Net amount raised, in whole currency units.
    pub principal: Money,
    /// Interest rate per repayment period (monthly).
    pub periodic_rate: Rate,
    /// Projected annualized earning rate as stored at origination
    /// (a percentage, e.g. 10.39).
    #[serde(default)]
    pub earning_rate: Rate,
    /// Number of repayment periods.
    pub term: u32,
    pub repayment_method: RepaymentMethod,
    /// Day of month payments fall due (1-31).
    pub payment_day: u32,
    pub start_date: NaiveDate,
    /// Unset while the deal is still pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: DealStatus,
}

impl Deal {
    /// Date the payback calendar is anchored on.
    pub fn anchor_date(&self) -> NaiveDate {
        self.end_date
            .or_else(|| {
                self.start_date
                    .checked_add_signed(Duration::days(ANCHOR_TERM_DAYS))
            })
            .unwrap_or(NaiveDate::MAX)
    }

    /// Check the deal's terms before any schedule is derived from them.
    pub fn validate(&self) -> LendingResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(LendingError::invalid(
                "principal",
                "Deal principal must be positive",
            ));
        }
        if self.periodic_rate < Decimal::ZERO {
            return Err(LendingError::invalid(
                "periodic_rate",
                "Periodic rate cannot be negative",
            ));
        }
        if self.term == 0 || self.term > MAX_TERM {
            return Err(LendingError::invalid(
                "term",
                format!("Term must be 1-{MAX_TERM} periods, got {}", self.term),
            ));
        }
        if !(1..=31).contains(&self.payment_day) {
            return Err(LendingError::invalid(
                "payment_day",
                format!("Payment day must be 1-31, got {}", self.payment_day),
            ));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(LendingError::invalid(
                    "end_date",
                    "End date cannot precede start date",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_deal() -> Deal {
        Deal {
            id: 1,
            name: "deal_1".into(),
            category: DealCategory::PersonalCredit,
            grade: Grade::A,
            principal: dec!(240_000),
            periodic_rate: dec!(0.005),
            earning_rate: dec!(3.74),
            term: 12,
            repayment_method: RepaymentMethod::EqualInstallment,
            payment_day: 2,
            start_date: NaiveDate::from_ymd_opt(2021, 5, 19).unwrap(),
            end_date: None,
            status: DealStatus::Normal,
        }
    }

    #[test]
    fn test_unknown_method_code_is_unsupported() {
        assert_eq!(
            RepaymentMethod::try_from(9),
            Err(LendingError::UnsupportedMethod(9))
        );
        assert_eq!(RepaymentMethod::try_from(3), Ok(RepaymentMethod::Balloon));
    }

    #[test]
    fn test_status_codes_match_storage_table() {
        for status in DealStatus::ALL {
            assert_eq!(DealStatus::try_from(status.code()), Ok(status));
        }
        assert!(DealStatus::try_from(0).is_err());
    }

    #[test]
    fn test_grade_codes() {
        assert_eq!(Grade::try_from(1), Ok(Grade::APlus));
        assert_eq!(Grade::try_from(12), Ok(Grade::DMinus));
        assert_eq!(Grade::DMinus.code(), Some(12));
        assert_eq!(Grade::Unrated.code(), None);
        assert!(Grade::try_from(13).is_err());
    }

    #[test]
    fn test_anchor_falls_back_to_start_plus_term_days() {
        let mut deal = sample_deal();
        assert_eq!(
            deal.anchor_date(),
            NaiveDate::from_ymd_opt(2021, 6, 18).unwrap()
        );
        deal.end_date = NaiveDate::from_ymd_opt(2021, 7, 1);
        assert_eq!(deal.anchor_date(), NaiveDate::from_ymd_opt(2021, 7, 1).unwrap());
    }

    #[test]
    fn test_validate_rejects_bad_payment_day() {
        let mut deal = sample_deal();
        deal.payment_day = 32;
        assert!(matches!(
            deal.validate(),
            Err(LendingError::InvalidParameter { ref field, .. }) if field == "payment_day"
        ));
    }

    #[test]
    fn test_validate_caps_term() {
        let mut deal = sample_deal();
        deal.term = MAX_TERM;
        assert!(deal.validate().is_ok());
        deal.term = u32::MAX;
        assert!(matches!(
            deal.validate(),
            Err(LendingError::InvalidParameter { ref field, .. }) if field == "term"
        ));
    }

    #[test]
    fn test_serde_uses_screaming_case() {
        let json = serde_json::to_value(sample_deal()).unwrap();
        assert_eq!(json["repayment_method"], "EQUAL_INSTALLMENT");
        assert_eq!(json["grade"], "A");
        assert_eq!(json["category"], "PERSONAL_CREDIT");
        assert!(json.get("end_date").is_none());
    }
}
