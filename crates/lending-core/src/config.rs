//! Engine configuration.
//!
//! Every section has defaults matching the platform's domain rules, so an
//! empty document (`{}`) is a valid configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LendingError;
use crate::types::{Money, Rate};
use crate::LendingResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub schedule: SchedulePolicy,
    pub withholding: WithholdingPolicy,
    pub settlement: SettlementPolicy,
    pub limits: LimitsPolicy,
    pub placement: PlacementPolicy,
}

/// What to do when the payment day does not exist in the target month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOverflow {
    /// Spill the missing days into the following month (31 Sep -> 1 Oct).
    #[default]
    Rollover,
    /// Use the last day of the target month.
    ClampToMonthEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulePolicy {
    /// Calendar months between the anchor date's month and the first due date.
    pub first_payment_lag_months: u32,
    pub day_overflow: DayOverflow,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            first_payment_lag_months: 2,
            day_overflow: DayOverflow::Rollover,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WithholdingPolicy {
    pub tax_rate: Rate,
    pub commission_rate: Rate,
    /// Tax is rounded down to a multiple of this many currency units.
    pub tax_rounding_unit: Money,
}

impl Default for WithholdingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: dec!(0.15),
            commission_rate: dec!(0.15),
            tax_rounding_unit: dec!(10),
        }
    }
}

/// Upper bound on any grace window: a hundred years.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Look-back windows, in days, inside which a past-due round of a
/// distressed deal counts as unpaid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementPolicy {
    pub delay_window_days: i64,
    pub overdue_window_days: i64,
    pub nonperform_window_days: i64,
    /// Rounds due more than this many days after the end date of a deal
    /// closed with loss were never recovered.
    pub loss_cutoff_days: i64,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            delay_window_days: 30,
            overdue_window_days: 90,
            nonperform_window_days: 150,
            loss_cutoff_days: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsPolicy {
    /// Maximum outstanding principal per investor.
    pub total_limit: Money,
    /// Maximum outstanding principal in real-estate deals.
    pub real_estate_limit: Money,
}

impl Default for LimitsPolicy {
    fn default() -> Self {
        Self {
            total_limit: dec!(30_000_000),
            real_estate_limit: dec!(10_000_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementPolicy {
    /// Investment amounts offered to investors.
    pub options: Vec<Money>,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            options: vec![dec!(5_000), dec!(10_000), dec!(50_000), dec!(100_000)],
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> LendingResult<()> {
        let w = &self.withholding;
        if w.tax_rate < Decimal::ZERO || w.commission_rate < Decimal::ZERO {
            return Err(LendingError::invalid(
                "withholding",
                "Tax and commission rates cannot be negative",
            ));
        }
        if w.tax_rounding_unit <= Decimal::ZERO {
            return Err(LendingError::invalid(
                "withholding.tax_rounding_unit",
                "Rounding unit must be positive",
            ));
        }

        let s = &self.settlement;
        if [
            s.delay_window_days,
            s.overdue_window_days,
            s.nonperform_window_days,
            s.loss_cutoff_days,
        ]
        .iter()
        .any(|d| !(0..=MAX_WINDOW_DAYS).contains(d))
        {
            return Err(LendingError::invalid(
                "settlement",
                format!("Grace windows must be 0-{MAX_WINDOW_DAYS} days"),
            ));
        }

        if self.limits.total_limit < Decimal::ZERO || self.limits.real_estate_limit < Decimal::ZERO {
            return Err(LendingError::invalid("limits", "Limits cannot be negative"));
        }

        if self.placement.options.is_empty() {
            return Err(LendingError::invalid(
                "placement.options",
                "At least one investment option is required",
            ));
        }
        if self.placement.options.iter().any(|o| *o <= Decimal::ZERO) {
            return Err(LendingError::invalid(
                "placement.options",
                "Investment options must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"settlement": {"delay_window_days": 15}}"#).unwrap();
        assert_eq!(cfg.settlement.delay_window_days, 15);
        assert_eq!(cfg.settlement.overdue_window_days, 90);
        assert_eq!(cfg.schedule.first_payment_lag_months, 2);
    }

    #[test]
    fn test_validate_rejects_empty_options() {
        let mut cfg = EngineConfig::default();
        cfg.placement.options.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_window() {
        let mut cfg = EngineConfig::default();
        cfg.settlement.overdue_window_days = -1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_window() {
        let mut cfg = EngineConfig::default();
        cfg.settlement.delay_window_days = MAX_WINDOW_DAYS;
        assert!(cfg.validate().is_ok());
        cfg.settlement.delay_window_days = 200_000_000;
        assert!(cfg.validate().is_err());
        cfg.settlement.delay_window_days = 30;
        cfg.settlement.loss_cutoff_days = i64::MAX;
        assert!(cfg.validate().is_err());
    }
}
