//! Per-period interest / principal breakdown for the four repayment methods.
//!
//! Interest for each period is the opening balance times the periodic rate,
//! rounded to a whole unit (ties to even) on its own. Non-final principal
//! derived from a level payment is truncated. The final period always
//! retires exactly the balance carried in, so the principal column sums to
//! the original amount whatever the rounding drift.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::deal::RepaymentMethod;
use crate::error::LendingError;
use crate::time_value::{annual_percent, annuity_payment, PERIODS_PER_YEAR};
use crate::types::{round_unit, truncate_unit, with_metadata, ComputationOutput, Money, Rate};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// MIXED deals pay principal / 20 each period. This is a house rule, not an
/// annuity.
pub const MIXED_PAYMENT_DIVISOR: Decimal = dec!(20);

/// Longest supported term: a hundred years of monthly rounds.
pub const MAX_TERM: u32 = 1200;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    pub periodic_rate: Rate,
    pub term: u32,
    pub method: RepaymentMethod,
}

/// One period of the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    /// 1-based period number.
    pub round: u32,
    pub opening_balance: Money,
    pub interest: Money,
    pub principal: Money,
    pub total_payment: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amortization {
    pub method: RepaymentMethod,
    pub principal: Money,
    pub periodic_rate: Rate,
    pub term: u32,
    /// Target payment per period for MIXED and EQUAL_INSTALLMENT.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_payment: Option<Money>,
    pub periods: Vec<AmortizationPeriod>,
    pub total_interest: Money,
    /// Projected annualized earning rate, in the units each method's rule
    /// produces (percent for all but EQUAL_PRINCIPAL).
    pub annualized_earning_rate: Rate,
}

impl Amortization {
    pub fn total_principal(&self) -> Money {
        self.periods.iter().map(|p| p.principal).sum()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Break a loan into per-period (interest, principal) pairs and derive its
/// projected earning rate.
pub fn amortize(
    principal: Money,
    periodic_rate: Rate,
    term: u32,
    method: RepaymentMethod,
) -> LendingResult<Amortization> {
    let mut warnings = Vec::new();
    amortize_with_warnings(principal, periodic_rate, term, method, &mut warnings)
}

/// [`amortize`] wrapped in the standard computation envelope.
pub fn compute_amortization(
    input: &AmortizationInput,
) -> LendingResult<ComputationOutput<Amortization>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let amortization = amortize_with_warnings(
        input.principal,
        input.periodic_rate,
        input.term,
        input.method,
        &mut warnings,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan amortization: per-period interest and principal split, final period absorbs rounding",
        &serde_json::json!({
            "method": input.method,
            "principal": input.principal.to_string(),
            "periodic_rate": input.periodic_rate.to_string(),
            "term": input.term,
            "interest_rounding": "half-to-even, per period",
        }),
        warnings,
        elapsed,
        amortization,
    ))
}

pub(crate) fn amortize_with_warnings(
    principal: Money,
    periodic_rate: Rate,
    term: u32,
    method: RepaymentMethod,
    warnings: &mut Vec<String>,
) -> LendingResult<Amortization> {
    validate(principal, periodic_rate, term)?;

    tracing::debug!(?method, %principal, %periodic_rate, term, "amortizing");

    let level_payment = match method {
        RepaymentMethod::Mixed => Some(principal / MIXED_PAYMENT_DIVISOR),
        RepaymentMethod::EqualInstallment => Some(annuity_payment(principal, periodic_rate, term)?),
        RepaymentMethod::Balloon | RepaymentMethod::EqualPrincipal => None,
    };
    let flat_principal = (principal / Decimal::from(term)).floor();

    let mut periods: Vec<AmortizationPeriod> = Vec::with_capacity(term as usize);
    let mut balance = principal;

    for round in 1..=term {
        let opening_balance = balance;
        let interest = round_unit(
            opening_balance
                .checked_mul(periodic_rate)
                .ok_or_else(|| overflow("interest", round))?,
        );

        let principal_part = if round == term {
            opening_balance
        } else {
            match (method, level_payment) {
                (RepaymentMethod::Balloon, _) => Decimal::ZERO,
                (RepaymentMethod::EqualPrincipal, _) => flat_principal.min(opening_balance),
                (_, Some(payment)) => {
                    let scheduled = truncate_unit(payment - interest);
                    if scheduled < Decimal::ZERO {
                        tracing::warn!(round, %payment, %interest, "level payment below interest");
                        warnings.push(format!(
                            "Period {round}: level payment {} is below interest {interest}; no principal retired",
                            payment.round_dp(2)
                        ));
                    }
                    scheduled.max(Decimal::ZERO).min(opening_balance)
                }
                (_, None) => Decimal::ZERO,
            }
        };

        let closing_balance = opening_balance - principal_part;
        periods.push(AmortizationPeriod {
            round,
            opening_balance,
            interest,
            principal: principal_part,
            total_payment: interest
                .checked_add(principal_part)
                .ok_or_else(|| overflow("total_payment", round))?,
            closing_balance,
        });
        balance = closing_balance;
    }

    let total_interest = periods
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.interest))
        .ok_or_else(|| LendingError::invalid("total_interest", "Total interest overflows"))?;
    let annualized_earning_rate =
        earning_rate(method, periodic_rate, term, total_interest, principal)?;

    Ok(Amortization {
        method,
        principal,
        periodic_rate,
        term,
        level_payment,
        periods,
        total_interest,
        annualized_earning_rate,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(principal: Money, periodic_rate: Rate, term: u32) -> LendingResult<()> {
    if principal <= Decimal::ZERO {
        return Err(LendingError::invalid("principal", "Principal must be positive"));
    }
    if !principal.fract().is_zero() {
        return Err(LendingError::invalid(
            "principal",
            "Principal must be a whole number of currency units",
        ));
    }
    if periodic_rate < Decimal::ZERO {
        return Err(LendingError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }
    if term == 0 {
        return Err(LendingError::invalid("term", "Term must be at least 1 period"));
    }
    if term > MAX_TERM {
        return Err(LendingError::invalid(
            "term",
            format!("Term cannot exceed {MAX_TERM} periods, got {term}"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn overflow(field: &str, round: u32) -> LendingError {
    LendingError::invalid(field, format!("Period {round} overflows the decimal range"))
}

fn earning_rate(
    method: RepaymentMethod,
    periodic_rate: Rate,
    term: u32,
    total_interest: Money,
    principal: Money,
) -> LendingResult<Rate> {
    let rate = match method {
        RepaymentMethod::Balloon => return annual_percent(periodic_rate, PERIODS_PER_YEAR),
        RepaymentMethod::EqualPrincipal => (Decimal::from(u64::from(term) + 1) / dec!(2))
            .checked_mul(periodic_rate),
        RepaymentMethod::Mixed | RepaymentMethod::EqualInstallment => total_interest
            .checked_div(principal)
            .and_then(|ratio| ratio.checked_mul(dec!(100))),
    };
    rate.ok_or_else(|| LendingError::invalid("periodic_rate", "Earning rate overflows"))
}
