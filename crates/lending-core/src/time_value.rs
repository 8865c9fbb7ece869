use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LendingError;
use crate::types::{Money, Rate};
use crate::LendingResult;

/// Repayment periods in a year for monthly-paying deals.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Level payment (annuity) that retires `principal` over `term` periods:
/// `P * r * (1+r)^n / ((1+r)^n - 1)`.
pub fn annuity_payment(principal: Money, rate: Rate, term: u32) -> LendingResult<Money> {
    if term == 0 {
        return Err(LendingError::invalid("term", "Number of periods must be > 0"));
    }
    if rate < Decimal::ZERO {
        return Err(LendingError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }

    let n = Decimal::from(term);
    if rate.is_zero() {
        return Ok(principal / n);
    }

    let factor = (Decimal::ONE + rate)
        .checked_powu(u64::from(term))
        .ok_or_else(|| LendingError::invalid("term", "Compounding factor overflows"))?;
    let denominator = factor - Decimal::ONE;

    // Rates far below the representable precision collapse the factor to 1.
    if denominator.is_zero() {
        return Ok(principal / n);
    }

    // P * r * (f / (f - 1)) keeps the intermediate product near the result.
    factor
        .checked_div(denominator)
        .and_then(|ratio| principal.checked_mul(rate)?.checked_mul(ratio))
        .ok_or_else(|| {
            LendingError::invalid("principal", "Level payment overflows the decimal range")
        })
}

/// Per-period rate from an annual nominal rate.
pub fn periodic_rate_from_annual(annual: Rate, periods_per_year: u32) -> LendingResult<Rate> {
    if periods_per_year == 0 {
        return Err(LendingError::invalid(
            "periods_per_year",
            "Periods per year must be > 0",
        ));
    }
    Ok(annual / Decimal::from(periods_per_year))
}

/// Annual nominal rate in percent from a per-period rate.
pub fn annual_percent(periodic: Rate, periods_per_year: u32) -> LendingResult<Rate> {
    periodic
        .checked_mul(Decimal::from(periods_per_year))
        .and_then(|annual| annual.checked_mul(dec!(100)))
        .ok_or_else(|| LendingError::invalid("periodic_rate", "Annual rate overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annuity_payment_one_percent_twelve_periods() {
        let pmt = annuity_payment(dec!(1_200_000), dec!(0.01), 12).unwrap();
        // 1.2m * 0.01 * 1.01^12 / (1.01^12 - 1) ≈ 106,618.55
        assert!((pmt - dec!(106618.5464)).abs() < dec!(0.001), "got {pmt}");
    }

    #[test]
    fn test_annuity_payment_zero_rate_is_straight_line() {
        assert_eq!(annuity_payment(dec!(1200), dec!(0), 12).unwrap(), dec!(100));
    }

    #[test]
    fn test_annuity_payment_rejects_zero_term() {
        assert!(annuity_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_annuity_payment_large_principal_stays_in_range() {
        let pmt = annuity_payment(dec!(1_000_000_000_000_000), dec!(0.1), 360).unwrap();
        // (1.1)^360 dwarfs 1, so the payment is barely above interest only.
        let interest_only = dec!(100_000_000_000_000_000);
        assert!(pmt > interest_only && pmt < interest_only + dec!(1000), "got {pmt}");
    }

    #[test]
    fn test_annuity_payment_overflow_is_an_error() {
        assert!(matches!(
            annuity_payment(Decimal::MAX, dec!(2), 1),
            Err(LendingError::InvalidParameter { .. })
        ));
        assert!(annual_percent(Decimal::MAX, PERIODS_PER_YEAR).is_err());
    }

    #[test]
    fn test_rate_conversions() {
        let periodic = periodic_rate_from_annual(dec!(0.06), PERIODS_PER_YEAR).unwrap();
        assert_eq!(periodic, dec!(0.005));
        assert_eq!(annual_percent(periodic, PERIODS_PER_YEAR).unwrap(), dec!(6));
    }
}
