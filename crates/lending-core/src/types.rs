use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values, in the currency's smallest unit.
pub type Money = Decimal;

/// Rates expressed as decimals (0.01 = 1% per period) unless a field says
/// it holds a percentage.
pub type Rate = Decimal;

/// Round to a whole currency unit, ties to even.
pub fn round_unit(value: Decimal) -> Money {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

/// Drop the fractional part, toward zero.
pub fn truncate_unit(value: Decimal) -> Money {
    value.trunc()
}

/// Round down to a multiple of `unit` (e.g. 10 for tax withholding).
pub fn floor_to_multiple(value: Decimal, unit: Decimal) -> Money {
    if unit.is_zero() {
        return value.floor();
    }
    (value / unit).floor() * unit
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_unit_ties_to_even() {
        assert_eq!(round_unit(dec!(2.5)), dec!(2));
        assert_eq!(round_unit(dec!(3.5)), dec!(4));
        assert_eq!(round_unit(dec!(3.49)), dec!(3));
    }

    #[test]
    fn test_floor_to_multiple() {
        assert_eq!(floor_to_multiple(dec!(749.85), dec!(10)), dec!(740));
        assert_eq!(floor_to_multiple(dec!(9.99), dec!(10)), dec!(0));
    }

    #[test]
    fn test_truncate_unit_toward_zero() {
        assert_eq!(truncate_unit(dec!(94618.54)), dec!(94618));
        assert_eq!(truncate_unit(dec!(-1.7)), dec!(-1));
    }
}
