//! Placement checks and funding progress for deals still raising money.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::PlacementPolicy;
use crate::deal::{Deal, DealStatus};
use crate::error::LendingError;
use crate::types::{truncate_unit, Money};
use crate::LendingResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingProgress {
    pub reserved: Money,
    pub target: Money,
    /// Whole percent of the target reserved so far.
    pub percentage: Decimal,
}

/// Accept an investment only into a deal that is raising funds and only
/// for one of the offered amounts.
pub fn validate_placement(deal: &Deal, amount: Money, policy: &PlacementPolicy) -> LendingResult<()> {
    if deal.status != DealStatus::Applying {
        return Err(LendingError::InvalidPlacement {
            reason: format!(
                "Deal {} is not accepting investments (status {})",
                deal.id, deal.status
            ),
        });
    }
    if !policy.options.contains(&amount) {
        return Err(LendingError::InvalidPlacement {
            reason: format!("{amount} is not an offered investment option"),
        });
    }
    Ok(())
}

pub fn funding_progress(deal: &Deal, reserved: Money) -> FundingProgress {
    let percentage = if deal.principal.is_zero() {
        Decimal::ZERO
    } else {
        truncate_unit(reserved / deal.principal * dec!(100))
    };
    FundingProgress {
        reserved,
        target: deal.principal,
        percentage,
    }
}
