use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::deal::Deal;
use crate::error::LendingError;
use crate::schedule::ScheduleEntry;
use crate::settlement::SettlementState;
use crate::types::Money;
use crate::LendingResult;

/// One investor's stake in one deal, with its persisted schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub investment_id: u64,
    pub deal: Deal,
    pub amount: Money,
    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
}

impl InvestmentRecord {
    fn paid(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.state == SettlementState::Paid)
    }

    pub fn paid_principal(&self) -> Money {
        self.paid().map(|e| e.principal).sum()
    }

    pub fn paid_interest(&self) -> Money {
        self.paid().map(|e| e.interest).sum()
    }

    pub fn paid_commission(&self) -> Money {
        self.paid().map(|e| e.commission).sum()
    }

    pub fn paid_rounds(&self) -> usize {
        self.paid().count()
    }

    /// Rounds whose due date has passed, paid or not.
    pub fn settled_rounds(&self) -> usize {
        self.entries.iter().filter(|e| e.state.is_resolved()).count()
    }

    /// Interest of rounds already due, paid or not.
    pub fn collected_interest(&self) -> Money {
        self.entries
            .iter()
            .filter(|e| e.state.is_resolved())
            .map(|e| e.interest)
            .sum()
    }

    /// Interest over the whole schedule.
    pub fn scheduled_interest(&self) -> Money {
        self.entries.iter().map(|e| e.interest).sum()
    }

    /// Principal not yet returned to the investor.
    pub fn outstanding_principal(&self) -> Money {
        (self.amount - self.paid_principal()).max(Decimal::ZERO)
    }

    pub fn validate(&self) -> LendingResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(LendingError::invalid(
                "amount",
                format!(
                    "Investment {} must have a positive amount",
                    self.investment_id
                ),
            ));
        }
        let mut previous = 0;
        for entry in &self.entries {
            if entry.round <= previous {
                return Err(LendingError::invalid(
                    "entries",
                    format!(
                        "Investment {} has rounds out of order at round {}",
                        self.investment_id, entry.round
                    ),
                ));
            }
            previous = entry.round;
        }
        Ok(())
    }
}
