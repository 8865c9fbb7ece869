//! Settlement state of a single payback round.
//!
//! The state is a pure function of the deal's status, the round's due date,
//! "today" and the deal's end date. Nothing is stored between calls, so a
//! round can be re-classified at any time, e.g. after collections moves the
//! deal to a new status.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::SettlementPolicy;
use crate::deal::DealStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementState {
    /// Due date is still in the future.
    ToBePaid,
    Paid,
    Unpaid,
}

impl SettlementState {
    /// Paid or unpaid: the due date has passed.
    pub fn is_resolved(self) -> bool {
        !matches!(self, SettlementState::ToBePaid)
    }
}

/// A classification request as received from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementQuery {
    pub status: DealStatus,
    pub due_date: NaiveDate,
    pub today: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl SettlementQuery {
    pub fn classify(&self, policy: &SettlementPolicy) -> SettlementState {
        classify_state_with(policy, self.status, self.due_date, self.today, self.end_date)
    }
}

/// Classify with the default grace windows (30 / 90 / 150 days, loss
/// cutoff 200 days after the end date).
pub fn classify_state(
    status: DealStatus,
    due_date: NaiveDate,
    today: NaiveDate,
    end_date: Option<NaiveDate>,
) -> SettlementState {
    classify_state_with(&SettlementPolicy::default(), status, due_date, today, end_date)
}

pub fn classify_state_with(
    policy: &SettlementPolicy,
    status: DealStatus,
    due_date: NaiveDate,
    today: NaiveDate,
    end_date: Option<NaiveDate>,
) -> SettlementState {
    if due_date > today {
        return SettlementState::ToBePaid;
    }

    match status {
        // Nothing is collected before funding.
        DealStatus::Scheduled => SettlementState::ToBePaid,
        DealStatus::Applying | DealStatus::Normal | DealStatus::NormalCompletion => {
            SettlementState::Paid
        }
        DealStatus::Delay => unpaid_within(due_date, today, policy.delay_window_days),
        DealStatus::Overdue => unpaid_within(due_date, today, policy.overdue_window_days),
        DealStatus::Nonperform => unpaid_within(due_date, today, policy.nonperform_window_days),
        DealStatus::NonperformCompletion => match end_date {
            // A cutoff past the calendar's end is never reached.
            Some(end) => match end.checked_add_days(window(policy.loss_cutoff_days)) {
                Some(cutoff) if due_date > cutoff => SettlementState::Unpaid,
                _ => SettlementState::Paid,
            },
            None => SettlementState::Unpaid,
        },
    }
}

/// `today - window < due_date <= today` means unpaid; older rounds were
/// serviced before the deal fell behind. A window reaching before the
/// calendar's start covers every past round.
fn unpaid_within(due_date: NaiveDate, today: NaiveDate, window_days: i64) -> SettlementState {
    match today.checked_sub_days(window(window_days)) {
        Some(start) if start >= due_date => SettlementState::Paid,
        _ => SettlementState::Unpaid,
    }
}

/// Negative windows are rejected by config validation; treat them as empty.
fn window(days: i64) -> Days {
    Days::new(u64::try_from(days).unwrap_or(0))
}
