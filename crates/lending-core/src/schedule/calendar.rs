//! Payback calendar.
//!
//! The first round falls `lag` months after the anchor date's month, on the
//! deal's payment day. Each later round advances one month from the
//! previous round's actual due date and applies the payment day again. When
//! that day does not exist in the month, [`DayOverflow::Rollover`] spills
//! the excess into the next month (31 September is 1 October) and
//! [`DayOverflow::ClampToMonthEnd`] uses the month's last day. A rolled date
//! therefore shifts every round after it.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::amortization::MAX_TERM;
use crate::config::DayOverflow;
use crate::error::LendingError;
use crate::LendingResult;

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day() - 1))
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days() as u32,
        // Only reachable at the very end of chrono's range.
        None => 31,
    }
}

/// Due date `months_ahead` months after the anchor's month.
pub fn due_date(
    anchor: NaiveDate,
    payment_day: u32,
    months_ahead: u32,
    overflow: DayOverflow,
) -> LendingResult<NaiveDate> {
    if !(1..=31).contains(&payment_day) {
        return Err(LendingError::invalid(
            "payment_day",
            format!("Payment day must be 1-31, got {payment_day}"),
        ));
    }

    let month_start = first_of_month(anchor)
        .checked_add_months(Months::new(months_ahead))
        .ok_or_else(|| {
            LendingError::DateError(format!("{anchor} + {months_ahead} months is out of range"))
        })?;

    let day_offset = match overflow {
        DayOverflow::Rollover => payment_day - 1,
        DayOverflow::ClampToMonthEnd => payment_day.min(days_in_month(month_start)) - 1,
    };

    month_start
        .checked_add_days(Days::new(u64::from(day_offset)))
        .ok_or_else(|| LendingError::DateError(format!("{month_start} + {day_offset} days is out of range")))
}

/// Due dates for rounds `1..=term`, each one derived from the one before.
pub fn due_dates(
    anchor: NaiveDate,
    payment_day: u32,
    first_payment_lag_months: u32,
    term: u32,
    overflow: DayOverflow,
) -> LendingResult<Vec<NaiveDate>> {
    let mut dates = Vec::with_capacity(term.min(MAX_TERM) as usize);
    if term == 0 {
        return Ok(dates);
    }
    let mut current = due_date(anchor, payment_day, first_payment_lag_months, overflow)?;
    dates.push(current);
    for _ in 1..term {
        current = due_date(current, payment_day, 1, overflow)?;
        dates.push(current);
    }
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_due_date_skips_a_full_month() {
        // Ends 28 July: August is skipped, first payment in September.
        let d = due_date(ymd(2021, 7, 28), 25, 2, DayOverflow::Rollover).unwrap();
        assert_eq!(d, ymd(2021, 9, 25));
    }

    #[test]
    fn test_rollover_spills_into_next_month() {
        assert_eq!(
            due_date(ymd(2021, 7, 28), 31, 2, DayOverflow::Rollover).unwrap(),
            ymd(2021, 10, 1)
        );
        assert_eq!(
            due_date(ymd(2022, 1, 5), 31, 1, DayOverflow::Rollover).unwrap(),
            ymd(2022, 3, 3)
        );
    }

    #[test]
    fn test_clamp_uses_month_end() {
        assert_eq!(
            due_date(ymd(2021, 7, 28), 31, 2, DayOverflow::ClampToMonthEnd).unwrap(),
            ymd(2021, 9, 30)
        );
        assert_eq!(
            due_date(ymd(2024, 1, 5), 30, 1, DayOverflow::ClampToMonthEnd).unwrap(),
            ymd(2024, 2, 29)
        );
    }

    #[test]
    fn test_day_31_rollover_chains_from_previous_round() {
        let dates = due_dates(ymd(2021, 7, 28), 31, 2, 12, DayOverflow::Rollover).unwrap();
        assert_eq!(
            dates,
            vec![
                ymd(2021, 10, 1),
                ymd(2021, 12, 1),
                ymd(2022, 1, 31),
                ymd(2022, 3, 3),
                ymd(2022, 5, 1),
                ymd(2022, 7, 1),
                ymd(2022, 8, 31),
                ymd(2022, 10, 1),
                ymd(2022, 12, 1),
                ymd(2023, 1, 31),
                ymd(2023, 3, 3),
                ymd(2023, 5, 1),
            ]
        );
        // No two rounds share a calendar month.
        for pair in dates.windows(2) {
            assert_ne!(first_of_month(pair[0]), first_of_month(pair[1]));
        }
    }

    #[test]
    fn test_clamped_dates_stay_one_month_apart() {
        let dates =
            due_dates(ymd(2021, 12, 10), 31, 1, 4, DayOverflow::ClampToMonthEnd).unwrap();
        assert_eq!(
            dates,
            vec![ymd(2022, 1, 31), ymd(2022, 2, 28), ymd(2022, 3, 31), ymd(2022, 4, 30)]
        );
    }

    #[test]
    fn test_ordinary_payment_day_is_unaffected_by_chaining() {
        let dates = due_dates(ymd(2021, 7, 28), 25, 2, 3, DayOverflow::Rollover).unwrap();
        assert_eq!(dates, vec![ymd(2021, 9, 25), ymd(2021, 10, 25), ymd(2021, 11, 25)]);
    }

    #[test]
    fn test_huge_lag_is_a_date_error() {
        assert!(matches!(
            due_dates(ymd(2021, 7, 28), 10, u32::MAX, 2, DayOverflow::Rollover),
            Err(LendingError::DateError(_))
        ));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(ymd(2021, 2, 14)), 28);
        assert_eq!(days_in_month(ymd(2024, 2, 1)), 29);
        assert_eq!(days_in_month(ymd(2021, 9, 30)), 30);
        assert_eq!(days_in_month(ymd(2021, 12, 31)), 31);
    }

    #[test]
    fn test_invalid_payment_day() {
        assert!(due_date(ymd(2021, 7, 28), 0, 1, DayOverflow::Rollover).is_err());
        assert!(due_date(ymd(2021, 7, 28), 32, 1, DayOverflow::Rollover).is_err());
    }
}
