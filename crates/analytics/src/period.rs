//! Reporting-period windows and period-over-period growth.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use core_types::Period;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A concrete date range realized from a [`Period`] and a reference time.
///
/// Two containment conventions coexist deliberately: the *current* period
/// is filtered inclusively on both ends, while the *previous* period is
/// filtered half-open (`start ≤ t < end`). The previous window's `end` is
/// exactly the current window's `start`, so the two never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PeriodWindow {
    /// Inclusive on both ends. Used for the current period.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t <= self.end
    }

    /// `start ≤ t < end`. Used for the previous period.
    pub fn contains_half_open(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }

    /// Clones the items whose date falls inside the window, inclusively.
    pub fn filter_inclusive<T: Clone>(
        &self,
        items: &[T],
        date_of: impl Fn(&T) -> Option<NaiveDateTime>,
    ) -> Vec<T> {
        items
            .iter()
            .filter(|item| date_of(item).is_some_and(|d| self.contains(d)))
            .cloned()
            .collect()
    }

    /// Clones the items whose date falls inside the window, half-open.
    pub fn filter_half_open<T: Clone>(
        &self,
        items: &[T],
        date_of: impl Fn(&T) -> Option<NaiveDateTime>,
    ) -> Vec<T> {
        items
            .iter()
            .filter(|item| date_of(item).is_some_and(|d| self.contains_half_open(d)))
            .cloned()
            .collect()
    }
}

/// The window covering the period that contains `now`.
pub fn period_window(period: Period, now: NaiveDateTime) -> PeriodWindow {
    let today = now.date();
    let (first_day, last_day) = match period {
        Period::Week => {
            // Roll back to the most recent Monday; Sunday rolls back 6 days.
            let monday = today - Days::new(today.weekday().num_days_from_monday() as u64);
            (monday, monday + Days::new(6))
        }
        Period::Month => {
            let first = first_of_month(today.year(), today.month());
            (first, last_of_month(first))
        }
        Period::Quarter => {
            let quarter_month = ((today.month() - 1) / 3) * 3 + 1;
            let first = first_of_month(today.year(), quarter_month);
            (first, last_of_month(first + Months::new(2)))
        }
        Period::Year => (
            first_of_month(today.year(), 1),
            NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today),
        ),
    };

    PeriodWindow {
        start: day_start(first_day),
        end: day_end(last_day),
    }
}

/// The window immediately preceding `period_window(period, now)`, of equal
/// granularity. Its `end` is the current window's `start` and is meant to
/// be used half-open.
pub fn previous_period_window(period: Period, now: NaiveDateTime) -> PeriodWindow {
    let current = period_window(period, now);
    let current_start = current.start.date();
    let previous_start = match period {
        Period::Week => current_start - Days::new(7),
        Period::Month => current_start - Months::new(1),
        Period::Quarter => current_start - Months::new(3),
        Period::Year => current_start - Months::new(12),
    };

    PeriodWindow {
        start: day_start(previous_start),
        end: current.start,
    }
}

/// Period-over-period growth as a whole-number percentage.
///
/// A zero baseline maps to 100 when anything was earned at all, and 0
/// otherwise, so freshly-started periods do not divide by zero.
pub fn growth_percentage(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    } else {
        ((current - previous) / previous * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Month is always in 1..=12 here.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

fn last_of_month(first: NaiveDate) -> NaiveDate {
    (first + Months::new(1)) - Days::new(1)
}

fn day_start(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(0, 0, 0).unwrap_or_default()
}

fn day_end(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()
}
