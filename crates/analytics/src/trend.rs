//! Six-month rolling trend bucketing.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How many trailing calendar months a trend series covers, including the
/// current one.
pub const TREND_MONTHS: usize = 6;

/// One calendar-month aggregation point in a rolling trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBucket {
    /// 3-letter English month abbreviation, e.g. "Jan".
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
}

impl TrendBucket {
    /// Midnight on the first day of the bucket's month. Used when a bucket
    /// stands in for individual transactions.
    pub fn month_start(&self) -> NaiveDateTime {
        // Bucket year/month always come from a valid date.
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_default()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
    }
}

/// Buckets `items` into the trailing [`TREND_MONTHS`] calendar months of
/// `now`, oldest first.
///
/// An item belongs to a bucket when `date_of` places it in that month and
/// year; items with no date are skipped. Months without matches still get
/// a zero-sum bucket — the series always has exactly six points.
pub fn monthly_trend<T>(
    items: &[T],
    now: NaiveDateTime,
    date_of: impl Fn(&T) -> Option<NaiveDateTime>,
    amount_of: impl Fn(&T) -> Decimal,
) -> Vec<TrendBucket> {
    (0..TREND_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = months_back(now.year(), now.month(), back as u32);
            let total = items
                .iter()
                .filter(|item| {
                    date_of(item)
                        .is_some_and(|d| d.year() == year && d.month() == month)
                })
                .map(&amount_of)
                .sum();

            TrendBucket {
                label: month_label(year, month),
                year,
                month,
                total,
            }
        })
        .collect()
}

/// Steps `back` whole months before `(year, month)`.
fn months_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    // Work in zero-based month arithmetic to survive year boundaries.
    let absolute = year * 12 + month as i32 - 1 - back as i32;
    (absolute.div_euclid(12), absolute.rem_euclid(12) as u32 + 1)
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_default()
}
