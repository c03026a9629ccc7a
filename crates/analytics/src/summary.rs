//! Composition of the period-scoped dashboard summary.

use crate::period::{growth_percentage, period_window, previous_period_window, PeriodWindow};
use crate::processors::{process_invoices, process_vouchers};
use crate::stats::{HotelStats, InvoiceStats, PackageStats, PlaceStats, UserStats, VoucherStats};
use chrono::NaiveDateTime;
use core_types::{Invoice, Period, Voucher};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Money movement inside one reporting window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
    /// Number of invoices raised in the window.
    pub bookings: u64,
}

/// Whole-number growth percentages versus the preceding window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    pub revenue_pct: Decimal,
    pub expenses_pct: Decimal,
    pub profit_pct: Decimal,
    pub bookings_pct: Decimal,
}

/// The composed view the dashboard renders for one reporting period.
///
/// Ephemeral by design: recomputed on every request, never persisted. A
/// `None` in any entity slot means that collection could not be fetched;
/// the rest of the summary is still valid best-effort data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub period: Period,
    pub window: PeriodWindow,
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub growth: GrowthRates,
    /// Period-scoped invoice statistics (filtered, then reprocessed).
    pub invoices: Option<InvoiceStats>,
    /// Period-scoped voucher statistics (filtered, then reprocessed).
    pub vouchers: Option<VoucherStats>,
    // Catalogue collections are current-state snapshots; they pass through
    // unfiltered regardless of the period.
    pub hotels: Option<HotelStats>,
    pub packages: Option<PackageStats>,
    pub places: Option<PlaceStats>,
    pub users: Option<UserStats>,
}

/// Builds the summary for `period` out of full-collection statistics.
///
/// Invoices and vouchers are filtered into the current window (inclusive
/// bounds) and reprocessed; the previous window (half-open) feeds the
/// growth baselines.
#[allow(clippy::too_many_arguments)]
pub fn compose_summary(
    period: Period,
    now: NaiveDateTime,
    invoices: Option<&InvoiceStats>,
    vouchers: Option<&VoucherStats>,
    hotels: Option<&HotelStats>,
    packages: Option<&PackageStats>,
    places: Option<&PlaceStats>,
    users: Option<&UserStats>,
) -> AnalyticsSummary {
    let window = period_window(period, now);
    let previous_window = previous_period_window(period, now);

    let current_invoices: Option<Vec<Invoice>> = invoices
        .map(|stats| window.filter_inclusive(&stats.raw, |i| i.effective_date()));
    let current_vouchers: Option<Vec<Voucher>> = vouchers
        .map(|stats| window.filter_inclusive(&stats.raw, |v| v.effective_date()));

    let period_invoice_stats = current_invoices
        .as_deref()
        .map(|items| process_invoices(items, now));
    let period_voucher_stats = current_vouchers
        .as_deref()
        .map(|items| process_vouchers(items, now));

    let current = totals(
        period_invoice_stats.as_ref(),
        period_voucher_stats.as_ref(),
    );
    let previous = previous_totals(invoices, vouchers, &previous_window, now);

    let growth = GrowthRates {
        revenue_pct: growth_percentage(current.revenue, previous.revenue),
        expenses_pct: growth_percentage(current.expenses, previous.expenses),
        profit_pct: growth_percentage(current.profit, previous.profit),
        bookings_pct: growth_percentage(
            Decimal::from(current.bookings),
            Decimal::from(previous.bookings),
        ),
    };

    AnalyticsSummary {
        period,
        window,
        current,
        previous,
        growth,
        invoices: period_invoice_stats,
        vouchers: period_voucher_stats,
        hotels: hotels.cloned(),
        packages: packages.cloned(),
        places: places.cloned(),
        users: users.cloned(),
    }
}

fn totals(invoices: Option<&InvoiceStats>, vouchers: Option<&VoucherStats>) -> PeriodTotals {
    let revenue = invoices.map(|s| s.total_revenue).unwrap_or_default();
    let expenses = vouchers.map(|s| s.total_expenses).unwrap_or_default();
    PeriodTotals {
        revenue,
        expenses,
        profit: revenue - expenses,
        bookings: invoices.map(|s| s.total_invoices as u64).unwrap_or_default(),
    }
}

fn previous_totals(
    invoices: Option<&InvoiceStats>,
    vouchers: Option<&VoucherStats>,
    window: &PeriodWindow,
    now: NaiveDateTime,
) -> PeriodTotals {
    let filtered_invoices = invoices
        .map(|stats| window.filter_half_open(&stats.raw, |i| i.effective_date()))
        .map(|items| process_invoices(&items, now));
    let filtered_vouchers = vouchers
        .map(|stats| window.filter_half_open(&stats.raw, |v| v.effective_date()))
        .map(|items| process_vouchers(&items, now));
    totals(filtered_invoices.as_ref(), filtered_vouchers.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::{process_invoices, process_vouchers};
    use core_types::parse_timestamp;
    use rust_decimal_macros::dec;

    fn at(date: &str) -> NaiveDateTime {
        parse_timestamp(date).unwrap()
    }

    fn invoice(total: Decimal, date: &str) -> Invoice {
        Invoice {
            total: Some(total),
            date: parse_timestamp(date),
            ..Invoice::default()
        }
    }

    fn voucher(total: Decimal, date: &str) -> Voucher {
        Voucher {
            total: Some(total),
            date: parse_timestamp(date),
            ..Voucher::default()
        }
    }

    #[test]
    fn month_summary_filters_and_computes_growth() {
        let now = at("2025-02-15");
        let invoice_stats = process_invoices(
            &[
                invoice(dec!(3000), "2025-02-03"),
                invoice(dec!(1500), "2025-02-10"),
                invoice(dec!(3000), "2025-01-20"),
            ],
            now,
        );
        let voucher_stats = process_vouchers(
            &[
                voucher(dec!(500), "2025-02-05"),
                voucher(dec!(1000), "2025-01-12"),
            ],
            now,
        );

        let summary = compose_summary(
            Period::Month,
            now,
            Some(&invoice_stats),
            Some(&voucher_stats),
            None,
            None,
            None,
            None,
        );

        assert_eq!(summary.current.revenue, dec!(4500));
        assert_eq!(summary.current.expenses, dec!(500));
        assert_eq!(summary.current.profit, dec!(4000));
        assert_eq!(summary.current.bookings, 2);

        assert_eq!(summary.previous.revenue, dec!(3000));
        assert_eq!(summary.previous.bookings, 1);

        // 4500 vs 3000 = +50%; 500 vs 1000 = -50%; 4000 vs 2000 = +100%.
        assert_eq!(summary.growth.revenue_pct, dec!(50));
        assert_eq!(summary.growth.expenses_pct, dec!(-50));
        assert_eq!(summary.growth.profit_pct, dec!(100));
        assert_eq!(summary.growth.bookings_pct, dec!(100));

        // The attached invoice stats are period-scoped.
        assert_eq!(summary.invoices.as_ref().unwrap().total_invoices, 2);
    }

    #[test]
    fn february_voucher_is_in_the_february_month_window_only() {
        let vouchers = vec![voucher(dec!(500), "2025-02-01")];

        let in_feb = compose_summary(
            Period::Month,
            at("2025-02-20"),
            None,
            Some(&process_vouchers(&vouchers, at("2025-02-20"))),
            None,
            None,
            None,
            None,
        );
        assert_eq!(in_feb.current.expenses, dec!(500));

        let in_mar = compose_summary(
            Period::Month,
            at("2025-03-20"),
            None,
            Some(&process_vouchers(&vouchers, at("2025-03-20"))),
            None,
            None,
            None,
            None,
        );
        assert_eq!(in_mar.current.expenses, dec!(0));
        // In March the February voucher becomes previous-period baseline.
        assert_eq!(in_mar.previous.expenses, dec!(500));
    }

    #[test]
    fn missing_collections_degrade_to_zeroed_totals() {
        let summary = compose_summary(
            Period::Week,
            at("2025-02-15"),
            None,
            None,
            None,
            None,
            None,
            None,
        );

        assert_eq!(summary.current, PeriodTotals::default());
        assert_eq!(summary.previous, PeriodTotals::default());
        assert_eq!(summary.growth, GrowthRates::default());
        assert!(summary.invoices.is_none());
        assert!(summary.hotels.is_none());
    }
}
