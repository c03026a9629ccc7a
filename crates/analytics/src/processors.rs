//! Per-entity processors: raw collections in, statistics objects out.
//!
//! Each processor is a pure function over a borrowed slice plus an explicit
//! `now`; the input is never mutated, so re-running a processor on the same
//! slice always yields the same statistics.

use crate::stats::{
    GroupCount, HotelStats, InvoiceStats, PackageStats, PlaceStats, RatedPlace, UserStats,
    VoucherStats,
};
use crate::trend::monthly_trend;
use chrono::{Datelike, NaiveDateTime};
use core_types::{Hotel, Invoice, Package, Place, User, Voucher};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashSet};

/// How many groups the "top" listings keep.
const TOP_GROUPS: usize = 5;

/// Derives catalogue statistics from the hotel list.
pub fn process_hotels(hotels: &[Hotel], now: NaiveDateTime) -> HotelStats {
    let distinct_places: HashSet<&str> = hotels
        .iter()
        .filter_map(|h| {
            h.place_id
                .as_deref()
                .or(h.place_name.as_deref())
                .filter(|p| !p.is_empty())
        })
        .collect();

    let mut by_place: BTreeMap<String, u64> = BTreeMap::new();
    for hotel in hotels {
        let place = hotel
            .place_name
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or("unknown");
        *by_place.entry(place.to_string()).or_default() += 1;
    }

    HotelStats {
        total_hotels: hotels.len(),
        total_places: distinct_places.len(),
        average_rating: mean_rating(hotels.iter().map(|h| h.rating)),
        top_places: top_counts(by_place),
        hotels_this_month: count_in_month(hotels.iter().map(|h| h.created_at), now),
        raw: hotels.to_vec(),
    }
}

/// Derives catalogue statistics from the package list.
pub fn process_packages(packages: &[Package]) -> PackageStats {
    let mut by_category: BTreeMap<String, u64> = BTreeMap::new();
    for package in packages {
        let category = package
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or("uncategorized");
        *by_category.entry(category.to_string()).or_default() += 1;
    }

    // Price statistics only consider strictly positive prices; free or
    // unpriced placeholder packages would skew the averages.
    let priced: Vec<Decimal> = packages
        .iter()
        .filter_map(|p| p.price)
        .filter(|p| *p > Decimal::ZERO)
        .collect();
    let average_price = if priced.is_empty() {
        Decimal::ZERO
    } else {
        (priced.iter().sum::<Decimal>() / Decimal::from(priced.len()))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    };

    PackageStats {
        total_packages: packages.len(),
        average_rating: mean_rating(packages.iter().map(|p| p.rating)),
        top_categories: top_counts(by_category),
        average_price,
        min_price: priced.iter().min().copied(),
        max_price: priced.iter().max().copied(),
        raw: packages.to_vec(),
    }
}

/// Derives statistics from the destination list.
pub fn process_places(places: &[Place]) -> PlaceStats {
    let mut top_rated: Vec<RatedPlace> = places
        .iter()
        .map(|p| RatedPlace {
            name: p.name.clone(),
            rating: p.rating.unwrap_or(0.0),
        })
        .collect();
    top_rated.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    top_rated.truncate(TOP_GROUPS);

    PlaceStats {
        total_places: places.len(),
        average_rating: mean_rating(places.iter().map(|p| p.rating)),
        places_with_images: places.iter().filter(|p| p.has_image()).count(),
        top_rated,
    }
}

/// Derives revenue statistics from the invoice list.
pub fn process_invoices(invoices: &[Invoice], now: NaiveDateTime) -> InvoiceStats {
    let mut status_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut type_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut total_revenue = Decimal::ZERO;
    let mut total_advance = Decimal::ZERO;
    let mut total_due = Decimal::ZERO;

    for invoice in invoices {
        total_revenue += invoice.gross();
        total_advance += invoice.advance_paid.unwrap_or_default();
        total_due += invoice.due();
        *status_counts.entry(invoice.effective_status()).or_default() += 1;
        *type_counts.entry(invoice.kind_name().to_string()).or_default() += 1;
    }

    InvoiceStats {
        total_invoices: invoices.len(),
        total_revenue,
        total_advance,
        total_due,
        status_counts,
        type_counts,
        monthly_trend: monthly_trend(invoices, now, |i| i.effective_date(), |i| i.gross()),
        raw: invoices.to_vec(),
    }
}

/// Derives expense statistics from the voucher list.
pub fn process_vouchers(vouchers: &[Voucher], now: NaiveDateTime) -> VoucherStats {
    let mut category_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut payment_method_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut total_expenses = Decimal::ZERO;
    let mut total_advance = Decimal::ZERO;
    let mut total_due = Decimal::ZERO;

    for voucher in vouchers {
        total_expenses += voucher.total_amount();
        total_advance += voucher.advance.unwrap_or_default();
        total_due += voucher.due_amount();
        *category_counts
            .entry(voucher.category_name().to_string())
            .or_default() += 1;
        *payment_method_counts
            .entry(voucher.payment_method_name().to_string())
            .or_default() += 1;
    }

    VoucherStats {
        total_vouchers: vouchers.len(),
        total_expenses,
        total_advance,
        total_due,
        category_counts,
        payment_method_counts,
        monthly_trend: monthly_trend(vouchers, now, |v| v.effective_date(), |v| v.total_amount()),
        raw: vouchers.to_vec(),
    }
}

/// Derives registration statistics from the user list.
pub fn process_users(users: &[User], now: NaiveDateTime) -> UserStats {
    let mut role_counts: BTreeMap<String, u64> = BTreeMap::new();
    for user in users {
        let role = user
            .role
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or("user");
        *role_counts.entry(role.to_string()).or_default() += 1;
    }

    UserStats {
        total_users: users.len(),
        role_counts,
        new_this_month: count_in_month(users.iter().map(|u| u.created_at), now),
    }
}

/// Mean of the ratings rounded to 1 decimal; missing ratings count as zero
/// against the full population, and an empty population yields 0.0.
fn mean_rating(ratings: impl ExactSizeIterator<Item = Option<f64>>) -> f64 {
    let len = ratings.len();
    if len == 0 {
        return 0.0;
    }
    let sum: f64 = ratings.map(|r| r.unwrap_or(0.0)).sum();
    (sum / len as f64 * 10.0).round() / 10.0
}

/// Counts the items whose timestamp falls in the calendar month of `now`.
fn count_in_month(
    dates: impl Iterator<Item = Option<NaiveDateTime>>,
    now: NaiveDateTime,
) -> usize {
    dates
        .flatten()
        .filter(|d| d.year() == now.year() && d.month() == now.month())
        .count()
}

/// Turns a count map into the top `TOP_GROUPS` groups, descending by
/// count; ties break alphabetically so the output is deterministic.
fn top_counts(counts: BTreeMap<String, u64>) -> Vec<GroupCount> {
    let mut groups: Vec<GroupCount> = counts
        .into_iter()
        .map(|(name, count)| GroupCount { name, count })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    groups.truncate(TOP_GROUPS);
    groups
}
