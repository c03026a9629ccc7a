//! Estimated top-performer rankings.
//!
//! The upstream API records no booking attribution, so there is no ground
//! truth for "which package sold best". Instead, period revenue is
//! distributed across the catalogue proportionally to a `rating × price`
//! weight, with floors so entries never degenerate to zero. These figures
//! are estimates and are presented to the UI as such.

use core_types::{Hotel, Package};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Rating assumed for items with no rating on file.
const NEUTRAL_RATING: f64 = 4.0;

/// Price assumed for packages with no usable price.
const DEFAULT_PACKAGE_PRICE: u32 = 5_000;

/// Price assumed when a hotel's price-range string yields nothing.
const DEFAULT_HOTEL_PRICE: u32 = 7_500;

/// How many performers each ranking keeps.
const TOP_PERFORMERS: usize = 5;

/// One entry in an estimated performance ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
    pub name: String,
    pub rating: f64,
    /// Share of the period's revenue attributed to this item; at least 1.
    pub estimated_revenue: Decimal,
    /// Revenue share divided by unit price; at least 1.
    pub estimated_bookings: u64,
}

/// The two estimated rankings the dashboard shows side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopPerformers {
    pub packages: Vec<TopPerformer>,
    pub hotels: Vec<TopPerformer>,
}

/// Ranks packages by estimated share of `period_revenue`.
pub fn top_packages(packages: &[Package], period_revenue: Decimal) -> Vec<TopPerformer> {
    let weighted: Vec<(String, f64, Decimal)> = packages
        .iter()
        .map(|p| {
            let price = p
                .price
                .filter(|price| *price > Decimal::ZERO)
                .unwrap_or_else(|| Decimal::from(DEFAULT_PACKAGE_PRICE));
            (p.name.clone(), effective_rating(p.rating), price)
        })
        .collect();
    rank(weighted, period_revenue)
}

/// Ranks hotels by estimated share of `period_revenue`, pricing each hotel
/// at the lower bound parsed from its display price range.
pub fn top_hotels(hotels: &[Hotel], period_revenue: Decimal) -> Vec<TopPerformer> {
    let weighted: Vec<(String, f64, Decimal)> = hotels
        .iter()
        .map(|h| {
            let price = parse_price_range(h.price_range.as_deref().unwrap_or(""));
            (h.name.clone(), effective_rating(h.rating), price)
        })
        .collect();
    rank(weighted, period_revenue)
}

/// Extracts the first run of digits (thousands separators allowed) from a
/// display string like `"₹5,000 - ₹12,000 per night"`. Falls back to
/// [`DEFAULT_HOTEL_PRICE`] when nothing parses.
pub fn parse_price_range(raw: &str) -> Decimal {
    let mut digits = String::new();
    let mut in_run = false;
    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            in_run = true;
        } else if in_run && ch == ',' {
            // Thousands separator inside a run; keep consuming.
        } else if in_run {
            break;
        }
    }

    digits
        .parse::<u64>()
        .ok()
        .filter(|p| *p > 0)
        .map(Decimal::from)
        .unwrap_or_else(|| Decimal::from(DEFAULT_HOTEL_PRICE))
}

fn effective_rating(rating: Option<f64>) -> f64 {
    match rating {
        Some(r) if r > 0.0 => r,
        _ => NEUTRAL_RATING,
    }
}

/// Distributes `period_revenue` across the weighted items and keeps the
/// top entries by estimated revenue.
fn rank(items: Vec<(String, f64, Decimal)>, period_revenue: Decimal) -> Vec<TopPerformer> {
    if items.is_empty() {
        return Vec::new();
    }

    let weights: Vec<Decimal> = items
        .iter()
        .map(|(_, rating, price)| {
            Decimal::from_f64_retain(*rating).unwrap_or_default() * *price
        })
        .collect();
    let total_weight: Decimal = weights.iter().copied().sum();

    let mut performers: Vec<TopPerformer> = items
        .into_iter()
        .zip(weights)
        .map(|((name, rating, price), weight)| {
            let share = if total_weight.is_zero() {
                Decimal::ZERO
            } else {
                period_revenue * weight / total_weight
            };
            // Floors keep the dashboard free of degenerate zero rows.
            let estimated_revenue = share
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .max(Decimal::ONE);
            let estimated_bookings = (estimated_revenue / price)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u64()
                .unwrap_or(1)
                .max(1);

            TopPerformer {
                name,
                rating,
                estimated_revenue,
                estimated_bookings,
            }
        })
        .collect();

    performers.sort_by(|a, b| {
        b.estimated_revenue
            .cmp(&a.estimated_revenue)
            .then_with(|| a.name.cmp(&b.name))
    });
    performers.truncate(TOP_PERFORMERS);
    performers
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn package(name: &str, rating: f64, price: Decimal) -> Package {
        Package {
            id: name.to_string(),
            name: name.to_string(),
            rating: Some(rating),
            price: Some(price),
            ..Package::default()
        }
    }

    #[test]
    fn price_range_parsing_extracts_the_lower_bound() {
        assert_eq!(parse_price_range("₹5,000 - ₹12,000"), dec!(5000));
        assert_eq!(parse_price_range("from 800 per night"), dec!(800));
        assert_eq!(parse_price_range("1,20,000 onwards"), dec!(120000));
    }

    #[test]
    fn price_range_parsing_defaults_when_nothing_matches() {
        assert_eq!(parse_price_range(""), dec!(7500));
        assert_eq!(parse_price_range("call for price"), dec!(7500));
        assert_eq!(parse_price_range("₹0"), dec!(7500));
    }

    #[test]
    fn revenue_is_distributed_by_rating_times_price() {
        let packages = vec![
            package("premium", 5.0, dec!(10000)),
            package("budget", 2.5, dec!(10000)),
        ];
        let ranked = top_packages(&packages, dec!(75000));

        assert_eq!(ranked[0].name, "premium");
        // Weights 50000 vs 25000: a 2:1 split of 75000.
        assert_eq!(ranked[0].estimated_revenue, dec!(50000));
        assert_eq!(ranked[1].estimated_revenue, dec!(25000));
        assert_eq!(ranked[0].estimated_bookings, 5);
    }

    #[test]
    fn floors_prevent_degenerate_zero_rows() {
        let packages = vec![package("only", 4.0, dec!(9000))];
        let ranked = top_packages(&packages, Decimal::ZERO);

        assert_eq!(ranked[0].estimated_revenue, Decimal::ONE);
        assert_eq!(ranked[0].estimated_bookings, 1);
    }

    #[test]
    fn rankings_keep_at_most_five_entries() {
        let packages: Vec<Package> = (0..8)
            .map(|i| package(&format!("p{i}"), 4.0, dec!(5000)))
            .collect();
        assert_eq!(top_packages(&packages, dec!(100000)).len(), 5);
        assert!(top_packages(&[], dec!(100000)).is_empty());
    }

    #[test]
    fn unrated_hotels_fall_back_to_a_neutral_weight() {
        let hotels = vec![
            Hotel {
                name: "rated".to_string(),
                rating: Some(4.0),
                price_range: Some("₹4,000 - ₹9,000".to_string()),
                ..Hotel::default()
            },
            Hotel {
                name: "unrated".to_string(),
                ..Hotel::default()
            },
        ];
        let ranked = top_hotels(&hotels, dec!(60000));

        // Equal ratings (4.0 neutral fallback); the pricier default range
        // (7500) outweighs the parsed 4000 lower bound.
        assert_eq!(ranked[0].name, "unrated");
        assert_eq!(
            ranked[0].estimated_revenue + ranked[1].estimated_revenue,
            dec!(60000)
        );
    }
}
