use crate::trend::TrendBucket;
use core_types::{Hotel, Invoice, Package, Voucher};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// The statistics objects are the data transfer shapes consumed by the
// dashboard. They are ephemeral: recomputed per request, never persisted.
// BTreeMap keeps the count groupings deterministically ordered, which both
// the UI and the tests rely on.

/// One named group and how many items landed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub name: String,
    pub count: u64,
}

/// A place paired with its rating, for the top-rated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedPlace {
    pub name: String,
    pub rating: f64,
}

/// Derived statistics over the hotel catalogue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelStats {
    pub total_hotels: usize,
    /// Number of distinct places the hotels are spread across.
    pub total_places: usize,
    /// Mean rating, rounded to 1 decimal; 0.0 when the catalogue is empty.
    pub average_rating: f64,
    /// The 5 places with the most hotels, descending by count.
    pub top_places: Vec<GroupCount>,
    /// Hotels created in the current calendar month.
    pub hotels_this_month: usize,
    /// The raw catalogue, retained for top-performer estimation.
    pub raw: Vec<Hotel>,
}

/// Derived statistics over the tour-package catalogue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageStats {
    pub total_packages: usize,
    pub average_rating: f64,
    /// The 5 largest categories, descending by count.
    pub top_categories: Vec<GroupCount>,
    /// Mean over strictly positive prices, rounded to the nearest unit;
    /// zero when no package carries a usable price.
    pub average_price: Decimal,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// The raw catalogue, retained for top-performer estimation.
    pub raw: Vec<Package>,
}

/// Derived statistics over the destination list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceStats {
    pub total_places: usize,
    pub average_rating: f64,
    /// Destinations with at least one gallery image.
    pub places_with_images: usize,
    /// The 5 best-rated destinations, descending by rating.
    pub top_rated: Vec<RatedPlace>,
}

/// Derived statistics over booking invoices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceStats {
    pub total_invoices: usize,
    /// Sum of invoiced amounts.
    pub total_revenue: Decimal,
    pub total_advance: Decimal,
    /// Sum of per-invoice outstanding balances (each floored at zero).
    pub total_due: Decimal,
    pub status_counts: BTreeMap<String, u64>,
    pub type_counts: BTreeMap<String, u64>,
    /// Trailing six months of revenue, oldest first.
    pub monthly_trend: Vec<TrendBucket>,
    /// The raw input list, retained for recency queries.
    pub raw: Vec<Invoice>,
}

/// Derived statistics over payment vouchers (internal expenses).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoucherStats {
    pub total_vouchers: usize,
    /// Sum of voucher totals.
    pub total_expenses: Decimal,
    pub total_advance: Decimal,
    pub total_due: Decimal,
    pub category_counts: BTreeMap<String, u64>,
    pub payment_method_counts: BTreeMap<String, u64>,
    /// Trailing six months of expenses, oldest first.
    pub monthly_trend: Vec<TrendBucket>,
    /// The raw input list, retained for recency queries.
    pub raw: Vec<Voucher>,
}

/// Derived statistics over registered users.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_users: usize,
    pub role_counts: BTreeMap<String, u64>,
    /// Users registered in the current calendar month.
    pub new_this_month: usize,
}
