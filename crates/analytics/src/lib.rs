//! # Atlas Analytics
//!
//! This crate turns raw entity collections from the travel-agency API into
//! the derived statistics the admin dashboard displays: per-entity totals
//! and groupings, six-month trends, period-over-period growth, estimated
//! top performers, and the recent-transaction ledger.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   HTTP, caching, or clocks. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every function takes its inputs — including
//!   "now" — explicitly and returns a freshly-built value. Calling a
//!   processor twice on the same slice yields identical output; nothing is
//!   ever mutated in place. This makes the crate deterministic under test.
//! - **Empty-safe:** An empty collection produces zeroed totals and empty
//!   groupings, never a panic.

// Declare the modules that constitute this crate.
pub mod performers;
pub mod period;
pub mod processors;
pub mod stats;
pub mod summary;
pub mod transactions;
pub mod trend;

// Re-export the key components to create a clean, public-facing API.
pub use performers::{parse_price_range, top_hotels, top_packages, TopPerformer, TopPerformers};
pub use period::{growth_percentage, period_window, previous_period_window, PeriodWindow};
pub use processors::{
    process_hotels, process_invoices, process_packages, process_places, process_users,
    process_vouchers,
};
pub use stats::{
    GroupCount, HotelStats, InvoiceStats, PackageStats, PlaceStats, RatedPlace, UserStats,
    VoucherStats,
};
pub use summary::{compose_summary, AnalyticsSummary, GrowthRates, PeriodTotals};
pub use transactions::{recent_transactions, LedgerEntry, LedgerKind};
pub use trend::{monthly_trend, TrendBucket, TREND_MONTHS};
