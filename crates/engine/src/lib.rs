//! # Atlas Engine
//!
//! The aggregator service behind the admin dashboard. It pulls the six raw
//! collections from the travel-agency API, caches the derived statistics,
//! and answers the UI's analytics questions (summary, top performers,
//! recent transactions) as best-effort composites.
//!
//! ## Failure policy
//!
//! Nothing here is fatal. A collection that cannot be fetched — transport
//! error, `success: false`, malformed body — is logged and reported as
//! `None` inside the composite result; the other collections are
//! unaffected. There is no retry: an absent collection stays absent until
//! the cache expires or an update is triggered.
//!
//! ## Construction
//!
//! One [`Aggregator`] is built by the composition root (the binary) and
//! shared by `Arc`. There is no ambient global instance.

use analytics::{
    compose_summary, period_window, process_hotels, process_invoices, process_packages,
    process_places, process_users, process_vouchers, recent_transactions, top_hotels,
    top_packages, AnalyticsSummary, HotelStats, InvoiceStats, LedgerEntry, PackageStats,
    PlaceStats, TopPerformers, UserStats, VoucherStats,
};
use api_client::TravelApi;
use chrono::NaiveDateTime;
use configuration::CacheSettings;
use core_types::Period;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub mod cache;
pub mod listeners;

pub use cache::TimedCache;
pub use listeners::{ListenerId, ListenerRegistry};

use cache::TimedCache as Cache;

/// Fixed cache key per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Users,
    Hotels,
    Packages,
    Places,
    Invoices,
    Vouchers,
}

/// The cached value space: one statistics object per collection.
#[derive(Debug, Clone)]
enum CachedStats {
    Users(UserStats),
    Hotels(HotelStats),
    Packages(PackageStats),
    Places(PlaceStats),
    Invoices(InvoiceStats),
    Vouchers(VoucherStats),
}

/// Everything the aggregator knows after one settle-all fetch round.
/// `None` slots are collections that could not be fetched this round.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsSnapshot {
    pub users: Option<UserStats>,
    pub hotels: Option<HotelStats>,
    pub packages: Option<PackageStats>,
    pub places: Option<PlaceStats>,
    pub invoices: Option<InvoiceStats>,
    pub vouchers: Option<VoucherStats>,
}

impl AnalyticsSnapshot {
    /// True when not a single collection could be fetched.
    pub fn is_empty(&self) -> bool {
        self.users.is_none()
            && self.hotels.is_none()
            && self.packages.is_none()
            && self.places.is_none()
            && self.invoices.is_none()
            && self.vouchers.is_none()
    }
}

// State shared with the background refresh task.
struct Shared {
    api: Arc<dyn TravelApi>,
    cache: Mutex<Cache<CacheKey, CachedStats>>,
    listeners: Mutex<ListenerRegistry>,
}

impl Shared {
    /// Clears the cache and synchronously notifies every subscriber.
    async fn trigger_update(&self) {
        let dropped = self.cache.lock().await.clear();
        let notified = self.listeners.lock().await.notify_all();
        tracing::debug!(dropped, notified, "cache cleared, listeners notified");
    }

    async fn cached(&self, key: CacheKey) -> Option<CachedStats> {
        self.cache.lock().await.get(&key)
    }

    async fn store(&self, key: CacheKey, value: CachedStats) {
        self.cache.lock().await.set(key, value);
    }

    // One fetcher per collection: cache-first read-through, with every
    // failure degraded to a logged `None`.

    async fn fetch_users(&self, now: NaiveDateTime) -> Option<UserStats> {
        if let Some(CachedStats::Users(stats)) = self.cached(CacheKey::Users).await {
            return Some(stats);
        }
        match self.api.list_users().await {
            Ok(users) => {
                let stats = process_users(&users, now);
                self.store(CacheKey::Users, CachedStats::Users(stats.clone())).await;
                Some(stats)
            }
            Err(error) => {
                tracing::warn!(%error, "failed to fetch users");
                None
            }
        }
    }

    async fn fetch_hotels(&self, now: NaiveDateTime) -> Option<HotelStats> {
        if let Some(CachedStats::Hotels(stats)) = self.cached(CacheKey::Hotels).await {
            return Some(stats);
        }
        match self.api.list_hotels().await {
            Ok(hotels) => {
                let stats = process_hotels(&hotels, now);
                self.store(CacheKey::Hotels, CachedStats::Hotels(stats.clone())).await;
                Some(stats)
            }
            Err(error) => {
                tracing::warn!(%error, "failed to fetch hotels");
                None
            }
        }
    }

    async fn fetch_packages(&self) -> Option<PackageStats> {
        if let Some(CachedStats::Packages(stats)) = self.cached(CacheKey::Packages).await {
            return Some(stats);
        }
        match self.api.list_packages().await {
            Ok(packages) => {
                let stats = process_packages(&packages);
                self.store(CacheKey::Packages, CachedStats::Packages(stats.clone())).await;
                Some(stats)
            }
            Err(error) => {
                tracing::warn!(%error, "failed to fetch packages");
                None
            }
        }
    }

    async fn fetch_places(&self) -> Option<PlaceStats> {
        if let Some(CachedStats::Places(stats)) = self.cached(CacheKey::Places).await {
            return Some(stats);
        }
        match self.api.list_places().await {
            Ok(places) => {
                let stats = process_places(&places);
                self.store(CacheKey::Places, CachedStats::Places(stats.clone())).await;
                Some(stats)
            }
            Err(error) => {
                tracing::warn!(%error, "failed to fetch places");
                None
            }
        }
    }

    async fn fetch_invoices(&self, now: NaiveDateTime) -> Option<InvoiceStats> {
        if let Some(CachedStats::Invoices(stats)) = self.cached(CacheKey::Invoices).await {
            return Some(stats);
        }
        match self.api.list_invoices().await {
            Ok(invoices) => {
                let stats = process_invoices(&invoices, now);
                self.store(CacheKey::Invoices, CachedStats::Invoices(stats.clone())).await;
                Some(stats)
            }
            Err(error) => {
                tracing::warn!(%error, "failed to fetch invoices");
                None
            }
        }
    }

    async fn fetch_vouchers(&self, now: NaiveDateTime) -> Option<VoucherStats> {
        if let Some(CachedStats::Vouchers(stats)) = self.cached(CacheKey::Vouchers).await {
            return Some(stats);
        }
        match self.api.list_vouchers().await {
            Ok(vouchers) => {
                let stats = process_vouchers(&vouchers, now);
                self.store(CacheKey::Vouchers, CachedStats::Vouchers(stats.clone())).await;
                Some(stats)
            }
            Err(error) => {
                tracing::warn!(%error, "failed to fetch vouchers");
                None
            }
        }
    }
}

/// The analytics aggregation service.
pub struct Aggregator {
    shared: Arc<Shared>,
    refresh_interval: Duration,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl Aggregator {
    pub fn new(api: Arc<dyn TravelApi>, settings: &CacheSettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                api,
                cache: Mutex::new(Cache::new(Duration::from_secs(settings.ttl_secs))),
                listeners: Mutex::new(ListenerRegistry::new()),
            }),
            refresh_interval: Duration::from_secs(settings.refresh_interval_secs),
            refresh_task: Mutex::new(None),
        }
    }

    /// Fetches all six collections concurrently and waits for every one to
    /// settle. A failed collection is `None`; the rest are unaffected.
    pub async fn fetch_all(&self) -> AnalyticsSnapshot {
        let now = local_now();
        let shared = &self.shared;
        let (users, hotels, packages, places, invoices, vouchers) = tokio::join!(
            shared.fetch_users(now),
            shared.fetch_hotels(now),
            shared.fetch_packages(),
            shared.fetch_places(),
            shared.fetch_invoices(now),
            shared.fetch_vouchers(now),
        );

        AnalyticsSnapshot {
            users,
            hotels,
            packages,
            places,
            invoices,
            vouchers,
        }
    }

    /// The composed dashboard summary for `period`.
    pub async fn summary(&self, period: Period) -> AnalyticsSummary {
        let now = local_now();
        let snapshot = self.fetch_all().await;
        compose_summary(
            period,
            now,
            snapshot.invoices.as_ref(),
            snapshot.vouchers.as_ref(),
            snapshot.hotels.as_ref(),
            snapshot.packages.as_ref(),
            snapshot.places.as_ref(),
            snapshot.users.as_ref(),
        )
    }

    /// Estimated package and hotel rankings for `period`.
    pub async fn top_performers(&self, period: Period) -> TopPerformers {
        let now = local_now();
        let snapshot = self.fetch_all().await;
        let window = period_window(period, now);

        let period_revenue: Decimal = snapshot
            .invoices
            .as_ref()
            .map(|stats| {
                window
                    .filter_inclusive(&stats.raw, |i| i.effective_date())
                    .iter()
                    .map(|i| i.gross())
                    .sum()
            })
            .unwrap_or_default();

        TopPerformers {
            packages: snapshot
                .packages
                .as_ref()
                .map(|stats| top_packages(&stats.raw, period_revenue))
                .unwrap_or_default(),
            hotels: snapshot
                .hotels
                .as_ref()
                .map(|stats| top_hotels(&stats.raw, period_revenue))
                .unwrap_or_default(),
        }
    }

    /// The merged recent-transaction ledger for `period`.
    pub async fn recent_transactions(&self, period: Period) -> Vec<LedgerEntry> {
        let now = local_now();
        let snapshot = self.fetch_all().await;
        let window = period_window(period, now);

        let (invoices, invoice_trend) = match snapshot.invoices {
            Some(stats) => (
                window.filter_inclusive(&stats.raw, |i| i.effective_date()),
                stats.monthly_trend,
            ),
            None => (Vec::new(), Vec::new()),
        };
        let (vouchers, voucher_trend) = match snapshot.vouchers {
            Some(stats) => (
                window.filter_inclusive(&stats.raw, |v| v.effective_date()),
                stats.monthly_trend,
            ),
            None => (Vec::new(), Vec::new()),
        };

        recent_transactions(&invoices, &vouchers, &invoice_trend, &voucher_trend)
    }

    /// Registers a callback invoked on every cache invalidation.
    pub async fn subscribe(
        &self,
        callback: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> ListenerId {
        self.shared.listeners.lock().await.subscribe(callback)
    }

    pub async fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.listeners.lock().await.unsubscribe(id)
    }

    /// Clears the cache and notifies subscribers immediately.
    pub async fn trigger_update(&self) {
        self.shared.trigger_update().await;
    }

    /// Starts the periodic refresh loop: every `interval` (defaulting to
    /// the configured refresh interval) the cache is cleared and listeners
    /// are notified. Starting again replaces the previous loop — timers
    /// never stack.
    pub async fn start_real_time_updates(&self, interval: Option<Duration>) {
        let interval = interval.unwrap_or(self.refresh_interval);
        let shared = Arc::clone(&self.shared);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so the loop
            // behaves like a plain repeating timer.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                shared.trigger_update().await;
            }
        });

        let mut slot = self.refresh_task.lock().await;
        if let Some(previous) = slot.replace(task) {
            previous.abort();
            tracing::debug!("replaced an already-running refresh task");
        }
        tracing::info!(interval_ms = interval.as_millis() as u64, "real-time updates started");
    }

    /// Cancels the periodic refresh loop, if one is running.
    pub async fn stop_real_time_updates(&self) {
        if let Some(task) = self.refresh_task.lock().await.take() {
            task.abort();
            tracing::info!("real-time updates stopped");
        }
    }
}

impl Drop for Aggregator {
    fn drop(&mut self) {
        // The refresh task holds no resources beyond the shared state, but
        // there is no reason to keep ticking after the service is gone.
        if let Ok(slot) = self.refresh_task.try_lock() {
            if let Some(task) = slot.as_ref() {
                task.abort();
            }
        }
    }
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::error::ApiError;
    use async_trait::async_trait;
    use core_types::{Hotel, Invoice, Package, Place, User, Voucher};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockApi {
        invoices: Vec<Invoice>,
        vouchers: Vec<Voucher>,
        hotels: Vec<Hotel>,
        packages: Vec<Package>,
        fail_invoices: AtomicBool,
        hotel_calls: AtomicUsize,
    }

    #[async_trait]
    impl TravelApi for MockApi {
        async fn list_users(&self) -> Result<Vec<User>, ApiError> {
            Ok(Vec::new())
        }

        async fn list_hotels(&self) -> Result<Vec<Hotel>, ApiError> {
            self.hotel_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hotels.clone())
        }

        async fn list_packages(&self) -> Result<Vec<Package>, ApiError> {
            Ok(self.packages.clone())
        }

        async fn list_places(&self) -> Result<Vec<Place>, ApiError> {
            Ok(Vec::new())
        }

        async fn list_invoices(&self) -> Result<Vec<Invoice>, ApiError> {
            if self.fail_invoices.load(Ordering::SeqCst) {
                return Err(ApiError::Rejected("database offline".to_string()));
            }
            Ok(self.invoices.clone())
        }

        async fn list_vouchers(&self) -> Result<Vec<Voucher>, ApiError> {
            Ok(self.vouchers.clone())
        }
    }

    fn settings() -> CacheSettings {
        CacheSettings {
            ttl_secs: 300,
            refresh_interval_secs: 30,
        }
    }

    fn invoice_today(total: rust_decimal::Decimal) -> Invoice {
        Invoice {
            id: "inv".to_string(),
            total: Some(total),
            date: Some(local_now()),
            ..Invoice::default()
        }
    }

    #[tokio::test]
    async fn one_failing_collection_never_aborts_the_others() {
        let api = Arc::new(MockApi {
            hotels: vec![Hotel {
                name: "Sea View".to_string(),
                ..Hotel::default()
            }],
            ..MockApi::default()
        });
        api.fail_invoices.store(true, Ordering::SeqCst);

        let aggregator = Aggregator::new(api, &settings());
        let snapshot = aggregator.fetch_all().await;

        assert!(snapshot.invoices.is_none());
        assert_eq!(snapshot.hotels.as_ref().unwrap().total_hotels, 1);
        assert!(snapshot.users.is_some());
        assert!(!snapshot.is_empty());
    }

    #[tokio::test]
    async fn fetches_are_cache_first() {
        let api = Arc::new(MockApi::default());
        let aggregator = Aggregator::new(Arc::clone(&api) as Arc<dyn TravelApi>, &settings());

        aggregator.fetch_all().await;
        aggregator.fetch_all().await;

        assert_eq!(api.hotel_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn trigger_update_clears_cache_and_notifies() {
        let api = Arc::new(MockApi::default());
        let aggregator = Aggregator::new(Arc::clone(&api) as Arc<dyn TravelApi>, &settings());

        let notified = Arc::new(AtomicUsize::new(0));
        let observer = Arc::clone(&notified);
        let id = aggregator
            .subscribe(move || {
                observer.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;

        aggregator.fetch_all().await;
        aggregator.trigger_update().await;
        aggregator.fetch_all().await;

        assert_eq!(notified.load(Ordering::SeqCst), 1);
        // The clear forced a refetch.
        assert_eq!(api.hotel_calls.load(Ordering::SeqCst), 2);
        assert!(aggregator.unsubscribe(id).await);
        assert!(!aggregator.unsubscribe(id).await);
    }

    #[tokio::test]
    async fn summary_reflects_current_period_money() {
        let api = Arc::new(MockApi {
            invoices: vec![invoice_today(dec!(1200)), invoice_today(dec!(800))],
            vouchers: vec![Voucher {
                total: Some(dec!(500)),
                date: Some(local_now()),
                ..Voucher::default()
            }],
            ..MockApi::default()
        });

        let aggregator = Aggregator::new(api, &settings());
        let summary = aggregator.summary(Period::Month).await;

        assert_eq!(summary.current.revenue, dec!(2000));
        assert_eq!(summary.current.expenses, dec!(500));
        assert_eq!(summary.current.profit, dec!(1500));
        assert_eq!(summary.current.bookings, 2);
    }

    #[tokio::test]
    async fn top_performers_distribute_the_period_revenue() {
        let api = Arc::new(MockApi {
            invoices: vec![invoice_today(dec!(50000))],
            packages: vec![
                Package {
                    name: "Goa Getaway".to_string(),
                    rating: Some(5.0),
                    price: Some(dec!(10000)),
                    ..Package::default()
                },
                Package {
                    name: "Hill Trek".to_string(),
                    rating: Some(2.5),
                    price: Some(dec!(10000)),
                    ..Package::default()
                },
            ],
            ..MockApi::default()
        });

        let aggregator = Aggregator::new(api, &settings());
        let performers = aggregator.top_performers(Period::Month).await;

        assert_eq!(performers.packages[0].name, "Goa Getaway");
        assert_eq!(
            performers.packages[0].estimated_revenue
                + performers.packages[1].estimated_revenue,
            dec!(50000)
        );
        assert!(performers.hotels.is_empty());
    }

    #[tokio::test]
    async fn recent_transactions_merge_revenue_and_expenses() {
        let api = Arc::new(MockApi {
            invoices: vec![invoice_today(dec!(900))],
            vouchers: vec![Voucher {
                id: "v1".to_string(),
                total: Some(dec!(300)),
                date: Some(local_now()),
                ..Voucher::default()
            }],
            ..MockApi::default()
        });

        let aggregator = Aggregator::new(api, &settings());
        let ledger = aggregator.recent_transactions(Period::Month).await;

        assert_eq!(ledger.len(), 2);
        assert!(ledger.iter().any(|e| e.amount == dec!(900)));
        assert!(ledger.iter().any(|e| e.amount == dec!(-300)));
    }

    #[tokio::test]
    async fn refresh_loop_ticks_and_stops_cleanly() {
        let api = Arc::new(MockApi::default());
        let aggregator = Aggregator::new(api, &settings());

        let ticks = Arc::new(AtomicUsize::new(0));
        let observer = Arc::clone(&ticks);
        aggregator
            .subscribe(move || {
                observer.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;

        aggregator
            .start_real_time_updates(Some(Duration::from_millis(10)))
            .await;
        // Restarting must replace the first loop, not stack a second one.
        aggregator
            .start_real_time_updates(Some(Duration::from_millis(10)))
            .await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        aggregator.stop_real_time_updates().await;

        let after_stop = ticks.load(Ordering::SeqCst);
        assert!(after_stop >= 2, "expected the loop to tick, saw {after_stop}");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop, "ticks after stop");
    }
}
