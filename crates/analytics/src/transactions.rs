//! The unified recent-transaction ledger shown on the dashboard.

use crate::trend::TrendBucket;
use chrono::NaiveDateTime;
use core_types::{Invoice, Voucher};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How many entries the merged ledger keeps.
const LEDGER_LIMIT: usize = 5;

/// How many of each source feed into the merge.
const PER_SOURCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Revenue,
    Expense,
}

/// One row of the recent-transactions widget. Expenses carry a negated
/// amount so the column sums visually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub kind: LedgerKind,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDateTime,
}

/// Merges the most recent invoices and vouchers into a single ledger,
/// newest first, capped at [`LEDGER_LIMIT`] rows.
///
/// When the period holds no raw records at all, the trend series stand in
/// as coarse monthly entries so the widget is never blank while any money
/// moved this half-year. Note this takes the most recent buckets with a
/// non-zero total rather than the literal trailing three: an all-zero tail
/// is skipped in favor of the months that actually saw activity, and six
/// silent months yield an empty ledger.
pub fn recent_transactions(
    invoices: &[Invoice],
    vouchers: &[Voucher],
    invoice_trend: &[TrendBucket],
    voucher_trend: &[TrendBucket],
) -> Vec<LedgerEntry> {
    let mut entries: Vec<LedgerEntry> = Vec::new();

    for invoice in newest(invoices, |i| i.effective_date()) {
        // Undated records cannot be ranked by recency; newest() drops them.
        if let Some(date) = invoice.effective_date() {
            entries.push(LedgerEntry {
                kind: LedgerKind::Revenue,
                description: format!("{} invoice {}", invoice.kind_name(), invoice.id),
                amount: invoice.gross(),
                date,
            });
        }
    }

    for voucher in newest(vouchers, |v| v.effective_date()) {
        if let Some(date) = voucher.effective_date() {
            entries.push(LedgerEntry {
                kind: LedgerKind::Expense,
                description: format!("{} voucher {}", voucher.category_name(), voucher.id),
                amount: -voucher.total_amount(),
                date,
            });
        }
    }

    if entries.is_empty() {
        entries = coarse_entries(invoice_trend, voucher_trend);
    }

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries.truncate(LEDGER_LIMIT);
    entries
}

/// The `PER_SOURCE` newest dated items, most recent first.
fn newest<T: Clone>(items: &[T], date_of: impl Fn(&T) -> Option<NaiveDateTime>) -> Vec<T> {
    let mut dated: Vec<T> = items
        .iter()
        .filter(|item| date_of(item).is_some())
        .cloned()
        .collect();
    dated.sort_by_key(|item| std::cmp::Reverse(date_of(item)));
    dated.truncate(PER_SOURCE);
    dated
}

fn coarse_entries(
    invoice_trend: &[TrendBucket],
    voucher_trend: &[TrendBucket],
) -> Vec<LedgerEntry> {
    let mut entries = Vec::new();

    for bucket in last_active(invoice_trend) {
        entries.push(LedgerEntry {
            kind: LedgerKind::Revenue,
            description: format!("{} revenue", bucket.label),
            amount: bucket.total,
            date: bucket.month_start(),
        });
    }
    for bucket in last_active(voucher_trend) {
        entries.push(LedgerEntry {
            kind: LedgerKind::Expense,
            description: format!("{} expenses", bucket.label),
            amount: -bucket.total,
            date: bucket.month_start(),
        });
    }

    entries
}

/// The last `PER_SOURCE` buckets that actually saw money move. Zero-sum
/// buckets are passed over, so this can reach further back than the
/// trailing three months of the series.
fn last_active(trend: &[TrendBucket]) -> Vec<&TrendBucket> {
    trend
        .iter()
        .filter(|b| !b.total.is_zero())
        .rev()
        .take(PER_SOURCE)
        .collect()
}
