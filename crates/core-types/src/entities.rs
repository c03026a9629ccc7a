use crate::time::flexible_timestamp;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Using `#[serde(rename_all = "camelCase")]` to automatically map from the
// API's camelCase JSON to Rust snake_case. Every field except `id` is
// optional because upstream records are only loosely validated; the
// accessor methods below encode the fallback rules the dashboard relies on.

/// A customer-facing booking invoice (hotel or tour).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    #[serde(alias = "_id")]
    pub id: String,
    /// Which side of the business the invoice belongs to: "hotel" or "tour".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub total: Option<Decimal>,
    /// Older records use `amount` instead of `total`.
    pub amount: Option<Decimal>,
    pub advance_paid: Option<Decimal>,
    pub status: Option<String>,
    #[serde(with = "flexible_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(with = "flexible_timestamp")]
    pub date: Option<NaiveDateTime>,
}

impl Invoice {
    /// The invoiced amount: `total`, falling back to the legacy `amount`
    /// field, falling back to zero.
    pub fn gross(&self) -> Decimal {
        self.total.or(self.amount).unwrap_or_default()
    }

    /// Outstanding balance, floored at zero. Overpaid invoices never go
    /// negative.
    pub fn due(&self) -> Decimal {
        (self.gross() - self.advance_paid.unwrap_or_default()).max(Decimal::ZERO)
    }

    /// The stored status when present; otherwise inferred: fully advanced
    /// invoices are "paid", everything else "pending".
    pub fn effective_status(&self) -> String {
        match self.status.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ if self.due() <= Decimal::ZERO => "paid".to_string(),
            _ => "pending".to_string(),
        }
    }

    /// `date` when present, else `created_at`. First non-null wins.
    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        self.date.or(self.created_at)
    }

    pub fn kind_name(&self) -> &str {
        self.kind.as_deref().filter(|k| !k.is_empty()).unwrap_or("unknown")
    }
}

/// An internal expense record (payment voucher), distinct from
/// customer-facing invoices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Voucher {
    #[serde(alias = "_id")]
    pub id: String,
    /// Expense category: hotel, transport, food, guide, other.
    pub category: Option<String>,
    pub total: Option<Decimal>,
    pub advance: Option<Decimal>,
    pub due: Option<Decimal>,
    pub payment_method: Option<String>,
    #[serde(with = "flexible_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(with = "flexible_timestamp")]
    pub date: Option<NaiveDateTime>,
}

impl Voucher {
    pub fn total_amount(&self) -> Decimal {
        self.total.unwrap_or_default()
    }

    /// Stored due amount when present, otherwise derived from total minus
    /// advance, floored at zero.
    pub fn due_amount(&self) -> Decimal {
        match self.due {
            Some(due) => due,
            None => (self.total_amount() - self.advance.unwrap_or_default()).max(Decimal::ZERO),
        }
    }

    pub fn category_name(&self) -> &str {
        self.category.as_deref().filter(|c| !c.is_empty()).unwrap_or("other")
    }

    pub fn payment_method_name(&self) -> &str {
        self.payment_method
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or("unknown")
    }

    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        self.date.or(self.created_at)
    }
}

/// A hotel listed in the back office.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hotel {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub place_id: Option<String>,
    pub place_name: Option<String>,
    pub rating: Option<f64>,
    /// Display string like "₹5,000 - ₹12,000 per night".
    pub price_range: Option<String>,
    #[serde(with = "flexible_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

/// A tour package offered by the agency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Package {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub price: Option<Decimal>,
    #[serde(with = "flexible_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

/// A destination on the marketing site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Place {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub rating: Option<f64>,
    pub image: Option<String>,
    pub images: Vec<String>,
}

impl Place {
    /// Whether the place has at least one gallery image attached.
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|i| !i.is_empty())
            || self.images.iter().any(|i| !i.is_empty())
    }
}

/// A registered site user or back-office operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub role: Option<String>,
    #[serde(with = "flexible_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}
