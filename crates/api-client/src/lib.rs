use crate::error::ApiError;
use async_trait::async_trait;
use configuration::ApiSettings;
use core_types::{Hotel, Invoice, Package, Place, User, Voucher};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::ApiEnvelope;

/// The generic, abstract interface to the travel-agency REST API.
/// This trait is the contract the aggregator engine consumes, allowing the
/// underlying implementation (live HTTP or mock) to be swapped out.
#[async_trait]
pub trait TravelApi: Send + Sync {
    /// Fetches every registered user (site customers and operators).
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// Fetches the hotel catalogue.
    async fn list_hotels(&self) -> Result<Vec<Hotel>, ApiError>;

    /// Fetches the tour-package catalogue.
    async fn list_packages(&self) -> Result<Vec<Package>, ApiError>;

    /// Fetches the destination list.
    async fn list_places(&self) -> Result<Vec<Place>, ApiError>;

    /// Fetches all booking invoices.
    async fn list_invoices(&self) -> Result<Vec<Invoice>, ApiError>;

    /// Fetches all payment vouchers (internal expenses).
    async fn list_vouchers(&self) -> Result<Vec<Voucher>, ApiError>;
}

/// A concrete [`TravelApi`] over HTTP, speaking the API's
/// `{ success, data, message }` envelope.
#[derive(Clone)]
pub struct HttpTravelApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTravelApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches one collection endpoint and unwraps its envelope.
    ///
    /// Non-2xx statuses and `success: false` bodies both surface as typed
    /// errors; the caller (the aggregator) decides how to degrade.
    async fn get_collection<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "requesting collection");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Http(status.as_u16(), truncate(&text)));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&text)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        envelope.into_data()
    }
}

// Error bodies can be full HTML error pages; keep logs readable.
fn truncate(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}

#[async_trait]
impl TravelApi for HttpTravelApi {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get_collection("users").await
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>, ApiError> {
        self.get_collection("hotels").await
    }

    async fn list_packages(&self) -> Result<Vec<Package>, ApiError> {
        self.get_collection("packages").await
    }

    async fn list_places(&self) -> Result<Vec<Place>, ApiError> {
        self.get_collection("places").await
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, ApiError> {
        self.get_collection("invoices").await
    }

    async fn list_vouchers(&self) -> Result<Vec<Voucher>, ApiError> {
        self.get_collection("payment-vouchers").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = HttpTravelApi::new(&ApiSettings {
            base_url: "http://localhost:5000/api/".to_string(),
            request_timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(api.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let short = truncate("all fine");
        assert_eq!(short, "all fine");

        let long = truncate(&"₹".repeat(200));
        assert!(long.ends_with('…'));
        assert!(long.len() < 210);
    }
}
