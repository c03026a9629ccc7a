use crate::error::ApiError;
use serde::Deserialize;

/// The uniform `{ success, data, message }` envelope every endpoint of the
/// travel-agency API wraps its payload in.
///
/// `data` stays generic: for the collection endpoints this crate consumes
/// it is always a JSON array of entity snapshots.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, mapping `success: false` and a missing body to
    /// the matching [`ApiError`].
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            let reason = self
                .message
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(ApiError::Rejected(reason));
        }
        self.data.ok_or(ApiError::MissingData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Hotel;

    #[test]
    fn successful_envelope_yields_payload() {
        let envelope: ApiEnvelope<Vec<Hotel>> = serde_json::from_str(
            r#"{"success":true,"data":[{"_id":"h1","name":"Sea View","placeName":"Goa"}]}"#,
        )
        .unwrap();
        let hotels = envelope.into_data().unwrap();
        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0].name, "Sea View");
    }

    #[test]
    fn rejected_envelope_carries_the_api_message() {
        let envelope: ApiEnvelope<Vec<Hotel>> =
            serde_json::from_str(r#"{"success":false,"message":"database offline"}"#).unwrap();
        match envelope.into_data() {
            Err(ApiError::Rejected(reason)) => assert_eq!(reason, "database offline"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn success_without_data_is_an_error() {
        let envelope: ApiEnvelope<Vec<Hotel>> =
            serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(envelope.into_data(), Err(ApiError::MissingData)));
    }
}
