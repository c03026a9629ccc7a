use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to reach the API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("The API returned HTTP {0}: {1}")]
    Http(u16, String),

    #[error("The API rejected the request: {0}")]
    Rejected(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("The API reported success but sent no data")]
    MissingData,
}
