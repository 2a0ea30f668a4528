//! Errors for a single page fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout: {0}")]
    Timeout(reqwest::Error),

    #[error("Connection failed: {0}")]
    Connect(reqwest::Error),

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("Request failed with status code {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to encode or decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e)
        } else if e.is_connect() {
            FetchError::Connect(e)
        } else {
            FetchError::Request(e)
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
