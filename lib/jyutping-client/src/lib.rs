mod client;
mod request;
mod response;

pub use client::{Client, ClientConfig, DEFAULT_URL, MAX_TIMEOUT};
pub use request::RomanizeRequest;
pub use response::{CharRecord, RomanizeResponse, Syllable};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request {url} failed. Error: {error}")]
    Request { url: String, error: reqwest::Error },

    #[error("Romanization service returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed romanization response: {0}")]
    MalformedResponse(String),

    #[error("Failed to encode romanization request: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request { error, .. } if error.is_timeout())
    }

    /// Transport failures and server-side errors may succeed on a later attempt,
    /// a response that does not parse will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request { error, .. } => {
                error.is_timeout() || error.is_connect() || error.is_request()
            }
            Self::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            Self::MalformedResponse(_) | Self::Serialize(_) => false,
        }
    }
}
