use crate::response::ErrorMessage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhoisApiError {
    #[error("Parameter error: {0}")]
    Parameter(String),

    #[error("API key isn't defined")]
    EmptyApiKey,

    /// The service answered with an `ErrorMessage` document.
    #[error("API error {}: {}", .parsed.error_code, .parsed.msg)]
    Response { raw: String, parsed: ErrorMessage },

    #[error("Unparsable API response: {message}")]
    UnparsableResponse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Authentication failed: {0}")]
    ApiAuth(String),

    #[error("HTTP error {status}: {body}")]
    HttpApi { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network timeout")]
    Timeout,

    #[error("Invalid URL specified: {0}")]
    InvalidUrl(String),

    #[error("Timeout value should be in [1, 60], got {0}")]
    InvalidTimeout(f64),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl WhoisApiError {
    /// The service error payload carried by a `Response` error.
    pub fn parsed_message(&self) -> Option<&ErrorMessage> {
        match self {
            WhoisApiError::Response { parsed, .. } => Some(parsed),
            _ => None,
        }
    }

    /// The low-level JSON failure behind an `UnparsableResponse`, when there was one.
    pub fn original_error(&self) -> Option<&serde_json::Error> {
        match self {
            WhoisApiError::UnparsableResponse { source, .. } => source.as_ref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WhoisApiError>;
