use crate::{
    coerce::{string_of, Fields},
    errors::{Result, WhoisApiError},
    record::WhoisRecord,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const ERROR_ROOT: &str = "ErrorMessage";
const RECORD_ROOT: &str = "WhoisRecord";

/// Error payload reported by the service in place of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub error_code: String,
    pub msg: String,
}

impl ErrorMessage {
    pub fn from_fields(values: &Fields) -> Self {
        Self {
            error_code: string_of(values, "errorMessage"),
            msg: string_of(values, "msg"),
        }
    }
}

/// Decode a JSON response body into a [`WhoisRecord`].
///
/// An `ErrorMessage` root becomes [`WhoisApiError::Response`]; malformed JSON
/// or a document with neither root becomes [`WhoisApiError::UnparsableResponse`].
pub fn parse_response(body: &str) -> Result<WhoisRecord> {
    let document: Value =
        serde_json::from_str(body).map_err(|e| WhoisApiError::UnparsableResponse {
            message: "Could not parse API response".to_string(),
            source: Some(e),
        })?;

    let root = document.as_object();

    if let Some(error) = root.and_then(|r| r.get(ERROR_ROOT)) {
        let parsed = error
            .as_object()
            .map(ErrorMessage::from_fields)
            .unwrap_or_default();
        debug!("Service reported error {}: {}", parsed.error_code, parsed.msg);
        return Err(WhoisApiError::Response {
            raw: body.to_string(),
            parsed,
        });
    }

    if let Some(record) = root.and_then(|r| r.get(RECORD_ROOT)) {
        let record = match record {
            Value::Object(fields) => WhoisRecord::from_fields(fields),
            _ => WhoisRecord::from_fields(&Fields::new()),
        };
        return Ok(record);
    }

    Err(WhoisApiError::UnparsableResponse {
        message: "Could not find a correct root element.".to_string(),
        source: None,
    })
}
