//! Shared handling of Google API error payloads.

use reqwest::{Response, StatusCode};
use serde::Deserialize;

use crate::error::{FireadminError, Result};

/// `{"error": {"code": 400, "message": "USER_NOT_FOUND", "status": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Pass successful responses through, turn anything else into an error.
pub(crate) async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(parse_error(status, &body))
}

/// Map a failed response to `FireadminError`.
///
/// Identity Toolkit reports missing users as HTTP 400 with a message of
/// `USER_NOT_FOUND`, Firestore as HTTP 404 / `NOT_FOUND`; both become
/// `FireadminError::NotFound`.
pub(crate) fn parse_error(status: StatusCode, body: &str) -> FireadminError {
    let (message, code) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            (envelope.error.message, envelope.error.status)
        }
        Ok(envelope) => (status.to_string(), envelope.error.status),
        Err(_) if body.trim().is_empty() => (status.to_string(), None),
        Err(_) => (body.trim().to_string(), None),
    };

    let not_found = status == StatusCode::NOT_FOUND
        || code.as_deref() == Some("NOT_FOUND")
        || message.starts_with("USER_NOT_FOUND");

    if not_found {
        FireadminError::NotFound(message)
    } else {
        FireadminError::Api {
            status: status.as_u16(),
            code,
            message,
        }
    }
}
