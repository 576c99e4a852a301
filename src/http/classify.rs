//! Error classification
//!
//! Pure functions mapping HTTP statuses, response bodies, headers and
//! transport failures onto [`Error`]. Nothing here touches the network.

use crate::error::{Error, ErrorKind};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;

/// Message used when the body carries nothing usable
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Map an HTTP status to an error kind
///
/// Statuses without a dedicated kind (e.g. 408, 418) map to `BadRequest`.
pub fn kind_from_status(status: u16) -> ErrorKind {
    match status {
        400 => ErrorKind::BadRequest,
        401 => ErrorKind::Authentication,
        403 => ErrorKind::PermissionDenied,
        404 => ErrorKind::NotFound,
        409 => ErrorKind::Conflict,
        422 => ErrorKind::UnprocessableEntity,
        429 => ErrorKind::RateLimit,
        s if s >= 500 => ErrorKind::ServerError,
        _ => ErrorKind::BadRequest,
    }
}

/// Pull a human-readable message out of an error body
///
/// Precedence: `error.message`, `message`, `error` as a string, the body
/// itself when it is a string, then [`FALLBACK_MESSAGE`].
pub fn extract_message(body: &Value) -> String {
    if let Some(message) = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
    {
        return message.to_string();
    }

    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return message.to_string();
    }

    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return message.to_string();
    }

    match body {
        Value::String(s) => s.clone(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}

/// Pull an application error code out of an error body
///
/// Looks at `error.code`, then top-level `code`.
pub fn extract_code(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("code"))
        .and_then(code_string)
        .or_else(|| body.get("code").and_then(code_string))
}

fn code_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read `Retry-After` as whole seconds and convert to milliseconds
///
/// Soft-fails to `None` on a missing, empty or non-integer header.
pub fn extract_retry_after(headers: &HeaderMap) -> Option<u64> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?;
    let seconds: u64 = raw.trim().parse().ok()?;
    seconds.checked_mul(1000)
}

/// Build an error from a non-2xx response
pub fn from_response(status: u16, headers: &HeaderMap, body: &Value) -> Error {
    let kind = kind_from_status(status);
    let retry_after_ms = if kind == ErrorKind::RateLimit {
        extract_retry_after(headers)
    } else {
        None
    };

    Error::new(kind, extract_message(body))
        .with_status(status)
        .with_code(extract_code(body))
        .with_retry_after_ms(retry_after_ms)
}

/// Build an error from a transport failure
///
/// Timeouts become `Timeout`; everything else becomes `Connection` with the
/// transport's detail embedded in the message. Faults that are not network
/// failures (e.g. a request that could not be built) are flagged unexpected.
pub fn from_transport(err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        return Error::timeout(format!("Request timed out: {err}"));
    }

    // Body and decode failures here mean the stream broke while reading
    if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
        return Error::connection(format!("Connection error: {err}"));
    }

    Error::unexpected(format!("Unexpected error: {err}"))
}

/// Decode a response body
///
/// Empty bodies become `null`; bodies that are not JSON become a JSON string
/// of the raw text.
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
