//! The uniform response envelope shared by every API endpoint.
//!
//! ```json
//! { "success": true, "data": [], "pagination": { "currentPage": 1, ... } }
//! { "success": false, "error": "Unauthorized", "code": "AUTHENTICATION_ERROR" }
//! ```
//!
//! ## Invariants
//! - Envelopes built by this module with `success == false` always carry an
//!   `error`, `message` or `code`.

use pagination::Pagination;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error_code::ApiErrorCode;
use super::notices::{CANNOT_CONNECT_MESSAGE, REQUEST_CANCELLED_MESSAGE, SESSION_EXPIRED_MESSAGE};

/// `error` value used when the server could not be reached or parsed.
pub const NETWORK_ERROR: &str = "Network Error";
/// `error` value used when the caller cancelled the request.
pub const REQUEST_CANCELLED: &str = "Request Cancelled";
/// `error` value used when a success envelope carried unusable data.
pub const INVALID_RESPONSE: &str = "Invalid Response";
/// `error` value used for requests rejected before they were sent.
pub const VALIDATION_FAILED: &str = "Validation Failed";
/// `error` value attached to session-expired envelopes.
pub const UNAUTHORIZED: &str = "Unauthorized";

/// Response envelope.
///
/// # Examples
/// ```
/// use pawstay_console::domain::ApiEnvelope;
/// use serde_json::json;
///
/// let ok = ApiEnvelope::ok(json!({ "id": 1 }));
/// assert!(ok.success);
///
/// let failed: ApiEnvelope = ApiEnvelope::failure("Bad Request", "title is required");
/// assert_eq!(failed.display_message(), Some("title is required"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T = Value> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload, present on success by convention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Short error label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Pagination block for list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            code: None,
            pagination: None,
        }
    }

    /// Successful list envelope with pagination metadata.
    pub fn ok_page(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }

    /// Failed envelope with an error label and a message.
    pub fn failure(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: Some(error.into()),
            code: None,
            pagination: None,
        }
    }

    /// Envelope returned when the server is unreachable or answers garbage.
    pub fn network_error() -> Self {
        Self::failure(NETWORK_ERROR, CANNOT_CONNECT_MESSAGE)
    }

    /// Envelope returned to callers after an authentication failure.
    pub fn session_expired() -> Self {
        Self::failure(UNAUTHORIZED, SESSION_EXPIRED_MESSAGE)
            .with_code(ApiErrorCode::AuthenticationError)
    }

    /// Envelope returned when the caller cancelled the request.
    pub fn cancelled() -> Self {
        Self::failure(REQUEST_CANCELLED, REQUEST_CANCELLED_MESSAGE)
    }

    /// Envelope for input rejected before any request was sent.
    pub fn validation_failure(message: impl Into<String>) -> Self {
        Self::failure(VALIDATION_FAILED, message).with_code(ApiErrorCode::ValidationError)
    }

    /// Attach a structured error code.
    pub fn with_code(mut self, code: ApiErrorCode) -> Self {
        self.code = Some(code.as_str().to_owned());
        self
    }

    /// Whether the envelope reports success.
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// The structured error code, when the client recognises it.
    pub fn error_code(&self) -> Option<ApiErrorCode> {
        self.code.as_deref().and_then(ApiErrorCode::parse)
    }

    /// Best text to show a user: `message`, falling back to `error`.
    pub fn display_message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }

    /// Transform the payload, keeping every other field.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiEnvelope<U> {
        ApiEnvelope {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            error: self.error,
            code: self.code,
            pagination: self.pagination,
        }
    }

    /// Fallible [`ApiEnvelope::map`].
    ///
    /// # Errors
    ///
    /// Returns the first error `f` produces.
    pub fn try_map<U, E>(
        self,
        f: impl FnOnce(T) -> Result<U, E>,
    ) -> Result<ApiEnvelope<U>, E> {
        Ok(ApiEnvelope {
            success: self.success,
            data: self.data.map(f).transpose()?,
            message: self.message,
            error: self.error,
            code: self.code,
            pagination: self.pagination,
        })
    }

    /// Re-type a failed envelope, dropping any payload.
    pub fn into_failure<U>(self) -> ApiEnvelope<U> {
        ApiEnvelope {
            success: false,
            data: None,
            message: self.message,
            error: self.error,
            code: self.code,
            pagination: None,
        }
    }
}

impl ApiEnvelope<Value> {
    /// Generic success answer with an empty object as payload.
    pub fn empty_success() -> Self {
        Self::ok(Value::Object(serde_json::Map::new()))
    }

    /// Decode the payload into a typed envelope.
    ///
    /// Failures pass through unchanged; a success whose payload is missing or
    /// does not match `U` becomes an [`INVALID_RESPONSE`] failure.
    pub fn decode<U: DeserializeOwned>(self) -> ApiEnvelope<U> {
        if !self.success {
            return self.into_failure();
        }
        let Some(data) = self.data else {
            return ApiEnvelope::failure(INVALID_RESPONSE, "response carried no data");
        };
        match serde_json::from_value::<U>(data) {
            Ok(decoded) => ApiEnvelope {
                success: true,
                data: Some(decoded),
                message: self.message,
                error: None,
                code: None,
                pagination: self.pagination,
            },
            Err(error) => {
                debug!(error = %error, "success payload did not match the expected shape");
                ApiEnvelope::failure(INVALID_RESPONSE, format!("unexpected response data: {error}"))
            }
        }
    }

    /// Parse a raw response body.
    ///
    /// A missing `success` field is taken from the HTTP status. Non-string
    /// `error`/`message` values are rendered as JSON text, and a malformed
    /// pagination block is dropped rather than failing the whole envelope.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the body is not a JSON object.
    pub fn from_wire(body: &[u8], status: u16) -> Result<Self, serde_json::Error> {
        let wire: WireEnvelope = serde_json::from_slice(body)?;
        let pagination = wire.pagination.and_then(|raw| {
            serde_json::from_value::<Pagination>(raw)
                .map_err(|error| debug!(error = %error, "ignoring malformed pagination block"))
                .ok()
        });
        Ok(Self {
            success: wire.success.unwrap_or((200..300).contains(&status)),
            data: wire.data,
            message: wire.message.map(text_of),
            error: wire.error.map(text_of),
            code: wire.code.map(text_of),
            pagination,
        })
    }
}

#[derive(Deserialize)]
struct WireEnvelope {
    success: Option<bool>,
    data: Option<Value>,
    message: Option<Value>,
    error: Option<Value>,
    code: Option<Value>,
    pagination: Option<Value>,
}

fn text_of(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    //! Envelope construction and wire parsing.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::network(ApiEnvelope::<Value>::network_error())]
    #[case::expired(ApiEnvelope::<Value>::session_expired())]
    #[case::cancelled(ApiEnvelope::<Value>::cancelled())]
    #[case::validation(ApiEnvelope::<Value>::validation_failure("bad"))]
    fn failures_always_explain_themselves(#[case] envelope: ApiEnvelope) {
        assert!(!envelope.success);
        assert!(
            envelope.error.is_some() || envelope.message.is_some() || envelope.code.is_some(),
            "failed envelopes must carry an explanation"
        );
    }

    #[test]
    fn serialisation_omits_absent_fields() {
        let value = serde_json::to_value(ApiEnvelope::ok(json!([1, 2]))).expect("serialise");
        assert_eq!(value, json!({ "success": true, "data": [1, 2] }));
    }

    #[rstest]
    #[case(200, true)]
    #[case(204, true)]
    #[case(404, false)]
    fn missing_success_is_taken_from_status(#[case] status: u16, #[case] expected: bool) {
        let envelope = ApiEnvelope::from_wire(br#"{"data":{"id":1}}"#, status).expect("parse");
        assert_eq!(envelope.success, expected);
    }

    #[test]
    fn wire_parsing_tolerates_structured_errors_and_bad_pagination() {
        let body = br#"{"success":false,"error":{"field":"title"},"pagination":"nope"}"#;
        let envelope = ApiEnvelope::from_wire(body, 400).expect("parse");
        assert_eq!(envelope.error.as_deref(), Some(r#"{"field":"title"}"#));
        assert!(envelope.pagination.is_none());
    }

    #[test]
    fn wire_parsing_rejects_non_objects() {
        assert!(ApiEnvelope::from_wire(b"<html>", 200).is_err());
        assert!(ApiEnvelope::from_wire(b"[1,2]", 200).is_err());
    }

    #[test]
    fn decode_reports_shape_mismatch_as_invalid_response() {
        let envelope = ApiEnvelope::ok(json!({ "id": 5 })).decode::<Vec<String>>();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some(INVALID_RESPONSE));
    }

    #[test]
    fn try_map_keeps_failures_and_surfaces_errors() {
        let failed: ApiEnvelope<u8> = ApiEnvelope::failure("Unauthorized", "bad password");
        let mapped = failed
            .try_map(|n| Ok::<_, String>(u16::from(n)))
            .expect("no payload to convert");
        assert_eq!(mapped.display_message(), Some("bad password"));

        let converted =
            ApiEnvelope::ok(7_u8).try_map(|n| Err::<u16, _>(format!("cannot use {n}")));
        assert_eq!(converted, Err("cannot use 7".to_owned()));
    }

    #[test]
    fn decode_keeps_failures_intact() {
        let failed: ApiEnvelope = ApiEnvelope::failure("Not Found", "missing")
            .with_code(ApiErrorCode::NotFound);
        let decoded = failed.decode::<Vec<String>>();
        assert_eq!(decoded.error_code(), Some(ApiErrorCode::NotFound));
        assert_eq!(decoded.display_message(), Some("missing"));
    }
}
