//! Authentication-failure predicate and response classification.
//!
//! The structured `code` field is checked first. The backend also reports
//! expired sessions through fixed `error` strings, and older endpoints only
//! mention "token" somewhere in the text; that last rule is kept as a legacy
//! fallback and logged whenever it decides the outcome.

use tracing::debug;

use super::envelope::ApiEnvelope;
use super::error_code::ApiErrorCode;

/// `error` text the backend uses for a rejected token.
pub const INVALID_OR_EXPIRED_TOKEN: &str = "Invalid or expired token";
/// `error` text the backend uses for a missing session.
pub const UNAUTHORIZED_ERROR: &str = "Unauthorized";

const TOKEN_MARKER: &str = "token";

/// Which rule identified an authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureReason {
    /// The HTTP status was 401.
    Status401,
    /// The envelope carried a session-ending error code.
    ErrorCode(ApiErrorCode),
    /// The `error` field matched a known authentication error text.
    ErrorText,
    /// A failed envelope mentioned "token" in `message` or `error`.
    LegacyTokenMention,
}

/// Outcome of classifying one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// 2xx status and the envelope does not report failure.
    Success,
    /// The session is no longer valid.
    AuthenticationFailure(AuthFailureReason),
    /// Any other failure.
    ApplicationFailure,
}

/// Decide from the envelope alone whether it reports an invalid session.
///
/// # Examples
/// ```
/// use pawstay_console::domain::{ApiEnvelope, AuthFailureReason, authentication_failure};
///
/// let envelope: ApiEnvelope = ApiEnvelope::failure("Unauthorized", "please log in");
/// assert_eq!(
///     authentication_failure(&envelope),
///     Some(AuthFailureReason::ErrorText)
/// );
/// ```
pub fn authentication_failure<T>(envelope: &ApiEnvelope<T>) -> Option<AuthFailureReason> {
    if let Some(code) = envelope.error_code().filter(|code| code.ends_session()) {
        return Some(AuthFailureReason::ErrorCode(code));
    }

    if matches!(
        envelope.error.as_deref(),
        Some(INVALID_OR_EXPIRED_TOKEN | UNAUTHORIZED_ERROR)
    ) {
        return Some(AuthFailureReason::ErrorText);
    }

    if !envelope.success && mentions_token(envelope) {
        debug!(
            error = envelope.error.as_deref().unwrap_or_default(),
            "authentication failure matched by legacy token mention"
        );
        return Some(AuthFailureReason::LegacyTokenMention);
    }

    None
}

/// Boolean form of [`authentication_failure`].
pub fn is_authentication_failure<T>(envelope: &ApiEnvelope<T>) -> bool {
    authentication_failure(envelope).is_some()
}

/// Classify a response; the first matching rule wins.
///
/// 1. status 401 or [`authentication_failure`]
/// 2. status outside 200-299 or `success == false`
/// 3. success
pub fn classify_response<T>(status: u16, envelope: &ApiEnvelope<T>) -> ResponseClass {
    if status == 401 {
        return ResponseClass::AuthenticationFailure(AuthFailureReason::Status401);
    }
    if let Some(reason) = authentication_failure(envelope) {
        return ResponseClass::AuthenticationFailure(reason);
    }
    if !(200..300).contains(&status) || !envelope.success {
        return ResponseClass::ApplicationFailure;
    }
    ResponseClass::Success
}

fn mentions_token<T>(envelope: &ApiEnvelope<T>) -> bool {
    [envelope.message.as_deref(), envelope.error.as_deref()]
        .into_iter()
        .flatten()
        .any(|text| text.contains(TOKEN_MARKER))
}
