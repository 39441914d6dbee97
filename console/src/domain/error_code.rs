//! Structured error codes carried in the envelope `code` field.
//!
//! The backend reports failures with SCREAMING_SNAKE_CASE codes. Codes the
//! client does not know stay available as raw strings on the envelope;
//! [`ApiErrorCode::parse`] only recognises the ones the client acts on.

use serde::{Deserialize, Serialize};

/// Error codes the client understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    /// The session token is missing or was rejected.
    AuthenticationError,
    /// The session token has expired.
    TokenExpired,
    /// The session token is malformed or revoked.
    InvalidToken,
    /// The request failed validation.
    ValidationError,
    /// Authenticated but not permitted.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with current state.
    Conflict,
    /// Unexpected server-side failure.
    InternalError,
}

impl ApiErrorCode {
    /// Wire representation of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationError => "AUTHENTICATION_ERROR",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Parse a wire code, returning `None` for codes the client ignores.
    ///
    /// # Examples
    /// ```
    /// use pawstay_console::domain::ApiErrorCode;
    ///
    /// assert_eq!(
    ///     ApiErrorCode::parse("AUTHENTICATION_ERROR"),
    ///     Some(ApiErrorCode::AuthenticationError)
    /// );
    /// assert_eq!(ApiErrorCode::parse("SOMETHING_ELSE"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let code = match raw.trim() {
            "AUTHENTICATION_ERROR" => Self::AuthenticationError,
            "TOKEN_EXPIRED" => Self::TokenExpired,
            "INVALID_TOKEN" => Self::InvalidToken,
            "VALIDATION_ERROR" => Self::ValidationError,
            "FORBIDDEN" => Self::Forbidden,
            "NOT_FOUND" => Self::NotFound,
            "CONFLICT" => Self::Conflict,
            "INTERNAL_ERROR" => Self::InternalError,
            _ => return None,
        };
        Some(code)
    }

    /// Whether the code means the session can no longer be used.
    pub const fn ends_session(self) -> bool {
        matches!(
            self,
            Self::AuthenticationError | Self::TokenExpired | Self::InvalidToken
        )
    }
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
