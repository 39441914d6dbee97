//! Persisted session keys and the credentials stored under them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Length of the token fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Keys held in the client's persistent key-value store.
///
/// All of them are cleared together on logout or authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionKey {
    /// Bearer token sent on every request.
    AccessToken,
    /// Token used to obtain a new access token.
    RefreshToken,
    /// JSON-serialised [`SessionUser`].
    User,
    /// Partner approval state cached at login.
    ApprovalStatus,
    /// Partner accommodation name cached at login.
    AccommodationName,
}

impl SessionKey {
    /// Every persisted key.
    pub const ALL: [Self; 5] = [
        Self::AccessToken,
        Self::RefreshToken,
        Self::User,
        Self::ApprovalStatus,
        Self::AccommodationName,
    ];

    /// Storage key name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::User => "user",
            Self::ApprovalStatus => "approvalStatus",
            Self::AccommodationName => "accommodationName",
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bearer token read from the session store.
///
/// The raw value is wiped from memory on drop and never appears in `Debug`
/// output; log [`BearerToken::fingerprint`] instead.
///
/// # Examples
/// ```
/// use pawstay_console::domain::BearerToken;
///
/// let token = BearerToken::new("abc").expect("non-blank token");
/// assert_eq!(token.header_value().as_str(), "Bearer abc");
/// assert!(BearerToken::new("   ").is_none());
/// ```
#[derive(Clone)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Wrap a raw token, rejecting blank values.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = Zeroizing::new(raw.into());
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    /// `Authorization` header value.
    pub fn header_value(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("Bearer {}", self.0.as_str()))
    }

    /// Raw token text.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Truncated SHA-256 fingerprint, safe to log.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BearerToken")
            .field(&self.fingerprint())
            .finish()
    }
}

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Marketplace operator using the admin console.
    Admin,
    /// Accommodation owner using the partner portal.
    Partner,
}

/// User record persisted under [`SessionKey::User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Backend user identifier.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role the session was opened with.
    pub role: UserRole,
}
