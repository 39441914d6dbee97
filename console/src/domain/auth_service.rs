//! Login and logout for both portals.
//!
//! Login is sent anonymously: a 401 from the login endpoint means wrong
//! credentials, not an expired session, so it must not trigger teardown.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::api_client::ApiClient;
use super::envelope::ApiEnvelope;
use super::portal::Portal;
use super::ports::SessionStore;
use super::request::ApiRequest;
use super::session::{SessionKey, SessionUser};

/// `error` value used when login succeeded but the session could not be saved.
pub const SESSION_STORAGE_ERROR: &str = "Session Storage Error";

/// Domain error returned when login form values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCredentialsError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email has no `@` separating a local part and a domain.
    MalformedEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginCredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::MalformedEmail => write!(f, "email must look like name@domain"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginCredentialsError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, non-empty and contains `@` with text on both sides.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use pawstay_console::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin@pawstay.test ", "pw").unwrap();
/// assert_eq!(creds.email(), "admin@pawstay.test");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginCredentialsError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(LoginCredentialsError::EmptyEmail);
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(LoginCredentialsError::MalformedEmail),
        }
        if password.is_empty() {
            return Err(LoginCredentialsError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: SessionUser,
    #[serde(default)]
    approval_status: Option<String>,
    #[serde(default)]
    accommodation_name: Option<String>,
}

/// Opens and closes sessions.
#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    /// Service sending through `client`.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Sign in to `portal` and persist the session.
    ///
    /// Returns the signed-in user. Partner logins also cache the approval
    /// status and accommodation name when the backend provides them.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        portal: Portal,
    ) -> ApiEnvelope<SessionUser> {
        let request = ApiRequest::post(portal.login_endpoint())
            .json(json!({
                "email": credentials.email(),
                "password": credentials.password(),
            }))
            .anonymous();
        let envelope = self.client.request(request).await.decode::<LoginResponse>();
        let Some(response) = envelope.data else {
            return envelope.into_failure();
        };

        if let Err(error) = self.persist(&response, portal) {
            warn!(error = %error, "could not persist session after login");
            return ApiEnvelope::failure(SESSION_STORAGE_ERROR, error.to_string());
        }
        info!(user = %response.user.id, ?portal, "signed in");
        ApiEnvelope::ok(response.user)
    }

    /// Clear the session and go to the login page now.
    pub fn logout(&self) {
        self.client.teardown().logout();
    }

    /// The user persisted at login, if any.
    pub fn current_user(&self) -> Option<SessionUser> {
        let raw = match self.store().get(SessionKey::User) {
            Ok(raw) => raw?,
            Err(error) => {
                warn!(error = %error, "could not read session user");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|error| warn!(error = %error, "stored session user is corrupt"))
            .ok()
    }

    /// Whether an access token is stored.
    pub fn is_signed_in(&self) -> bool {
        matches!(self.store().get(SessionKey::AccessToken), Ok(Some(token)) if !token.trim().is_empty())
    }

    fn store(&self) -> &Arc<dyn SessionStore> {
        self.client.session_store()
    }

    fn persist(
        &self,
        response: &LoginResponse,
        portal: Portal,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let store = self.store();
        store.set(SessionKey::AccessToken, &response.access_token)?;
        if let Some(refresh) = &response.refresh_token {
            store.set(SessionKey::RefreshToken, refresh)?;
        }
        store.set(SessionKey::User, &serde_json::to_string(&response.user)?)?;
        if portal == Portal::Partner {
            if let Some(status) = &response.approval_status {
                store.set(SessionKey::ApprovalStatus, status)?;
            }
            if let Some(name) = &response.accommodation_name {
                store.set(SessionKey::AccommodationName, name)?;
            }
        }
        Ok(())
    }
}
