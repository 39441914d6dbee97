//! Operator profile editor.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::api_client::ApiClient;
use super::envelope::ApiEnvelope;
use super::request::MultipartForm;
use super::session::UserRole;

const PROFILE: &str = "/api/admin/profile";
const AVATAR: &str = "/api/admin/profile/avatar";
const AVATAR_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// The signed-in operator's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    /// User identifier.
    pub id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Contact number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Avatar image location.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Role.
    pub role: UserRole,
    /// Last modification.
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New contact number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update changes nothing.
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }
}

/// Profile operations.
#[derive(Clone)]
pub struct ProfileService {
    client: Arc<ApiClient>,
}

impl ProfileService {
    /// Service sending through `client`.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Current profile.
    pub async fn get_profile(&self) -> ApiEnvelope<AdminProfile> {
        self.client.get(PROFILE).await.decode()
    }

    /// Apply a partial update.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiEnvelope<AdminProfile> {
        if update.is_empty() {
            return ApiEnvelope::validation_failure("nothing to update");
        }
        if update.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return ApiEnvelope::validation_failure("name must not be empty");
        }
        let body = match serde_json::to_value(update) {
            Ok(body) => body,
            Err(error) => return ApiEnvelope::validation_failure(error.to_string()),
        };
        self.client.patch(PROFILE, body).await.decode()
    }

    /// Replace the avatar image. Only PNG, JPEG and WebP are accepted.
    pub async fn upload_avatar(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ApiEnvelope<AdminProfile> {
        if !AVATAR_TYPES.contains(&content_type) {
            return ApiEnvelope::validation_failure(format!(
                "unsupported avatar type {content_type}"
            ));
        }
        let form = MultipartForm::new().file("avatar", file_name, Some(content_type), bytes);
        self.client.upload(AVATAR, form).await.decode()
    }
}
