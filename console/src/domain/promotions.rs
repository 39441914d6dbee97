//! Promotions manager: discount codes offered on the marketplace.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::api_client::ApiClient;
use super::envelope::ApiEnvelope;
use super::request::path_segment;

const PROMOTIONS: &str = "/api/admin/promotions";

/// How a promotion's value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Percentage off the booking total.
    Percentage,
    /// Fixed amount off, in won.
    Fixed,
}

/// A stored promotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Promotion identifier.
    pub id: String,
    /// Title shown to guests.
    pub title: String,
    /// Code guests enter at checkout.
    pub code: String,
    /// Percentage or fixed amount.
    pub discount_type: DiscountType,
    /// Discount magnitude.
    pub discount_value: f64,
    /// First valid instant.
    pub starts_at: DateTime<Utc>,
    /// Last valid instant.
    pub ends_at: DateTime<Utc>,
    /// Whether the code is currently redeemable.
    pub active: bool,
    /// Times redeemed.
    #[serde(default)]
    pub usage_count: u32,
}

/// Reasons a draft is rejected before it is sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PromotionDraftError {
    /// Title blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Code blank or containing whitespace.
    #[error("code must be a single word")]
    InvalidCode,
    /// Value zero, negative or not a number.
    #[error("discount value must be positive, got {0}")]
    NonPositiveValue(f64),
    /// Percentage above 100.
    #[error("percentage discount cannot exceed 100, got {0}")]
    PercentageTooLarge(f64),
    /// Validity window inverted.
    #[error("promotion must end after it starts")]
    EndsBeforeStart,
}

/// Fields for creating or replacing a promotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionDraft {
    /// Title shown to guests.
    pub title: String,
    /// Code guests enter at checkout.
    pub code: String,
    /// Percentage or fixed amount.
    pub discount_type: DiscountType,
    /// Discount magnitude.
    pub discount_value: f64,
    /// First valid instant.
    pub starts_at: DateTime<Utc>,
    /// Last valid instant.
    pub ends_at: DateTime<Utc>,
    /// Whether the code is redeemable once saved.
    pub active: bool,
}

impl PromotionDraft {
    /// Check the draft the way the backend would.
    pub fn validate(&self) -> Result<(), PromotionDraftError> {
        if self.title.trim().is_empty() {
            return Err(PromotionDraftError::EmptyTitle);
        }
        if self.code.is_empty() || self.code.chars().any(char::is_whitespace) {
            return Err(PromotionDraftError::InvalidCode);
        }
        if self.discount_value.is_nan() || self.discount_value <= 0.0 {
            return Err(PromotionDraftError::NonPositiveValue(self.discount_value));
        }
        if self.discount_type == DiscountType::Percentage && self.discount_value > 100.0 {
            return Err(PromotionDraftError::PercentageTooLarge(self.discount_value));
        }
        if self.ends_at <= self.starts_at {
            return Err(PromotionDraftError::EndsBeforeStart);
        }
        Ok(())
    }
}

/// Promotion CRUD.
#[derive(Clone)]
pub struct PromotionService {
    client: Arc<ApiClient>,
}

impl PromotionService {
    /// Service sending through `client`.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// One page of promotions.
    pub async fn list(&self, page: PageRequest) -> ApiEnvelope<Vec<Promotion>> {
        let path = format!("{PROMOTIONS}?page={}&limit={}", page.page(), page.limit());
        self.client.get(&path).await.decode()
    }

    /// Create a promotion from a valid draft.
    pub async fn create(&self, draft: &PromotionDraft) -> ApiEnvelope<Promotion> {
        let body = match checked_body(draft) {
            Ok(body) => body,
            Err(rejected) => return rejected,
        };
        self.client.post(PROMOTIONS, body).await.decode()
    }

    /// Replace an existing promotion.
    pub async fn update(&self, id: &str, draft: &PromotionDraft) -> ApiEnvelope<Promotion> {
        let Some(id) = path_segment(id) else {
            return invalid_id(id);
        };
        let body = match checked_body(draft) {
            Ok(body) => body,
            Err(rejected) => return rejected,
        };
        self.client
            .put(&format!("{PROMOTIONS}/{id}"), body)
            .await
            .decode()
    }

    /// Delete a promotion. The payload is whatever the backend echoes.
    pub async fn delete(&self, id: &str) -> ApiEnvelope<Value> {
        let Some(id) = path_segment(id) else {
            return invalid_id(id);
        };
        self.client.delete(&format!("{PROMOTIONS}/{id}")).await
    }
}

fn checked_body<T>(draft: &PromotionDraft) -> Result<Value, ApiEnvelope<T>> {
    draft
        .validate()
        .map_err(|error| ApiEnvelope::validation_failure(error.to_string()))?;
    serde_json::to_value(draft).map_err(|error| ApiEnvelope::validation_failure(error.to_string()))
}

fn invalid_id<T>(id: &str) -> ApiEnvelope<T> {
    ApiEnvelope::validation_failure(format!("invalid promotion id: {id:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::envelope::VALIDATION_FAILED;
    use crate::test_support::{ClientHarness, ScriptedTransport, fixed_now};
    use chrono::Duration;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn draft() -> PromotionDraft {
        let starts_at = fixed_now();
        PromotionDraft {
            title: "Spring stay".into(),
            code: "SPRING10".into(),
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            starts_at,
            ends_at: starts_at + Duration::days(30),
            active: true,
        }
    }

    #[rstest]
    fn valid_draft_passes(draft: PromotionDraft) {
        assert_eq!(draft.validate(), Ok(()));
    }

    #[rstest]
    #[case::blank_title(|d: &mut PromotionDraft| d.title = " ".into(), PromotionDraftError::EmptyTitle)]
    #[case::spaced_code(|d: &mut PromotionDraft| d.code = "SPRING 10".into(), PromotionDraftError::InvalidCode)]
    #[case::zero_value(|d: &mut PromotionDraft| d.discount_value = 0.0, PromotionDraftError::NonPositiveValue(0.0))]
    #[case::over_hundred(|d: &mut PromotionDraft| d.discount_value = 150.0, PromotionDraftError::PercentageTooLarge(150.0))]
    #[case::inverted(|d: &mut PromotionDraft| d.ends_at = d.starts_at, PromotionDraftError::EndsBeforeStart)]
    fn invalid_drafts_are_rejected(
        mut draft: PromotionDraft,
        #[case] edit: fn(&mut PromotionDraft),
        #[case] expected: PromotionDraftError,
    ) {
        edit(&mut draft);
        assert_eq!(draft.validate(), Err(expected));
    }

    #[rstest]
    fn fixed_discounts_may_exceed_one_hundred(mut draft: PromotionDraft) {
        draft.discount_type = DiscountType::Fixed;
        draft.discount_value = 5000.0;
        assert_eq!(draft.validate(), Ok(()));
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_draft_is_not_sent(mut draft: PromotionDraft) {
        let harness = ClientHarness::new("/admin/promotions", ScriptedTransport::new());
        draft.code = String::new();
        let service = PromotionService::new(harness.client.clone());

        let envelope = service.create(&draft).await;

        assert_eq!(envelope.error.as_deref(), Some(VALIDATION_FAILED));
        assert!(harness.transport.requests().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn update_puts_the_draft(draft: PromotionDraft) {
        let harness = ClientHarness::new("/admin/promotions", ScriptedTransport::new());
        let mut stored = serde_json::to_value(&draft).expect("draft serialises");
        stored["id"] = json!("promo-3");
        stored["usageCount"] = json!(7);
        harness
            .transport
            .respond_json(200, json!({"success": true, "data": stored}));
        let service = PromotionService::new(harness.client.clone());

        let promotion = service.update("promo-3", &draft).await.data.expect("promotion");

        assert_eq!(promotion.id, "promo-3");
        assert_eq!(promotion.usage_count, 7);
        let sent = harness.transport.last_request().expect("request recorded");
        assert_eq!(sent.method, crate::domain::HttpMethod::Put);
        assert_eq!(sent.url.path(), "/api/admin/promotions/promo-3");
    }

    #[tokio::test]
    async fn delete_targets_the_item() {
        let harness = ClientHarness::new("/admin/promotions", ScriptedTransport::new());
        harness
            .transport
            .respond_json(200, json!({"success": true, "data": {"id": "promo-1"}}));
        let service = PromotionService::new(harness.client.clone());

        let envelope = service.delete("promo-1").await;

        assert!(envelope.success);
        let sent = harness.transport.last_request().expect("request recorded");
        assert_eq!(sent.method, crate::domain::HttpMethod::Delete);
    }
}
