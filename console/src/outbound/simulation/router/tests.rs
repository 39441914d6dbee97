//! Behaviour of the simulated backend.

use std::sync::Arc;

use insta::assert_json_snapshot;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::outbound::simulation::routes::{
    MESSAGES_PER_CONVERSATION, NOT_FOUND, PROMOTION_COUNT, TRANSACTION_COUNT,
};
use crate::test_support::{FixedClock, ImmediateSleeper, RecordingSleeper, fixed_now};

#[fixture]
fn router() -> MockRouter {
    MockRouter::new(
        Arc::new(FixedClock::default()),
        Arc::new(ImmediateSleeper),
        DEFAULT_MOCK_LATENCY,
    )
}

#[rstest]
fn promotions_first_page_has_ten_of_fifteen(router: MockRouter) {
    let envelope = router.route(
        "/api/admin/promotions?page=1&limit=10",
        HttpMethod::Get,
        None,
    );

    assert!(envelope.success);
    let items = envelope
        .data
        .as_ref()
        .and_then(Value::as_array)
        .expect("list payload");
    assert_eq!(items.len(), 10);
    let pagination = envelope.pagination.expect("pagination block");
    assert_eq!(pagination.total_items, PROMOTION_COUNT);
    assert_eq!(pagination.total_pages, 2);
}

#[rstest]
#[case::defaults("/api/admin/transactions", 10, 1)]
#[case::last_page("/api/admin/transactions?page=5&limit=10", 2, 5)]
#[case::past_the_end("/api/admin/transactions?page=9", 0, 9)]
#[case::garbage_query("/api/admin/transactions?page=abc&limit=-3", 10, 1)]
fn list_paging_follows_the_query(
    router: MockRouter,
    #[case] url: &str,
    #[case] expected_items: usize,
    #[case] expected_page: u64,
) {
    let envelope = router.route(url, HttpMethod::Get, None);

    let items = envelope.data.as_ref().and_then(Value::as_array).map(Vec::len);
    assert_eq!(items, Some(expected_items));
    let pagination = envelope.pagination.expect("pagination block");
    assert_eq!(pagination.current_page, expected_page);
    assert_eq!(pagination.total_items, TRANSACTION_COUNT);
}

#[rstest]
fn sent_messages_echo_content_from_the_operator(router: MockRouter) {
    let body = json!({"content": "hello"});

    let envelope = router.route(
        "/api/chats/conversations/conv-3/messages",
        HttpMethod::Post,
        Some(&body),
    );

    let message = envelope.data.expect("message payload");
    assert_eq!(message["content"], "hello");
    assert_eq!(message["sender"]["role"], "admin");
    assert_eq!(message["conversationId"], "conv-3");
}

#[rstest]
fn conversation_messages_are_paginated(router: MockRouter) {
    let envelope = router.route(
        "/api/chats/conversations/conv-1/messages?limit=50",
        HttpMethod::Get,
        None,
    );

    let pagination = envelope.pagination.expect("pagination block");
    assert_eq!(pagination.total_items, MESSAGES_PER_CONVERSATION);
    assert_eq!(pagination.total_pages, 1);
}

#[rstest]
#[case::absolute("https://api.pawstay.kr/api/admin/user_profiles?page=2&limit=5")]
#[case::relative("/api/chats/conversations/conv-2/messages")]
#[case::single("/api/admin/partner_approvals/approval-4")]
fn identical_inputs_give_identical_envelopes(router: MockRouter, #[case] url: &str) {
    let first = router.route(url, HttpMethod::Get, None);
    let second = router.route(url, HttpMethod::Get, None);

    assert_eq!(first, second);
}

#[rstest]
#[case::promotion_past_the_end("/api/admin/promotions/promo-16", HttpMethod::Get)]
#[case::promotion_update_past_the_end("/api/admin/promotions/promo-16", HttpMethod::Put)]
#[case::promotion_overflow("/api/admin/promotions/promo-200000000", HttpMethod::Get)]
#[case::promotion_zero("/api/admin/promotions/promo-0", HttpMethod::Get)]
#[case::transaction_past_the_end("/api/admin/transactions/txn-43", HttpMethod::Get)]
#[case::transaction_overflow(
    "/api/admin/transactions/txn-18446744073709551615",
    HttpMethod::Get
)]
#[case::transaction_beyond_u64(
    "/api/admin/transactions/txn-99999999999999999999999",
    HttpMethod::Get
)]
#[case::user_past_the_end("/api/admin/user_profiles/user-26", HttpMethod::Get)]
#[case::user_overflow("/api/admin/user_profiles/user-200000000", HttpMethod::Get)]
#[case::user_update_overflow("/api/admin/user_profiles/user-200000000", HttpMethod::Patch)]
#[case::approval_past_the_end("/api/admin/partner_approvals/approval-9", HttpMethod::Get)]
#[case::conversation_past_the_end("/api/chats/conversations/conv-6", HttpMethod::Get)]
#[case::conversation_overflow(
    "/api/chats/conversations/conv-99999999999999",
    HttpMethod::Get
)]
#[case::messages_overflow(
    "/api/chats/conversations/conv-99999999999999/messages",
    HttpMethod::Get
)]
#[case::mark_read_past_the_end("/api/chats/conversations/conv-6/mark-read", HttpMethod::Post)]
#[case::banner_past_the_end("/api/admin/app-banner/banner-4", HttpMethod::Get)]
#[case::banner_update_overflow("/api/admin/app-banner/banner-200000000", HttpMethod::Put)]
#[case::non_numeric_id("/api/admin/promotions/summer", HttpMethod::Get)]
fn unknown_ids_are_not_found(
    router: MockRouter,
    #[case] url: &str,
    #[case] method: HttpMethod,
) {
    let envelope = router.route(url, method, None);

    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some(NOT_FOUND));
    assert!(envelope.data.is_none());
}

#[rstest]
#[case::first_promotion("/api/admin/promotions/promo-1")]
#[case::last_promotion("/api/admin/promotions/promo-15")]
#[case::last_transaction("/api/admin/transactions/txn-42")]
#[case::last_user("/api/admin/user_profiles/user-25")]
#[case::last_approval("/api/admin/partner_approvals/approval-8")]
#[case::last_conversation("/api/chats/conversations/conv-5")]
#[case::last_conversation_messages("/api/chats/conversations/conv-5/messages")]
#[case::last_banner("/api/admin/app-banner/banner-3")]
fn ids_inside_the_simulated_data_resolve(router: MockRouter, #[case] url: &str) {
    let envelope = router.route(url, HttpMethod::Get, None);

    assert!(envelope.success, "{url}: {envelope:?}");
    assert!(envelope.data.is_some());
}

#[test]
fn time_offsets_report_overflow_instead_of_wrapping() {
    let context = RouteContext {
        method: HttpMethod::Get,
        rest: "",
        page: PageRequest::from_query(None),
        body: None,
        now: fixed_now(),
    };

    assert!(matches!(
        scaled(u64::MAX, 1),
        Err(MockRouteError::OutOfRange { .. })
    ));
    assert!(matches!(
        scaled(u64::try_from(i64::MAX).unwrap_or_default(), 2),
        Err(MockRouteError::OutOfRange { .. })
    ));
    assert!(matches!(
        context.minutes_ago(i64::MAX),
        Err(MockRouteError::OutOfRange { .. })
    ));
    assert!(matches!(
        context.days_ahead(i64::MAX / 2),
        Err(MockRouteError::OutOfRange { .. })
    ));
    assert!(context.minutes_ago(60).is_ok());
}

#[rstest]
fn dashboard_stats_shape(router: MockRouter) {
    let envelope = router.route("/api/admin/dashboard", HttpMethod::Get, None);

    assert_json_snapshot!("dashboard_stats", envelope, {
        ".data.updatedAt" => "[timestamp]",
    });
}

#[rstest]
#[case::unknown_prefix("/api/admin/unknown/thing", HttpMethod::Get)]
#[case::unknown_sub_route("/api/admin/transactions/txn-1/refund", HttpMethod::Post)]
#[case::not_api("/health", HttpMethod::Get)]
fn unmatched_requests_get_an_empty_success(
    router: MockRouter,
    #[case] url: &str,
    #[case] method: HttpMethod,
) {
    let envelope = router.route(url, method, None);

    assert_eq!(envelope, ApiEnvelope::empty_success());
}

#[rstest]
#[case::array_body("/api/chats/conversations/conv-1/messages", json!(["hello"]))]
#[case::blank_content("/api/chats/conversations/conv-1/messages", json!({"content": "  "}))]
#[case::numeric_content("/api/chats/conversations/conv-1/messages", json!({"content": 7}))]
#[case::missing_title("/api/admin/promotions", json!({"code": "X"}))]
#[case::bad_typing_flag("/api/chats/conversations/conv-1/typing", json!({"isTyping": "yes"}))]
fn malformed_bodies_become_mock_api_errors(
    router: MockRouter,
    #[case] url: &str,
    #[case] body: Value,
) {
    let envelope = router.route(url, HttpMethod::Post, Some(&body));

    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some(MOCK_API_ERROR));
    assert!(envelope.message.is_some());
}

#[rstest]
fn unparseable_urls_become_mock_api_errors(router: MockRouter) {
    let envelope = router.route("http://[::1/api/admin/stats", HttpMethod::Get, None);

    assert_eq!(envelope.error.as_deref(), Some(MOCK_API_ERROR));
}

#[rstest]
#[case::admin("/api/admin/login", "admin", false)]
#[case::partner("/api/auth/login", "partner", true)]
fn logins_issue_tokens(
    router: MockRouter,
    #[case] url: &str,
    #[case] role: &str,
    #[case] partner_fields: bool,
) {
    let body = json!({"email": "someone@pawstay.kr", "password": "pw"});

    let envelope = router.route(url, HttpMethod::Post, Some(&body));

    let data = envelope.data.expect("login payload");
    assert_eq!(data["user"]["role"], role);
    assert_eq!(data["user"]["email"], "someone@pawstay.kr");
    assert!(data["accessToken"].is_string());
    assert_eq!(data.get("approvalStatus").is_some(), partner_fields);
}

#[rstest]
fn logins_without_a_password_are_rejected(router: MockRouter) {
    let body = json!({"email": "someone@pawstay.kr"});

    let envelope = router.route("/api/admin/login", HttpMethod::Post, Some(&body));

    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some("Invalid credentials"));
}

#[rstest]
fn created_promotions_decode_as_domain_promotions(router: MockRouter) {
    let body = json!({"title": "Autumn", "code": "FALL20", "discountType": "percentage", "discountValue": 20});

    let envelope = router
        .route("/api/admin/promotions", HttpMethod::Post, Some(&body))
        .decode::<crate::domain::Promotion>();

    let promotion = envelope.data.expect("promotion decodes");
    assert_eq!(promotion.code, "FALL20");
    assert_eq!(promotion.usage_count, 0);
}

#[tokio::test]
async fn respond_waits_for_the_configured_latency() {
    let sleeper = Arc::new(RecordingSleeper::default());
    let router = MockRouter::new(
        Arc::new(FixedClock::default()),
        sleeper.clone(),
        DEFAULT_MOCK_LATENCY,
    );

    let envelope = router
        .respond("/api/admin/stats", HttpMethod::Get, None)
        .await;

    assert!(envelope.success);
    assert_eq!(sleeper.durations(), vec![Duration::from_millis(300)]);
}
