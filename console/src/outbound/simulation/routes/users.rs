//! `/api/admin/user_profiles` and `/api/admin/partner_approvals`.

use serde_json::{Value, json};

use super::{PARTNER_APPROVAL_COUNT, USER_PROFILE_COUNT, item_number, not_found};
use crate::domain::{ApiEnvelope, HttpMethod};
use crate::outbound::simulation::router::{
    MockRouteError, RouteContext, RouteResult, merge, scaled,
};

const APPROVAL_STATES: [&str; 3] = ["rejected", "pending", "approved"];

fn user_profile(ctx: &RouteContext<'_>, n: u64) -> Result<Value, MockRouteError> {
    let created = ctx.minutes_ago(scaled(n, 1440)?)?;
    Ok(json!({
        "id": format!("user-{n}"),
        "email": format!("user{n}@example.com"),
        "name": format!("사용자 {n}"),
        "phone": format!("010-1000-{:04}", n),
        "role": if n % 5 == 0 { "partner" } else { "customer" },
        "petCount": n % 3 + 1,
        "status": if n % 7 == 0 { "suspended" } else { "active" },
        "createdAt": created
    }))
}

pub(crate) fn user_profiles(ctx: &RouteContext<'_>) -> RouteResult {
    let segments = ctx.segments();
    match (ctx.method, segments.as_slice()) {
        (HttpMethod::Get, []) => ctx.paginated(USER_PROFILE_COUNT, |n| user_profile(ctx, n)),
        (HttpMethod::Get, [id]) => match item_number(id, USER_PROFILE_COUNT) {
            Some(n) => Ok(ApiEnvelope::ok(user_profile(ctx, n)?)),
            None => Ok(not_found("user", id)),
        },
        (HttpMethod::Put | HttpMethod::Patch, [id]) => {
            let Some(n) = item_number(id, USER_PROFILE_COUNT) else {
                return Ok(not_found("user", id));
            };
            Ok(ApiEnvelope::ok(merge(user_profile(ctx, n)?, ctx.body_object()?)))
        }
        (HttpMethod::Delete, [id]) => Ok(ApiEnvelope::ok(json!({"id": id, "deleted": true}))),
        _ => Ok(ApiEnvelope::empty_success()),
    }
}

fn approval_state(n: u64) -> &'static str {
    APPROVAL_STATES
        .get(usize::try_from(n % 3).unwrap_or_default())
        .copied()
        .unwrap_or("pending")
}

/// Number of simulated approvals still waiting for review.
pub(crate) fn pending_approvals() -> usize {
    (1..=PARTNER_APPROVAL_COUNT)
        .filter(|n| approval_state(*n) == "pending")
        .count()
}

fn approval(ctx: &RouteContext<'_>, n: u64) -> Result<Value, MockRouteError> {
    let submitted = ctx.minutes_ago(scaled(n, 180)?)?;
    Ok(json!({
        "id": format!("approval-{n}"),
        "partnerName": format!("파트너 {n}"),
        "accommodationName": format!("펫 스테이 {n}호점"),
        "status": approval_state(n),
        "documentCount": 7,
        "submittedAt": submitted
    }))
}

pub(crate) fn partner_approvals(ctx: &RouteContext<'_>) -> RouteResult {
    let segments = ctx.segments();
    let envelope = match (ctx.method, segments.as_slice()) {
        (HttpMethod::Get, []) => ctx.paginated(PARTNER_APPROVAL_COUNT, |n| approval(ctx, n))?,
        (HttpMethod::Get, [id]) => match item_number(id, PARTNER_APPROVAL_COUNT) {
            Some(n) => ApiEnvelope::ok(approval(ctx, n)?),
            None => not_found("partner approval", id),
        },
        (HttpMethod::Post | HttpMethod::Patch, [id, "approve"]) => ApiEnvelope::ok(json!({
            "id": id,
            "status": "approved",
            "reviewedAt": ctx.now_stamp()
        })),
        (HttpMethod::Post | HttpMethod::Patch, [id, "reject"]) => {
            let reason = ctx.required_str("reason")?;
            ApiEnvelope::ok(json!({
                "id": id,
                "status": "rejected",
                "reason": reason,
                "reviewedAt": ctx.now_stamp()
            }))
        }
        _ => ApiEnvelope::empty_success(),
    };
    Ok(envelope)
}
