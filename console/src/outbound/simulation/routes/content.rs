//! `/api/admin/app-banner` and `/api/admin/policy`.

use serde_json::{Value, json};

use super::{BANNER_COUNT, item_number, not_found};
use crate::domain::{ApiEnvelope, HttpMethod};
use crate::outbound::simulation::router::{
    MockRouteError, RouteContext, RouteResult, merge, scaled,
};

fn banner(ctx: &RouteContext<'_>, n: u64) -> Result<Value, MockRouteError> {
    Ok(json!({
        "id": format!("banner-{n}"),
        "title": format!("봄맞이 반려견 여행 {n}"),
        "imageUrl": format!("/mock/banners/banner-{n}.png"),
        "linkUrl": format!("/events/{n}"),
        "displayOrder": n,
        "active": n != BANNER_COUNT,
        "updatedAt": ctx.minutes_ago(scaled(n, 60)?)?
    }))
}

pub(crate) fn banners(ctx: &RouteContext<'_>) -> RouteResult {
    let segments = ctx.segments();
    let envelope = match (ctx.method, segments.as_slice()) {
        (HttpMethod::Get, []) => ctx.paginated(BANNER_COUNT, |n| banner(ctx, n))?,
        (HttpMethod::Get, [id]) => match item_number(id, BANNER_COUNT) {
            Some(n) => ApiEnvelope::ok(banner(ctx, n)?),
            None => not_found("banner", id),
        },
        (HttpMethod::Post, []) => {
            ctx.required_str("title")?;
            ApiEnvelope::ok(merge(banner(ctx, BANNER_COUNT + 1)?, ctx.body_object()?))
        }
        (HttpMethod::Put | HttpMethod::Patch, [id]) => match item_number(id, BANNER_COUNT) {
            Some(n) => ApiEnvelope::ok(merge(banner(ctx, n)?, ctx.body_object()?)),
            None => not_found("banner", id),
        },
        (HttpMethod::Delete, [id]) => ApiEnvelope::ok(json!({"id": id, "deleted": true})),
        _ => ApiEnvelope::empty_success(),
    };
    Ok(envelope)
}

fn policy_document(
    ctx: &RouteContext<'_>,
    kind: &str,
    version: &str,
) -> Result<Value, MockRouteError> {
    Ok(json!({
        "kind": kind,
        "version": version,
        "content": format!("{kind} policy text, version {version}"),
        "updatedAt": ctx.minutes_ago(60 * 24 * 30)?
    }))
}

pub(crate) fn policy(ctx: &RouteContext<'_>) -> RouteResult {
    let segments = ctx.segments();
    let envelope = match (ctx.method, segments.as_slice()) {
        (HttpMethod::Get, []) => ApiEnvelope::ok(json!({
            "terms": policy_document(ctx, "terms", "3.1")?,
            "privacy": policy_document(ctx, "privacy", "2.4")?,
            "refund": policy_document(ctx, "refund", "1.2")?
        })),
        (HttpMethod::Get, [kind]) => ApiEnvelope::ok(policy_document(ctx, kind, "1.0")?),
        (HttpMethod::Put | HttpMethod::Patch | HttpMethod::Post, [kind]) => {
            let base = policy_document(ctx, kind, "1.0")?;
            let updated = merge(base, ctx.body_object()?);
            ApiEnvelope::ok(merge(
                updated,
                json_object(&[("updatedAt", json!(ctx.now_stamp()))]),
            ))
        }
        _ => ApiEnvelope::empty_success(),
    };
    Ok(envelope)
}

fn json_object(fields: &[(&str, Value)]) -> serde_json::Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| ((*key).to_owned(), value.clone()))
        .collect()
}
