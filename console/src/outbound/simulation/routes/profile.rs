//! `/api/admin/profile` and its `avatar` sub-route.

use serde_json::{Value, json};

use super::{ADMIN_EMAIL, ADMIN_ID, ADMIN_NAME};
use crate::domain::{ApiEnvelope, HttpMethod};
use crate::outbound::simulation::router::{MockRouteError, RouteContext, RouteResult, merge};

fn profile_of(ctx: &RouteContext<'_>) -> Result<Value, MockRouteError> {
    Ok(json!({
        "id": ADMIN_ID,
        "email": ADMIN_EMAIL,
        "name": ADMIN_NAME,
        "phone": "010-0000-0000",
        "avatarUrl": null,
        "role": "admin",
        "updatedAt": ctx.minutes_ago(60 * 24)?
    }))
}

pub(crate) fn profile(ctx: &RouteContext<'_>) -> RouteResult {
    let segments = ctx.segments();
    let envelope = match (ctx.method, segments.as_slice()) {
        (HttpMethod::Get, []) => ApiEnvelope::ok(profile_of(ctx)?),
        (HttpMethod::Put | HttpMethod::Patch, []) => {
            let mut changes = ctx.body_object()?;
            changes.retain(|key, _| key == "name" || key == "phone");
            let mut updated = merge(profile_of(ctx)?, changes);
            updated["updatedAt"] = json!(ctx.now_stamp());
            ApiEnvelope::ok(updated)
        }
        (HttpMethod::Post | HttpMethod::Put, ["avatar"]) => {
            let mut updated = profile_of(ctx)?;
            updated["avatarUrl"] = json!(format!("/mock/avatars/{ADMIN_ID}.png"));
            updated["updatedAt"] = json!(ctx.now_stamp());
            ApiEnvelope::ok(updated)
        }
        _ => ApiEnvelope::empty_success(),
    };
    Ok(envelope)
}
