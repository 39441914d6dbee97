//! `/api/admin/promotions`.

use serde_json::{Value, json};

use super::{PROMOTION_COUNT, item_number, not_found};
use crate::domain::{ApiEnvelope, HttpMethod};
use crate::outbound::simulation::router::{
    MockRouteError, RouteContext, RouteResult, merge, scaled,
};

const PROMOTION_DAYS: i64 = 30;

fn promotion(ctx: &RouteContext<'_>, n: u64) -> Result<Value, MockRouteError> {
    let (discount_type, discount_value) = if n % 2 == 1 {
        ("percentage", json!((n % 4 + 1) * 5))
    } else {
        let amount = n
            .checked_mul(1_000)
            .ok_or_else(|| MockRouteError::out_of_range("discount value", n))?;
        ("fixed", json!(amount))
    };
    let started = scaled(n, 1440)?;
    let remaining = PROMOTION_DAYS
        .checked_sub(scaled(n, 1)?)
        .ok_or_else(|| MockRouteError::out_of_range("promotion end", n))?;
    Ok(json!({
        "id": format!("promo-{n}"),
        "title": format!("프로모션 {n}"),
        "code": format!("PAWS{n:02}"),
        "discountType": discount_type,
        "discountValue": discount_value,
        "startsAt": ctx.minutes_ago(started)?,
        "endsAt": ctx.days_ahead(remaining)?,
        "active": n % 5 != 0,
        "usageCount": n.saturating_mul(3)
    }))
}

pub(crate) fn promotions(ctx: &RouteContext<'_>) -> RouteResult {
    let segments = ctx.segments();
    match (ctx.method, segments.as_slice()) {
        (HttpMethod::Get, []) => ctx.paginated(PROMOTION_COUNT, |n| promotion(ctx, n)),
        (HttpMethod::Get, [id]) => match item_number(id, PROMOTION_COUNT) {
            Some(n) => Ok(ApiEnvelope::ok(promotion(ctx, n)?)),
            None => Ok(not_found("promotion", id)),
        },
        (HttpMethod::Post, []) => {
            ctx.required_str("title")?;
            ctx.required_str("code")?;
            let mut created = merge(promotion(ctx, PROMOTION_COUNT + 1)?, ctx.body_object()?);
            created["usageCount"] = json!(0);
            Ok(ApiEnvelope::ok(created))
        }
        (HttpMethod::Put | HttpMethod::Patch, [id]) => {
            let Some(n) = item_number(id, PROMOTION_COUNT) else {
                return Ok(not_found("promotion", id));
            };
            let mut updated = merge(promotion(ctx, n)?, ctx.body_object()?);
            updated["id"] = json!(id);
            Ok(ApiEnvelope::ok(updated))
        }
        (HttpMethod::Delete, [id]) => Ok(ApiEnvelope::ok(json!({"id": id, "deleted": true}))),
        _ => Ok(ApiEnvelope::empty_success()),
    }
}
