//! `/api/admin/transactions`.

use serde_json::{Value, json};

use super::{TRANSACTION_COUNT, item_number, not_found};
use crate::domain::{ApiEnvelope, HttpMethod};
use crate::outbound::simulation::router::{
    MockRouteError, RouteContext, RouteResult, scaled,
};

const STATES: [&str; 3] = ["completed", "pending", "refunded"];
const FEE_PERCENT: u64 = 10;

fn transaction(ctx: &RouteContext<'_>, n: u64) -> Result<Value, MockRouteError> {
    let amount = n
        .checked_mul(7_500)
        .and_then(|step| step.checked_add(50_000))
        .ok_or_else(|| MockRouteError::out_of_range("transaction amount", n))?;
    let state = STATES
        .get(usize::try_from(n % 3).unwrap_or_default())
        .copied()
        .unwrap_or("completed");
    Ok(json!({
        "id": format!("txn-{n}"),
        "bookingId": format!("booking-{n}"),
        "partnerName": format!("파트너 {}", n % 8 + 1),
        "customerName": format!("보호자 {n}"),
        "amount": amount,
        "fee": amount / 100 * FEE_PERCENT,
        "status": state,
        "paidAt": ctx.minutes_ago(scaled(n, 360)?)?
    }))
}

pub(crate) fn transactions(ctx: &RouteContext<'_>) -> RouteResult {
    let segments = ctx.segments();
    match (ctx.method, segments.as_slice()) {
        (HttpMethod::Get, []) => ctx.paginated(TRANSACTION_COUNT, |n| transaction(ctx, n)),
        (HttpMethod::Get, [id]) => match item_number(id, TRANSACTION_COUNT) {
            Some(n) => Ok(ApiEnvelope::ok(transaction(ctx, n)?)),
            None => Ok(not_found("transaction", id)),
        },
        _ => Ok(ApiEnvelope::empty_success()),
    }
}
