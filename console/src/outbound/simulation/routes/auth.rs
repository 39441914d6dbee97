//! `/api/admin/login` and `/api/auth/login`.

use serde_json::json;

use super::{ADMIN_ID, ADMIN_NAME};
use crate::domain::{ApiEnvelope, HttpMethod};
use crate::outbound::simulation::router::{MockRouteError, RouteContext, RouteResult};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub(crate) fn admin_login(ctx: &RouteContext<'_>) -> RouteResult {
    if ctx.method != HttpMethod::Post {
        return Ok(ApiEnvelope::empty_success());
    }
    let Some(email) = credentials(ctx)? else {
        return Ok(rejected());
    };
    Ok(ApiEnvelope::ok(json!({
        "accessToken": "mock-admin-access-token",
        "refreshToken": "mock-admin-refresh-token",
        "user": {"id": ADMIN_ID, "email": email, "name": ADMIN_NAME, "role": "admin"}
    })))
}

pub(crate) fn partner_login(ctx: &RouteContext<'_>) -> RouteResult {
    if ctx.method != HttpMethod::Post {
        return Ok(ApiEnvelope::empty_success());
    }
    let Some(email) = credentials(ctx)? else {
        return Ok(rejected());
    };
    Ok(ApiEnvelope::ok(json!({
        "accessToken": "mock-partner-access-token",
        "refreshToken": "mock-partner-refresh-token",
        "user": {"id": "partner-1", "email": email, "name": "김파트너", "role": "partner"},
        "approvalStatus": "approved",
        "accommodationName": "포근한 펫 스테이"
    })))
}

/// Email when both credentials are present and non-blank.
fn credentials(ctx: &RouteContext<'_>) -> Result<Option<String>, MockRouteError> {
    let email = ctx.optional_str("email")?.filter(|email| !email.trim().is_empty());
    let password = ctx.optional_str("password")?.filter(|password| !password.is_empty());
    Ok(email.zip(password).map(|(email, _)| email))
}

fn rejected() -> ApiEnvelope {
    ApiEnvelope::failure(
        INVALID_CREDENTIALS,
        "이메일 또는 비밀번호가 올바르지 않습니다. (Incorrect email or password.)",
    )
}
