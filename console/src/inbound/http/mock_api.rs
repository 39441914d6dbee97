//! Serves every `/api/*` route from the [`MockRouter`].
//!
//! ```text
//! ANY /api/{tail:.*}
//! ```
//!
//! Lets the portals run against the simulated backend over real HTTP. Status
//! codes follow the interception shim: 200 for success envelopes, 400 for
//! failures.

use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::domain::{ApiEnvelope, HttpMethod};
use crate::outbound::simulation::{MOCK_API_ERROR, MULTIPART_PLACEHOLDER, MockRouter};

/// Shared state for the mock API handler.
#[derive(Clone)]
pub struct MockApiState {
    router: MockRouter,
}

impl MockApiState {
    /// State answering from `router`.
    pub fn new(router: MockRouter) -> Self {
        Self { router }
    }
}

/// Mount the catch-all `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").default_service(web::to(mock_api_handler)));
}

async fn mock_api_handler(
    request: HttpRequest,
    body: web::Bytes,
    state: web::Data<MockApiState>,
) -> HttpResponse {
    let Some(method) = HttpMethod::parse(request.method().as_str()) else {
        debug!(method = %request.method(), "unsupported method");
        return respond(
            StatusCode::METHOD_NOT_ALLOWED,
            &ApiEnvelope::failure("Method Not Allowed", request.method().as_str()),
        );
    };
    let payload = match decode_body(&request, &body) {
        Ok(payload) => payload,
        Err(message) => {
            warn!(path = request.path(), %message, "rejecting mock request body");
            return respond(
                StatusCode::BAD_REQUEST,
                &ApiEnvelope::failure(MOCK_API_ERROR, message),
            );
        }
    };
    let target = request.uri().to_string();
    let envelope = state.router.respond(&target, method, payload.as_ref()).await;
    let status = if envelope.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    respond(status, &envelope)
}

fn decode_body(request: &HttpRequest, body: &[u8]) -> Result<Option<Value>, String> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/"));
    if is_multipart {
        return Ok(Some(json!({"_placeholder": MULTIPART_PLACEHOLDER, "fields": []})));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|error| format!("request body is not JSON: {error}"))
}

fn respond(status: StatusCode, envelope: &ApiEnvelope) -> HttpResponse {
    HttpResponse::build(status).json(envelope)
}
