//! Mock response router: the simulated backend.
//!
//! Maps `(url, method, body)` to a canned envelope. Paths are matched by
//! substring against an ordered prefix table, so `/api/admin/promotions/7`
//! and `http://host/v1/api/admin/promotions` both land on the promotions
//! route. Unmatched paths get `{success: true, data: {}}`.
//!
//! The router never panics and never returns `Err` to its caller: internal
//! failures become `{success: false, error: "Mock API Error"}`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use mockable::Clock;
use pagination::PageRequest;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::routes;
use crate::domain::ports::Sleeper;
use crate::domain::{ApiEnvelope, HttpMethod};

/// Artificial delay before every simulated answer.
pub const DEFAULT_MOCK_LATENCY: Duration = Duration::from_millis(300);

/// `error` value of envelopes reporting a router failure.
pub const MOCK_API_ERROR: &str = "Mock API Error";

const RELATIVE_BASE: &str = "http://mock.invalid/";

/// Internal router failures. Reported to callers as envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MockRouteError {
    /// The request URL could not be parsed.
    #[error("cannot parse request url {url:?}: {reason}")]
    InvalidUrl {
        /// URL as received.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// The request body did not have the shape the route needs.
    #[error("invalid request body: {reason}")]
    InvalidBody {
        /// What was wrong.
        reason: String,
    },
    /// A synthetic value could not be represented.
    #[error("{what} out of range: {value}")]
    OutOfRange {
        /// Quantity being computed.
        what: &'static str,
        /// Offending input.
        value: String,
    },
}

impl MockRouteError {
    pub(crate) fn invalid_body(reason: impl Into<String>) -> Self {
        Self::InvalidBody {
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(what: &'static str, value: impl ToString) -> Self {
        Self::OutOfRange {
            what,
            value: value.to_string(),
        }
    }
}

pub(crate) type RouteResult = Result<ApiEnvelope, MockRouteError>;
type Handler = fn(&RouteContext<'_>) -> RouteResult;

const ROUTES: &[(&str, Handler)] = &[
    ("/api/auth/login", routes::auth::partner_login),
    ("/api/admin/login", routes::auth::admin_login),
    ("/api/admin/stats", routes::dashboard::stats),
    ("/api/admin/dashboard", routes::dashboard::stats),
    ("/api/admin/user_profiles", routes::users::user_profiles),
    ("/api/admin/partner_approvals", routes::users::partner_approvals),
    ("/api/chats/conversations", routes::chats::conversations),
    ("/api/admin/app-banner", routes::content::banners),
    ("/api/admin/policy", routes::content::policy),
    ("/api/admin/promotions", routes::promotions::promotions),
    ("/api/admin/transactions", routes::transactions::transactions),
    ("/api/admin/profile", routes::profile::profile),
];

/// Simulated backend.
#[derive(Clone)]
pub struct MockRouter {
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
    latency: Duration,
}

impl MockRouter {
    /// Router stamping data with `clock` and waiting `latency` per answer.
    pub fn new(clock: Arc<dyn Clock>, sleeper: Arc<dyn Sleeper>, latency: Duration) -> Self {
        Self {
            clock,
            sleeper,
            latency,
        }
    }

    /// Answer a request after the configured latency.
    pub async fn respond(&self, url: &str, method: HttpMethod, body: Option<&Value>) -> ApiEnvelope {
        self.sleeper.sleep(self.latency).await;
        self.route(url, method, body)
    }

    /// Answer a request immediately.
    pub fn route(&self, url: &str, method: HttpMethod, body: Option<&Value>) -> ApiEnvelope {
        match self.try_route(url, method, body) {
            Ok(envelope) => envelope,
            Err(error) => {
                warn!(url, %method, error = %error, "mock route failed");
                ApiEnvelope::failure(MOCK_API_ERROR, error.to_string())
            }
        }
    }

    fn try_route(&self, url: &str, method: HttpMethod, body: Option<&Value>) -> RouteResult {
        let parsed = parse_url(url)?;
        let path = parsed.path();
        let page = PageRequest::from_query(parsed.query());
        for (prefix, handler) in ROUTES {
            let Some(start) = path.find(prefix) else {
                continue;
            };
            let rest = path.get(start + prefix.len()..).unwrap_or_default();
            debug!(prefix, rest, %method, "mock route matched");
            let context = RouteContext {
                method,
                rest,
                page,
                body,
                now: self.clock.utc(),
            };
            return handler(&context);
        }
        debug!(path, %method, "no mock route; answering with empty success");
        Ok(ApiEnvelope::empty_success())
    }
}

fn parse_url(url: &str) -> Result<Url, MockRouteError> {
    let invalid = |error: url::ParseError| MockRouteError::InvalidUrl {
        url: url.to_owned(),
        reason: error.to_string(),
    };
    match Url::parse(url) {
        Ok(parsed) => Ok(parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(url))
            .map_err(invalid),
        Err(error) => Err(invalid(error)),
    }
}

/// What a route handler sees of a request.
pub(crate) struct RouteContext<'a> {
    /// Request method.
    pub method: HttpMethod,
    /// Path remainder after the matched prefix, e.g. `/conv-1/messages`.
    pub rest: &'a str,
    /// Paging parsed from the query string.
    pub page: PageRequest,
    /// Decoded request body.
    pub body: Option<&'a Value>,
    /// Current time from the injected clock.
    pub now: DateTime<Utc>,
}

impl RouteContext<'_> {
    /// Non-empty segments of [`RouteContext::rest`].
    pub fn segments(&self) -> Vec<&str> {
        self.rest.split('/').filter(|part| !part.is_empty()).collect()
    }

    /// Body as a JSON object; an absent body is an empty object.
    pub fn body_object(&self) -> Result<Map<String, Value>, MockRouteError> {
        match self.body {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(other) => Err(MockRouteError::invalid_body(format!(
                "expected a JSON object, got {}",
                kind_of(other)
            ))),
        }
    }

    /// Optional string field of the body.
    pub fn optional_str(&self, field: &str) -> Result<Option<String>, MockRouteError> {
        match self.body_object()?.remove(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(other) => Err(MockRouteError::invalid_body(format!(
                "field {field} must be a string, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Required, non-blank string field of the body.
    pub fn required_str(&self, field: &str) -> Result<String, MockRouteError> {
        self.optional_str(field)?
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| MockRouteError::invalid_body(format!("field {field} is required")))
    }

    /// One page of a synthetic list of `total` items built by `item`.
    ///
    /// `item` receives the one-based item number.
    pub fn paginated(
        &self,
        total: u64,
        item: impl Fn(u64) -> Result<Value, MockRouteError>,
    ) -> RouteResult {
        let items = self
            .page
            .window(total)
            .map(|index| item(index + 1))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ApiEnvelope::ok_page(
            Value::Array(items),
            self.page.paginate(total),
        ))
    }

    /// RFC 3339 timestamp `minutes` before now.
    pub fn minutes_ago(&self, minutes: i64) -> Result<String, MockRouteError> {
        TimeDelta::try_minutes(minutes)
            .and_then(|delta| self.now.checked_sub_signed(delta))
            .map(timestamp)
            .ok_or_else(|| MockRouteError::out_of_range("minutes ago", minutes))
    }

    /// RFC 3339 timestamp `days` after now.
    pub fn days_ahead(&self, days: i64) -> Result<String, MockRouteError> {
        TimeDelta::try_days(days)
            .and_then(|delta| self.now.checked_add_signed(delta))
            .map(timestamp)
            .ok_or_else(|| MockRouteError::out_of_range("days ahead", days))
    }

    /// RFC 3339 timestamp for now.
    pub fn now_stamp(&self) -> String {
        timestamp(self.now)
    }
}

/// `n * per_item` as a signed offset for [`RouteContext::minutes_ago`] and
/// friends.
pub(crate) fn scaled(n: u64, per_item: i64) -> Result<i64, MockRouteError> {
    i64::try_from(n)
        .ok()
        .and_then(|n| n.checked_mul(per_item))
        .ok_or_else(|| MockRouteError::out_of_range("time offset", n))
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Overlay the fields of `patch` onto `base`.
pub(crate) fn merge(mut base: Value, patch: Map<String, Value>) -> Value {
    if let Value::Object(target) = &mut base {
        target.extend(patch);
    }
    base
}

#[cfg(test)]
mod tests;
