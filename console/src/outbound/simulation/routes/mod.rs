//! Route handlers for the simulated backend, one module per API area.

use crate::domain::ApiEnvelope;

pub(crate) mod auth;
pub(crate) mod chats;
pub(crate) mod content;
pub(crate) mod dashboard;
pub(crate) mod promotions;
pub(crate) mod profile;
pub(crate) mod transactions;
pub(crate) mod users;

/// Operator every simulated admin session belongs to.
pub(crate) const ADMIN_ID: &str = "admin-1";
pub(crate) const ADMIN_NAME: &str = "관리자";
pub(crate) const ADMIN_EMAIL: &str = "admin@pawstay.kr";

pub(crate) const PROMOTION_COUNT: u64 = 15;
pub(crate) const USER_PROFILE_COUNT: u64 = 25;
pub(crate) const PARTNER_APPROVAL_COUNT: u64 = 8;
pub(crate) const CONVERSATION_COUNT: u64 = 5;
pub(crate) const MESSAGES_PER_CONVERSATION: u64 = 20;
pub(crate) const BANNER_COUNT: u64 = 3;
pub(crate) const TRANSACTION_COUNT: u64 = 42;

/// `error` value of envelopes for ids outside the simulated data.
pub(crate) const NOT_FOUND: &str = "Not Found";

/// Item number of an identifier such as `promo-7`, when it names one of the
/// `count` simulated items.
pub(crate) fn item_number(id: &str, count: u64) -> Option<u64> {
    let n = id.rsplit('-').next()?.parse::<u64>().ok()?;
    (1..=count).contains(&n).then_some(n)
}

/// Failure envelope for an id with no simulated item.
pub(crate) fn not_found(kind: &str, id: &str) -> ApiEnvelope {
    ApiEnvelope::failure(NOT_FOUND, format!("{kind} {id} does not exist"))
}
