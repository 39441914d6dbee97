//! `/api/admin/stats` and `/api/admin/dashboard`.

use serde_json::json;

use super::users::pending_approvals;
use super::{CONVERSATION_COUNT, PARTNER_APPROVAL_COUNT, USER_PROFILE_COUNT};
use crate::domain::ApiEnvelope;
use crate::outbound::simulation::router::{RouteContext, RouteResult};

pub(crate) fn stats(ctx: &RouteContext<'_>) -> RouteResult {
    Ok(ApiEnvelope::ok(json!({
        "activeConversations": CONVERSATION_COUNT,
        "bookingsThisMonth": 128,
        "monthlyRevenue": 12_450_000,
        "pendingApprovals": pending_approvals(),
        "totalPartners": PARTNER_APPROVAL_COUNT,
        "totalUsers": USER_PROFILE_COUNT,
        "updatedAt": ctx.now_stamp()
    })))
}
