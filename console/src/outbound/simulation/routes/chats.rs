//! `/api/chats/conversations` and its `messages`, `mark-read` and `typing`
//! sub-routes.

use serde_json::{Value, json};

use super::{
    ADMIN_ID, ADMIN_NAME, CONVERSATION_COUNT, MESSAGES_PER_CONVERSATION, item_number, not_found,
};
use crate::domain::{ApiEnvelope, HttpMethod};
use crate::outbound::simulation::router::{MockRouteError, RouteContext, RouteResult, scaled};

fn participant(n: u64) -> Value {
    if n % 2 == 0 {
        json!({"id": format!("customer-{n}"), "name": format!("보호자 {n}"), "role": "customer"})
    } else {
        json!({"id": format!("partner-{n}"), "name": format!("파트너 {n}"), "role": "partner"})
    }
}

fn admin() -> Value {
    json!({"id": ADMIN_ID, "name": ADMIN_NAME, "role": "admin"})
}

fn unread(n: u64) -> u64 {
    n % 3
}

fn conversation(ctx: &RouteContext<'_>, n: u64) -> Result<Value, MockRouteError> {
    Ok(json!({
        "id": format!("conv-{n}"),
        "participant": participant(n),
        "lastMessage": format!("메시지 {MESSAGES_PER_CONVERSATION}"),
        "lastMessageAt": ctx.minutes_ago(scaled(n, 15)?)?,
        "unreadCount": unread(n)
    }))
}

fn message(
    ctx: &RouteContext<'_>,
    conversation_id: &str,
    owner: u64,
    n: u64,
) -> Result<Value, MockRouteError> {
    let sender = if n % 2 == 0 { admin() } else { participant(owner) };
    let age = MESSAGES_PER_CONVERSATION.saturating_sub(n);
    Ok(json!({
        "id": format!("msg-{conversation_id}-{n}"),
        "conversationId": conversation_id,
        "content": format!("메시지 {n}"),
        "sender": sender,
        "createdAt": ctx.minutes_ago(scaled(age, 1)?)?,
        "read": age >= unread(owner)
    }))
}

pub(crate) fn conversations(ctx: &RouteContext<'_>) -> RouteResult {
    let segments = ctx.segments();
    let envelope = match (ctx.method, segments.as_slice()) {
        (HttpMethod::Get, []) => ctx.paginated(CONVERSATION_COUNT, |n| conversation(ctx, n))?,
        (HttpMethod::Get, [id]) => match item_number(id, CONVERSATION_COUNT) {
            Some(n) => ApiEnvelope::ok(conversation(ctx, n)?),
            None => not_found("conversation", id),
        },
        (HttpMethod::Get, [id, "messages"]) => match item_number(id, CONVERSATION_COUNT) {
            Some(owner) => {
                ctx.paginated(MESSAGES_PER_CONVERSATION, |n| message(ctx, id, owner, n))?
            }
            None => not_found("conversation", id),
        },
        (HttpMethod::Post, [id, "messages"]) => send_message(ctx, id)?,
        (HttpMethod::Post | HttpMethod::Patch | HttpMethod::Put, [id, "mark-read"]) => {
            match item_number(id, CONVERSATION_COUNT) {
                Some(n) => ApiEnvelope::ok(json!({
                    "conversationId": id,
                    "marked": unread(n),
                    "readAt": ctx.now_stamp()
                })),
                None => not_found("conversation", id),
            }
        }
        (HttpMethod::Post, [id, "typing"]) => {
            let typing = match ctx.body_object()?.get("isTyping") {
                None => true,
                Some(Value::Bool(flag)) => *flag,
                Some(_) => return Err(MockRouteError::invalid_body("isTyping must be a boolean")),
            };
            ApiEnvelope::ok(json!({"conversationId": id, "isTyping": typing}))
        }
        _ => ApiEnvelope::empty_success(),
    };
    Ok(envelope)
}

fn send_message(ctx: &RouteContext<'_>, conversation_id: &str) -> RouteResult {
    let content = ctx.required_str("content")?;
    Ok(ApiEnvelope::ok(json!({
        "id": format!("msg-{conversation_id}-{}", MESSAGES_PER_CONVERSATION + 1),
        "conversationId": conversation_id,
        "content": content,
        "sender": admin(),
        "createdAt": ctx.now_stamp(),
        "read": false
    })))
}
