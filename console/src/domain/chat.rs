//! Chat console: conversations between operators, partners and guests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::api_client::ApiClient;
use super::envelope::ApiEnvelope;
use super::request::path_segment;

const CONVERSATIONS: &str = "/api/chats/conversations";

/// Who a chat participant is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    /// Marketplace operator.
    Admin,
    /// Accommodation owner.
    Partner,
    /// Guest booking a stay.
    Customer,
}

/// One side of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatParticipant {
    /// Participant identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role in the marketplace.
    pub role: ParticipantRole,
}

/// Conversation summary shown in the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Conversation identifier.
    pub id: String,
    /// The other party.
    pub participant: ChatParticipant,
    /// Preview of the newest message.
    #[serde(default)]
    pub last_message: Option<String>,
    /// When the newest message was sent.
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
    /// Messages not yet read by the operator.
    #[serde(default)]
    pub unread_count: u32,
}

/// A single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Message identifier.
    pub id: String,
    /// Owning conversation.
    pub conversation_id: String,
    /// Message text.
    pub content: String,
    /// Author.
    pub sender: ChatParticipant,
    /// Send time.
    pub created_at: DateTime<Utc>,
    /// Whether the recipient has read it.
    #[serde(default)]
    pub read: bool,
}

/// Acknowledgement for a mark-as-read call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    /// Conversation marked as read.
    pub conversation_id: String,
    /// Number of messages newly marked.
    #[serde(default)]
    pub marked: u32,
    /// When the conversation was marked.
    pub read_at: DateTime<Utc>,
}

/// Chat operations.
#[derive(Clone)]
pub struct ChatService {
    client: Arc<ApiClient>,
}

impl ChatService {
    /// Service sending through `client`.
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// One page of conversations.
    pub async fn fetch_conversations(&self, page: PageRequest) -> ApiEnvelope<Vec<Conversation>> {
        let path = format!(
            "{CONVERSATIONS}?page={}&limit={}",
            page.page(),
            page.limit()
        );
        self.client.get(&path).await.decode()
    }

    /// One page of messages in a conversation.
    pub async fn fetch_messages(
        &self,
        conversation_id: &str,
        page: PageRequest,
    ) -> ApiEnvelope<Vec<ChatMessage>> {
        let Some(id) = path_segment(conversation_id) else {
            return invalid_conversation(conversation_id);
        };
        let path = format!(
            "{CONVERSATIONS}/{id}/messages?page={}&limit={}",
            page.page(),
            page.limit()
        );
        self.client.get(&path).await.decode()
    }

    /// Post a message; blank content is rejected without a request.
    pub async fn send_message(
        &self,
        conversation_id: &str,
        content: &str,
    ) -> ApiEnvelope<ChatMessage> {
        let Some(id) = path_segment(conversation_id) else {
            return invalid_conversation(conversation_id);
        };
        let content = content.trim();
        if content.is_empty() {
            return ApiEnvelope::validation_failure("message content must not be empty");
        }
        let path = format!("{CONVERSATIONS}/{id}/messages");
        self.client
            .post(&path, json!({ "content": content }))
            .await
            .decode()
    }

    /// Tell the other party the operator is typing.
    pub async fn send_typing_indicator(
        &self,
        conversation_id: &str,
        typing: bool,
    ) -> ApiEnvelope<Value> {
        let Some(id) = path_segment(conversation_id) else {
            return invalid_conversation(conversation_id);
        };
        let path = format!("{CONVERSATIONS}/{id}/typing");
        self.client.post(&path, json!({ "isTyping": typing })).await
    }

    /// Mark every message in a conversation as read.
    pub async fn mark_as_read(&self, conversation_id: &str) -> ApiEnvelope<ReadReceipt> {
        let Some(id) = path_segment(conversation_id) else {
            return invalid_conversation(conversation_id);
        };
        let path = format!("{CONVERSATIONS}/{id}/mark-read");
        self.client.post(&path, json!({})).await.decode()
    }
}

fn invalid_conversation<T>(id: &str) -> ApiEnvelope<T> {
    ApiEnvelope::validation_failure(format!("invalid conversation id: {id:?}"))
}
