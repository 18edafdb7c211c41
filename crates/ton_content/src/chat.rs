//! Chat sessions for the Ask Diano assistant.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The site visitor
    User,
    /// The assistant
    Model,
}

/// A cited source for an assistant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Slug of the cited post
    pub slug: String,
    /// Title of the cited post
    pub title: String,
}

/// One turn in a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author
    pub role: ChatRole,
    /// Message text
    pub content: String,
    /// Posts cited by an assistant turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
}

/// A conversation between one authenticated user and the assistant.
///
/// Messages are strictly append-only and ordered by insertion. Sessions are
/// never deleted; the most recent session by creation time is the user's
/// active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Document id
    pub id: Uuid,
    /// Identity-provider user id
    pub user_id: String,
    /// Ordered message history
    pub messages: Vec<ChatMessage>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last append timestamp
    pub updated_at: NaiveDateTime,
}
