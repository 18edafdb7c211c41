//! Store traits for each persisted entity.
//!
//! Read paths never surface transport failures to the UI: implementations
//! degrade to fixture data when the backing store is unreachable or
//! quota-exhausted. Write paths propagate errors.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use ton_content::{
    Advertisement, ChatMessage, ChatSession, ElectionCountdown, Magazine, PartialAiFlags, Post,
    VideoEmbed,
};
use ton_error::TonResult;
use uuid::Uuid;

/// Composable filter options for listing posts.
///
/// `search` is applied as a case-insensitive substring scan over title and
/// flattened body text AFTER the primary query runs, so it only sees
/// whatever the primary query (and its `limit`) already fetched. That
/// ceiling is intentional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    /// Only posts with status `published`
    pub published_only: bool,
    /// Exact tag match
    pub tag: Option<String>,
    /// Creation-date lower bound
    pub created_after: Option<NaiveDateTime>,
    /// Restrict to this id set
    pub ids: Option<Vec<Uuid>>,
    /// Case-insensitive substring search (post-query, in-memory)
    pub search: Option<String>,
    /// Maximum rows fetched by the primary query
    pub limit: Option<i64>,
}

impl PostFilter {
    /// Filter for the public site: published posts only.
    pub fn published() -> Self {
        Self {
            published_only: true,
            ..Default::default()
        }
    }
}

/// CRUD surface for posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// List posts newest-first under the given filter.
    async fn list(&self, filter: &PostFilter) -> Vec<Post>;

    /// Fetch one post by id.
    async fn get_by_id(&self, id: Uuid) -> TonResult<Option<Post>>;

    /// Fetch one post by slug.
    async fn get_by_slug(&self, slug: &str) -> TonResult<Option<Post>>;

    /// Whether `slug` is already taken by a post other than `exclude_id`.
    async fn slug_in_use(&self, slug: &str, exclude_id: Option<Uuid>) -> TonResult<bool>;

    /// Persist a new post.
    async fn create(&self, post: &Post) -> TonResult<()>;

    /// Overwrite an existing post (last write wins).
    async fn update(&self, post: &Post) -> TonResult<()>;

    /// Delete a post.
    async fn delete(&self, id: Uuid) -> TonResult<()>;
}

/// CRUD surface for advertisements.
#[async_trait]
pub trait AdStore: Send + Sync {
    /// List all advertisements newest-first.
    async fn list(&self) -> Vec<Advertisement>;

    /// Persist a new advertisement.
    async fn create(&self, ad: &Advertisement) -> TonResult<()>;

    /// Overwrite an existing advertisement.
    async fn update(&self, ad: &Advertisement) -> TonResult<()>;

    /// Delete an advertisement.
    async fn delete(&self, id: Uuid) -> TonResult<()>;
}

/// CRUD surface for video embeds.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// List all video embeds newest-first.
    async fn list(&self) -> Vec<VideoEmbed>;

    /// Persist a new video embed.
    async fn create(&self, video: &VideoEmbed) -> TonResult<()>;

    /// Delete a video embed.
    async fn delete(&self, id: Uuid) -> TonResult<()>;
}

/// Surface for magazines (immutable once created).
#[async_trait]
pub trait MagazineStore: Send + Sync {
    /// List all magazines newest-first.
    async fn list(&self) -> Vec<Magazine>;

    /// Persist a new magazine record.
    async fn create(&self, magazine: &Magazine) -> TonResult<()>;
}

/// Surface for chat sessions (append-only).
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// The user's most recent session by creation time, if any.
    async fn latest_for_user(&self, user_id: &str) -> TonResult<Option<ChatSession>>;

    /// Persist a new session.
    async fn create(&self, session: &ChatSession) -> TonResult<()>;

    /// Append messages to an existing session.
    async fn append(&self, session_id: Uuid, messages: &[ChatMessage]) -> TonResult<()>;
}

/// Surface for the singleton configuration documents.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the stored feature-flag document (may be partial or absent).
    async fn ai_flags(&self) -> TonResult<PartialAiFlags>;

    /// Merge-write the feature-flag document.
    async fn set_ai_flags(&self, flags: &PartialAiFlags) -> TonResult<()>;

    /// Read the election countdown document, defaulting when absent.
    async fn election_countdown(&self) -> TonResult<ElectionCountdown>;

    /// Overwrite the election countdown document.
    async fn set_election_countdown(&self, config: &ElectionCountdown) -> TonResult<()>;
}
