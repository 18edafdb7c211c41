//! In-memory store used by tests and local development.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use ton_content::{
    Advertisement, ChatMessage, ChatSession, ElectionCountdown, Magazine, PartialAiFlags, Post,
    VideoEmbed,
};
use ton_error::{StoreError, TonResult};
use ton_interface::{
    AdStore, ChatStore, MagazineStore, PostFilter, PostStore, SettingsStore, VideoStore,
};

use crate::filter::apply_post_filter;
use crate::fixtures;

#[derive(Debug, Default)]
struct Inner {
    posts: Vec<Post>,
    ads: Vec<Advertisement>,
    videos: Vec<VideoEmbed>,
    magazines: Vec<Magazine>,
    chats: Vec<ChatSession>,
    ai_flags: PartialAiFlags,
    election: Option<ElectionCountdown>,
}

/// An in-memory implementation of every store trait.
///
/// Backed by a single `RwLock`; clones share state. Used by the test suite
/// and by local runs without a database.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the fixture content.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut inner = store.write();
            inner.posts = fixtures::posts();
            inner.ads = fixtures::advertisements();
            inner.videos = fixtures::videos();
        }
        store
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self, filter: &PostFilter) -> Vec<Post> {
        apply_post_filter(self.read().posts.clone(), filter)
    }

    async fn get_by_id(&self, id: Uuid) -> TonResult<Option<Post>> {
        Ok(self.read().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> TonResult<Option<Post>> {
        Ok(self.read().posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn slug_in_use(&self, slug: &str, exclude_id: Option<Uuid>) -> TonResult<bool> {
        Ok(self
            .read()
            .posts
            .iter()
            .any(|p| p.slug == slug && exclude_id.is_none_or(|id| p.id != id)))
    }

    async fn create(&self, post: &Post) -> TonResult<()> {
        self.write().posts.push(post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> TonResult<()> {
        let mut inner = self.write();
        let existing = inner
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or_else(|| StoreError::not_found("post"))?;
        *existing = post.clone();
        existing.updated_at = Utc::now().naive_utc();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> TonResult<()> {
        self.write().posts.retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl AdStore for MemoryStore {
    async fn list(&self) -> Vec<Advertisement> {
        let mut ads = self.read().ads.clone();
        ads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        ads
    }

    async fn create(&self, ad: &Advertisement) -> TonResult<()> {
        self.write().ads.push(ad.clone());
        Ok(())
    }

    async fn update(&self, ad: &Advertisement) -> TonResult<()> {
        let mut inner = self.write();
        let existing = inner
            .ads
            .iter_mut()
            .find(|a| a.id == ad.id)
            .ok_or_else(|| StoreError::not_found("advertisement"))?;
        *existing = ad.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> TonResult<()> {
        self.write().ads.retain(|a| a.id != id);
        Ok(())
    }
}

#[async_trait]
impl VideoStore for MemoryStore {
    async fn list(&self) -> Vec<VideoEmbed> {
        let mut videos = self.read().videos.clone();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        videos
    }

    async fn create(&self, video: &VideoEmbed) -> TonResult<()> {
        self.write().videos.push(video.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> TonResult<()> {
        self.write().videos.retain(|v| v.id != id);
        Ok(())
    }
}

#[async_trait]
impl MagazineStore for MemoryStore {
    async fn list(&self) -> Vec<Magazine> {
        let mut magazines = self.read().magazines.clone();
        magazines.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        magazines
    }

    async fn create(&self, magazine: &Magazine) -> TonResult<()> {
        self.write().magazines.push(magazine.clone());
        Ok(())
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn latest_for_user(&self, user_id: &str) -> TonResult<Option<ChatSession>> {
        Ok(self
            .read()
            .chats
            .iter()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn create(&self, session: &ChatSession) -> TonResult<()> {
        self.write().chats.push(session.clone());
        Ok(())
    }

    async fn append(&self, session_id: Uuid, messages: &[ChatMessage]) -> TonResult<()> {
        let mut inner = self.write();
        let session = inner
            .chats
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| StoreError::not_found("chat session"))?;
        session.messages.extend_from_slice(messages);
        session.updated_at = Utc::now().naive_utc();
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn ai_flags(&self) -> TonResult<PartialAiFlags> {
        Ok(self.read().ai_flags)
    }

    async fn set_ai_flags(&self, flags: &PartialAiFlags) -> TonResult<()> {
        let mut inner = self.write();
        let stored = inner.ai_flags;
        inner.ai_flags = PartialAiFlags {
            url_slug_generation: flags.url_slug_generation.or(stored.url_slug_generation),
            weather_forecast: flags.weather_forecast.or(stored.weather_forecast),
            post_generation: flags.post_generation.or(stored.post_generation),
            topic_suggestion: flags.topic_suggestion.or(stored.topic_suggestion),
            magazine_generation: flags.magazine_generation.or(stored.magazine_generation),
            cover_image_generation: flags
                .cover_image_generation
                .or(stored.cover_image_generation),
            ask_diano: flags.ask_diano.or(stored.ask_diano),
        };
        Ok(())
    }

    async fn election_countdown(&self) -> TonResult<ElectionCountdown> {
        Ok(self.read().election.clone().unwrap_or_default())
    }

    async fn set_election_countdown(&self, config: &ElectionCountdown) -> TonResult<()> {
        self.write().election = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_store_lists_published_posts() {
        let store = MemoryStore::seeded();
        let posts = PostStore::list(&store, &PostFilter::published()).await;
        assert_eq!(posts.len(), 5);
    }

    #[tokio::test]
    async fn slug_lookup_excludes_current_post() {
        let store = MemoryStore::seeded();
        let posts = PostStore::list(&store, &PostFilter::default()).await;
        let first = &posts[0];
        assert!(store.slug_in_use(&first.slug, None).await.unwrap());
        assert!(!store.slug_in_use(&first.slug, Some(first.id)).await.unwrap());
    }

    #[tokio::test]
    async fn flag_writes_merge_instead_of_clobbering() {
        let store = MemoryStore::new();
        store
            .set_ai_flags(&PartialAiFlags {
                ask_diano: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        store
            .set_ai_flags(&PartialAiFlags {
                post_generation: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        let stored = store.ai_flags().await.unwrap();
        assert_eq!(stored.ask_diano, Some(false));
        assert_eq!(stored.post_generation, Some(false));
    }

    #[tokio::test]
    async fn chat_append_extends_latest_session() {
        let store = MemoryStore::new();
        let session = ChatSession {
            id: Uuid::new_v4(),
            user_id: "reader-1".to_string(),
            messages: Vec::new(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        };
        ChatStore::create(&store, &session).await.unwrap();
        store
            .append(
                session.id,
                &[ChatMessage {
                    role: ton_content::ChatRole::User,
                    content: "What did you publish about matatus?".to_string(),
                    sources: Vec::new(),
                }],
            )
            .await
            .unwrap();
        let latest = store.latest_for_user("reader-1").await.unwrap().unwrap();
        assert_eq!(latest.messages.len(), 1);
    }
}
