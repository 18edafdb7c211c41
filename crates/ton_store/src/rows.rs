//! Diesel row structs and their conversions to domain types.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde_json::Value as JsonValue;
use ton_content::{Advertisement, ChatSession, Magazine, Post, PostStatus, VideoEmbed};
use ton_error::{StoreError, StoreErrorKind};
use uuid::Uuid;

use crate::schema::{advertisements, chat_sessions, magazines, posts, site_settings, videos};

fn serialization(e: impl std::fmt::Display) -> StoreError {
    StoreError::new(StoreErrorKind::Serialization(e.to_string()))
}

/// A stored post.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: JsonValue,
    pub cover_image: String,
    pub tags: Vec<String>,
    pub status: String,
    pub author_name: String,
    pub author_image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<PostRow> for Post {
    type Error = StoreError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let status = PostStatus::from_str(&row.status).map_err(serialization)?;
        Ok(Post {
            id: row.id,
            title: row.title,
            slug: row.slug,
            content: ton_content::normalize_content(&row.content),
            cover_image: row.cover_image,
            tags: row.tags,
            status,
            author_name: row.author_name,
            author_image: row.author_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<&Post> for PostRow {
    type Error = StoreError;

    fn try_from(post: &Post) -> Result<Self, Self::Error> {
        Ok(PostRow {
            id: post.id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: serde_json::to_value(&post.content).map_err(serialization)?,
            cover_image: post.cover_image.clone(),
            tags: post.tags.clone(),
            status: post.status.to_string(),
            author_name: post.author_name.clone(),
            author_image: post.author_image.clone(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }
}

/// A stored advertisement.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = advertisements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub link_url: String,
    pub created_at: NaiveDateTime,
}

impl From<AdRow> for Advertisement {
    fn from(row: AdRow) -> Self {
        Advertisement {
            id: row.id,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            link_url: row.link_url,
            created_at: row.created_at,
        }
    }
}

impl From<&Advertisement> for AdRow {
    fn from(ad: &Advertisement) -> Self {
        AdRow {
            id: ad.id,
            title: ad.title.clone(),
            description: ad.description.clone(),
            image_url: ad.image_url.clone(),
            link_url: ad.link_url.clone(),
            created_at: ad.created_at,
        }
    }
}

/// A stored video embed.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = videos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VideoRow {
    pub id: Uuid,
    pub title: String,
    pub youtube_url: String,
    pub created_at: NaiveDateTime,
}

impl From<VideoRow> for VideoEmbed {
    fn from(row: VideoRow) -> Self {
        VideoEmbed {
            id: row.id,
            title: row.title,
            youtube_url: row.youtube_url,
            created_at: row.created_at,
        }
    }
}

impl From<&VideoEmbed> for VideoRow {
    fn from(video: &VideoEmbed) -> Self {
        VideoRow {
            id: video.id,
            title: video.title.clone(),
            youtube_url: video.youtube_url.clone(),
            created_at: video.created_at,
        }
    }
}

/// A stored magazine record.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = magazines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MagazineRow {
    pub id: Uuid,
    pub title: String,
    pub file_url: String,
    pub post_ids: JsonValue,
    pub created_at: NaiveDateTime,
}

impl TryFrom<MagazineRow> for Magazine {
    type Error = StoreError;

    fn try_from(row: MagazineRow) -> Result<Self, Self::Error> {
        let post_ids: Vec<Uuid> = serde_json::from_value(row.post_ids).map_err(serialization)?;
        Ok(Magazine {
            id: row.id,
            title: row.title,
            file_url: row.file_url,
            post_ids,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<&Magazine> for MagazineRow {
    type Error = StoreError;

    fn try_from(magazine: &Magazine) -> Result<Self, Self::Error> {
        Ok(MagazineRow {
            id: magazine.id,
            title: magazine.title.clone(),
            file_url: magazine.file_url.clone(),
            post_ids: serde_json::to_value(&magazine.post_ids).map_err(serialization)?,
            created_at: magazine.created_at,
        })
    }
}

/// A stored chat session.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = chat_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChatSessionRow {
    pub id: Uuid,
    pub user_id: String,
    pub messages: JsonValue,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ChatSessionRow> for ChatSession {
    type Error = StoreError;

    fn try_from(row: ChatSessionRow) -> Result<Self, Self::Error> {
        Ok(ChatSession {
            id: row.id,
            user_id: row.user_id,
            messages: serde_json::from_value(row.messages).map_err(serialization)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<&ChatSession> for ChatSessionRow {
    type Error = StoreError;

    fn try_from(session: &ChatSession) -> Result<Self, Self::Error> {
        Ok(ChatSessionRow {
            id: session.id,
            user_id: session.user_id.clone(),
            messages: serde_json::to_value(&session.messages).map_err(serialization)?,
            created_at: session.created_at,
            updated_at: session.updated_at,
        })
    }
}

/// A singleton configuration document.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = site_settings)]
#[diesel(primary_key(key))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SettingRow {
    pub key: String,
    pub value: JsonValue,
    pub updated_at: NaiveDateTime,
}
