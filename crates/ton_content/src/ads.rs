//! Advertisements and video embeds.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An advertisement shown to site visitors via a randomized popup.
///
/// Popup frequency capping (at most once per visitor session) is tracked
/// client-side; the server only stores and lists the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    /// Document id
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Short description
    pub description: String,
    /// Creative image URL
    pub image_url: String,
    /// Click-through URL
    pub link_url: String,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
}

/// A YouTube video rendered as an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEmbed {
    /// Document id
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Full YouTube URL
    pub youtube_url: String,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
}
