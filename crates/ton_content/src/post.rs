//! Posts and their canonical block-list content.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed tag vocabulary for AI-generated posts.
pub const TAG_VOCABULARY: &[&str] = &[
    "Politics",
    "Business",
    "Tech",
    "Sports",
    "Entertainment",
    "Lifestyle",
    "Kenya",
    "Africa",
    "World",
    "Opinion",
];

/// Publication status of a post.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PostStatus {
    /// Not visible on the public site
    Draft,
    /// Visible on the public site
    Published,
}

/// One block of rich-text content.
///
/// Rich text arrives in two shapes from callers (a bare string or a typed
/// block list); [`normalize_content`] collapses both into this canonical
/// representation at the persistence boundary so nothing downstream branches
/// on representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// A paragraph of body text
    Paragraph {
        /// Paragraph text
        text: String,
    },
    /// A section heading
    Heading {
        /// Heading text
        text: String,
        /// Heading level (1-6)
        level: u8,
    },
    /// An embedded image
    Image {
        /// Image URL
        url: String,
        /// Alt text / caption
        caption: Option<String>,
    },
    /// A pull quote
    Quote {
        /// Quoted text
        text: String,
    },
}

/// Normalize raw content into the canonical block list.
///
/// Accepts either a JSON array of typed blocks or a bare string. A bare
/// string becomes one paragraph block per blank-line-separated chunk.
///
/// # Examples
///
/// ```
/// use ton_content::{Block, normalize_content};
///
/// let blocks = normalize_content(&serde_json::json!("First.\n\nSecond."));
/// assert_eq!(blocks.len(), 2);
///
/// let blocks = normalize_content(&serde_json::json!([
///     {"type": "heading", "text": "Intro", "level": 2}
/// ]));
/// assert!(matches!(blocks[0], Block::Heading { .. }));
/// ```
pub fn normalize_content(raw: &serde_json::Value) -> Vec<Block> {
    match raw {
        serde_json::Value::String(text) => text
            .split("\n\n")
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| Block::Paragraph {
                text: chunk.to_string(),
            })
            .collect(),
        serde_json::Value::Array(_) => {
            serde_json::from_value(raw.clone()).unwrap_or_else(|_| Vec::new())
        }
        _ => Vec::new(),
    }
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Document id
    pub id: Uuid,
    /// Headline
    pub title: String,
    /// Unique URL-safe identifier
    pub slug: String,
    /// Canonical block-list body
    pub content: Vec<Block>,
    /// Cover image URL
    pub cover_image: String,
    /// Non-empty tag set
    pub tags: Vec<String>,
    /// Draft or published
    pub status: PostStatus,
    /// Display name of the author
    pub author_name: String,
    /// Avatar URL of the author
    pub author_image: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

impl Post {
    /// Body text flattened to a single string (used by search and snippets).
    pub fn flattened_text(&self) -> String {
        let mut out = String::new();
        for block in &self.content {
            let text = match block {
                Block::Paragraph { text } | Block::Heading { text, .. } | Block::Quote { text } => {
                    text.as_str()
                }
                Block::Image { caption, .. } => caption.as_deref().unwrap_or(""),
            };
            if !text.is_empty() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(text);
            }
        }
        out
    }

    /// First `max_chars` characters of the flattened body, ellipsized.
    pub fn snippet(&self, max_chars: usize) -> String {
        let text = self.flattened_text();
        if text.chars().count() <= max_chars {
            return text;
        }
        let truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}\u{2026}", truncated.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with(content: Vec<Block>) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "Test".to_string(),
            slug: "test".to_string(),
            content,
            cover_image: String::new(),
            tags: vec!["Tech".to_string()],
            status: PostStatus::Draft,
            author_name: "Diano".to_string(),
            author_image: None,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn normalize_bare_string_splits_paragraphs() {
        let blocks = normalize_content(&serde_json::json!("One.\n\nTwo.\n\n\n"));
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    text: "One.".to_string()
                },
                Block::Paragraph {
                    text: "Two.".to_string()
                },
            ]
        );
    }

    #[test]
    fn normalize_block_list_passes_through() {
        let raw = serde_json::json!([
            {"type": "paragraph", "text": "Body"},
            {"type": "image", "url": "https://example.com/a.png", "caption": null}
        ]);
        let blocks = normalize_content(&raw);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn flattened_text_joins_blocks() {
        let post = post_with(vec![
            Block::Heading {
                text: "Intro".to_string(),
                level: 2,
            },
            Block::Paragraph {
                text: "Nairobi is booming.".to_string(),
            },
        ]);
        assert_eq!(post.flattened_text(), "Intro Nairobi is booming.");
    }

    #[test]
    fn snippet_truncates_with_ellipsis() {
        let post = post_with(vec![Block::Paragraph {
            text: "word ".repeat(100),
        }]);
        let snippet = post.snippet(20);
        assert!(snippet.chars().count() <= 20);
        assert!(snippet.ends_with('\u{2026}'));
    }

    #[test]
    fn status_round_trips_through_serde() {
        let json = serde_json::to_string(&PostStatus::Published).unwrap();
        assert_eq!(json, "\"published\"");
        let status: PostStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, PostStatus::Published);
    }
}
