//! Telegram bot adapter.

use serde::Serialize;
use tracing::instrument;

use ton_content::Post;
use ton_error::{SocialError, SocialErrorKind, TonResult};

const API_BASE: &str = "https://api.telegram.org";

/// How much of the body a Telegram announcement carries.
const SNIPPET_CHARS: usize = 200;

/// Telegram credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub token: String,
    /// Default chat the bot announces to
    pub chat_id: String,
    /// Public channel name used in formatted messages
    pub channel: String,
}

impl TelegramConfig {
    /// Read `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`, and `TELEGRAM_CHANNEL`.
    /// Absent or empty variables mean the integration is off.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Some(Self {
            token: var("TELEGRAM_BOT_TOKEN")?,
            chat_id: var("TELEGRAM_CHAT_ID")?,
            channel: var("TELEGRAM_CHANNEL")?,
        })
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
    disable_web_page_preview: bool,
}

/// Sends messages through the Telegram Bot API. One POST per send, no
/// retries.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramClient {
    /// Build a client from explicit configuration.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Build a client from the environment, or `None` when unconfigured.
    pub fn from_env() -> Option<Self> {
        TelegramConfig::from_env().map(Self::new)
    }

    /// Send `text` to an explicit chat.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> TonResult<()> {
        let url = format!("{API_BASE}/bot{token}/sendMessage", token = self.config.token);
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
            disable_web_page_preview: false,
        };
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SocialError::new(SocialErrorKind::Http(e.to_string())))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SocialError::new(SocialErrorKind::Api {
                status: status.as_u16(),
                message,
            })
            .into());
        }
        Ok(())
    }

    /// Announce a post to the configured default chat.
    pub async fn announce_post(&self, post: &Post, base_url: &str) -> TonResult<()> {
        let text = format_post_for_telegram(post, base_url);
        self.send_message(&self.config.chat_id, &text, Some("HTML"))
            .await
    }
}

/// Pure formatter for a new-post announcement: title, link, truncated
/// snippet, hashtag-ified tags. No I/O.
pub fn format_post_for_telegram(post: &Post, base_url: &str) -> String {
    let link = post_url(base_url, &post.slug);
    let snippet = post.snippet(SNIPPET_CHARS);
    let hashtags = hashtags(&post.tags);
    let mut text = format!(
        "<b>{title}</b>\n\n{snippet}\n\n{link}",
        title = post.title,
    );
    if !hashtags.is_empty() {
        text.push_str("\n\n");
        text.push_str(&hashtags);
    }
    text
}

pub(crate) fn post_url(base_url: &str, slug: &str) -> String {
    format!("{}/posts/{slug}", base_url.trim_end_matches('/'))
}

pub(crate) fn hashtags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| {
            let compact: String = tag.chars().filter(|c| c.is_alphanumeric()).collect();
            format!("#{compact}")
        })
        .filter(|t| t.len() > 1)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ton_content::{Block, PostStatus};
    use uuid::Uuid;

    fn post() -> Post {
        Post {
            id: Uuid::from_u128(1),
            title: "Nairobi's Matatu Culture Goes Digital".to_string(),
            slug: "nairobi-matatu-culture-goes-digital".to_string(),
            content: vec![Block::Paragraph {
                text: "Cashless fare apps are changing the daily commute.".to_string(),
            }],
            cover_image: String::new(),
            tags: vec!["Tech".to_string(), "Kenya".to_string()],
            status: PostStatus::Published,
            author_name: "Diano".to_string(),
            author_image: None,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn formatted_message_carries_title_link_and_hashtags() {
        let text = format_post_for_telegram(&post(), "https://talkofnations.co.ke/");
        assert!(text.contains("<b>Nairobi's Matatu Culture Goes Digital</b>"));
        assert!(
            text.contains("https://talkofnations.co.ke/posts/nairobi-matatu-culture-goes-digital")
        );
        assert!(text.contains("#Tech #Kenya"));
    }

    #[test]
    fn hashtags_drop_non_alphanumerics() {
        let tags = vec!["East Africa".to_string(), "!!!".to_string()];
        assert_eq!(hashtags(&tags), "#EastAfrica");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let mut p = post();
        p.content = vec![Block::Paragraph {
            text: "habari ".repeat(100),
        }];
        let text = format_post_for_telegram(&p, "https://talkofnations.co.ke");
        assert!(text.contains('\u{2026}'));
    }
}
