//! Twitter/X adapter with OAuth 1.0a request signing.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha1::Sha1;
use tracing::instrument;

use ton_content::Post;
use ton_error::{SocialError, SocialErrorKind, TonResult};

use crate::telegram::{hashtags, post_url};

const TWEET_ENDPOINT: &str = "https://api.twitter.com/2/tweets";

/// The hard character budget for one tweet.
pub const TWEET_BUDGET: usize = 280;

/// Links count as t.co's fixed wrapped length regardless of actual URL size.
const LINK_WEIGHT: usize = 23;

/// RFC 3986 unreserved characters stay bare; everything else is encoded.
const OAUTH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

type HmacSha1 = Hmac<Sha1>;

/// Twitter API credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// OAuth 1.0a consumer key
    pub api_key: String,
    /// OAuth 1.0a consumer secret
    pub api_secret: String,
    /// Access token of the posting account
    pub access_token: String,
    /// Access token secret of the posting account
    pub access_secret: String,
}

impl TwitterConfig {
    /// Read the four `TWITTER_*` credential variables. Any absent or empty
    /// variable means the integration is off.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Some(Self {
            api_key: var("TWITTER_API_KEY")?,
            api_secret: var("TWITTER_API_SECRET")?,
            access_token: var("TWITTER_ACCESS_TOKEN")?,
            access_secret: var("TWITTER_ACCESS_SECRET")?,
        })
    }
}

/// Posts tweets through the v2 API. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    http: reqwest::Client,
    config: TwitterConfig,
}

impl TwitterClient {
    /// Build a client from explicit configuration.
    pub fn new(config: TwitterConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Build a client from the environment, or `None` when unconfigured.
    pub fn from_env() -> Option<Self> {
        TwitterConfig::from_env().map(Self::new)
    }

    /// Announce a new post. The composed text always fits the 280 budget.
    #[instrument(skip(self, post), fields(slug = %post.slug))]
    pub async fn tweet_new_post(&self, post: &Post, base_url: &str) -> TonResult<()> {
        let text = compose_tweet(post, base_url);
        self.post_tweet(&text).await
    }

    async fn post_tweet(&self, text: &str) -> TonResult<()> {
        let authorization = self.oauth_header("POST", TWEET_ENDPOINT)?;
        let response = self
            .http
            .post(TWEET_ENDPOINT)
            .header("Authorization", authorization)
            .json(&serde_json::json!({ "text": text }))
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

    /// Build the OAuth 1.0a `Authorization` header for a request with no
    /// signed query or form parameters (OAuth 1.0a excludes JSON bodies
    /// from the signature base).
    fn oauth_header(&self, method: &str, url: &str) -> Result<String, SocialError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            .to_string();
        let nonce = uuid::Uuid::new_v4().simple().to_string();

        // Parameters sorted by encoded name, as the signature base requires.
        let params: [(&str, &str); 6] = [
            ("oauth_consumer_key", &self.config.api_key),
            ("oauth_nonce", &nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", &timestamp),
            ("oauth_token", &self.config.access_token),
            ("oauth_version", "1.0"),
        ];
        let param_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let base_string = format!(
            "{method}&{}&{}",
            encode(url),
            encode(&param_string)
        );
        let signing_key = format!(
            "{}&{}",
            encode(&self.config.api_secret),
            encode(&self.config.access_secret)
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| SocialError::new(SocialErrorKind::Http(e.to_string())))?;
        mac.update(base_string.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        let mut header = String::from("OAuth ");
        let header_params: [(&str, &str); 7] = [
            ("oauth_consumer_key", &self.config.api_key),
            ("oauth_nonce", &nonce),
            ("oauth_signature", &signature),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", &timestamp),
            ("oauth_token", &self.config.access_token),
            ("oauth_version", "1.0"),
        ];
        header.push_str(
            &header_params
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
                .collect::<Vec<_>>()
                .join(", "),
        );
        Ok(header)
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE).to_string()
}

/// Compose the announcement text for a post within the tweet budget.
///
/// The link is weighted at t.co's fixed 23 characters. The snippet absorbs
/// all truncation first, an oversized hashtag line is dropped next, and a
/// pathologically long title is truncated last so title + link always fit.
pub fn compose_tweet(post: &Post, base_url: &str) -> String {
    let link = post_url(base_url, &post.slug);
    let mut tags = hashtags(&post.tags);
    // Furniture around the title: blank line + link, optional newline + tags.
    let base_overhead = 2 + LINK_WEIGHT;
    let mut tag_cost = if tags.is_empty() {
        0
    } else {
        1 + tags.chars().count()
    };
    // Tags are free-form on manually created posts; a hashtag line that
    // crowds out the title is dropped entirely rather than truncated into
    // broken tags.
    if base_overhead + tag_cost >= TWEET_BUDGET {
        tags.clear();
        tag_cost = 0;
    }
    let overhead = base_overhead + tag_cost;

    let title = truncate_chars(post.title.trim(), TWEET_BUDGET.saturating_sub(overhead));
    let used = title.chars().count() + overhead;

    let snippet_room = TWEET_BUDGET.saturating_sub(used);
    // A snippet needs its own blank-line separator and enough room to say
    // anything at all.
    let snippet = if snippet_room > 12 {
        let body = post.snippet(snippet_room - 2);
        if body.is_empty() {
            String::new()
        } else {
            format!("\n\n{body}")
        }
    } else {
        String::new()
    };

    let mut tweet = format!("{title}{snippet}\n\n{link}");
    if !tags.is_empty() {
        tweet.push('\n');
        tweet.push_str(&tags);
    }
    tweet
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}\u{2026}", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ton_content::{Block, PostStatus};
    use uuid::Uuid;

    fn post(title: &str, body: &str, tags: &[&str]) -> Post {
        Post {
            id: Uuid::from_u128(7),
            title: title.to_string(),
            slug: "the-slug".to_string(),
            content: vec![Block::Paragraph {
                text: body.to_string(),
            }],
            cover_image: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            status: PostStatus::Published,
            author_name: "Diano".to_string(),
            author_image: None,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Character count with every embedded link weighted at 23.
    fn weighted_length(tweet: &str, link: &str) -> usize {
        let raw = tweet.chars().count();
        if tweet.contains(link) {
            raw - link.chars().count() + LINK_WEIGHT
        } else {
            raw
        }
    }

    #[test]
    fn tweet_fits_budget_for_ordinary_posts() {
        let p = post(
            "Harambee Stars: A New Generation Rises",
            "A crop of young midfielders is giving the national team hope.",
            &["Sports", "Kenya"],
        );
        let base = "https://talkofnations.co.ke";
        let tweet = compose_tweet(&p, base);
        let link = post_url(base, &p.slug);
        assert!(weighted_length(&tweet, &link) <= TWEET_BUDGET);
        assert!(tweet.contains(&p.title));
        assert!(tweet.contains(&link));
        assert!(tweet.contains("#Sports #Kenya"));
    }

    #[test]
    fn tweet_fits_budget_for_pathological_inputs() {
        let cases = [
            post(&"Very long title ".repeat(40), "short body", &["Kenya"]),
            post("Short", &"endless body ".repeat(200), &["Kenya", "Africa"]),
            post(
                &"Läng unicode tïtle — ".repeat(30),
                &"body ".repeat(300),
                &["Politics", "Business", "Opinion"],
            ),
            post("", "", &[]),
            post("Tagged", "short body", &[&"Harambee".repeat(40)]),
        ];
        let base = "https://talkofnations.co.ke";
        for p in cases {
            let tweet = compose_tweet(&p, base);
            let link = post_url(base, &p.slug);
            assert!(
                weighted_length(&tweet, &link) <= TWEET_BUDGET,
                "over budget: {} chars",
                weighted_length(&tweet, &link)
            );
            assert!(tweet.contains(&link));
        }
    }

    #[test]
    fn oversized_tags_lose_the_hashtag_line() {
        let giant_tag = "K".repeat(264);
        let p = post("Budget Day", "the treasury speech in full", &[&giant_tag]);
        let base = "https://talkofnations.co.ke";
        let tweet = compose_tweet(&p, base);
        let link = post_url(base, &p.slug);
        assert!(weighted_length(&tweet, &link) <= TWEET_BUDGET);
        assert!(tweet.contains("Budget Day"));
        assert!(tweet.contains(&link));
        assert!(!tweet.contains('#'));
    }

    #[test]
    fn snippet_is_dropped_before_the_title() {
        let p = post(&"T".repeat(250), "some body text", &[]);
        let base = "https://talkofnations.co.ke";
        let tweet = compose_tweet(&p, base);
        assert!(!tweet.contains("some body text"));
        let link = post_url(base, &p.slug);
        assert!(weighted_length(&tweet, &link) <= TWEET_BUDGET);
    }

    #[test]
    fn oauth_encoding_is_rfc3986() {
        assert_eq!(encode("a-b._~c"), "a-b._~c");
        assert_eq!(encode("a b+c/d"), "a%20b%2Bc%2Fd");
        assert_eq!(encode("habari=yako&"), "habari%3Dyako%26");
    }

    #[test]
    fn oauth_header_is_stable_in_shape() {
        let client = TwitterClient::new(TwitterConfig {
            api_key: "ck".to_string(),
            api_secret: "cs".to_string(),
            access_token: "at".to_string(),
            access_secret: "as".to_string(),
        });
        let header = client.oauth_header("POST", TWEET_ENDPOINT).unwrap();
        assert!(header.starts_with("OAuth oauth_consumer_key=\"ck\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_token=\"at\""));
        assert!(header.contains("oauth_version=\"1.0\""));
        assert!(header.contains("oauth_signature=\""));
    }
}
