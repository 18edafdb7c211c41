//! Full post drafting from a topic.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use ton_content::{AiFeature, Block, Post, PostStatus, TAG_VOCABULARY, normalize_content};
use ton_core::{GenerateRequest, Message, Role};
use ton_error::{FlowError, TonResult};
use ton_interface::TextModel;

use crate::extraction::{extract_json, parse_json};
use crate::flags::FeatureGate;
use crate::slug::slugify;

/// A generated article, not yet persisted.
///
/// The slug is normalized but NOT checked for uniqueness here; the caller
/// that persists the post resolves collisions.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    /// Generated headline
    pub title: String,
    /// Normalized (but not uniqueness-checked) slug
    pub slug: String,
    /// Canonical block-list body
    pub content: Vec<Block>,
    /// Tags from the fixed vocabulary, at most three
    pub tags: Vec<String>,
    /// Cover image URL suggested by the model
    pub cover_image: String,
}

impl PostDraft {
    /// Materialize the draft as a `Post`. AI-generated posts always start
    /// as drafts.
    pub fn into_post(self, author_name: impl Into<String>) -> Post {
        let now = Utc::now().naive_utc();
        Post {
            id: Uuid::new_v4(),
            title: self.title,
            slug: self.slug,
            content: self.content,
            cover_image: self.cover_image,
            tags: self.tags,
            status: PostStatus::Draft,
            author_name: author_name.into(),
            author_image: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostOutput {
    title: String,
    slug: String,
    content: serde_json::Value,
    tags: Vec<String>,
    #[serde(default)]
    cover_image: String,
}

/// Drafts a complete article from a topic.
pub struct PostFlow {
    model: Arc<dyn TextModel>,
    gate: FeatureGate,
}

impl PostFlow {
    /// Create the flow over a text model and the feature gate.
    pub fn new(model: Arc<dyn TextModel>, gate: FeatureGate) -> Self {
        Self { model, gate }
    }

    /// Generate a draft article about `topic`.
    #[instrument(skip(self))]
    pub async fn generate(&self, topic: &str) -> TonResult<PostDraft> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(FlowError::validation("topic must not be empty").into());
        }
        self.gate.require(AiFeature::PostGeneration).await?;

        let prompt = format!(
            "Write a complete blog article for Talk of Nations, a Kenyan news and \
             lifestyle site, about this topic:\n\"{topic}\"\n\n\
             Respond with ONLY valid JSON in this exact shape:\n\
             {{\n\
               \"title\": \"headline\",\n\
               \"slug\": \"url-slug\",\n\
               \"content\": \"article body as paragraphs separated by blank lines\",\n\
               \"tags\": [\"up to three tags chosen from: {vocabulary}\"],\n\
               \"cover_image\": \"https URL of a suitable stock cover image\"\n\
             }}",
            vocabulary = TAG_VOCABULARY.join(", ")
        );
        let request = GenerateRequest {
            messages: vec![Message::text(Role::User, prompt)],
            max_tokens: Some(4096),
            temperature: Some(0.8),
            model: None,
        };
        let response = self
            .model
            .generate(&request)
            .await
            .map_err(|e| FlowError::upstream(e.to_string()))?;
        let text = response
            .text()
            .ok_or_else(|| FlowError::model_output("empty post response"))?;
        let out: PostOutput = parse_json(&extract_json(&text)?)?;

        let content = normalize_content(&out.content);
        if content.is_empty() {
            return Err(FlowError::model_output("generated article has no body").into());
        }
        let tags = filter_tags(&out.tags);
        if tags.is_empty() {
            return Err(
                FlowError::model_output("no generated tag matched the tag vocabulary").into(),
            );
        }

        Ok(PostDraft {
            title: out.title,
            slug: slugify(&out.slug),
            content,
            tags,
            cover_image: out.cover_image,
        })
    }
}

/// Keep only tags from the fixed vocabulary (matched case-insensitively,
/// returned in canonical casing), capped at three.
fn filter_tags(tags: &[String]) -> Vec<String> {
    let mut kept = Vec::new();
    for tag in tags {
        let canonical = TAG_VOCABULARY
            .iter()
            .find(|v| v.eq_ignore_ascii_case(tag.trim()));
        if let Some(&canonical) = canonical {
            if !kept.iter().any(|k| k == canonical) {
                kept.push(canonical.to_string());
            }
        }
    }
    kept.truncate(3);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockModel;
    use ton_interface::SettingsStore;
    use ton_store::MemoryStore;

    fn gate() -> FeatureGate {
        FeatureGate::new(Arc::new(MemoryStore::new()))
    }

    const GOOD_RESPONSE: &str = r#"```json
{
  "title": "Kenya Launches New Tech Hub",
  "slug": "Kenya Launches New Tech Hub",
  "content": "Nairobi's Silicon Savannah has a new anchor tenant.\n\nThe hub opens in Konza next quarter.",
  "tags": ["tech", "KENYA", "Quantum", "Business", "Africa"],
  "cover_image": "https://example.com/cover.jpg"
}
```"#;

    #[tokio::test]
    async fn draft_is_normalized_and_tag_filtered() {
        let model = Arc::new(MockModel::scripted(&[GOOD_RESPONSE]));
        let flow = PostFlow::new(model, gate());
        let draft = flow.generate("Konza tech hub").await.unwrap();
        assert_eq!(draft.slug, "kenya-launches-new-tech-hub");
        assert_eq!(draft.content.len(), 2);
        // Unknown tags dropped, casing canonicalized, capped at three.
        assert_eq!(draft.tags, vec!["Tech", "Kenya", "Business"]);
    }

    #[tokio::test]
    async fn draft_materializes_as_draft_status() {
        let model = Arc::new(MockModel::scripted(&[GOOD_RESPONSE]));
        let flow = PostFlow::new(model, gate());
        let post = flow
            .generate("Konza tech hub")
            .await
            .unwrap()
            .into_post("Diano");
        assert_eq!(post.status, PostStatus::Draft);
    }

    #[tokio::test]
    async fn vocabulary_miss_is_a_model_output_error() {
        let response = r#"{"title": "T", "slug": "t", "content": "Body.", "tags": ["Quantum"], "cover_image": ""}"#;
        let model = Arc::new(MockModel::scripted(&[response]));
        let flow = PostFlow::new(model, gate());
        let err = flow.generate("anything").await.unwrap_err();
        assert!(err.to_string().contains("vocabulary"));
    }

    #[tokio::test]
    async fn empty_topic_is_rejected_without_a_model_call() {
        let model = Arc::new(MockModel::scripted(&[GOOD_RESPONSE]));
        let flow = PostFlow::new(model.clone(), gate());
        assert!(flow.generate("   ").await.is_err());
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn disabled_flag_means_zero_model_calls() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_ai_flags(&ton_content::PartialAiFlags {
                post_generation: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        let model = Arc::new(MockModel::scripted(&[GOOD_RESPONSE]));
        let flow = PostFlow::new(model.clone(), FeatureGate::new(store));
        let err = flow.generate("anything").await.unwrap_err();
        assert!(matches!(
            err.kind(),
            ton_error::TonErrorKind::Flow(f) if f.is_feature_disabled()
        ));
        assert_eq!(model.call_count(), 0);
    }
}
