//! URL slug generation with a deterministic fallback.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use ton_content::AiFeature;
use ton_core::{GenerateRequest, Message, Role};
use ton_error::{FlowError, TonResult};
use ton_interface::{PostStore, TextModel};

use crate::extraction::{extract_json, parse_json};
use crate::flags::FeatureGate;

fn non_alnum() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Valid slug regex"))
}

/// Deterministic lowercase/hyphenation transform of a title.
///
/// Output always matches `^[a-z0-9]+(-[a-z0-9]+)*$`; a title with no usable
/// characters yields `"post"`.
///
/// # Examples
///
/// ```
/// use ton_flows::slugify;
///
/// assert_eq!(slugify("Kenya Launches New Tech Hub"), "kenya-launches-new-tech-hub");
/// assert_eq!(slugify("  M-Pesa's 15% Growth!  "), "m-pesa-s-15-growth");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = non_alnum().replace_all(&lowered, "-");
    let trimmed = hyphenated.trim_matches('-');
    if trimmed.is_empty() {
        "post".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Resolve a unique slug against the post collection by appending `-1`,
/// `-2`, … until a free one is found. `exclude_id` skips the post being
/// edited so saving in place does not collide with itself.
pub async fn unique_slug(
    store: &dyn PostStore,
    base: &str,
    exclude_id: Option<Uuid>,
) -> TonResult<String> {
    let base = slugify(base);
    if !store.slug_in_use(&base, exclude_id).await? {
        return Ok(base);
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{base}-{n}");
        if !store.slug_in_use(&candidate, exclude_id).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}

#[derive(Debug, Deserialize)]
struct SlugOutput {
    slug: String,
}

/// Generates a URL slug for a post title.
///
/// The model's suggestion is normalized through [`slugify`] so the result
/// always matches the slug grammar; a failed model call falls back to
/// `slugify(title)` instead of erroring. Uniqueness is NOT resolved here —
/// callers run the result through [`unique_slug`] before persisting.
pub struct SlugFlow {
    model: Arc<dyn TextModel>,
    gate: FeatureGate,
}

impl SlugFlow {
    /// Create the flow over a text model and the feature gate.
    pub fn new(model: Arc<dyn TextModel>, gate: FeatureGate) -> Self {
        Self { model, gate }
    }

    /// Generate a slug for `title`.
    #[instrument(skip(self))]
    pub async fn generate(&self, title: &str) -> TonResult<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(FlowError::validation("title must not be empty").into());
        }
        self.gate.require(AiFeature::UrlSlugGeneration).await?;

        match self.call_model(title).await {
            Ok(slug) => Ok(slugify(&slug)),
            Err(e) => {
                tracing::warn!(error = %e, "Slug model call failed, using deterministic fallback");
                Ok(slugify(title))
            }
        }
    }

    async fn call_model(&self, title: &str) -> Result<String, FlowError> {
        let prompt = format!(
            "Generate a short, SEO-friendly URL slug for this blog post title:\n\
             \"{title}\"\n\n\
             Respond with ONLY valid JSON in this exact shape:\n\
             {{\"slug\": \"lowercase-words-joined-by-hyphens\"}}"
        );
        let request = GenerateRequest {
            messages: vec![Message::text(Role::User, prompt)],
            max_tokens: Some(64),
            temperature: Some(0.2),
            model: None,
        };
        let response = self
            .model
            .generate(&request)
            .await
            .map_err(|e| FlowError::upstream(e.to_string()))?;
        let text = response
            .text()
            .ok_or_else(|| FlowError::model_output("empty slug response"))?;
        let out: SlugOutput = parse_json(&extract_json(&text)?)?;
        Ok(out.slug)
    }
}
