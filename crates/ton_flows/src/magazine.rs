//! Weekly magazine assembly.

use std::sync::Arc;

use tracing::instrument;

use ton_content::{AiFeature, MagazineContent, PostSummary};
use ton_core::{GenerateRequest, Message, Role};
use ton_error::{FlowError, TonResult};
use ton_interface::TextModel;

use crate::extraction::{extract_json, parse_json};
use crate::flags::FeatureGate;

/// Assembles a structured magazine issue from a snapshot of recent posts.
///
/// The Sudoku grids are shape- and range-checked only; solvability is
/// trusted from the model. Section membership is filtered to the slugs that
/// were actually offered, so the model cannot invent articles.
pub struct MagazineFlow {
    model: Arc<dyn TextModel>,
    gate: FeatureGate,
}

impl MagazineFlow {
    /// Create the flow over a text model and the feature gate.
    pub fn new(model: Arc<dyn TextModel>, gate: FeatureGate) -> Self {
        Self { model, gate }
    }

    /// Generate a magazine issue covering `posts`.
    #[instrument(skip(self, posts), fields(post_count = posts.len()))]
    pub async fn generate(&self, posts: &[PostSummary]) -> TonResult<MagazineContent> {
        if posts.is_empty() {
            return Err(FlowError::validation("magazine needs at least one post").into());
        }
        self.gate.require(AiFeature::MagazineGeneration).await?;

        let catalog = posts
            .iter()
            .map(|p| {
                format!(
                    "- slug: {slug}\n  title: {title}\n  tags: {tags}\n  excerpt: {excerpt}",
                    slug = p.slug,
                    title = p.title,
                    tags = p.tags.join(", "),
                    excerpt = p.excerpt,
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Assemble this week's issue of the Talk of Nations magazine from these \
             articles:\n{catalog}\n\n\
             Group the articles into themed sections. Respond with ONLY valid JSON \
             in this exact shape:\n\
             {{\n\
               \"title\": \"issue title\",\n\
               \"introduction\": [\"paragraph one\", \"paragraph two\"],\n\
               \"sections\": [\n\
                 {{\"title\": \"section title\", \"summary\": [\"paragraph\"], \
                 \"article_slugs\": [\"slugs from the list above\"]}}\n\
               ],\n\
               \"highlights\": [\"3 to 4 short cover highlights\"],\n\
               \"sudoku\": {{\"puzzle\": [[9 rows of 9 numbers, 0 = blank]], \
               \"solution\": [[9 rows of 9 numbers, 1-9]]}}\n\
             }}"
        );
        let request = GenerateRequest {
            messages: vec![Message::text(Role::User, prompt)],
            max_tokens: Some(8192),
            temperature: Some(0.7),
            model: None,
        };
        let response = self
            .model
            .generate(&request)
            .await
            .map_err(|e| FlowError::upstream(e.to_string()))?;
        let text = response
            .text()
            .ok_or_else(|| FlowError::model_output("empty magazine response"))?;
        let mut content: MagazineContent = parse_json(&extract_json(&text)?)?;

        if content.introduction.is_empty() {
            return Err(FlowError::model_output("magazine has no introduction").into());
        }
        for section in &mut content.sections {
            section
                .article_slugs
                .retain(|slug| posts.iter().any(|p| &p.slug == slug));
        }
        content.sections.retain(|s| !s.article_slugs.is_empty());
        if content.sections.is_empty() {
            return Err(FlowError::model_output("magazine has no usable sections").into());
        }
        if content.highlights.is_empty() {
            return Err(FlowError::model_output("magazine has no highlights").into());
        }
        content.highlights.truncate(4);
        if !content.sudoku.is_well_formed() {
            return Err(FlowError::model_output("sudoku grids are malformed").into());
        }

        Ok(content)
    }
}
