//! Topic suggestion for the admin dashboard.

use std::sync::Arc;

use serde::Deserialize;
use tracing::instrument;

use ton_content::AiFeature;
use ton_core::{GenerateRequest, Message, Role};
use ton_error::{FlowError, TonResult};
use ton_interface::TextModel;

use crate::extraction::{extract_json, parse_json};
use crate::flags::FeatureGate;

#[derive(Debug, Deserialize)]
struct TopicOutput {
    topics: Vec<String>,
}

/// Suggests article topics. The prompt requests exactly five; the shape
/// tolerates any non-empty count.
pub struct TopicFlow {
    model: Arc<dyn TextModel>,
    gate: FeatureGate,
}

impl TopicFlow {
    /// Create the flow over a text model and the feature gate.
    pub fn new(model: Arc<dyn TextModel>, gate: FeatureGate) -> Self {
        Self { model, gate }
    }

    /// Suggest topics for new articles.
    #[instrument(skip(self))]
    pub async fn suggest(&self) -> TonResult<Vec<String>> {
        self.gate.require(AiFeature::TopicSuggestion).await?;

        let prompt = "Suggest exactly 5 timely article topics for Talk of Nations, a Kenyan \
                      news and lifestyle blog. Mix news, business, sports, and lifestyle \
                      angles.\n\n\
                      Respond with ONLY valid JSON in this exact shape:\n\
                      {\"topics\": [\"topic one\", \"topic two\", \"...\"]}";
        let request = GenerateRequest {
            messages: vec![Message::text(Role::User, prompt)],
            max_tokens: Some(512),
            temperature: Some(0.9),
            model: None,
        };
        let response = self
            .model
            .generate(&request)
            .await
            .map_err(|e| FlowError::upstream(e.to_string()))?;
        let text = response
            .text()
            .ok_or_else(|| FlowError::model_output("empty topic response"))?;
        let out: TopicOutput = parse_json(&extract_json(&text)?)?;

        let topics: Vec<String> = out
            .topics
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if topics.is_empty() {
            return Err(FlowError::model_output("no topics in model response").into());
        }
        Ok(topics)
    }
}
