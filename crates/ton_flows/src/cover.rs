//! Cover image generation.

use std::sync::Arc;

use tracing::instrument;

use ton_content::AiFeature;
use ton_error::{FlowError, TonResult};
use ton_interface::{ImageData, ImageModel};

use crate::flags::FeatureGate;

/// Generates a cover image for an article.
pub struct CoverImageFlow {
    model: Arc<dyn ImageModel>,
    gate: FeatureGate,
}

impl CoverImageFlow {
    /// Create the flow over an image model and the feature gate.
    pub fn new(model: Arc<dyn ImageModel>, gate: FeatureGate) -> Self {
        Self { model, gate }
    }

    /// Generate a cover image for `title`, optionally nudged by `style`.
    #[instrument(skip(self))]
    pub async fn generate(&self, title: &str, style: Option<&str>) -> TonResult<ImageData> {
        let title = title.trim();
        if title.is_empty() {
            return Err(FlowError::validation("title must not be empty").into());
        }
        self.gate.require(AiFeature::CoverImageGeneration).await?;

        let mut prompt = format!(
            "Editorial cover photograph for a Kenyan news article titled \"{title}\". \
             Photojournalistic, vibrant, no text overlay."
        );
        if let Some(style) = style {
            let style = style.trim();
            if !style.is_empty() {
                prompt.push_str(&format!(" Style: {style}."));
            }
        }

        let image = self.model.generate_image(&prompt).await?;
        if image.data.is_empty() {
            return Err(FlowError::model_output("image model returned no bytes").into());
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::MockImageModel;
    use ton_interface::SettingsStore;
    use ton_store::MemoryStore;

    #[tokio::test]
    async fn returns_image_bytes() {
        let model = Arc::new(MockImageModel::new());
        let flow = CoverImageFlow::new(
            model.clone(),
            FeatureGate::new(Arc::new(MemoryStore::new())),
        );
        let image = flow.generate("Harambee Stars", Some("bold")).await.unwrap();
        assert_eq!(image.mime, "image/png");
        assert!(!image.data.is_empty());
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn disabled_flag_means_zero_model_calls() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_ai_flags(&ton_content::PartialAiFlags {
                cover_image_generation: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        let model = Arc::new(MockImageModel::new());
        let flow = CoverImageFlow::new(model.clone(), FeatureGate::new(store));
        assert!(flow.generate("A Title", None).await.is_err());
        assert_eq!(model.call_count(), 0);
    }
}
