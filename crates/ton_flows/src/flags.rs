//! The feature-flag gate in front of every AI capability.

use std::sync::Arc;

use ton_content::{AiFeature, AiFeatureFlags, PartialAiFlags};
use ton_error::{FlowError, FlowErrorKind, TonResult};
use ton_interface::SettingsStore;

/// Gates each AI capability on its persisted flag.
///
/// The settings store is injected rather than ambient so tests can substitute
/// a fixed map. Every check re-reads the store (no caching); a failed read
/// logs a warning and resolves from the built-in defaults, so a broken
/// settings document can never take a capability offline by accident.
#[derive(Clone)]
pub struct FeatureGate {
    settings: Arc<dyn SettingsStore>,
}

impl FeatureGate {
    /// Create a gate over the given settings store.
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    /// The full resolved flag map (defaults merged with the stored document).
    pub async fn flags(&self) -> AiFeatureFlags {
        match self.settings.ai_flags().await {
            Ok(partial) => AiFeatureFlags::default().merged(&partial),
            Err(e) => {
                tracing::warn!(error = %e, "Flag read failed, resolving from defaults");
                AiFeatureFlags::default()
            }
        }
    }

    /// Whether one capability is currently enabled.
    pub async fn is_enabled(&self, feature: AiFeature) -> bool {
        self.flags().await.get(feature)
    }

    /// Merge-write new flag values and return the resolved map.
    pub async fn update(&self, partial: &PartialAiFlags) -> TonResult<AiFeatureFlags> {
        self.settings.set_ai_flags(partial).await?;
        Ok(self.flags().await)
    }

    /// Fail with `FeatureDisabled` unless the capability is enabled.
    pub(crate) async fn require(&self, feature: AiFeature) -> Result<(), FlowError> {
        if self.is_enabled(feature).await {
            Ok(())
        } else {
            Err(FlowError::new(FlowErrorKind::FeatureDisabled(
                feature.to_string(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ton_store::MemoryStore;

    #[tokio::test]
    async fn missing_keys_resolve_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_ai_flags(&PartialAiFlags {
                magazine_generation: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        let gate = FeatureGate::new(store);
        assert!(!gate.is_enabled(AiFeature::MagazineGeneration).await);
        // Keys absent from the stored document fall back to their defaults.
        assert!(gate.is_enabled(AiFeature::AskDiano).await);
        assert!(gate.is_enabled(AiFeature::UrlSlugGeneration).await);
    }

    #[tokio::test]
    async fn update_merges_and_returns_resolved_map() {
        let gate = FeatureGate::new(Arc::new(MemoryStore::new()));
        let flags = gate
            .update(&PartialAiFlags {
                post_generation: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!flags.post_generation);
        assert!(flags.weather_forecast);
    }
}
