//! Singleton configuration documents.

use serde::{Deserialize, Serialize};

/// The fixed, enumerated set of gated AI capabilities.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AiFeature {
    /// AI slug generation for post titles
    UrlSlugGeneration,
    /// Weather forecast widget
    WeatherForecast,
    /// Full post drafting from a topic
    PostGeneration,
    /// Topic suggestion for the admin dashboard
    TopicSuggestion,
    /// Weekly magazine assembly
    MagazineGeneration,
    /// Cover image generation
    CoverImageGeneration,
    /// The Ask Diano chat assistant
    AskDiano,
}

/// Resolved feature flags. Every known key always has a boolean value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiFeatureFlags {
    /// AI slug generation
    pub url_slug_generation: bool,
    /// Weather forecast widget
    pub weather_forecast: bool,
    /// Full post drafting
    pub post_generation: bool,
    /// Topic suggestion
    pub topic_suggestion: bool,
    /// Weekly magazine assembly
    pub magazine_generation: bool,
    /// Cover image generation
    pub cover_image_generation: bool,
    /// The Ask Diano assistant
    pub ask_diano: bool,
}

impl Default for AiFeatureFlags {
    /// Every capability defaults to enabled.
    fn default() -> Self {
        Self {
            url_slug_generation: true,
            weather_forecast: true,
            post_generation: true,
            topic_suggestion: true,
            magazine_generation: true,
            cover_image_generation: true,
            ask_diano: true,
        }
    }
}

impl AiFeatureFlags {
    /// Look up one feature's value.
    pub fn get(&self, feature: AiFeature) -> bool {
        match feature {
            AiFeature::UrlSlugGeneration => self.url_slug_generation,
            AiFeature::WeatherForecast => self.weather_forecast,
            AiFeature::PostGeneration => self.post_generation,
            AiFeature::TopicSuggestion => self.topic_suggestion,
            AiFeature::MagazineGeneration => self.magazine_generation,
            AiFeature::CoverImageGeneration => self.cover_image_generation,
            AiFeature::AskDiano => self.ask_diano,
        }
    }

    /// Overlay a partial document on top of these flags. Missing keys keep
    /// their current value, so a partially-written config never produces a
    /// false-by-omission.
    pub fn merged(mut self, partial: &PartialAiFlags) -> Self {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if let Some(value) = partial.$field {
                    self.$field = value;
                })*
            };
        }
        overlay!(
            url_slug_generation,
            weather_forecast,
            post_generation,
            topic_suggestion,
            magazine_generation,
            cover_image_generation,
            ask_diano
        );
        self
    }
}

/// The feature-flag document as stored: any subset of keys may be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialAiFlags {
    /// AI slug generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_slug_generation: Option<bool>,
    /// Weather forecast widget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_forecast: Option<bool>,
    /// Full post drafting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_generation: Option<bool>,
    /// Topic suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_suggestion: Option<bool>,
    /// Weekly magazine assembly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magazine_generation: Option<bool>,
    /// Cover image generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_generation: Option<bool>,
    /// The Ask Diano assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_diano: Option<bool>,
}

impl From<AiFeatureFlags> for PartialAiFlags {
    fn from(flags: AiFeatureFlags) -> Self {
        Self {
            url_slug_generation: Some(flags.url_slug_generation),
            weather_forecast: Some(flags.weather_forecast),
            post_generation: Some(flags.post_generation),
            topic_suggestion: Some(flags.topic_suggestion),
            magazine_generation: Some(flags.magazine_generation),
            cover_image_generation: Some(flags.cover_image_generation),
            ask_diano: Some(flags.ask_diano),
        }
    }
}

/// The election countdown banner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionCountdown {
    /// Banner title
    pub title: String,
    /// Target date, ISO 8601 (YYYY-MM-DD)
    pub target_date: String,
    /// Whether the banner is shown
    pub enabled: bool,
}

impl Default for ElectionCountdown {
    fn default() -> Self {
        Self {
            title: "Kenya General Election".to_string(),
            target_date: "2027-08-10".to_string(),
            enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn defaults_are_all_enabled() {
        let flags = AiFeatureFlags::default();
        for feature in AiFeature::iter() {
            assert!(flags.get(feature), "{feature} should default to enabled");
        }
    }

    #[test]
    fn merge_keeps_defaults_for_missing_keys() {
        let partial = PartialAiFlags {
            magazine_generation: Some(false),
            ..Default::default()
        };
        let merged = AiFeatureFlags::default().merged(&partial);
        assert!(!merged.get(AiFeature::MagazineGeneration));
        // Keys absent from the document resolve to their defaults, not false.
        assert!(merged.get(AiFeature::AskDiano));
        assert!(merged.get(AiFeature::UrlSlugGeneration));
    }

    #[test]
    fn feature_keys_serialize_snake_case() {
        let json = serde_json::to_string(&AiFeature::AskDiano).unwrap();
        assert_eq!(json, "\"ask_diano\"");
    }

    #[test]
    fn partial_flags_round_trip() {
        let partial: PartialAiFlags = AiFeatureFlags::default().into();
        let json = serde_json::to_value(&partial).unwrap();
        let back: PartialAiFlags = serde_json::from_value(json).unwrap();
        assert_eq!(partial, back);
    }
}
