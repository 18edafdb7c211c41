//! Layered server configuration.
//!
//! Defaults, then an optional `talkofnations.toml`, then `TON_`-prefixed
//! environment variables (`TON_BIND_ADDR`, `TON_DATABASE_URL`, ...).

use std::str::FromStr;

use config::{Config, Environment, File};
use serde::Deserialize;

use ton_error::{ConfigError, TonResult};
use ton_flows::WeatherVariant;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds
    pub bind_addr: String,
    /// Postgres connection string; absent means the seeded in-memory store
    pub database_url: Option<String>,
    /// Public base URL of the site, used in outbound links
    pub base_url: String,
    /// Directory generated artifacts are written under
    pub artifact_root: String,
    /// Public base URL artifacts are served from
    pub artifact_base_url: String,
    /// Default Gemini model for text flows
    pub gemini_model: Option<String>,
    /// Which weather flow variant runs
    pub weather_variant: String,
    /// Overall deadline for video story jobs, seconds
    pub video_deadline_secs: u64,
    /// Byline used for AI-generated drafts
    pub author_name: String,
}

impl ServerConfig {
    /// Load the layered configuration.
    pub fn load() -> TonResult<Self> {
        let loaded: Result<ServerConfig, config::ConfigError> = (|| {
            Config::builder()
                .set_default("bind_addr", "0.0.0.0:8080")?
                .set_default("base_url", "https://talkofnations.co.ke")?
                .set_default("artifact_root", "artifacts")?
                .set_default("artifact_base_url", "https://talkofnations.co.ke/static")?
                .set_default("weather_variant", "api_delegated")?
                .set_default("video_deadline_secs", 600)?
                .set_default("author_name", "Diano")?
                .add_source(File::with_name("talkofnations").required(false))
                .add_source(Environment::with_prefix("TON"))
                .build()?
                .try_deserialize()
        })();
        loaded.map_err(|e| ConfigError::new(e.to_string()).into())
    }

    /// The configured weather variant, parsed.
    pub fn weather_variant(&self) -> TonResult<WeatherVariant> {
        WeatherVariant::from_str(&self.weather_variant).map_err(|_| {
            ConfigError::new(format!(
                "unknown weather_variant '{}' (expected model_knowledge or api_delegated)",
                self.weather_variant
            ))
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parsing_accepts_both_names() {
        let mut config = ServerConfig {
            bind_addr: String::new(),
            database_url: None,
            base_url: String::new(),
            artifact_root: String::new(),
            artifact_base_url: String::new(),
            gemini_model: None,
            weather_variant: "model_knowledge".to_string(),
            video_deadline_secs: 600,
            author_name: "Diano".to_string(),
        };
        assert_eq!(
            config.weather_variant().unwrap(),
            WeatherVariant::ModelKnowledge
        );
        config.weather_variant = "api_delegated".to_string();
        assert_eq!(
            config.weather_variant().unwrap(),
            WeatherVariant::ApiDelegated
        );
        config.weather_variant = "psychic".to_string();
        assert!(config.weather_variant().is_err());
    }
}
