//! Talk of Nations - AI-assisted publishing platform
//!
//! Talk of Nations pairs a conventional news/lifestyle CMS with a set of
//! AI flows that draft, illustrate, and distribute content. Every flow is
//! gated behind an editor-controlled feature flag and makes at most one
//! model call per invocation.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use talkofnations::{FeatureGate, GeminiClient, MemoryStore, SlugFlow};
//!
//! #[tokio::main]
//! async fn main() -> talkofnations::TonResult<()> {
//!     let model = Arc::new(GeminiClient::new()?);
//!     let store = Arc::new(MemoryStore::seeded());
//!     let gate = FeatureGate::new(store);
//!     let flow = SlugFlow::new(model, gate);
//!     let slug = flow.generate("Kenya Launches New Tech Hub").await?;
//!     println!("{slug}");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The workspace is organized as focused crates:
//!
//! - `ton_core` - Model-agnostic request/response types
//! - `ton_interface` - Model and store traits
//! - `ton_error` - Error types
//! - `ton_content` - Domain types (posts, magazines, settings, chat)
//! - `ton_models` - Gemini provider implementations
//! - `ton_store` - Postgres stores with fixture fallback, in-memory store
//! - `ton_flows` - Feature gate and flow orchestrators
//! - `ton_social` - Telegram and Twitter/X outbound adapters
//! - `ton_render` - Magazine PDF and plain-text rendering
//! - `ton_server` - Axum webhook server binary
//!
//! This crate (`talkofnations`) re-exports the library surface for
//! convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use ton_content::{
    Advertisement, AiFeature, AiFeatureFlags, Block, ChatMessage, ChatRole, ChatSession,
    ElectionCountdown, Magazine, MagazineContent, MagazineSection, PartialAiFlags, Post,
    PostStatus, PostSummary, SourceRef, SudokuPair, TAG_VOCABULARY, VideoEmbed,
    normalize_content,
};
pub use ton_core::{
    GenerateRequest, GenerateResponse, Input, MediaSource, Message, Output, Role, init_telemetry,
};
pub use ton_error::{
    ConfigError, FlowError, FlowErrorKind, GeminiError, GeminiErrorKind, RenderError,
    RenderErrorKind, SocialError, SocialErrorKind, StoreError, StoreErrorKind, TonError,
    TonErrorKind, TonResult,
};
pub use ton_flows::{
    AskDianoFlow, AskInput, AskOutput, CoverImageFlow, FeatureGate, Forecast, ForecastDay,
    ICON_VOCABULARY, MagazineFlow, PostDraft, PostFlow, SlugFlow, TopicFlow, VideoStory,
    VideoStoryConfig, VideoStoryFlow, WeatherFlow, WeatherVariant, extract_json,
    icon_for_condition_code, parse_json, slugify, unique_slug,
};
pub use ton_interface::{
    AdStore, ChatStore, ImageData, ImageModel, MagazineStore, PostFilter, PostStore,
    SettingsStore, TextModel, VideoJob, VideoJobStatus, VideoModel, VideoStore,
};
pub use ton_models::{GeminiClient, GeminiRest};
pub use ton_render::{render_pdf, render_text};
pub use ton_social::{
    TWEET_BUDGET, TelegramClient, TelegramConfig, TwitterClient, TwitterConfig, compose_tweet,
    format_post_for_telegram,
};
pub use ton_store::{
    ArtifactStore, MemoryStore, PgPool, PostgresAdStore, PostgresChatStore, PostgresMagazineStore,
    PostgresPostStore, PostgresSettingsStore, PostgresVideoStore, apply_post_filter, build_pool,
    fixtures, run_migrations,
};
