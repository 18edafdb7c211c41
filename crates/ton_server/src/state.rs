//! Shared application state.

use std::sync::Arc;

use ton_flows::{AskDianoFlow, MagazineFlow, PostFlow, VideoStoryFlow, WeatherFlow};
use ton_interface::{MagazineStore, PostStore};
use ton_social::TelegramClient;
use ton_store::ArtifactStore;

/// State handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    /// The assistant flow behind the Telegram webhook
    pub ask: Arc<AskDianoFlow>,
    /// Weather forecast flow, in the configured variant
    pub weather: Arc<WeatherFlow>,
    /// Article drafting flow
    pub drafting: Arc<PostFlow>,
    /// Magazine assembly flow
    pub magazine: Arc<MagazineFlow>,
    /// Video story flow
    pub video: Arc<VideoStoryFlow>,
    /// Post persistence
    pub posts: Arc<dyn PostStore>,
    /// Magazine record persistence
    pub magazines: Arc<dyn MagazineStore>,
    /// Rendered-PDF storage
    pub artifacts: Arc<ArtifactStore>,
    /// Telegram client, when the integration is configured
    pub telegram: Option<TelegramClient>,
    /// Public site base URL, used in links returned to callers
    pub base_url: String,
    /// Byline for AI-generated drafts
    pub author_name: String,
}
