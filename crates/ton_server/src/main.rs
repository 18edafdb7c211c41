//! Talk of Nations webhook server.

use std::sync::Arc;
use std::time::Duration;

use ton_error::{ConfigError, TonResult};
use ton_flows::{
    AskDianoFlow, FeatureGate, MagazineFlow, PostFlow, VideoStoryConfig, VideoStoryFlow,
    WeatherFlow,
};
use ton_interface::{ImageModel, MagazineStore, PostStore, SettingsStore, TextModel, VideoModel};
use ton_models::{GeminiClient, GeminiRest};
use ton_server::{AppState, ServerConfig, router};
use ton_social::TelegramClient;
use ton_store::{
    ArtifactStore, MemoryStore, PostgresMagazineStore, PostgresPostStore, PostgresSettingsStore,
};

#[tokio::main]
async fn main() -> TonResult<()> {
    dotenvy::dotenv().ok();
    if let Err(e) = ton_core::init_telemetry() {
        eprintln!("telemetry init failed: {e}");
    }

    let config = ServerConfig::load()?;
    let weather_variant = config.weather_variant()?;

    let model: Arc<dyn TextModel> = match &config.gemini_model {
        Some(name) => Arc::new(GeminiClient::with_default_model(name)?),
        None => Arc::new(GeminiClient::new()?),
    };
    let rest = Arc::new(GeminiRest::new()?);

    let (posts, settings, magazines): (
        Arc<dyn PostStore>,
        Arc<dyn SettingsStore>,
        Arc<dyn MagazineStore>,
    ) = match &config.database_url {
        Some(url) => {
            let pool = ton_store::build_pool(url)?;
            ton_store::run_migrations(&pool)?;
            tracing::info!("Connected to Postgres");
            (
                Arc::new(PostgresPostStore::new(pool.clone())),
                Arc::new(PostgresSettingsStore::new(pool.clone())),
                Arc::new(PostgresMagazineStore::new(pool)),
            )
        }
        None => {
            tracing::warn!("No database_url configured, serving the seeded in-memory store");
            let store = Arc::new(MemoryStore::seeded());
            (
                store.clone() as Arc<dyn PostStore>,
                store.clone() as Arc<dyn SettingsStore>,
                store as Arc<dyn MagazineStore>,
            )
        }
    };

    let gate = FeatureGate::new(settings);
    let ask = Arc::new(AskDianoFlow::new(model.clone(), gate.clone(), posts.clone()));
    let weather = Arc::new(WeatherFlow::new(model.clone(), gate.clone(), weather_variant));
    let drafting = Arc::new(PostFlow::new(model.clone(), gate.clone()));
    let magazine = Arc::new(MagazineFlow::new(model, gate));
    let video = Arc::new(
        VideoStoryFlow::new(
            rest.clone() as Arc<dyn ImageModel>,
            rest as Arc<dyn VideoModel>,
        )
        .with_config(VideoStoryConfig {
            deadline: Duration::from_secs(config.video_deadline_secs),
            ..VideoStoryConfig::default()
        }),
    );
    let artifacts = Arc::new(ArtifactStore::new(
        &config.artifact_root,
        &config.artifact_base_url,
    ));

    let telegram = TelegramClient::from_env();
    if telegram.is_none() {
        tracing::warn!("Telegram integration not configured, webhook replies will be dropped");
    }

    let state = AppState {
        ask,
        weather,
        drafting,
        magazine,
        video,
        posts,
        magazines,
        artifacts,
        telegram,
        base_url: config.base_url.clone(),
        author_name: config.author_name.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| ConfigError::new(format!("cannot bind {}: {e}", config.bind_addr)))?;
    tracing::info!(addr = %config.bind_addr, "Talk of Nations server listening");
    axum::serve(listener, router(state))
        .await
        .map_err(|e| ConfigError::new(e.to_string()))?;
    Ok(())
}
