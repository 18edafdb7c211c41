//! HTTP routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use ton_content::{Magazine, PostSummary};
use ton_error::{FlowErrorKind, TonError, TonErrorKind};
use ton_flows::{AskInput, Forecast, unique_slug};
use ton_interface::{MagazineStore, PostFilter, PostStore};
use ton_render::render_pdf;

use crate::state::AppState;

const EXCERPT_CHARS: usize = 300;

type ApiError = (StatusCode, Json<Value>);

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/weather", get(weather))
        .route("/api/telegram/webhook", post(telegram_webhook))
        .route("/api/admin/posts", post(create_draft))
        .route("/api/admin/magazines", post(assemble_magazine))
        .route("/api/admin/video-stories", post(create_video_story))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Map a flow/store failure onto an HTTP response.
fn error_response(e: TonError) -> ApiError {
    let status = match e.kind() {
        TonErrorKind::Flow(f) => match &f.kind {
            FlowErrorKind::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FlowErrorKind::FeatureDisabled(_) => StatusCode::FORBIDDEN,
            FlowErrorKind::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        },
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({"error": e.to_string()})))
}

/// Query parameters for the weather widget.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherQuery {
    /// Display name of the location
    pub location: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

async fn weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<Forecast>, ApiError> {
    state
        .weather
        .forecast(&query.location, query.latitude, query.longitude)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Request body for drafting an article.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    /// Topic to write about
    pub topic: String,
}

async fn create_draft(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut draft = state
        .drafting
        .generate(&req.topic)
        .await
        .map_err(error_response)?;
    draft.slug = unique_slug(state.posts.as_ref(), &draft.slug, None)
        .await
        .map_err(error_response)?;
    let post = draft.into_post(state.author_name.clone());
    state.posts.create(&post).await.map_err(error_response)?;
    tracing::info!(slug = %post.slug, "Draft created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": post.id,
            "slug": post.slug,
            "title": post.title,
            "status": post.status,
            "url": format!("{}/posts/{}", state.base_url, post.slug),
        })),
    ))
}

async fn assemble_magazine(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let posts = state.posts.list(&PostFilter::published()).await;
    let summaries: Vec<PostSummary> = posts
        .iter()
        .map(|p| PostSummary {
            id: p.id,
            title: p.title.clone(),
            slug: p.slug.clone(),
            excerpt: p.snippet(EXCERPT_CHARS),
            tags: p.tags.clone(),
            cover_image: p.cover_image.clone(),
        })
        .collect();

    let content = state
        .magazine
        .generate(&summaries)
        .await
        .map_err(error_response)?;
    let pdf = render_pdf(&content, &summaries).map_err(error_response)?;
    let file_url = state
        .artifacts
        .store_magazine_pdf(&pdf)
        .await
        .map_err(error_response)?;

    let record = Magazine {
        id: Uuid::new_v4(),
        title: content.title.clone(),
        file_url,
        post_ids: summaries.iter().map(|s| s.id).collect(),
        created_at: Utc::now().naive_utc(),
    };
    state
        .magazines
        .create(&record)
        .await
        .map_err(error_response)?;
    tracing::info!(title = %record.title, url = %record.file_url, "Magazine published");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": record.id,
            "title": record.title,
            "file_url": record.file_url,
            "post_count": record.post_ids.len(),
        })),
    ))
}

/// Request body for a video story.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoStoryRequest {
    /// Story prompt
    pub prompt: String,
}

async fn create_video_story(
    State(state): State<AppState>,
    Json(req): Json<VideoStoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let story = state
        .video
        .generate(&req.prompt)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({
        "video_mime": story.video_mime,
        "video_base64": story.video_base64,
        "character_image_mime": story.character_image.mime,
    })))
}

/// The subset of a Telegram bot update the webhook cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    /// The incoming message, if this update carries one
    pub message: Option<TelegramMessage>,
}

/// An incoming Telegram message.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    /// The chat the message arrived in
    pub chat: TelegramChat,
    /// Message text, if any
    pub text: Option<String>,
}

/// The chat a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    /// Telegram chat id
    pub id: i64,
}

/// Acknowledge the transport immediately and process the update on a
/// spawned task; failures are logged, never surfaced to Telegram.
async fn telegram_webhook(
    State(state): State<AppState>,
    Json(update): Json<TelegramUpdate>,
) -> Json<Value> {
    tokio::spawn(async move {
        if let Err(e) = dispatch_update(state, update).await {
            tracing::error!(error = %e, "Telegram update dispatch failed");
        }
    });
    Json(json!({"status": "ok"}))
}

async fn dispatch_update(
    state: AppState,
    update: TelegramUpdate,
) -> ton_error::TonResult<()> {
    let Some(message) = update.message else {
        tracing::debug!("Update without message, ignoring");
        return Ok(());
    };
    let Some(text) = message.text.filter(|t| !t.trim().is_empty()) else {
        tracing::debug!("Message without text, ignoring");
        return Ok(());
    };

    let output = state
        .ask
        .ask(&AskInput {
            question: text,
            history: Vec::new(),
        })
        .await?;
    let reply = match output.clarifying_question {
        Some(question) if output.answer.trim().is_empty() => question,
        _ => output.answer,
    };

    match &state.telegram {
        Some(telegram) => {
            telegram
                .send_message(&message.chat.id.to_string(), &reply, None)
                .await
        }
        None => {
            tracing::warn!("Telegram reply dropped: integration not configured");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ton_error::FlowError;

    #[test]
    fn update_payload_parses() {
        let raw = r#"{
            "update_id": 10,
            "message": {
                "message_id": 5,
                "chat": {"id": 12345, "type": "private"},
                "text": "What did you write about matatus?"
            }
        }"#;
        let update: TelegramUpdate = serde_json::from_str(raw).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 12345);
        assert!(message.text.unwrap().contains("matatus"));
    }

    #[test]
    fn update_without_message_parses() {
        let update: TelegramUpdate = serde_json::from_str(r#"{"update_id": 11}"#).unwrap();
        assert!(update.message.is_none());
    }

    #[test]
    fn flow_errors_map_to_useful_statuses() {
        let cases: [(TonError, StatusCode); 4] = [
            (
                FlowError::validation("empty topic").into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                FlowError::new(FlowErrorKind::FeatureDisabled("ask_diano".to_string())).into(),
                StatusCode::FORBIDDEN,
            ),
            (
                FlowError::new(FlowErrorKind::Timeout { elapsed_secs: 600 }).into(),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                FlowError::upstream("provider 503").into(),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(error_response(err).0, expected);
        }
    }
}
