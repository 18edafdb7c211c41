//! Raw REST calls for image prediction and long-running video jobs.
//!
//! The `gemini-rust` SDK covers text generation only; image prediction and
//! the Veo long-running video operations are addressed directly.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ton_error::{GeminiError, GeminiErrorKind, TonResult};
use ton_interface::{ImageData, ImageModel, VideoJob, VideoJobStatus, VideoModel};

use super::GeminiResult;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";
const DEFAULT_VIDEO_MODEL: &str = "veo-2.0-generate-001";

/// REST client for the prediction and long-running-operation endpoints.
pub struct GeminiRest {
    http: reqwest::Client,
    api_key: String,
    image_model: String,
    video_model: String,
}

impl std::fmt::Debug for GeminiRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiRest")
            .field("image_model", &self.image_model)
            .field("video_model", &self.video_model)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictInstance {
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<InlineImage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineImage {
    bytes_base64_encoded: String,
    mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OperationHandle {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
    video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
struct VideoRef {
    uri: Option<String>,
}

impl GeminiRest {
    /// Create a REST client from the `GEMINI_API_KEY` environment variable.
    pub fn new() -> TonResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_model: DEFAULT_VIDEO_MODEL.to_string(),
        })
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &B,
    ) -> GeminiResult<R> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        response
            .json()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))
    }

    async fn get_json<R: for<'de> Deserialize<'de>>(&self, url: &str) -> GeminiResult<R> {
        let response = self
            .http
            .get(url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        response
            .json()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))
    }
}

#[async_trait]
impl ImageModel for GeminiRest {
    #[instrument(skip(self, prompt), fields(model = %self.image_model))]
    async fn generate_image(&self, prompt: &str) -> TonResult<ImageData> {
        let url = format!("{}/models/{}:predict", API_BASE, self.image_model);
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
                image: None,
            }],
            parameters: PredictParameters { sample_count: 1 },
        };

        let response: PredictResponse = self.post_json(&url, &body).await?;

        let prediction = response
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::EmptyResponse))?;

        let encoded = prediction
            .bytes_base64_encoded
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::EmptyResponse))?;

        let data = BASE64.decode(encoded.as_bytes()).map_err(|e| {
            GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                "invalid base64 in prediction: {}",
                e
            )))
        })?;

        Ok(ImageData {
            mime: prediction.mime_type.unwrap_or_else(|| "image/png".to_string()),
            data,
        })
    }
}

#[async_trait]
impl VideoModel for GeminiRest {
    #[instrument(skip(self, prompt, image), fields(model = %self.video_model))]
    async fn start_video(&self, prompt: &str, image: &ImageData) -> TonResult<VideoJob> {
        let url = format!("{}/models/{}:predictLongRunning", API_BASE, self.video_model);
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
                image: Some(InlineImage {
                    bytes_base64_encoded: BASE64.encode(&image.data),
                    mime_type: image.mime.clone(),
                }),
            }],
            parameters: PredictParameters { sample_count: 1 },
        };

        let handle: OperationHandle = self.post_json(&url, &body).await?;
        tracing::info!(operation = %handle.name, "Started video generation job");

        Ok(VideoJob {
            operation_name: handle.name,
        })
    }

    async fn poll_video(&self, job: &VideoJob) -> TonResult<VideoJobStatus> {
        let url = format!("{}/{}", API_BASE, job.operation_name);
        let op: Operation = self.get_json(&url).await?;

        if !op.done {
            return Ok(VideoJobStatus::Pending);
        }

        if let Some(error) = op.error {
            return Ok(VideoJobStatus::Failed {
                message: error.message,
            });
        }

        let uri = op
            .response
            .and_then(|r| r.generate_video_response)
            .and_then(|r| r.generated_samples.into_iter().next())
            .and_then(|s| s.video)
            .and_then(|v| v.uri);

        match uri {
            Some(uri) => Ok(VideoJobStatus::Done { uri }),
            None => Ok(VideoJobStatus::Failed {
                message: "operation finished without a video sample".to_string(),
            }),
        }
    }

    async fn fetch_video(&self, uri: &str) -> TonResult<Vec<u8>> {
        let response = self
            .http
            .get(uri)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message: format!("video download failed from {}", uri),
            })
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        Ok(bytes.to_vec())
    }
}
