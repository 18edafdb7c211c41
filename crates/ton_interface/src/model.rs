//! Trait definitions for model backends and their capabilities.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ton_core::{GenerateRequest, GenerateResponse};
use ton_error::TonResult;

/// Core trait that all model backends must implement.
///
/// This provides the minimal interface for synchronous text generation.
/// Additional capabilities are exposed through optional traits.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Generate model output given a request.
    async fn generate(&self, req: &GenerateRequest) -> TonResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier.
    fn model_name(&self) -> &str;
}

/// A generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// MIME type of the image
    pub mime: String,
    /// Binary image data
    pub data: Vec<u8>,
}

/// Trait for backends that can generate images from a text prompt.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Generate one image for the prompt.
    async fn generate_image(&self, prompt: &str) -> TonResult<ImageData>;
}

/// Handle to a provider-side long-running video job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoJob {
    /// Provider operation name used for polling
    pub operation_name: String,
}

/// Observed state of a long-running video job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoJobStatus {
    /// Still running
    Pending,
    /// Finished; the video is downloadable at this URI
    Done {
        /// Download URI of the generated video
        uri: String,
    },
    /// Finished in a failed state
    Failed {
        /// Provider-reported failure message
        message: String,
    },
}

/// Trait for backends that can animate a still image into a short video.
///
/// Video generation is asynchronous on the provider side: `start_video`
/// returns a job handle and callers poll `poll_video` until the job is done
/// or errored.
#[async_trait]
pub trait VideoModel: Send + Sync {
    /// Kick off a video generation job from a prompt and a source image.
    async fn start_video(&self, prompt: &str, image: &ImageData) -> TonResult<VideoJob>;

    /// Check the state of a previously started job.
    async fn poll_video(&self, job: &VideoJob) -> TonResult<VideoJobStatus>;

    /// Download the finished video asset.
    async fn fetch_video(&self, uri: &str) -> TonResult<Vec<u8>>;
}
