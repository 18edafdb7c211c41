//! Video story generation: character image, animation job, polling, fetch.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::instrument;

use ton_error::{FlowError, FlowErrorKind, TonResult};
use ton_interface::{ImageData, ImageModel, VideoJobStatus, VideoModel};

/// Polling cadence and overall deadline for the provider-side video job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoStoryConfig {
    /// How often to poll the job
    pub poll_interval: Duration,
    /// Hard ceiling on total wall-clock time before `Timeout`
    pub deadline: Duration,
}

impl Default for VideoStoryConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            deadline: Duration::from_secs(600),
        }
    }
}

/// A finished video story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStory {
    /// The generated character image
    pub character_image: ImageData,
    /// MIME type of the video
    pub video_mime: String,
    /// The video asset, base64-encoded for direct embedding
    pub video_base64: String,
}

/// Orchestrates the two dependent model calls behind a video story.
///
/// Any stage failing fails the whole operation; there is no partial-success
/// state. The polling loop carries an overall deadline and honors a
/// cancellation signal, so a provider-side stuck job cannot pin the caller
/// forever.
pub struct VideoStoryFlow {
    image_model: Arc<dyn ImageModel>,
    video_model: Arc<dyn VideoModel>,
    config: VideoStoryConfig,
}

impl VideoStoryFlow {
    /// Create the flow with default polling configuration.
    pub fn new(image_model: Arc<dyn ImageModel>, video_model: Arc<dyn VideoModel>) -> Self {
        Self {
            image_model,
            video_model,
            config: VideoStoryConfig::default(),
        }
    }

    /// Override the polling configuration.
    pub fn with_config(mut self, config: VideoStoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Generate a video story, without external cancellation.
    pub async fn generate(&self, prompt: &str) -> TonResult<VideoStory> {
        let (_tx, rx) = watch::channel(false);
        self.generate_with_cancel(prompt, rx).await
    }

    /// Generate a video story. Sending `true` on the paired watch channel
    /// cancels the wait (the provider-side job is left to expire on its own).
    #[instrument(skip(self, cancel))]
    pub async fn generate_with_cancel(
        &self,
        prompt: &str,
        mut cancel: watch::Receiver<bool>,
    ) -> TonResult<VideoStory> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(FlowError::validation("prompt must not be empty").into());
        }

        let image_prompt = format!(
            "A single expressive character for a short Kenyan story video: {prompt}. \
             Cinematic, warm light, centered subject."
        );
        let image = self.image_model.generate_image(&image_prompt).await?;
        let job = self.video_model.start_video(prompt, &image).await?;
        tracing::info!(operation = %job.operation_name, "Video job started");

        let started = Instant::now();
        let uri = loop {
            if *cancel.borrow() {
                return Err(FlowError::new(FlowErrorKind::Cancelled).into());
            }
            match self.video_model.poll_video(&job).await? {
                VideoJobStatus::Done { uri } => break uri,
                VideoJobStatus::Failed { message } => {
                    return Err(
                        FlowError::upstream(format!("video job failed: {message}")).into(),
                    );
                }
                VideoJobStatus::Pending => {}
            }
            if started.elapsed() >= self.config.deadline {
                return Err(FlowError::new(FlowErrorKind::Timeout {
                    elapsed_secs: started.elapsed().as_secs(),
                })
                .into());
            }
            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval) => {}
                changed = cancel.changed() => {
                    if changed.is_ok() && *cancel.borrow() {
                        return Err(FlowError::new(FlowErrorKind::Cancelled).into());
                    }
                }
            }
        };

        let bytes = self.video_model.fetch_video(&uri).await?;
        if bytes.is_empty() {
            return Err(FlowError::model_output("video asset is empty").into());
        }
        Ok(VideoStory {
            character_image: image,
            video_mime: "video/mp4".to_string(),
            video_base64: BASE64.encode(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{MockImageModel, MockVideoModel};

    fn flow(video: MockVideoModel) -> VideoStoryFlow {
        VideoStoryFlow::new(Arc::new(MockImageModel::new()), Arc::new(video))
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_done_and_encodes_the_asset() {
        let flow = flow(MockVideoModel::completing_after(3));
        let story = flow.generate("a matatu driver's morning").await.unwrap();
        assert_eq!(story.video_mime, "video/mp4");
        assert_eq!(
            BASE64.decode(&story.video_base64).unwrap(),
            b"mock-video-bytes"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_job_times_out() {
        let flow = flow(MockVideoModel::completing_after(usize::MAX)).with_config(
            VideoStoryConfig {
                poll_interval: Duration::from_secs(5),
                deadline: Duration::from_secs(30),
            },
        );
        let err = flow.generate("endless render").await.unwrap_err();
        assert!(matches!(
            err.kind(),
            ton_error::TonErrorKind::Flow(f)
                if matches!(f.kind, FlowErrorKind::Timeout { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn provider_failure_is_fatal() {
        let flow = flow(MockVideoModel::failing());
        let err = flow.generate("doomed").await.unwrap_err();
        assert!(err.to_string().contains("video job failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_wait() {
        let flow = flow(MockVideoModel::completing_after(usize::MAX));
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            flow.generate_with_cancel("long story", rx).await
        });
        tokio::time::sleep(Duration::from_secs(7)).await;
        tx.send(true).unwrap();
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(
            err.kind(),
            ton_error::TonErrorKind::Flow(f)
                if matches!(f.kind, FlowErrorKind::Cancelled)
        ));
    }
}
