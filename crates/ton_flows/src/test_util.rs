//! Shared mocks for flow tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ton_core::{GenerateRequest, GenerateResponse, Output};
use ton_error::{FlowError, TonResult};
use ton_interface::{ImageData, ImageModel, TextModel, VideoJob, VideoJobStatus, VideoModel};

/// A scripted text model that replays canned responses and counts calls.
pub(crate) struct MockModel {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl MockModel {
    pub(crate) fn scripted(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `generate` was invoked.
    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextModel for MockModel {
    async fn generate(&self, _req: &GenerateRequest) -> TonResult<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next {
            Some(text) => Ok(GenerateResponse {
                outputs: vec![Output::Text(text)],
            }),
            None => Err(FlowError::upstream("mock model exhausted").into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// An image model that always returns a tiny PNG payload.
pub(crate) struct MockImageModel {
    calls: AtomicUsize,
}

impl MockImageModel {
    pub(crate) fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageModel for MockImageModel {
    async fn generate_image(&self, _prompt: &str) -> TonResult<ImageData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ImageData {
            mime: "image/png".to_string(),
            data: vec![0x89, 0x50, 0x4e, 0x47],
        })
    }
}

/// A video model whose job reports `Pending` a fixed number of times before
/// completing (or failing).
pub(crate) struct MockVideoModel {
    pending_polls: AtomicUsize,
    fail: bool,
}

impl MockVideoModel {
    pub(crate) fn completing_after(pending_polls: usize) -> Self {
        Self {
            pending_polls: AtomicUsize::new(pending_polls),
            fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            pending_polls: AtomicUsize::new(0),
            fail: true,
        }
    }
}

#[async_trait]
impl VideoModel for MockVideoModel {
    async fn start_video(&self, _prompt: &str, _image: &ImageData) -> TonResult<VideoJob> {
        Ok(VideoJob {
            operation_name: "operations/mock-123".to_string(),
        })
    }

    async fn poll_video(&self, _job: &VideoJob) -> TonResult<VideoJobStatus> {
        if self.fail {
            return Ok(VideoJobStatus::Failed {
                message: "mock provider failure".to_string(),
            });
        }
        let remaining = self.pending_polls.load(Ordering::SeqCst);
        if remaining > 0 {
            self.pending_polls.store(remaining - 1, Ordering::SeqCst);
            Ok(VideoJobStatus::Pending)
        } else {
            Ok(VideoJobStatus::Done {
                uri: "https://example.com/video.mp4".to_string(),
            })
        }
    }

    async fn fetch_video(&self, _uri: &str) -> TonResult<Vec<u8>> {
        Ok(b"mock-video-bytes".to_vec())
    }
}
