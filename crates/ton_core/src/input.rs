//! Input types for model requests.

use serde::{Deserialize, Serialize};

/// Where media content comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MediaSource {
    /// Publicly reachable URL
    Url(String),
    /// Base64-encoded payload
    Base64(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

/// Supported input types to the model.
///
/// # Examples
///
/// ```
/// use ton_core::{Input, MediaSource};
///
/// let text = Input::Text("Hello".to_string());
/// let image = Input::Image {
///     mime: Some("image/png".to_string()),
///     source: MediaSource::Url("https://example.com/cover.png".to_string()),
/// };
/// assert_ne!(text, image);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),

    /// Image input (used by the video-story flow to animate a still).
    Image {
        /// MIME type, e.g., "image/png"
        mime: Option<String>,
        /// Media source (URL, base64, or raw bytes)
        source: MediaSource,
    },
}
