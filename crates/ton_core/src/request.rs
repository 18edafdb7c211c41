//! Request and response types for model generation.

use crate::{Message, Output};
use serde::{Deserialize, Serialize};

/// Generic generation request (multimodal-safe).
///
/// # Examples
///
/// ```
/// use ton_core::{GenerateRequest, Message, Role};
///
/// let request = GenerateRequest {
///     messages: vec![Message::text(Role::User, "Suggest a headline")],
///     max_tokens: Some(256),
///     temperature: Some(0.7),
///     model: None,
/// };
/// assert_eq!(request.messages.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 1.0)
    pub temperature: Option<f32>,
    /// Model identifier to use (None = client default)
    pub model: Option<String>,
}

/// The unified response object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Concatenated text of all text outputs, or None if there is no text.
    pub fn text(&self) -> Option<String> {
        let text: Vec<&str> = self.outputs.iter().filter_map(Output::as_text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text.join("\n"))
        }
    }
}
