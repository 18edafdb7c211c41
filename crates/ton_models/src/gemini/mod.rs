//! Google Gemini API integration.

mod client;
mod rest;

pub use client::GeminiClient;
pub use rest::GeminiRest;

/// Result type for Gemini-specific operations.
pub(crate) type GeminiResult<T> = std::result::Result<T, ton_error::GeminiError>;
