//! Gemini backend for Talk of Nations.
//!
//! Text generation goes through the `gemini-rust` SDK with a per-model
//! client pool. Image prediction and long-running video jobs use the raw
//! REST endpoints, which the SDK does not cover.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{GeminiClient, GeminiRest};
