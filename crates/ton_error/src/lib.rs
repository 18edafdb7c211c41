//! Error types for the Talk of Nations publishing platform.
//!
//! This crate provides the foundation error types used throughout the
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use ton_error::{TonResult, FlowError, FlowErrorKind};
//!
//! fn suggest_topics() -> TonResult<Vec<String>> {
//!     Err(FlowError::new(FlowErrorKind::ModelOutput(
//!         "empty response".to_string(),
//!     )))?
//! }
//!
//! assert!(suggest_topics().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod flow;
mod gemini;
mod render;
mod social;
mod store;

pub use config::ConfigError;
pub use error::{TonError, TonErrorKind, TonResult};
pub use flow::{FlowError, FlowErrorKind};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use render::{RenderError, RenderErrorKind};
pub use social::{SocialError, SocialErrorKind};
pub use store::{StoreError, StoreErrorKind};
