//! Trait definitions for model backends and persistence stores.
//!
//! These are the seams between the flow orchestrators and the outside world:
//! flows depend only on these traits, so tests substitute mocks and the
//! server wires in the real Gemini and Postgres implementations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod model;
mod store;

pub use model::{ImageData, ImageModel, TextModel, VideoJob, VideoJobStatus, VideoModel};
pub use store::{
    AdStore, ChatStore, MagazineStore, PostFilter, PostStore, SettingsStore, VideoStore,
};
