//! Domain entities for the Talk of Nations publishing platform.
//!
//! Everything the store persists and the flows produce lives here: posts and
//! their block-list content, advertisements, video embeds, magazines with
//! their generated structure, chat sessions, and the singleton configuration
//! documents.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ads;
mod chat;
mod magazine;
mod post;
mod settings;

pub use ads::{Advertisement, VideoEmbed};
pub use chat::{ChatMessage, ChatRole, ChatSession, SourceRef};
pub use magazine::{Magazine, MagazineContent, MagazineSection, PostSummary, SudokuPair};
pub use post::{Block, Post, PostStatus, TAG_VOCABULARY, normalize_content};
pub use settings::{AiFeature, AiFeatureFlags, ElectionCountdown, PartialAiFlags};
