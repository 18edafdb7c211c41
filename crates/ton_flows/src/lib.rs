//! Feature-flag gate and the AI flow orchestrators.
//!
//! Every flow follows the same shape: validate caller input, consult the
//! [`FeatureGate`], build a prompt that describes the required JSON output,
//! call the model exactly once per external step, extract and parse the JSON,
//! validate semantic constraints, and hand the typed result back. Callers are
//! responsible for persistence. No flow retries a failed call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ask;
mod cover;
mod extraction;
mod flags;
mod magazine;
mod post;
mod slug;
mod topics;
mod video_story;
mod weather;

pub use ask::{AskDianoFlow, AskInput, AskOutput};
pub use cover::CoverImageFlow;
pub use extraction::{extract_json, parse_json};
pub use flags::FeatureGate;
pub use magazine::MagazineFlow;
pub use post::{PostDraft, PostFlow};
pub use slug::{SlugFlow, slugify, unique_slug};
pub use topics::TopicFlow;
pub use video_story::{VideoStory, VideoStoryConfig, VideoStoryFlow};
pub use weather::{
    Forecast, ForecastDay, ICON_VOCABULARY, WeatherFlow, WeatherVariant, icon_for_condition_code,
};

#[cfg(test)]
pub(crate) mod test_util;
