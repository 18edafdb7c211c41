//! Webhook server and application wiring.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod routes;
mod state;

pub use config::ServerConfig;
pub use routes::{
    DraftRequest, TelegramChat, TelegramMessage, TelegramUpdate, VideoStoryRequest, WeatherQuery,
    router,
};
pub use state::AppState;
