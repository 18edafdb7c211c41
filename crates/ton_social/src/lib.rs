//! Outbound notification adapters.
//!
//! Both integrations are optional: construction reads credentials from the
//! environment and yields `None` when they are absent, and callers that try
//! anyway get an explicit `NotConfigured` failure. Every send is a single
//! attempt; nothing here retries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telegram;
mod twitter;

pub use telegram::{TelegramClient, TelegramConfig, format_post_for_telegram};
pub use twitter::{TWEET_BUDGET, TwitterClient, TwitterConfig, compose_tweet};
