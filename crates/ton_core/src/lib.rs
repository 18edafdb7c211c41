//! Core data types for Talk of Nations model calls.
//!
//! This crate provides the model-agnostic plumbing shared by every flow:
//! conversation messages, request/response envelopes, and telemetry setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod input;
mod message;
mod output;
mod request;
mod role;
mod telemetry;

pub use input::{Input, MediaSource};
pub use message::Message;
pub use output::Output;
pub use request::{GenerateRequest, GenerateResponse};
pub use role::Role;
pub use telemetry::init_telemetry;
