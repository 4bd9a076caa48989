//! Minimal chat-completions client for the generative text service.
//!
//! Only JSON-object responses are requested: callers always expect a
//! structured object back and parse it into their own types.

pub mod client;
pub mod config;

pub use client::{ChatMessage, OpenAiClient, OpenAiError};
pub use config::OpenAiConfig;
