//! OpenAI-compatible chat completions adapter.
//!
//! Implements the [`LlmGateway`](tribunal_application::LlmGateway) port over
//! HTTP. Every role call is a single non-streaming `POST /v1/chat/completions`
//! in JSON-object mode.

pub mod gateway;
pub mod protocol;

pub use gateway::{OpenAiGateway, OpenAiGatewayConfig};
