//! LLM Provider Clients
//!
//! This module provides the production implementation of the stage
//! capability boundary:
//! - [`LLMClient`] - The core trait a model provider implements
//! - [`openai::OpenAIClient`] - Any OpenAI-compatible `/chat/completions` endpoint
//! - [`LlmStageRunner`] - Adapts an [`LLMClient`] to [`crate::capabilities::StageRunner`]
//!
//! # Example
//!
//! ```ignore
//! use delve::llm::{LlmStageRunner, OpenAIClient};
//! use std::sync::Arc;
//!
//! let client = OpenAIClient::new(api_key, "https://api.openai.com/v1".into(), "gpt-4o".into());
//! let runner = LlmStageRunner::new(Arc::new(client));
//! ```
//!
//! # Streaming
//!
//! Long-running stages use `stream_with_system`, which returns a
//! `Box<dyn Stream<Item = Result<String>> + Send + Unpin>`. The runner turns
//! each chunk into a progress tick.

/// Core LLM client trait and streaming response types.
pub mod client;
/// OpenAI-compatible HTTP client.
pub mod openai;
/// `StageRunner` implementation on top of an LLM client.
pub mod runner;

pub use client::{CompletionStream, LLMClient};
pub use openai::OpenAIClient;
pub use runner::LlmStageRunner;
