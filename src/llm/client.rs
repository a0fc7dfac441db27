//! LLM client abstraction
//!
//! The research pipeline only needs two things from a model: a single
//! completion for a system + user prompt, and the same completion streamed
//! in chunks so long-running stages can report progress.

use crate::types::Result;
use async_trait::async_trait;

/// Stream of completion chunks.
pub type CompletionStream = Box<dyn futures::Stream<Item = Result<String>> + Send + Unpin>;

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Stream a completion with system prompt
    async fn stream_with_system(&self, system: &str, prompt: &str) -> Result<CompletionStream>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}
