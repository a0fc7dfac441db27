//! Stage execution boundary.
//!
//! Every pipeline stage (plan, search, write, analyze) is an opaque,
//! possibly-failing capability behind the [`StageRunner`] trait. The
//! orchestrator never trusts the raw output: it goes through
//! [`parse_output`] first, and a shape mismatch counts as a failure.
//!
//! Two implementations exist:
//! - [`crate::llm::LlmStageRunner`] - production, backed by an LLM client
//! - [`NoopStageRunner`] - fails every call, for wiring without a provider

pub mod noop;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::agents::AgentSpec;
use crate::types::{AppError, Result};

pub use noop::NoopStageRunner;

/// Capacity of the tick channel handed to long-running invocations.
pub const TICK_BUFFER: usize = 64;

/// Emitted by a long-running capability while it works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTick {
    /// 1-based sequence number within one invocation
    pub seq: u32,
}

#[async_trait]
pub trait StageRunner: Send + Sync {
    /// Run an agent on `input` and return its raw output.
    async fn run(&self, agent: &AgentSpec, input: &str) -> Result<Value>;

    /// Run an agent that may take a while, reporting ticks as it goes.
    ///
    /// The sender is dropped when the call returns, which closes the tick
    /// stream for the consumer.
    async fn run_streamed(
        &self,
        agent: &AgentSpec,
        input: &str,
        ticks: mpsc::Sender<ProgressTick>,
    ) -> Result<Value> {
        drop(ticks);
        self.run(agent, input).await
    }

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Validate a raw capability output against the stage's schema.
pub fn parse_output<T: DeserializeOwned>(agent: &AgentSpec, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        AppError::Capability(format!(
            "{} returned output that does not match its schema: {}",
            agent.name, e
        ))
    })
}

/// Validate a free-text capability output.
pub fn parse_text(agent: &AgentSpec, value: Value) -> Result<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Ok(text),
        Value::String(_) => Err(AppError::Capability(format!(
            "{} returned empty text",
            agent.name
        ))),
        other => Err(AppError::Capability(format!(
            "{} returned {} instead of text",
            agent.name,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
