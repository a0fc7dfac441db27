//! Production stage runner backed by an [`LLMClient`].

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::agents::{AgentSpec, OutputShape};
use crate::capabilities::{ProgressTick, StageRunner};
use crate::llm::client::LLMClient;
use crate::types::{AppError, Result};

/// Runs agents by sending their instructions as the system prompt and the
/// stage input as the user prompt.
pub struct LlmStageRunner {
    client: Arc<dyn LLMClient>,
}

impl LlmStageRunner {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    fn decode(agent: &AgentSpec, content: String) -> Result<Value> {
        match agent.output {
            OutputShape::Text => Ok(Value::String(content)),
            OutputShape::Json => {
                let object = extract_json_object(&content).ok_or_else(|| {
                    AppError::Capability(format!(
                        "{} returned no JSON object",
                        agent.name
                    ))
                })?;
                serde_json::from_str(object).map_err(|e| {
                    AppError::Capability(format!("{} returned invalid JSON: {}", agent.name, e))
                })
            }
        }
    }
}

/// Slice from the first `{` to the last `}`, tolerating prose or code fences
/// around the object.
pub fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

#[async_trait]
impl StageRunner for LlmStageRunner {
    async fn run(&self, agent: &AgentSpec, input: &str) -> Result<Value> {
        tracing::debug!(agent = %agent.name, model = %self.client.model_name(), "running agent");
        let content = self
            .client
            .generate_with_system(&agent.instructions, input)
            .await?;
        Self::decode(agent, content)
    }

    async fn run_streamed(
        &self,
        agent: &AgentSpec,
        input: &str,
        ticks: mpsc::Sender<ProgressTick>,
    ) -> Result<Value> {
        tracing::debug!(agent = %agent.name, model = %self.client.model_name(), "streaming agent");
        let mut stream = self
            .client
            .stream_with_system(&agent.instructions, input)
            .await?;

        let mut content = String::new();
        let mut seq = 0u32;
        while let Some(chunk) = stream.next().await {
            content.push_str(&chunk?);
            seq = seq.saturating_add(1);
            // A full channel only means the consumer is behind; drop the tick
            let _ = ticks.try_send(ProgressTick { seq });
        }
        drop(ticks);

        Self::decode(agent, content)
    }

    fn name(&self) -> &str {
        "llm"
    }
}
