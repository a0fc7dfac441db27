use async_trait::async_trait;
use serde_json::Value;

use crate::agents::AgentSpec;
use crate::capabilities::StageRunner;
use crate::types::{AppError, Result};

/// Stage runner with no backing provider.
///
/// Every invocation fails, so a pipeline wired with it runs entirely on
/// fallback values and still reaches `completed`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStageRunner;

#[async_trait]
impl StageRunner for NoopStageRunner {
    async fn run(&self, agent: &AgentSpec, _input: &str) -> Result<Value> {
        tracing::debug!(agent = %agent.name, "noop runner invoked");
        Err(AppError::LLM(format!(
            "no capability configured for {}",
            agent.name
        )))
    }

    fn name(&self) -> &str {
        "noop"
    }
}
