//! # Delve - asynchronous research job server
//!
//! Delve runs multi-stage research jobs: given a query it plans a set of web
//! searches, runs them concurrently and synthesizes either a long-form report
//! or a list of exactly ten trends. Callers submit a job and poll for status
//! until it completes.
//!
//! ## Overview
//!
//! Delve can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `delve-server` binary
//! 2. **As a library** - Embed the [`ResearchManager`] in your own Rust project
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use delve::{research::ResearchSettings, llm::{LlmStageRunner, OpenAIClient}, ResearchManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> delve::Result<()> {
//!     let client = OpenAIClient::new(key, "https://api.openai.com/v1".into(), "gpt-4o".into());
//!     let runner = Arc::new(LlmStageRunner::new(Arc::new(client)));
//!     let manager = ResearchManager::new(runner, ResearchSettings::default());
//!
//!     let submitted = manager.submit("solid state batteries", "report")?;
//!     println!("job {} is {}", submitted.research_id, submitted.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`jobs`] - Job records and the concurrency-safe job store
//! - [`research`] - Pipeline orchestration, fan-out and submission
//! - [`capabilities`] - The stage capability boundary
//! - [`llm`] - OpenAI-compatible client and the LLM-backed stage runner
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - API key middleware
//! - [`types`] - Common types and error handling

#![warn(rustdoc::missing_crate_level_docs)]

/// Agent identities used by the research pipeline.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// API key authentication middleware.
pub mod auth;
/// Stage capability boundary and its no-op implementation.
pub mod capabilities;
/// Command-line interface.
pub mod cli;
/// Job records and store.
pub mod jobs;
/// LLM provider client and stage runner.
pub mod llm;
/// Research job orchestration.
pub mod research;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use capabilities::{NoopStageRunner, StageRunner};
pub use jobs::{JobId, JobMode, JobRecord, JobStatus, JobStore};
pub use llm::{LLMClient, LlmStageRunner, OpenAIClient};
pub use research::{ResearchManager, ResearchSettings};
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigManager, DelveConfig};

use std::sync::Arc;
use std::time::Duration;
use utils::toml_config::RunnerKind;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based infrastructure configuration
    pub config_manager: Arc<ConfigManager>,
    /// Job submission and status reads
    pub manager: Arc<ResearchManager>,
    /// Key every protected request must present
    pub api_key: Arc<str>,
}

impl AppState {
    /// Wire the state from a loaded configuration.
    pub fn from_config(config_manager: Arc<ConfigManager>) -> Result<Self> {
        let config = config_manager.config();
        let runner = build_runner(&config)?;
        let store = Arc::new(JobStore::new(config.research.event_capacity));
        let manager = ResearchManager::with_parts(
            store,
            runner,
            agents::ResearchAgents::default(),
            research_settings(&config),
        );

        Ok(Self {
            api_key: Arc::from(config.api_key()),
            config_manager,
            manager: Arc::new(manager),
        })
    }
}

/// Select the stage capability named by `llm.runner`.
pub fn build_runner(config: &DelveConfig) -> Result<Arc<dyn StageRunner>> {
    match config.llm.runner {
        RunnerKind::OpenAI => {
            let client = OpenAIClient::new(
                config.llm_api_key()?,
                config.llm.api_base.clone(),
                config.llm.model.clone(),
            )
            .with_params(config.llm.temperature, config.llm.max_tokens)
            .with_timeout(Duration::from_secs(config.llm.timeout_secs))?;

            tracing::info!(model = %config.llm.model, api_base = %config.llm.api_base, "using OpenAI-compatible runner");
            Ok(Arc::new(LlmStageRunner::new(Arc::new(client))))
        }
        RunnerKind::Noop => {
            tracing::warn!("using the noop runner, every job will complete with placeholder results");
            Ok(Arc::new(NoopStageRunner))
        }
    }
}

/// Pipeline tunables from the `[research]` section.
pub fn research_settings(config: &DelveConfig) -> ResearchSettings {
    ResearchSettings {
        max_input_chars: config.research.max_input_chars,
        max_concurrent_searches: config.research.max_concurrent_searches,
    }
}
