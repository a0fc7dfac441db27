//! Research Job Orchestration
//!
//! This module runs asynchronous, multi-stage research jobs. Given a query it
//! plans a set of searches, runs them concurrently and synthesizes either a
//! long-form report or a list of exactly ten trends.
//!
//! # Architecture
//!
//! - [`manager::ResearchManager`] - Accepts jobs, starts them, answers polls
//! - [`orchestrator::ResearchOrchestrator`] - Drives one job through the stages
//! - [`fanout::FanOutExecutor`] - Runs the planned searches concurrently
//! - [`fallback`] - Placeholder values used when a stage fails
//!
//! # Usage
//!
//! ```ignore
//! use delve::research::{ResearchManager, ResearchSettings};
//!
//! let manager = ResearchManager::new(runner, ResearchSettings::default());
//! let submitted = manager.submit("renewable energy trends", "trends")?;
//!
//! let record = manager.get_status(&submitted.research_id.into())?;
//! println!("{} {}% {}", record.status, record.progress, record.progress_message);
//! ```
//!
//! # Research Workflow
//!
//! 1. **Planning** - The planner agent proposes searches (5 → 20 %)
//! 2. **Searching** - Every search runs concurrently (25 → 60 %)
//! 3. **Synthesis** - Writer or trend agent, with streamed ticks (65 → 95 %)
//! 4. **Completion** - Result committed together with `completed` (100 %)

pub mod fallback;
pub mod fanout;
pub mod manager;
pub mod orchestrator;
pub mod plan;

pub use fanout::FanOutExecutor;
pub use manager::ResearchManager;
pub use orchestrator::{ResearchOrchestrator, ResearchSettings};
pub use plan::{SearchItem, SearchPlan};
