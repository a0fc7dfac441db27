//! Job submission and status reads.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::agents::ResearchAgents;
use crate::capabilities::StageRunner;
use crate::jobs::record::{generate_trace_id, JobId, JobMode, JobRecord, JobStatus};
use crate::jobs::store::{JobEvent, JobStore};
use crate::research::orchestrator::{ResearchOrchestrator, ResearchSettings};
use crate::types::{AppError, ReportResponse, ResearchResponse, Result, TrendsResponse};

/// Status reported to the caller right after submission.
pub const SUBMITTED_STATUS: &str = "processing";

/// Entry point for callers: accepts jobs, starts them and answers polls.
pub struct ResearchManager {
    store: Arc<JobStore>,
    orchestrator: Arc<ResearchOrchestrator>,
}

impl ResearchManager {
    pub fn new(runner: Arc<dyn StageRunner>, settings: ResearchSettings) -> Self {
        Self::with_parts(
            Arc::new(JobStore::default()),
            runner,
            ResearchAgents::default(),
            settings,
        )
    }

    pub fn with_parts(
        store: Arc<JobStore>,
        runner: Arc<dyn StageRunner>,
        agents: ResearchAgents,
        settings: ResearchSettings,
    ) -> Self {
        let orchestrator = Arc::new(ResearchOrchestrator::new(
            Arc::clone(&store),
            runner,
            agents,
            settings,
        ));
        Self {
            store,
            orchestrator,
        }
    }

    /// Accept a job under a fresh id and start it in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, query: &str, mode: &str) -> Result<ResearchResponse> {
        self.submit_with_id(JobId::generate(), query, mode)
    }

    /// Like [`Self::submit`], with a caller-chosen id.
    pub fn submit_with_id(&self, id: JobId, query: &str, mode: &str) -> Result<ResearchResponse> {
        let mode: JobMode = mode.parse()?;
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput("query must not be empty".to_string()));
        }

        self.store.create(id.clone(), query, mode)?;
        let trace_id = generate_trace_id();
        tracing::info!(job_id = %id, trace_id = %trace_id, mode = %mode, "research submitted");

        self.spawn(id.clone(), trace_id.clone());

        Ok(ResearchResponse {
            research_id: id.to_string(),
            status: SUBMITTED_STATUS.to_string(),
            trace_id: Some(trace_id),
        })
    }

    /// Run the orchestrator in its own task and watch it from a second one,
    /// so a panic still ends the job in `error`.
    fn spawn(&self, id: JobId, trace_id: String) {
        let orchestrator = Arc::clone(&self.orchestrator);
        let task_id = id.clone();
        let handle = tokio::spawn(async move { orchestrator.run(task_id, trace_id).await });

        let orchestrator = Arc::clone(&self.orchestrator);
        let span = tracing::info_span!("research_supervisor", job_id = %id);
        tokio::spawn(
            async move {
                if let Err(e) = handle.await {
                    tracing::error!(error = %e, "research task did not finish");
                    let detail = if e.is_panic() {
                        "task panicked"
                    } else {
                        "task cancelled"
                    };
                    orchestrator.fail(&id, detail);
                }
            }
            .instrument(span),
        );
    }

    pub fn get_status(&self, id: &JobId) -> Result<JobRecord> {
        self.store
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Research with ID {} not found", id)))
    }

    pub fn get_report(&self, id: &JobId) -> Result<ReportResponse> {
        let record = self.completed(id, JobMode::Report)?;
        let report = record.report().ok_or_else(|| {
            AppError::Internal(format!("completed research {} has no report", id))
        })?;

        Ok(ReportResponse {
            research_id: id.to_string(),
            summary: report.short_summary.clone(),
            report: report.markdown_report.clone(),
            follow_up_questions: report.follow_up_questions.clone(),
        })
    }

    pub fn get_trends(&self, id: &JobId) -> Result<TrendsResponse> {
        let record = self.completed(id, JobMode::Trends)?;
        let analysis = record.trends().ok_or_else(|| {
            AppError::Internal(format!("completed research {} has no trends", id))
        })?;

        Ok(TrendsResponse {
            research_id: id.to_string(),
            topic: analysis.topic.clone(),
            summary: analysis.summary.clone(),
            trends: analysis.trends.clone(),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.store.subscribe()
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    fn completed(&self, id: &JobId, expected: JobMode) -> Result<JobRecord> {
        let record = self.get_status(id)?;
        if record.mode != expected {
            return Err(AppError::ModeMismatch(format!(
                "Research {} was run in {} mode, not {}",
                id, record.mode, expected
            )));
        }
        if record.status != JobStatus::Completed {
            return Err(AppError::NotReady(format!(
                "Research {} is {}",
                id, record.status
            )));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::NoopStageRunner;

    fn manager() -> ResearchManager {
        ResearchManager::new(Arc::new(NoopStageRunner), ResearchSettings::default())
    }

    #[tokio::test]
    async fn test_submit_returns_processing_with_trace() {
        let manager = manager();
        let response = manager.submit("battery recycling", "report").unwrap();
        assert_eq!(response.status, "processing");
        assert!(response.trace_id.unwrap().starts_with("trace_"));
        assert!(manager
            .get_status(&JobId::new(response.research_id))
            .is_ok());
    }

    #[tokio::test]
    async fn test_invalid_mode_creates_nothing() {
        let manager = manager();
        let err = manager.submit("battery recycling", "summary").unwrap_err();
        assert!(matches!(err, AppError::InvalidMode(_)));
        assert!(manager.store().is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let manager = manager();
        let err = manager.submit("   ", "trends").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(manager.store().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let manager = manager();
        manager
            .submit_with_id(JobId::new("fixed"), "a", "report")
            .unwrap();
        let err = manager
            .submit_with_id(JobId::new("fixed"), "b", "report")
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateId(_)));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let manager = manager();
        let missing = JobId::new("missing");
        assert!(matches!(manager.get_status(&missing), Err(AppError::NotFound(_))));
        assert!(matches!(manager.get_report(&missing), Err(AppError::NotFound(_))));
        assert!(matches!(manager.get_trends(&missing), Err(AppError::NotFound(_))));
    }
}
