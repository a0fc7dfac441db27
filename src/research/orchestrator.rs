//! Drives one job through plan → search → synthesize.
//!
//! Every transition is committed to the [`JobStore`] before the next stage
//! starts. Capability failures are absorbed with fallback values so the job
//! still completes; anything else (a store write failing, a record vanishing)
//! ends the job in `error`.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::agents::{AgentSpec, ResearchAgents};
use crate::capabilities::{parse_output, ProgressTick, StageRunner, TICK_BUFFER};
use crate::jobs::record::{
    JobId, JobMode, JobResult, JobStatus, ReportData, TrendAnalysis, TREND_COUNT,
};
use crate::jobs::store::JobStore;
use crate::research::fallback::{
    fallback_plan, fallback_report, fallback_trends, NO_RESULTS_SENTINEL,
};
use crate::research::fanout::FanOutExecutor;
use crate::research::plan::{
    combine_results, planner_input, trends_input, writer_input, SearchPlan,
};
use crate::types::{AppError, Result};

/// Highest progress a synthesis tick may report.
const TICK_CEILING: u8 = 94;

/// Tunables for the pipeline.
#[derive(Debug, Clone)]
pub struct ResearchSettings {
    /// Cap on the combined search results handed to synthesis
    pub max_input_chars: usize,
    /// Searches in flight across all jobs, `0` for no limit
    pub max_concurrent_searches: usize,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            max_input_chars: 50_000,
            max_concurrent_searches: 0,
        }
    }
}

/// Progress shown after `ticks` synthesis ticks.
pub fn tick_progress(ticks: u32) -> u8 {
    let progress = 65u32.saturating_add(ticks);
    progress.min(TICK_CEILING as u32) as u8
}

pub struct ResearchOrchestrator {
    store: Arc<JobStore>,
    runner: Arc<dyn StageRunner>,
    agents: ResearchAgents,
    fanout: FanOutExecutor,
    settings: ResearchSettings,
}

impl ResearchOrchestrator {
    pub fn new(
        store: Arc<JobStore>,
        runner: Arc<dyn StageRunner>,
        agents: ResearchAgents,
        settings: ResearchSettings,
    ) -> Self {
        let fanout = FanOutExecutor::new(
            Arc::clone(&store),
            Arc::clone(&runner),
            agents.search.clone(),
        )
        .with_max_concurrency(settings.max_concurrent_searches);

        Self {
            store,
            runner,
            agents,
            fanout,
            settings,
        }
    }

    /// Run the job to a terminal state. Never returns an error: whatever the
    /// stages cannot absorb is recorded on the job instead.
    pub async fn run(&self, job_id: JobId, trace_id: String) {
        let Some(record) = self.store.get(&job_id) else {
            tracing::error!(job_id = %job_id, "research job vanished before start");
            return;
        };

        let span = tracing::info_span!(
            "research_job",
            job_id = %job_id,
            trace_id = %trace_id,
            mode = %record.mode
        );

        async {
            tracing::info!(query = %record.query, "research started");
            match self.drive(&job_id, &record.query, record.mode, trace_id).await {
                Ok(()) => tracing::info!("research finished"),
                Err(e) => {
                    tracing::error!(error = %e, "research failed");
                    self.fail(&job_id, &e.to_string());
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Move the job to `error` with `detail`, unless it is already terminal.
    pub fn fail(&self, job_id: &JobId, detail: &str) {
        let message = format!("Error in research process: {}", detail);
        if let Err(e) = self.store.update(job_id, |record| {
            record.fail(message);
            Ok(())
        }) {
            tracing::warn!(job_id = %job_id, error = %e, "could not record job failure");
        }
    }

    async fn drive(&self, id: &JobId, query: &str, mode: JobMode, trace_id: String) -> Result<()> {
        self.store.update(id, |record| {
            record.trace_id.get_or_insert(trace_id);
            record.advance(JobStatus::Starting, 5, "Starting research...")
        })?;

        let plan = self
            .plan(id, query)
            .instrument(tracing::info_span!("plan"))
            .await?;

        let results = self
            .search(id, &plan)
            .instrument(tracing::info_span!("search", searches = plan.len()))
            .await?;
        let combined = combine_results(&results, self.settings.max_input_chars);

        let (result, message) = match mode {
            JobMode::Report => {
                let report = self
                    .write_report(id, query, &combined)
                    .instrument(tracing::info_span!("synthesize", stage = "report"))
                    .await?;
                (JobResult::Report(report), "Research completed")
            }
            JobMode::Trends => {
                let analysis = self
                    .analyze_trends(id, query, &combined)
                    .instrument(tracing::info_span!("synthesize", stage = "trends"))
                    .await?;
                (JobResult::Trends(analysis), "Trend analysis completed")
            }
        };

        self.store
            .update(id, |record| record.complete(result, message))?;
        Ok(())
    }

    async fn plan(&self, id: &JobId, query: &str) -> Result<SearchPlan> {
        self.store.update(id, |record| {
            record.advance(JobStatus::Planning, 10, "Planning searches...")
        })?;

        let agent = &self.agents.planner;
        let outcome = self
            .runner
            .run(agent, &planner_input(query))
            .await
            .and_then(|value| parse_output::<SearchPlan>(agent, value));

        match outcome {
            Ok(plan) => {
                tracing::info!(searches = plan.len(), "plan ready");
                self.store.update(id, |record| {
                    record.advance(
                        JobStatus::PlanningCompleted,
                        20,
                        format!("Will perform {} searches", plan.len()),
                    )
                })?;
                Ok(plan)
            }
            Err(e) => {
                tracing::warn!(error = %e, "planning failed, searching for the query itself");
                self.store.update(id, |record| {
                    record.advance(
                        JobStatus::PlanningError,
                        15,
                        format!("Error in planning: {}", e),
                    )
                })?;
                Ok(fallback_plan(query))
            }
        }
    }

    async fn search(&self, id: &JobId, plan: &SearchPlan) -> Result<Vec<String>> {
        if plan.is_empty() {
            self.store.update(id, |record| {
                record.advance(JobStatus::SearchingCompleted, 60, "No searches to perform")
            })?;
            return Ok(vec![NO_RESULTS_SENTINEL.to_string()]);
        }

        self.store.update(id, |record| {
            record.advance(JobStatus::Searching, 25, "Starting web searches...")
        })?;

        let results = self.fanout.run(id, &plan.searches).await?;
        tracing::info!(results = results.len(), "searches finished");

        self.store.update(id, |record| {
            record.advance(JobStatus::SearchingCompleted, 60, "All searches completed")
        })?;
        Ok(results)
    }

    async fn write_report(&self, id: &JobId, query: &str, combined: &str) -> Result<ReportData> {
        let agent = &self.agents.writer;
        let outcome = self
            .synthesize(
                id,
                agent,
                writer_input(query, combined),
                JobStatus::Writing,
                "Writing report...",
            )
            .await?
            .and_then(|value| parse_output::<ReportData>(agent, value));

        match outcome {
            Ok(report) => {
                self.store.update(id, |record| {
                    record.advance(JobStatus::ReportCompleted, 95, "Report completed")
                })?;
                Ok(report)
            }
            Err(e) => {
                tracing::warn!(error = %e, "report writing failed, using placeholder report");
                self.store.update(id, |record| {
                    record.advance(
                        JobStatus::WritingError,
                        95,
                        format!("Error writing report: {}", e),
                    )
                })?;
                Ok(fallback_report(query))
            }
        }
    }

    async fn analyze_trends(
        &self,
        id: &JobId,
        query: &str,
        combined: &str,
    ) -> Result<TrendAnalysis> {
        let agent = &self.agents.trends_writer;
        let outcome = self
            .synthesize(
                id,
                agent,
                trends_input(query, combined),
                JobStatus::Analyzing,
                "Analyzing trends...",
            )
            .await?
            .and_then(|value| parse_output::<TrendAnalysis>(agent, value))
            .and_then(|analysis| {
                if analysis.trends.len() == TREND_COUNT {
                    Ok(analysis)
                } else {
                    Err(AppError::Capability(format!(
                        "{} returned {} trends, expected {}",
                        agent.name,
                        analysis.trends.len(),
                        TREND_COUNT
                    )))
                }
            });

        match outcome {
            Ok(analysis) => {
                self.store.update(id, |record| {
                    record.advance(JobStatus::AnalyzingCompleted, 95, "Trend analysis completed")
                })?;
                Ok(analysis)
            }
            Err(e) => {
                tracing::warn!(error = %e, "trend analysis failed, using placeholder trends");
                self.store.update(id, |record| {
                    record.advance(
                        JobStatus::AnalyzingError,
                        95,
                        format!("Error analyzing trends: {}", e),
                    )
                })?;
                Ok(fallback_trends(query))
            }
        }
    }

    /// Invoke a long-running agent while turning its ticks into progress.
    ///
    /// The outer `Result` carries store failures, the inner one the
    /// capability outcome.
    async fn synthesize(
        &self,
        id: &JobId,
        agent: &AgentSpec,
        input: String,
        status: JobStatus,
        message: &str,
    ) -> Result<Result<Value>> {
        self.store
            .update(id, |record| record.advance(status, 65, message))?;

        let (ticks_tx, mut ticks_rx) = mpsc::channel::<ProgressTick>(TICK_BUFFER);
        let invocation = self.runner.run_streamed(agent, &input, ticks_tx);

        let consume = async {
            let mut ticks = 0u32;
            while ticks_rx.recv().await.is_some() {
                ticks = ticks.saturating_add(1);
                let progress = tick_progress(ticks);
                if progress % 5 == 0 {
                    self.store
                        .update(id, |record| record.advance(status, progress, message))?;
                }
            }
            tracing::debug!(ticks, "tick stream closed");
            Ok::<(), AppError>(())
        };

        let (outcome, consumed) = tokio::join!(invocation, consume);
        consumed?;
        Ok(outcome)
    }
}
