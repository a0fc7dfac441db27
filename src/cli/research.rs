//! `research` subcommand: run one job in-process and poll it like a client
//! would.

use std::path::Path;
use std::time::Duration;

use crate::cli::output::Output;
use crate::jobs::{JobId, JobMode, JobRecord, JobStatus};
use crate::research::ResearchManager;
use crate::types::{AppError, ReportResponse, Result, TrendsResponse};

/// Final payload of a job run from the CLI.
#[derive(Debug)]
pub enum Outcome {
    Report(ReportResponse),
    Trends(TrendsResponse),
}

/// Submit `query`, print every status change until the job is terminal and
/// return its result.
pub async fn run_research(
    manager: &ResearchManager,
    query: &str,
    mode: &str,
    interval: Duration,
    out: &Output,
) -> Result<Outcome> {
    let submitted = manager.submit(query, mode)?;
    let id = JobId::from(submitted.research_id);
    out.info(&format!(
        "Research {} started (trace {})",
        id,
        submitted.trace_id.as_deref().unwrap_or("-")
    ));

    let record = poll_until_terminal(manager, &id, interval, out).await?;
    if record.status == JobStatus::Error {
        return Err(AppError::Internal(record.progress_message));
    }

    match record.mode {
        JobMode::Report => Ok(Outcome::Report(manager.get_report(&id)?)),
        JobMode::Trends => Ok(Outcome::Trends(manager.get_trends(&id)?)),
    }
}

async fn poll_until_terminal(
    manager: &ResearchManager,
    id: &JobId,
    interval: Duration,
    out: &Output,
) -> Result<JobRecord> {
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(10)));
    let mut last: Option<(JobStatus, u8, String)> = None;

    loop {
        ticker.tick().await;
        let record = manager.get_status(id)?;

        let seen = (record.status, record.progress, record.progress_message.clone());
        if last.as_ref() != Some(&seen) {
            out.progress(record.status, record.progress, &record.progress_message);
            last = Some(seen);
        }

        if record.is_terminal() {
            return Ok(record);
        }
    }
}

/// Print the result of a finished job.
pub fn print_outcome(outcome: &Outcome, out: &Output) {
    match outcome {
        Outcome::Report(report) => {
            out.header("Summary");
            out.body(&report.summary);
            out.header("Report");
            out.body(&report.report);
            if !report.follow_up_questions.is_empty() {
                out.header("Follow-up questions");
                for question in &report.follow_up_questions {
                    out.list_item(question);
                }
            }
        }
        Outcome::Trends(trends) => {
            out.header(&format!("Trends: {}", trends.topic));
            for (i, trend) in trends.trends.iter().enumerate() {
                out.trend(i + 1, &trend.title, &trend.description);
            }
            out.header("Summary");
            out.body(&trends.summary);
        }
    }
}

/// Write a report as markdown or trends as pretty JSON.
pub fn write_outcome(outcome: &Outcome, path: &Path) -> Result<()> {
    let content = match outcome {
        Outcome::Report(report) => report.report.clone(),
        Outcome::Trends(trends) => serde_json::to_string_pretty(trends)
            .map_err(|e| AppError::Internal(format!("Failed to serialize trends: {}", e)))?,
    };

    std::fs::write(path, content).map_err(|e| {
        AppError::Internal(format!("Failed to write {}: {}", path.display(), e))
    })
}
