//! Job record: the mutable state of one research job.
//!
//! A record is created `pending`, advanced by exactly one orchestration flow
//! and frozen once it reaches `completed` or `error`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::{AppError, Result};

/// Number of entries every trend analysis carries.
pub const TREND_COUNT: usize = 10;

/// Opaque job identifier. Never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Generate a correlation token in the `trace_<hex>` form.
pub fn generate_trace_id() -> String {
    format!("trace_{}", Uuid::new_v4().simple())
}

/// What the job synthesizes at the end of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobMode {
    Report,
    Trends,
}

impl JobMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobMode::Report => "report",
            JobMode::Trends => "trends",
        }
    }
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "report" => Ok(JobMode::Report),
            "trends" => Ok(JobMode::Trends),
            other => Err(AppError::InvalidMode(other.to_string())),
        }
    }
}

/// Pipeline status of a job.
///
/// `Completed` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Starting,
    Planning,
    PlanningCompleted,
    PlanningError,
    Searching,
    SearchingCompleted,
    Writing,
    ReportCompleted,
    WritingError,
    Analyzing,
    AnalyzingCompleted,
    AnalyzingError,
    Completed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Starting => "starting",
            JobStatus::Planning => "planning",
            JobStatus::PlanningCompleted => "planning_completed",
            JobStatus::PlanningError => "planning_error",
            JobStatus::Searching => "searching",
            JobStatus::SearchingCompleted => "searching_completed",
            JobStatus::Writing => "writing",
            JobStatus::ReportCompleted => "report_completed",
            JobStatus::WritingError => "writing_error",
            JobStatus::Analyzing => "analyzing",
            JobStatus::AnalyzingCompleted => "analyzing_completed",
            JobStatus::AnalyzingError => "analyzing_error",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single trend entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Trend {
    pub title: String,
    /// Two to three sentences.
    pub description: String,
}

/// Output of the report writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReportData {
    pub short_summary: String,
    pub markdown_report: String,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

/// Output of the trend writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrendAnalysis {
    pub topic: String,
    pub trends: Vec<Trend>,
    pub summary: String,
}

/// Terminal payload of a completed job: report fields XOR trend fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobResult {
    Report(ReportData),
    Trends(TrendAnalysis),
}

impl JobResult {
    pub fn mode(&self) -> JobMode {
        match self {
            JobResult::Report(_) => JobMode::Report,
            JobResult::Trends(_) => JobMode::Trends,
        }
    }
}

/// Snapshot of one job as seen by pollers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobRecord {
    pub id: JobId,
    pub query: String,
    pub mode: JobMode,
    pub trace_id: Option<String>,
    pub status: JobStatus,
    /// 0–100, never decreases.
    pub progress: u8,
    pub progress_message: String,
    pub result: Option<JobResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn new(id: JobId, query: impl Into<String>, mode: JobMode) -> Self {
        let now = Utc::now();
        Self {
            id,
            query: query.into(),
            mode,
            trace_id: None,
            status: JobStatus::Pending,
            progress: 0,
            progress_message: "Waiting to start...".to_string(),
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to a non-terminal status.
    ///
    /// Progress is clamped so it never goes backwards and never exceeds 100.
    pub fn advance(&mut self, status: JobStatus, progress: u8, message: impl Into<String>) -> Result<()> {
        if status.is_terminal() {
            return Err(AppError::Internal(format!(
                "status '{}' must be reached through complete() or fail()",
                status
            )));
        }
        self.status = status;
        self.progress = self.progress.max(progress.min(100));
        self.progress_message = message.into();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Finish successfully; the result is committed together with the status.
    pub fn complete(&mut self, result: JobResult, message: impl Into<String>) -> Result<()> {
        if result.mode() != self.mode {
            return Err(AppError::ModeMismatch(format!(
                "{} result for a {} job",
                result.mode(),
                self.mode
            )));
        }
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.progress_message = message.into();
        self.result = Some(result);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Finish with an error; progress stays where it was.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Error;
        self.progress_message = message.into();
        self.result = None;
        self.updated_at = Utc::now();
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn report(&self) -> Option<&ReportData> {
        match &self.result {
            Some(JobResult::Report(report)) => Some(report),
            _ => None,
        }
    }

    pub fn trends(&self) -> Option<&TrendAnalysis> {
        match &self.result {
            Some(JobResult::Trends(analysis)) => Some(analysis),
            _ => None,
        }
    }
}
