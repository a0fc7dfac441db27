use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::jobs::record::{JobMode, Trend};

// ============= API Request/Response Types =============

fn default_mode() -> String {
    JobMode::Report.as_str().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResearchRequest {
    /// The research question to answer
    pub query: String,
    /// Callback URL for status updates (accepted, currently unused)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// `report` for a long-form report, `trends` for a top-10 trend list
    #[serde(default = "default_mode")]
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResearchResponse {
    pub research_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    pub research_id: String,
    pub summary: String,
    pub report: String,
    pub follow_up_questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendsResponse {
    pub research_id: String,
    pub topic: String,
    pub summary: String,
    pub trends: Vec<Trend>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub modes: Vec<String>,
    pub auth: String,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid mode: {0}. Allowed modes: report, trends")]
    InvalidMode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Job id already exists: {0}")]
    DuplicateId(String),

    #[error("Research is not completed yet: {0}")]
    NotReady(String),

    #[error("Mode mismatch: {0}")]
    ModeMismatch(String),

    #[error("Job already finished: {0}")]
    JobFinalized(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Capability output rejected: {0}")]
    Capability(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            AppError::InvalidMode(_)
            | AppError::InvalidInput(_)
            | AppError::NotReady(_)
            | AppError::ModeMismatch(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateId(_) | AppError::JobFinalized(_) => StatusCode::CONFLICT,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::LLM(_)
            | AppError::Capability(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
