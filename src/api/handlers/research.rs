use crate::{
    jobs::{JobId, JobRecord},
    types::{ReportResponse, ResearchRequest, ResearchResponse, Result, TrendsResponse},
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// Start a research job in the background
#[utoipa::path(
    post,
    path = "/research",
    request_body = ResearchRequest,
    responses(
        (status = 200, description = "Research started", body = ResearchResponse),
        (status = 400, description = "Invalid mode or empty query"),
        (status = 401, description = "API key missing"),
        (status = 403, description = "API key invalid")
    ),
    tag = "research",
    security(("api_key" = []))
)]
pub async fn start_research(
    State(state): State<AppState>,
    Json(payload): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>> {
    if let Some(callback_url) = &payload.callback_url {
        tracing::debug!(%callback_url, "callback_url is accepted but not used");
    }

    let response = state.manager.submit(&payload.query, &payload.mode)?;
    Ok(Json(response))
}

/// Current status of a research job
#[utoipa::path(
    get,
    path = "/research/{id}",
    params(("id" = String, Path, description = "Research job id")),
    responses(
        (status = 200, description = "Job snapshot", body = JobRecord),
        (status = 404, description = "Unknown research id")
    ),
    tag = "research",
    security(("api_key" = []))
)]
pub async fn get_research_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobRecord>> {
    let record = state.manager.get_status(&JobId::from(id))?;
    Ok(Json(record))
}

/// Report of a completed `report` job
#[utoipa::path(
    get,
    path = "/research/{id}/report",
    params(("id" = String, Path, description = "Research job id")),
    responses(
        (status = 200, description = "Research report", body = ReportResponse),
        (status = 400, description = "Not completed yet, or not a report job"),
        (status = 404, description = "Unknown research id")
    ),
    tag = "research",
    security(("api_key" = []))
)]
pub async fn get_research_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportResponse>> {
    let report = state.manager.get_report(&JobId::from(id))?;
    Ok(Json(report))
}

/// Trend list of a completed `trends` job
#[utoipa::path(
    get,
    path = "/research/{id}/trends",
    params(("id" = String, Path, description = "Research job id")),
    responses(
        (status = 200, description = "Trend analysis", body = TrendsResponse),
        (status = 400, description = "Not completed yet, or not a trends job"),
        (status = 404, description = "Unknown research id")
    ),
    tag = "research",
    security(("api_key" = []))
)]
pub async fn get_research_trends(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrendsResponse>> {
    let trends = state.manager.get_trends(&JobId::from(id))?;
    Ok(Json(trends))
}
