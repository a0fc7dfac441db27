use crate::{jobs::JobMode, types::ServiceInfo};
use axum::Json;

/// Service information
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service information", body = ServiceInfo)),
    tag = "service"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Delve Research API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        modes: vec![
            JobMode::Report.as_str().to_string(),
            JobMode::Trends.as_str().to_string(),
        ],
        auth: "API key required in the X-API-Key header".to_string(),
    })
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String)),
    tag = "service"
)]
pub async fn health() -> &'static str {
    "OK"
}
