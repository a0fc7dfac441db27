//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Delve, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Service
//! - `GET /` - Service name, version and supported modes
//! - `GET /health` - Health check endpoint
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! ## Research (`/research`)
//! - `POST /research` - Start a job, returns `{research_id, status, trace_id}`
//! - `GET /research/{id}` - Job status, progress and message
//! - `GET /research/{id}/report` - Report of a completed `report` job
//! - `GET /research/{id}/trends` - Trend list of a completed `trends` job
//!
//! # Authentication
//!
//! Research endpoints require the API key in the `X-API-Key` header:
//! ```text
//! X-API-Key: <key>
//! ```
//! A missing key yields `401`, a wrong one `403`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

/// OpenAPI document for every route.
#[derive(OpenApi)]
#[openapi(
    info(title = "Delve Research API"),
    paths(
        handlers::service::root,
        handlers::service::health,
        handlers::research::start_research,
        handlers::research::get_research_status,
        handlers::research::get_research_report,
        handlers::research::get_research_trends,
    ),
    components(schemas(
        crate::types::ResearchRequest,
        crate::types::ResearchResponse,
        crate::types::ReportResponse,
        crate::types::TrendsResponse,
        crate::types::ServiceInfo,
        crate::jobs::JobRecord,
        crate::jobs::JobStatus,
        crate::jobs::JobMode,
        crate::jobs::JobResult,
        crate::jobs::Trend,
    )),
    modifiers(&ApiKeyAddon),
    tags(
        (name = "research", description = "Research job submission and polling"),
        (name = "service", description = "Service information")
    )
)]
pub struct ApiDoc;

struct ApiKeyAddon;

impl Modify for ApiKeyAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
        );
    }
}
