use crate::api::ApiDoc;
use crate::AppState;
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, HeaderValue,
    },
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use utoipa::OpenApi;

/// Research requests carry a query string, nothing larger.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/", get(crate::api::handlers::service::root))
        .route("/health", get(crate::api::handlers::service::health))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );

    let protected_routes = Router::new()
        // Protected routes (API key required)
        .route(
            "/research",
            post(crate::api::handlers::research::start_research),
        )
        .route(
            "/research/{id}",
            get(crate::api::handlers::research::get_research_status),
        )
        .route(
            "/research/{id}/report",
            get(crate::api::handlers::research::get_research_report),
        )
        .route(
            "/research/{id}/trends",
            get(crate::api::handlers::research::get_research_trends),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::api_key_middleware,
        ));

    let cors = cors_layer(&state.config_manager.config().server.cors_origins);

    public_routes
        .merge(protected_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Any origin when the list is empty or contains `*`, otherwise only the
/// listed origins.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let headers = [
        CONTENT_TYPE,
        ACCEPT,
        HeaderName::from_static("x-api-key"),
        HeaderName::from_static("research_api_key"),
    ];

    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(headers);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(headers)
}
