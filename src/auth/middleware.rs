use crate::types::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

/// Headers the API key is accepted in, in lookup order.
pub const API_KEY_HEADERS: [&str; 2] = ["x-api-key", "research_api_key"];

/// First API key found in the request headers.
pub fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    API_KEY_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .find_map(|value| value.to_str().ok())
}

/// Reject requests without the configured API key: 401 when it is missing,
/// 403 when it is wrong.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = extract_api_key(req.headers()).ok_or_else(|| {
        AppError::Auth("API key is missing. Provide it in the X-API-Key header".to_string())
    })?;

    if provided != state.api_key.as_ref() {
        tracing::warn!(path = %req.uri().path(), "rejected request with invalid API key");
        return Err(AppError::Forbidden("Invalid API key".to_string()));
    }

    Ok(next.run(req).await)
}
