//! API Key Authentication
//!
//! Every research route requires the key configured through
//! `[auth] api_key_env` (default `RESEARCH_API_KEY`):
//!
//! ```text
//! X-API-Key: <key>
//! ```
//!
//! The legacy `RESEARCH_API_KEY` request header is accepted as well.
//! `/` and `/health` stay public.

/// Axum middleware for protected routes.
pub mod middleware;
