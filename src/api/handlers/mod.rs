//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Research submission and status handlers.
pub mod research;
/// Service info and health handlers.
pub mod service;
