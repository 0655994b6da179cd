//! # API Handlers
//!
//! HTTP endpoint handlers for the agency dashboard.

pub mod access;
pub mod agency;
pub mod billing;
pub mod media;
pub mod notifications;
pub mod site;
pub mod subaccounts;
pub mod types;
pub mod uploads;
pub mod validation;

use axum::http::Uri;

use crate::error::{ApiError, not_found};

/// Fallback for routes that do not exist
pub async fn not_found_fallback(uri: Uri) -> ApiError {
    not_found("NOT_FOUND", &format!("No route for {}", uri.path()))
}
