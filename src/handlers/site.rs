//! # Public Site
//!
//! Marketing landing page served at `/site` (and at `/` through the routing
//! rewrite) plus the health endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Json},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db;
use crate::models::ServiceInfo;
use crate::server::AppState;

const LANDING_PAGE: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Agency Dashboard</title>
  </head>
  <body>
    <section>
      <p>Run your agency, in one place.</p>
      <h1>Agency Dashboard</h1>
      <a href="/agency">Get started</a>
    </section>
  </body>
</html>
"#;

/// Public landing page
#[utoipa::path(
    get,
    path = "/site",
    responses((status = 200, description = "Landing page", content_type = "text/html", body = String)),
    tag = "site"
)]
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[serde(flatten)]
    pub service: ServiceInfo,
    /// `ok` or `unavailable`
    pub database: String,
}

/// Liveness plus database connectivity
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unavailable", body = HealthResponse)
    ),
    tag = "site"
)]
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match db::health_check(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                service: ServiceInfo::default(),
                database: "ok".to_string(),
            }),
        ),
        Err(err) => {
            tracing::warn!(error = ?err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    service: ServiceInfo::default(),
                    database: "unavailable".to_string(),
                }),
            )
        }
    }
}
