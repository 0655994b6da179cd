//! # Notifications API Handler

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::auth::SessionPrincipal;
use crate::error::ApiError;
use crate::handlers::access::require_agency_member;
use crate::handlers::types::NotificationResponse;
use crate::repositories::NotificationRepository;
use crate::server::AppState;

/// Activity feed of an agency, newest first
#[utoipa::path(
    get,
    path = "/agency/{agency_id}/notifications",
    security(("session" = [])),
    params(("agency_id" = Uuid, Path, description = "Agency UUID")),
    responses(
        (status = 200, description = "Notifications with their user", body = [NotificationResponse]),
        (status = 403, description = "Not a member of the agency", body = ApiError)
    ),
    tag = "agency"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path(agency_id): Path<Uuid>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    require_agency_member(&state.db, &principal, agency_id).await?;

    let notifications = NotificationRepository::new(&state.db)
        .list_for_agency(agency_id)
        .await?;

    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}
