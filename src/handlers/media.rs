//! # Media API Handlers
//!
//! Media bucket of a sub-account. Files are uploaded through the `media`
//! upload slot first; these endpoints record, list and remove the links.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::SessionPrincipal;
use crate::error::ApiError;
use crate::handlers::access::require_sub_account_access;
use crate::handlers::types::{MediaResponse, MessageResponse};
use crate::handlers::validation::FormErrors;
use crate::repositories::media::CreateMediaRequest;
use crate::repositories::{MediaRepository, NotificationRepository};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMediaRequestDto {
    /// File URL returned by the upload provider
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

/// Media files of a sub-account
#[utoipa::path(
    get,
    path = "/subaccount/{id}/media",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Sub-account UUID")),
    responses(
        (status = 200, description = "Media files", body = [MediaResponse]),
        (status = 403, description = "No access to the sub-account", body = ApiError)
    ),
    tag = "media"
)]
pub async fn list_media(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MediaResponse>>, ApiError> {
    require_sub_account_access(&state.db, &principal, id).await?;

    let files = MediaRepository::new(&state.db)
        .list_by_sub_account(id)
        .await?;

    Ok(Json(files.into_iter().map(Into::into).collect()))
}

/// Record an uploaded file in a sub-account's media bucket
#[utoipa::path(
    post,
    path = "/subaccount/{id}/media",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Sub-account UUID")),
    request_body = CreateMediaRequestDto,
    responses(
        (status = 201, description = "Media recorded", body = MediaResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 409, description = "Link already recorded", body = ApiError)
    ),
    tag = "media"
)]
pub async fn create_media(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path(id): Path<Uuid>,
    payload: Result<Json<CreateMediaRequestDto>, JsonRejection>,
) -> Result<(StatusCode, Json<MediaResponse>), ApiError> {
    let Json(request) = payload?;
    let mut errors = FormErrors::new();
    errors
        .min_len("link", &request.link, 1)
        .min_len("name", &request.name, 1);
    errors.finish()?;

    let (user, sub_account) = require_sub_account_access(&state.db, &principal, id).await?;

    let file = MediaRepository::new(&state.db)
        .create(
            id,
            CreateMediaRequest {
                link: request.link,
                name: request.name,
                media_type: request.media_type,
            },
        )
        .await?;

    NotificationRepository::new(&state.db)
        .log_activity(
            sub_account.agency_id,
            Some(id),
            &user.id,
            &format!("Uploaded a media file | {}", file.name),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(file.into())))
}

/// Remove a media file
#[utoipa::path(
    delete,
    path = "/subaccount/{id}/media/{media_id}",
    security(("session" = [])),
    params(
        ("id" = Uuid, Path, description = "Sub-account UUID"),
        ("media_id" = Uuid, Path, description = "Media UUID")
    ),
    responses(
        (status = 200, description = "Media deleted", body = MessageResponse),
        (status = 404, description = "Media not found", body = ApiError)
    ),
    tag = "media"
)]
pub async fn delete_media(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path((id, media_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (user, sub_account) = require_sub_account_access(&state.db, &principal, id).await?;

    MediaRepository::new(&state.db).delete(id, media_id).await?;

    NotificationRepository::new(&state.db)
        .log_activity(
            sub_account.agency_id,
            Some(id),
            &user.id,
            "Deleted a media file",
        )
        .await?;

    Ok(Json(MessageResponse {
        title: "Deleted File".to_string(),
        message: "Successfully deleted the file".to_string(),
    }))
}
