//! # Upload API Handlers
//!
//! Single endpoint pair backing the upload provider's client library:
//! `GET /api/uploadthing` describes the slots, `POST /api/uploadthing`
//! either prepares an upload or receives the provider's completion callback.

use axum::{
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::HeaderMap,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::auth::MaybeSession;
use crate::error::{ApiError, validation_error};
use crate::server::AppState;
use crate::uploads::provider::PrepareUploadRequest;
use crate::uploads::verification::SIGNATURE_HEADER;
use crate::uploads::{FileDescriptor, PreparedUpload, SlotConfig, verify_callback_signature};

/// Header the provider sets on completion callbacks.
pub const HOOK_HEADER: &str = "uploadthing-hook";

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Upload slot, e.g. `avatar`
    pub slug: String,
    /// `upload` when preparing an upload
    pub action_type: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PrepareUploadBody {
    pub files: Vec<FileDescriptor>,
}

/// File reported by a completion callback
#[derive(Debug, Deserialize, ToSchema)]
pub struct CompletedFile {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadCallbackBody {
    pub file: CompletedFile,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CallbackAck {
    pub ok: bool,
}

/// Response to `POST /api/uploadthing`
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum UploadActionResponse {
    Prepared(Vec<PreparedUpload>),
    Callback(CallbackAck),
}

/// Upload slot configuration
#[utoipa::path(
    get,
    path = "/api/uploadthing",
    responses((status = 200, description = "Slots and their limits", body = [SlotConfig])),
    tag = "uploads"
)]
pub async fn upload_config(State(state): State<AppState>) -> Json<Vec<SlotConfig>> {
    Json(state.file_router.slots().to_vec())
}

/// Prepare an upload, or accept the provider's completion callback
#[utoipa::path(
    post,
    path = "/api/uploadthing",
    params(UploadQuery),
    request_body(content = PrepareUploadBody, description = "Files to upload, or a signed completion callback"),
    responses(
        (status = 200, description = "Presigned uploads or callback acknowledgement", body = UploadActionResponse),
        (status = 400, description = "File limits violated", body = ApiError),
        (status = 401, description = "No session or bad callback signature", body = ApiError),
        (status = 404, description = "Unknown slot", body = ApiError),
        (status = 502, description = "Upload provider error", body = ApiError)
    ),
    tag = "uploads"
)]
pub async fn upload_action(
    State(state): State<AppState>,
    MaybeSession(principal): MaybeSession,
    query: Result<Query<UploadQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadActionResponse>, ApiError> {
    let Query(query) = query.map_err(|err| {
        validation_error(
            "Invalid upload query",
            json!({ "query": err.body_text() }),
        )
    })?;

    let slot = state.file_router.slot(&query.slug)?;

    let is_callback = headers
        .get(HOOK_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == "callback");

    if is_callback {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        verify_callback_signature(&body, signature, state.config.upload_secret.as_deref())?;

        let callback: UploadCallbackBody = serde_json::from_slice(&body).map_err(|err| {
            validation_error("Invalid callback body", json!({ "body": err.to_string() }))
        })?;

        tracing::info!(
            slot = slot.slot.slug(),
            file_name = %callback.file.name,
            file_url = %callback.file.url,
            file_key = ?callback.file.key,
            file_size = ?callback.file.size,
            metadata = %callback.metadata,
            "upload completed"
        );

        return Ok(Json(UploadActionResponse::Callback(CallbackAck { ok: true })));
    }

    if query.action_type.as_deref() != Some("upload") {
        return Err(validation_error(
            "Unsupported upload action",
            json!({ "actionType": "Expected 'upload'" }),
        ));
    }

    let metadata = state.file_router.authorize(slot, principal.as_ref())?;

    let request: PrepareUploadBody = serde_json::from_slice(&body).map_err(|err| {
        validation_error("Invalid upload body", json!({ "files": err.to_string() }))
    })?;
    state.file_router.validate_files(slot, &request.files)?;

    let prepared = state
        .upload_provider
        .prepare_upload(PrepareUploadRequest {
            slug: slot.slot.slug().to_string(),
            files: request.files,
            metadata,
            callback_url: Some(format!("{}/api/uploadthing", state.config.public_base_url())),
        })
        .await?;

    Ok(Json(UploadActionResponse::Prepared(prepared)))
}
