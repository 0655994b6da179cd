//! # Sub-account API Handlers

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::SessionPrincipal;
use crate::error::{ApiError, forbidden};
use crate::handlers::access::{
    require_agency_admin, require_agency_member, require_sub_account_access,
};
use crate::handlers::types::{MessageResponse, SubAccountResponse};
use crate::handlers::validation::FormErrors;
use crate::repositories::sub_account::SubAccountDetails;
use crate::repositories::{NotificationRepository, SubAccountRepository};
use crate::server::AppState;

/// Sub-account details form payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountDetailsRequest {
    /// Existing sub-account id; omitted when creating
    #[schema(value_type = Option<String>)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company_email: String,
    #[serde(default)]
    pub company_phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    /// Logo URL from the `subaccountLogo` upload slot
    #[serde(default)]
    pub sub_account_logo: String,
}

impl SubAccountDetailsRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FormErrors::new();
        errors
            .min_len("name", &self.name, 2)
            .min_len("companyEmail", &self.company_email, 1)
            .min_len("companyPhone", &self.company_phone, 1)
            .min_len("address", &self.address, 1)
            .min_len("city", &self.city, 1)
            .min_len("zipCode", &self.zip_code, 1)
            .min_len("state", &self.state, 1)
            .min_len("country", &self.country, 1);
        errors.finish()
    }
}

/// Sub-accounts of an agency
#[utoipa::path(
    get,
    path = "/agency/{agency_id}/subaccounts",
    security(("session" = [])),
    params(("agency_id" = Uuid, Path, description = "Agency UUID")),
    responses(
        (status = 200, description = "Sub-accounts", body = [SubAccountResponse]),
        (status = 403, description = "Not a member of the agency", body = ApiError)
    ),
    tag = "subaccounts"
)]
pub async fn list_sub_accounts(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path(agency_id): Path<Uuid>,
) -> Result<Json<Vec<SubAccountResponse>>, ApiError> {
    require_agency_member(&state.db, &principal, agency_id).await?;

    let sub_accounts = SubAccountRepository::new(&state.db)
        .list_by_agency(agency_id)
        .await?;

    Ok(Json(sub_accounts.into_iter().map(Into::into).collect()))
}

/// Create or update a sub-account
#[utoipa::path(
    post,
    path = "/agency/{agency_id}/subaccounts",
    security(("session" = [])),
    params(("agency_id" = Uuid, Path, description = "Agency UUID")),
    request_body = SubAccountDetailsRequest,
    responses(
        (status = 200, description = "Sub-account saved", body = SubAccountResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 403, description = "Not an agency owner or admin", body = ApiError)
    ),
    tag = "subaccounts"
)]
pub async fn upsert_sub_account(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path(agency_id): Path<Uuid>,
    payload: Result<Json<SubAccountDetailsRequest>, JsonRejection>,
) -> Result<Json<SubAccountResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let user = require_agency_admin(&state.db, &principal, agency_id).await?;

    let repo = SubAccountRepository::new(&state.db);
    let sub_account_id = request.id.unwrap_or_else(Uuid::new_v4);
    if let Some(existing) = repo.get(sub_account_id).await?
        && existing.agency_id != agency_id
    {
        return Err(forbidden(Some("Sub-account belongs to a different agency")));
    }

    let sub_account = repo
        .upsert(SubAccountDetails {
            id: sub_account_id,
            agency_id,
            name: request.name,
            sub_account_logo: request.sub_account_logo,
            company_email: request.company_email,
            company_phone: request.company_phone,
            address: request.address,
            city: request.city,
            zip_code: request.zip_code,
            state: request.state,
            country: request.country,
        })
        .await?;

    NotificationRepository::new(&state.db)
        .log_activity(
            agency_id,
            Some(sub_account.id),
            &user.id,
            &format!("Updated sub account | {}", sub_account.name),
        )
        .await?;

    Ok(Json(sub_account.into()))
}

/// Sub-account details
#[utoipa::path(
    get,
    path = "/subaccount/{id}",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Sub-account UUID")),
    responses(
        (status = 200, description = "Sub-account", body = SubAccountResponse),
        (status = 403, description = "No access to the sub-account", body = ApiError),
        (status = 404, description = "Sub-account not found", body = ApiError)
    ),
    tag = "subaccounts"
)]
pub async fn get_sub_account(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<SubAccountResponse>, ApiError> {
    let (_, sub_account) = require_sub_account_access(&state.db, &principal, id).await?;
    Ok(Json(sub_account.into()))
}

/// Delete a sub-account
#[utoipa::path(
    delete,
    path = "/subaccount/{id}",
    security(("session" = [])),
    params(("id" = Uuid, Path, description = "Sub-account UUID")),
    responses(
        (status = 200, description = "Sub-account deleted", body = MessageResponse),
        (status = 403, description = "Not an agency owner or admin", body = ApiError),
        (status = 404, description = "Sub-account not found", body = ApiError)
    ),
    tag = "subaccounts"
)]
pub async fn delete_sub_account(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let (_, sub_account) = require_sub_account_access(&state.db, &principal, id).await?;
    let user = require_agency_admin(&state.db, &principal, sub_account.agency_id).await?;

    NotificationRepository::new(&state.db)
        .log_activity(
            sub_account.agency_id,
            None,
            &user.id,
            &format!("Deleted a subaccount | {}", sub_account.name),
        )
        .await?;

    SubAccountRepository::new(&state.db).delete(id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            title: "Deleted Subaccount".to_string(),
            message: format!("Deleted {}", sub_account.name),
        }),
    ))
}
