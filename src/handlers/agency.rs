//! # Agency API Handlers
//!
//! Page data for the agency area: the signed-in user's details, the agency
//! details form, agency removal, the dashboard and the user's permissions.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::SessionPrincipal;
use crate::dashboard::{self, DashboardWidgets};
use crate::error::{ApiError, forbidden, not_found};
use crate::handlers::access::{current_user, require_agency_admin, require_agency_member};
use crate::handlers::types::{
    AgencyResponse, AuthUserDetailsResponse, MessageResponse, UserPermissionsResponse,
};
use crate::handlers::validation::FormErrors;
use crate::models::user::Role;
use crate::repositories::agency::AgencyDetails;
use crate::repositories::{
    AgencyRepository, NotificationRepository, SubAccountRepository, UserRepository,
};
use crate::server::AppState;

/// Agency details form payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyDetailsRequest {
    /// Existing agency id; omitted when creating the agency
    #[schema(value_type = Option<String>)]
    pub id: Option<Uuid>,
    /// At least 2 characters
    #[serde(default)]
    #[schema(example = "Acme Agency")]
    pub name: String,
    #[serde(default)]
    pub company_email: String,
    #[serde(default)]
    pub company_phone: String,
    #[serde(default)]
    pub white_label: bool,
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
    /// Logo URL from the `agencyLogo` upload slot
    #[serde(default)]
    pub agency_logo: String,
    /// Billing customer created through the payment endpoint
    pub customer_id: Option<String>,
}

impl AgencyDetailsRequest {
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

/// Agency dashboard page data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyDashboardResponse {
    #[schema(value_type = String)]
    pub agency_id: Uuid,
    pub agency_name: String,
    /// Sub-account goal for the agency
    pub goal: i32,
    pub sub_account_count: usize,
    pub widgets: DashboardWidgets,
}

/// Details of the signed-in user, their agency and its sub-accounts
#[utoipa::path(
    get,
    path = "/agency",
    security(("session" = [])),
    responses(
        (status = 200, description = "Signed-in user details", body = AuthUserDetailsResponse),
        (status = 401, description = "No session", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "agency"
)]
pub async fn get_auth_user_details(
    State(state): State<AppState>,
    principal: SessionPrincipal,
) -> Result<Json<AuthUserDetailsResponse>, ApiError> {
    let details = UserRepository::new(&state.db)
        .get_auth_user_details(&principal.user_id)
        .await?
        .ok_or_else(|| not_found("USER_NOT_FOUND", "User not found"))?;

    Ok(Json(details.into()))
}

/// Create or update the signed-in user's agency
#[utoipa::path(
    put,
    path = "/agency/details",
    security(("session" = [])),
    request_body = AgencyDetailsRequest,
    responses(
        (status = 200, description = "Agency saved", body = AgencyResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "No session", body = ApiError),
        (status = 403, description = "Agency belongs to another user", body = ApiError)
    ),
    tag = "agency"
)]
pub async fn upsert_agency_details(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    payload: Result<Json<AgencyDetailsRequest>, JsonRejection>,
) -> Result<Json<AgencyResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let user = current_user(&state.db, &principal).await?;

    let agency_id = match (request.id, user.agency_id) {
        (Some(requested), Some(own)) if requested != own => {
            return Err(forbidden(Some("You do not have access to this agency")));
        }
        (Some(requested), _) => requested,
        (None, Some(own)) => own,
        (None, None) => Uuid::new_v4(),
    };

    if user.agency_id.is_some() && !user.role.is_agency_role() {
        return Err(forbidden(Some("Only agency owners and admins can do this")));
    }

    let agency_repo = AgencyRepository::new(&state.db);
    if user.agency_id.is_none() && agency_repo.get(agency_id).await?.is_some() {
        return Err(forbidden(Some("You do not have access to this agency")));
    }

    let agency = agency_repo
        .upsert(AgencyDetails {
            id: agency_id,
            name: request.name,
            agency_logo: request.agency_logo,
            company_email: request.company_email,
            company_phone: request.company_phone,
            white_label: request.white_label,
            address: request.address,
            city: request.city,
            zip_code: request.zip_code,
            state: request.state,
            country: request.country,
            customer_id: request.customer_id,
        })
        .await?;

    if user.agency_id.is_none() {
        UserRepository::new(&state.db)
            .link_to_agency(&user.id, agency.id, Role::AgencyOwner)
            .await?;
    }

    NotificationRepository::new(&state.db)
        .log_activity(agency.id, None, &user.id, "Updated agency details")
        .await?;

    tracing::info!(agency_id = %agency.id, user_id = %user.id, "agency details saved");
    Ok(Json(agency.into()))
}

/// Agency details
#[utoipa::path(
    get,
    path = "/agency/{agency_id}",
    security(("session" = [])),
    params(("agency_id" = Uuid, Path, description = "Agency UUID")),
    responses(
        (status = 200, description = "Agency details", body = AgencyResponse),
        (status = 403, description = "Not a member of the agency", body = ApiError),
        (status = 404, description = "Agency not found", body = ApiError)
    ),
    tag = "agency"
)]
pub async fn get_agency(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path(agency_id): Path<Uuid>,
) -> Result<Json<AgencyResponse>, ApiError> {
    require_agency_member(&state.db, &principal, agency_id).await?;

    let agency = AgencyRepository::new(&state.db)
        .get(agency_id)
        .await?
        .ok_or_else(|| not_found("AGENCY_NOT_FOUND", "Agency not found"))?;

    Ok(Json(agency.into()))
}

/// Delete an agency and all of its sub-accounts
#[utoipa::path(
    delete,
    path = "/agency/{agency_id}",
    security(("session" = [])),
    params(("agency_id" = Uuid, Path, description = "Agency UUID")),
    responses(
        (status = 200, description = "Agency deleted", body = MessageResponse),
        (status = 403, description = "Not an agency owner or admin", body = ApiError),
        (status = 404, description = "Agency not found", body = ApiError)
    ),
    tag = "agency"
)]
pub async fn delete_agency(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path(agency_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = require_agency_admin(&state.db, &principal, agency_id).await?;

    AgencyRepository::new(&state.db).delete(agency_id).await?;
    tracing::info!(%agency_id, user_id = %user.id, "agency deleted");

    Ok(Json(MessageResponse {
        title: "Deleted Agency".to_string(),
        message: "Deleted your agency and all subaccounts".to_string(),
    }))
}

/// Agency dashboard widgets
#[utoipa::path(
    get,
    path = "/agency/{agency_id}/dashboard",
    security(("session" = [])),
    params(("agency_id" = Uuid, Path, description = "Agency UUID")),
    responses(
        (status = 200, description = "Dashboard data", body = AgencyDashboardResponse),
        (status = 403, description = "Not a member of the agency", body = ApiError),
        (status = 404, description = "Agency not found", body = ApiError)
    ),
    tag = "agency"
)]
pub async fn agency_dashboard(
    State(state): State<AppState>,
    principal: SessionPrincipal,
    Path(agency_id): Path<Uuid>,
) -> Result<Json<AgencyDashboardResponse>, ApiError> {
    require_agency_member(&state.db, &principal, agency_id).await?;

    let agency = AgencyRepository::new(&state.db)
        .get(agency_id)
        .await?
        .ok_or_else(|| not_found("AGENCY_NOT_FOUND", "Agency not found"))?;
    let sub_accounts = SubAccountRepository::new(&state.db)
        .list_by_agency(agency_id)
        .await?;

    Ok(Json(AgencyDashboardResponse {
        agency_id: agency.id,
        agency_name: agency.name,
        goal: agency.goal,
        sub_account_count: sub_accounts.len(),
        widgets: dashboard::dashboard_widgets(),
    }))
}

/// The signed-in user's sub-account permissions
#[utoipa::path(
    get,
    path = "/agency/permissions",
    security(("session" = [])),
    responses(
        (status = 200, description = "User with permissions", body = UserPermissionsResponse),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "agency"
)]
pub async fn get_user_permissions(
    State(state): State<AppState>,
    principal: SessionPrincipal,
) -> Result<Json<UserPermissionsResponse>, ApiError> {
    let permissions = UserRepository::new(&state.db)
        .get_user_permissions(&principal.user_id)
        .await?
        .ok_or_else(|| not_found("USER_NOT_FOUND", "User not found"))?;

    Ok(Json(permissions.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::validation::FILL_IN_FIELD;
    use serde_json::json;

    #[test]
    fn empty_form_reports_every_required_field() {
        let request: AgencyDetailsRequest = serde_json::from_value(json!({})).unwrap();
        let err = request.validate().unwrap_err();
        let details = err.details.unwrap();

        for field in [
            "name",
            "companyEmail",
            "companyPhone",
            "address",
            "city",
            "zipCode",
            "state",
            "country",
        ] {
            assert_eq!(details[field], FILL_IN_FIELD, "{field}");
        }
        assert!(details.get("agencyLogo").is_none());
        assert!(details.get("whiteLabel").is_none());
    }

    #[test]
    fn single_character_name_is_too_short() {
        let request: AgencyDetailsRequest = serde_json::from_value(json!({
            "name": "A",
            "companyEmail": "a@b.co",
            "companyPhone": "1",
            "whiteLabel": true,
            "address": "1 Main St",
            "city": "Springfield",
            "zipCode": "12345",
            "state": "IL",
            "country": "US",
            "agencyLogo": ""
        }))
        .unwrap();

        let details = request.validate().unwrap_err().details.unwrap();
        assert_eq!(details.as_object().unwrap().len(), 1);
        assert_eq!(details["name"], FILL_IN_FIELD);
    }
}
