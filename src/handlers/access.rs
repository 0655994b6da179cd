//! Membership checks shared by the agency and sub-account handlers.

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::SessionPrincipal;
use crate::error::{ApiError, forbidden, not_found};
use crate::models::{sub_account, user};
use crate::repositories::{SubAccountRepository, UserRepository};

/// Load the user row behind the session
pub async fn current_user(
    db: &DatabaseConnection,
    principal: &SessionPrincipal,
) -> Result<user::Model, ApiError> {
    UserRepository::new(db)
        .find_by_id(&principal.user_id)
        .await?
        .ok_or_else(|| not_found("USER_NOT_FOUND", "User not found"))
}

/// The session user must belong to `agency_id`
pub async fn require_agency_member(
    db: &DatabaseConnection,
    principal: &SessionPrincipal,
    agency_id: Uuid,
) -> Result<user::Model, ApiError> {
    let user = current_user(db, principal).await?;
    if user.agency_id != Some(agency_id) {
        tracing::info!(user_id = %user.id, %agency_id, "user is not a member of agency");
        return Err(forbidden(Some("You do not have access to this agency")));
    }
    Ok(user)
}

/// The session user must be an owner/admin of `agency_id`
pub async fn require_agency_admin(
    db: &DatabaseConnection,
    principal: &SessionPrincipal,
    agency_id: Uuid,
) -> Result<user::Model, ApiError> {
    let user = require_agency_member(db, principal, agency_id).await?;
    if !user.role.is_agency_role() {
        return Err(forbidden(Some("Only agency owners and admins can do this")));
    }
    Ok(user)
}

/// The session user must manage the owning agency or hold a granted permission
pub async fn require_sub_account_access(
    db: &DatabaseConnection,
    principal: &SessionPrincipal,
    sub_account_id: Uuid,
) -> Result<(user::Model, sub_account::Model), ApiError> {
    let user = current_user(db, principal).await?;
    let repo = SubAccountRepository::new(db);
    let sub_account = repo
        .get(sub_account_id)
        .await?
        .ok_or_else(|| not_found("SUBACCOUNT_NOT_FOUND", "Sub-account not found"))?;

    let manages_agency =
        user.role.is_agency_role() && user.agency_id == Some(sub_account.agency_id);
    if manages_agency || repo.has_access(&user.email, sub_account_id).await? {
        return Ok((user, sub_account));
    }

    Err(forbidden(Some("You do not have access to this sub-account")))
}
