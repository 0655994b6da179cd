//! # Common API Types
//!
//! Response payloads shared across the dashboard handlers. Field names are
//! camelCase to match what the dashboard front end consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::user::Role;
use crate::models::{agency, media, notification, permission, sub_account, user};
use crate::repositories::user::{AuthUserDetails, UserPermissions};

fn rfc3339(dt: sea_orm::prelude::DateTimeWithTimeZone) -> String {
    let utc: DateTime<Utc> = dt.with_timezone(&Utc);
    utc.to_rfc3339()
}

/// Plain message response for destructive operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Deleted Agency")]
    pub title: String,
    #[schema(example = "Deleted your agency and all subaccounts")]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "user_2abc")]
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    pub email: String,
    pub role: Role,
    #[schema(value_type = Option<String>)]
    pub agency_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            avatar_url: model.avatar_url,
            email: model.email,
            role: model.role,
            agency_id: model.agency_id,
            created_at: rfc3339(model.created_at),
            updated_at: rfc3339(model.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub customer_id: String,
    pub connect_account_id: Option<String>,
    pub name: String,
    pub agency_logo: String,
    pub company_email: String,
    pub company_phone: String,
    pub white_label: bool,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub state: String,
    pub country: String,
    pub goal: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<agency::Model> for AgencyResponse {
    fn from(model: agency::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            connect_account_id: model.connect_account_id,
            name: model.name,
            agency_logo: model.agency_logo,
            company_email: model.company_email,
            company_phone: model.company_phone,
            white_label: model.white_label,
            address: model.address,
            city: model.city,
            zip_code: model.zip_code,
            state: model.state,
            country: model.country,
            goal: model.goal,
            created_at: rfc3339(model.created_at),
            updated_at: rfc3339(model.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubAccountResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub agency_id: Uuid,
    pub connect_account_id: Option<String>,
    pub name: String,
    pub sub_account_logo: String,
    pub company_email: String,
    pub company_phone: String,
    pub goal: i32,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub state: String,
    pub country: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<sub_account::Model> for SubAccountResponse {
    fn from(model: sub_account::Model) -> Self {
        Self {
            id: model.id,
            agency_id: model.agency_id,
            connect_account_id: model.connect_account_id,
            name: model.name,
            sub_account_logo: model.sub_account_logo,
            company_email: model.company_email,
            company_phone: model.company_phone,
            goal: model.goal,
            address: model.address,
            city: model.city,
            zip_code: model.zip_code,
            state: model.state,
            country: model.country,
            created_at: rfc3339(model.created_at),
            updated_at: rfc3339(model.updated_at),
        }
    }
}

/// Agency with its sub-accounts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyWithSubAccountsResponse {
    #[serde(flatten)]
    pub agency: AgencyResponse,
    pub sub_accounts: Vec<SubAccountResponse>,
}

/// The signed-in user with their agency and its sub-accounts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserDetailsResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub agency: Option<AgencyWithSubAccountsResponse>,
}

impl From<AuthUserDetails> for AuthUserDetailsResponse {
    fn from(details: AuthUserDetails) -> Self {
        Self {
            user: details.user.into(),
            agency: details.agency.map(|entry| AgencyWithSubAccountsResponse {
                agency: entry.agency.into(),
                sub_accounts: entry.sub_accounts.into_iter().map(Into::into).collect(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub email: String,
    #[schema(value_type = String)]
    pub sub_account_id: Uuid,
    pub access: bool,
    pub sub_account: Option<SubAccountResponse>,
}

impl From<(permission::Model, Option<sub_account::Model>)> for PermissionResponse {
    fn from((model, sub_account): (permission::Model, Option<sub_account::Model>)) -> Self {
        Self {
            id: model.id,
            email: model.email,
            sub_account_id: model.sub_account_id,
            access: model.access,
            sub_account: sub_account.map(Into::into),
        }
    }
}

/// The signed-in user with each permission and the sub-account it grants
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissionsResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub permissions: Vec<PermissionResponse>,
}

impl From<UserPermissions> for UserPermissionsResponse {
    fn from(value: UserPermissions) -> Self {
        Self {
            user: value.user.into(),
            permissions: value.permissions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub name: String,
    pub link: String,
    #[schema(value_type = String)]
    pub sub_account_id: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<media::Model> for MediaResponse {
    fn from(model: media::Model) -> Self {
        Self {
            id: model.id,
            media_type: model.media_type,
            name: model.name,
            link: model.link,
            sub_account_id: model.sub_account_id,
            created_at: rfc3339(model.created_at),
            updated_at: rfc3339(model.updated_at),
        }
    }
}

/// Notification with the user who triggered it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub notification: String,
    #[schema(value_type = String)]
    pub agency_id: Uuid,
    #[schema(value_type = Option<String>)]
    pub sub_account_id: Option<Uuid>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub user: Option<UserResponse>,
}

impl From<(notification::Model, Option<user::Model>)> for NotificationResponse {
    fn from((model, user): (notification::Model, Option<user::Model>)) -> Self {
        Self {
            id: model.id,
            notification: model.notification,
            agency_id: model.agency_id,
            sub_account_id: model.sub_account_id,
            user_id: model.user_id,
            created_at: rfc3339(model.created_at),
            updated_at: rfc3339(model.updated_at),
            user: user.map(Into::into),
        }
    }
}
