//! # User Repository
//!
//! Lookups and membership updates for dashboard users, including the
//! composite "auth user details" view used by the agency pages.

use crate::error::RepositoryError;
use crate::models::agency::Model as AgencyModel;
use crate::models::permission::{self, Entity as Permission, Model as PermissionModel};
use crate::models::sub_account::{self, Entity as SubAccount, Model as SubAccountModel};
use crate::models::user::{
    self, ActiveModel as UserActiveModel, Entity as User, Model as UserModel, Role,
};
use crate::models::Agency;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

/// Request data for creating a user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub role: Role,
}

/// A user together with their agency and its sub-accounts.
#[derive(Debug, Clone)]
pub struct AuthUserDetails {
    pub user: UserModel,
    pub agency: Option<AgencyWithSubAccounts>,
}

#[derive(Debug, Clone)]
pub struct AgencyWithSubAccounts {
    pub agency: AgencyModel,
    pub sub_accounts: Vec<SubAccountModel>,
}

/// A user together with each permission row and the sub-account it grants.
#[derive(Debug, Clone)]
pub struct UserPermissions {
    pub user: UserModel,
    pub permissions: Vec<(PermissionModel, Option<SubAccountModel>)>,
}

/// Repository for User database operations
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserModel, RepositoryError> {
        if request.id.trim().is_empty() {
            return Err(RepositoryError::validation_error("User id cannot be empty"));
        }
        if !request.email.contains('@') {
            return Err(RepositoryError::validation_error(
                "User email must be a valid address",
            ));
        }

        let now = Utc::now();
        let user = UserActiveModel {
            id: Set(request.id),
            name: Set(request.name),
            avatar_url: Set(request.avatar_url),
            email: Set(request.email),
            role: Set(request.role),
            agency_id: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        user.insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<UserModel>, RepositoryError> {
        User::find_by_id(user_id.to_string())
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, RepositoryError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Find the owner of an agency, if one has been assigned
    pub async fn find_agency_owner(
        &self,
        agency_id: Uuid,
    ) -> Result<Option<UserModel>, RepositoryError> {
        User::find()
            .filter(user::Column::AgencyId.eq(agency_id))
            .filter(user::Column::Role.eq(Role::AgencyOwner))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Attach a user to an agency with the given role
    pub async fn link_to_agency(
        &self,
        user_id: &str,
        agency_id: Uuid,
        role: Role,
    ) -> Result<UserModel, RepositoryError> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("User not found".to_string()))?;

        let mut active_user = user.into_active_model();
        active_user.agency_id = Set(Some(agency_id));
        active_user.role = Set(role);
        active_user.updated_at = Set(Utc::now().into());

        active_user
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Load a user with their agency and the agency's sub-accounts
    pub async fn get_auth_user_details(
        &self,
        user_id: &str,
    ) -> Result<Option<AuthUserDetails>, RepositoryError> {
        let Some(user) = self.find_by_id(user_id).await? else {
            return Ok(None);
        };

        let agency = match user.agency_id {
            Some(agency_id) => {
                let agency = Agency::find_by_id(agency_id)
                    .one(self.db)
                    .await
                    .map_err(RepositoryError::database_error)?;
                match agency {
                    Some(agency) => {
                        let sub_accounts = SubAccount::find()
                            .filter(sub_account::Column::AgencyId.eq(agency.id))
                            .order_by_asc(sub_account::Column::CreatedAt)
                            .all(self.db)
                            .await
                            .map_err(RepositoryError::database_error)?;
                        Some(AgencyWithSubAccounts {
                            agency,
                            sub_accounts,
                        })
                    }
                    None => None,
                }
            }
            None => None,
        };

        Ok(Some(AuthUserDetails { user, agency }))
    }

    /// Load a user with their permissions and the sub-account each one grants
    pub async fn get_user_permissions(
        &self,
        user_id: &str,
    ) -> Result<Option<UserPermissions>, RepositoryError> {
        let Some(user) = self.find_by_id(user_id).await? else {
            return Ok(None);
        };

        let permissions = Permission::find()
            .filter(permission::Column::Email.eq(user.email.clone()))
            .find_also_related(SubAccount)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(Some(UserPermissions { user, permissions }))
    }
}
