//! # Sub-account Repository
//!
//! Sub-accounts are upserted from the sub-account details form. A newly
//! created sub-account grants the agency owner access to it.

use crate::error::RepositoryError;
use crate::models::permission::{
    self, ActiveModel as PermissionActiveModel, Entity as Permission,
};
use crate::models::sub_account::{
    self, ActiveModel as SubAccountActiveModel, Entity as SubAccount, Model as SubAccountModel,
};
use crate::repositories::agency::DEFAULT_GOAL;
use crate::repositories::user::UserRepository;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// Sub-account details as submitted from the sub-account form
#[derive(Debug, Clone)]
pub struct SubAccountDetails {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub name: String,
    pub sub_account_logo: String,
    pub company_email: String,
    pub company_phone: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub state: String,
    pub country: String,
}

/// Repository for SubAccount database operations
pub struct SubAccountRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SubAccountRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert or update a sub-account
    pub async fn upsert(
        &self,
        details: SubAccountDetails,
    ) -> Result<SubAccountModel, RepositoryError> {
        let now = Utc::now();

        if let Some(existing) = self.get(details.id).await? {
            if existing.agency_id != details.agency_id {
                return Err(RepositoryError::validation_error(
                    "Sub-account belongs to a different agency",
                ));
            }

            let mut active = existing.into_active_model();
            active.name = Set(details.name);
            active.sub_account_logo = Set(details.sub_account_logo);
            active.company_email = Set(details.company_email);
            active.company_phone = Set(details.company_phone);
            active.address = Set(details.address);
            active.city = Set(details.city);
            active.zip_code = Set(details.zip_code);
            active.state = Set(details.state);
            active.country = Set(details.country);
            active.updated_at = Set(now.into());

            return active
                .update(self.db)
                .await
                .map_err(RepositoryError::database_error);
        }

        let agency_id = details.agency_id;
        let created = SubAccountActiveModel {
            id: Set(details.id),
            agency_id: Set(agency_id),
            connect_account_id: Set(None),
            name: Set(details.name),
            sub_account_logo: Set(details.sub_account_logo),
            company_email: Set(details.company_email),
            company_phone: Set(details.company_phone),
            goal: Set(DEFAULT_GOAL),
            address: Set(details.address),
            city: Set(details.city),
            zip_code: Set(details.zip_code),
            state: Set(details.state),
            country: Set(details.country),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.db)
        .await
        .map_err(RepositoryError::database_error)?;

        if let Some(owner) = UserRepository::new(self.db)
            .find_agency_owner(agency_id)
            .await?
        {
            self.grant_access(&owner.email, created.id, true).await?;
        }

        Ok(created)
    }

    pub async fn get(&self, sub_account_id: Uuid) -> Result<Option<SubAccountModel>, RepositoryError> {
        SubAccount::find_by_id(sub_account_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn list_by_agency(
        &self,
        agency_id: Uuid,
    ) -> Result<Vec<SubAccountModel>, RepositoryError> {
        SubAccount::find()
            .filter(sub_account::Column::AgencyId.eq(agency_id))
            .order_by_asc(sub_account::Column::CreatedAt)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Grant or revoke a user's access to a sub-account
    pub async fn grant_access(
        &self,
        email: &str,
        sub_account_id: Uuid,
        access: bool,
    ) -> Result<(), RepositoryError> {
        let existing = Permission::find()
            .filter(permission::Column::Email.eq(email))
            .filter(permission::Column::SubAccountId.eq(sub_account_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        match existing {
            Some(row) => {
                let mut active = row.into_active_model();
                active.access = Set(access);
                active
                    .update(self.db)
                    .await
                    .map_err(RepositoryError::database_error)?;
            }
            None => {
                PermissionActiveModel {
                    id: Set(Uuid::new_v4()),
                    email: Set(email.to_string()),
                    sub_account_id: Set(sub_account_id),
                    access: Set(access),
                }
                .insert(self.db)
                .await
                .map_err(RepositoryError::database_error)?;
            }
        }

        Ok(())
    }

    /// Whether `email` holds a granted permission for the sub-account
    pub async fn has_access(&self, email: &str, sub_account_id: Uuid) -> Result<bool, RepositoryError> {
        let granted = Permission::find()
            .filter(permission::Column::Email.eq(email))
            .filter(permission::Column::SubAccountId.eq(sub_account_id))
            .filter(permission::Column::Access.eq(true))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .is_some();

        Ok(granted)
    }

    pub async fn delete(&self, sub_account_id: Uuid) -> Result<(), RepositoryError> {
        let sub_account = self
            .get(sub_account_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Sub-account not found".to_string()))?;

        sub_account
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}
