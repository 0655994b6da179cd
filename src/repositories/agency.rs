//! # Agency Repository
//!
//! Upsert, lookup and removal of agencies. Deleting an agency removes its
//! sub-accounts through the database's cascading foreign keys.

use crate::error::RepositoryError;
use crate::models::agency::{ActiveModel as AgencyActiveModel, Entity as Agency, Model as AgencyModel};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, Set};
use uuid::Uuid;

/// Default sub-account goal for new agencies
pub const DEFAULT_GOAL: i32 = 5;

/// Agency details as submitted from the agency details form
#[derive(Debug, Clone)]
pub struct AgencyDetails {
    /// Existing agency id, or a new id chosen by the caller
    pub id: Uuid,
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
    pub customer_id: Option<String>,
}

/// Repository for Agency database operations
pub struct AgencyRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AgencyRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert the agency, or update every form field when it already exists
    pub async fn upsert(&self, details: AgencyDetails) -> Result<AgencyModel, RepositoryError> {
        let now = Utc::now();

        match self.get(details.id).await? {
            Some(existing) => {
                let mut agency = existing.into_active_model();
                agency.name = Set(details.name);
                agency.agency_logo = Set(details.agency_logo);
                agency.company_email = Set(details.company_email);
                agency.company_phone = Set(details.company_phone);
                agency.white_label = Set(details.white_label);
                agency.address = Set(details.address);
                agency.city = Set(details.city);
                agency.zip_code = Set(details.zip_code);
                agency.state = Set(details.state);
                agency.country = Set(details.country);
                if let Some(customer_id) = details.customer_id {
                    agency.customer_id = Set(customer_id);
                }
                agency.updated_at = Set(now.into());

                agency
                    .update(self.db)
                    .await
                    .map_err(RepositoryError::database_error)
            }
            None => {
                let agency = AgencyActiveModel {
                    id: Set(details.id),
                    customer_id: Set(details.customer_id.unwrap_or_default()),
                    connect_account_id: Set(None),
                    name: Set(details.name),
                    agency_logo: Set(details.agency_logo),
                    company_email: Set(details.company_email),
                    company_phone: Set(details.company_phone),
                    white_label: Set(details.white_label),
                    address: Set(details.address),
                    city: Set(details.city),
                    zip_code: Set(details.zip_code),
                    state: Set(details.state),
                    country: Set(details.country),
                    goal: Set(DEFAULT_GOAL),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                };

                agency
                    .insert(self.db)
                    .await
                    .map_err(RepositoryError::database_error)
            }
        }
    }

    pub async fn get(&self, agency_id: Uuid) -> Result<Option<AgencyModel>, RepositoryError> {
        Agency::find_by_id(agency_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Delete an agency and, by cascade, all of its sub-accounts
    pub async fn delete(&self, agency_id: Uuid) -> Result<(), RepositoryError> {
        let agency = self
            .get(agency_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Agency not found".to_string()))?;

        agency
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}
