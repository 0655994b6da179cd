//! # Notification Repository
//!
//! Activity log entries for an agency. Each entry is stored as
//! `"<user name> | <description>"`.

use crate::error::RepositoryError;
use crate::models::notification::{
    self, ActiveModel as NotificationActiveModel, Entity as Notification,
    Model as NotificationModel,
};
use crate::models::user::{Entity as User, Model as UserModel};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// Repository for Notification database operations
pub struct NotificationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NotificationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record an activity performed by `user_id` in an agency (and optionally a sub-account)
    pub async fn log_activity(
        &self,
        agency_id: Uuid,
        sub_account_id: Option<Uuid>,
        user_id: &str,
        description: &str,
    ) -> Result<NotificationModel, RepositoryError> {
        let user = User::find_by_id(user_id.to_string())
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::NotFound("User not found".to_string()))?;

        let now = Utc::now();
        NotificationActiveModel {
            id: Set(Uuid::new_v4()),
            notification: Set(format!("{} | {}", user.name, description)),
            agency_id: Set(agency_id),
            sub_account_id: Set(sub_account_id),
            user_id: Set(user.id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.db)
        .await
        .map_err(RepositoryError::database_error)
    }

    /// Notifications for an agency, newest first, each with the acting user
    pub async fn list_for_agency(
        &self,
        agency_id: Uuid,
    ) -> Result<Vec<(NotificationModel, Option<UserModel>)>, RepositoryError> {
        Notification::find()
            .filter(notification::Column::AgencyId.eq(agency_id))
            .order_by_desc(notification::Column::CreatedAt)
            .find_also_related(User)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
