//! # Media Repository

use crate::error::RepositoryError;
use crate::models::media::{self, ActiveModel as MediaActiveModel, Entity as Media, Model as MediaModel};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

/// Request data for attaching an uploaded file to a sub-account
#[derive(Debug, Clone)]
pub struct CreateMediaRequest {
    pub link: String,
    pub name: String,
    pub media_type: Option<String>,
}

/// Repository for Media database operations
pub struct MediaRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MediaRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        sub_account_id: Uuid,
        request: CreateMediaRequest,
    ) -> Result<MediaModel, RepositoryError> {
        if url::Url::parse(&request.link).is_err() {
            return Err(RepositoryError::validation_error(
                "Media link must be an absolute URL",
            ));
        }

        let now = Utc::now();
        MediaActiveModel {
            id: Set(Uuid::new_v4()),
            media_type: Set(request.media_type),
            name: Set(request.name),
            link: Set(request.link),
            sub_account_id: Set(sub_account_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.db)
        .await
        .map_err(RepositoryError::database_error)
    }

    /// Media for a sub-account, newest first
    pub async fn list_by_sub_account(
        &self,
        sub_account_id: Uuid,
    ) -> Result<Vec<MediaModel>, RepositoryError> {
        Media::find()
            .filter(media::Column::SubAccountId.eq(sub_account_id))
            .order_by_desc(media::Column::CreatedAt)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Delete a media file; the file must belong to the given sub-account
    pub async fn delete(&self, sub_account_id: Uuid, media_id: Uuid) -> Result<(), RepositoryError> {
        let file = Media::find_by_id(media_id)
            .filter(media::Column::SubAccountId.eq(sub_account_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::NotFound("Media not found".to_string()))?;

        file.delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}
