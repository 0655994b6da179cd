//! Media entity model
//!
//! Uploaded files attached to a sub-account's media bucket.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Optional free-form media type label
    pub media_type: Option<String>,

    pub name: String,

    /// Public URL returned by the upload provider (unique)
    #[sea_orm(unique)]
    pub link: String,

    pub sub_account_id: Uuid,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sub_account::Entity",
        from = "Column::SubAccountId",
        to = "super::sub_account::Column::Id",
        on_delete = "Cascade"
    )]
    SubAccount,
}

impl Related<super::sub_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
