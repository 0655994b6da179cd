//! Permission entity model
//!
//! Grants a user (by email) access to a single sub-account.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Email of the user the permission belongs to
    pub email: String,

    pub sub_account_id: Uuid,

    pub access: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Email",
        to = "super::user::Column::Email",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::sub_account::Entity",
        from = "Column::SubAccountId",
        to = "super::sub_account::Column::Id",
        on_delete = "Cascade"
    )]
    SubAccount,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::sub_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
