//! User entity model
//!
//! Users are created from the auth provider's identity; their ids are the
//! provider-issued user ids.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User entity representing a dashboard member
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Auth provider user id (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub avatar_url: String,

    /// Unique email address; permissions reference users by email
    #[sea_orm(unique)]
    pub email: String,

    pub role: Role,

    /// Agency the user belongs to, if any
    pub agency_id: Option<Uuid>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

/// Membership role of a user
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "AGENCY_OWNER")]
    AgencyOwner,
    #[sea_orm(string_value = "AGENCY_ADMIN")]
    AgencyAdmin,
    #[sea_orm(string_value = "SUBACCOUNT_USER")]
    #[default]
    SubaccountUser,
    #[sea_orm(string_value = "SUBACCOUNT_GUEST")]
    SubaccountGuest,
}

impl Role {
    /// Whether the role manages the whole agency rather than single sub-accounts.
    pub fn is_agency_role(&self) -> bool {
        matches!(self, Role::AgencyOwner | Role::AgencyAdmin)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::agency::Entity",
        from = "Column::AgencyId",
        to = "super::agency::Column::Id",
        on_delete = "SetNull"
    )]
    Agency,
    #[sea_orm(has_many = "super::permission::Entity")]
    Permission,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::agency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agency.def()
    }
}

impl Related<super::permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permission.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
