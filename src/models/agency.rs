//! Agency entity model
//!
//! Agencies are the top-level tenants that own sub-accounts.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Agency entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "agencies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Billing customer id (empty until billing is set up)
    pub customer_id: String,

    /// Connected payments account, if onboarded
    pub connect_account_id: Option<String>,

    pub name: String,
    pub agency_logo: String,
    pub company_email: String,
    pub company_phone: String,

    /// Whether sub-accounts see the agency branding
    pub white_label: bool,

    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub state: String,
    pub country: String,

    /// Sub-account goal shown on the dashboard
    pub goal: i32,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sub_account::Entity")]
    SubAccount,
    #[sea_orm(has_many = "super::user::Entity")]
    User,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::sub_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubAccount.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
