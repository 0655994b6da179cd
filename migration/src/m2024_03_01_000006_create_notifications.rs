//! Migration to create the notifications table (agency activity log).

use sea_orm_migration::prelude::*;

use crate::m2024_03_01_000001_create_agencies::Agencies;
use crate::m2024_03_01_000002_create_users::Users;
use crate::m2024_03_01_000003_create_sub_accounts::SubAccounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::Notification).text().not_null())
                    .col(ColumnDef::new(Notifications::AgencyId).uuid().not_null())
                    .col(ColumnDef::new(Notifications::SubAccountId).uuid().null())
                    .col(ColumnDef::new(Notifications::UserId).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Notifications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_agency_id")
                            .from(Notifications::Table, Notifications::AgencyId)
                            .to(Agencies::Table, Agencies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_sub_account_id")
                            .from(Notifications::Table, Notifications::SubAccountId)
                            .to(SubAccounts::Table, SubAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_user_id")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_agency_id")
                    .table(Notifications::Table)
                    .col(Notifications::AgencyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    Notification,
    AgencyId,
    SubAccountId,
    UserId,
    CreatedAt,
    UpdatedAt,
}
