//! Migration to create the permissions table.
//!
//! A permission row grants (or revokes) a user's access to one sub-account,
//! keyed by the user's email.

use sea_orm_migration::prelude::*;

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
                    .table(Permissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Permissions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Permissions::Email).text().not_null())
                    .col(ColumnDef::new(Permissions::SubAccountId).uuid().not_null())
                    .col(ColumnDef::new(Permissions::Access).boolean().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permissions_email")
                            .from(Permissions::Table, Permissions::Email)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_permissions_sub_account_id")
                            .from(Permissions::Table, Permissions::SubAccountId)
                            .to(SubAccounts::Table, SubAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_permissions_email")
                    .table(Permissions::Table)
                    .col(Permissions::Email)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Permissions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Permissions {
    Table,
    Id,
    Email,
    SubAccountId,
    Access,
}
