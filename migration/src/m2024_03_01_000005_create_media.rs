//! Migration to create the media table.

use sea_orm_migration::prelude::*;

use crate::m2024_03_01_000003_create_sub_accounts::SubAccounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Media::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Media::MediaType).text().null())
                    .col(ColumnDef::new(Media::Name).text().not_null())
                    .col(ColumnDef::new(Media::Link).text().not_null().unique_key())
                    .col(ColumnDef::new(Media::SubAccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(Media::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Media::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_sub_account_id")
                            .from(Media::Table, Media::SubAccountId)
                            .to(SubAccounts::Table, SubAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_media_sub_account_id")
                    .table(Media::Table)
                    .col(Media::SubAccountId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Media {
    Table,
    Id,
    MediaType,
    Name,
    Link,
    SubAccountId,
    CreatedAt,
    UpdatedAt,
}
