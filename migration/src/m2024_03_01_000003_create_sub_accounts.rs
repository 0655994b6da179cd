//! Migration to create the sub_accounts table.

use sea_orm_migration::prelude::*;

use crate::m2024_03_01_000001_create_agencies::Agencies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubAccounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SubAccounts::AgencyId).uuid().not_null())
                    .col(ColumnDef::new(SubAccounts::ConnectAccountId).text().null())
                    .col(ColumnDef::new(SubAccounts::Name).text().not_null())
                    .col(ColumnDef::new(SubAccounts::SubAccountLogo).text().not_null())
                    .col(ColumnDef::new(SubAccounts::CompanyEmail).text().not_null())
                    .col(ColumnDef::new(SubAccounts::CompanyPhone).text().not_null())
                    .col(
                        ColumnDef::new(SubAccounts::Goal)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(ColumnDef::new(SubAccounts::Address).text().not_null())
                    .col(ColumnDef::new(SubAccounts::City).text().not_null())
                    .col(ColumnDef::new(SubAccounts::ZipCode).text().not_null())
                    .col(ColumnDef::new(SubAccounts::State).text().not_null())
                    .col(ColumnDef::new(SubAccounts::Country).text().not_null())
                    .col(
                        ColumnDef::new(SubAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SubAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sub_accounts_agency_id")
                            .from(SubAccounts::Table, SubAccounts::AgencyId)
                            .to(Agencies::Table, Agencies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sub_accounts_agency_id")
                    .table(SubAccounts::Table)
                    .col(SubAccounts::AgencyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubAccounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum SubAccounts {
    Table,
    Id,
    AgencyId,
    ConnectAccountId,
    Name,
    SubAccountLogo,
    CompanyEmail,
    CompanyPhone,
    Goal,
    Address,
    City,
    ZipCode,
    State,
    Country,
    CreatedAt,
    UpdatedAt,
}
