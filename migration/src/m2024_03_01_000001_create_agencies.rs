//! Migration to create the agencies table.
//!
//! Agencies are the top-level tenants; every sub-account, notification and
//! agency-bound user hangs off an agency row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Agencies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Agencies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Agencies::CustomerId).text().not_null().default(""))
                    .col(ColumnDef::new(Agencies::ConnectAccountId).text().null())
                    .col(ColumnDef::new(Agencies::Name).text().not_null())
                    .col(ColumnDef::new(Agencies::AgencyLogo).text().not_null())
                    .col(ColumnDef::new(Agencies::CompanyEmail).text().not_null())
                    .col(ColumnDef::new(Agencies::CompanyPhone).text().not_null())
                    .col(
                        ColumnDef::new(Agencies::WhiteLabel)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Agencies::Address).text().not_null())
                    .col(ColumnDef::new(Agencies::City).text().not_null())
                    .col(ColumnDef::new(Agencies::ZipCode).text().not_null())
                    .col(ColumnDef::new(Agencies::State).text().not_null())
                    .col(ColumnDef::new(Agencies::Country).text().not_null())
                    .col(ColumnDef::new(Agencies::Goal).integer().not_null().default(5))
                    .col(
                        ColumnDef::new(Agencies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Agencies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Agencies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Agencies {
    Table,
    Id,
    CustomerId,
    ConnectAccountId,
    Name,
    AgencyLogo,
    CompanyEmail,
    CompanyPhone,
    WhiteLabel,
    Address,
    City,
    ZipCode,
    State,
    Country,
    Goal,
    CreatedAt,
    UpdatedAt,
}
