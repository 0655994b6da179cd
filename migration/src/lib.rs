//! Database migrations for the agency dashboard.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2024_03_01_000001_create_agencies;
mod m2024_03_01_000002_create_users;
mod m2024_03_01_000003_create_sub_accounts;
mod m2024_03_01_000004_create_permissions;
mod m2024_03_01_000005_create_media;
mod m2024_03_01_000006_create_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2024_03_01_000001_create_agencies::Migration),
            Box::new(m2024_03_01_000002_create_users::Migration),
            Box::new(m2024_03_01_000003_create_sub_accounts::Migration),
            Box::new(m2024_03_01_000004_create_permissions::Migration),
            Box::new(m2024_03_01_000005_create_media::Migration),
            Box::new(m2024_03_01_000006_create_notifications::Migration),
        ]
    }
}
