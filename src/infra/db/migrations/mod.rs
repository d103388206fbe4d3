//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}
//! Tables are prefixed with the module that owns them.

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_auth_tables;
mod m20240101_000002_create_services_table;
mod m20240101_000003_create_orders_tables;
mod m20240101_000004_create_loyalty_tables;
mod m20240101_000005_create_content_tables;
mod m20240101_000006_create_profile_contact_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_auth_tables::Migration),
            Box::new(m20240101_000002_create_services_table::Migration),
            Box::new(m20240101_000003_create_orders_tables::Migration),
            Box::new(m20240101_000004_create_loyalty_tables::Migration),
            Box::new(m20240101_000005_create_content_tables::Migration),
            Box::new(m20240101_000006_create_profile_contact_tables::Migration),
        ]
    }
}
