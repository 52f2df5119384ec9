//! SeaORM migrations for multi-database support
//!
//! Migrations are file-based and named `mYYYYMMDD_HHMMSS_description`;
//! `tests/migration_name_guard.rs` enforces the convention.

use sea_orm_migration::prelude::*;

pub mod m20261015_000001_create_decoded_vins;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20261015_000001_create_decoded_vins::Migration)]
    }
}
