//! Create the decoded_vins cache table
//!
//! The VIN is the primary key, so the database itself guarantees at most
//! one cached record per canonical VIN.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DecodedVins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DecodedVins::Vin)
                            .string_len(17)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DecodedVins::Make).string().null())
                    .col(ColumnDef::new(DecodedVins::Model).string().null())
                    .col(ColumnDef::new(DecodedVins::ModelYear).string().null())
                    .col(ColumnDef::new(DecodedVins::BodyClass).string().null())
                    .col(
                        ColumnDef::new(DecodedVins::CachedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DecodedVins::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DecodedVins {
    Table,
    Vin,
    Make,
    Model,
    ModelYear,
    BodyClass,
    CachedAt,
}
