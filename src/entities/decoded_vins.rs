//! `decoded_vins` table: one row per canonical VIN

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "decoded_vins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub vin: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub model_year: Option<String>,
    pub body_class: Option<String>,
    pub cached_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
