//! SeaORM-based decoded VIN repository implementation

use async_stream::try_stream;
use async_trait::async_trait;
use chrono::Utc;
use futures::Stream;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set, SqlErr,
};
use std::sync::Arc;
use tracing::debug;

use super::traits::{DecodedVinStore, RecordStream};
use crate::entities::{decoded_vins, prelude::DecodedVins};
use crate::errors::{AppError, AppResult};
use crate::models::{DecodedVin, NewDecodedVin, Vin};

/// SeaORM-backed [`DecodedVinStore`]
#[derive(Clone)]
pub struct DecodedVinSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
    page_size: u64,
}

impl DecodedVinSeaOrmRepository {
    /// `page_size` is the number of rows fetched per query during a scan
    pub fn new(connection: Arc<DatabaseConnection>, page_size: usize) -> Self {
        Self {
            connection,
            page_size: page_size.max(1) as u64,
        }
    }
}

impl From<decoded_vins::Model> for DecodedVin {
    fn from(model: decoded_vins::Model) -> Self {
        Self {
            vin: model.vin,
            make: model.make,
            model: model.model,
            model_year: model.model_year,
            body_class: model.body_class,
            cached: true,
            cached_at: model.cached_at,
        }
    }
}

#[async_trait]
impl DecodedVinStore for DecodedVinSeaOrmRepository {
    async fn get(&self, vin: &Vin) -> AppResult<Option<DecodedVin>> {
        let model = DecodedVins::find_by_id(vin.as_str().to_owned())
            .one(&*self.connection)
            .await?;

        Ok(model.map(DecodedVin::from))
    }

    async fn put(&self, record: NewDecodedVin) -> AppResult<DecodedVin> {
        let vin = record.vin;
        let attributes = record.attributes;

        let active_model = decoded_vins::ActiveModel {
            vin: Set(vin.to_string()),
            make: Set(attributes.make),
            model: Set(attributes.model),
            model_year: Set(attributes.model_year),
            body_class: Set(attributes.body_class),
            cached_at: Set(Utc::now()),
        };

        match active_model.insert(&*self.connection).await {
            Ok(model) => Ok(model.into()),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!(vin = %vin, "VIN already cached, keeping existing record");
                self.get(&vin).await?.ok_or_else(|| {
                    AppError::internal(format!(
                        "VIN {vin} reported as duplicate but no record could be read back"
                    ))
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, vin: &Vin) -> AppResult<bool> {
        let result = DecodedVins::delete_by_id(vin.as_str().to_owned())
            .exec(&*self.connection)
            .await?;

        Ok(result.rows_affected > 0)
    }

    fn scan_all(&self) -> RecordStream {
        Box::pin(scan_pages(self.connection.clone(), self.page_size))
    }
}

fn scan_pages(
    connection: Arc<DatabaseConnection>,
    page_size: u64,
) -> impl Stream<Item = AppResult<DecodedVin>> + Send + 'static {
    try_stream! {
        let mut pages = DecodedVins::find()
            .order_by_asc(decoded_vins::Column::Vin)
            .paginate(&*connection, page_size);

        while let Some(models) = pages.fetch_and_next().await? {
            for model in models {
                yield DecodedVin::from(model);
            }
        }
    }
}
