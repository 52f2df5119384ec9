//! Apache Parquet serialization of decoded VIN records
//!
//! Records are pulled from the store stream `batch_size` at a time, turned
//! into Arrow record batches and written as one row group per batch.

use arrow_array::{ArrayRef, RecordBatch, StringArray, TimestampMillisecondArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef, TimeUnit};
use bytes::Bytes;
use futures::TryStreamExt;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::sync::Arc;
use tracing::debug;

use crate::database::repositories::RecordStream;
use crate::errors::AppResult;
use crate::models::DecodedVin;

const UTC: &str = "UTC";

/// Arrow schema of the exported file
pub fn record_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("vin", DataType::Utf8, false),
        Field::new("make", DataType::Utf8, true),
        Field::new("model", DataType::Utf8, true),
        Field::new("model_year", DataType::Utf8, true),
        Field::new("body_class", DataType::Utf8, true),
        Field::new(
            "cached_at",
            DataType::Timestamp(TimeUnit::Millisecond, Some(UTC.into())),
            false,
        ),
    ]))
}

/// Drain `records` into an in-memory Parquet file.
///
/// An empty stream still produces a valid file carrying the schema and no
/// rows.
pub async fn write_parquet(mut records: RecordStream, batch_size: usize) -> AppResult<Bytes> {
    let batch_size = batch_size.max(1);
    let schema = record_schema();
    let properties = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_max_row_group_size(batch_size)
        .build();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema.clone(), Some(properties))?;

    let mut pending: Vec<DecodedVin> = Vec::with_capacity(batch_size);
    let mut total_rows = 0usize;

    while let Some(record) = records.try_next().await? {
        pending.push(record);
        if pending.len() == batch_size {
            writer.write(&to_record_batch(&schema, &pending)?)?;
            total_rows += pending.len();
            pending.clear();
        }
    }

    if !pending.is_empty() {
        writer.write(&to_record_batch(&schema, &pending)?)?;
        total_rows += pending.len();
    }

    writer.close()?;
    debug!(rows = total_rows, bytes = buffer.len(), "Parquet export written");

    Ok(Bytes::from(buffer))
}

fn to_record_batch(schema: &SchemaRef, records: &[DecodedVin]) -> AppResult<RecordBatch> {
    let vins = StringArray::from_iter_values(records.iter().map(|r| r.vin.as_str()));
    let makes: StringArray = records.iter().map(|r| r.make.as_deref()).collect();
    let models: StringArray = records.iter().map(|r| r.model.as_deref()).collect();
    let model_years: StringArray = records.iter().map(|r| r.model_year.as_deref()).collect();
    let body_classes: StringArray = records.iter().map(|r| r.body_class.as_deref()).collect();
    let cached_at = TimestampMillisecondArray::from_iter_values(
        records.iter().map(|r| r.cached_at.timestamp_millis()),
    )
    .with_timezone(UTC);

    let columns: Vec<ArrayRef> = vec![
        Arc::new(vins),
        Arc::new(makes),
        Arc::new(models),
        Arc::new(model_years),
        Arc::new(body_classes),
        Arc::new(cached_at),
    ];

    Ok(RecordBatch::try_new(schema.clone(), columns)?)
}
