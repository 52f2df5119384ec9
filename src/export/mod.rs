//! Serialization of cache dumps into downloadable files

pub mod parquet;

pub use self::parquet::{record_schema, write_parquet};
