//! Error type definitions for the VIN cache service

use thiserror::Error;

use crate::decoder::DecoderError;
use crate::models::VinFormatError;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The supplied VIN is not 17 alphanumeric characters
    #[error("Invalid VIN: {0}")]
    InvalidVin(#[from] VinFormatError),

    /// The upstream decoder could not be reached or answered with a failure
    #[error("Decoder error: {0}")]
    Decoder(#[from] DecoderError),

    /// Resource not found errors
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// Database-related errors (SeaORM)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Columnar export failures
    #[error("Export error: {message}")]
    Export { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a not-found error for a resource and its identifier
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create an export error
    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<parquet::errors::ParquetError> for AppError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        Self::export(err.to_string())
    }
}

impl From<arrow_schema::ArrowError> for AppError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        Self::export(err.to_string())
    }
}
