//! Centralized error handling for the VIN cache service
//!
//! Errors are split by the layer that raises them and unified under
//! [`AppError`], which the web layer maps onto HTTP status codes.
//!
//! # Error Categories
//!
//! - **Key format errors**: malformed VINs, rejected before any I/O
//! - **Decoder errors**: the upstream vPIC call failed at the transport level
//! - **Not found**: removal of a VIN that is not cached
//! - **Database errors**: SeaORM / sqlx failures
//! - **Export errors**: Arrow / Parquet serialization failures
//!
//! A VIN the upstream service rejects (bad check digit and similar) is *not*
//! an error; it is the [`crate::services::LookupOutcome::Invalid`] variant.
//!
//! # Usage
//!
//! ```rust
//! use vin_cache::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::not_found("VIN", "1XPWD40X1ED215307"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
