//! Storage capability consumed by the cache services
//!
//! The services are written against [`DecodedVinStore`] rather than a
//! concrete repository so tests can substitute mocks.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::errors::AppResult;
use crate::models::{DecodedVin, NewDecodedVin, Vin};

/// Lazy, finite stream of stored records
pub type RecordStream = BoxStream<'static, AppResult<DecodedVin>>;

/// Point-access persistence for decoded VIN records, keyed by canonical VIN.
///
/// Records handed out by a store always carry `cached = true`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DecodedVinStore: Send + Sync {
    /// Point lookup without side effects
    async fn get(&self, vin: &Vin) -> AppResult<Option<DecodedVin>>;

    /// Insert a freshly decoded record and return it as stored.
    ///
    /// If a record for the VIN already exists it is left untouched and the
    /// existing record is returned (first write wins).
    async fn put(&self, record: NewDecodedVin) -> AppResult<DecodedVin>;

    /// Remove the record for `vin`; `false` when there was none
    async fn delete(&self, vin: &Vin) -> AppResult<bool>;

    /// Start a fresh full scan. Ordering is by VIN but callers must not rely on it.
    fn scan_all(&self) -> RecordStream;
}
