//! Cache-aside VIN lookup
//!
//! `lookup` normalizes the key, consults the store and only on a miss asks
//! the upstream decoder. Successful decodes are persisted before they are
//! returned; rejected VINs are never persisted.

use std::sync::Arc;
use tracing::{debug, info};

use crate::database::repositories::DecodedVinStore;
use crate::decoder::{DecodeOutcome, VinDecoder};
use crate::errors::AppResult;
use crate::models::{DecodeError, DecodedVin, NewDecodedVin, Vin};

/// Result of a lookup that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The record, with `cached` telling whether it came from the store
    Found(DecodedVin),
    /// The upstream decoder rejected the VIN; nothing was stored
    Invalid(DecodeError),
}

/// Lookup orchestrator over an injected store and decoder
#[derive(Clone)]
pub struct VinLookupService {
    store: Arc<dyn DecodedVinStore>,
    decoder: Arc<dyn VinDecoder>,
}

impl VinLookupService {
    pub fn new(store: Arc<dyn DecodedVinStore>, decoder: Arc<dyn VinDecoder>) -> Self {
        Self { store, decoder }
    }

    /// Look up `raw_vin`, decoding and caching it on a miss.
    ///
    /// Fails with [`AppError::InvalidVin`](crate::errors::AppError::InvalidVin)
    /// before any I/O when the key is malformed, and with
    /// [`AppError::Decoder`](crate::errors::AppError::Decoder) when the
    /// upstream call fails. Upstream failures are not retried.
    pub async fn lookup(&self, raw_vin: &str) -> AppResult<LookupOutcome> {
        let vin = Vin::normalize(raw_vin)?;

        if let Some(mut record) = self.store.get(&vin).await? {
            debug!(vin = %vin, "Cache hit");
            record.cached = true;
            return Ok(LookupOutcome::Found(record));
        }

        debug!(vin = %vin, "Cache miss, decoding upstream");
        match self.decoder.decode(&vin).await? {
            DecodeOutcome::Decoded(attributes) => {
                let mut record = self.store.put(NewDecodedVin::new(vin, attributes)).await?;
                record.cached = false;
                info!(vin = %record.vin, make = ?record.make, "Cached newly decoded VIN");
                Ok(LookupOutcome::Found(record))
            }
            DecodeOutcome::Rejected(error) => {
                debug!(vin = %vin, error_code = %error.error_code, "Upstream rejected VIN");
                Ok(LookupOutcome::Invalid(error))
            }
        }
    }
}
