//! Removal of cached VINs

use std::sync::Arc;
use tracing::info;

use crate::database::repositories::DecodedVinStore;
use crate::errors::{AppError, AppResult};
use crate::models::{DeleteVinSuccess, Vin};

/// Deletion orchestrator over an injected store
#[derive(Clone)]
pub struct VinRemovalService {
    store: Arc<dyn DecodedVinStore>,
}

impl VinRemovalService {
    pub fn new(store: Arc<dyn DecodedVinStore>) -> Self {
        Self { store }
    }

    /// Remove the cached record for `raw_vin`.
    ///
    /// Removing a VIN that is not cached fails with `NotFound`, so a second
    /// removal of the same VIN fails as well.
    pub async fn remove(&self, raw_vin: &str) -> AppResult<DeleteVinSuccess> {
        let vin = Vin::normalize(raw_vin)?;

        if !self.store.delete(&vin).await? {
            return Err(AppError::not_found("VIN", vin.as_str()));
        }

        info!(vin = %vin, "Removed cached VIN");
        Ok(DeleteVinSuccess::new(&vin))
    }
}
