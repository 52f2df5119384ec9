//! Full dump of the cache

use std::sync::Arc;

use crate::database::repositories::{DecodedVinStore, RecordStream};

/// Export orchestrator over an injected store
#[derive(Clone)]
pub struct VinExportService {
    store: Arc<dyn DecodedVinStore>,
}

impl VinExportService {
    pub fn new(store: Arc<dyn DecodedVinStore>) -> Self {
        Self { store }
    }

    /// Lazily yield every cached record.
    ///
    /// Serialization is left to the caller, see [`crate::export::parquet`].
    pub fn export_all(&self) -> RecordStream {
        self.store.scan_all()
    }
}
