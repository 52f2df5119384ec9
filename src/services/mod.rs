//! Service layer
//!
//! The orchestrators here hold the cache workflow. They receive their store
//! and decoder through constructors and never log or swallow errors. Mapping
//! failures onto HTTP responses is left to the web layer.

pub mod export;
pub mod lookup;
pub mod removal;

pub use export::VinExportService;
pub use lookup::{LookupOutcome, VinLookupService};
pub use removal::VinRemovalService;
