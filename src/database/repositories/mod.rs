//! SeaORM repository implementations

pub mod decoded_vin;
pub mod traits;

pub use decoded_vin::DecodedVinSeaOrmRepository;
pub use traits::{DecodedVinStore, RecordStream};
