//! Domain models

pub mod decoded_vin;
pub mod vin;

pub use decoded_vin::{DecodeError, DecodedVin, DeleteVinSuccess, NewDecodedVin, VehicleAttributes};
pub use vin::{VIN_LENGTH, Vin, VinFormatError};
