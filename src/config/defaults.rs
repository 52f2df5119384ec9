//! Configuration default values
//!
//! This module contains all the default values for configuration options,
//! making them easily changeable in one central location.

// Database defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/vin-cache.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Upstream decoder defaults
pub const DEFAULT_DECODER_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api/vehicles/DecodeVinValues/";
pub const DEFAULT_DECODER_TIMEOUT_SECS: u64 = 10;

// Export defaults
pub const DEFAULT_EXPORT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_EXPORT_FILE_NAME: &str = "decoded_vins.parquet";

// Environment overrides, e.g. VIN_CACHE_WEB__PORT=9000
pub const ENV_PREFIX: &str = "VIN_CACHE_";
pub const ENV_NESTING_SEPARATOR: &str = "__";
