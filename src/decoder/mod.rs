//! Upstream VIN decoding
//!
//! The cache only talks to the upstream provider through [`VinDecoder`], so
//! the lookup workflow can be exercised against scripted decoders in tests.
//! A decode call has three outcomes:
//!
//! - [`DecodeOutcome::Decoded`]: the provider accepted the VIN
//! - [`DecodeOutcome::Rejected`]: the call succeeded but the provider reports
//!   the VIN itself as invalid (non-zero error code in the body)
//! - `Err(DecoderError)`: the call itself failed

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DecodeError, VehicleAttributes, Vin};

pub mod nhtsa;

pub use nhtsa::NhtsaVinDecoder;

/// Result of a decode call that reached the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    Decoded(VehicleAttributes),
    Rejected(DecodeError),
}

/// Transport-level decoder failures
#[derive(Error, Debug)]
pub enum DecoderError {
    /// Network failure, client timeout or unreadable body
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status
    #[error("upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The provider answered successfully but with no result rows
    #[error("upstream returned no results for {vin}")]
    EmptyResults { vin: String },

    /// The body did not have the expected shape
    #[error("unexpected upstream payload: {0}")]
    Payload(String),
}

impl DecoderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

/// Capability to decode a VIN with an upstream provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VinDecoder: Send + Sync {
    async fn decode(&self, vin: &Vin) -> Result<DecodeOutcome, DecoderError>;
}
