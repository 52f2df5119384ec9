//! Decoded VIN records and the upstream rejection payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Vin;

/// Vehicle attributes reported by the upstream decoder.
///
/// Any attribute the upstream source did not supply is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VehicleAttributes {
    pub make: Option<String>,
    pub model: Option<String>,
    pub model_year: Option<String>,
    pub body_class: Option<String>,
}

/// The data of a decoded VIN as served to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DecodedVin {
    /// Canonical upper-case VIN
    #[schema(example = "1XPWD40X1ED215307")]
    pub vin: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub model_year: Option<String>,
    pub body_class: Option<String>,
    /// True when this response was served from the cache rather than
    /// decoded by the current request. Never persisted.
    pub cached: bool,
    /// When the VIN was first decoded and stored
    pub cached_at: DateTime<Utc>,
}

/// A freshly decoded VIN ready to be inserted into the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDecodedVin {
    pub vin: Vin,
    pub attributes: VehicleAttributes,
}

impl NewDecodedVin {
    pub fn new(vin: Vin, attributes: VehicleAttributes) -> Self {
        Self { vin, attributes }
    }
}

/// The upstream decoder accepted the request but reported the VIN itself as
/// invalid, for instance because the check digit does not calculate.
///
/// Field names follow the vPIC payload so the body can be handed back to
/// callers unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "ErrorCode": "1",
    "ErrorText": "1 - Check Digit (9th position) does not calculate properly",
    "AdditionalErrorText": ""
}))]
pub struct DecodeError {
    #[serde(rename = "ErrorCode")]
    pub error_code: String,
    #[serde(rename = "ErrorText")]
    pub error_text: Option<String>,
    #[serde(rename = "AdditionalErrorText")]
    pub additional_error_text: Option<String>,
}

/// The message returned when a cached VIN has been deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteVinSuccess {
    pub vin: String,
    pub deleted: bool,
}

impl DeleteVinSuccess {
    pub fn new(vin: &Vin) -> Self {
        Self {
            vin: vin.to_string(),
            deleted: true,
        }
    }
}
