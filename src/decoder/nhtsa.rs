//! NHTSA vPIC `DecodeVinValues` client
//!
//! `GET {base_url}{VIN}?format=json` answers with a flat, all-string result
//! row. An `ErrorCode` of `"0"` means the VIN decoded cleanly; any other code
//! is a rejection of the VIN itself, still delivered with HTTP 200.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{DecodeOutcome, DecoderError, VinDecoder};
use crate::config::DecoderConfig;
use crate::models::{DecodeError, VehicleAttributes, Vin};

/// Error code vPIC uses for a clean decode
const SUCCESS_CODE: &str = "0";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VpicResponse {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    results: Vec<VpicResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VpicResult {
    error_code: Option<String>,
    error_text: Option<String>,
    additional_error_text: Option<String>,
    make: Option<String>,
    model: Option<String>,
    model_year: Option<String>,
    body_class: Option<String>,
}

/// reqwest-backed [`VinDecoder`] for the vPIC API
#[derive(Clone)]
pub struct NhtsaVinDecoder {
    client: Client,
    base_url: String,
}

impl NhtsaVinDecoder {
    pub fn new(config: &DecoderConfig) -> Result<Self, DecoderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Self { client, base_url }
    }

    fn decode_url(&self, vin: &Vin) -> String {
        format!("{}{}", self.base_url, vin)
    }
}

#[async_trait]
impl VinDecoder for NhtsaVinDecoder {
    async fn decode(&self, vin: &Vin) -> Result<DecodeOutcome, DecoderError> {
        let url = self.decode_url(vin);
        debug!(vin = %vin, url = %url, "Decoding VIN upstream");

        let response = self
            .client
            .get(&url)
            .query(&[("format", "json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DecoderError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        let payload: VpicResponse =
            serde_json::from_slice(&body).map_err(|e| DecoderError::Payload(e.to_string()))?;

        interpret_response(vin, payload)
    }
}

fn interpret_response(vin: &Vin, payload: VpicResponse) -> Result<DecodeOutcome, DecoderError> {
    let result = match payload.results.into_iter().next() {
        Some(result) if payload.count > 0 => result,
        _ => {
            return Err(DecoderError::EmptyResults {
                vin: vin.to_string(),
            });
        }
    };

    let attributes = VehicleAttributes {
        make: non_empty(result.make),
        model: non_empty(result.model),
        model_year: non_empty(result.model_year),
        body_class: non_empty(result.body_class),
    };

    match non_empty(result.error_code) {
        Some(code) if code == SUCCESS_CODE => Ok(DecodeOutcome::Decoded(attributes)),
        Some(code) => Ok(DecodeOutcome::Rejected(DecodeError {
            error_code: code,
            error_text: result.error_text,
            additional_error_text: result.additional_error_text,
        })),
        None if attributes.make.is_some() || attributes.model.is_some() => {
            Ok(DecodeOutcome::Decoded(attributes))
        }
        None => Err(DecoderError::Payload(format!(
            "result for {vin} has neither an error code nor vehicle attributes"
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
