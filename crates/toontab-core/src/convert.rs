//! Conversion boundary consumed by the surrounding application.
//!
//! Callers hand over raw text plus a mode flag and get back a response
//! envelope that is always safe to serialize straight to a client: either
//! `{success, mode, input, output}` or `{error, details}`. Core errors never
//! cross this boundary as Rust errors.

use crate::decoder::decode;
use crate::encoder::encode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Client-facing error string for the JSON to TOON direction.
const JSON_TO_TOON_ERROR: &str = "Invalid JSON or conversion failed";
/// Client-facing error string for the TOON to JSON direction.
const TOON_TO_JSON_ERROR: &str = "Invalid TOON format or parsing failed";

/// Conversion direction selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConvertMode {
    /// Parse `input` as JSON and encode it to TOON.
    JsonToToon,
    /// Decode `input` as TOON and serialize the records to pretty JSON.
    ToonToJson,
}

impl fmt::Display for ConvertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertMode::JsonToToon => f.write_str("json-to-toon"),
            ConvertMode::ToonToJson => f.write_str("toon-to-json"),
        }
    }
}

/// A conversion request: the raw input text and the direction to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub input: String,
    pub mode: ConvertMode,
}

/// Response envelope returned to the caller.
///
/// Serializes untagged: success responses carry `success`, `mode`, `input`,
/// and `output`; failures carry `error` and `details`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ConvertResponse {
    Success {
        success: bool,
        mode: ConvertMode,
        input: String,
        output: String,
    },
    Failure {
        error: String,
        details: String,
    },
}

impl ConvertResponse {
    /// True for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, ConvertResponse::Success { .. })
    }
}

/// Run one conversion, mapping every failure into the response envelope.
///
/// The `error` field of a failure is fixed per direction; `details` carries
/// the underlying parse or validation message.
pub fn convert(request: &ConvertRequest) -> ConvertResponse {
    match request.mode {
        ConvertMode::JsonToToon => json_to_toon(request),
        ConvertMode::ToonToJson => toon_to_json(request),
    }
}

fn json_to_toon(request: &ConvertRequest) -> ConvertResponse {
    let value: Value = match serde_json::from_str(&request.input) {
        Ok(value) => value,
        Err(err) => return failure(JSON_TO_TOON_ERROR, err.to_string()),
    };
    match encode(&value) {
        Ok(output) => success(request, output),
        Err(err) => failure(JSON_TO_TOON_ERROR, err.to_string()),
    }
}

fn toon_to_json(request: &ConvertRequest) -> ConvertResponse {
    // Empty TOON is the encoding of an empty array. The decoder itself
    // rejects sub-2-line documents, so the boundary closes the round trip.
    if request.input.trim().is_empty() {
        return success(request, "[]".to_string());
    }
    let decoded = match decode(&request.input) {
        Ok(decoded) => decoded,
        Err(err) => return failure(TOON_TO_JSON_ERROR, err.to_string()),
    };
    if let Some(mismatch) = decoded.count_mismatch {
        log::warn!("{mismatch}");
    }
    match serde_json::to_string_pretty(&decoded.into_value()) {
        Ok(output) => success(request, output),
        Err(err) => failure(TOON_TO_JSON_ERROR, err.to_string()),
    }
}

fn success(request: &ConvertRequest, output: String) -> ConvertResponse {
    ConvertResponse::Success {
        success: true,
        mode: request.mode,
        input: request.input.clone(),
        output,
    }
}

fn failure(error: &str, details: String) -> ConvertResponse {
    ConvertResponse::Failure {
        error: error.to_string(),
        details,
    }
}
