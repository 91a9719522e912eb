//! Response envelope parsing and row hydration.
//!
//! # Design
//! Two envelope shapes exist. Reads (Load, List, Create) answer
//! `{"resultSets": [row, ...]}`; writes (Commit, Delete) answer
//! `{"resultCode": "<int>", "resultMsg": "..."}`. Parsing is pure and never
//! touches the network. Every column travels as text: values are flattened
//! through `to_canonical_string` before an object sees them.

use serde_json::{Map, Value};

use crate::error::{DriverError, Result};
use crate::http::HttpResponse;
use crate::object::{HydrationMap, ObjectContract};

/// Message reported when a status envelope is missing or unusable.
pub const INVALID_RESPONSE: &str = "Invalid response";

/// Code reported when a status envelope is missing or unusable.
pub const INVALID_CODE: i64 = -1;

/// One JSON row, still untyped.
pub type Row = Map<String, Value>;

/// `(resultCode, resultMsg)` of a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultStatus {
    pub code: i64,
    pub message: String,
}

impl ResultStatus {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The status reported for every failed write.
    pub fn invalid() -> Self {
        Self::new(INVALID_CODE, INVALID_RESPONSE)
    }

    pub fn into_pair(self) -> (i64, String) {
        (self.code, self.message)
    }
}

/// Flatten a JSON value to the text handed to `populate`.
///
/// Strings pass through unquoted, numbers use JSON formatting, booleans
/// become `true`/`false`, arrays and objects become compact JSON. `null`
/// yields `None`, which keeps the key out of the hydration map.
pub fn to_canonical_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Keep only the whitelisted keys of `row`, stringified.
pub fn hydration_map(row: &Row, object: &dyn ObjectContract) -> HydrationMap {
    row.iter()
        .filter(|(name, _)| object.accepts_field(name))
        .filter_map(|(name, value)| to_canonical_string(value).map(|text| (name.clone(), text)))
        .collect()
}

/// Filter `row` through the object's whitelist and populate it.
pub fn hydrate(object: &mut dyn ObjectContract, row: &Row) {
    let fields = hydration_map(row, &*object);
    object.populate(&fields);
}

/// Extract the `resultSets` array of a read response.
///
/// Elements that are not JSON objects are kept as `None` so callers decide
/// whether to skip them (list) or reject them (single-row reads).
pub fn parse_rows(response: &HttpResponse) -> Result<Vec<Option<Row>>> {
    let mut envelope = parse_envelope(response)?;
    let result_sets = match envelope.remove("resultSets") {
        Some(Value::Array(rows)) => rows,
        _ => return Err(DriverError::UnexpectedShape("resultSets is not an array")),
    };
    Ok(result_sets
        .into_iter()
        .map(|row| match row {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect())
}

/// First row of a read response; the rest are ignored.
pub fn parse_first_row(response: &HttpResponse) -> Result<Row> {
    match parse_rows(response)?.into_iter().next() {
        Some(Some(row)) => Ok(row),
        Some(None) => Err(DriverError::UnexpectedShape("first row is not an object")),
        None => Err(DriverError::NoRows),
    }
}

/// `(resultCode, resultMsg)` of a write response.
///
/// A missing `resultCode` means `-1` and a missing `resultMsg` means
/// `"Invalid response"`. A `resultCode` that is neither an integer nor a
/// string holding exactly one (no padding) is an error.
pub fn parse_status(response: &HttpResponse) -> Result<ResultStatus> {
    let envelope = parse_envelope(response)?;
    let message = envelope
        .get("resultMsg")
        .and_then(Value::as_str)
        .unwrap_or(INVALID_RESPONSE)
        .to_string();
    let code = match envelope.get("resultCode") {
        None | Some(Value::Null) => INVALID_CODE,
        Some(Value::String(raw)) => raw
            .parse::<i64>()
            .map_err(|_| DriverError::InvalidResultCode(raw.clone()))?,
        // Wider than the wire contract, which only sends string-encoded integers.
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| DriverError::InvalidResultCode(n.to_string()))?,
        Some(other) => return Err(DriverError::InvalidResultCode(other.to_string())),
    };
    Ok(ResultStatus { code, message })
}

fn parse_envelope(response: &HttpResponse) -> Result<Row> {
    if response.status != 200 {
        return Err(DriverError::HttpStatus {
            status: response.status,
            body: response.body.clone(),
        });
    }
    let value: Value =
        serde_json::from_str(&response.body).map_err(|e| DriverError::Decode(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DriverError::UnexpectedShape("top level is not an object")),
    }
}
