use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Pass `rows` through, or the `empty` outcome when there are none
pub fn non_empty<T>(rows: Vec<T>, empty: impl FnOnce() -> ApiError) -> Result<Vec<T>, ApiError> {
    if rows.is_empty() {
        Err(empty())
    } else {
        Ok(rows)
    }
}

/// Decode store rows into typed rows for aggregation.
///
/// A row that does not have the expected shape is a fault of this service,
/// not of the request, and is reported as such.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, ApiError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| ApiError::Unhandled(e.to_string())))
        .collect()
}
