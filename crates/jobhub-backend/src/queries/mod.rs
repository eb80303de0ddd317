//! Typed query builders per consumed table.
//!
//! Each module owns the column names and row decoding for one table, so a
//! renamed column is a one-file change. All functions are plain reads over
//! the opaque [`DataBackend`] select interface.
//!
//! [`DataBackend`]: jobhub_core::traits::DataBackend

pub mod applications;
pub mod jobs;
pub mod notices;
pub mod pending;
pub mod profiles;

use jobhub_core::result::AppResult;

/// Decode a list of raw JSON rows into typed rows.
fn decode_rows<T: serde::de::DeserializeOwned>(rows: Vec<serde_json::Value>) -> AppResult<Vec<T>> {
    let mut decoded = Vec::with_capacity(rows.len());
    for row in rows {
        decoded.push(serde_json::from_value(row)?);
    }
    Ok(decoded)
}
