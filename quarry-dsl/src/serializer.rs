//! JSON text output for builders.
//!
//! Builders already hold their wire keys, so serialization is a straight
//! walk of the tree. Key order is insertion order at every level.

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

/// Serialize `value` to JSON text, indented when `pretty` is set.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// Serialize `value` into an in-memory JSON tree.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
