//! Field-path extraction from generated objects.

use serde_json::Value;
use thiserror::Error;

/// Why a path could not be resolved against a generated object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The named field is absent from the object it was looked up in.
    #[error("field `{0}` not found in generated output")]
    MissingField(String),

    /// A path segment landed on a value that is not an object.
    #[error("path segment `{0}` does not address an object in generated output")]
    NotAnObject(String),
}

/// Pulls the value at `path` out of `value`.
///
/// Segments are separated by `.` and each must name a field of the object it
/// is applied to. The error names the first segment that failed to resolve.
pub fn extract_field(value: &Value, path: &str) -> Result<Value, ExtractError> {
    let mut current = value;
    for segment in path.split('.') {
        let Value::Object(map) = current else {
            return Err(ExtractError::NotAnObject(segment.to_string()));
        };
        current = map
            .get(segment)
            .ok_or_else(|| ExtractError::MissingField(segment.to_string()))?;
    }
    Ok(current.clone())
}
