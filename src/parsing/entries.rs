use crate::parsing::error::ParseError;
use log::warn;
use serde_json::{Map, Value};

/// Finds the list of entries in a JSON payload.
///
/// FMI returns either a bare array of entries or an object carrying them under
/// `data`. Any other shape yields `None` after a warning; callers turn that into
/// an empty table.
pub(crate) fn json_entries(payload: &Value) -> Option<&[Value]> {
    match payload {
        Value::Array(entries) => Some(entries),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(entries)) => Some(entries),
            _ => {
                warn!("Unexpected JSON object from FMI, no 'data' array: {}", payload);
                None
            }
        },
        other => {
            warn!("Unexpected JSON structure from FMI: {}", other);
            None
        }
    }
}

pub(crate) fn as_object(index: usize, entry: &Value) -> Result<&Map<String, Value>, ParseError> {
    entry.as_object().ok_or(ParseError::NotAnObject(index))
}

pub(crate) fn required<'a>(
    entry: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Value, ParseError> {
    match entry.get(field) {
        Some(Value::Null) | None => Err(ParseError::MissingField(field.to_string())),
        Some(value) => Ok(value),
    }
}

pub(crate) fn required_str<'a>(
    entry: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, ParseError> {
    required(entry, field)?
        .as_str()
        .ok_or_else(|| ParseError::UnexpectedFieldType {
            field: field.to_string(),
            expected: "a string",
        })
}

/// Reads a scalar that may arrive as a JSON number, a numeric string or `null`.
pub(crate) fn optional_number(value: &Value, field: &str) -> Result<Option<f64>, ParseError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|source| ParseError::MalformedValue {
                value: s.clone(),
                source,
            }),
        _ => Err(ParseError::UnexpectedFieldType {
            field: field.to_string(),
            expected: "a number",
        }),
    }
}
