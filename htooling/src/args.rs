//! Helpers for decoding the JSON argument string the model sends with a call.
//!
//! ```rust
//! use htooling::{parse_json_object, required_string};
//!
//! let args = parse_json_object(r#"{"city":"Shenzhen"}"#).expect("object should parse");
//! let city = required_string(&args, "city").expect("city should be present");
//! assert_eq!(city, "Shenzhen");
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

/// Parses tool arguments. The model sends `""` for a call without
/// parameters, which is read as an empty object.
pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    if args_json.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("arguments are not valid JSON: {err}")))
}

pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    match parse_json_value(args_json)? {
        Value::Object(object) => Ok(object),
        other => Err(ToolError::invalid_arguments(format!(
            "expected a JSON object of arguments, got {other}"
        ))),
    }
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing string argument '{key}'")))
}
