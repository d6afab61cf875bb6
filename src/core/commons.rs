// src/core/commons.rs

//! Value-format helpers shared by the tokenizer and the resolution engine.

use std::collections::HashMap;
use thiserror::Error;

/// A string that does not match the expected value format.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValueFormatError {
    /// A pair without `=` or with an empty key.
    #[error("Invalid key/value pair '{pair}'. Expected the format <key>=<value>.")]
    MalformedKeyValue {
        /// The offending pair.
        pair: String,
    },
}

/// Splits a comma delimited string into trimmed, non-empty tokens, keeping their order.
pub fn split_by_comma(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `<key1>=<value1>;<key2>=<value2>` into a map. Pairs may also be separated
/// by commas. A duplicate key keeps the last value seen.
pub fn parse_key_value_option(value: &str) -> Result<HashMap<String, String>, ValueFormatError> {
    let mut map = HashMap::new();
    for pair in value.split([';', ',']) {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (key, val) = pair
            .split_once('=')
            .ok_or_else(|| ValueFormatError::MalformedKeyValue {
                pair: pair.to_string(),
            })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ValueFormatError::MalformedKeyValue {
                pair: pair.to_string(),
            });
        }
        map.insert(key.to_string(), val.trim().to_string());
    }
    Ok(map)
}

/// Strict integer parsing: optional sign and digits only, after trimming.
pub fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok()
}

/// Strict boolean parsing: `true` or `false`, case-insensitive, after trimming.
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Returns the string when it has content, `None` for absent or empty values.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
