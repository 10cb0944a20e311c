//! Serde helpers for Splunk's inconsistent JSON typing.
//!
//! Responsibilities:
//! - Provide deserializers that accept either JSON numbers or strings for numeric fields.
//! - Keep parsing behavior centralized so model definitions stay readable and consistent.
//!
//! Explicitly does NOT handle:
//! - Validating higher-level semantics (ranges, required/optional business rules).
//! - Normalizing units or performing domain conversions.
//!
//! Invariants / assumptions:
//! - Splunk may return numeric fields as `"123"` strings or as `123` numbers depending on endpoint/version.
//! - These helpers must not log or print secrets; errors should be generic parse errors.

use serde::Deserialize;
use serde::de::Error as _;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum U64OrString {
    U64(u64),
    I64(i64),
    String(String),
}

pub fn usize_from_string_or_number<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = U64OrString::deserialize(deserializer)?;
    match value {
        U64OrString::U64(v) => Ok(v as usize),
        U64OrString::I64(v) => usize::try_from(v).map_err(D::Error::custom),
        U64OrString::String(s) => s.parse::<usize>().map_err(D::Error::custom),
    }
}

pub fn opt_usize_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<U64OrString>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(U64OrString::U64(v)) => Ok(Some(v as usize)),
        Some(U64OrString::I64(v)) => Ok(Some(usize::try_from(v).map_err(D::Error::custom)?)),
        Some(U64OrString::String(s)) => Ok(Some(s.parse::<usize>().map_err(D::Error::custom)?)),
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoolOrNumber {
    Bool(bool),
    U64(u64),
    String(String),
}

/// Accepts `true`, `1`, `"1"` or `"true"` style flags.
pub fn bool_from_bool_or_number<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match BoolOrNumber::deserialize(deserializer)? {
        BoolOrNumber::Bool(b) => Ok(b),
        BoolOrNumber::U64(v) => Ok(v != 0),
        BoolOrNumber::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean flag: {other}"))),
        },
    }
}
