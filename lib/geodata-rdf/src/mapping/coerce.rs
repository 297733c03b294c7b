//! Coercion of attribute values into the lexical forms of the target datatypes.

use crate::{AttributeValue, CoercionError};
use oxiri::Iri;
use oxrdf::NamedNode;
use oxsdatatypes::Date;
use std::str::FromStr;

/// Program code that marks "no program". It never produces a triple.
pub const NO_PROGRAM: &str = "Non";

/// 2^63, the first float outside the range of [i64].
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// How lexical forms of `xsd:date` values are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DatePolicy {
    /// Text values are passed through as they are.
    #[default]
    Permissive,
    /// Text values must be valid `xsd:date` lexical forms.
    Strict,
}

/// Truncates `value` toward zero.
pub fn to_integer(value: &AttributeValue) -> Result<i64, CoercionError> {
    let not_an_integer = || CoercionError::NotAnInteger(value.to_string());
    match value {
        AttributeValue::Integer(value) => Ok(*value),
        AttributeValue::Real(real) => truncate(*real).ok_or_else(not_an_integer),
        AttributeValue::Text(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(truncate))
                .ok_or_else(not_an_integer)
        }
        AttributeValue::Boolean(_) | AttributeValue::Date(_) => Err(not_an_integer()),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "The value is truncated and checked to be within range"
)]
fn truncate(value: f64) -> Option<i64> {
    let value = value.trunc();
    (value.is_finite() && value >= -I64_LIMIT && value < I64_LIMIT).then_some(value as i64)
}

/// Returns the four-digit `xsd:gYear` lexical form of an integer-valued year.
pub fn to_year(value: &AttributeValue) -> Result<String, CoercionError> {
    match to_integer(value) {
        Ok(year @ 0..=9999) => Ok(format!("{year:04}")),
        _ => Err(CoercionError::NotAYear(value.to_string())),
    }
}

/// Interprets numbers and common yes/no words as booleans.
pub fn to_boolean(value: &AttributeValue) -> Result<bool, CoercionError> {
    match value {
        AttributeValue::Boolean(value) => Ok(*value),
        AttributeValue::Integer(value) => Ok(*value != 0),
        AttributeValue::Real(value) => Ok(*value != 0.0),
        AttributeValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "yes" | "y" | "ja" | "j" => Ok(true),
            "false" | "f" | "0" | "no" | "n" | "nein" => Ok(false),
            _ => Err(CoercionError::NotABoolean(text.clone())),
        },
        AttributeValue::Date(_) => Err(CoercionError::NotABoolean(value.to_string())),
    }
}

/// Returns the `xsd:date` lexical form of `value`.
///
/// Dates are formatted as `YYYY-MM-DD`. Other values are passed through unless `policy` is
/// [DatePolicy::Strict].
pub fn to_date(value: &AttributeValue, policy: DatePolicy) -> Result<String, CoercionError> {
    if let AttributeValue::Date(date) = value {
        return Ok(date.format("%Y-%m-%d").to_string());
    }

    let lexical = value.to_string();
    match policy {
        DatePolicy::Permissive => Ok(lexical),
        DatePolicy::Strict => {
            let trimmed = lexical.trim();
            match Date::from_str(trimmed) {
                Ok(_) => Ok(trimmed.to_owned()),
                Err(_) => Err(CoercionError::InvalidDate(lexical)),
            }
        }
    }
}

/// Appends the lexical form of `value` to `namespace`.
pub fn to_reference(namespace: &str, value: &AttributeValue) -> Result<NamedNode, CoercionError> {
    to_iri(format!("{namespace}{}", value.to_string().trim()))
}

pub(crate) fn to_iri(iri: String) -> Result<NamedNode, CoercionError> {
    match Iri::parse(iri.as_str()) {
        Ok(_) => Ok(NamedNode::new_unchecked(iri)),
        Err(source) => Err(CoercionError::InvalidIri { iri, source }),
    }
}

/// Splits a semicolon-delimited list of program codes.
///
/// Blank tokens and [NO_PROGRAM] are dropped.
pub fn split_codes(codes: &str) -> impl Iterator<Item = &str> {
    codes
        .split(';')
        .map(str::trim)
        .filter(|code| !code.is_empty() && *code != NO_PROGRAM)
}
