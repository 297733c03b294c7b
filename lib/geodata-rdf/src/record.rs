use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// The pseudo-column that holds the reprojected geometry as WKT.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// A single attribute value of a parcel.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl AttributeValue {
    /// Returns whether this value must be treated like a missing value.
    ///
    /// This is the case for NaN and for text that only consists of whitespace.
    pub fn is_missing(&self) -> bool {
        match self {
            AttributeValue::Real(value) => value.is_nan(),
            AttributeValue::Text(value) => value.trim().is_empty(),
            AttributeValue::Integer(_) | AttributeValue::Boolean(_) | AttributeValue::Date(_) => {
                false
            }
        }
    }
}

/// Writes the lexical form of the value.
///
/// Integral reals have no fractional part (`123.0` is written as `123`).
impl Display for AttributeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Text(value) => f.write_str(value),
            AttributeValue::Integer(value) => write!(f, "{value}"),
            AttributeValue::Real(value) => write!(f, "{value}"),
            AttributeValue::Boolean(value) => write!(f, "{value}"),
            AttributeValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(i64::from(value))
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Real(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<NaiveDate> for AttributeValue {
    fn from(value: NaiveDate) -> Self {
        AttributeValue::Date(value)
    }
}

/// One row of the parcel layer.
///
/// Columns without an entry are null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParcelRecord {
    attributes: HashMap<String, AttributeValue>,
}

impl ParcelRecord {
    /// Creates a record without any attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column` to `value` and returns the record.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets `column` to `value`.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(column.into(), value.into());
    }

    /// Returns the value of `column`, or [None] if it is null, NaN or blank.
    pub fn get(&self, column: &str) -> Option<&AttributeValue> {
        self.attributes
            .get(column)
            .filter(|value| !value.is_missing())
    }

    /// Returns the WGS84 geometry as WKT.
    pub fn geometry(&self) -> Option<&AttributeValue> {
        self.get(GEOMETRY_COLUMN)
    }
}
