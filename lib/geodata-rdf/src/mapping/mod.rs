//! The attribute-to-triple mapping engine.
//!
//! A [ParcelMapping] is a declarative table of rules. Each rule maps a source column to a
//! predicate and describes how the value is coerced. Missing values never produce a triple.

mod coerce;
mod emit;
mod rule;

pub use coerce::{split_codes, to_boolean, to_date, to_integer, to_reference, to_year};
pub use coerce::{DatePolicy, NO_PROGRAM};
pub use emit::*;
pub use rule::*;
