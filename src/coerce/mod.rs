//! # Type Coercion
//!
//! Best-effort conversion of string-encoded condition fields (`"0.04"`,
//! `"[180.0]"`, `"null"`) into native scalars.
//!
//! Coercion never fails. A value that cannot be parsed comes back unchanged as
//! [`Coerced::Passthrough`], so malformed encodings survive into the output
//! instead of aborting the session.
//!
//! ```
//! use ecephys_tables::coerce::{coerce_literal, Coerced, ListNarrowing};
//! use ecephys_tables::value::Value;
//!
//! let c = coerce_literal(&Value::from("[2.0]"), ListNarrowing::First);
//! assert_eq!(c, Coerced::Parsed(Value::Float64(2.0)));
//!
//! let c = coerce_literal(&Value::from("abc"), ListNarrowing::First);
//! assert_eq!(c.into_value(), Value::from("abc"));
//! ```

mod literal;


use log::warn;
use serde::Deserialize;

use crate::value::Value;

pub use literal::{parse_literal, LiteralError};

/// String that encodes a missing value in raw stimulus tables
pub const NULL_SENTINEL: &str = "null";

/// What to do when a field parses to a bracketed list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListNarrowing {
    /// Keep only the first element; warn when more than one is present
    #[default]
    First,
    /// Keep the parsed list as is
    Keep,
}

/// Result of a coercion attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// Null sentinel, missing marker or parsed `None`
    Missing,
    /// Successfully parsed literal
    Parsed(Value),
    /// Input left as it was (not a string, or not a literal)
    Passthrough(Value),
}

impl Coerced {
    /// Collapse into the value to store.
    pub fn into_value(self) -> Value {
        match self {
            Coerced::Missing => Value::Null,
            Coerced::Parsed(v) | Coerced::Passthrough(v) => v,
        }
    }

    /// True if the raw value was parsed.
    pub fn is_parsed(&self) -> bool {
        matches!(self, Coerced::Parsed(_))
    }
}

/// True for the exact null sentinel string.
pub fn is_null_sentinel(value: &Value) -> bool {
    value.as_str() == Some(NULL_SENTINEL)
}

/// Coerce one raw field value.
///
/// Only strings are parsed. Native scalars and lists pass through untouched,
/// which also makes coercion idempotent.
pub fn coerce_literal(raw: &Value, narrowing: ListNarrowing) -> Coerced {
    if raw.is_missing() || is_null_sentinel(raw) {
        return Coerced::Missing;
    }

    let text = match raw {
        Value::Utf8(s) => s,
        other => return Coerced::Passthrough(other.clone()),
    };

    match parse_literal(text) {
        Ok(Value::Null) => Coerced::Missing,
        // tuples are stored whole; only bracketed lists are narrowed
        Ok(v @ Value::List(_)) if is_tuple_text(text) => Coerced::Parsed(v),
        Ok(Value::List(items)) => narrow_list(text, items, narrowing),
        Ok(v) => Coerced::Parsed(v),
        Err(_) => Coerced::Passthrough(raw.clone()),
    }
}

fn is_tuple_text(text: &str) -> bool {
    text.trim_start().starts_with('(')
}

fn narrow_list(text: &str, mut items: Vec<Value>, narrowing: ListNarrowing) -> Coerced {
    match narrowing {
        ListNarrowing::Keep => Coerced::Parsed(Value::List(items)),
        ListNarrowing::First => {
            if items.is_empty() {
                return Coerced::Missing;
            }
            if items.len() > 1 {
                warn!(
                    "Literal {:?} holds {} elements; keeping only the first",
                    text,
                    items.len()
                );
            }
            match items.swap_remove(0) {
                v if v.is_missing() => Coerced::Missing,
                v => Coerced::Parsed(v),
            }
        }
    }
}
