//! Typed values for flags and positional arguments.
//!
//! Every flag and positional definition declares a [`ValueKind`]; raw
//! command-line text, environment-variable text, and declared defaults all
//! meet at the tagged [`Value`] and the single conversion routine
//! [`Value::parse`].

use std::fmt;
use std::num::IntErrorKind;

use crate::error::ParseError;

/// Kind of value a flag or positional argument carries.
///
/// # Examples
///
/// ```
/// use cmdtree_core::ValueKind;
///
/// assert_eq!(ValueKind::default(), ValueKind::Str);
/// assert_eq!(ValueKind::Int.to_string(), "int");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// Boolean, parsed from `true`/`false` (case-insensitive).
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit floating-point number.
    Float,
    /// Verbatim string (the default).
    #[default]
    Str,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
        };
        f.write_str(name)
    }
}

/// A tagged value produced by parsing raw text against a [`ValueKind`].
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Value, ValueKind};
///
/// let parsed = Value::parse(ValueKind::Int, "42").unwrap();
/// assert_eq!(parsed, Value::Int(42));
/// assert_eq!(parsed.kind(), ValueKind::Int);
///
/// assert!(Value::parse(ValueKind::Bool, "maybe").is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Parses raw text into a value of the given kind.
    ///
    /// This is the one conversion routine shared by the flag parser, the
    /// environment-variable chain, and positional access:
    ///
    /// - `Bool` accepts case-insensitive `true`/`false` only.
    /// - `Int` parses signed 64-bit decimal; overflow is reported as
    ///   [`ParseError::IntegerValueOutOfRange`], anything else as
    ///   [`ParseError::InvalidIntegerLiteral`].
    /// - `Float` parses an `f64`.
    /// - `Str` passes the text through.
    pub fn parse(kind: ValueKind, raw: &str) -> Result<Self, ParseError> {
        match kind {
            ValueKind::Bool => {
                if raw.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(ParseError::InvalidBoolString(raw.to_string()))
                }
            }
            ValueKind::Int => raw.parse::<i64>().map(Value::Int).map_err(|err| {
                match err.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        ParseError::IntegerValueOutOfRange(raw.to_string())
                    }
                    _ => ParseError::InvalidIntegerLiteral(raw.to_string()),
                }
            }),
            ValueKind::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| ParseError::InvalidFloatLiteral(raw.to_string())),
            ValueKind::Str => Ok(Value::Str(raw.to_string())),
        }
    }

    /// Returns the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
        }
    }
}
