//! Literal values

use serde::{Serialize, Serializer};

/// Largest magnitude at which every integer is exactly representable in an `f64`
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Value of a [`Node::Literal`](crate::Node::Literal)
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Numeric value
    Number(f64),
    /// String value, without quotes
    String(String),
}

impl Serialize for LiteralValue {
    /// Whole numbers serialize as JSON integers, so `1` stays `1` rather than `1.0`
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(value) if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*value as i64)
            }
            Self::Number(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
        }
    }
}
