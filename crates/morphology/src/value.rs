//! Attribute Values and Type Tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of a single attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DType {
    Bool,
    Int64,
    Float64,
    Str,
    /// Mixed values that share no common type
    Object,
}

impl DType {
    /// Whether values of this type can be used as-is by numeric ML code.
    ///
    /// Booleans are deliberately not numeric: they are treated as categories.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Str => "str",
            DType::Object => "object",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar value of a neuron attribute or summary cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Attribute exists but has no value
    Missing,
}

impl AttrValue {
    /// Type tag of the value, `None` when missing
    pub fn dtype(&self) -> Option<DType> {
        match self {
            AttrValue::Bool(_) => Some(DType::Bool),
            AttrValue::Int(_) => Some(DType::Int64),
            AttrValue::Float(_) => Some(DType::Float64),
            AttrValue::Str(_) => Some(DType::Str),
            AttrValue::Missing => None,
        }
    }

    /// Check if the value is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, AttrValue::Missing)
    }

    /// Numeric view of the value (ints and floats only)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// String view of the value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Parse free text (e.g. an SWC header field) into the narrowest value type
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text {
            "" | "None" | "null" | "NaN" | "nan" => return AttrValue::Missing,
            "True" | "true" => return AttrValue::Bool(true),
            "False" | "false" => return AttrValue::Bool(false),
            _ => {}
        }
        if let Ok(v) = text.parse::<i64>() {
            return AttrValue::Int(v);
        }
        if let Ok(v) = text.parse::<f64>() {
            return AttrValue::Float(v);
        }
        AttrValue::Str(text.to_string())
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(v) => write!(f, "{}", v),
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::Str(v) => f.write_str(v),
            AttrValue::Missing => f.write_str("None"),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<usize> for AttrValue {
    fn from(v: usize) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Float(v as f64)
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(AttrValue::Missing)
    }
}

/// Common type of a column of values, the way a dataframe column would be typed.
///
/// Missing values are skipped, except that an integer column containing gaps
/// widens to float. Returns `None` when every value is missing.
pub fn column_dtype(values: &[AttrValue]) -> Option<DType> {
    let mut seen: Option<DType> = None;
    let mut has_missing = false;

    for value in values {
        let Some(dtype) = value.dtype() else {
            has_missing = true;
            continue;
        };
        seen = Some(match seen {
            None => dtype,
            Some(prev) if prev == dtype => prev,
            Some(prev) if prev.is_numeric() && dtype.is_numeric() => DType::Float64,
            Some(_) => DType::Object,
        });
    }

    match seen {
        Some(DType::Int64) if has_missing => Some(DType::Float64),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_dtypes() {
        assert!(DType::Int64.is_numeric());
        assert!(DType::Float64.is_numeric());
        assert!(!DType::Bool.is_numeric());
        assert!(!DType::Str.is_numeric());
        assert!(!DType::Object.is_numeric());
    }

    #[test]
    fn test_value_dtype() {
        assert_eq!(AttrValue::Int(1).dtype(), Some(DType::Int64));
        assert_eq!(AttrValue::from("gamma").dtype(), Some(DType::Str));
        assert_eq!(AttrValue::Missing.dtype(), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(AttrValue::parse("42"), AttrValue::Int(42));
        assert_eq!(AttrValue::parse(" 2.5 "), AttrValue::Float(2.5));
        assert_eq!(AttrValue::parse("True"), AttrValue::Bool(true));
        assert_eq!(AttrValue::parse("None"), AttrValue::Missing);
        assert_eq!(AttrValue::parse("PAM12"), AttrValue::Str("PAM12".to_string()));
    }

    #[test]
    fn test_column_dtype_promotion() {
        let ints = vec![AttrValue::Int(1), AttrValue::Int(2)];
        assert_eq!(column_dtype(&ints), Some(DType::Int64));

        let mixed = vec![AttrValue::Int(1), AttrValue::Float(2.5)];
        assert_eq!(column_dtype(&mixed), Some(DType::Float64));

        let gappy = vec![AttrValue::Int(1), AttrValue::Missing];
        assert_eq!(column_dtype(&gappy), Some(DType::Float64));

        let object = vec![AttrValue::Int(1), AttrValue::from("a")];
        assert_eq!(column_dtype(&object), Some(DType::Object));

        assert_eq!(column_dtype(&[AttrValue::Missing]), None);
    }

    #[test]
    fn test_option_conversion() {
        let none: Option<f64> = None;
        assert_eq!(AttrValue::from(none), AttrValue::Missing);
        assert_eq!(AttrValue::from(Some(3i64)), AttrValue::Int(3));
    }

    proptest::proptest! {
        #[test]
        fn prop_parse_integers(v in proptest::num::i64::ANY) {
            proptest::prop_assert_eq!(AttrValue::parse(&v.to_string()), AttrValue::Int(v));
        }

        #[test]
        fn prop_int_columns_stay_int(values in proptest::collection::vec(proptest::num::i64::ANY, 1..20)) {
            let column: Vec<AttrValue> = values.into_iter().map(AttrValue::Int).collect();
            proptest::prop_assert_eq!(column_dtype(&column), Some(DType::Int64));
        }
    }
}
