//! Job parameter values.
//!
//! Callers hand the service an ordered set of named parameters whose
//! values are either a single scalar, a structured object, or an ordered
//! sequence. [`ParameterValue`] models exactly those shapes; only
//! [`ParameterValue::Sequence`] is sent as a multi-valued parameter.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// Caller-supplied job parameters, kept in insertion order.
///
/// The order is part of the wire contract: parameters are submitted in
/// the order they were inserted.
pub type JobParameters = IndexMap<String, ParameterValue>;

/// The value of a single job parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// A structured object, passed through to the service unchanged.
    Object(Map<String, Value>),
    /// An ordered sequence; submitted as a multi-valued parameter.
    Sequence(Vec<Value>),
}

impl ParameterValue {
    /// `true` only for [`ParameterValue::Sequence`].
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Convert a single-valued parameter into its JSON form.
    ///
    /// Returns `None` for sequences, which are submitted through
    /// [`ParameterValue::as_values`] instead.
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Self::Null => Some(Value::Null),
            Self::Bool(b) => Some(Value::Bool(*b)),
            Self::Number(n) => Some(Value::Number(n.clone())),
            Self::String(s) => Some(Value::String(s.clone())),
            Self::Object(map) => Some(Value::Object(map.clone())),
            Self::Sequence(_) => None,
        }
    }

    /// The items of a multi-valued parameter, or `None` for anything else.
    pub fn as_values(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Value> for ParameterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) => Self::Object(map),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Map<String, Value>> for ParameterValue {
    fn from(value: Map<String, Value>) -> Self {
        Self::Object(value)
    }
}

impl From<f64> for ParameterValue {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParameterValue {
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl<T: Into<Value>> From<Vec<T>> for ParameterValue {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for ParameterValue {
    fn from(items: [T; N]) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}
