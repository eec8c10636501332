use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt::{self, Debug, Formatter};
use serde::{Deserialize, Deserializer};

use crate::{
    any::Instance,
    utils::thread_safety::{RcCallableThreadSafety, RcThreadSafety},
};

/// Dynamically typed value used for call-time parameters, configured parameters,
/// parameter defaults and constructor arguments.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Callable(Callable),
    Instance(Instance),
}

impl Value {
    /// Name of the value kind as used by builtin parameter types.
    /// Maps are reported as `array`, instances as `object`.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) | Value::Map(_) => "array",
            Value::Callable(_) => "callable",
            Value::Instance(_) => "object",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(val) => Some(val),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(val) => Some(*val),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(val) => Some(*val),
            Value::Int(val) => Some(*val as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(val) => Some(*val),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// JSON literal of a scalar or null, `None` for everything else
    #[must_use]
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            Value::Null => Some(serde_json::Value::Null),
            Value::Bool(val) => Some(serde_json::Value::Bool(*val)),
            Value::Int(val) => Some(serde_json::Value::from(*val)),
            Value::Float(val) => serde_json::Number::from_f64(*val).map(serde_json::Value::Number),
            Value::String(val) => Some(serde_json::Value::String(val.clone())),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(val) => Value::Bool(val),
            serde_json::Value::Number(val) => match val.as_i64() {
                Some(val) => Value::Int(val),
                None => Value::Float(val.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(val) => Value::String(val),
            serde_json::Value::Array(vals) => Value::Array(vals.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Map(map.into_iter().map(|(key, val)| (key, Value::from(val))).collect()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Value::Map(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Value::Instance(value)
    }
}

impl From<Callable> for Value {
    fn from(value: Callable) -> Self {
        Value::Callable(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A function value, compared by identity
#[derive(Clone)]
pub struct Callable(RcCallableThreadSafety);

impl Callable {
    #[cfg(feature = "thread_safe")]
    #[inline]
    #[must_use]
    pub fn new(f: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self(RcThreadSafety::new(f))
    }

    #[cfg(not(feature = "thread_safe"))]
    #[inline]
    #[must_use]
    pub fn new(f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self(RcThreadSafety::new(f))
    }

    #[inline]
    #[must_use]
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        RcCallableThreadSafety::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Callable")
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{Callable, Value};
    use crate::any::Instance;

    use alloc::{collections::BTreeMap, string::String, vec};

    #[test]
    fn test_kind_name() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::from(1).kind_name(), "int");
        assert_eq!(Value::from(1.5).kind_name(), "float");
        assert_eq!(Value::from("a").kind_name(), "string");
        assert_eq!(Value::from(vec![Value::Null]).kind_name(), "array");
        assert_eq!(Value::Map(BTreeMap::new()).kind_name(), "array");
        assert_eq!(Value::from(Callable::new(|_| Value::Null)).kind_name(), "callable");
        assert_eq!(Value::from(Instance::new("A", ())).kind_name(), "object");
    }

    #[test]
    fn test_from_json() {
        let value: Value = serde_json::from_str(r#"{"a": 1, "b": [true, 2.5, null], "c": "x"}"#).unwrap();

        let mut expected = BTreeMap::new();
        expected.insert(String::from("a"), Value::Int(1));
        expected.insert(String::from("b"), Value::Array(vec![Value::Bool(true), Value::Float(2.5), Value::Null]));
        expected.insert(String::from("c"), Value::from("x"));

        assert_eq!(value, Value::Map(expected));
    }

    #[test]
    fn test_to_json() {
        assert_eq!(Value::from("a").to_json(), Some(serde_json::Value::from("a")));
        assert_eq!(Value::Null.to_json(), Some(serde_json::Value::Null));
        assert_eq!(Value::from(vec![Value::Null]).to_json(), None);
        assert_eq!(Value::from(f64::NAN).to_json(), None);
    }

    #[test]
    fn test_callable_identity() {
        let callable = Callable::new(|args| args.first().cloned().unwrap_or_default());

        assert_eq!(callable.call(&[Value::from(3)]), Value::Int(3));
        assert_eq!(callable, callable.clone());
        assert_ne!(callable, Callable::new(|_| Value::Null));
    }

    #[test]
    fn test_float_accepts_int() {
        assert_eq!(Value::from(2).as_float(), Some(2.0));
        assert_eq!(Value::from("2").as_float(), None);
    }
}
