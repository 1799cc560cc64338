//! Runtime values.

use std::fmt;
use std::sync::Arc;

use crate::binding::StructValue;

/// A value produced by evaluation or supplied by the host.
///
/// Every variant is cheap to clone: strings, arrays and structs are shared.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(Arc<str>),
    /// Host-supplied list, read by `for_each` and `base[index]`.
    Array(Arc<[Value]>),
    /// Host-defined object with named members.
    Struct(Arc<dyn StructValue>),
    /// Result of statements, loops and unset conditionals.
    Void,
}

impl Value {
    pub const ZERO: Value = Value::Number(0.0);

    pub fn array(items: impl IntoIterator<Item = Value>) -> Value {
        Value::Array(items.into_iter().collect())
    }

    pub fn structure(value: impl StructValue + 'static) -> Value {
        Value::Struct(Arc::new(value))
    }

    /// Numeric view. Anything that is not a number reads as `0`.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::String(_) | Value::Array(_) | Value::Struct(_) | Value::Void => 0.0,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => molang_ir::is_truthy(*n),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Struct(_) => true,
            Value::Void => false,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::ZERO
    }
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => Arc::ptr_eq(a, b),
            (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Struct(s) => f.debug_tuple("Struct").field(s).finish(),
            Value::Void => f.write_str("Void"),
        }
    }
}

/// The stable textual form used by the REPL and golden files.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Struct(_) => f.write_str("<struct>"),
            Value::Void => f.write_str("void"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Number(molang_ir::bool_to_f64(b))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Arc::from(items))
    }
}
