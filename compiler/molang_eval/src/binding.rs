//! The host binding boundary.
//!
//! A [`Binding`] backs one host scope (`query`, `variable`, `context`,
//! `global`) for one evaluation. Absence is reported as `None`, never as an
//! error; the interpreter turns it into the default value. Errors are kept for
//! contract violations such as writing a read-only member.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::errors::BindingError;
use crate::Value;

/// Members of one host scope.
///
/// Member names arrive lower-cased.
pub trait Binding {
    /// Read a member. `None` when the member does not exist.
    fn get(&self, name: &str) -> Option<Value>;

    /// Write a member. Bindings may create members on demand.
    fn set(&mut self, name: &str, value: Value) -> Result<(), BindingError>;

    /// Call a member. `Ok(None)` when the member does not exist.
    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, BindingError>;
}

/// A host object reachable through a binding, for nested paths such as
/// `variable.target.health` and as the receiver of `->`.
///
/// Structs are shared between threads and evaluations, so writes go through
/// `&self`.
pub trait StructValue: Send + Sync + fmt::Debug {
    fn get(&self, name: &str) -> Option<Value>;

    fn set(&self, name: &str, value: Value) -> Result<(), BindingError> {
        let _ = value;
        Err(BindingError::ReadOnly {
            member: name.to_string(),
        })
    }

    fn invoke(&self, name: &str, args: &[Value]) -> Result<Option<Value>, BindingError> {
        let _ = args;
        match self.get(name) {
            Some(_) => Err(BindingError::NotCallable {
                member: name.to_string(),
            }),
            None => Ok(None),
        }
    }
}

/// A native function exposed through a [`MapBinding`].
pub type NativeFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

fn member_key(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Hash-map backed [`Binding`] with plain values and native functions.
///
/// A zero-argument function may also be read like a value, so
/// `query.time` and `query.time()` are the same member.
#[derive(Clone, Default)]
pub struct MapBinding {
    values: FxHashMap<Box<str>, Value>,
    functions: FxHashMap<Box<str>, NativeFn>,
    read_only: bool,
}

impl MapBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// A binding that rejects every write with [`BindingError::ReadOnly`].
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    #[must_use]
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_function<F>(mut self, name: &str, function: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.insert_function(name, function);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.values
            .insert(member_key(name).into_owned().into_boxed_str(), value.into());
    }

    pub fn insert_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.functions.insert(
            member_key(name).into_owned().into_boxed_str(),
            Arc::new(function),
        );
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(member_key(name).as_ref())
    }

    pub fn len(&self) -> usize {
        self.values.len() + self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.functions.is_empty()
    }
}

impl fmt::Debug for MapBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut functions: Vec<_> = self.functions.keys().collect();
        functions.sort();
        f.debug_struct("MapBinding")
            .field("values", &self.values)
            .field("functions", &functions)
            .field("read_only", &self.read_only)
            .finish()
    }
}

impl Binding for MapBinding {
    fn get(&self, name: &str) -> Option<Value> {
        let key = member_key(name);
        if let Some(value) = self.values.get(key.as_ref()) {
            return Some(value.clone());
        }
        self.functions.get(key.as_ref()).map(|function| function(&[]))
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), BindingError> {
        if self.read_only {
            return Err(BindingError::ReadOnly {
                member: name.to_string(),
            });
        }
        self.insert(name, value);
        Ok(())
    }

    fn invoke(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, BindingError> {
        let key = member_key(name);
        if let Some(function) = self.functions.get(key.as_ref()) {
            return Ok(Some(function(args)));
        }
        if self.values.contains_key(key.as_ref()) {
            return Err(BindingError::NotCallable {
                member: name.to_string(),
            });
        }
        Ok(None)
    }
}

/// A writable [`StructValue`] backed by a locked hash map.
#[derive(Debug, Default)]
pub struct MapStruct {
    fields: RwLock<FxHashMap<Box<str>, Value>>,
}

impl MapStruct {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_field(self, name: &str, value: impl Into<Value>) -> Self {
        self.fields
            .write()
            .insert(member_key(name).into_owned().into_boxed_str(), value.into());
        self
    }
}

impl StructValue for MapStruct {
    fn get(&self, name: &str) -> Option<Value> {
        self.fields.read().get(member_key(name).as_ref()).cloned()
    }

    fn set(&self, name: &str, value: Value) -> Result<(), BindingError> {
        self.fields
            .write()
            .insert(member_key(name).into_owned().into_boxed_str(), value);
        Ok(())
    }
}
