use std::collections::HashMap;

use crate::core::callable::Callable;
use crate::core::token::Token;

/// A dynamic runtime value.
///
/// Every receiver and argument in the library is a `Value`, so operators can
/// be dispatched uniformly on objects, arrays, primitives, and functions
/// alike. Equality is structural, except for callables which compare by
/// identity. `Null` models an absent receiver and can never resolve a
/// capability.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
    Callable(Callable),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness as the adapter's completion protocol sees it:
    /// null, false, 0, NaN, and the empty string are falsy, everything else
    /// (including empty arrays and objects) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Callable(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        if let Value::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        if let Value::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        if let Value::Object(object) = self {
            Some(object)
        } else {
            None
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        if let Value::Callable(callable) = self {
            Some(callable)
        } else {
            None
        }
    }

    /// Converts a JSON document into a `Value`. Lossless.
    pub fn from_json(value: serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let mut object = Object::new();
                for (key, value) in map {
                    object.insert(key, Value::from_json(value));
                }
                Value::Object(object)
            }
        }
    }

    /// Converts back into JSON. Returns `None` when the value embeds a
    /// callable or a non-finite number; slot entries are dropped, as they are
    /// not part of an object's enumerable data.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            Value::Null => Some(serde_json::Value::Null),
            Value::Bool(b) => Some(serde_json::Value::Bool(*b)),
            Value::Number(n) => serde_json::Number::from_f64(*n).map(serde_json::Value::Number),
            Value::String(s) => Some(serde_json::Value::String(s.clone())),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(item.to_json()?);
                }
                Some(serde_json::Value::Array(out))
            }
            Value::Object(object) => {
                let mut map = serde_json::Map::new();
                for key in object.keys() {
                    map.insert(key.clone(), object.get(&key)?.to_json()?);
                }
                Some(serde_json::Value::Object(map))
            }
            Value::Callable(_) => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            // NaN != NaN, matching the source runtime's number semantics.
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::from_json(value)
    }
}

/// A string-keyed record with an extra, token-keyed slot table.
///
/// Fields are the object's ordinary enumerable data. Slots are keyed by
/// [`Token`] and never show up in [`Object::keys`], so a capability stored in
/// a slot cannot collide with user data under any field name.
///
/// An object built through [`Object::detached`] carries no capability table:
/// resolving anything against it fails before any lookup is attempted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    fields: HashMap<String, Value>,
    slots: HashMap<Token, Value>,
    detached: bool,
}

impl Object {
    pub fn new() -> Self {
        Object::default()
    }

    /// Builds an object with an explicitly empty capability table.
    pub fn detached() -> Self {
        Object {
            detached: true,
            ..Object::default()
        }
    }

    pub fn has_capability_table(&self) -> bool {
        !self.detached
    }

    /// Builder-style field insertion.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Stores a value under a token-keyed, non-enumerable slot.
    pub fn set_slot(&mut self, token: &Token, value: impl Into<Value>) {
        self.slots.insert(token.clone(), value.into());
    }

    pub fn slot(&self, token: &Token) -> Option<&Value> {
        self.slots.get(token)
    }

    /// Enumerable field names, sorted. Slots are deliberately absent.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.fields.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
