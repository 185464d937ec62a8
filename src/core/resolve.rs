use std::fmt;

use crate::core::bind;
use crate::core::callable::{BoundCallable, Callable};
use crate::core::error::OperatorError;
use crate::core::token::Token;
use crate::core::value::Value;

/// A lookup key naming a capability on a receiver.
#[derive(Debug, Clone)]
pub enum Key {
    /// An enumerable field name on an object. Numeric keys on objects are
    /// matched through their decimal string form.
    Name(String),
    /// A position in an array.
    Index(usize),
    /// A token-keyed, non-enumerable slot on an object.
    Slot(Token),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "'{}'", name),
            Key::Index(index) => write!(f, "[{}]", index),
            Key::Slot(token) => write!(f, "slot {}", token),
        }
    }
}

/// The parameter an operator is dispatched with: either a concrete callable,
/// used as-is, or a key to look one up on the receiver.
#[derive(Debug, Clone)]
pub enum Target {
    Callable(Callable),
    Key(Key),
}

impl From<Callable> for Target {
    fn from(callable: Callable) -> Self {
        Target::Callable(callable)
    }
}

impl From<Key> for Target {
    fn from(key: Key) -> Self {
        Target::Key(key)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Key(Key::Name(name.to_string()))
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::Key(Key::Name(name))
    }
}

impl From<usize> for Target {
    fn from(index: usize) -> Self {
        Target::Key(Key::Index(index))
    }
}

impl From<&Token> for Target {
    fn from(token: &Token) -> Self {
        Target::Key(Key::Slot(token.clone()))
    }
}

/// Resolves `target` against `receiver` to a concrete callable.
///
/// A null receiver, or an object built detached, fails before any lookup is
/// attempted, even when the target already is a callable. A key that misses,
/// or lands on a non-callable, fails the same way. Resolving a key is
/// behaviourally identical to resolving the callable stored under it.
pub fn resolve(receiver: &Value, target: Target) -> Result<Callable, OperatorError> {
    match receiver {
        Value::Null => {
            return Err(OperatorError::InvalidOperand(
                "receiver is null and cannot carry capabilities".to_string(),
            ));
        }
        Value::Object(object) if !object.has_capability_table() => {
            return Err(OperatorError::InvalidOperand(
                "receiver is a detached object with no capability table".to_string(),
            ));
        }
        _ => {}
    }

    match target {
        Target::Callable(callable) => Ok(callable),
        Target::Key(key) => {
            let found = lookup(receiver, &key).ok_or_else(|| {
                OperatorError::InvalidOperand(format!("receiver has no member {}", key))
            })?;
            match found {
                Value::Callable(callable) => Ok(callable.clone()),
                _ => Err(OperatorError::InvalidOperand(format!(
                    "member {} of the receiver is not callable",
                    key
                ))),
            }
        }
    }
}

fn lookup<'a>(receiver: &'a Value, key: &Key) -> Option<&'a Value> {
    match (receiver, key) {
        (Value::Object(object), Key::Name(name)) => object.get(name),
        (Value::Object(object), Key::Index(index)) => object.get(&index.to_string()),
        (Value::Object(object), Key::Slot(token)) => object.slot(token),
        (Value::Array(items), Key::Index(index)) => items.get(*index),
        _ => None,
    }
}

/// Member-style view over a receiver.
///
/// `receiver.members().get("name")` is sugar for dispatching the bind
/// operator with `Key::Name("name")`. It changes the call syntax only, never
/// the resolution or binding semantics.
pub struct MemberAccess<'a> {
    receiver: &'a Value,
}

impl MemberAccess<'_> {
    pub fn get(&self, name: &str) -> Result<BoundCallable, OperatorError> {
        bind::bind(self.receiver, name)
    }
}

impl Value {
    /// Returns the member-access view used for `receiver.members().get(..)`.
    pub fn members(&self) -> MemberAccess<'_> {
        MemberAccess { receiver: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Object;

    fn noop() -> Callable {
        Callable::new("noop", 0, |_receiver, _args| Ok(Value::Null))
    }

    #[test]
    fn test_direct_callable_passes_through() {
        let callable = noop();
        let resolved = resolve(&Value::from(Object::new()), Target::from(callable.clone()));
        assert_eq!(resolved.unwrap(), callable);
    }

    #[test]
    fn test_name_lookup_on_object() {
        let callable = noop();
        let receiver = Value::from(Object::new().with("member", callable.clone()));
        let resolved = resolve(&receiver, Target::from("member")).unwrap();
        assert_eq!(resolved, callable);
    }

    #[test]
    fn test_index_lookup_on_array() {
        let callable = noop();
        let receiver = Value::Array(vec![Value::Null, Value::from(callable.clone())]);
        let resolved = resolve(&receiver, Target::from(1usize)).unwrap();
        assert_eq!(resolved, callable);
    }

    #[test]
    fn test_numeric_key_on_object_uses_decimal_form() {
        let callable = noop();
        let receiver = Value::from(Object::new().with("3", callable.clone()));
        let resolved = resolve(&receiver, Target::from(3usize)).unwrap();
        assert_eq!(resolved, callable);
    }

    #[test]
    fn test_slot_lookup_on_object() {
        let token = Token::new("capability");
        let callable = noop();
        let mut object = Object::new();
        object.set_slot(&token, callable.clone());

        let resolved = resolve(&Value::from(object), Target::from(&token)).unwrap();
        assert_eq!(resolved, callable);
    }

    #[test]
    fn test_missing_member_is_invalid_operand() {
        let receiver = Value::from(Object::new());
        let result = resolve(&receiver, Target::from("absent"));
        assert!(matches!(result, Err(OperatorError::InvalidOperand(_))));
    }

    #[test]
    fn test_non_callable_member_is_invalid_operand() {
        let receiver = Value::from(Object::new().with("member", 3));
        let result = resolve(&receiver, Target::from("member"));
        assert!(matches!(result, Err(OperatorError::InvalidOperand(_))));
    }

    #[test]
    fn test_null_receiver_fails_even_with_direct_callable() {
        let result = resolve(&Value::Null, Target::from(noop()));
        assert!(matches!(result, Err(OperatorError::InvalidOperand(_))));
    }

    #[test]
    fn test_detached_object_fails_before_lookup() {
        let receiver = Value::from(Object::detached().with("member", noop()));
        let result = resolve(&receiver, Target::from("member"));
        assert!(matches!(result, Err(OperatorError::InvalidOperand(_))));

        // The direct-callable path is cut off as well.
        let result = resolve(&Value::from(Object::detached()), Target::from(noop()));
        assert!(matches!(result, Err(OperatorError::InvalidOperand(_))));
    }

    #[test]
    fn test_key_lookup_on_primitive_fails() {
        let result = resolve(&Value::from(1), Target::from("member"));
        assert!(matches!(result, Err(OperatorError::InvalidOperand(_))));
    }
}
