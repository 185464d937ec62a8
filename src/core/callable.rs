use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::value::Value;

/// The native signature every callable shares.
///
/// The first parameter is the execution context (the receiver), the second
/// the ordered argument list. `Err` carries a thrown dynamic value verbatim;
/// it is not an error type and is never reformatted.
pub type NativeFn = Arc<dyn Fn(&Value, &[Value]) -> Result<Value, Value> + Send + Sync>;

/// A first-class function value.
///
/// Carries descriptive metadata alongside the native implementation: a name,
/// an optional display name, and the declared parameter count. Metadata is
/// plain owned data, so mutating one instance never affects clones taken
/// earlier. Callables compare by identity, not by behaviour.
#[derive(Clone)]
pub struct Callable {
    id: Uuid,
    name: String,
    display_name: Option<String>,
    arity: usize,
    native: NativeFn,
}

impl Callable {
    pub fn new<F>(name: impl Into<String>, arity: usize, native: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, Value> + Send + Sync + 'static,
    {
        Callable {
            id: Uuid::new_v4(),
            name: name.into(),
            display_name: None,
            arity,
            native: Arc::new(native),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = Some(display_name.into());
    }

    /// Invokes the callable with `receiver` as execution context.
    pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value, Value> {
        (self.native)(receiver, args)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A callable with its receiver fixed and its metadata frozen.
///
/// Produced by operator dispatch: the receiver becomes the execution context
/// for every later invocation, and name, display name, and arity are copied
/// from the target once, at bind time. Mutating the original callable
/// afterwards does not drift into the bound copy.
#[derive(Clone)]
pub struct BoundCallable {
    receiver: Value,
    target: Callable,
    name: String,
    display_name: Option<String>,
    arity: usize,
}

impl BoundCallable {
    pub(crate) fn bind(receiver: Value, target: Callable) -> Self {
        BoundCallable {
            name: target.name.clone(),
            display_name: target.display_name.clone(),
            arity: target.arity,
            receiver,
            target,
        }
    }

    pub fn receiver(&self) -> &Value {
        &self.receiver
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invokes the target with the stored receiver and exactly `args`.
    pub fn call(&self, args: &[Value]) -> Result<Value, Value> {
        self.target.call(&self.receiver, args)
    }

    /// Repackages the binding as a plain callable so it can be stored as a
    /// [`Value`] again. The passed-in receiver is ignored; the bound one
    /// stays in effect.
    pub fn into_callable(self) -> Callable {
        let name = self.name.clone();
        let display_name = self.display_name.clone();
        let arity = self.arity;
        let mut callable =
            Callable::new(name, arity, move |_receiver, args| self.call(args));
        if let Some(display_name) = display_name {
            callable.set_display_name(display_name);
        }
        callable
    }
}

impl fmt::Debug for BoundCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundCallable")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("receiver", &self.receiver)
            .finish_non_exhaustive()
    }
}
