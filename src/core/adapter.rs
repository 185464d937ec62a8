use std::sync::{Arc, OnceLock};

use crate::core::callable::{BoundCallable, Callable};
use crate::core::error::OperatorError;
use crate::core::future::Promise;
use crate::core::registry::{self, Binder};
use crate::core::resolve::Target;
use crate::core::token::Token;
use crate::core::value::Value;

/// A callback-style callable repackaged to return a [`Promise`] per call.
///
/// The underlying callable is assumed to follow the convention "zero or more
/// arguments, then a trailing completion callback invoked as
/// `completion(error_or_null, result, ..extra)`".
#[derive(Clone)]
pub struct Promisified {
    bound: BoundCallable,
}

impl Promisified {
    pub fn new(bound: BoundCallable) -> Self {
        Promisified { bound }
    }

    /// Adapts a free function: no receiver context is bound, the callable is
    /// invoked with a null execution context.
    pub fn from_fn(callable: Callable) -> Self {
        Promisified {
            bound: BoundCallable::bind(Value::Null, callable),
        }
    }

    pub fn bound(&self) -> &BoundCallable {
        &self.bound
    }

    /// Synchronously invokes the underlying callable with `args` plus an
    /// injected completion callback, and returns the promise immediately.
    ///
    /// A thrown value is recorded in the diagnostics and rejects the promise
    /// unless a synchronous completion call already settled it. A normal
    /// return is recorded but never affects settlement. A callable that
    /// neither calls back nor throws leaves the promise pending forever;
    /// timeouts must be composed externally. Once invoked, the callable
    /// cannot be cancelled or signalled.
    pub fn call(&self, args: &[Value]) -> Promise {
        let promise = Promise::pending();
        let mut full_args = args.to_vec();
        full_args.push(Value::Callable(promise.completion()));

        match self.bound.call(&full_args) {
            Ok(returned) => promise.record_returned(returned),
            Err(thrown) => {
                promise.record_thrown(thrown.clone());
                // No-op if the completion callback already settled.
                promise.reject(thrown);
            }
        }
        promise
    }
}

/// Token of the built-in callback-to-future operator, installed on first
/// access. Its binder wraps the bound callable in a [`Promisified`].
pub fn callback_to_future_operator() -> &'static Token {
    static TOKEN: OnceLock<Token> = OnceLock::new();
    TOKEN.get_or_init(|| {
        let token = Token::new("callback-to-future");
        let binder: Binder = Arc::new(|_receiver, bound| Box::new(Promisified::new(bound)));
        registry::install_operator(&token, binder);
        token
    })
}

/// Resolves `target` against `receiver` and adapts it to future-style calls.
///
/// Resolution failures surface synchronously as [`OperatorError`]; after a
/// [`Promisified`] exists, all failure modes travel through the promise.
pub fn callback_to_future(
    receiver: &Value,
    target: impl Into<Target>,
) -> Result<Promisified, OperatorError> {
    let implementation =
        registry::dispatch(receiver, callback_to_future_operator(), target.into())?;
    implementation
        .downcast::<Promisified>()
        .map(|adapter| *adapter)
        .map_err(|_| OperatorError::ImplementationMismatch(callback_to_future_operator().clone()))
}
