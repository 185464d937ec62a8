use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::core::callable::BoundCallable;
use crate::core::error::OperatorError;
use crate::core::resolve::{self, Target};
use crate::core::token::Token;
use crate::core::value::Value;

/// The implementation value an operator's binder produces. Typed front doors
/// such as [`bind`](crate::bind) downcast it back to a concrete type.
pub type Implementation = Box<dyn Any + Send + Sync>;

/// Builds an operator's concrete implementation from the receiver and the
/// callable resolved against it (already bound, metadata frozen).
pub type Binder = Arc<dyn Fn(&Value, BoundCallable) -> Implementation + Send + Sync>;

/// The process-wide operator table.
///
/// Lives behind a `OnceLock`: initialized on first use and never torn down,
/// which is the closest Rust gets to registration at module load. The table
/// is keyed by [`Token`], so installed operators are invisible to ordinary
/// value enumeration and cannot collide with user data.
struct Registry {
    operators: RwLock<HashMap<Token, Binder>>,
}

fn global() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Registry {
        operators: RwLock::new(HashMap::new()),
    })
}

/// Registers `binder` under `token`, process-wide.
///
/// Reinstalling under the same token is last-writer-wins; the replacement is
/// logged as a warning rather than treated as an error.
pub fn install_operator(token: &Token, binder: Binder) {
    let mut operators = global().operators.write().unwrap();
    if operators.contains_key(token) {
        log::warn!(
            "Operator {} was already installed. Overwriting previous binder (last writer wins).",
            token
        );
    } else {
        log::debug!("Installed operator {}.", token);
    }
    operators.insert(token.clone(), binder);
}

/// Dispatches the operator installed under `token` on `receiver`.
///
/// Resolution happens first, so an [`OperatorError`] always surfaces
/// synchronously here and never through whatever the binder produces.
pub fn dispatch(
    receiver: &Value,
    token: &Token,
    target: Target,
) -> Result<Implementation, OperatorError> {
    let binder = {
        let operators = global().operators.read().unwrap();
        operators.get(token).cloned()
    }
    .ok_or_else(|| OperatorError::UnknownOperator(token.clone()))?;

    let callable = resolve::resolve(receiver, target)?;
    let bound = BoundCallable::bind(receiver.clone(), callable);
    Ok(binder(receiver, bound))
}

impl Value {
    /// Method-style dispatch entry point: asks this value to perform the
    /// operator installed under `token`.
    pub fn via_operator(
        &self,
        token: &Token,
        target: impl Into<Target>,
    ) -> Result<Implementation, OperatorError> {
        dispatch(self, token, target.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::callable::Callable;
    use crate::core::value::Object;

    fn noop() -> Callable {
        Callable::new("noop", 0, |_receiver, _args| Ok(Value::Null))
    }

    #[test]
    fn test_dispatch_hands_bound_callable_to_binder() {
        let token = Token::new("arity-reporter");
        let binder: Binder = Arc::new(|_receiver, bound| Box::new(bound.arity()));
        install_operator(&token, binder);

        let callable = Callable::new("f", 3, |_receiver, _args| Ok(Value::Null));
        let receiver = Value::from(Object::new());
        let implementation = receiver.via_operator(&token, callable).unwrap();
        assert_eq!(*implementation.downcast::<usize>().unwrap(), 3);
    }

    #[test]
    fn test_unknown_token_is_reported() {
        let token = Token::new("never-installed");
        let result = dispatch(&Value::from(Object::new()), &token, Target::from(noop()));
        assert!(matches!(result, Err(OperatorError::UnknownOperator(_))));
    }

    #[test]
    fn test_reinstall_is_last_writer_wins() {
        let token = Token::new("replaceable");
        let first: Binder = Arc::new(|_receiver, _bound| Box::new("first"));
        let second: Binder = Arc::new(|_receiver, _bound| Box::new("second"));

        install_operator(&token, first);
        install_operator(&token, second);

        let implementation = dispatch(
            &Value::from(Object::new()),
            &token,
            Target::from(noop()),
        )
        .unwrap();
        assert_eq!(*implementation.downcast::<&str>().unwrap(), "second");
    }

    #[test]
    fn test_resolution_errors_surface_before_the_binder_runs() {
        let token = Token::new("untouched");
        let binder: Binder = Arc::new(|_receiver, _bound| -> Implementation {
            panic!("binder must not run when resolution fails")
        });
        install_operator(&token, binder);

        let result = dispatch(&Value::Null, &token, Target::from(noop()));
        assert!(matches!(result, Err(OperatorError::InvalidOperand(_))));
    }
}
