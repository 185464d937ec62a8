use std::sync::{Arc, OnceLock};

use crate::core::callable::BoundCallable;
use crate::core::error::OperatorError;
use crate::core::registry::{self, Binder};
use crate::core::resolve::Target;
use crate::core::token::Token;
use crate::core::value::Value;

/// Token of the built-in bind operator.
///
/// The operator is installed on first access and stays for the process
/// lifetime. Its binder simply returns the bound callable produced by
/// resolution.
pub fn bind_operator() -> &'static Token {
    static TOKEN: OnceLock<Token> = OnceLock::new();
    TOKEN.get_or_init(|| {
        let token = Token::new("bind");
        let binder: Binder = Arc::new(|_receiver, bound| Box::new(bound));
        registry::install_operator(&token, binder);
        token
    })
}

/// Resolves `target` against `receiver` and returns it bound to the receiver
/// with its metadata frozen.
///
/// Typed front door over [`dispatch`](crate::core::registry::dispatch) with
/// the bind operator's token.
pub fn bind(receiver: &Value, target: impl Into<Target>) -> Result<BoundCallable, OperatorError> {
    let implementation = registry::dispatch(receiver, bind_operator(), target.into())?;
    implementation
        .downcast::<BoundCallable>()
        .map(|bound| *bound)
        .map_err(|_| OperatorError::ImplementationMismatch(bind_operator().clone()))
}
