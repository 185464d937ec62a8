use thiserror::Error;

use crate::core::token::Token;

/// Errors surfaced synchronously by resolution and dispatch.
///
/// Failures of an adapted callable itself never appear here: a thrown value
/// or a callback-reported error travels verbatim through the promise's
/// rejection channel instead.
#[derive(Debug, Error)]
pub enum OperatorError {
    /// The parameter resolved to a non-callable, or the receiver cannot
    /// carry capabilities at all (null, or a detached object).
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    /// Dispatch was attempted with a token nothing was installed under.
    #[error("no operator installed under token {0}")]
    UnknownOperator(Token),

    /// The binder installed under this token produced an implementation of
    /// an unexpected type. Can happen after a last-writer-wins reinstall.
    #[error("operator {0} produced an unexpected implementation type")]
    ImplementationMismatch(Token),
}
