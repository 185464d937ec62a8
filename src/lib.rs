//! # Operon
//!
//! Process-wide operator dispatch for dynamic values, with a
//! callback-to-future adapter for interoperating with legacy callback-style
//! asynchronous APIs.
//!
//! ## Features
//!
//! - **Uniform dispatch**: install an operator once and dispatch it on any
//!   [`Value`], whether object, array, primitive, or function
//! - **Unforgeable keys**: operators and hidden object slots are keyed by
//!   opaque [`Token`]s that can never collide with ordinary data
//! - **Metadata preservation**: binding a callable freezes its name, display
//!   name, and arity at bind time
//! - **Callback-to-future adaptation**: wrap a `completion(error, result)`
//!   style callable into one returning a [`Promise`], with a diagnostic
//!   side-channel for introspection
//!
//! ## Quick Start
//!
//! ```rust
//! use operon::prelude::*;
//!
//! // A legacy callback-style function: the trailing argument is the
//! // completion callback, invoked as completion(error_or_null, result).
//! let legacy = Callable::new("double", 2, |_receiver, args| {
//!     let input = args[0].as_f64().unwrap_or(0.0);
//!     let completion = args[1].as_callable().cloned().unwrap();
//!     completion.call(&Value::Null, &[Value::Null, Value::from(input * 2.0)])?;
//!     Ok(Value::Null)
//! });
//!
//! let receiver = Value::from(Object::new().with("double", legacy));
//! let adapted = callback_to_future(&receiver, "double").unwrap();
//! let promise = adapted.call(&[Value::from(21.0)]);
//! assert_eq!(promise.try_result(), Some(Ok(Value::from(42.0))));
//! ```
//!
//! ## Module Organization
//!
//! - [`Value`]/[`Object`]/[`Callable`]: the dynamic value model
//! - [`install_operator`]/[`dispatch`]: the process-wide operator registry
//! - [`bind`]: the built-in bind operator (resolve + bind + metadata)
//! - [`callback_to_future`]: the built-in callback-to-future adapter
//! - [`prelude`]: everything at once (`use operon::prelude::*`)

// ============================================================================
// Core Module
// ============================================================================

mod core;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

// Value model
pub use core::callable::{BoundCallable, Callable, NativeFn};
pub use core::token::Token;
pub use core::value::{Object, Value};

// Registry and resolution
pub use core::error::OperatorError;
pub use core::registry::{Binder, Implementation, dispatch, install_operator};
pub use core::resolve::{Key, MemberAccess, Target, resolve};

// Built-in operators
pub use core::adapter::{Promisified, callback_to_future, callback_to_future_operator};
pub use core::bind::{bind, bind_operator};

// Futures
pub use core::future::{Promise, PromiseState};

// ============================================================================
// Prelude Module - Convenient Bulk Import
// ============================================================================

/// The prelude: imports everything you need to install and dispatch
/// operators and to adapt callback-style callables.
///
/// # Example
/// ```rust
/// use operon::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        // Registry and resolution
        Binder,
        // Value model
        BoundCallable,
        Callable,
        Implementation,
        Key,
        MemberAccess,
        NativeFn,
        Object,
        OperatorError,
        // Futures
        Promise,
        PromiseState,
        // Built-in operators
        Promisified,
        Target,
        Token,
        Value,
        bind,
        bind_operator,
        callback_to_future,
        callback_to_future_operator,
        dispatch,
        install_operator,
        resolve,
    };
}

// ============================================================================
// Re-export commonly used external types for convenience
// ============================================================================

pub use serde_json::Value as JsonValue;

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
