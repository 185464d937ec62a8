use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use crate::core::callable::Callable;
use crate::core::value::Value;

/// Settlement state of a [`Promise`].
#[derive(Debug, Clone, PartialEq)]
pub enum PromiseState {
    Pending,
    Fulfilled(Value),
    Rejected(Value),
}

struct Shared {
    state: PromiseState,
    callback_arguments: Option<Vec<Value>>,
    returned_value: Option<Value>,
    thrown_value: Option<Value>,
    wakers: Vec<Waker>,
}

/// A deferred result with a diagnostic side-channel.
///
/// Cloneable handle over shared state; every clone observes the same
/// settlement. Settlement is write-once: the first fulfill or reject is
/// final and any later attempt is a silent no-op. Because the handle is a
/// plain poll-based future, observers are driven by the host executor and
/// can never run before the call that produced the promise returns.
///
/// The diagnostic fields (callback arguments, returned value, thrown value)
/// are written by the adapter only and are independent of settlement.
#[derive(Clone)]
pub struct Promise {
    shared: Arc<Mutex<Shared>>,
}

impl Promise {
    pub(crate) fn pending() -> Self {
        Promise {
            shared: Arc::new(Mutex::new(Shared {
                state: PromiseState::Pending,
                callback_arguments: None,
                returned_value: None,
                thrown_value: None,
                wakers: Vec::new(),
            })),
        }
    }

    pub fn state(&self) -> PromiseState {
        self.shared.lock().unwrap().state.clone()
    }

    pub fn is_settled(&self) -> bool {
        self.state() != PromiseState::Pending
    }

    /// Synchronous, non-blocking observation of the settlement.
    pub fn try_result(&self) -> Option<Result<Value, Value>> {
        match self.state() {
            PromiseState::Pending => None,
            PromiseState::Fulfilled(value) => Some(Ok(value)),
            PromiseState::Rejected(reason) => Some(Err(reason)),
        }
    }

    /// The argument list of the most recent completion-callback invocation.
    pub fn callback_arguments(&self) -> Option<Vec<Value>> {
        self.shared.lock().unwrap().callback_arguments.clone()
    }

    /// What the adapted callable returned, if it returned normally.
    pub fn returned_value(&self) -> Option<Value> {
        self.shared.lock().unwrap().returned_value.clone()
    }

    /// What the adapted callable threw, if it threw.
    pub fn thrown_value(&self) -> Option<Value> {
        self.shared.lock().unwrap().thrown_value.clone()
    }

    pub(crate) fn fulfill(&self, value: Value) {
        self.settle(PromiseState::Fulfilled(value));
    }

    pub(crate) fn reject(&self, reason: Value) {
        self.settle(PromiseState::Rejected(reason));
    }

    fn settle(&self, next: PromiseState) {
        let wakers = {
            let mut shared = self.shared.lock().unwrap();
            if shared.state != PromiseState::Pending {
                // Already settled; idempotent no-op.
                return;
            }
            shared.state = next;
            std::mem::take(&mut shared.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }

    pub(crate) fn record_returned(&self, value: Value) {
        self.shared.lock().unwrap().returned_value = Some(value);
    }

    pub(crate) fn record_thrown(&self, value: Value) {
        self.shared.lock().unwrap().thrown_value = Some(value);
    }

    /// Builds the completion callable wired to this promise.
    ///
    /// Every invocation overwrites the recorded argument list; only the
    /// first one settles. A truthy first argument rejects with that value,
    /// otherwise the second argument (Null when absent) fulfills.
    pub(crate) fn completion(&self) -> Callable {
        let promise = self.clone();
        Callable::new("completion", 2, move |_receiver, args| {
            promise.complete(args);
            Ok(Value::Null)
        })
    }

    pub(crate) fn complete(&self, args: &[Value]) {
        self.shared.lock().unwrap().callback_arguments = Some(args.to_vec());

        let error = args.first().cloned().unwrap_or(Value::Null);
        if error.is_truthy() {
            self.reject(error);
        } else {
            self.fulfill(args.get(1).cloned().unwrap_or(Value::Null));
        }
    }
}

impl Future for Promise {
    type Output = Result<Value, Value>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut shared = self.shared.lock().unwrap();
        match &shared.state {
            PromiseState::Pending => {
                if !shared.wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    shared.wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
            PromiseState::Fulfilled(value) => Poll::Ready(Ok(value.clone())),
            PromiseState::Rejected(reason) => Poll::Ready(Err(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_first_settlement_wins() {
        let promise = Promise::pending();
        promise.fulfill(Value::from("a"));
        promise.reject(Value::from("boom"));
        promise.fulfill(Value::from("b"));

        assert_eq!(promise.state(), PromiseState::Fulfilled(Value::from("a")));
        assert_eq!(promise.try_result(), Some(Ok(Value::from("a"))));
    }

    #[test]
    fn test_pending_has_no_result() {
        let promise = Promise::pending();
        assert!(!promise.is_settled());
        assert_eq!(promise.try_result(), None);
        assert_eq!(promise.callback_arguments(), None);
    }

    #[test]
    fn test_all_clones_observe_the_same_settlement() {
        let promise = Promise::pending();
        let observer = promise.clone();
        promise.reject(Value::from("reason"));

        assert_eq!(block_on(observer), Err(Value::from("reason")));
        assert_eq!(block_on(promise), Err(Value::from("reason")));
    }

    #[test]
    fn test_complete_truthiness_drives_settlement() {
        let promise = Promise::pending();
        // Falsy first argument fulfills with the second.
        promise.complete(&[Value::Number(0.0), Value::from(42)]);
        assert_eq!(promise.try_result(), Some(Ok(Value::from(42))));

        let promise = Promise::pending();
        promise.complete(&[Value::from("boom")]);
        assert_eq!(promise.try_result(), Some(Err(Value::from("boom"))));

        // No arguments at all fulfills with Null.
        let promise = Promise::pending();
        promise.complete(&[]);
        assert_eq!(promise.try_result(), Some(Ok(Value::Null)));
    }

    #[test]
    fn test_later_completions_update_only_the_record() {
        let promise = Promise::pending();
        promise.complete(&[Value::Null, Value::from("a")]);
        promise.complete(&[Value::from("boom")]);

        assert_eq!(promise.try_result(), Some(Ok(Value::from("a"))));
        assert_eq!(
            promise.callback_arguments(),
            Some(vec![Value::from("boom")])
        );
    }
}
