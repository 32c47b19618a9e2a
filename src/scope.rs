//! Cancellable scopes for in-flight store operations.
//!
//! A view owns a `Scope`; operations it starts run through `Scope::run`.
//! When the view goes away the scope is dropped, its token is cancelled and
//! any pending operation future is dropped before it can write its result
//! back into a store.

use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct Scope {
    token: CancellationToken,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// A nested scope, cancelled with this one but cancellable on its own.
    pub fn child(&self) -> Scope {
        Scope {
            token: self.token.child_token(),
        }
    }

    /// Handle for cancelling from elsewhere (signal handlers, other tasks).
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `operation` unless the scope is cancelled first, in which case
    /// the operation is dropped and `StoreError::Cancelled` is returned.
    pub async fn run<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.token.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!("operation cancelled with its scope");
                Err(StoreError::Cancelled)
            }
            result = operation => result,
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let scope = Scope::new();
        assert_eq!(scope.run(async { Ok::<_, StoreError>(5) }).await, Ok(5));
    }

    #[tokio::test]
    async fn test_cancelled_scope_refuses_new_work() {
        let scope = Scope::new();
        scope.cancel();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let result = scope
            .run(async move {
                flag.store(true, Ordering::SeqCst);
                Ok::<_, StoreError>(())
            })
            .await;
        assert_eq!(result, Err(StoreError::Cancelled));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_drops_in_flight_operation() {
        let scope = Scope::new();
        let token = scope.token();
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = scope
            .run(async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, StoreError>(())
            })
            .await;

        assert_eq!(result, Err(StoreError::Cancelled));
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[test]
    fn test_dropping_parent_cancels_child() {
        let parent = Scope::new();
        let child = parent.child();
        assert!(!child.is_cancelled());
        drop(parent);
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_dropping_child_leaves_parent_running() {
        let parent = Scope::new();
        let child = parent.child();
        drop(child);
        assert!(!parent.is_cancelled());
    }
}
