use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::StoreError;

/// The capability to remove one listener from its store.
///
/// Tied to a single `subscribe` call: the first successful
/// [`unsubscribe`](Subscription::unsubscribe) removes exactly that
/// listener, repeat calls are no-ops. Dropping the handle does NOT remove
/// the listener; it stays subscribed for the lifetime of the store.
#[must_use = "dropping a Subscription leaves the listener subscribed with no way to remove it"]
pub struct Subscription {
    cancel: Box<dyn Fn() -> Result<(), StoreError> + Send + Sync>,
    active: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(
        cancel: impl Fn() -> Result<(), StoreError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            cancel: Box::new(cancel),
            active: AtomicBool::new(true),
        }
    }

    /// Remove the listener from the working registry.
    ///
    /// Fails (and stays armed, so the call can be retried) if a reducer is
    /// executing.
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        if !self.active.load(Ordering::SeqCst) {
            return Ok(());
        }
        (self.cancel)()?;
        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Whether the listener is still registered through this handle.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn cancel_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = {
            let calls = Arc::clone(&calls);
            Subscription::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        };

        assert!(subscription.is_active());
        subscription.unsubscribe().unwrap();
        subscription.unsubscribe().unwrap();
        assert!(!subscription.is_active());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn a_failed_cancel_stays_armed() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let subscription = {
            let attempts = Arc::clone(&attempts);
            Subscription::new(move || {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(StoreError::UnsubscribeDuringDispatch)
                } else {
                    Ok(())
                }
            })
        };

        assert!(subscription.unsubscribe().is_err());
        assert!(subscription.is_active());
        subscription.unsubscribe().unwrap();
        assert!(!subscription.is_active());
    }
}
