//! Lifecycle hooks for values held by the persistent state store.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Notified when a value enters and leaves the store.
pub trait RememberObserver {
    /// Called once, right after the value is first inserted.
    fn on_remembered(&self) {}

    /// Called when the store drops the value after a frame without access.
    fn on_forgotten(&self) {}
}

/// A long-lived object owning work bounded by its [`CancellationScope`].
///
/// On removal the store cancels the scope, then calls `on_forgotten`, then
/// `on_cleared`.
pub trait ViewModel: RememberObserver {
    /// Receives the scope at first insertion, before `on_remembered`.
    fn set_view_model_scope(&self, scope: CancellationScope);

    fn on_cleared(&self) {}
}

type CancelCallback = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct ScopeInner {
    cancelled: AtomicBool,
    callbacks: Mutex<Vec<CancelCallback>>,
}

/// Cancellation token shared between a view model and the work it starts.
#[derive(Clone, Default)]
pub struct CancellationScope {
    inner: Arc<ScopeInner>,
}

impl CancellationScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Cancels the scope and runs registered callbacks once, in registration order.
    pub fn cancel(&self) {
        let callbacks = {
            let mut callbacks = self
                .inner
                .callbacks
                .lock()
                .expect("CancellationScope lock poisoned");
            if self.inner.cancelled.swap(true, Ordering::AcqRel) {
                return;
            }
            std::mem::take(&mut *callbacks)
        };
        for callback in callbacks {
            callback();
        }
    }

    /// Registers `callback` for cancellation; runs it now if already cancelled.
    pub fn on_cancel(&self, callback: impl FnOnce() + Send + 'static) {
        {
            // The flag only flips under this lock, so a registration either
            // lands before `cancel` drains the list or sees the flag set.
            let mut callbacks = self
                .inner
                .callbacks
                .lock()
                .expect("CancellationScope lock poisoned");
            if !self.inner.cancelled.load(Ordering::Acquire) {
                callbacks.push(Box::new(callback));
                return;
            }
        }
        callback();
    }
}

impl fmt::Debug for CancellationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationScope")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/lifecycle_tests.rs"]
mod tests;
