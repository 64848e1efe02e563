//! Thread-safe observable value.
//!
//! Writes are compared against the current value with the value's compare
//! policy; only an actual change bumps the version, fires the change
//! notifier and runs subscribers. Subscribers run synchronously on the
//! writing thread in registration order. Use [`MutableValue::post_set`] to
//! route a background write through the UI thread instead.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

use crate::observer::{notify_read, ObjectId, StateObject};
use crate::platform::UiExecutor;

/// Returns `true` when two values are equivalent (no change).
pub type ComparePolicy<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Store-wide hook invoked after any effective write.
pub type ChangeNotifier = Arc<dyn Fn() + Send + Sync>;

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Equality through `PartialEq`.
pub fn structural_equality<T: PartialEq + 'static>() -> ComparePolicy<T> {
    Arc::new(|a: &T, b: &T| a == b)
}

/// Every write counts as a change.
pub fn never_equal<T: 'static>() -> ComparePolicy<T> {
    Arc::new(|_: &T, _: &T| false)
}

struct Inner<T> {
    id: ObjectId,
    value: RwLock<T>,
    version: AtomicU64,
    compare: ComparePolicy<T>,
    notifier: Option<ChangeNotifier>,
    subscribers: Mutex<Vec<(u64, Subscriber<T>)>>,
    next_subscriber: AtomicU64,
}

pub struct MutableValue<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for MutableValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> MutableValue<T> {
    pub fn new(value: T) -> Self {
        Self::with_policy(value, structural_equality())
    }
}

impl<T: Clone + Send + Sync + 'static> MutableValue<T> {
    pub fn with_policy(value: T, compare: ComparePolicy<T>) -> Self {
        Self::from_parts(value, compare, None)
    }

    pub(crate) fn from_parts(
        value: T,
        compare: ComparePolicy<T>,
        notifier: Option<ChangeNotifier>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: ObjectId::next(),
                value: RwLock::new(value),
                version: AtomicU64::new(1),
                compare,
                notifier,
                subscribers: Mutex::new(Vec::new()),
                next_subscriber: AtomicU64::new(1),
            }),
        }
    }

    /// Reads the value and reports the read to the enclosing observer.
    pub fn get(&self) -> T {
        self.report_read();
        self.get_untracked()
    }

    /// Reads the value without reporting the read.
    pub fn get_untracked(&self) -> T {
        self.inner
            .value
            .read()
            .expect("MutableValue lock poisoned")
            .clone()
    }

    /// Borrows the value for the duration of `f`. The read is reported.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.report_read();
        let guard = self.inner.value.read().expect("MutableValue lock poisoned");
        f(&*guard)
    }

    /// Borrows the value without reporting the read.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.value.read().expect("MutableValue lock poisoned");
        f(&*guard)
    }

    /// Writes `value`; notifies only when the compare policy reports a change.
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        let changed = {
            let mut guard = self
                .inner
                .value
                .write()
                .expect("MutableValue lock poisoned");
            if (self.inner.compare)(&*guard, &value) {
                false
            } else {
                *guard = value;
                true
            }
        };
        if changed {
            self.inner.version.fetch_add(1, Ordering::AcqRel);
            self.dispatch_change();
        }
        changed
    }

    /// Sets the value to `f(current)`. The read and the write happen under
    /// one lock, so concurrent updates are not lost. `f` must not touch
    /// this value.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        let changed = {
            let mut guard = self
                .inner
                .value
                .write()
                .expect("MutableValue lock poisoned");
            let next = f(&*guard);
            if (self.inner.compare)(&*guard, &next) {
                false
            } else {
                *guard = next;
                true
            }
        };
        if changed {
            self.inner.version.fetch_add(1, Ordering::AcqRel);
            self.dispatch_change();
        }
        changed
    }

    /// Posts the write to `executor`, which runs it on the UI thread.
    pub fn post_set(&self, executor: &dyn UiExecutor, value: T) {
        let handle = self.clone();
        executor.post(Box::new(move || {
            handle.set(value);
        }));
    }

    /// Registers `callback` to run with the new value after every effective write.
    #[must_use = "dropping the subscription unsubscribes; call detach() to keep it"]
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .expect("MutableValue subscribers poisoned")
            .push((id, Arc::new(callback)));
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner
                        .subscribers
                        .lock()
                        .expect("MutableValue subscribers poisoned")
                        .retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .expect("MutableValue subscribers poisoned")
            .len()
    }

    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    pub fn object_id(&self) -> ObjectId {
        self.inner.id
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn report_read(&self) {
        notify_read(self.inner.id, self.version(), || {
            Rc::new(self.clone()) as Rc<dyn StateObject>
        });
    }

    fn dispatch_change(&self) {
        if let Some(notifier) = &self.inner.notifier {
            notifier();
        }
        let snapshot: Vec<(u64, Subscriber<T>)> = self
            .inner
            .subscribers
            .lock()
            .expect("MutableValue subscribers poisoned")
            .clone();
        if snapshot.is_empty() {
            return;
        }
        let current = self.get_untracked();
        let mut failed = Vec::new();
        for (id, subscriber) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| subscriber(&current))).is_err() {
                log::error!(
                    "subscriber {id} of state {:?} panicked; removing it",
                    self.inner.id
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.inner
                .subscribers
                .lock()
                .expect("MutableValue subscribers poisoned")
                .retain(|(id, _)| !failed.contains(id));
        }
    }
}

impl<T: Clone + Send + Sync + 'static> StateObject for MutableValue<T> {
    fn object_id(&self) -> ObjectId {
        self.inner.id
    }

    fn version(&self) -> u64 {
        MutableValue::version(self)
    }
}

impl<T: fmt::Debug> fmt::Debug for MutableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("MutableValue");
        debug.field("id", &self.inner.id);
        match self.inner.value.try_read() {
            Ok(value) => debug.field("value", &*value),
            Err(_) => debug.field("value", &"<locked>"),
        };
        debug
            .field("version", &self.inner.version.load(Ordering::Relaxed))
            .finish()
    }
}

/// Keeps a subscriber registered. Dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Leaves the subscriber registered for the lifetime of the value.
    pub fn detach(mut self) {
        self.cancel = None;
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/mutable_value_tests.rs"]
mod tests;
