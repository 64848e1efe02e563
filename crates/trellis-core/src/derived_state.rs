//! Pull-based memoized values.
//!
//! A derived cell caches the result of its calculation together with the
//! versions of every source the calculation read. It recomputes only when
//! one of those sources reports a newer version, and it bumps its own
//! version only when the recomputed value differs from the cached one, so
//! downstream cells skip work when an upstream recomputation was a no-op.
//!
//! Derived state is UI-thread only.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::observer::{notify_read, observe_reads, ObjectId, ReadRecord, ReadSet, StateObject};

struct DerivedInner<T> {
    id: ObjectId,
    calculation: Box<dyn Fn() -> T>,
    compare: Box<dyn Fn(&T, &T) -> bool>,
    value: RefCell<Option<T>>,
    version: Cell<u64>,
    dependencies: RefCell<ReadSet>,
    computing: Cell<bool>,
}

pub struct DerivedState<T> {
    inner: Rc<DerivedInner<T>>,
}

impl<T> Clone for DerivedState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Derived cell comparing results with `PartialEq`.
pub fn derived_state_of<T, F>(calculation: F) -> DerivedState<T>
where
    T: Clone + PartialEq + 'static,
    F: Fn() -> T + 'static,
{
    derived_state_with_policy(calculation, |a: &T, b: &T| a == b)
}

/// Derived cell with a custom equivalence; `compare` returns `true` for "no change".
pub fn derived_state_with_policy<T, F, C>(calculation: F, compare: C) -> DerivedState<T>
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
    C: Fn(&T, &T) -> bool + 'static,
{
    DerivedState {
        inner: Rc::new(DerivedInner {
            id: ObjectId::next(),
            calculation: Box::new(calculation),
            compare: Box::new(compare),
            value: RefCell::new(None),
            version: Cell::new(0),
            dependencies: RefCell::new(ReadSet::default()),
            computing: Cell::new(false),
        }),
    }
}

/// Clears the in-progress flag, also when the calculation unwinds.
struct ComputingGuard<'a>(&'a Cell<bool>);

impl Drop for ComputingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<T: Clone + 'static> DerivedState<T> {
    /// Returns the current value, recomputing first when needed.
    pub fn get(&self) -> T {
        self.refresh();
        notify_read(self.inner.id, self.inner.version.get(), || {
            Rc::new(self.clone()) as Rc<dyn StateObject>
        });
        self.inner
            .value
            .borrow()
            .clone()
            .expect("derived state holds a value after refresh")
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.value.borrow().is_some()
    }

    /// True when any recorded dependency moved past its recorded version.
    pub fn is_stale(&self) -> bool {
        // Checking a dependency can refresh it, so the map must not stay borrowed.
        let dependencies: Vec<ReadRecord> =
            self.inner.dependencies.borrow().values().cloned().collect();
        dependencies.iter().any(ReadRecord::is_outdated)
    }

    /// Runs the calculation, recording its reads as the new dependency set.
    ///
    /// # Panics
    /// Panics when the calculation reads this cell (a dependency cycle).
    pub fn recalculate(&self) {
        assert!(
            !self.inner.computing.replace(true),
            "derived state {:?} depends on itself",
            self.inner.id
        );
        let guard = ComputingGuard(&self.inner.computing);
        let (next, reads) = observe_reads(|| (self.inner.calculation)());
        drop(guard);

        let changed = match &*self.inner.value.borrow() {
            None => true,
            Some(previous) => !(self.inner.compare)(previous, &next),
        };
        if changed {
            *self.inner.value.borrow_mut() = Some(next);
            self.inner.version.set(self.inner.version.get() + 1);
        }
        *self.inner.dependencies.borrow_mut() = reads;
    }

    /// Version after refreshing; advances only when the value changed.
    pub fn version(&self) -> u64 {
        self.refresh();
        self.inner.version.get()
    }

    pub fn dependency_count(&self) -> usize {
        self.inner.dependencies.borrow().len()
    }

    pub fn object_id(&self) -> ObjectId {
        self.inner.id
    }

    fn refresh(&self) {
        if !self.is_initialized() || self.is_stale() {
            self.recalculate();
        }
    }
}

impl<T: Clone + 'static> StateObject for DerivedState<T> {
    fn object_id(&self) -> ObjectId {
        self.inner.id
    }

    fn version(&self) -> u64 {
        DerivedState::version(self)
    }
}

impl<T: fmt::Debug> fmt::Debug for DerivedState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedState")
            .field("id", &self.inner.id)
            .field("value", &self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/derived_state_tests.rs"]
mod tests;
