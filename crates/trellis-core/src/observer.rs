//! Read observation.
//!
//! Observable sources report every read through [`notify_read`]. While a
//! [`observe_reads`] call is active on the current thread, those reads are
//! captured together with the version the source had at read time; derived
//! state uses the captured set as its dependency map.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::collections::map::HashMap;

static NEXT_OBJECT_ID: AtomicUsize = AtomicUsize::new(1);

/// Process-unique identity of an observable source.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn next() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// A versioned source that can be recorded as a dependency.
pub trait StateObject {
    fn object_id(&self) -> ObjectId;

    /// Current version. Implementations that cache (derived state) refresh
    /// before answering.
    fn version(&self) -> u64;
}

/// A recorded dependency: the source and its version at read time.
#[derive(Clone)]
pub struct ReadRecord {
    pub source: Rc<dyn StateObject>,
    pub version: u64,
}

impl ReadRecord {
    /// True when the source moved past the recorded version.
    pub fn is_outdated(&self) -> bool {
        self.source.version() > self.version
    }
}

impl std::fmt::Debug for ReadRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadRecord")
            .field("source", &self.source.object_id())
            .field("version", &self.version)
            .finish()
    }
}

pub type ReadSet = HashMap<ObjectId, ReadRecord>;

thread_local! {
    // `None` frames suppress recording without hiding outer observers' frames.
    static OBSERVERS: RefCell<Vec<Option<ReadSet>>> = const { RefCell::new(Vec::new()) };
}

struct FrameGuard;

impl Drop for FrameGuard {
    fn drop(&mut self) {
        OBSERVERS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Runs `f` with a fresh observer and returns its result and every source it read.
pub fn observe_reads<R>(f: impl FnOnce() -> R) -> (R, ReadSet) {
    OBSERVERS.with(|stack| stack.borrow_mut().push(Some(ReadSet::default())));
    let guard = FrameGuard;
    let result = f();
    let reads = OBSERVERS
        .with(|stack| stack.borrow_mut().last_mut().and_then(Option::take))
        .unwrap_or_default();
    drop(guard);
    (result, reads)
}

/// Runs `f` without reporting its reads to any enclosing observer.
pub fn without_read_observation<R>(f: impl FnOnce() -> R) -> R {
    OBSERVERS.with(|stack| stack.borrow_mut().push(None));
    let _guard = FrameGuard;
    f()
}

/// Whether a read right now would be recorded.
pub fn is_observing() -> bool {
    OBSERVERS.with(|stack| matches!(stack.borrow().last(), Some(Some(_))))
}

/// Reports a read of `id` at `version` to the innermost observer.
///
/// `source` is only invoked when an observer is recording; the first read
/// of a source within one observation wins.
pub fn notify_read(id: ObjectId, version: u64, source: impl FnOnce() -> Rc<dyn StateObject>) {
    OBSERVERS.with(|stack| {
        let mut stack = stack.borrow_mut();
        if let Some(Some(reads)) = stack.last_mut() {
            reads.entry(id).or_insert_with(|| ReadRecord {
                source: source(),
                version,
            });
        }
    });
}

#[cfg(test)]
#[path = "tests/observer_tests.rs"]
mod tests;
