//! Framed persistent state store.
//!
//! Values live under string keys across composition passes. Every pass is
//! bracketed by [`PersistentState::start_frame`] and
//! [`PersistentState::end_frame`]; a value that was present in one frame and
//! not accessed in the next is removed at the end of that next frame, after
//! its lifecycle hooks run.

use std::any::{type_name, Any};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use std::sync::{Arc, RwLock};

use crate::collections::map::HashMap;
use crate::error::StateError;
use crate::lifecycle::{CancellationScope, RememberObserver, ViewModel};
use crate::mutable_value::{
    never_equal, structural_equality, ChangeNotifier, ComparePolicy, MutableValue,
};

/// Creation options for reactive state.
pub struct StateOptions<T> {
    compare: ComparePolicy<T>,
}

impl<T: 'static> StateOptions<T> {
    /// Values are equal when `compare` says so.
    pub fn with_compare(compare: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            compare: Arc::new(compare),
        }
    }

    /// Every write notifies.
    pub fn never_equal() -> Self {
        Self {
            compare: never_equal(),
        }
    }
}

impl<T: PartialEq + 'static> StateOptions<T> {
    pub fn structural() -> Self {
        Self {
            compare: structural_equality(),
        }
    }
}

impl<T: PartialEq + 'static> Default for StateOptions<T> {
    fn default() -> Self {
        Self::structural()
    }
}

#[derive(Default)]
struct Hooks {
    scope: Option<CancellationScope>,
    forgotten: Option<Box<dyn FnOnce()>>,
    cleared: Option<Box<dyn FnOnce()>>,
}

impl Hooks {
    fn dispose(&mut self) {
        if let Some(scope) = self.scope.take() {
            scope.cancel();
        }
        if let Some(forgotten) = self.forgotten.take() {
            forgotten();
        }
        if let Some(cleared) = self.cleared.take() {
            cleared();
        }
    }
}

struct Entry {
    value: Box<dyn Any>,
    type_name: &'static str,
    accessed_this_frame: bool,
    seen_last_frame: bool,
    hooks: Hooks,
}

type CallbackSlot = Arc<RwLock<Option<ChangeNotifier>>>;

pub struct PersistentState {
    entries: HashMap<String, Entry>,
    in_frame: bool,
    frame_count: u64,
    on_state_change: CallbackSlot,
}

impl Default for PersistentState {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistentState {
    pub fn new() -> Self {
        Self {
            entries: HashMap::default(),
            in_frame: false,
            frame_count: 0,
            on_state_change: Arc::new(RwLock::new(None)),
        }
    }

    /// Opens a composition pass.
    ///
    /// # Panics
    /// Panics when a frame is already open.
    pub fn start_frame(&mut self) {
        assert!(
            !self.in_frame,
            "start_frame called twice without end_frame"
        );
        self.in_frame = true;
        for entry in self.entries.values_mut() {
            entry.accessed_this_frame = false;
        }
        log::debug!(
            "state frame {} started with {} entries",
            self.frame_count + 1,
            self.entries.len()
        );
    }

    /// Closes the pass and collects values that were skipped for a whole frame.
    ///
    /// # Panics
    /// Panics without a matching [`start_frame`](Self::start_frame).
    pub fn end_frame(&mut self) {
        assert!(self.in_frame, "end_frame called without start_frame");
        self.in_frame = false;
        self.frame_count += 1;

        let mut dead: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.accessed_this_frame && entry.seen_last_frame)
            .map(|(key, _)| key.clone())
            .collect();
        dead.sort_unstable();
        for key in &dead {
            if let Some(entry) = self.entries.get_mut(key) {
                entry.hooks.dispose();
            }
            self.entries.remove(key);
        }
        for entry in self.entries.values_mut() {
            entry.seen_last_frame = entry.accessed_this_frame;
        }
        if !dead.is_empty() {
            log::debug!(
                "state frame {} collected {} entries: {:?}",
                self.frame_count,
                dead.len(),
                dead
            );
        }
    }

    /// Installs the store-wide hook fired after any effective write to a
    /// value this store created, including values created before the call.
    pub fn set_on_state_change(&mut self, callback: impl Fn() + Send + Sync + 'static) {
        *self
            .on_state_change
            .write()
            .expect("state change slot poisoned") = Some(Arc::new(callback));
    }

    /// Returns the reactive value under `key`, creating it from `init` when absent.
    ///
    /// # Panics
    /// Panics when called outside a frame.
    pub fn state<T>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> T,
        options: StateOptions<T>,
    ) -> Result<MutableValue<T>, StateError>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.assert_in_frame(key);
        if let Some(existing) = self.lookup::<MutableValue<T>>(key)? {
            return Ok(existing);
        }
        let value = MutableValue::from_parts(init(), options.compare, Some(self.notifier()));
        self.insert(key, value.clone(), type_name::<T>(), Hooks::default());
        Ok(value)
    }

    /// Like [`state`](Self::state) but panics on a type mismatch.
    pub fn must_state<T>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> T,
        options: StateOptions<T>,
    ) -> MutableValue<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.state(key, init, options)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Reactive state whose value observes its own lifetime in the store.
    pub fn remembered_state<T>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> T,
        options: StateOptions<T>,
    ) -> Result<MutableValue<T>, StateError>
    where
        T: RememberObserver + Clone + Send + Sync + 'static,
    {
        self.assert_in_frame(key);
        if let Some(existing) = self.lookup::<MutableValue<T>>(key)? {
            return Ok(existing);
        }
        let value = MutableValue::from_parts(init(), options.compare, Some(self.notifier()));
        let forgotten = value.clone();
        let hooks = Hooks {
            forgotten: Some(Box::new(move || {
                forgotten.with_untracked(RememberObserver::on_forgotten)
            })),
            ..Hooks::default()
        };
        self.insert(key, value.clone(), type_name::<T>(), hooks);
        value.with_untracked(RememberObserver::on_remembered);
        Ok(value)
    }

    /// Retains a view model, handing it a cancellation scope on creation.
    pub fn view_model<T>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> T,
    ) -> Result<Rc<T>, StateError>
    where
        T: ViewModel + 'static,
    {
        self.assert_in_frame(key);
        if let Some(existing) = self.lookup::<Rc<T>>(key)? {
            return Ok(existing);
        }
        let model = Rc::new(init());
        let scope = CancellationScope::new();
        model.set_view_model_scope(scope.clone());
        let forgotten = Rc::clone(&model);
        let cleared = Rc::clone(&model);
        let hooks = Hooks {
            scope: Some(scope),
            forgotten: Some(Box::new(move || forgotten.on_forgotten())),
            cleared: Some(Box::new(move || cleared.on_cleared())),
        };
        self.insert(key, Rc::clone(&model), type_name::<T>(), hooks);
        model.on_remembered();
        Ok(model)
    }

    /// Retains a non-reactive object with the same framed lifetime as state.
    pub fn retain<T: 'static>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> T,
    ) -> Result<Rc<T>, StateError> {
        self.assert_in_frame(key);
        if let Some(existing) = self.lookup::<Rc<T>>(key)? {
            return Ok(existing);
        }
        let value = Rc::new(init());
        self.insert(key, Rc::clone(&value), type_name::<T>(), Hooks::default());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Number of completed frames.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    fn assert_in_frame(&self, key: &str) {
        assert!(self.in_frame, "state {key:?} requested outside a frame");
    }

    fn notifier(&self) -> ChangeNotifier {
        let slot = Arc::clone(&self.on_state_change);
        Arc::new(move || {
            let callback = slot.read().expect("state change slot poisoned").clone();
            if let Some(callback) = callback {
                callback();
            }
        })
    }

    fn lookup<V: Any + Clone>(&mut self, key: &str) -> Result<Option<V>, StateError> {
        let Some(entry) = self.entries.get_mut(key) else {
            return Ok(None);
        };
        entry.accessed_this_frame = true;
        match entry.value.downcast_ref::<V>() {
            Some(value) => Ok(Some(value.clone())),
            None => Err(StateError::TypeMismatch {
                key: key.to_owned(),
                expected: type_name::<V>(),
                found: entry.type_name,
            }),
        }
    }

    fn insert<V: Any>(&mut self, key: &str, value: V, type_name: &'static str, hooks: Hooks) {
        log::trace!("state {key:?} created as {type_name}");
        self.entries.insert(
            key.to_owned(),
            Entry {
                value: Box::new(value),
                type_name,
                accessed_this_frame: true,
                seen_last_frame: false,
                hooks,
            },
        );
    }
}

impl fmt::Debug for PersistentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentState")
            .field("entries", &self.keys())
            .field("in_frame", &self.in_frame)
            .field("frame_count", &self.frame_count)
            .finish()
    }
}

/// Open frame over a store; ends the frame when dropped.
pub struct FrameGuard<'a> {
    store: &'a mut PersistentState,
}

impl<'a> FrameGuard<'a> {
    pub fn new(store: &'a mut PersistentState) -> Self {
        store.start_frame();
        Self { store }
    }
}

impl Deref for FrameGuard<'_> {
    type Target = PersistentState;

    fn deref(&self) -> &PersistentState {
        self.store
    }
}

impl DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut PersistentState {
        self.store
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        if self.store.in_frame {
            self.store.end_frame();
        }
    }
}

/// Runs `body` inside a frame; the frame is closed on every exit path.
pub fn with_frame<R>(
    store: &mut PersistentState,
    body: impl FnOnce(&mut PersistentState) -> R,
) -> R {
    let mut guard = FrameGuard::new(store);
    body(&mut guard)
}

#[cfg(test)]
#[path = "tests/persistent_state_tests.rs"]
mod tests;
