//! The tree builder composable functions call into.
//!
//! A [`Composer`] drives a [`Zipper`] over fresh layout nodes while
//! borrowing the long-lived [`PersistentState`] and [`IdentityManager`].
//! Identifiers are generated in the scope named by the key prefix stack,
//! and every state or memo key is qualified by that scope and by the path
//! of the focused node, so positional identity decides ownership.

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use trellis_core::collections::map::HashMap;
use trellis_core::{
    Identifier, IdentityManager, ImmutableMap, MutableValue, NodePath, PersistentState,
    RememberObserver, StateError, StateOptions, ViewModel,
};
use web_time::Instant;

use crate::locals::LocalKey;
use crate::modifier::Modifier;
use crate::node::{LayoutNode, WidgetConstructor};
use crate::zipper::Zipper;

/// A composable: a function describing UI into a composer.
pub type Composable<'a> = Box<dyn FnOnce(&mut Composer<'_>) + 'a>;

#[derive(Clone)]
struct MemoEntry {
    value: Rc<dyn Any>,
    type_name: &'static str,
}

/// Stable callable whose target is repointed on every pass.
///
/// Widgets hand [`entry`](Self::entry) to modifiers once; later passes only
/// swap the target, so the modifier element stays equal across frames and
/// still calls the latest closure.
pub struct HandlerCell<A> {
    target: RefCell<Rc<dyn Fn(A)>>,
    entry: Rc<dyn Fn(A)>,
}

impl<A: 'static> HandlerCell<A> {
    fn new(target: Rc<dyn Fn(A)>) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            HandlerCell {
                target: RefCell::new(target),
                entry: Rc::new(move |arg: A| {
                    if let Some(cell) = weak.upgrade() {
                        cell.call(arg);
                    }
                }),
            }
        })
    }

    pub fn call(&self, arg: A) {
        let target = self.target.borrow().clone();
        target(arg);
    }

    pub fn set(&self, target: Rc<dyn Fn(A)>) {
        *self.target.borrow_mut() = target;
    }

    pub fn entry(&self) -> Rc<dyn Fn(A)> {
        self.entry.clone()
    }
}

pub struct Composer<'a> {
    zipper: Zipper,
    open_blocks: usize,
    memo: ImmutableMap<MemoEntry>,
    state: &'a mut PersistentState,
    ids: &'a mut IdentityManager,
    key_prefix: Vec<String>,
    pub(crate) locals: HashMap<LocalKey, Vec<Rc<dyn Any>>>,
    pub(crate) local_sites: HashMap<LocalKey, usize>,
    pub(crate) static_local_changes: usize,
    frame_time: Instant,
    frame_requested: bool,
}

impl<'a> Composer<'a> {
    /// Starts a pass. The identity manager is rewound so identifiers
    /// repeat across passes for the same source positions.
    pub fn new(state: &'a mut PersistentState, ids: &'a mut IdentityManager) -> Self {
        ids.reset_all();
        Self {
            zipper: Zipper::new(),
            open_blocks: 0,
            memo: ImmutableMap::new(),
            state,
            ids,
            key_prefix: Vec::new(),
            locals: HashMap::default(),
            local_sites: HashMap::default(),
            static_local_changes: 0,
            frame_time: Instant::now(),
            frame_requested: false,
        }
    }

    pub fn with_frame_time(mut self, frame_time: Instant) -> Self {
        self.frame_time = frame_time;
        self
    }

    /// Timestamp of the frame being composed.
    pub fn frame_time(&self) -> Instant {
        self.frame_time
    }

    /// Asks for another frame after this one, e.g. while animating.
    pub fn request_frame(&mut self) {
        self.frame_requested = true;
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    // ------------------------------------------------------------------
    // Tree building
    // ------------------------------------------------------------------

    /// Opens a block labelled `key`; it becomes the focus.
    pub fn start_block(&mut self, key: &str) -> &mut Self {
        let id = self.generate_id();
        log::trace!("start_block {key} {id:?} depth={}", self.open_blocks);
        self.zipper.descend(LayoutNode::new(id, key));
        self.open_blocks += 1;
        self
    }

    /// Closes the focused block into its parent.
    ///
    /// # Panics
    /// Panics when no block is open.
    pub fn end_block(&mut self) -> &mut Self {
        assert!(self.open_blocks > 0, "end_block called without a matching start_block");
        self.open_blocks -= 1;
        if let Some(focus) = self.zipper.focus() {
            log::trace!("end_block {} {:?}", focus.key(), focus.id());
        }
        self.zipper.up();
        self
    }

    /// Finishes the pass, returning the root. Discards the memo.
    pub fn build(mut self) -> Rc<LayoutNode> {
        if self.open_blocks > 0 {
            log::warn!("build closing {} unbalanced blocks", self.open_blocks);
        }
        self.memo = ImmutableMap::new();
        let root = self
            .zipper
            .into_root()
            .unwrap_or_else(|| LayoutNode::new(Identifier::EMPTY, "empty"));
        Rc::new(root)
    }

    /// Number of blocks currently open.
    pub fn depth(&self) -> usize {
        self.open_blocks
    }

    /// Next identifier in the current key-prefix scope.
    pub fn generate_id(&mut self) -> Identifier {
        let scope = self.key_prefix.join("/");
        self.ids.generate_in(&scope)
    }

    /// Identifier of the focused block, empty before the first block.
    pub fn get_id(&self) -> Identifier {
        self.zipper
            .focus()
            .map_or(Identifier::EMPTY, |focus| focus.id())
    }

    /// Identifiers of the focus's ancestors, root first.
    pub fn get_path(&self) -> NodePath {
        self.zipper.path_ids()
    }

    fn focus_mut(&mut self, operation: &str) -> &mut LayoutNode {
        self.zipper
            .focus_mut()
            .unwrap_or_else(|| panic!("{operation} called outside of a block"))
    }

    /// Replaces the focused block's modifier with `transform(current)`.
    pub fn modifier(&mut self, transform: impl FnOnce(Modifier) -> Modifier) -> &mut Self {
        self.focus_mut("modifier").map_modifier(transform);
        self
    }

    pub fn set_widget_constructor(&mut self, constructor: WidgetConstructor) -> &mut Self {
        self.focus_mut("set_widget_constructor")
            .set_widget_constructor(constructor);
        self
    }

    pub fn emit_slot<T: 'static>(&mut self, key: &str, value: T) -> &mut Self {
        self.focus_mut("emit_slot").set_slot(key, value);
        self
    }

    pub fn with_composable(&mut self, composable: impl FnOnce(&mut Composer<'_>)) -> &mut Self {
        composable(self);
        self
    }

    /// Applies each composable in order.
    pub fn sequence<'c>(
        &mut self,
        composables: impl IntoIterator<Item = Composable<'c>>,
    ) -> &mut Self {
        for composable in composables {
            composable(self);
        }
        self
    }

    /// Runs `body` with `prefix` pushed on the key prefix stack.
    pub fn key_prefix<R>(&mut self, prefix: &str, body: impl FnOnce(&mut Self) -> R) -> R {
        self.key_prefix.push(prefix.to_owned());
        let result = body(self);
        self.key_prefix.pop();
        result
    }

    /// The key prefix stack joined with `/`.
    pub fn current_prefix(&self) -> String {
        self.key_prefix.join("/")
    }

    /// `key` qualified by the prefix scope and the focused node's path.
    pub fn qualified_key(&self, key: &str) -> String {
        let path = self.zipper.path_ids().with(self.get_id());
        format!("{}|{}|{}", self.current_prefix(), path.qualified(), key)
    }

    // ------------------------------------------------------------------
    // Memo and state
    // ------------------------------------------------------------------

    /// Per-pass memo: runs `calc` once per key and pass.
    pub fn try_remember<T: Clone + 'static>(
        &mut self,
        key: &str,
        calc: impl FnOnce() -> T,
    ) -> Result<T, StateError> {
        let key = self.qualified_key(key);
        if let Some(entry) = self.memo.find(&key) {
            return entry
                .value
                .downcast_ref::<T>()
                .cloned()
                .ok_or_else(|| StateError::TypeMismatch {
                    key: key.clone(),
                    expected: type_name::<T>(),
                    found: entry.type_name,
                });
        }
        let value = calc();
        self.memo.insert(
            key,
            MemoEntry {
                value: Rc::new(value.clone()),
                type_name: type_name::<T>(),
            },
        );
        Ok(value)
    }

    /// Like [`try_remember`](Self::try_remember) but panics on a type mismatch.
    pub fn remember<T: Clone + 'static>(&mut self, key: &str, calc: impl FnOnce() -> T) -> T {
        self.try_remember(key, calc)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn state<T>(&mut self, key: &str, init: impl FnOnce() -> T) -> Result<MutableValue<T>, StateError>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        self.state_with(key, init, StateOptions::default())
    }

    pub fn state_with<T>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> T,
        options: StateOptions<T>,
    ) -> Result<MutableValue<T>, StateError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let key = self.qualified_key(key);
        self.state.state(&key, init, options)
    }

    pub fn must_state<T>(&mut self, key: &str, init: impl FnOnce() -> T) -> MutableValue<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        let key = self.qualified_key(key);
        self.state.must_state(&key, init, StateOptions::default())
    }

    pub fn remembered_state<T>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> T,
    ) -> Result<MutableValue<T>, StateError>
    where
        T: RememberObserver + Clone + PartialEq + Send + Sync + 'static,
    {
        let key = self.qualified_key(key);
        self.state
            .remembered_state(&key, init, StateOptions::default())
    }

    pub fn view_model<T: ViewModel + 'static>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> T,
    ) -> Result<Rc<T>, StateError> {
        let key = self.qualified_key(key);
        self.state.view_model(&key, init)
    }

    /// Retains a non-reactive object across passes.
    pub fn retain<T: 'static>(
        &mut self,
        key: &str,
        init: impl FnOnce() -> T,
    ) -> Result<Rc<T>, StateError> {
        let key = self.qualified_key(key);
        self.state.retain(&key, init)
    }

    /// Retained handler cell under `key`, repointed at `handler`.
    ///
    /// # Panics
    /// Panics when `key` already holds a handler of another argument type.
    pub fn handler<A: 'static>(
        &mut self,
        key: &str,
        handler: impl Fn(A) + 'static,
    ) -> Rc<HandlerCell<A>> {
        let target: Rc<dyn Fn(A)> = Rc::new(handler);
        let initial = Rc::clone(&target);
        let cell = self
            .retain(key, move || HandlerCell::new(initial))
            .unwrap_or_else(|err| panic!("{err}"));
        cell.set(target);
        Rc::clone(&*cell)
    }

    pub fn store(&self) -> &PersistentState {
        &*self.state
    }
}

#[cfg(test)]
#[path = "tests/composer_tests.rs"]
mod tests;
