//! Reconciliation of chain nodes against a node's modifier elements.
//!
//! A [`ModifierNodeChain`] is retained per layout node across frames. Each
//! frame the node's elements are matched against the previous entries so
//! that node state (pointer tags, handler cells, animation progress)
//! survives as long as an element of the same type keeps its position.

use std::any::TypeId;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use trellis_core::collections::map::HashMap;

use crate::modifier::{ChainNode, DynModifierElement, NodeCapabilities, TreeNode};

/// A chain node shared between the chain and the coordinator expanding it.
pub type SharedChainNode = Rc<RefCell<Box<dyn ChainNode>>>;

struct ChainEntry {
    element_type: TypeId,
    key: Option<u64>,
    hash_code: u64,
    element: DynModifierElement,
    node: SharedChainNode,
    capabilities: NodeCapabilities,
    /// Index of the following entry, head to tail.
    next: Option<usize>,
    attached: bool,
}

impl ChainEntry {
    fn new(element: &DynModifierElement) -> Self {
        Self {
            element_type: element.element_type(),
            key: element.key(),
            hash_code: element.hash_code(),
            element: element.clone(),
            node: Rc::new(RefCell::new(element.create_node())),
            capabilities: element.capabilities(),
            next: None,
            attached: false,
        }
    }

    fn detach(&mut self) {
        if self.attached {
            self.node.borrow_mut().on_detach();
            self.attached = false;
        }
    }
}

impl fmt::Debug for ChainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainEntry")
            .field("element", &self.element)
            .field("key", &self.key)
            .field("capabilities", &self.capabilities)
            .field("next", &self.next)
            .field("attached", &self.attached)
            .finish()
    }
}

/// What a reconciliation pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainUpdate {
    /// Nodes created for elements without a match.
    pub created: usize,
    /// Nodes carried over from the previous pass.
    pub reused: usize,
    /// Reused nodes whose element changed (or always updates).
    pub updated: usize,
    /// Nodes detached because no element matched them.
    pub removed: usize,
}

type Candidates = SmallVec<[usize; 2]>;

/// Lookup tables over the previous entries.
struct EntryIndex {
    keyed: HashMap<(TypeId, u64), Candidates>,
    hashed: HashMap<(TypeId, u64), Candidates>,
    typed: HashMap<TypeId, Candidates>,
}

impl EntryIndex {
    fn build(entries: &[Option<ChainEntry>]) -> Self {
        let mut keyed: HashMap<(TypeId, u64), Candidates> = HashMap::default();
        let mut hashed: HashMap<(TypeId, u64), Candidates> = HashMap::default();
        let mut typed: HashMap<TypeId, Candidates> = HashMap::default();

        for (i, entry) in entries.iter().enumerate() {
            let Some(entry) = entry else { continue };
            match entry.key {
                Some(key) => keyed.entry((entry.element_type, key)).or_default().push(i),
                None => {
                    hashed
                        .entry((entry.element_type, entry.hash_code))
                        .or_default()
                        .push(i);
                    typed.entry(entry.element_type).or_default().push(i);
                }
            }
        }

        Self {
            keyed,
            hashed,
            typed,
        }
    }

    /// Finds the best unused entry for `element`.
    ///
    /// Priority: same type and key, then same type with an equal element,
    /// then any unkeyed entry of the same type.
    fn find_match(
        &self,
        entries: &[Option<ChainEntry>],
        element: &DynModifierElement,
    ) -> Option<usize> {
        let element_type = element.element_type();
        let available = |i: &usize| entries[*i].is_some();

        if let Some(key) = element.key() {
            return self
                .keyed
                .get(&(element_type, key))
                .and_then(|candidates| candidates.iter().copied().find(|i| available(i)));
        }

        let exact = self
            .hashed
            .get(&(element_type, element.hash_code()))
            .and_then(|candidates| {
                candidates.iter().copied().find(|i| {
                    entries[*i]
                        .as_ref()
                        .is_some_and(|entry| entry.element.equals_element(element.as_ref()))
                })
            });
        exact.or_else(|| {
            self.typed
                .get(&element_type)
                .and_then(|candidates| candidates.iter().copied().find(|i| available(i)))
        })
    }
}

/// Ordered chain nodes for one layout node, head (outermost) to tail.
#[derive(Debug, Default)]
pub struct ModifierNodeChain {
    entries: Vec<ChainEntry>,
}

impl ModifierNodeChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reconciles the chain against `elements`, given head to tail.
    ///
    /// Matched nodes are updated in place when their element changed;
    /// unmatched elements get fresh nodes; leftover nodes are detached.
    pub fn update_from_slice(&mut self, elements: &[DynModifierElement]) -> ChainUpdate {
        let mut old: Vec<Option<ChainEntry>> =
            std::mem::take(&mut self.entries).into_iter().map(Some).collect();
        let index = EntryIndex::build(&old);
        let mut stats = ChainUpdate::default();
        let mut entries = Vec::with_capacity(elements.len());

        for element in elements {
            let matched = index
                .find_match(&old, element)
                .and_then(|i| old[i].take());
            let entry = match matched {
                Some(mut entry) => {
                    stats.reused += 1;
                    let same = entry.element.equals_element(element.as_ref());
                    if !same || element.requires_update() {
                        element.update_node(&mut **entry.node.borrow_mut());
                        entry.element = element.clone();
                        entry.hash_code = element.hash_code();
                        stats.updated += 1;
                    }
                    entry.key = element.key();
                    entry.capabilities = element.capabilities();
                    entry
                }
                None => {
                    stats.created += 1;
                    ChainEntry::new(element)
                }
            };
            entries.push(entry);
        }

        for mut entry in old.into_iter().flatten() {
            entry.detach();
            stats.removed += 1;
        }

        self.entries = entries;
        self.sync_links();
        log::trace!("modifier chain reconciled: {stats:?}");
        stats
    }

    fn sync_links(&mut self) {
        let len = self.entries.len();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.next = (i + 1 < len).then_some(i + 1);
        }
    }

    /// Index of the outermost entry.
    pub fn head(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(0)
    }

    /// Index of the entry following `index`.
    pub fn next(&self, index: usize) -> Option<usize> {
        self.entries.get(index).and_then(|entry| entry.next)
    }

    pub fn node(&self, index: usize) -> Option<&SharedChainNode> {
        self.entries.get(index).map(|entry| &entry.node)
    }

    pub fn element(&self, index: usize) -> Option<&DynModifierElement> {
        self.entries.get(index).map(|entry| &entry.element)
    }

    /// Entries head to tail; reverse it for fold-in order.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = (&DynModifierElement, &SharedChainNode)> + '_ {
        self.entries
            .iter()
            .map(|entry| (&entry.element, &entry.node))
    }

    /// Attaches the node at `index` to `owner` unless it already is.
    ///
    /// Returns whether `on_attach` ran.
    pub fn attach(&mut self, index: usize, owner: &dyn TreeNode) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };
        if entry.attached {
            return false;
        }
        entry.node.borrow_mut().on_attach(owner);
        entry.attached = true;
        true
    }

    pub fn is_attached(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|entry| entry.attached)
    }

    pub fn detach_all(&mut self) {
        for entry in &mut self.entries {
            entry.detach();
        }
    }

    /// Union of the capabilities declared by the chain's elements.
    pub fn capabilities(&self) -> NodeCapabilities {
        self.entries
            .iter()
            .fold(NodeCapabilities::NONE, |acc, entry| acc | entry.capabilities)
    }
}

impl Drop for ModifierNodeChain {
    fn drop(&mut self) {
        self.detach_all();
    }
}

#[cfg(test)]
#[path = "tests/chain_tests.rs"]
mod tests;
