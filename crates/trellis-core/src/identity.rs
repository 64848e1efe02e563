//! Positional identity.
//!
//! Every block opened by the composer receives an [`Identifier`] generated
//! from the scope named by the current key prefix. Scopes are independent
//! counters, so identifiers produced inside one branch never equal the ones
//! produced inside a sibling branch, and rewinding the counters at the start
//! of each pass makes identifiers a pure function of source position.

use std::fmt;

use smallvec::SmallVec;

use crate::collections::map::HashMap;
use crate::hash::stable;

/// Name of the scope used when no key prefix is active.
pub const DEFAULT_SCOPE: &str = "";

const SEED_SCOPE: &str = "#seed";

/// Scope-local positional identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Identifier {
    scope: u64,
    value: u32,
}

impl Identifier {
    /// The zero identifier. Never produced by [`IdentityManager::generate`].
    pub const EMPTY: Identifier = Identifier { scope: 0, value: 0 };

    pub(crate) const fn new(scope: u64, value: u32) -> Self {
        Self { scope, value }
    }

    /// Counter value inside the owning scope.
    pub fn value(self) -> u32 {
        self.value
    }

    /// Hash of the scope that produced this identifier.
    pub fn scope_hash(self) -> u64 {
        self.scope
    }

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// Scope-qualified rendering, unique across scopes.
    pub fn qualified(self) -> String {
        format!("{:x}.{}", self.scope, self.value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({:x}:{})", self.scope, self.value)
    }
}

#[derive(Debug)]
struct ScopeCounter {
    hash: u64,
    last: u32,
}

impl ScopeCounter {
    fn new(scope: &str) -> Self {
        Self {
            hash: stable::hash_one(scope),
            last: 0,
        }
    }
}

/// Source of identifiers, one counter per named scope.
#[derive(Debug, Default)]
pub struct IdentityManager {
    scopes: HashMap<String, ScopeCounter>,
}

impl IdentityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next identifier in the default scope.
    pub fn generate(&mut self) -> Identifier {
        self.generate_in(DEFAULT_SCOPE)
    }

    /// Generates the next identifier in `scope`.
    ///
    /// # Panics
    /// Panics when the scope counter overflows.
    pub fn generate_in(&mut self, scope: &str) -> Identifier {
        let counter = match self.scopes.get_mut(scope) {
            Some(counter) => counter,
            None => self
                .scopes
                .entry(scope.to_owned())
                .or_insert_with(|| ScopeCounter::new(scope)),
        };
        counter.last = counter
            .last
            .checked_add(1)
            .unwrap_or_else(|| panic!("identifier counter overflow in scope {scope:?}"));
        Identifier::new(counter.hash, counter.last)
    }

    /// Rewinds the default scope.
    pub fn reset(&mut self) {
        self.reset_scope(DEFAULT_SCOPE);
    }

    pub fn reset_scope(&mut self, scope: &str) {
        if let Some(counter) = self.scopes.get_mut(scope) {
            counter.last = 0;
        }
    }

    /// Rewinds every scope. Scope hashes are kept.
    pub fn reset_all(&mut self) {
        for counter in self.scopes.values_mut() {
            counter.last = 0;
        }
    }

    pub fn empty(&self) -> Identifier {
        Identifier::EMPTY
    }

    /// Deterministic identifier derived from `seed`; no counter is touched.
    pub fn create_from_seed(seed: &str) -> Identifier {
        let scope = stable::hash_one(SEED_SCOPE);
        // Truncation is intentional: the low bits of the hash are the identity.
        let value = (stable::hash_one(seed) as u32).max(1);
        Identifier::new(scope, value)
    }

    /// Number of scopes that have produced at least one identifier.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

/// Identifiers from the root down to (and excluding) a node.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(SmallVec<[Identifier; 8]>);

impl NodePath {
    /// The path of the root: empty.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: Identifier) {
        self.0.push(id);
    }

    pub fn with(&self, id: Identifier) -> Self {
        let mut next = self.clone();
        next.push(id);
        next
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<Identifier> {
        self.0.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Identifier> + '_ {
        self.0.iter().copied()
    }

    /// Scope-qualified rendering used for keys that must not collide.
    pub fn qualified(&self) -> String {
        self.0
            .iter()
            .map(|id| id.qualified())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl FromIterator<Identifier> for NodePath {
    fn from_iter<I: IntoIterator<Item = Identifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, id) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodePath({self})")
    }
}

#[cfg(test)]
#[path = "tests/identity_tests.rs"]
mod tests;
