//! Composition locals: implicit values threaded through a subtree.
//!
//! A local is declared once, usually as a `static`, and is keyed by an
//! identifier seeded from its name, so names must be unique per process.
//! Providers push a value for the duration of their content and pop it
//! afterwards; the innermost provider wins and readers outside any provider
//! see the default.
//!
//! Dynamic locals keep the provided value in a [`MutableValue`] held by the
//! state store, so a changed value notifies the store and reads are
//! observed like any other state read. Static locals push the plain value
//! without read tracking; a change is detected per provider site and
//! counted, and the subtree is rebuilt by the full pass that found it.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use trellis_core::{Identifier, IdentityManager, MutableValue};

use crate::composer::Composer;

/// Key of a local inside the composer's provider stacks.
pub type LocalKey = Identifier;

type Install = Box<dyn FnOnce(&mut Composer<'_>) -> Rc<dyn Any>>;

/// A value bound to a local, ready to be installed by a provider.
pub struct ProvidedValue {
    key: LocalKey,
    name: &'static str,
    install: Install,
}

impl ProvidedValue {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ProvidedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvidedValue")
            .field("local", &self.name)
            .finish()
    }
}

fn local_key(name: &str) -> LocalKey {
    IdentityManager::create_from_seed(name)
}

/// Key of the store entry backing one provider site. Sites are counted per
/// local in pass order, so nested and sibling providers of the same local
/// never share an entry.
fn holder_key(composer: &mut Composer<'_>, prefix: &str, key: LocalKey, name: &str) -> String {
    let site = composer.local_sites.entry(key).or_insert(0);
    let index = *site;
    *site += 1;
    format!("{prefix}:{name}@{index}")
}

fn top(composer: &Composer<'_>, key: LocalKey) -> Option<Rc<dyn Any>> {
    composer
        .locals
        .get(&key)
        .and_then(|stack| stack.last())
        .cloned()
}

/// A local whose changes recompose its readers.
pub struct CompositionLocal<T> {
    name: &'static str,
    default: fn() -> T,
}

pub const fn composition_local_of<T>(name: &'static str, default: fn() -> T) -> CompositionLocal<T> {
    CompositionLocal { name, default }
}

impl<T> CompositionLocal<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn key(&self) -> LocalKey {
        local_key(self.name)
    }

    pub fn default_value(&self) -> T {
        (self.default)()
    }

    pub fn provides(&self, value: T) -> ProvidedValue {
        let name = self.name;
        let key = self.key();
        ProvidedValue {
            key,
            name,
            install: Box::new(move |composer| {
                let holder_key = holder_key(composer, "local", key, name);
                let initial = value.clone();
                let holder = composer.must_state(&holder_key, move || initial);
                holder.set(value);
                Rc::new(holder) as Rc<dyn Any>
            }),
        }
    }

    /// Innermost provided value, or the default. Reads are tracked.
    pub fn current(&self, composer: &Composer<'_>) -> T {
        top(composer, self.key())
            .and_then(|value| {
                value
                    .downcast_ref::<MutableValue<T>>()
                    .map(MutableValue::get)
            })
            .unwrap_or_else(self.default)
    }
}

impl<T> fmt::Debug for CompositionLocal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositionLocal({})", self.name)
    }
}

/// A local whose changes invalidate the entire subtree below the provider.
pub struct StaticCompositionLocal<T> {
    name: &'static str,
    default: fn() -> T,
}

pub const fn static_composition_local_of<T>(
    name: &'static str,
    default: fn() -> T,
) -> StaticCompositionLocal<T> {
    StaticCompositionLocal { name, default }
}

impl<T> StaticCompositionLocal<T>
where
    T: Clone + PartialEq + 'static,
{
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn key(&self) -> LocalKey {
        local_key(self.name)
    }

    pub fn default_value(&self) -> T {
        (self.default)()
    }

    pub fn provides(&self, value: T) -> ProvidedValue {
        let name = self.name;
        let key = self.key();
        ProvidedValue {
            key,
            name,
            install: Box::new(move |composer| {
                let holder_key = holder_key(composer, "static-local", key, name);
                let previous = composer
                    .retain(&holder_key, || RefCell::new(None::<T>))
                    .unwrap_or_else(|err| panic!("{err}"));
                let changed = previous
                    .borrow()
                    .as_ref()
                    .is_some_and(|previous| *previous != value);
                if changed {
                    log::debug!("static local {name} changed; subtree invalidated");
                    composer.static_local_changes += 1;
                }
                *previous.borrow_mut() = Some(value.clone());
                Rc::new(value) as Rc<dyn Any>
            }),
        }
    }

    /// Innermost provided value, or the default. Reads are not tracked.
    pub fn current(&self, composer: &Composer<'_>) -> T {
        top(composer, self.key())
            .and_then(|value| value.downcast_ref::<T>().cloned())
            .unwrap_or_else(self.default)
    }
}

impl<T> fmt::Debug for StaticCompositionLocal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StaticCompositionLocal({})", self.name)
    }
}

/// Installs `values` for the duration of `content`, restoring the prior
/// values afterwards.
pub fn composition_local_provider(
    composer: &mut Composer<'_>,
    values: Vec<ProvidedValue>,
    content: impl FnOnce(&mut Composer<'_>),
) {
    let mut installed = Vec::with_capacity(values.len());
    for provided in values {
        let ProvidedValue { key, install, .. } = provided;
        let value = install(composer);
        composer.locals.entry(key).or_default().push(value);
        installed.push(key);
    }
    content(composer);
    for key in installed.into_iter().rev() {
        if let Some(stack) = composer.locals.get_mut(&key) {
            stack.pop();
            if stack.is_empty() {
                composer.locals.remove(&key);
            }
        }
    }
}

impl Composer<'_> {
    /// Number of static local changes seen during this pass.
    ///
    /// Diagnostic only: every pass recomposes the whole tree, so the
    /// subtree under a changed static provider is already being rebuilt
    /// when the change is detected.
    pub fn static_local_changes(&self) -> usize {
        self.static_local_changes
    }
}

#[cfg(test)]
#[path = "tests/locals_tests.rs"]
mod tests;
