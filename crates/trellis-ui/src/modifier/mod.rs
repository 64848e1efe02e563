//! Modifier algebra for Trellis.
//!
//! A [`Modifier`] is an immutable chain of elements. `Modifier::empty()` is
//! the unit of [`then`](Modifier::then), chains are kept flat so grouping
//! never matters, and an inspectable link carries a `(name, properties)`
//! pair for tooling. The leftmost element is the outermost effect: folds
//! run head to tail with [`fold_out`](Modifier::fold_out) and tail to head
//! with [`fold_in`](Modifier::fold_in), which is the order coordinators
//! expand a chain in.

use std::fmt;
use std::rc::Rc;

pub use trellis_foundation::{modifier_element, DynModifierElement, ModifierNodeElement};
pub use trellis_ui_graphics::{Color, EdgeInsets, Point};

mod background;
mod clickable;
mod graphics;
mod offset;
mod padding;
mod parent_data;
mod pointer_input;
mod size;

/// Minimal inspector metadata storage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InspectorInfo {
    name: &'static str,
    properties: Vec<InspectorProperty>,
}

impl InspectorInfo {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            properties: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn add_property<V: Into<String>>(&mut self, name: &'static str, value: V) {
        self.properties.push(InspectorProperty {
            name,
            value: value.into(),
        });
    }

    pub fn properties(&self) -> &[InspectorProperty] {
        &self.properties
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn describe(&self) -> String {
        self.properties
            .iter()
            .map(|property| format!("{}={}", property.name, property.value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Single inspector entry recording a property exposed by a modifier.
#[derive(Clone, Debug, PartialEq)]
pub struct InspectorProperty {
    pub name: &'static str,
    pub value: String,
}

pub(crate) fn inspector_metadata<F>(name: &'static str, recorder: F) -> InspectorInfo
where
    F: FnOnce(&mut InspectorInfo),
{
    let mut info = InspectorInfo::new(name);
    recorder(&mut info);
    info
}

#[derive(Clone, Default)]
pub enum Modifier {
    #[default]
    Empty,
    Element(DynModifierElement),
    Inspectable {
        info: Rc<InspectorInfo>,
        modifier: Rc<Modifier>,
    },
    /// Flattened links; never holds `Empty` or nested chains.
    Chain(Rc<[Modifier]>),
}

impl Modifier {
    pub fn empty() -> Self {
        Self::Empty
    }

    pub fn element(element: DynModifierElement) -> Self {
        Self::Element(element)
    }

    pub(crate) fn with_element<E: ModifierNodeElement>(element: E) -> Self {
        Self::Element(modifier_element(element))
    }

    /// Wraps `modifier` with inspector metadata. Wrapping the empty
    /// modifier yields the empty modifier.
    pub fn inspectable(modifier: Modifier, info: InspectorInfo) -> Self {
        if modifier.is_empty() {
            return Self::Empty;
        }
        Self::Inspectable {
            info: Rc::new(info),
            modifier: Rc::new(modifier),
        }
    }

    pub(crate) fn with_inspector_metadata(self, info: InspectorInfo) -> Self {
        Self::inspectable(self, info)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Appends `next` after this modifier, so `next` is the inner effect.
    pub fn then(&self, next: Modifier) -> Modifier {
        match (self, next) {
            (Self::Empty, next) => next,
            (this, Self::Empty) => this.clone(),
            (this, next) => {
                let mut links = Vec::with_capacity(this.link_count() + next.link_count());
                this.push_links(&mut links);
                next.push_links(&mut links);
                Self::Chain(links.into())
            }
        }
    }

    fn link_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Chain(links) => links.len(),
            _ => 1,
        }
    }

    fn push_links(&self, links: &mut Vec<Modifier>) {
        match self {
            Self::Empty => {}
            Self::Chain(parts) => links.extend(parts.iter().cloned()),
            link => links.push(link.clone()),
        }
    }

    /// Top-level links, head to tail.
    pub fn links(&self) -> Vec<Modifier> {
        let mut links = Vec::with_capacity(self.link_count());
        self.push_links(&mut links);
        links
    }

    /// Visits elements head to tail.
    pub fn fold_out<R>(&self, initial: R, mut operation: impl FnMut(R, &DynModifierElement) -> R) -> R {
        self.fold_out_with(initial, &mut operation)
    }

    fn fold_out_with<R>(
        &self,
        acc: R,
        operation: &mut dyn FnMut(R, &DynModifierElement) -> R,
    ) -> R {
        match self {
            Self::Empty => acc,
            Self::Element(element) => operation(acc, element),
            Self::Inspectable { modifier, .. } => modifier.fold_out_with(acc, operation),
            Self::Chain(links) => links
                .iter()
                .fold(acc, |acc, link| link.fold_out_with(acc, operation)),
        }
    }

    /// Visits elements tail to head.
    pub fn fold_in<R>(&self, initial: R, mut operation: impl FnMut(R, &DynModifierElement) -> R) -> R {
        self.fold_in_with(initial, &mut operation)
    }

    fn fold_in_with<R>(
        &self,
        acc: R,
        operation: &mut dyn FnMut(R, &DynModifierElement) -> R,
    ) -> R {
        match self {
            Self::Empty => acc,
            Self::Element(element) => operation(acc, element),
            Self::Inspectable { modifier, .. } => modifier.fold_in_with(acc, operation),
            Self::Chain(links) => links
                .iter()
                .rev()
                .fold(acc, |acc, link| link.fold_in_with(acc, operation)),
        }
    }

    /// Returns true if any element satisfies the predicate; stops at the first hit.
    pub fn any(&self, mut predicate: impl FnMut(&DynModifierElement) -> bool) -> bool {
        self.any_with(&mut predicate)
    }

    fn any_with(&self, predicate: &mut dyn FnMut(&DynModifierElement) -> bool) -> bool {
        match self {
            Self::Empty => false,
            Self::Element(element) => predicate(element),
            Self::Inspectable { modifier, .. } => modifier.any_with(predicate),
            Self::Chain(links) => links.iter().any(|link| link.any_with(predicate)),
        }
    }

    /// Returns true only if all elements satisfy the predicate; stops at the first miss.
    pub fn all(&self, mut predicate: impl FnMut(&DynModifierElement) -> bool) -> bool {
        !self.any(|element| !predicate(element))
    }

    /// Elements head to tail.
    pub fn elements(&self) -> Vec<DynModifierElement> {
        self.fold_out(Vec::new(), |mut acc, element| {
            acc.push(element.clone());
            acc
        })
    }

    pub fn len(&self) -> usize {
        self.fold_out(0, |count, _| count + 1)
    }

    /// Splits into `(outer, inner)`: elements whose inspector name is
    /// `name` go to `inner`, the rest stay in `outer`, both in order.
    pub fn partition(&self, name: &str) -> (Modifier, Modifier) {
        self.fold_out(
            (Modifier::empty(), Modifier::empty()),
            |(outer, inner), element| {
                let link = Modifier::element(element.clone());
                if element.inspector_name() == name {
                    (outer, inner.then(link))
                } else {
                    (outer.then(link), inner)
                }
            },
        )
    }

    /// Inspector entries of the top-level links, head to tail.
    pub fn inspector_entries(&self) -> Vec<InspectorInfo> {
        let mut entries = Vec::new();
        for link in self.links() {
            match link {
                Self::Inspectable { info, .. } => entries.push((*info).clone()),
                Self::Element(element) => {
                    let mut info = InspectorInfo::new(element.inspector_name());
                    element.record_inspector_properties(&mut |name, value| {
                        info.add_property(name, value)
                    });
                    entries.push(info);
                }
                Self::Empty | Self::Chain(_) => {}
            }
        }
        entries
    }
}

impl From<DynModifierElement> for Modifier {
    fn from(element: DynModifierElement) -> Self {
        Self::Element(element)
    }
}

impl PartialEq for Modifier {
    fn eq(&self, other: &Self) -> bool {
        let left = self.elements();
        let right = other.elements();
        left.len() == right.len()
            && left
                .iter()
                .zip(right.iter())
                .all(|(a, b)| a.equals_element(b.as_ref()))
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Modifier"),
            _ => {
                let names: Vec<String> = self
                    .inspector_entries()
                    .iter()
                    .map(|info| {
                        if info.is_empty() {
                            info.name().to_string()
                        } else {
                            format!("{}({})", info.name(), info.describe())
                        }
                    })
                    .collect();
                write!(f, "Modifier[{}]", names.join(", "))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/modifier_tests.rs"]
mod tests;
