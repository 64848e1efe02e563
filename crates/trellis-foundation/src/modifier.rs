//! Modifier elements and the chain nodes they create.
//!
//! An element is the immutable description that lives inside a `Modifier`.
//! During coordinator expansion every element is turned into a stateful
//! [`ChainNode`], either freshly created or reused from the previous frame
//! and brought up to date through [`ModifierNodeElement::update`]. Nodes
//! advertise what they do through [`NodeCapabilities`] and the narrow wrap
//! traits probed by `as_*` methods.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{BitOr, BitOrAssign};
use std::rc::Rc;

use trellis_core::hash;
use trellis_core::Identifier;
use trellis_ui_layout::{Dimensions, LayoutContext};

/// A widget: lays itself out under the context's constraints, appending ops.
pub type LayoutWidget = Rc<dyn Fn(&mut LayoutContext) -> Dimensions>;

/// The tree node a chain node is attached to.
pub trait TreeNode {
    fn id(&self) -> Identifier;

    /// Block label the node was started with.
    fn key(&self) -> &str;
}

/// Coarse classification of a chain node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Layout,
    Draw,
    Semantics,
    PointerInput,
    ParentData,
    FocusTarget,
    KeyInput,
    CompositionLocalConsumer,
    IntermediateMeasure,
    RotaryInput,
    GlobalPositionAware,
    Locals,
}

impl NodeKind {
    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Layout => "layout",
            NodeKind::Draw => "draw",
            NodeKind::Semantics => "semantics",
            NodeKind::PointerInput => "pointer_input",
            NodeKind::ParentData => "parent_data",
            NodeKind::FocusTarget => "focus_target",
            NodeKind::KeyInput => "key_input",
            NodeKind::CompositionLocalConsumer => "composition_local_consumer",
            NodeKind::IntermediateMeasure => "intermediate_measure",
            NodeKind::RotaryInput => "rotary_input",
            NodeKind::GlobalPositionAware => "global_position_aware",
            NodeKind::Locals => "locals",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability flags indicating which wrap traits a chain node implements.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeCapabilities(u32);

impl NodeCapabilities {
    /// No capabilities.
    pub const NONE: Self = Self(0);
    /// Node wraps the layout chain.
    pub const LAYOUT: Self = Self(1 << 0);
    /// Node wraps the draw chain.
    pub const DRAW: Self = Self(1 << 1);
    /// Node wraps the pointer chain.
    pub const POINTER_INPUT: Self = Self(1 << 2);
    /// Node publishes data read by the parent container.
    pub const PARENT_DATA: Self = Self(1 << 3);
    pub const SEMANTICS: Self = Self(1 << 4);
    pub const FOCUS: Self = Self(1 << 5);
    pub const MODIFIER_LOCALS: Self = Self(1 << 6);

    /// Returns an empty capability set.
    pub const fn empty() -> Self {
        Self::NONE
    }

    /// Returns whether all bits in `other` are present in `self`.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns whether any bit in `other` is present in `self`.
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Inserts the requested capability bits.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Returns the raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true when no capabilities are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl Default for NodeCapabilities {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for NodeCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCapabilities")
            .field("layout", &self.contains(Self::LAYOUT))
            .field("draw", &self.contains(Self::DRAW))
            .field("pointer_input", &self.contains(Self::POINTER_INPUT))
            .field("parent_data", &self.contains(Self::PARENT_DATA))
            .field("semantics", &self.contains(Self::SEMANTICS))
            .field("focus", &self.contains(Self::FOCUS))
            .field("modifier_locals", &self.contains(Self::MODIFIER_LOCALS))
            .finish()
    }
}

impl BitOr for NodeCapabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for NodeCapabilities {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Stateful node created by a modifier element.
///
/// Nodes live for as long as an element of the same type keeps matching at
/// their position in a node's modifier. The coordinator attaches them to
/// their tree node every frame and probes the `as_*` methods for the
/// capabilities their element declared.
pub trait ChainNode: Any {
    fn kind(&self) -> NodeKind;

    /// Capabilities the node actually exposes, derived from the probes.
    fn capabilities(&self) -> NodeCapabilities {
        let mut capabilities = NodeCapabilities::NONE;
        if self.as_layout_wrap().is_some() {
            capabilities |= NodeCapabilities::LAYOUT;
        }
        if self.as_draw_wrap().is_some() {
            capabilities |= NodeCapabilities::DRAW;
        }
        if self.as_pointer_wrap().is_some() {
            capabilities |= NodeCapabilities::POINTER_INPUT;
        }
        if self.as_parent_data().is_some() {
            capabilities |= NodeCapabilities::PARENT_DATA;
        }
        capabilities
    }

    fn on_attach(&mut self, _owner: &dyn TreeNode) {}

    fn on_detach(&mut self) {}

    fn as_layout_wrap(&self) -> Option<&dyn LayoutWrapNode> {
        None
    }

    fn as_draw_wrap(&self) -> Option<&dyn DrawWrapNode> {
        None
    }

    fn as_pointer_wrap(&self) -> Option<&dyn PointerWrapNode> {
        None
    }

    fn as_parent_data(&self) -> Option<&dyn ParentDataNode> {
        None
    }
}

impl dyn ChainNode {
    pub fn as_any(&self) -> &dyn Any {
        self
    }

    pub fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Node that changes how the wrapped content is measured and placed.
///
/// Wrappers run in every frame phase, so geometry stays consistent between
/// layout, pointer handling and drawing.
pub trait LayoutWrapNode: ChainNode {
    fn wrap_layout(&self, inner: LayoutWidget) -> LayoutWidget;
}

/// Node that paints before or after the wrapped content.
pub trait DrawWrapNode: ChainNode {
    fn wrap_draw(&self, inner: LayoutWidget) -> LayoutWidget;
}

/// Node that declares a pointer area and consumes the events routed to it.
pub trait PointerWrapNode: ChainNode {
    fn wrap_pointer(&self, inner: LayoutWidget) -> LayoutWidget;
}

/// Node that publishes per-child data to the parent container.
pub trait ParentDataNode: ChainNode {
    /// Key under which the element is stored on the coordinator.
    fn parent_data_key(&self) -> &'static str;
}

/// Strongly typed modifier elements that can create and update nodes while
/// exposing equality, hash and inspector contracts.
pub trait ModifierNodeElement: fmt::Debug + Hash + PartialEq + 'static {
    type Node: ChainNode;

    /// Creates a new node instance for this element.
    fn create(&self) -> Self::Node;

    /// Brings an existing node up to date with the element's data.
    fn update(&self, node: &mut Self::Node);

    /// Optional key used to disambiguate multiple instances of the same element type.
    fn key(&self) -> Option<u64> {
        None
    }

    /// Human readable name surfaced to inspector tooling and `Modifier::partition`.
    fn inspector_name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Records inspector properties for tooling.
    fn inspector_properties(&self, _inspector: &mut dyn FnMut(&'static str, String)) {}

    /// Capabilities of nodes created by this element.
    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::default()
    }

    /// Whether `update` must run even when the element compares equal.
    ///
    /// Elements holding closures compare by pointer and still need the fresh
    /// closure copied into the reused node.
    fn always_update(&self) -> bool {
        false
    }
}

/// Type-erased modifier element used by the runtime to reconcile chains.
pub trait AnyModifierElement: fmt::Debug {
    fn node_type(&self) -> TypeId;

    fn element_type(&self) -> TypeId;

    fn create_node(&self) -> Box<dyn ChainNode>;

    fn update_node(&self, node: &mut dyn ChainNode);

    fn key(&self) -> Option<u64>;

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::default()
    }

    fn hash_code(&self) -> u64;

    fn equals_element(&self, other: &dyn AnyModifierElement) -> bool;

    fn inspector_name(&self) -> &'static str;

    fn record_inspector_properties(&self, visitor: &mut dyn FnMut(&'static str, String));

    fn requires_update(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    /// The wrapped element itself, for typed access through [`downcast_ref`].
    ///
    /// [`downcast_ref`]: trait.AnyModifierElement.html#method.downcast_ref
    fn element_any(&self) -> &dyn Any;
}

impl dyn AnyModifierElement {
    /// Returns the wrapped element when it has type `E`.
    pub fn downcast_ref<E: 'static>(&self) -> Option<&E> {
        self.element_any().downcast_ref::<E>()
    }

    /// Inspector properties as an ordered list.
    pub fn inspector_properties(&self) -> Vec<(&'static str, String)> {
        let mut properties = Vec::new();
        self.record_inspector_properties(&mut |name, value| properties.push((name, value)));
        properties
    }
}

struct TypedModifierElement<E: ModifierNodeElement> {
    element: E,
}

impl<E: ModifierNodeElement> TypedModifierElement<E> {
    fn new(element: E) -> Self {
        Self { element }
    }
}

impl<E> fmt::Debug for TypedModifierElement<E>
where
    E: ModifierNodeElement,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.element, f)
    }
}

impl<E> AnyModifierElement for TypedModifierElement<E>
where
    E: ModifierNodeElement,
{
    fn node_type(&self) -> TypeId {
        TypeId::of::<E::Node>()
    }

    fn element_type(&self) -> TypeId {
        TypeId::of::<E>()
    }

    fn create_node(&self) -> Box<dyn ChainNode> {
        Box::new(self.element.create())
    }

    fn update_node(&self, node: &mut dyn ChainNode) {
        let typed = node
            .as_any_mut()
            .downcast_mut::<E::Node>()
            .expect("modifier node type mismatch");
        self.element.update(typed);
    }

    fn key(&self) -> Option<u64> {
        self.element.key()
    }

    fn capabilities(&self) -> NodeCapabilities {
        self.element.capabilities()
    }

    fn hash_code(&self) -> u64 {
        let mut hasher = hash::default::new();
        self.element.hash(&mut hasher);
        hasher.finish()
    }

    fn equals_element(&self, other: &dyn AnyModifierElement) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .map(|typed| typed.element == self.element)
            .unwrap_or(false)
    }

    fn inspector_name(&self) -> &'static str {
        self.element.inspector_name()
    }

    fn record_inspector_properties(&self, visitor: &mut dyn FnMut(&'static str, String)) {
        self.element.inspector_properties(visitor);
    }

    fn requires_update(&self) -> bool {
        self.element.always_update()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn element_any(&self) -> &dyn Any {
        &self.element
    }
}

/// Wraps a typed element into the shared type-erased form.
pub fn modifier_element<E: ModifierNodeElement>(element: E) -> DynModifierElement {
    Rc::new(TypedModifierElement::new(element))
}

/// Shared type-erased modifier element.
pub type DynModifierElement = Rc<dyn AnyModifierElement>;

#[cfg(test)]
#[path = "tests/modifier_tests.rs"]
mod tests;
