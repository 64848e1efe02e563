//! Foundation contracts for modifier elements and the nodes they create.

pub mod chain;
pub mod modifier;

pub use chain::*;
pub use modifier::*;

pub mod prelude {
    pub use crate::chain::{ChainUpdate, ModifierNodeChain, SharedChainNode};
    pub use crate::modifier::{
        modifier_element, AnyModifierElement, ChainNode, DrawWrapNode, DynModifierElement,
        LayoutWidget, LayoutWrapNode, ModifierNodeElement, NodeCapabilities, NodeKind,
        ParentDataNode, PointerWrapNode, TreeNode,
    };
}
