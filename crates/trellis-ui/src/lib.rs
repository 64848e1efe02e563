//! Composer, modifiers, coordinators and built-in widgets for Trellis.

mod composer;
mod composition;
mod control_flow;
mod coordinator;
mod debug;
mod locals;
pub mod modifier;
mod modifier_nodes;
mod node;
mod runtime;
pub mod theme;
pub mod widgets;
mod zipper;

pub use composer::{Composable, Composer, HandlerCell};
pub use composition::{Composition, FrameConfig, ROOT_KEY};
pub use control_flow::{IF_FALSE, IF_TRUE};
pub use coordinator::{ChainStore, NodeCoordinator};
pub use locals::{
    composition_local_of, composition_local_provider, static_composition_local_of,
    CompositionLocal, LocalKey, ProvidedValue, StaticCompositionLocal,
};
pub use modifier::{InspectorInfo, InspectorProperty, Modifier};
pub use modifier_nodes::{
    AlphaElement, AlphaNode, BackgroundElement, BackgroundNode, ClickableElement, ClickableNode,
    ClipToBoundsElement, ClipToBoundsNode, LayoutIdElement, MatchParentSizeElement, OffsetElement,
    OffsetNode, PaddingElement, PaddingNode, ParentDataMarker, PointerInputElement,
    PointerInputNode, SizeElement, SizeNode, WeightElement, LAYOUT_ID_KEY,
    MATCH_PARENT_SIZE_KEY, WEIGHT_KEY,
};
pub use node::{LayoutNode, LayoutResult, NodeScope, WidgetConstructor};
pub use runtime::{Frame, Runtime};
pub use theme::{
    ColorDescriptor, ColorScheme, ProvideTheme, Theme, ThemeError, LOCAL_CONTENT_COLOR,
    LOCAL_THEME,
};
pub use widgets::*;
pub use zipper::Zipper;

// Debug utilities
pub use debug::{count_nodes, drawn_texts, format_layout_tree, format_ops, log_layout_tree, log_ops};

pub use trellis_animation::{AnimationSpec, Easing};
pub use trellis_ui_graphics::{Color, Dp, IntPoint, Point, Sp};
pub use trellis_ui_layout::{
    Alignment, HorizontalAlignment, LayoutContext, LinearArrangement, PointerQueue,
    VerticalAlignment,
};

pub mod prelude {
    pub use crate::composer::Composer;
    pub use crate::composition::{Composition, FrameConfig};
    pub use crate::modifier::Modifier;
    pub use crate::theme::{ColorDescriptor, Theme};
    pub use crate::widgets::*;
    pub use trellis_ui_graphics::prelude::*;
    pub use trellis_ui_layout::prelude::*;
}
