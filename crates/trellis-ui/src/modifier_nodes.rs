//! Elements and chain nodes behind the built-in modifiers.
//!
//! Every wrap closure snapshots the node's configuration by value. Nodes are
//! updated between frames and coordinators rebuild their chains every
//! frame, so a snapshot never outlives the data it was taken from.

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use trellis_foundation::{
    ChainNode, DrawWrapNode, LayoutWidget, LayoutWrapNode, ModifierNodeElement, NodeCapabilities,
    NodeKind, ParentDataNode, PointerWrapNode,
};
use trellis_ui_graphics::{Color, Dp, EdgeInsets, IntPoint, IntRect, Point, Tag};
use trellis_ui_layout::{Dimensions, FramePhase, LayoutContext, PointerEvent, PointerKind};

fn hash_f32<H: Hasher>(value: f32, state: &mut H) {
    value.to_bits().hash(state);
}

// ============================================================================
// Size
// ============================================================================

/// Fixed preferred size on one or both axes, coerced into the incoming
/// constraints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeElement {
    width: Option<Dp>,
    height: Option<Dp>,
}

impl SizeElement {
    pub fn new(width: Option<f32>, height: Option<f32>) -> Self {
        Self {
            width: width.map(Dp),
            height: height.map(Dp),
        }
    }
}

impl Hash for SizeElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.map(|dp| dp.0.to_bits()).hash(state);
        self.height.map(|dp| dp.0.to_bits()).hash(state);
    }
}

impl ModifierNodeElement for SizeElement {
    type Node = SizeNode;

    fn create(&self) -> SizeNode {
        SizeNode {
            width: self.width,
            height: self.height,
        }
    }

    fn update(&self, node: &mut SizeNode) {
        node.width = self.width;
        node.height = self.height;
    }

    fn inspector_name(&self) -> &'static str {
        "size"
    }

    fn inspector_properties(&self, inspector: &mut dyn FnMut(&'static str, String)) {
        if let Some(width) = self.width {
            inspector("width", width.0.to_string());
        }
        if let Some(height) = self.height {
            inspector("height", height.0.to_string());
        }
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::LAYOUT
    }
}

#[derive(Debug)]
pub struct SizeNode {
    width: Option<Dp>,
    height: Option<Dp>,
}

impl ChainNode for SizeNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Layout
    }

    fn as_layout_wrap(&self) -> Option<&dyn LayoutWrapNode> {
        Some(self)
    }
}

impl LayoutWrapNode for SizeNode {
    fn wrap_layout(&self, inner: LayoutWidget) -> LayoutWidget {
        let (width, height) = (self.width, self.height);
        Rc::new(move |gtx: &mut LayoutContext| {
            let mut constraints = gtx.constraints;
            if let Some(width) = width {
                constraints = constraints.tighten_width(gtx.dp(width));
            }
            if let Some(height) = height {
                constraints = constraints.tighten_height(gtx.dp(height));
            }
            let dims = gtx.with_constraints(constraints, |gtx| inner(gtx));
            Dimensions {
                size: constraints.constrain(dims.size),
                ..dims
            }
        })
    }
}

// ============================================================================
// Padding
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaddingElement {
    padding: EdgeInsets,
}

impl PaddingElement {
    pub fn new(padding: EdgeInsets) -> Self {
        Self { padding }
    }
}

impl Hash for PaddingElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.padding.left, state);
        hash_f32(self.padding.top, state);
        hash_f32(self.padding.right, state);
        hash_f32(self.padding.bottom, state);
    }
}

impl ModifierNodeElement for PaddingElement {
    type Node = PaddingNode;

    fn create(&self) -> PaddingNode {
        PaddingNode {
            padding: self.padding,
        }
    }

    fn update(&self, node: &mut PaddingNode) {
        node.padding = self.padding;
    }

    fn inspector_name(&self) -> &'static str {
        "padding"
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::LAYOUT
    }
}

#[derive(Debug)]
pub struct PaddingNode {
    padding: EdgeInsets,
}

impl ChainNode for PaddingNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Layout
    }

    fn as_layout_wrap(&self) -> Option<&dyn LayoutWrapNode> {
        Some(self)
    }
}

impl LayoutWrapNode for PaddingNode {
    fn wrap_layout(&self, inner: LayoutWidget) -> LayoutWidget {
        let padding = self.padding;
        Rc::new(move |gtx: &mut LayoutContext| {
            let left = gtx.dp(Dp(padding.left));
            let top = gtx.dp(Dp(padding.top));
            let right = gtx.dp(Dp(padding.right));
            let bottom = gtx.dp(Dp(padding.bottom));
            let extra = IntPoint::new(left + right, top + bottom);
            let outer = gtx.constraints;

            gtx.ops.push_transform(IntPoint::new(left, top));
            let dims = gtx.with_constraints(outer.deflate(extra), |gtx| inner(gtx));
            gtx.ops.pop_transform();

            Dimensions {
                size: outer.constrain(dims.size + extra),
                baseline: dims.baseline + bottom,
            }
        })
    }
}

// ============================================================================
// Offset
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetElement {
    x: Dp,
    y: Dp,
}

impl OffsetElement {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x: Dp(x), y: Dp(y) }
    }
}

impl Hash for OffsetElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.x.0, state);
        hash_f32(self.y.0, state);
    }
}

impl ModifierNodeElement for OffsetElement {
    type Node = OffsetNode;

    fn create(&self) -> OffsetNode {
        OffsetNode {
            x: self.x,
            y: self.y,
        }
    }

    fn update(&self, node: &mut OffsetNode) {
        node.x = self.x;
        node.y = self.y;
    }

    fn inspector_name(&self) -> &'static str {
        "offset"
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::LAYOUT
    }
}

#[derive(Debug)]
pub struct OffsetNode {
    x: Dp,
    y: Dp,
}

impl ChainNode for OffsetNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Layout
    }

    fn as_layout_wrap(&self) -> Option<&dyn LayoutWrapNode> {
        Some(self)
    }
}

impl LayoutWrapNode for OffsetNode {
    fn wrap_layout(&self, inner: LayoutWidget) -> LayoutWidget {
        let (x, y) = (self.x, self.y);
        Rc::new(move |gtx: &mut LayoutContext| {
            let offset = IntPoint::new(gtx.dp(x), gtx.dp(y));
            gtx.ops.push_transform(offset);
            let dims = inner(gtx);
            gtx.ops.pop_transform();
            dims
        })
    }
}

// ============================================================================
// Background
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundElement {
    color: Color,
}

impl BackgroundElement {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Hash for BackgroundElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.color.0, state);
        hash_f32(self.color.1, state);
        hash_f32(self.color.2, state);
        hash_f32(self.color.3, state);
    }
}

impl ModifierNodeElement for BackgroundElement {
    type Node = BackgroundNode;

    fn create(&self) -> BackgroundNode {
        BackgroundNode { color: self.color }
    }

    fn update(&self, node: &mut BackgroundNode) {
        node.color = self.color;
    }

    fn inspector_name(&self) -> &'static str {
        "background"
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::DRAW
    }
}

#[derive(Debug)]
pub struct BackgroundNode {
    color: Color,
}

impl ChainNode for BackgroundNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Draw
    }

    fn as_draw_wrap(&self) -> Option<&dyn DrawWrapNode> {
        Some(self)
    }
}

impl DrawWrapNode for BackgroundNode {
    fn wrap_draw(&self, inner: LayoutWidget) -> LayoutWidget {
        let color = self.color;
        Rc::new(move |gtx: &mut LayoutContext| {
            let (dims, content) = gtx.record(|gtx| inner(gtx));
            gtx.ops.fill_rect(IntRect::from_size(dims.size), color);
            content.add(&mut gtx.ops);
            dims
        })
    }
}

// ============================================================================
// Alpha
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlphaElement {
    alpha: f32,
}

impl AlphaElement {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl Hash for AlphaElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.alpha, state);
    }
}

impl ModifierNodeElement for AlphaElement {
    type Node = AlphaNode;

    fn create(&self) -> AlphaNode {
        AlphaNode { alpha: self.alpha }
    }

    fn update(&self, node: &mut AlphaNode) {
        node.alpha = self.alpha;
    }

    fn inspector_name(&self) -> &'static str {
        "alpha"
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::DRAW
    }
}

#[derive(Debug)]
pub struct AlphaNode {
    alpha: f32,
}

impl ChainNode for AlphaNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Draw
    }

    fn as_draw_wrap(&self) -> Option<&dyn DrawWrapNode> {
        Some(self)
    }
}

impl DrawWrapNode for AlphaNode {
    fn wrap_draw(&self, inner: LayoutWidget) -> LayoutWidget {
        let alpha = self.alpha;
        Rc::new(move |gtx: &mut LayoutContext| {
            gtx.ops.push_opacity(alpha);
            let dims = inner(gtx);
            gtx.ops.pop_opacity();
            dims
        })
    }
}

// ============================================================================
// Clip to bounds
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ClipToBoundsElement;

impl ModifierNodeElement for ClipToBoundsElement {
    type Node = ClipToBoundsNode;

    fn create(&self) -> ClipToBoundsNode {
        ClipToBoundsNode
    }

    fn update(&self, _node: &mut ClipToBoundsNode) {}

    fn inspector_name(&self) -> &'static str {
        "clipToBounds"
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::DRAW
    }
}

#[derive(Debug)]
pub struct ClipToBoundsNode;

impl ChainNode for ClipToBoundsNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Draw
    }

    fn as_draw_wrap(&self) -> Option<&dyn DrawWrapNode> {
        Some(self)
    }
}

impl DrawWrapNode for ClipToBoundsNode {
    fn wrap_draw(&self, inner: LayoutWidget) -> LayoutWidget {
        Rc::new(move |gtx: &mut LayoutContext| {
            let (dims, content) = gtx.record(|gtx| inner(gtx));
            gtx.ops.push_clip(IntRect::from_size(dims.size));
            content.add(&mut gtx.ops);
            gtx.ops.pop_clip();
            dims
        })
    }
}

// ============================================================================
// Pointer input
// ============================================================================

/// Records a pointer area covering the wrapped content, then the content
/// itself so nested areas stay on top. In the pointer phase the events
/// routed to `tag` are handed to `handle`.
fn pointer_area(
    inner: LayoutWidget,
    tag: Tag,
    handle: impl Fn(PointerEvent) + 'static,
) -> LayoutWidget {
    Rc::new(move |gtx: &mut LayoutContext| {
        let (dims, content) = gtx.record(|gtx| inner(gtx));
        gtx.ops.pointer_area(IntRect::from_size(dims.size), tag);
        content.add(&mut gtx.ops);
        if gtx.phase == FramePhase::Pointer {
            for event in gtx.input.events(tag) {
                handle(event);
            }
        }
        dims
    })
}

pub struct ClickableElement {
    on_click: Rc<dyn Fn(Point)>,
}

impl ClickableElement {
    pub fn new(on_click: impl Fn(Point) + 'static) -> Self {
        Self {
            on_click: Rc::new(on_click),
        }
    }

    pub fn with_handler(on_click: Rc<dyn Fn(Point)>) -> Self {
        Self { on_click }
    }
}

impl std::fmt::Debug for ClickableElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickableElement").finish()
    }
}

impl PartialEq for ClickableElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.on_click, &other.on_click)
    }
}

impl Hash for ClickableElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let ptr = Rc::as_ptr(&self.on_click) as *const ();
        (ptr as usize).hash(state);
    }
}

impl ModifierNodeElement for ClickableElement {
    type Node = ClickableNode;

    fn create(&self) -> ClickableNode {
        ClickableNode {
            on_click: self.on_click.clone(),
            tag: Tag::next(),
        }
    }

    fn update(&self, node: &mut ClickableNode) {
        node.on_click = self.on_click.clone();
    }

    fn inspector_name(&self) -> &'static str {
        "clickable"
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::POINTER_INPUT
    }

    fn always_update(&self) -> bool {
        true
    }
}

/// Fires its handler when a press is released inside the node's area.
pub struct ClickableNode {
    on_click: Rc<dyn Fn(Point)>,
    tag: Tag,
}

impl ClickableNode {
    pub fn tag(&self) -> Tag {
        self.tag
    }
}

impl ChainNode for ClickableNode {
    fn kind(&self) -> NodeKind {
        NodeKind::PointerInput
    }

    fn as_pointer_wrap(&self) -> Option<&dyn PointerWrapNode> {
        Some(self)
    }
}

impl PointerWrapNode for ClickableNode {
    fn wrap_pointer(&self, inner: LayoutWidget) -> LayoutWidget {
        let on_click = self.on_click.clone();
        pointer_area(inner, self.tag, move |event| {
            if event.kind == PointerKind::Release {
                log::trace!("click at {:?}", event.position);
                on_click(event.position);
            }
        })
    }
}

pub struct PointerInputElement {
    handler: Rc<dyn Fn(PointerEvent)>,
}

impl PointerInputElement {
    pub fn new(handler: impl Fn(PointerEvent) + 'static) -> Self {
        Self {
            handler: Rc::new(handler),
        }
    }
}

impl std::fmt::Debug for PointerInputElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerInputElement").finish()
    }
}

impl PartialEq for PointerInputElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.handler, &other.handler)
    }
}

impl Hash for PointerInputElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let ptr = Rc::as_ptr(&self.handler) as *const ();
        (ptr as usize).hash(state);
    }
}

impl ModifierNodeElement for PointerInputElement {
    type Node = PointerInputNode;

    fn create(&self) -> PointerInputNode {
        PointerInputNode {
            handler: self.handler.clone(),
            tag: Tag::next(),
        }
    }

    fn update(&self, node: &mut PointerInputNode) {
        node.handler = self.handler.clone();
    }

    fn inspector_name(&self) -> &'static str {
        "pointerInput"
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::POINTER_INPUT
    }

    fn always_update(&self) -> bool {
        true
    }
}

/// Hands every routed event to a user handler.
pub struct PointerInputNode {
    handler: Rc<dyn Fn(PointerEvent)>,
    tag: Tag,
}

impl ChainNode for PointerInputNode {
    fn kind(&self) -> NodeKind {
        NodeKind::PointerInput
    }

    fn as_pointer_wrap(&self) -> Option<&dyn PointerWrapNode> {
        Some(self)
    }
}

impl PointerWrapNode for PointerInputNode {
    fn wrap_pointer(&self, inner: LayoutWidget) -> LayoutWidget {
        let handler = self.handler.clone();
        pointer_area(inner, self.tag, move |event| handler(event))
    }
}

// ============================================================================
// Parent data
// ============================================================================

pub const WEIGHT_KEY: &str = "weight";
pub const MATCH_PARENT_SIZE_KEY: &str = "match_parent_size";
pub const LAYOUT_ID_KEY: &str = "layout_id";

/// Share of the remaining main-axis space a `Row`/`Column` child receives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightElement {
    pub weight: f32,
    /// Whether the child must fill its share rather than wrap its content.
    pub fill: bool,
}

impl WeightElement {
    pub fn new(weight: f32, fill: bool) -> Self {
        assert!(weight > 0.0, "weight must be positive, got {weight}");
        Self { weight, fill }
    }
}

impl Hash for WeightElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.weight, state);
        self.fill.hash(state);
    }
}

impl ModifierNodeElement for WeightElement {
    type Node = ParentDataMarker;

    fn create(&self) -> ParentDataMarker {
        ParentDataMarker { key: WEIGHT_KEY }
    }

    fn update(&self, _node: &mut ParentDataMarker) {}

    fn inspector_name(&self) -> &'static str {
        "weight"
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::PARENT_DATA
    }
}

/// Asks a `Stack` to size the child to the stack after the other children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct MatchParentSizeElement;

impl ModifierNodeElement for MatchParentSizeElement {
    type Node = ParentDataMarker;

    fn create(&self) -> ParentDataMarker {
        ParentDataMarker {
            key: MATCH_PARENT_SIZE_KEY,
        }
    }

    fn update(&self, _node: &mut ParentDataMarker) {}

    fn inspector_name(&self) -> &'static str {
        "matchParentSize"
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::PARENT_DATA
    }
}

/// Tags a child so a custom layout can find it by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayoutIdElement {
    pub id: String,
}

impl ModifierNodeElement for LayoutIdElement {
    type Node = ParentDataMarker;

    fn create(&self) -> ParentDataMarker {
        ParentDataMarker { key: LAYOUT_ID_KEY }
    }

    fn update(&self, _node: &mut ParentDataMarker) {}

    fn inspector_name(&self) -> &'static str {
        "layoutId"
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::PARENT_DATA
    }
}

/// Stateless node publishing its element under a parent-data key; the
/// element itself carries the data.
#[derive(Debug)]
pub struct ParentDataMarker {
    key: &'static str,
}

impl ChainNode for ParentDataMarker {
    fn kind(&self) -> NodeKind {
        NodeKind::ParentData
    }

    fn as_parent_data(&self) -> Option<&dyn ParentDataNode> {
        Some(self)
    }
}

impl ParentDataNode for ParentDataMarker {
    fn parent_data_key(&self) -> &'static str {
        self.key
    }
}

#[cfg(test)]
#[path = "tests/modifier_nodes_tests.rs"]
mod tests;
