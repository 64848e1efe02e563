use std::cell::Cell;
use std::hash::{Hash, Hasher};

use trellis_core::{Identifier, IdentityManager};
use trellis_foundation::{modifier_element, ChainNode, DrawWrapNode, ModifierNodeElement, NodeKind, TreeNode};
use trellis_ui_graphics::{Color, FlatOp, IntPoint, IntRect, Point};
use trellis_ui_layout::PointerQueue;

use super::*;
use crate::modifier::Modifier;
use crate::modifier_nodes::{WeightElement, LAYOUT_ID_KEY, MATCH_PARENT_SIZE_KEY, WEIGHT_KEY};

type Log = Rc<RefCell<Vec<String>>>;

#[derive(Debug)]
struct TraceNode {
    name: &'static str,
    log: Log,
}

impl ChainNode for TraceNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Draw
    }

    fn on_attach(&mut self, owner: &dyn TreeNode) {
        self.log
            .borrow_mut()
            .push(format!("attach {} to {}", self.name, owner.key()));
    }

    fn as_draw_wrap(&self) -> Option<&dyn DrawWrapNode> {
        Some(self)
    }
}

impl DrawWrapNode for TraceNode {
    fn wrap_draw(&self, inner: LayoutWidget) -> LayoutWidget {
        let name = self.name;
        let log = Rc::clone(&self.log);
        Rc::new(move |gtx: &mut LayoutContext| {
            log.borrow_mut().push(format!("enter {name}"));
            let dims = inner(gtx);
            log.borrow_mut().push(format!("leave {name}"));
            dims
        })
    }
}

#[derive(Debug, Clone)]
struct TraceElement {
    name: &'static str,
    log: Log,
}

impl PartialEq for TraceElement {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Hash for TraceElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl ModifierNodeElement for TraceElement {
    type Node = TraceNode;

    fn create(&self) -> TraceNode {
        self.log.borrow_mut().push(format!("create {}", self.name));
        TraceNode {
            name: self.name,
            log: Rc::clone(&self.log),
        }
    }

    fn update(&self, _node: &mut TraceNode) {}

    fn inspector_name(&self) -> &'static str {
        self.name
    }

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::DRAW
    }
}

/// Claims to wrap layout but its node exposes nothing.
#[derive(Debug, Clone, PartialEq, Hash)]
struct LyingElement;

#[derive(Debug)]
struct LyingNode;

impl ChainNode for LyingNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Layout
    }
}

impl ModifierNodeElement for LyingElement {
    type Node = LyingNode;

    fn create(&self) -> LyingNode {
        LyingNode
    }

    fn update(&self, _node: &mut LyingNode) {}

    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities::LAYOUT
    }
}

fn trace(name: &'static str, log: &Log) -> Modifier {
    Modifier::element(modifier_element(TraceElement {
        name,
        log: Rc::clone(log),
    }))
}

struct Tree {
    ids: IdentityManager,
}

impl Tree {
    fn new() -> Self {
        Self {
            ids: IdentityManager::new(),
        }
    }

    fn id(&mut self) -> Identifier {
        self.ids.generate()
    }

    /// Leaf drawing a red rect of `size`.
    fn leaf(&mut self, key: &str, size: IntPoint, modifier: Modifier) -> LayoutNode {
        let mut node = LayoutNode::new(self.id(), key);
        node.map_modifier(|_| modifier);
        node.set_widget_constructor(Rc::new(move |_scope: &NodeScope| -> LayoutWidget {
            Rc::new(move |gtx: &mut LayoutContext| {
                let size = gtx.constraints.constrain(size);
                gtx.ops.fill_rect(IntRect::from_size(size), Color::RED);
                Dimensions::new(size)
            })
        }));
        node
    }
}

fn context() -> LayoutContext {
    let mut gtx = LayoutContext::new(IntPoint::new(200, 200), 1.0);
    gtx.constraints = Constraints::loose(IntPoint::new(200, 200));
    gtx
}

fn coordinator(node: LayoutNode, store: &Rc<ChainStore>) -> NodeCoordinator {
    NodeCoordinator::new(Rc::new(node), NodePath::root(), Rc::clone(store))
}

#[test]
fn expansion_is_lazy_and_happens_once() {
    let log: Log = Rc::default();
    let mut tree = Tree::new();
    let node = tree.leaf("Leaf", IntPoint::new(5, 5), trace("a", &log));
    let store = Rc::new(ChainStore::new());
    let coordinator = coordinator(node, &store);

    assert!(!coordinator.is_expanded());
    assert!(log.borrow().is_empty());
    let mut gtx = context();
    coordinator.layout(&mut gtx);
    assert!(coordinator.is_expanded());
    coordinator.draw(&mut gtx);
    let creates = log.borrow().iter().filter(|line| line.starts_with("create")).count();
    assert_eq!(creates, 1);
}

#[test]
fn nodes_attach_tail_to_head_and_head_is_outermost() {
    let log: Log = Rc::default();
    let mut tree = Tree::new();
    let modifier = trace("outer", &log).then(trace("middle", &log)).then(trace("inner", &log));
    let node = tree.leaf("Leaf", IntPoint::new(5, 5), modifier);
    let store = Rc::new(ChainStore::new());
    let coordinator = coordinator(node, &store);

    coordinator.layout(&mut context());

    let log = log.borrow();
    let attaches: Vec<&str> = log
        .iter()
        .filter(|line| line.starts_with("attach"))
        .map(String::as_str)
        .collect();
    assert_eq!(
        attaches,
        vec![
            "attach inner to Leaf",
            "attach middle to Leaf",
            "attach outer to Leaf"
        ]
    );
    let calls: Vec<&str> = log
        .iter()
        .filter(|line| line.starts_with("enter") || line.starts_with("leave"))
        .map(String::as_str)
        .collect();
    assert_eq!(
        calls,
        vec![
            "enter outer",
            "enter middle",
            "enter inner",
            "leave inner",
            "leave middle",
            "leave outer"
        ]
    );
}

#[test]
fn modifier_order_decides_what_wraps_what() {
    let mut tree = Tree::new();
    let store = Rc::new(ChainStore::new());
    let padded_background = coordinator(
        tree.leaf(
            "A",
            IntPoint::new(10, 10),
            Modifier::empty().padding(5.0).background(Color::BLUE),
        ),
        &store,
    );
    let background_padded = coordinator(
        tree.leaf(
            "B",
            IntPoint::new(10, 10),
            Modifier::empty().background(Color::BLUE).padding(5.0),
        ),
        &store,
    );

    let mut gtx = context();
    padded_background.layout(&mut gtx);
    let inside = padded_background.draw(&mut gtx).flatten();
    background_padded.layout(&mut gtx);
    let outside = background_padded.draw(&mut gtx).flatten();

    assert_eq!(
        inside[0],
        FlatOp::Rect {
            rect: IntRect::new(IntPoint::new(5, 5), IntPoint::new(15, 15)),
            color: Color::BLUE
        }
    );
    assert_eq!(
        outside[0],
        FlatOp::Rect {
            rect: IntRect::from_size(IntPoint::new(20, 20)),
            color: Color::BLUE
        }
    );
}

#[test]
#[should_panic(expected = "declares")]
fn declared_capability_must_be_exposed() {
    let mut tree = Tree::new();
    let node = tree.leaf(
        "Leaf",
        IntPoint::new(1, 1),
        Modifier::element(modifier_element(LyingElement)),
    );
    let store = Rc::new(ChainStore::new());
    coordinator(node, &store).layout(&mut context());
}

#[test]
fn parent_data_is_published_by_key() {
    let mut tree = Tree::new();
    let node = tree.leaf(
        "Leaf",
        IntPoint::new(1, 1),
        Modifier::empty().weight_with_fill(2.0, false).layout_id("body"),
    );
    let store = Rc::new(ChainStore::new());
    let coordinator = coordinator(node, &store);

    let weight = coordinator.parent_data::<WeightElement>(WEIGHT_KEY);
    assert_eq!(weight, Some(WeightElement::new(2.0, false)));
    assert_eq!(coordinator.parent_data_keys(), vec![LAYOUT_ID_KEY, WEIGHT_KEY]);
    assert!(coordinator.parent_data::<WeightElement>(LAYOUT_ID_KEY).is_none());
    assert!(coordinator
        .parent_data::<WeightElement>(MATCH_PARENT_SIZE_KEY)
        .is_none());
}

#[test]
fn child_layout_is_cached_per_constraints() {
    let mut tree = Tree::new();
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let mut node = LayoutNode::new(tree.id(), "Counting");
    node.set_widget_constructor(Rc::new(move |_scope: &NodeScope| -> LayoutWidget {
        let counter = Rc::clone(&counter);
        Rc::new(move |gtx: &mut LayoutContext| {
            counter.set(counter.get() + 1);
            Dimensions::new(gtx.constraints.constrain(IntPoint::new(4, 4)))
        })
    }));
    let store = Rc::new(ChainStore::new());
    let coordinator = coordinator(node, &store);
    let mut gtx = context();

    let loose = Constraints::loose(IntPoint::new(50, 50));
    coordinator.measure(&mut gtx, loose);
    coordinator.measure(&mut gtx, loose);
    assert_eq!(runs.get(), 1);

    let (dims, _) = coordinator.measure(&mut gtx, Constraints::tight(IntPoint::new(9, 9)));
    assert_eq!(dims.size, IntPoint::new(9, 9));
    assert_eq!(runs.get(), 2);

    coordinator.node().clear_layout_results();
    coordinator.measure(&mut gtx, Constraints::tight(IntPoint::new(9, 9)));
    assert_eq!(runs.get(), 3);
}

#[test]
fn nodes_without_widget_stack_their_children() {
    let mut tree = Tree::new();
    let mut parent = LayoutNode::new(tree.id(), "Parent");
    parent.push_child(tree.leaf("A", IntPoint::new(10, 30), Modifier::empty()));
    parent.push_child(tree.leaf("B", IntPoint::new(20, 5), Modifier::empty()));
    let store = Rc::new(ChainStore::new());
    let coordinator = coordinator(parent, &store);

    let dims = coordinator.layout(&mut context());
    assert_eq!(dims.size, IntPoint::new(20, 30));
    assert_eq!(coordinator.children().len(), 2);
    assert_eq!(coordinator.children()[1].path().len(), 1);
}

#[test]
fn partitioned_clickable_sits_inside_the_outer_modifiers() {
    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    let user = Modifier::empty()
        .padding(10.0)
        .clickable(move |_: Point| counter.set(counter.get() + 1))
        .size(40.0, 40.0);
    let (outer, inner) = user.partition("clickable");
    let modifier = outer.then(inner);

    let mut tree = Tree::new();
    let node = tree.leaf("Target", IntPoint::new(1, 1), modifier);
    let store = Rc::new(ChainStore::new());
    let coordinator = coordinator(node, &store);

    let queue = Rc::new(PointerQueue::new());
    let mut gtx = context().with_input(queue.clone());
    let (_, layout) = gtx.record(|gtx| coordinator.layout(gtx));

    let areas: Vec<IntRect> = layout
        .flatten()
        .into_iter()
        .filter_map(|op| match op {
            FlatOp::PointerArea { rect, .. } => Some(rect),
            _ => None,
        })
        .collect();
    assert_eq!(areas, vec![IntRect::new(IntPoint::new(10, 10), IntPoint::new(50, 50))]);

    queue.click(Point::new(5.0, 5.0));
    queue.route(&layout);
    coordinator.pointer_phase(&mut gtx);
    assert_eq!(clicks.get(), 0, "padding is outside the click area");

    queue.click(Point::new(30.0, 30.0));
    queue.route(&layout);
    coordinator.pointer_phase(&mut gtx);
    assert_eq!(clicks.get(), 1);
}

#[test]
fn chain_nodes_survive_between_coordinators() {
    let log: Log = Rc::default();
    let mut tree = Tree::new();
    let node = Rc::new(tree.leaf("Leaf", IntPoint::new(5, 5), trace("kept", &log)));
    let store = Rc::new(ChainStore::new());

    for _ in 0..3 {
        node.clear_layout_results();
        let coordinator = NodeCoordinator::new(Rc::clone(&node), NodePath::root(), Rc::clone(&store));
        coordinator.layout(&mut context());
        store.sweep();
    }

    let creates = log.borrow().iter().filter(|line| line.starts_with("create")).count();
    assert_eq!(creates, 1);
    assert_eq!(store.len(), 1);
    assert!(store.contains(&NodePath::root().with(node.id()).qualified()));
}

#[test]
fn sweep_releases_untouched_chains() {
    let log: Log = Rc::default();
    let mut tree = Tree::new();
    let node = tree.leaf("Leaf", IntPoint::new(5, 5), trace("gone", &log));
    let store = Rc::new(ChainStore::new());
    coordinator(node, &store).layout(&mut context());
    assert_eq!(store.sweep(), 0);
    assert_eq!(store.len(), 1);

    assert_eq!(store.sweep(), 1);
    assert!(store.is_empty());
}
