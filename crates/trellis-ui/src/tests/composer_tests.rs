use std::cell::Cell;

use trellis_core::with_frame;

use super::*;

/// Runs `body` in a framed pass and returns the built root.
fn pass(
    state: &mut PersistentState,
    ids: &mut IdentityManager,
    body: impl FnOnce(&mut Composer<'_>),
) -> Rc<LayoutNode> {
    with_frame(state, |state| {
        let mut composer = Composer::new(state, ids);
        body(&mut composer);
        composer.build()
    })
}

fn ids_of(node: &LayoutNode, out: &mut Vec<Identifier>) {
    out.push(node.id());
    for child in node.children() {
        ids_of(child, out);
    }
}

fn shape(node: &LayoutNode) -> String {
    if node.children().is_empty() {
        return node.key().to_owned();
    }
    let children: Vec<String> = node.children().iter().map(|child| shape(child)).collect();
    format!("{}[{}]", node.key(), children.join(", "))
}

#[test]
fn blocks_build_a_tree_with_ascending_ids() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let root = pass(&mut state, &mut ids, |c| {
        c.start_block("A");
        c.start_block("B");
        c.end_block();
        c.start_block("C");
        c.end_block();
        c.end_block();
    });

    assert_eq!(shape(&root), "A[B, C]");
    let mut order = Vec::new();
    ids_of(&root, &mut order);
    assert_eq!(order.len(), 3);
    assert!(order.windows(2).all(|pair| pair[0].value() < pair[1].value()));
}

#[test]
fn build_closes_unbalanced_blocks() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let root = pass(&mut state, &mut ids, |c| {
        c.start_block("A");
        c.start_block("B");
        assert_eq!(c.depth(), 2);
    });
    assert_eq!(shape(&root), "A[B]");
}

#[test]
fn build_without_blocks_yields_an_empty_node() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let root = pass(&mut state, &mut ids, |_| {});
    assert!(root.id().is_empty());
    assert!(root.is_empty());
}

#[test]
#[should_panic(expected = "without a matching start_block")]
fn end_block_without_start_panics() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    pass(&mut state, &mut ids, |c| {
        c.end_block();
    });
}

#[test]
fn identifiers_are_stable_across_passes() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let content = |c: &mut Composer<'_>| {
        c.start_block("root");
        for key in ["a", "b", "c"] {
            c.start_block(key);
            c.start_block("leaf");
            c.end_block();
            c.end_block();
        }
        c.end_block();
    };

    let mut first = Vec::new();
    ids_of(&pass(&mut state, &mut ids, content), &mut first);
    let mut second = Vec::new();
    ids_of(&pass(&mut state, &mut ids, content), &mut second);
    assert_eq!(first, second);
}

#[test]
fn get_id_and_get_path_follow_the_focus() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    pass(&mut state, &mut ids, |c| {
        assert!(c.get_id().is_empty());
        c.start_block("A");
        let a = c.get_id();
        assert!(c.get_path().is_empty());
        c.start_block("B");
        let b = c.get_id();
        assert_ne!(a, b);
        assert_eq!(c.get_path().iter().collect::<Vec<_>>(), vec![a]);
        c.end_block();
        assert_eq!(c.get_id(), a);
        c.end_block();
    });
}

#[test]
fn modifier_slots_and_widget_land_on_the_focus() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let root = pass(&mut state, &mut ids, |c| {
        c.start_block("A");
        c.modifier(|m| m.padding(4.0));
        c.modifier(|m| m.size(10.0, 10.0));
        c.emit_slot("label", String::from("x"));
        c.set_widget_constructor(Rc::new(|scope: &crate::node::NodeScope| {
            crate::widgets::stack::stack_widget(scope.children().to_vec())
        }));
        c.end_block();
    });
    assert_eq!(root.modifier().len(), 2);
    assert_eq!(root.slot::<String>("label").map(String::as_str), Some("x"));
    assert!(root.has_widget());
}

#[test]
#[should_panic(expected = "emit_slot called outside of a block")]
fn emit_slot_outside_a_block_panics() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    pass(&mut state, &mut ids, |c| {
        c.emit_slot("x", 1u8);
    });
}

#[test]
fn with_composable_and_sequence_apply_in_order() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let root = pass(&mut state, &mut ids, |c| {
        c.start_block("root");
        let leaf = |key: &'static str| -> Composable<'static> {
            Box::new(move |c: &mut Composer<'_>| {
                c.start_block(key);
                c.end_block();
            })
        };
        c.sequence(vec![leaf("a"), leaf("b")])
            .with_composable(|c| {
                c.start_block("c");
                c.end_block();
            });
        c.end_block();
    });
    assert_eq!(shape(&root), "root[a, b, c]");
}

#[test]
fn remember_runs_once_per_pass() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let calls = Cell::new(0);
    let body = |c: &mut Composer<'_>| {
        c.start_block("A");
        let first = c.remember("memo", || {
            calls.set(calls.get() + 1);
            41
        });
        let second = c.remember("memo", || {
            calls.set(calls.get() + 1);
            0
        });
        assert_eq!((first, second), (41, 41));
        c.end_block();
    };
    pass(&mut state, &mut ids, body);
    assert_eq!(calls.get(), 1);
    pass(&mut state, &mut ids, body);
    assert_eq!(calls.get(), 2, "memo is discarded by build");
}

#[test]
fn try_remember_reports_type_mismatch() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    pass(&mut state, &mut ids, |c| {
        c.start_block("A");
        c.remember("memo", || 1u32);
        let err = c.try_remember("memo", || String::new()).unwrap_err();
        assert!(matches!(err, StateError::TypeMismatch { found: "u32", .. }));
        c.end_block();
    });
}

#[test]
fn state_survives_passes_and_init_runs_once() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let inits = Cell::new(0);
    let body = |c: &mut Composer<'_>| {
        c.start_block("counter");
        let count = c
            .state("count", || {
                inits.set(inits.get() + 1);
                0
            })
            .unwrap();
        count.update(|n| n + 1);
        c.end_block();
    };

    for _ in 0..3 {
        pass(&mut state, &mut ids, body);
    }
    assert_eq!(inits.get(), 1);

    let value = Cell::new(0);
    pass(&mut state, &mut ids, |c| {
        c.start_block("counter");
        value.set(c.must_state("count", || -1).get());
        c.end_block();
    });
    assert_eq!(value.get(), 3);
}

#[test]
fn state_dropped_for_a_frame_is_reinitialized() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let read = |state: &mut PersistentState, ids: &mut IdentityManager| {
        let seen = Cell::new(0);
        pass(state, ids, |c| {
            c.start_block("A");
            let value = c.must_state("v", || 10);
            seen.set(value.get());
            value.set(20);
            c.end_block();
        });
        seen.get()
    };

    assert_eq!(read(&mut state, &mut ids), 10);
    assert_eq!(read(&mut state, &mut ids), 20);
    pass(&mut state, &mut ids, |c| {
        c.start_block("A");
        c.end_block();
    });
    assert_eq!(read(&mut state, &mut ids), 10);
}

#[test]
fn state_keys_are_qualified_by_prefix_and_path() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    pass(&mut state, &mut ids, |c| {
        c.start_block("A");
        let plain = c.qualified_key("k");
        let scoped = c.key_prefix("scope", |c| c.qualified_key("k"));
        assert_ne!(plain, scoped);
        assert!(scoped.starts_with("scope|"));
        assert!(plain.ends_with("|k"));

        c.start_block("B");
        let nested = c.qualified_key("k");
        assert_ne!(plain, nested);
        c.end_block();
        c.end_block();
    });
}

#[test]
fn key_prefix_restores_after_body() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    pass(&mut state, &mut ids, |c| {
        assert_eq!(c.current_prefix(), "");
        let inner = c.key_prefix("a", |c| c.key_prefix("b", |c| c.current_prefix()));
        assert_eq!(inner, "a/b");
        assert_eq!(c.current_prefix(), "");
    });
}

#[test]
fn handler_cell_is_retained_and_repointed() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let hits = Rc::new(Cell::new(0));
    let mut entries = Vec::new();

    for step in 1..=2 {
        let hits = Rc::clone(&hits);
        let entry = with_frame(&mut state, |state| {
            let mut c = Composer::new(state, &mut ids);
            c.start_block("Button");
            let cell = c.handler("on_click", move |amount: i32| hits.set(hits.get() + amount * step));
            c.end_block();
            c.build();
            cell.entry()
        });
        entries.push(entry);
    }

    assert!(Rc::ptr_eq(&entries[0], &entries[1]));
    (entries[0])(1);
    assert_eq!(hits.get(), 2, "the latest closure runs");
}

#[test]
fn frame_requests_are_recorded() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    with_frame(&mut state, |state| {
        let mut c = Composer::new(state, &mut ids);
        assert!(!c.frame_requested());
        c.request_frame();
        assert!(c.frame_requested());
    });
}

#[test]
fn frame_time_is_injectable() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let now = Instant::now();
    with_frame(&mut state, |state| {
        let c = Composer::new(state, &mut ids).with_frame_time(now);
        assert_eq!(c.frame_time(), now);
        assert!(c.store().in_frame());
    });
}
