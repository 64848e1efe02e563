use std::cell::RefCell;

use trellis_core::{with_frame, Identifier, IdentityManager, PersistentState};

use super::*;

fn pass<R>(
    state: &mut PersistentState,
    ids: &mut IdentityManager,
    body: impl FnOnce(&mut Composer<'_>) -> R,
) -> R {
    with_frame(state, |state| {
        let mut composer = Composer::new(state, ids);
        composer.start_block("root");
        let result = body(&mut composer);
        composer.end_block();
        composer.build();
        result
    })
}

fn leaf(c: &mut Composer<'_>, key: &str) -> Identifier {
    c.start_block(key);
    let id = c.get_id();
    c.end_block();
    id
}

#[test]
fn branches_keep_state_apart() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let seen = RefCell::new(Vec::new());

    for condition in [false, true] {
        pass(&mut state, &mut ids, |c| {
            c.if_else(
                condition,
                |c| {
                    let value = c.must_state("s", || 7);
                    seen.borrow_mut().push(value.get().to_string());
                },
                |c| {
                    let value = c.must_state("s", || String::from("hi"));
                    seen.borrow_mut().push(value.get());
                },
            );
        });
    }

    assert_eq!(*seen.borrow(), vec!["hi", "7"]);
    assert!(
        !state.keys().iter().any(|key| key.contains(IF_FALSE)),
        "the false branch state is forgotten once it is not composed"
    );
    assert!(state.keys().iter().any(|key| key.contains(IF_TRUE)));
}

#[test]
fn branch_identifiers_are_disjoint() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let in_true = pass(&mut state, &mut ids, |c| {
        let mut id = Identifier::EMPTY;
        c.if_else(true, |c| id = leaf(c, "x"), |_| {});
        id
    });
    let in_false = pass(&mut state, &mut ids, |c| {
        let mut id = Identifier::EMPTY;
        c.if_else(false, |_| {}, |c| id = leaf(c, "x"));
        id
    });
    assert_ne!(in_true, in_false);
    assert_eq!(in_true.value(), in_false.value(), "same position, different scope");
}

#[test]
fn only_the_chosen_branch_runs() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let ran = RefCell::new(Vec::new());
    pass(&mut state, &mut ids, |c| {
        c.when(true, |_| ran.borrow_mut().push("when"))
            .when(false, |_| ran.borrow_mut().push("when-false"))
            .otherwise(false, |_| ran.borrow_mut().push("otherwise"))
            .otherwise(true, |_| ran.borrow_mut().push("otherwise-true"));
    });
    assert_eq!(*ran.borrow(), vec!["when", "otherwise"]);
}

#[test]
fn range_scopes_each_iteration() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let prefixes = RefCell::new(Vec::new());
    pass(&mut state, &mut ids, |c| {
        c.range(3, |c, index| {
            prefixes.borrow_mut().push(c.current_prefix());
            c.must_state("item", move || index);
        });
    });
    assert_eq!(*prefixes.borrow(), vec!["_i_0", "_i_1", "_i_2"]);
    assert_eq!(state.keys().iter().filter(|key| key.ends_with("|item")).count(), 3);
}

#[test]
fn keyed_state_follows_the_key_not_the_position() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let values = RefCell::new(Vec::new());

    let compose = |state: &mut PersistentState, ids: &mut IdentityManager, order: &[&str]| {
        pass(state, ids, |c| {
            for name in order {
                c.key(name, |c| {
                    let value = c.must_state("v", || name.to_string());
                    values.borrow_mut().push(value.get());
                });
            }
        });
    };

    compose(&mut state, &mut ids, &["a", "b"]);
    compose(&mut state, &mut ids, &["b", "a"]);
    assert_eq!(*values.borrow(), vec!["a", "b", "b", "a"]);
}

#[test]
fn prefixes_nest_with_slashes() {
    let mut state = PersistentState::new();
    let mut ids = IdentityManager::new();
    let prefix = pass(&mut state, &mut ids, |c| {
        let mut prefix = String::new();
        c.key("outer", |c| {
            c.when(true, |c| prefix = c.current_prefix());
        });
        prefix
    });
    assert_eq!(prefix, "_key_outer/_if_true");
}
