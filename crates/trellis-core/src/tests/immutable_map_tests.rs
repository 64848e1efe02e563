use super::*;

#[test]
fn assoc_leaves_receiver_unchanged() {
    let empty: ImmutableMap<i32> = ImmutableMap::new();
    let one = empty.assoc("a", 1);
    let two = one.assoc("b", 2);

    assert!(empty.is_empty());
    assert_eq!(one.len(), 1);
    assert_eq!(one.find("b"), None);
    assert_eq!(two.find("a"), Some(&1));
    assert_eq!(two.find("b"), Some(&2));
}

#[test]
fn assoc_overwrites_in_the_new_map_only() {
    let base = ImmutableMap::new().assoc("k", "old");
    let next = base.assoc("k", "new");
    assert_eq!(base.find("k"), Some(&"old"));
    assert_eq!(next.find("k"), Some(&"new"));
}

#[test]
fn clones_share_until_written() {
    let base = ImmutableMap::new().assoc("k", 1);
    let copy = base.clone();
    assert!(base.ptr_eq(&copy));
    let written = copy.assoc("j", 2);
    assert!(!base.ptr_eq(&written));
}

#[test]
fn dissoc_removes_and_shares_when_absent() {
    let map = ImmutableMap::new().assoc("a", 1).assoc("b", 2);
    let without = map.dissoc("a");
    assert!(map.contains("a"));
    assert!(!without.contains("a"));
    assert!(map.dissoc("zzz").ptr_eq(&map));
}

#[test]
fn iter_visits_every_entry() {
    let map: ImmutableMap<u8> = [("x".to_string(), 1), ("y".to_string(), 2)]
        .into_iter()
        .collect();
    let mut keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["x", "y"]);
}
