//! Compound operations racing on one shared map.

use std::{collections::HashSet, thread};

use navmap::{NavMap, Navigable};

const ROUNDS: usize = 500;

#[test]
fn test_default_accessor_never_sees_half_a_rename() {
    let map = NavMap::of("a", 1);

    thread::scope(|s| {
        let renamer = map.clone();
        s.spawn(move || {
            for _ in 0..ROUNDS {
                renamer.rename_key("a", "b").rename_key("b", "a");
            }
        });

        for _ in 0..ROUNDS {
            // the check and the read run under the same guard as the rename,
            // so the value is never found missing halfway through
            let a = map.int_or("a", -1).unwrap();
            let b = map.int_or("b", -1).unwrap();
            assert!(a == 1 || a == -1);
            assert!(b == 1 || b == -1);
        }
    });

    assert_eq!(map.len(), 1);
    assert!(map.valued("a"));
}

#[test]
fn test_concurrent_bulk_adds_all_land() {
    let map = NavMap::new();

    thread::scope(|s| {
        for worker in 0..4 {
            let map = map.clone();
            s.spawn(move || {
                for i in 0..ROUNDS / 4 {
                    let source = NavMap::of(&format!("w{worker}_{i}"), i as i64);
                    map.add_all([source]);
                }
            });
        }
    });

    assert_eq!(map.len(), ROUNDS);
}

#[test]
fn test_concurrent_deletes_and_defaults() {
    let map = NavMap::new();
    for i in 0..ROUNDS {
        map.add(&format!("k{i}"), i as i64);
    }

    thread::scope(|s| {
        let deleter = map.clone();
        s.spawn(move || {
            for i in 0..ROUNDS {
                deleter.del([format!("k{i}")]);
            }
        });

        for i in 0..ROUNDS {
            let value = map.long_or(&format!("k{i}"), -1).unwrap();
            assert!(value == i as i64 || value == -1);
        }
    });

    assert!(map.is_empty());
}

/// Watches `map` from the current thread while `writer` runs, returning every
/// size of `sub_map(["x", "y", "z"])` observed
fn observe_xyz(map: &NavMap, writer: impl FnOnce() + Send + 'static) -> HashSet<usize> {
    let mut seen = HashSet::new();
    thread::scope(|s| {
        let handle = s.spawn(writer);
        while !handle.is_finished() {
            seen.insert(map.sub_map(["x", "y", "z"]).unwrap().len());
        }
    });
    seen
}

#[test]
fn test_bulk_add_and_delete_are_all_or_nothing() {
    let map = NavMap::new();
    let writer = map.clone();

    let seen = observe_xyz(&map, move || {
        for _ in 0..ROUNDS * 4 {
            writer.add_all([NavMap::of3("x", 1, "y", 2, "z", 3)]);
            writer.del(["x", "y", "z"]);
        }
    });

    assert!(seen.is_subset(&HashSet::from([0, 3])), "saw {seen:?}");
}

#[test]
fn test_keyed_add_from_is_all_or_nothing() {
    let map = NavMap::new();
    let writer = map.clone();
    let source = NavMap::new()
        .with("x", 1)
        .with("y", 2)
        .with("z", 3)
        .with("ignored", 4);

    let seen = observe_xyz(&map, move || {
        for _ in 0..ROUNDS * 4 {
            writer.add_from(&source, ["x", "y", "z"]);
            writer.del(["x", "y", "z"]);
        }
    });

    assert!(seen.is_subset(&HashSet::from([0, 3])), "saw {seen:?}");
    assert!(map.not_valued("ignored"));
}
