use radix_mutable::RadixTree;

fn keys_of(tree: &RadixTree<i32>, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    tree.scan(prefix, |key, _| {
        keys.push(String::from_utf8(key.to_vec()).unwrap());
        true
    });
    keys
}

#[test]
fn test_insert_get_delete_scenario() {
    let mut tree = RadixTree::new();
    tree.insert("test", 1);
    tree.insert("team", 2);
    tree.insert("toast", 3);

    assert_eq!(tree.get("test"), Some(&1));
    assert_eq!(tree.get("tea"), None);
    assert_eq!(tree.len(), 3);

    assert_eq!(tree.remove("team"), Some(2));
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get("team"), None);
    assert_eq!(tree.get("test"), Some(&1));
    assert_eq!(tree.get("toast"), Some(&3));
    assert_eq!(tree.check_invariants(), Ok(()));
}

#[test]
fn test_scan_all_in_order() {
    let mut tree = RadixTree::new();
    let keys = [
        "romane",
        "romanus",
        "romulus",
        "rubens",
        "ruber",
        "rubicon",
        "rubicundus",
    ];
    // Insert in reverse to make sure order comes from the structure
    for (i, key) in keys.iter().enumerate().rev() {
        tree.insert(key, i as i32);
    }

    assert_eq!(keys_of(&tree, ""), keys.to_vec());
    assert_eq!(tree.check_invariants(), Ok(()));
}

#[test]
fn test_delete_prefix_scenario() {
    let mut tree = RadixTree::new();
    for key in &["1", "11", "111", "112", "113", "11234"] {
        tree.insert(key, 1);
    }

    assert_eq!(tree.remove_prefix("112"), Some(2));
    assert_eq!(tree.len(), 4);
    assert_eq!(keys_of(&tree, ""), vec!["1", "11", "111", "113"]);
    assert_eq!(tree.check_invariants(), Ok(()));
}

#[test]
fn test_reinsert_keeps_len() {
    let mut tree = RadixTree::new();
    let keys = [
        "test", "t", "toasting", "xy", "xy", "tester", "te", "tee", "testerr", "testerr",
    ];
    for key in &keys {
        tree.insert(key, key.len() as i32);
    }
    assert_eq!(tree.len(), 8);

    for key in &["test", "t", "toasting", "xy", "tester", "te", "tee", "testerr"] {
        assert_eq!(tree.get(key), Some(&(key.len() as i32)));
    }
}

#[test]
fn test_delete_everything() {
    let keys = [
        "test", "t", "toasting", "xy", "tester", "te", "tee", "testerr", "1", "2", "11", "22",
        "111", "222",
    ];
    let mut tree = RadixTree::new();
    for key in &keys {
        tree.insert(key, 0);
    }
    assert_eq!(tree.len(), keys.len());

    for key in &keys {
        assert_eq!(tree.remove(key), Some(0), "removing {}", key);
        assert_eq!(tree.check_invariants(), Ok(()));
    }
    assert!(tree.is_empty());
    assert_eq!(tree.iter().count(), 0);
}

#[test]
fn test_delete_absent_is_noop() {
    let mut tree = RadixTree::new();
    tree.insert("test", 1);
    tree.insert("", 1);
    tree.insert("tee", 1);

    assert_eq!(tree.remove("tea"), None);
    assert_eq!(tree.remove("tees"), None);
    assert_eq!(tree.len(), 3);

    assert_eq!(tree.remove("tee"), Some(1));
    assert_eq!(tree.remove(""), Some(1));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get("test"), Some(&1));
}

#[test]
fn test_scan_prefix_lexicographic() {
    let tree: RadixTree<i32> = vec![
        ("zebra", 5),
        ("apple", 1),
        ("banana", 2),
        ("cherry", 3),
        ("date", 4),
        ("apricot", 6),
        ("blueberry", 7),
        ("blackberry", 8),
    ]
    .into_iter()
    .collect();

    assert_eq!(keys_of(&tree, "a"), vec!["apple", "apricot"]);
    assert_eq!(keys_of(&tree, "b"), vec!["banana", "blackberry", "blueberry"]);
    assert_eq!(keys_of(&tree, "x"), Vec::<String>::new());
}

#[test]
fn test_scan_nested_prefixes() {
    let tree: RadixTree<i32> = vec![("a", 1), ("ab", 2), ("abc", 3), ("abcd", 4)]
        .into_iter()
        .collect();

    assert_eq!(keys_of(&tree, "a"), vec!["a", "ab", "abc", "abcd"]);
    assert_eq!(keys_of(&tree, "ab"), vec!["ab", "abc", "abcd"]);
    assert_eq!(keys_of(&tree, "abc"), vec!["abc", "abcd"]);
}

#[test]
fn test_scan_partial_edge() {
    let tree: RadixTree<i32> = vec![("hello", 1), ("help", 2), ("world", 3)]
        .into_iter()
        .collect();

    // "he" ends inside the "hel" edge
    assert_eq!(keys_of(&tree, "he"), vec!["hello", "help"]);
    assert_eq!(tree.iter_prefix("he").count(), 2);
}

#[test]
fn test_scan_structural_match() {
    let mut tree = RadixTree::new();
    tree.insert("test", 1);

    // Only the first byte of the last edge is looked at
    assert_eq!(keys_of(&tree, "team"), vec!["test"]);
    assert_eq!(tree.longest_prefix("team"), Some((&b"test"[..], &1)));
    assert_eq!(tree.get("team"), None);

    assert_eq!(tree.remove_prefix("team"), Some(1));
    assert!(tree.is_empty());
    assert_eq!(tree.get("test"), None);
}

#[test]
fn test_iter_into_iterator() {
    let tree: RadixTree<i32> = vec![("b", 2), ("a", 1)].into_iter().collect();

    let mut entries = Vec::new();
    for (key, value) in &tree {
        entries.push((key.to_vec(), *value));
    }
    assert_eq!(entries, vec![(b"a".to_vec(), 1), (b"b".to_vec(), 2)]);
}

#[test]
fn test_extend() {
    let mut tree: RadixTree<i32> = RadixTree::default();
    tree.extend(vec![("x", 1), ("y", 2)]);
    tree.extend(vec![(String::from("x"), 10)]);

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get("x"), Some(&10));
    assert!(tree.contains_key("y"));
    assert!(!tree.contains_key("z"));
}

/// `a`, `aa`, `aaa`, ... each nested one edge below the previous one.
fn nested_keys(depth: usize) -> RadixTree<usize> {
    let mut tree = RadixTree::new();
    let mut key = Vec::with_capacity(depth);
    for i in 0..depth {
        key.push(b'a');
        tree.insert(&key, i);
    }
    tree
}

const DEEP: usize = 20_000;

#[test]
fn test_drop_deep_tree() {
    let tree = nested_keys(DEEP);
    assert_eq!(tree.len(), DEEP);
    assert_eq!(tree.iter().count(), DEEP);
    drop(tree);
}

#[test]
fn test_clear_deep_tree() {
    let mut tree = nested_keys(DEEP);
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.check_invariants(), Ok(()));
}

#[test]
fn test_remove_prefix_deep_tree() {
    let mut tree = nested_keys(DEEP);
    assert_eq!(tree.remove_prefix(""), Some(DEEP));
    assert!(tree.is_empty());

    // Dropping a deep subtree below the root edge
    let mut tree = nested_keys(DEEP);
    assert_eq!(tree.remove_prefix("aa"), Some(DEEP - 1));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get("a"), Some(&0));
    assert_eq!(tree.check_invariants(), Ok(()));
}
