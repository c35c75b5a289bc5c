//! Examples of using the radix tree
use radix_mutable::RadixTree;

fn main() {
    let mut tree = RadixTree::new();
    tree.insert("abc", 1);
    tree.insert("abac", 2);
    tree.insert("d", 3);
    tree.remove("d");

    match tree.get("abc") {
        Some(value) => println!("value {}", value),
        None => println!("key abc not present"),
    }

    match tree.longest_prefix("a") {
        Some((key, value)) => println!("prefix {} value {}", String::from_utf8_lossy(key), value),
        None => println!("nothing stored under a"),
    }

    // Walk every entry in key order
    tree.scan("", |key, value| {
        println!("scan key {} value {}", String::from_utf8_lossy(key), value);
        true
    });

    let removed = tree.remove_prefix("ab").unwrap_or(0);
    println!("removed {} keys, {} left", removed, tree.len());
}
