//! # Radix Tree
//!
//! A mutable radix tree (also known as a patricia trie or compressed trie) mapping
//! byte-string keys to arbitrary values.
//!
//! Chains of single-child nodes are collapsed into multi-byte edges, sibling edges
//! are kept sorted by their first byte, and lookups dispatch on that byte alone.
//!
//! ## Features
//!
//! - **Update semantics**: inserting an existing key replaces its value and hands back the old one
//! - **Prefix removal**: drop a whole subtree in one call
//! - **Ordered enumeration**: scan or iterate any subtree in ascending key order
//! - **Self-check**: verify the structural invariants of a tree after the fact
//!
//! ## Example
//!
//! ```rust
//! use radix_mutable::RadixTree;
//!
//! let mut tree = RadixTree::new();
//! tree.insert("test", 1);
//! tree.insert("team", 2);
//! tree.insert("toast", 3);
//!
//! assert_eq!(tree.get("test"), Some(&1));
//! assert_eq!(tree.get("tea"), None);
//!
//! tree.remove("team");
//! let keys: Vec<&[u8]> = tree.iter().map(|(key, _)| key).collect();
//! assert_eq!(keys, vec![&b"test"[..], &b"toast"[..]]);
//! ```

mod iter;
mod node;
mod tree;
mod util;

// Re-export public types
pub use crate::iter::Iter;
pub use crate::tree::RadixTree;

/// Structural invariant violations reported by [`RadixTree::check_invariants`].
///
/// Paths and keys are rendered lossily as UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Sibling edges are not strictly ascending by first byte
    #[error("edges below {path:?} are not strictly sorted by first byte")]
    UnsortedEdges { path: String },

    /// An edge with an empty prefix
    #[error("empty edge prefix below {path:?}")]
    EmptyEdgePrefix { path: String },

    /// A non-root node with no leaf and a single edge
    #[error("node at {path:?} has no leaf and a single edge")]
    PassThroughNode { path: String },

    /// A non-root node with no leaf and no edges
    #[error("node at {path:?} has no leaf and no edges")]
    VacantNode { path: String },

    /// A stored key that differs from the path leading to it
    #[error("leaf at {path:?} stores key {key:?}")]
    KeyMismatch { path: String, key: String },

    /// The recorded entry count differs from the leaves actually reachable
    #[error("tree records {recorded} entries but {found} were found")]
    CountMismatch { recorded: usize, found: usize },
}
