//! The main tree implementation.
//!
//! This module contains the `RadixTree` type, which provides the primary API for
//! working with the radix tree data structure.

use std::fmt;
use std::iter::FromIterator;

use tracing::{debug, trace};

use crate::iter::Iter;
use crate::node::{locate_edge, Edge, Leaf, Node};
use crate::Error;

/// A mutable radix tree mapping byte-string keys to values.
///
/// Chains of single-child nodes are collapsed into multi-byte edges, so the
/// number of nodes is bounded by the number of stored keys. Every key is stored
/// in full next to its value; the empty key is a valid key and lives on the
/// root.
///
/// Lookups dispatch on the first byte of the remaining query at every node and
/// trust the rest of the matched edge. Exact operations ([`get`](Self::get),
/// [`remove`](Self::remove)) compare the stored key before answering; the
/// structural ones ([`longest_prefix`](Self::longest_prefix),
/// [`remove_prefix`](Self::remove_prefix), [`scan`](Self::scan)) do not.
///
/// Values are opaque to the tree: they are never compared or hashed.
pub struct RadixTree<V> {
    root: Node<V>,

    /// Number of nodes carrying a leaf
    count: usize,
}

impl<V> RadixTree<V> {
    /// Creates a new, empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mutable::RadixTree;
    ///
    /// let tree = RadixTree::<i32>::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Self {
        RadixTree {
            root: Node::new(),
            count: 0,
        }
    }

    /// Returns the number of keys stored in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mutable::RadixTree;
    ///
    /// let mut tree = RadixTree::new();
    /// assert_eq!(tree.len(), 0);
    ///
    /// tree.insert("hello", 42);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the tree contains no keys.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Removes every key from the tree.
    pub fn clear(&mut self) {
        debug!(removed = self.count, "clearing tree");
        self.root = Node::new();
        self.count = 0;
    }

    /// Inserts a key-value pair.
    ///
    /// Returns `None` if the key was not present. Otherwise the stored value is
    /// replaced and the previous one returned; the number of keys is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if an edge selected by its first byte turns out to share no bytes
    /// with the key, which can only happen if the tree has been corrupted.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mutable::RadixTree;
    ///
    /// let mut tree = RadixTree::new();
    /// assert_eq!(tree.insert("hello", 42), None);
    /// assert_eq!(tree.insert("hello", 100), Some(42));
    /// assert_eq!(tree.get("hello"), Some(&100));
    /// ```
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K, value: V) -> Option<V> {
        let key = key.as_ref();
        let mut node = &mut self.root;
        let mut remaining = key;

        loop {
            if remaining.is_empty() {
                let old = node.leaf.replace(Leaf {
                    key: key.to_vec(),
                    value,
                });
                if old.is_none() {
                    self.count += 1;
                }
                return old.map(|leaf| leaf.value);
            }

            let (idx, found) = locate_edge(&node.edges, remaining);
            if !found {
                let leaf = Leaf {
                    key: key.to_vec(),
                    value,
                };
                node.append_edge(Edge::new(remaining.to_vec(), Some(leaf)));
                self.count += 1;
                return None;
            }

            let edge = &mut node.edges[idx];
            let shared = edge.shared_len(remaining);
            assert!(
                shared > 0,
                "edge {:?} was selected for {:?} but shares no prefix with it",
                edge.prefix,
                remaining
            );

            if shared < edge.prefix.len() {
                edge.split(shared);
            }
            remaining = &remaining[shared..];
            node = &mut edge.child;
        }
    }

    /// Retrieves a reference to the value stored for `key`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mutable::RadixTree;
    ///
    /// let mut tree = RadixTree::new();
    /// tree.insert("hello", 42);
    ///
    /// assert_eq!(tree.get("hello"), Some(&42));
    /// assert_eq!(tree.get("hell"), None);
    /// ```
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&V> {
        let key = key.as_ref();
        self.root
            .descend(key, |_| {})?
            .leaf
            .as_ref()
            .filter(|leaf| leaf.key == key)
            .map(|leaf| &leaf.value)
    }

    /// Returns `true` if the tree contains a value for `key`.
    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Returns the entry stored at the node `query` structurally resolves to.
    ///
    /// The descent only checks the first byte of each edge it takes, and stops
    /// at the first edge that is at least as long as the rest of the query. When
    /// the node it stops at carries a leaf, that entry is returned, even if its
    /// key diverges from `query` inside the last edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mutable::RadixTree;
    ///
    /// let mut tree = RadixTree::new();
    /// tree.insert("slow", 1);
    /// tree.insert("slowly", 2);
    ///
    /// assert_eq!(tree.longest_prefix("slo"), Some((&b"slow"[..], &1)));
    /// assert_eq!(tree.longest_prefix("fast"), None);
    /// ```
    pub fn longest_prefix<K: AsRef<[u8]>>(&self, query: K) -> Option<(&[u8], &V)> {
        let leaf = self.root.descend(query.as_ref(), |_| {})?.leaf.as_ref()?;
        Some((leaf.key.as_slice(), &leaf.value))
    }

    /// Removes `key` from the tree, returning its value if it was present.
    ///
    /// Nodes left without a leaf and with a single edge are merged into their
    /// incoming edge, so removing the only key on a path restores the shape the
    /// tree had before that key was inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mutable::RadixTree;
    ///
    /// let mut tree = RadixTree::new();
    /// tree.insert("hello", 42);
    ///
    /// assert_eq!(tree.remove("hello"), Some(42));
    /// assert_eq!(tree.remove("hello"), None);
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) -> Option<V> {
        let key = key.as_ref();
        let mut path = Vec::new();

        let target = self.root.descend(key, |idx| path.push(idx))?;
        match &target.leaf {
            Some(leaf) if leaf.key == key => {}
            _ => return None,
        }

        let leaf = match path.split_last() {
            None => self.root.leaf.take(),
            Some((&idx, ancestors)) => match ancestors.split_last() {
                None => detach_leaf(&mut self.root, idx),
                Some((&parent_idx, rest)) => {
                    let parent_edge = &mut self.root.node_at_mut(rest).edges[parent_idx];
                    let leaf = detach_leaf(&mut parent_edge.child, idx);
                    parent_edge.merge_child();
                    leaf
                }
            },
        };

        self.count -= 1;
        leaf.map(|leaf| leaf.value)
    }

    /// Removes the whole subtree `prefix` structurally resolves to.
    ///
    /// Every key whose path passes through the matched node goes, the node's
    /// own key included. Returns the number of keys removed, or `None` if no
    /// node matched. An empty prefix matches the root and clears the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mutable::RadixTree;
    ///
    /// let mut tree = RadixTree::new();
    /// tree.insert("romane", 1);
    /// tree.insert("romanus", 2);
    /// tree.insert("rubens", 3);
    ///
    /// assert_eq!(tree.remove_prefix("roma"), Some(2));
    /// assert_eq!(tree.remove_prefix("x"), None);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn remove_prefix<K: AsRef<[u8]>>(&mut self, prefix: K) -> Option<usize> {
        let mut path = Vec::new();
        let removed = self
            .root
            .descend(prefix.as_ref(), |idx| path.push(idx))?
            .leaf_count();

        match path.split_last() {
            None => self.root = Node::new(),
            Some((&idx, ancestors)) => match ancestors.split_last() {
                None => detach_subtree(&mut self.root, idx),
                Some((&parent_idx, rest)) => {
                    let parent_edge = &mut self.root.node_at_mut(rest).edges[parent_idx];
                    detach_subtree(&mut parent_edge.child, idx);
                    parent_edge.merge_child();
                }
            },
        }

        debug!(removed, "removed subtree");
        self.count -= removed;
        Some(removed)
    }

    /// Calls `visitor` on every entry below the node `prefix` resolves to, in
    /// ascending key order, until it returns `false`.
    ///
    /// The matched node's own entry is visited first. An empty prefix visits the
    /// whole tree, the empty key included.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_mutable::RadixTree;
    ///
    /// let mut tree = RadixTree::new();
    /// tree.insert("b", 2);
    /// tree.insert("a", 1);
    /// tree.insert("c", 3);
    ///
    /// let mut seen = Vec::new();
    /// tree.scan("", |key, value| {
    ///     seen.push((key.to_vec(), *value));
    ///     *value < 2
    /// });
    /// assert_eq!(seen, vec![(b"a".to_vec(), 1), (b"b".to_vec(), 2)]);
    /// ```
    pub fn scan<K, F>(&self, prefix: K, mut visitor: F)
    where
        K: AsRef<[u8]>,
        F: FnMut(&[u8], &V) -> bool,
    {
        for (key, value) in self.iter_prefix(prefix) {
            if !visitor(key, value) {
                break;
            }
        }
    }

    /// Returns an iterator over every entry in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(Some(&self.root))
    }

    /// Returns an iterator over the subtree `prefix` structurally resolves to.
    ///
    /// Same traversal as [`scan`](Self::scan); empty if nothing matched.
    pub fn iter_prefix<K: AsRef<[u8]>>(&self, prefix: K) -> Iter<'_, V> {
        Iter::new(self.root.descend(prefix.as_ref(), |_| {}))
    }

    /// Walks the whole tree and reports the first structural invariant that
    /// does not hold.
    ///
    /// Checked: sibling edges strictly ascending by first byte, no empty edge
    /// prefix, no non-root node that is a pass-through or vacant, every stored
    /// key equal to the concatenated prefixes leading to it, and the entry count.
    pub fn check_invariants(&self) -> Result<(), Error> {
        let mut counted = 0;
        let mut stack: Vec<(&Node<V>, Vec<u8>)> = vec![(&self.root, Vec::new())];

        while let Some((node, path)) = stack.pop() {
            let is_root = std::ptr::eq(node, &self.root);

            match &node.leaf {
                Some(leaf) => {
                    if leaf.key != path {
                        return Err(Error::KeyMismatch {
                            path: lossy(&path),
                            key: lossy(&leaf.key),
                        });
                    }
                    counted += 1;
                }
                None if is_root => {}
                None if node.edges.is_empty() => {
                    return Err(Error::VacantNode { path: lossy(&path) });
                }
                None if node.edges.len() == 1 => {
                    return Err(Error::PassThroughNode { path: lossy(&path) });
                }
                None => {}
            }

            if node.edges.iter().any(|edge| edge.prefix.is_empty()) {
                return Err(Error::EmptyEdgePrefix { path: lossy(&path) });
            }
            if node
                .edges
                .windows(2)
                .any(|pair| pair[0].prefix[0] >= pair[1].prefix[0])
            {
                return Err(Error::UnsortedEdges { path: lossy(&path) });
            }

            for edge in &node.edges {
                let mut child_path = path.clone();
                child_path.extend_from_slice(&edge.prefix);
                stack.push((&edge.child, child_path));
            }
        }

        if counted != self.count {
            return Err(Error::CountMismatch {
                recorded: self.count,
                found: counted,
            });
        }
        Ok(())
    }
}

/// Takes the leaf off the child of `parent.edges[idx]` and tidies up below
/// `parent`: the child is merged into its edge if it became a pass-through, and
/// the edge is dropped if the child is left with nothing.
fn detach_leaf<V>(parent: &mut Node<V>, idx: usize) -> Option<Leaf<V>> {
    let edge = &mut parent.edges[idx];
    let leaf = edge.child.leaf.take();
    edge.merge_child();

    if edge.child.is_vacant() {
        let first = edge.prefix[0];
        parent.delete_edge(&[first]);
    }
    leaf
}

fn detach_subtree<V>(parent: &mut Node<V>, idx: usize) {
    let first = parent.edges[idx].prefix[0];
    if let Some(edge) = parent.delete_edge(&[first]) {
        trace!(prefix = ?edge.prefix, "dropping subtree");
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// Default implementation
impl<V> Default for RadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for RadixTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (String::from_utf8_lossy(key), value)))
            .finish()
    }
}

impl<K: AsRef<[u8]>, V> FromIterator<(K, V)> for RadixTree<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = RadixTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: AsRef<[u8]>, V> Extend<(K, V)> for RadixTree<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, V> IntoIterator for &'a RadixTree<V> {
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
