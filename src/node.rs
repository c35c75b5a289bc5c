//! Internal node and edge representation for the radix tree.
//!
//! Ownership runs strictly downwards: the tree owns the root, every node owns
//! its outgoing edges and every edge owns exactly one child node. A node never
//! points back at its incoming edge; operations that need that edge (merging a
//! pass-through node upwards) are expressed as methods on the edge itself, so the
//! root, which has no incoming edge, can never be merged.

use tracing::trace;

use crate::util::common_prefix_length;

/// A complete key-value pair stored at the node where the key's path ends.
pub(crate) struct Leaf<V> {
    pub key: Vec<u8>,
    pub value: V,
}

/// A labelled transition owning its child node.
///
/// `prefix` is never empty.
pub(crate) struct Edge<V> {
    pub prefix: Vec<u8>,
    pub child: Node<V>,
}

/// A point in key space.
///
/// `edges` is sorted ascending by the first byte of each prefix and no two
/// edges share a first byte.
pub(crate) struct Node<V> {
    pub leaf: Option<Leaf<V>>,
    pub edges: Vec<Edge<V>>,
}

/// Binary search over `edges`, comparing only first bytes.
///
/// Returns the index of the matching edge and `true`, or the index at which an
/// edge starting with `target[0]` would be inserted and `false`.
///
/// `target` must not be empty.
pub(crate) fn locate_edge<V>(edges: &[Edge<V>], target: &[u8]) -> (usize, bool) {
    let first = target[0];
    match edges.binary_search_by(|edge| edge.prefix[0].cmp(&first)) {
        Ok(idx) => (idx, true),
        Err(idx) => (idx, false),
    }
}

impl<V> Node<V> {
    /// Creates a node with no leaf and no edges.
    pub fn new() -> Self {
        Node {
            leaf: None,
            edges: Vec::new(),
        }
    }

    /// Returns whether this node carries neither a leaf nor any edge.
    pub fn is_vacant(&self) -> bool {
        self.leaf.is_none() && self.edges.is_empty()
    }

    /// Inserts `edge` at its sorted position.
    ///
    /// # Panics
    ///
    /// Panics if a sibling already starts with the same byte. Insertion always
    /// splits an existing edge before it would get here, so a collision means
    /// the tree is corrupt.
    pub fn append_edge(&mut self, edge: Edge<V>) {
        let (idx, found) = locate_edge(&self.edges, &edge.prefix);
        assert!(
            !found,
            "edge {:?} collides with sibling {:?}",
            edge.prefix, self.edges[idx].prefix
        );
        self.edges.insert(idx, edge);
    }

    /// Removes the edge whose prefix starts with `target[0]`, if there is one.
    pub fn delete_edge(&mut self, target: &[u8]) -> Option<Edge<V>> {
        match locate_edge(&self.edges, target) {
            (idx, true) => Some(self.edges.remove(idx)),
            (_, false) => None,
        }
    }

    /// Counts the leaves in this node's subtree, this node included.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.leaf.is_some() {
                count += 1;
            }
            stack.extend(node.edges.iter().map(|edge| &edge.child));
        }
        count
    }

    /// Walks down from this node following `query` one edge at a time.
    ///
    /// Dispatch looks only at the first byte of the remaining query; the rest of
    /// a matched edge is not compared. The walk stops at the child of the first
    /// edge whose prefix is at least as long as what is left of the query. An
    /// empty query resolves to `self`.
    ///
    /// `on_step` receives the index of every edge taken, so callers that need to
    /// get back to the parent can replay the path with [`Node::node_at_mut`].
    pub fn descend<F>(&self, query: &[u8], mut on_step: F) -> Option<&Node<V>>
    where
        F: FnMut(usize),
    {
        let mut node = self;
        let mut remaining = query;

        while !remaining.is_empty() {
            let (idx, found) = locate_edge(&node.edges, remaining);
            if !found {
                return None;
            }
            on_step(idx);

            let edge = &node.edges[idx];
            if edge.prefix.len() >= remaining.len() {
                return Some(&edge.child);
            }
            remaining = &remaining[edge.prefix.len()..];
            node = &edge.child;
        }

        Some(node)
    }

    /// Follows a path of edge indices recorded by [`Node::descend`].
    pub fn node_at_mut(&mut self, path: &[usize]) -> &mut Node<V> {
        let mut node = self;
        for &idx in path {
            node = &mut node.edges[idx].child;
        }
        node
    }
}

impl<V> Edge<V> {
    /// Creates an edge leading to a fresh node that carries `leaf`.
    pub fn new(prefix: Vec<u8>, leaf: Option<Leaf<V>>) -> Self {
        Edge {
            prefix,
            child: Node {
                leaf,
                edges: Vec::new(),
            },
        }
    }

    /// Returns how many leading bytes this edge shares with `remaining`.
    pub fn shared_len(&self, remaining: &[u8]) -> usize {
        common_prefix_length(&self.prefix, remaining)
    }

    /// Splits this edge after `at` bytes.
    ///
    /// The unmatched suffix moves to a new edge that takes over the old child's
    /// leaf and edges; this edge keeps the first `at` bytes and now leads to an
    /// intermediate node with no leaf and that single edge.
    pub fn split(&mut self, at: usize) {
        debug_assert!(at > 0 && at < self.prefix.len());

        let suffix = self.prefix.split_off(at);
        trace!(prefix = ?self.prefix, suffix = ?suffix, "splitting edge");

        let old_child = std::mem::replace(&mut self.child, Node::new());
        self.child.edges.push(Edge {
            prefix: suffix,
            child: old_child,
        });
    }

    /// Collapses the child into this edge if it has become a pass-through node.
    ///
    /// A child with no leaf and exactly one edge is absorbed: that edge's prefix
    /// is appended to ours and its child takes the place of ours. Otherwise this
    /// does nothing.
    pub fn merge_child(&mut self) {
        if self.child.leaf.is_some() || self.child.edges.len() != 1 {
            return;
        }
        if let Some(absorbed) = self.child.edges.pop() {
            trace!(prefix = ?self.prefix, absorbed = ?absorbed.prefix, "merging edge");
            self.prefix.extend_from_slice(&absorbed.prefix);
            self.child = absorbed.child;
        }
    }
}

impl<V> Drop for Node<V> {
    // Unlinks the subtree onto a heap stack so a deep chain of nested keys is
    // freed one node at a time instead of through recursive drop glue.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.edges);
        while let Some(mut edge) = stack.pop() {
            stack.append(&mut edge.child.edges);
        }
    }
}
