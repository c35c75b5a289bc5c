//! Ordered iteration over the entries of a radix tree.

use std::iter::FusedIterator;

use crate::node::Node;

/// An iterator over the entries of a [`RadixTree`](crate::RadixTree) subtree.
///
/// Entries are yielded as `(&[u8], &V)` in ascending key order. The walk is a
/// pre-order depth-first traversal driven by an explicit stack, so skewed trees
/// with very long keys do not grow the call stack. Sibling edges are pushed in
/// reverse so the smallest first byte is always popped next.
///
/// Created by [`RadixTree::iter`](crate::RadixTree::iter) and
/// [`RadixTree::iter_prefix`](crate::RadixTree::iter_prefix).
pub struct Iter<'a, V> {
    stack: Vec<&'a Node<V>>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(start: Option<&'a Node<V>>) -> Self {
        Iter {
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack
                .extend(node.edges.iter().rev().map(|edge| &edge.child));

            if let Some(leaf) = &node.leaf {
                return Some((leaf.key.as_slice(), &leaf.value));
            }
        }

        None
    }
}

impl<'a, V> FusedIterator for Iter<'a, V> {}
