//! Flattened traversal for rendering

use crate::models::CommentId;

use super::{CommentForest, CommentNode};

/// Pre-order walk over the forest that does not descend into collapsed nodes.
///
/// Yields `(node, depth)` with depth 0 for top-level comments. The iterator
/// only borrows the forest, so a fresh call starts over from the first root.
#[derive(Debug, Clone)]
pub struct VisibleIter<'a> {
    forest: &'a CommentForest,
    stack: Vec<(CommentId, usize)>,
}

impl<'a> VisibleIter<'a> {
    pub(super) fn new(forest: &'a CommentForest) -> Self {
        let stack = forest.roots.iter().rev().map(|id| (*id, 0)).collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for VisibleIter<'a> {
    type Item = (&'a CommentNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, depth)) = self.stack.pop() {
            let Some(node) = self.forest.nodes.get(&id) else {
                continue;
            };
            if !node.collapsed {
                self.stack
                    .extend(node.children.iter().rev().map(|child| (*child, depth + 1)));
            }
            return Some((node, depth));
        }
        None
    }
}
