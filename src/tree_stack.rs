//! Explicit-stack traversals of [`BinaryTree`].
//!
//! The recursive algorithms in `binary_tree` use the call stack and can
//! overflow on degenerate (list-shaped) trees. Everything here keeps its
//! work list on the heap and produces the same results.

use std::cmp;
use std::collections::HashMap;

use generational_arena::Index;
use tracing::instrument;

use crate::binary_tree::{BinaryTree, BinaryTreeNode};
use crate::node_id::NodeId;
use crate::tree::saturate;

impl BinaryTree {
    /// Node, left subtree, right subtree.
    pub fn preorder(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// Left subtree, node, right subtree.
    pub fn inorder(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    /// Left subtree, right subtree, node.
    pub fn postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Handle of the node at `position` in pre-order, counting from 0.
    pub fn node_at_preorder(&self, position: usize) -> Option<NodeId> {
        self.preorder().nth(position).map(|(id, _)| id)
    }

    /// Pre-order position of `id`, the inverse of [`BinaryTree::node_at_preorder`].
    pub fn preorder_position(&self, id: NodeId) -> Option<usize> {
        self.preorder().position(|(current, _)| current == id)
    }

    /// Bottom-up fold: `combine` sees each node with the folded values of its
    /// left and right subtree, `empty` stands in for an absent child.
    pub fn fold_postorder<T, F>(&self, empty: T, mut combine: F) -> T
    where
        T: Copy,
        F: FnMut(&BinaryTreeNode, T, T) -> T,
    {
        let mut folded: HashMap<Index, T> = HashMap::with_capacity(self.len());
        let mut last = empty;
        for (id, node) in self.postorder() {
            let left = node.left.and_then(|l| folded.get(&l).copied()).unwrap_or(empty);
            let right = node.right.and_then(|r| folded.get(&r).copied()).unwrap_or(empty);
            last = combine(node, left, right);
            folded.insert(id.index(), last);
        }
        // the root is visited last
        last
    }

    #[instrument(level = "debug", skip(self))]
    pub fn min_depth_iterative(&self) -> usize {
        self.fold_postorder(0, |node, left, right| {
            if node.is_leaf() {
                1
            } else {
                1 + cmp::min(left, right)
            }
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn max_depth_iterative(&self) -> usize {
        self.fold_postorder(0, |_, left, right| 1 + cmp::max(left, right))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn max_sum_iterative(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        let mut best = i128::MIN;
        self.fold_postorder(0i128, |node, left, right| {
            let left = cmp::max(0, left);
            let right = cmp::max(0, right);
            let value = i128::from(node.value);
            best = cmp::max(best, value + left + right);
            value + cmp::max(left, right)
        });
        saturate(best)
    }
}

pub struct PreOrderIterator<'a> {
    tree: &'a BinaryTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(tree: &'a BinaryTree) -> Self {
        Self {
            tree,
            stack: tree.root_index().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (NodeId, &'a BinaryTreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.node(current_idx) {
                // right first so that left is popped next
                self.stack.extend(node.right);
                self.stack.extend(node.left);
                return Some((self.tree.node_id(current_idx), node));
            }
        }
        None
    }
}

pub struct InOrderIterator<'a> {
    tree: &'a BinaryTree,
    stack: Vec<Index>,
    current: Option<Index>,
}

impl<'a> InOrderIterator<'a> {
    fn new(tree: &'a BinaryTree) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            current: tree.root_index(),
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = (NodeId, &'a BinaryTreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        // walk down the left spine first
        while let Some(idx) = self.current {
            self.stack.push(idx);
            self.current = self.tree.node(idx).and_then(|node| node.left);
        }
        let idx = self.stack.pop()?;
        let node = self.tree.node(idx)?;
        self.current = node.right;
        Some((self.tree.node_id(idx), node))
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a BinaryTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a BinaryTree) -> Self {
        Self {
            tree,
            stack: tree.root_index().map(|root| (root, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a BinaryTreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.node(current_idx) {
                if visited {
                    return Some((self.tree.node_id(current_idx), node));
                }
                self.stack.push((current_idx, true));
                if let Some(right) = node.right {
                    self.stack.push((right, false));
                }
                if let Some(left) = node.left {
                    self.stack.push((left, false));
                }
            }
        }
        None
    }
}
