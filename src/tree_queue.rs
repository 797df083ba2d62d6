use std::collections::VecDeque;

use generational_arena::Index;

use crate::binary_tree::{BinaryTree, BinaryTreeNode};
use crate::node_id::NodeId;
use crate::tree::{Tree, TreeNode};

impl Tree {
    /// Breadth-first iterator yielding `(index, node, level)`, root at level 0.
    pub fn level_order(&self) -> LevelOrderIterator<'_> {
        let mut queue = VecDeque::new();
        if let Some(root) = self.root_index() {
            queue.push_back((root, 0));
        }
        LevelOrderIterator { tree: self, queue }
    }

    /// Calculates the depth using a breadth-first traversal.
    pub fn depth_bfs(&self) -> usize {
        self.level_order()
            .map(|(_, _, level)| level + 1)
            .max()
            .unwrap_or(0)
    }
}

pub struct LevelOrderIterator<'a> {
    tree: &'a Tree,
    queue: VecDeque<(Index, usize)>,
}

impl<'a> Iterator for LevelOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, level)) = self.queue.pop_front() {
            if let Some(node) = self.tree.node(idx) {
                self.queue
                    .extend(node.children.iter().map(|&child| (child, level + 1)));
                return Some((self.tree.node_id(idx), node, level));
            }
        }
        None
    }
}

impl BinaryTree {
    /// Breadth-first iterator yielding `(index, node, level)`, root at level 0.
    pub fn level_order(&self) -> BinaryLevelOrderIterator<'_> {
        let mut queue = VecDeque::new();
        if let Some(root) = self.root_index() {
            queue.push_back((root, 0));
        }
        BinaryLevelOrderIterator { tree: self, queue }
    }

    /// Values grouped by level, top to bottom and left to right.
    pub fn levels(&self) -> Vec<Vec<i64>> {
        let mut levels: Vec<Vec<i64>> = Vec::new();
        for (_, node, level) in self.level_order() {
            if levels.len() <= level {
                levels.push(Vec::new());
            }
            levels[level].push(node.value);
        }
        levels
    }
}

pub struct BinaryLevelOrderIterator<'a> {
    tree: &'a BinaryTree,
    queue: VecDeque<(Index, usize)>,
}

impl<'a> Iterator for BinaryLevelOrderIterator<'a> {
    type Item = (NodeId, &'a BinaryTreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, level)) = self.queue.pop_front() {
            if let Some(node) = self.tree.node(idx) {
                for child in [node.left, node.right].into_iter().flatten() {
                    self.queue.push_back((child, level + 1));
                }
                return Some((self.tree.node_id(idx), node, level));
            }
        }
        None
    }
}
