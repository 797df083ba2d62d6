use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};
use crate::node_id::{NodeId, TreeId};
use crate::tree_traits::LowerBound;

/// Narrows a widened sum back to `i64`, saturating at the bounds.
pub(crate) fn saturate(sum: i128) -> i64 {
    i64::try_from(sum).unwrap_or(if sum < 0 { i64::MIN } else { i64::MAX })
}

/// Node of an N-ary tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub value: i64,
    pub(crate) parent: Option<Index>,
    pub(crate) children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based N-ary tree.
///
/// Nodes live in a generational arena and are handed out as [`NodeId`]s
/// scoped to this tree. Every node in the arena is reachable from the root:
/// nodes can only be added as the root or below an existing node.
#[derive(Debug)]
pub struct Tree {
    id: TreeId,
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// The clone is a new tree: handles of the original do not resolve in it.
impl Clone for Tree {
    fn clone(&self) -> Self {
        Self {
            id: TreeId::next(),
            arena: self.arena.clone(),
            root: self.root,
        }
    }
}

impl Tree {
    pub fn new() -> Self {
        Self {
            id: TreeId::next(),
            arena: Arena::new(),
            root: None,
        }
    }

    /// Adds a node below `parent`, or as the root when `parent` is `None`.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, value: i64, parent: Option<NodeId>) -> TreeResult<NodeId> {
        match parent {
            Some(parent_id) => {
                let parent_idx = self
                    .resolve(parent_id)
                    .ok_or(TreeError::NodeNotFound(parent_id))?;
                let node_idx = self.arena.insert(TreeNode {
                    value,
                    parent: Some(parent_idx),
                    children: Vec::new(),
                });
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.push(node_idx);
                }
                Ok(self.node_id(node_idx))
            }
            None => {
                if self.root.is_some() {
                    return Err(TreeError::RootExists);
                }
                let node_idx = self.arena.insert(TreeNode {
                    value,
                    parent: None,
                    children: Vec::new(),
                });
                self.root = Some(node_idx);
                Ok(self.node_id(node_idx))
            }
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Arena slot of `id` if it was issued by this tree and is still live.
    fn resolve(&self, id: NodeId) -> Option<Index> {
        (id.tree() == self.id && self.arena.contains(id.index())).then(|| id.index())
    }

    pub(crate) fn node_id(&self, idx: Index) -> NodeId {
        NodeId::new(self.id, idx)
    }

    pub(crate) fn node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.resolve(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn value(&self, id: NodeId) -> Option<i64> {
        self.get_node(id).map(|node| node.value)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id)?.parent.map(|idx| self.node_id(idx))
    }

    /// Children of `id` in insertion order; empty for unknown handles.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get_node(id)
            .map(|node| node.children.iter().map(|&idx| self.node_id(idx)).collect())
            .unwrap_or_default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root.map(|idx| self.node_id(idx))
    }

    pub(crate) fn root_index(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Adds up the values of all nodes. An empty tree sums to 0.
    ///
    /// The sum is exact whenever it fits in `i64` and saturates otherwise.
    #[instrument(level = "debug", skip(self))]
    pub fn sum_values(&self) -> i64 {
        saturate(self.root.map_or(0, |root| self.calculate_sum(root)))
    }

    fn calculate_sum(&self, node_idx: Index) -> i128 {
        self.node(node_idx).map_or(0, |node| {
            i128::from(node.value)
                + node
                    .children
                    .iter()
                    .map(|&child| self.calculate_sum(child))
                    .sum::<i128>()
        })
    }

    /// Counts the nodes holding an even value, zero and negatives included.
    #[instrument(level = "debug", skip(self))]
    pub fn count_evens(&self) -> usize {
        self.count_matching(|value| value % 2 == 0)
    }

    /// Counts the nodes whose value is strictly greater than `lower_bound`.
    #[instrument(level = "debug", skip(self))]
    pub fn num_greater<B: LowerBound>(&self, lower_bound: B) -> usize {
        debug!("lower_bound: {:?}", lower_bound);
        self.count_matching(|value| lower_bound.is_exceeded_by(value))
    }

    fn count_matching<F>(&self, predicate: F) -> usize
    where
        F: Fn(i64) -> bool,
    {
        fn count<F: Fn(i64) -> bool>(tree: &Tree, node_idx: Index, predicate: &F) -> usize {
            tree.node(node_idx).map_or(0, |node| {
                usize::from(predicate(node.value))
                    + node
                        .children
                        .iter()
                        .map(|&child| count(tree, child, predicate))
                        .sum::<usize>()
            })
        }

        self.root.map_or(0, |root| count(self, root, &predicate))
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Values of all leaf nodes, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_values(&self) -> Vec<i64> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.value)
            .collect()
    }

    /// Pre-order iterator over `(index, node)` pairs.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }
}

pub struct TreeIterator<'a> {
    tree: &'a Tree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            stack: tree.root.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((self.tree.node_id(current_idx), node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a Tree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            stack: tree.root.map(|root| (root, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.node(current_idx) {
                if visited {
                    return Some((self.tree.node_id(current_idx), node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
