use std::cmp;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};
use crate::node_id::{NodeId, TreeId};
use crate::tree::saturate;
use crate::tree_traits::LowerBound;

/// Which child slot of a binary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinaryTreeNode {
    pub value: i64,
    pub(crate) parent: Option<Index>,
    pub(crate) left: Option<Index>,
    pub(crate) right: Option<Index>,
}

impl BinaryTreeNode {
    fn new(value: i64, parent: Option<Index>) -> Self {
        Self {
            value,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn child(&self, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Where a node sits relative to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Location {
    level: usize,
    parent: Option<Index>,
}

/// Arena-based binary tree.
///
/// Node handles ([`NodeId`]) carry identity: two nodes holding the same value
/// are still distinct, which is what [`BinaryTree::are_cousins`] and
/// [`BinaryTree::lowest_common_ancestor`] compare by. Handles only resolve in
/// the tree that issued them; a clone is a new tree.
#[derive(Debug)]
pub struct BinaryTree {
    id: TreeId,
    arena: Arena<BinaryTreeNode>,
    root: Option<Index>,
}

impl Default for BinaryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for BinaryTree {
    fn clone(&self) -> Self {
        Self {
            id: TreeId::next(),
            arena: self.arena.clone(),
            root: self.root,
        }
    }
}

impl BinaryTree {
    pub fn new() -> Self {
        Self {
            id: TreeId::next(),
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn set_root(&mut self, value: i64) -> TreeResult<NodeId> {
        if self.root.is_some() {
            return Err(TreeError::RootExists);
        }
        let idx = self.arena.insert(BinaryTreeNode::new(value, None));
        self.root = Some(idx);
        Ok(self.node_id(idx))
    }

    /// Attaches a new node in the empty `side` slot of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_child(&mut self, parent: NodeId, side: Side, value: i64) -> TreeResult<NodeId> {
        let parent_idx = self
            .resolve(parent)
            .ok_or(TreeError::NodeNotFound(parent))?;
        if self.arena[parent_idx].child(side).is_some() {
            return Err(TreeError::SlotOccupied { side });
        }

        let idx = self
            .arena
            .insert(BinaryTreeNode::new(value, Some(parent_idx)));
        if let Some(parent_node) = self.arena.get_mut(parent_idx) {
            match side {
                Side::Left => parent_node.left = Some(idx),
                Side::Right => parent_node.right = Some(idx),
            }
        }
        Ok(self.node_id(idx))
    }

    pub fn insert_left(&mut self, parent: NodeId, value: i64) -> TreeResult<NodeId> {
        self.insert_child(parent, Side::Left, value)
    }

    pub fn insert_right(&mut self, parent: NodeId, value: i64) -> TreeResult<NodeId> {
        self.insert_child(parent, Side::Right, value)
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

    pub(crate) fn node(&self, idx: Index) -> Option<&BinaryTreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root.map(|idx| self.node_id(idx))
    }

    pub(crate) fn root_index(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, id: NodeId) -> Option<&BinaryTreeNode> {
        self.resolve(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn value(&self, id: NodeId) -> Option<i64> {
        self.get_node(id).map(|node| node.value)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id)?.parent.map(|idx| self.node_id(idx))
    }

    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.get_node(id)?.child(side).map(|idx| self.node_id(idx))
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.child(id, Side::Left)
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.child(id, Side::Right)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn node_at(&self, slot: Option<Index>) -> Option<&BinaryTreeNode> {
        slot.and_then(|idx| self.arena.get(idx))
    }

    /// Minimum depth, counting an absent child as depth 0.
    ///
    /// A node with exactly one child therefore stops the count at that node,
    /// even though it is not a leaf. See [`BinaryTree::min_leaf_depth`] for
    /// the variant where every path has to end at a leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn min_depth(&self) -> usize {
        self.calculate_min_depth(self.root)
    }

    fn calculate_min_depth(&self, slot: Option<Index>) -> usize {
        let Some(node) = self.node_at(slot) else {
            return 0;
        };
        if node.is_leaf() {
            return 1;
        }
        1 + cmp::min(
            self.calculate_min_depth(node.left),
            self.calculate_min_depth(node.right),
        )
    }

    /// Number of nodes on the shortest root-to-leaf path.
    #[instrument(level = "debug", skip(self))]
    pub fn min_leaf_depth(&self) -> usize {
        self.calculate_leaf_depth(self.root)
    }

    fn calculate_leaf_depth(&self, slot: Option<Index>) -> usize {
        let Some(node) = self.node_at(slot) else {
            return 0;
        };
        match (node.left, node.right) {
            (None, None) => 1,
            (Some(_), None) => 1 + self.calculate_leaf_depth(node.left),
            (None, Some(_)) => 1 + self.calculate_leaf_depth(node.right),
            (Some(_), Some(_)) => {
                1 + cmp::min(
                    self.calculate_leaf_depth(node.left),
                    self.calculate_leaf_depth(node.right),
                )
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn max_depth(&self) -> usize {
        self.calculate_max_depth(self.root)
    }

    fn calculate_max_depth(&self, slot: Option<Index>) -> usize {
        self.node_at(slot).map_or(0, |node| {
            1 + cmp::max(
                self.calculate_max_depth(node.left),
                self.calculate_max_depth(node.right),
            )
        })
    }

    /// Largest sum along any path in the tree.
    ///
    /// The path may start and end anywhere but visits each node at most once.
    /// Returns 0 for an empty tree; an all-negative tree yields its largest
    /// single value. Sums are widened while walking, so the result is exact
    /// whenever it fits in `i64` and saturates otherwise.
    #[instrument(level = "debug", skip(self))]
    pub fn max_sum(&self) -> i64 {
        if self.root.is_none() {
            return 0;
        }
        let mut best = i128::MIN;
        self.max_gain(self.root, &mut best);
        saturate(best)
    }

    /// Best sum of a path that starts at `slot` and only goes down.
    fn max_gain(&self, slot: Option<Index>, best: &mut i128) -> i128 {
        let Some(node) = self.node_at(slot) else {
            return 0;
        };
        let left = cmp::max(0, self.max_gain(node.left, best));
        let right = cmp::max(0, self.max_gain(node.right, best));

        let value = i128::from(node.value);
        *best = cmp::max(*best, value + left + right);
        value + cmp::max(left, right)
    }

    /// Smallest value strictly greater than `lower_bound`, scanning the whole
    /// tree in order. The tree does not have to be a search tree.
    #[instrument(level = "debug", skip(self))]
    pub fn next_larger<B: LowerBound>(&self, lower_bound: B) -> Option<i64> {
        let result = self
            .inorder()
            .map(|(_, node)| node.value)
            .filter(|&value| lower_bound.is_exceeded_by(value))
            .min();
        debug!("next larger than {:?}: {:?}", lower_bound, result);
        result
    }

    /// Whether both nodes are at the same level under different parents.
    #[instrument(level = "debug", skip(self))]
    pub fn are_cousins(&self, node1: NodeId, node2: NodeId) -> bool {
        if self.root.is_none() {
            return false;
        }
        match (self.locate(node1), self.locate(node2)) {
            (Some(first), Some(second)) => {
                debug!("locations: {:?}, {:?}", first, second);
                first.level == second.level && first.parent != second.parent
            }
            _ => false,
        }
    }

    /// Deepest node having both `node1` and `node2` as descendants, where a
    /// node counts as its own descendant. `None` unless both are in the tree.
    #[instrument(level = "debug", skip(self))]
    pub fn lowest_common_ancestor(&self, node1: NodeId, node2: NodeId) -> Option<NodeId> {
        if !self.contains(node1) || !self.contains(node2) {
            return None;
        }
        self.find_lca(self.root, node1.index(), node2.index())
            .map(|idx| self.node_id(idx))
    }

    fn find_lca(&self, slot: Option<Index>, p: Index, q: Index) -> Option<Index> {
        let idx = slot?;
        if idx == p || idx == q {
            return Some(idx);
        }
        let node = self.arena.get(idx)?;
        let left = self.find_lca(node.left, p, q);
        let right = self.find_lca(node.right, p, q);
        match (left, right) {
            // targets found in disjoint subtrees
            (Some(_), Some(_)) => Some(idx),
            (left, right) => left.or(right),
        }
    }

    /// Whether `id` belongs to this tree and is reachable from the root.
    pub fn contains(&self, id: NodeId) -> bool {
        self.locate(id).is_some()
    }

    fn locate(&self, target: NodeId) -> Option<Location> {
        let target = self.resolve(target)?;
        self.find_level_and_parent(self.root, target, 0, None)
    }

    fn find_level_and_parent(
        &self,
        slot: Option<Index>,
        target: Index,
        level: usize,
        parent: Option<Index>,
    ) -> Option<Location> {
        let idx = slot?;
        if idx == target {
            return Some(Location { level, parent });
        }
        let node = self.arena.get(idx)?;
        self.find_level_and_parent(node.left, target, level + 1, Some(idx))
            .or_else(|| self.find_level_and_parent(node.right, target, level + 1, Some(idx)))
    }
}

/// Structural equality: same shape and same values, handles ignored.
impl PartialEq for BinaryTree {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self.root, other.root)];
        while let Some((a, b)) = stack.pop() {
            match (self.node_at(a), other.node_at(b)) {
                (None, None) => {}
                (Some(a), Some(b)) if a.value == b.value => {
                    stack.push((a.left, b.left));
                    stack.push((a.right, b.right));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for BinaryTree {}
