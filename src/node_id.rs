//! Node handles scoped to the tree that issued them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::Index;

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-wide unique tree identity. Clones get a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

impl TreeId {
    pub(crate) fn next() -> Self {
        TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle of a node: the arena slot plus the tree owning it.
///
/// A handle from another tree (or from a clone's original) never resolves,
/// even when its arena slot happens to be occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: TreeId,
    index: Index,
}

impl NodeId {
    pub(crate) fn new(tree: TreeId, index: Index) -> Self {
        Self { tree, index }
    }

    pub fn tree(&self) -> TreeId {
        self.tree
    }

    pub(crate) fn index(&self) -> Index {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "{}:{}.{}", self.tree.0, slot, generation)
    }
}
