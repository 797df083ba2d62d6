use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};
use crate::node_id::NodeId;
use crate::tree::Tree;

/// Builds an N-ary [`Tree`] from a flat parent array.
///
/// Node `i` holds `values[i]` and hangs below node `parents[i]`; exactly one
/// entry is `None` and becomes the root. Children keep the order in which
/// they appear in the input.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    relationship_cache: HashMap<usize, Vec<usize>>,
    visited_nodes: HashSet<usize>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build_from_parents(
        &mut self,
        values: &[i64],
        parents: &[Option<usize>],
    ) -> TreeResult<Tree> {
        if values.len() != parents.len() {
            return Err(TreeError::LengthMismatch {
                values: values.len(),
                parents: parents.len(),
            });
        }
        if values.is_empty() {
            return Ok(Tree::new());
        }

        let root = self.scan_parents(parents)?;
        let tree = self.build_tree(root, values)?;

        // Every node has one parent, so anything not reached from the root
        // sits on (or hangs off) a cycle.
        if let Some(node) = (0..values.len()).find(|node| !self.visited_nodes.contains(node)) {
            return Err(TreeError::CycleDetected(node));
        }
        Ok(tree)
    }

    /// Same as [`TreeBuilder::build_from_parents`] with negative parents
    /// marking the root, the usual encoding of parent arrays.
    pub fn build_from_parent_indices(&mut self, values: &[i64], parents: &[i64]) -> TreeResult<Tree> {
        let parents: Vec<Option<usize>> = parents
            .iter()
            .map(|&parent| usize::try_from(parent).ok())
            .collect();
        self.build_from_parents(values, &parents)
    }

    /// Fills the relationship cache and returns the root node.
    #[instrument(level = "trace", skip(self))]
    fn scan_parents(&mut self, parents: &[Option<usize>]) -> TreeResult<usize> {
        self.relationship_cache.clear();
        let mut root: Option<usize> = None;

        for (node, parent) in parents.iter().enumerate() {
            match *parent {
                None => {
                    if let Some(first) = root {
                        return Err(TreeError::MultipleRoots { first, second: node });
                    }
                    root = Some(node);
                }
                Some(parent) if parent >= parents.len() || parent == node => {
                    return Err(TreeError::InvalidParent { node, parent });
                }
                Some(parent) => {
                    self.relationship_cache.entry(parent).or_default().push(node);
                }
            }
        }

        root.ok_or(TreeError::NoRoot)
    }

    #[instrument(level = "trace", skip(self, values))]
    fn build_tree(&mut self, root: usize, values: &[i64]) -> TreeResult<Tree> {
        let mut tree = Tree::new();
        let mut stack: Vec<(usize, Option<NodeId>)> = vec![(root, None)];
        self.visited_nodes.clear();

        while let Some((current, parent_idx)) = stack.pop() {
            if !self.visited_nodes.insert(current) {
                return Err(TreeError::CycleDetected(current));
            }

            let current_idx = tree.insert_node(values[current], parent_idx)?;

            if let Some(children) = self.relationship_cache.get(&current) {
                // reversed so the first child is inserted first
                for &child in children.iter().rev() {
                    stack.push((child, Some(current_idx)));
                }
            }
        }

        debug!("built tree with {} nodes", tree.len());
        Ok(tree)
    }
}
