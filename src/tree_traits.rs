use std::fmt;

use generational_arena::Index;
use termtree::Tree as DisplayTree;
use tracing::instrument;

use crate::binary_tree::BinaryTree;
use crate::tree::Tree;

/// Marker printed for the missing sibling of a single child.
pub const DEFAULT_EMPTY_MARKER: &str = "∅";

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> DisplayTree<String>;
}

/// Exclusive lower bound for comparing against `i64` node values.
///
/// Comparisons are exact over the whole `i64` range: node values are never
/// converted to floating point.
pub trait LowerBound: Copy + fmt::Debug {
    /// Whether `value` is strictly greater than the bound.
    fn is_exceeded_by(self, value: i64) -> bool;
}

impl LowerBound for i64 {
    fn is_exceeded_by(self, value: i64) -> bool {
        value > self
    }
}

impl LowerBound for u64 {
    fn is_exceeded_by(self, value: i64) -> bool {
        i128::from(value) > i128::from(self)
    }
}

macro_rules! impl_lower_bound_via_i64 {
    ($($t:ty),*) => {
        $(
            impl LowerBound for $t {
                fn is_exceeded_by(self, value: i64) -> bool {
                    i64::from(self).is_exceeded_by(value)
                }
            }
        )*
    };
}

impl_lower_bound_via_i64!(i8, i16, i32, u8, u16, u32);

/// 2^63, the first float above every `i64`.
const I64_END: f64 = 9_223_372_036_854_775_808.0;

impl LowerBound for f64 {
    /// For an integer `value`, `value > bound` iff `value > floor(bound)`.
    /// NaN is exceeded by nothing.
    fn is_exceeded_by(self, value: i64) -> bool {
        if self.is_nan() {
            return false;
        }
        let floor = self.floor();
        if floor >= I64_END {
            false
        } else if floor < -I64_END {
            true
        } else {
            // integral and inside the i64 range, so the cast is exact
            value > floor as i64
        }
    }
}

impl LowerBound for f32 {
    fn is_exceeded_by(self, value: i64) -> bool {
        f64::from(self).is_exceeded_by(value)
    }
}

impl TreeNodeConvert for Tree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> DisplayTree<String> {
        fn build_tree(tree: &Tree, node_idx: Index, parent_tree: &mut DisplayTree<String>) {
            if let Some(node) = tree.node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = tree.node(child_idx) {
                        let mut child_tree = DisplayTree::new(child.value.to_string());
                        build_tree(tree, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self
            .root_index()
            .and_then(|root| self.node(root).map(|node| (root, node)))
        {
            Some((root_idx, root)) => {
                let mut display = DisplayTree::new(root.value.to_string());
                build_tree(self, root_idx, &mut display);
                display
            }
            None => DisplayTree::new("Empty tree".to_string()),
        }
    }
}

impl TreeNodeConvert for BinaryTree {
    fn to_tree_string(&self) -> DisplayTree<String> {
        self.render(DEFAULT_EMPTY_MARKER)
    }
}

impl BinaryTree {
    /// Renders the tree with `termtree`.
    ///
    /// Leaves have no entries. A node with a single child also lists the
    /// missing slot as `empty_marker`, so left and right stay distinguishable.
    #[instrument(level = "debug", skip(self))]
    pub fn render(&self, empty_marker: &str) -> DisplayTree<String> {
        fn build(
            tree: &BinaryTree,
            slot: Option<Index>,
            empty_marker: &str,
        ) -> DisplayTree<String> {
            let Some(node) = slot.and_then(|idx| tree.node(idx)) else {
                return DisplayTree::new(empty_marker.to_string());
            };
            let display = DisplayTree::new(node.value.to_string());
            if node.is_leaf() {
                return display;
            }
            display.with_leaves([
                build(tree, node.left, empty_marker),
                build(tree, node.right, empty_marker),
            ])
        }

        if self.is_empty() {
            DisplayTree::new("Empty tree".to_string())
        } else {
            build(self, self.root_index(), empty_marker)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nary_rendering_lists_children() {
        let mut tree = Tree::new();
        let root = tree.insert_node(1, None).unwrap();
        tree.insert_node(2, Some(root)).unwrap();
        tree.insert_node(3, Some(root)).unwrap();

        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1");
        assert!(lines[1].ends_with("2"));
        assert!(lines[2].ends_with("3"));
    }

    #[test]
    fn test_binary_rendering_marks_missing_sibling() {
        let mut tree = BinaryTree::new();
        let root = tree.set_root(1).unwrap();
        tree.insert_right(root, 3).unwrap();

        let rendered = tree.render("-").to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with("-"));
        assert!(lines[2].ends_with("3"));
    }

    #[test]
    fn test_integer_bounds_compare_exactly() {
        assert!(5_i64.is_exceeded_by(6));
        assert!(!5_i64.is_exceeded_by(5));
        assert!((i64::MAX - 1).is_exceeded_by(i64::MAX));
        assert!(!u64::MAX.is_exceeded_by(i64::MAX));
        assert!(3_u8.is_exceeded_by(4));
        assert!((-1_i32).is_exceeded_by(0));
    }

    #[test]
    fn test_float_bounds_compare_without_precision_loss() {
        let two_pow_53 = 9_007_199_254_740_992_i64;
        assert!((two_pow_53 as f64).is_exceeded_by(two_pow_53 + 1));
        assert!(!(two_pow_53 as f64).is_exceeded_by(two_pow_53));
        assert!(4.5_f64.is_exceeded_by(5));
        assert!(!4.5_f64.is_exceeded_by(4));
        assert!((-0.5_f64).is_exceeded_by(0));
        assert!(!(-0.5_f64).is_exceeded_by(-1));
        assert!(!I64_END.is_exceeded_by(i64::MAX));
        assert!((-I64_END).is_exceeded_by(i64::MIN + 1));
        assert!(!(-I64_END).is_exceeded_by(i64::MIN));
        assert!(f64::NEG_INFINITY.is_exceeded_by(i64::MIN));
        assert!(!f64::INFINITY.is_exceeded_by(i64::MAX));
        assert!(!f64::NAN.is_exceeded_by(0));
        assert!(2.5_f32.is_exceeded_by(3));
    }

    #[test]
    fn test_empty_trees_render_placeholder() {
        assert_eq!(Tree::new().to_tree_string().to_string().trim(), "Empty tree");
        assert_eq!(
            BinaryTree::new().to_tree_string().to_string().trim(),
            "Empty tree"
        );
    }
}
