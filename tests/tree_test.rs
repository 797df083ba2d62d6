//! Aggregate queries on the N-ary tree

use rstest::{fixture, rstest};

use treekit::util::testing;
use treekit::{Tree, TreeBuilder};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

//          1
//       /  |  \
//      2   3   4
//     / \      |
//    5   6     -7
//              |
//              0
#[fixture]
fn sample() -> Tree {
    let mut tree = Tree::new();
    let n1 = tree.insert_node(1, None).unwrap();
    let n2 = tree.insert_node(2, Some(n1)).unwrap();
    tree.insert_node(3, Some(n1)).unwrap();
    let n4 = tree.insert_node(4, Some(n1)).unwrap();
    tree.insert_node(5, Some(n2)).unwrap();
    tree.insert_node(6, Some(n2)).unwrap();
    let n7 = tree.insert_node(-7, Some(n4)).unwrap();
    tree.insert_node(0, Some(n7)).unwrap();
    tree
}

// ============================================================
// sum_values
// ============================================================

#[rstest]
fn given_tree_when_summing_then_adds_every_value(sample: Tree) {
    assert_eq!(sample.sum_values(), 1 + 2 + 3 + 4 + 5 + 6 - 7);
}

#[rstest]
fn given_tree_when_summing_then_matches_level_order_sum(sample: Tree) {
    let by_level: i64 = sample.level_order().map(|(_, node, _)| node.value).sum();
    assert_eq!(sample.sum_values(), by_level);
}

#[test]
fn given_empty_tree_when_aggregating_then_returns_zero() {
    let tree = Tree::new();
    assert_eq!(tree.sum_values(), 0);
    assert_eq!(tree.count_evens(), 0);
    assert_eq!(tree.num_greater(-1000), 0);
    assert!(tree.is_empty());
}

#[rstest]
#[case(&[i64::MAX, 1], i64::MAX)]
#[case(&[i64::MAX, 1, -5], i64::MAX - 4)]
#[case(&[i64::MIN, -1], i64::MIN)]
#[case(&[i64::MIN, i64::MAX, 1], 0)]
fn given_values_near_i64_limits_when_summing_then_no_overflow(
    #[case] values: &[i64],
    #[case] expected: i64,
) {
    let mut tree = Tree::new();
    let root = tree.insert_node(values[0], None).unwrap();
    for &value in &values[1..] {
        tree.insert_node(value, Some(root)).unwrap();
    }
    assert_eq!(tree.sum_values(), expected);
}

#[test]
fn given_single_node_when_summing_then_returns_its_value() {
    let mut tree = Tree::new();
    tree.insert_node(-42, None).unwrap();
    assert_eq!(tree.sum_values(), -42);
}

// ============================================================
// count_evens
// ============================================================

#[rstest]
fn given_tree_when_counting_evens_then_includes_zero(sample: Tree) {
    // 2, 4, 6, 0
    assert_eq!(sample.count_evens(), 4);
}

#[test]
fn given_negative_values_when_counting_evens_then_uses_remainder() {
    let mut tree = Tree::new();
    let root = tree.insert_node(-4, None).unwrap();
    tree.insert_node(-3, Some(root)).unwrap();
    tree.insert_node(-2, Some(root)).unwrap();
    tree.insert_node(-1, Some(root)).unwrap();
    assert_eq!(tree.count_evens(), 2);
}

#[rstest]
fn given_tree_when_counting_evens_then_matches_filter(sample: Tree) {
    let expected = sample.iter().filter(|(_, node)| node.value % 2 == 0).count();
    assert_eq!(sample.count_evens(), expected);
}

// ============================================================
// num_greater
// ============================================================

#[rstest]
#[case(0.0, 6)]
#[case(3.0, 3)]
#[case(3.5, 3)]
#[case(6.0, 0)]
#[case(-7.0, 7)]
#[case(-7.5, 8)]
fn given_bound_when_counting_greater_then_counts_strictly_larger(
    sample: Tree,
    #[case] bound: f64,
    #[case] expected: usize,
) {
    assert_eq!(sample.num_greater(bound), expected);
}

#[rstest]
fn given_integer_bound_when_counting_greater_then_accepts_plain_literal(sample: Tree) {
    assert_eq!(sample.num_greater(4), 2);
    assert_eq!(sample.num_greater(4_i64), 2);
    assert_eq!(sample.num_greater(i64::MIN), 8);
    assert_eq!(sample.num_greater(u64::MAX), 0);
}

#[test]
fn given_values_above_two_pow_53_when_counting_greater_then_compares_exactly() {
    let two_pow_53 = 9_007_199_254_740_992_i64;
    let mut tree = Tree::new();
    let root = tree.insert_node(two_pow_53, None).unwrap();
    tree.insert_node(two_pow_53 + 1, Some(root)).unwrap();
    tree.insert_node(i64::MAX, Some(root)).unwrap();

    assert_eq!(tree.num_greater(two_pow_53 as f64), 2);
    assert_eq!(tree.num_greater(two_pow_53), 2);
    assert_eq!(tree.num_greater(i64::MAX - 1), 1);
    assert_eq!(tree.num_greater(i64::MAX as f64), 0);
}

#[rstest]
fn given_cloned_tree_when_using_original_handles_then_rejected(sample: Tree) {
    let root = sample.root().unwrap();
    let mut copy = sample.clone();
    assert_eq!(copy.sum_values(), sample.sum_values());
    assert_eq!(copy.value(root), None);
    assert!(copy.insert_node(9, Some(root)).is_err());
    assert_eq!(copy.len(), sample.len());
}

// ============================================================
// structure
// ============================================================

#[rstest]
fn given_tree_when_measuring_then_depth_counts_nodes(sample: Tree) {
    assert_eq!(sample.depth(), 4);
    assert_eq!(sample.depth_bfs(), 4);
    assert_eq!(sample.len(), 8);
    assert_eq!(sample.leaf_values(), vec![5, 6, 3, 0]);
}

#[rstest]
fn given_built_tree_when_aggregating_then_matches_manual_tree(sample: Tree) {
    let values = [1, 2, 3, 4, 5, 6, -7, 0];
    let parents = [-1, 0, 0, 0, 1, 1, 3, 6];
    let built = TreeBuilder::new()
        .build_from_parent_indices(&values, &parents)
        .unwrap();

    assert_eq!(built.sum_values(), sample.sum_values());
    assert_eq!(built.count_evens(), sample.count_evens());
    assert_eq!(built.num_greater(2), sample.num_greater(2));
    let built_preorder: Vec<i64> = built.iter().map(|(_, n)| n.value).collect();
    let sample_preorder: Vec<i64> = sample.iter().map(|(_, n)| n.value).collect();
    assert_eq!(built_preorder, sample_preorder);
}
