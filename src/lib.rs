//! In-memory N-ary and binary trees.
//!
//! Both trees keep their nodes in a generational arena and hand out
//! [`NodeId`] handles that only resolve in the tree that issued them.
//! Queries never fail: an empty tree answers with 0, `None` or `false`.

pub mod binary_tree;
pub mod builder;
pub mod cli;
pub mod codec;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod node_id;
pub mod tree;
pub mod tree_queue;
pub mod tree_stack;
pub mod tree_traits;
pub mod util;

pub use binary_tree::{BinaryTree, BinaryTreeNode, Side};
pub use builder::TreeBuilder;
pub use config::{Settings, Traversal};
pub use errors::{SettingsError, TreeError, TreeResult};
pub use node_id::{NodeId, TreeId};
pub use tree::{Tree, TreeNode};
pub use tree_traits::{LowerBound, TreeNodeConvert};
