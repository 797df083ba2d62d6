use std::path::PathBuf;

use thiserror::Error;

use crate::binary_tree::Side;
use crate::node_id::NodeId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Tree already has a root node")]
    RootExists,

    #[error("{side} child slot is already occupied")]
    SlotOccupied { side: Side },

    #[error("Serialized tree must be wrapped in '[' and ']'")]
    MissingBrackets,

    #[error("Invalid token at position {position}: '{token}'")]
    InvalidToken { position: usize, token: String },

    #[error("Serialized tree ended early, expected token at position {position}")]
    UnexpectedEnd { position: usize },

    #[error("Unexpected trailing token at position {position}")]
    TrailingTokens { position: usize },

    #[error("Got {values} values but {parents} parent entries")]
    LengthMismatch { values: usize, parents: usize },

    #[error("No root node: every node has a parent")]
    NoRoot,

    #[error("Multiple root nodes: {first} and {second}")]
    MultipleRoots { first: usize, second: usize },

    #[error("Invalid parent {parent} for node {node}")]
    InvalidParent { node: usize, parent: usize },

    #[error("Cycle detected in parent relation at node: {0}")]
    CycleDetected(usize),
}

pub type TreeResult<T> = Result<T, TreeError>;

/// Errors raised while loading layered settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid environment override: {message}")]
    Env { message: String },

    #[error("Failed to serialize settings: {0}")]
    Serialize(String),
}
