//! Pre-order text encoding of [`BinaryTree`].
//!
//! `[v,left...,right...]`: a node's value followed by its left and right
//! subtrees, `null` for an absent child. The empty tree is `[]`.
//! Example: `[2,1,null,null,3,null,null]` is a root 2 with leaves 1 and 3.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::binary_tree::{BinaryTree, Side};
use crate::errors::{TreeError, TreeResult};

pub const NULL_TOKEN: &str = "null";

impl BinaryTree {
    #[instrument(level = "debug", skip(self))]
    pub fn serialize(&self) -> String {
        if self.is_empty() {
            return "[]".to_string();
        }

        let mut tokens = Vec::with_capacity(2 * self.len() + 1);
        let mut stack = vec![self.root_index()];
        while let Some(slot) = stack.pop() {
            match slot.and_then(|idx| self.node(idx)) {
                Some(node) => {
                    tokens.push(node.value.to_string());
                    stack.push(node.right);
                    stack.push(node.left);
                }
                None => tokens.push(NULL_TOKEN.to_string()),
            }
        }
        format!("[{}]", tokens.iter().join(","))
    }

    /// Rebuilds a tree from its [`BinaryTree::serialize`] form.
    ///
    /// Whitespace around tokens is ignored. Anything else that does not fit
    /// the format is rejected with the position of the offending token.
    #[instrument(level = "debug")]
    pub fn deserialize(text: &str) -> TreeResult<Self> {
        let inner = text
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or(TreeError::MissingBrackets)?;

        let mut tree = BinaryTree::new();
        if inner.trim().is_empty() {
            return Ok(tree);
        }

        let mut tokens = inner.split(',').map(str::trim).enumerate();
        let Some((position, token)) = tokens.next() else {
            return Ok(tree);
        };
        let Some(value) = parse_token(position, token)? else {
            // "[null]" is an empty tree as well
            return match tokens.next() {
                Some((position, _)) => Err(TreeError::TrailingTokens { position }),
                None => Ok(tree),
            };
        };

        let root = tree.set_root(value)?;
        // slots still waiting for a token, next one on top
        let mut pending = vec![(root, Side::Right), (root, Side::Left)];
        let mut expected = position + 1;

        while let Some((parent, side)) = pending.pop() {
            let (position, token) = tokens
                .next()
                .ok_or(TreeError::UnexpectedEnd { position: expected })?;
            expected = position + 1;

            if let Some(value) = parse_token(position, token)? {
                let child = tree.insert_child(parent, side, value)?;
                pending.push((child, Side::Right));
                pending.push((child, Side::Left));
            }
        }

        if let Some((position, _)) = tokens.next() {
            return Err(TreeError::TrailingTokens { position });
        }
        debug!("deserialized {} nodes", tree.len());
        Ok(tree)
    }
}

fn parse_token(position: usize, token: &str) -> TreeResult<Option<i64>> {
    if token == NULL_TOKEN {
        return Ok(None);
    }
    token
        .parse::<i64>()
        .map(Some)
        .map_err(|_| TreeError::InvalidToken {
            position,
            token: token.to_string(),
        })
}

impl fmt::Display for BinaryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl FromStr for BinaryTree {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BinaryTree::deserialize(s)
    }
}
