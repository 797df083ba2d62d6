//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::Traversal;

/// Query N-ary and binary trees given in their serialized form
#[derive(Parser, Debug)]
#[command(name = "treekit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file, layered over the global config
    #[arg(short = 'c', long = "config", global = true, value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Traversal strategy, overrides the configured one
    #[arg(long, global = true, value_enum)]
    pub traversal: Option<Traversal>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Minimum and maximum depth of a binary tree
    Depth {
        /// Serialized binary tree, e.g. "[2,1,null,null,3,null,null]"
        tree: String,
    },

    /// Largest path sum of a binary tree
    MaxSum {
        /// Serialized binary tree
        tree: String,
    },

    /// Smallest value greater than a bound
    NextLarger {
        /// Serialized binary tree
        tree: String,
        /// Exclusive lower bound
        #[arg(allow_negative_numbers = true)]
        bound: f64,
    },

    /// Whether two nodes are cousins
    Cousins {
        /// Serialized binary tree
        tree: String,
        /// Pre-order position of the first node
        a: usize,
        /// Pre-order position of the second node
        b: usize,
    },

    /// Lowest common ancestor of two nodes
    Lca {
        /// Serialized binary tree
        tree: String,
        /// Pre-order position of the first node
        a: usize,
        /// Pre-order position of the second node
        b: usize,
    },

    /// Draw a binary tree
    Show {
        /// Serialized binary tree
        tree: String,
    },

    /// Parse and serialize again
    Roundtrip {
        /// Serialized binary tree
        tree: String,
    },

    /// Aggregates of an N-ary tree given as a parent array
    Nary {
        /// Node values
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        values: Vec<i64>,
        /// Parent position per node, -1 for the root
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        parents: Vec<i64>,
        /// Also count values greater than this bound
        #[arg(long, allow_negative_numbers = true)]
        greater_than: Option<f64>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings as TOML
    Show,
    /// Print a commented config template
    Template,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nary_lists() {
        let cli = Cli::parse_from([
            "treekit", "nary", "--values", "1,-2,3", "--parents", "-1,0,0",
        ]);
        match cli.command {
            Some(Commands::Nary {
                values, parents, ..
            }) => {
                assert_eq!(values, vec![1, -2, 3]);
                assert_eq!(parents, vec![-1, 0, 0]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from(["treekit", "-dd", "--traversal", "iterative", "depth", "[]"]);
        assert_eq!(cli.debug, 2);
        assert_eq!(cli.traversal, Some(Traversal::Iterative));
    }
}
