//! Command dispatch: one function per subcommand.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::binary_tree::BinaryTree;
use crate::builder::TreeBuilder;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{Settings, Traversal};
use crate::node_id::NodeId;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config_file.as_deref())?;
    if let Some(traversal) = cli.traversal {
        settings.traversal = traversal;
    }
    debug!("settings: {:?}", settings);

    match &cli.command {
        Some(Commands::Depth { tree }) => _depth(tree, &settings),
        Some(Commands::MaxSum { tree }) => _max_sum(tree, &settings),
        Some(Commands::NextLarger { tree, bound }) => _next_larger(tree, *bound),
        Some(Commands::Cousins { tree, a, b }) => _cousins(tree, *a, *b),
        Some(Commands::Lca { tree, a, b }) => _lca(tree, *a, *b),
        Some(Commands::Show { tree }) => _show(tree, &settings),
        Some(Commands::Roundtrip { tree }) => _roundtrip(tree),
        Some(Commands::Nary {
            values,
            parents,
            greater_than,
        }) => _nary(values, parents, *greater_than),
        Some(Commands::Config { command }) => _config(command, &settings),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

fn parse_tree(text: &str) -> CliResult<BinaryTree> {
    Ok(text.parse::<BinaryTree>()?)
}

#[instrument]
fn _depth(tree: &str, settings: &Settings) -> CliResult<()> {
    let tree = parse_tree(tree)?;
    let (min, max) = match settings.traversal {
        Traversal::Recursive => (tree.min_depth(), tree.max_depth()),
        Traversal::Iterative => (tree.min_depth_iterative(), tree.max_depth_iterative()),
    };
    output::field("min", &min);
    output::field("max", &max);
    output::field("leaf", &tree.min_leaf_depth());
    Ok(())
}

#[instrument]
fn _max_sum(tree: &str, settings: &Settings) -> CliResult<()> {
    let tree = parse_tree(tree)?;
    let sum = match settings.traversal {
        Traversal::Recursive => tree.max_sum(),
        Traversal::Iterative => tree.max_sum_iterative(),
    };
    output::info(&sum);
    Ok(())
}

#[instrument]
fn _next_larger(tree: &str, bound: f64) -> CliResult<()> {
    let tree = parse_tree(tree)?;
    match tree.next_larger(bound) {
        Some(value) => output::info(&value),
        None => output::info("none"),
    }
    Ok(())
}

fn resolve(tree: &BinaryTree, position: usize) -> CliResult<NodeId> {
    tree.node_at_preorder(position).ok_or_else(|| {
        CliError::InvalidArgs(format!(
            "no node at position {position}, tree has {} nodes",
            tree.len()
        ))
    })
}

#[instrument]
fn _cousins(tree: &str, a: usize, b: usize) -> CliResult<()> {
    let tree = parse_tree(tree)?;
    let (a, b) = (resolve(&tree, a)?, resolve(&tree, b)?);
    output::info(&tree.are_cousins(a, b));
    Ok(())
}

#[instrument]
fn _lca(tree: &str, a: usize, b: usize) -> CliResult<()> {
    let tree = parse_tree(tree)?;
    let (a, b) = (resolve(&tree, a)?, resolve(&tree, b)?);
    match tree.lowest_common_ancestor(a, b) {
        Some(lca) => {
            if let Some(value) = tree.value(lca) {
                output::field("value", &value);
            }
            if let Some(position) = tree.preorder_position(lca) {
                output::field("position", &position);
            }
        }
        None => output::info("none"),
    }
    Ok(())
}

#[instrument]
fn _show(tree: &str, settings: &Settings) -> CliResult<()> {
    let tree = parse_tree(tree)?;
    output::info(&tree.render(&settings.empty_marker));
    Ok(())
}

#[instrument]
fn _roundtrip(tree: &str) -> CliResult<()> {
    output::info(&parse_tree(tree)?);
    Ok(())
}

#[instrument]
fn _nary(values: &[i64], parents: &[i64], greater_than: Option<f64>) -> CliResult<()> {
    let tree = TreeBuilder::new().build_from_parent_indices(values, parents)?;
    output::header("tree");
    output::info(&tree.to_tree_string());
    output::field("sum", &tree.sum_values());
    output::field("evens", &tree.count_evens());
    if let Some(bound) = greater_than {
        output::field(&format!("greater than {bound}"), &tree.num_greater(bound));
    }
    Ok(())
}

#[instrument]
fn _config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
