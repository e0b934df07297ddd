//! Graph command implementation.

use anyhow::Result;
use console::style;
use tracing::info;

use bloq_count::{CallGraphOptions, build_call_graph, sorted_sigma};

use super::common::{Format, generalizer_chain, parse_format};
use crate::catalog;

/// Execute the graph command.
pub fn execute(
    bloq: &str,
    max_depth: Option<usize>,
    generalizers: &[String],
    format: &str,
) -> Result<()> {
    let format = parse_format(format)?;
    let root = catalog::lookup(bloq)?;
    let chain = generalizer_chain(generalizers)?;
    info!("Building call graph of {root} with generalizers {chain:?}");

    let options = CallGraphOptions {
        max_depth,
        keep: None,
    };
    let graph = build_call_graph(std::slice::from_ref(&root), &options, &chain)?;

    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&graph.to_json())?);
        }
        Format::Text => {
            println!(
                "{} {} ({} nodes, {} edges)\n",
                style("Call graph of").cyan().bold(),
                style(&root).bold(),
                graph.num_nodes(),
                graph.num_edges()
            );
            let text = graph.format_debug_text();
            if text.is_empty() {
                println!("  (no callees)");
            } else {
                println!("{text}");
            }
            println!("\n{}", style("Leaf counts:").cyan().bold());
            for (leaf, count) in sorted_sigma(&graph.root_sigma()) {
                println!("  {:>12}  {leaf}", count.to_string());
            }
        }
    }

    Ok(())
}
