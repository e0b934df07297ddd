//! Cost command implementation.

use anyhow::Result;
use console::style;
use serde_json::json;
use tracing::info;

use bloq_count::{QecGatesCost, TCount, get_cost_value};
use bloq_ir::SymbolicInt;

use super::common::{Format, generalizer_chain, parse_format};
use crate::catalog;

/// Execute the cost command.
pub fn execute(bloq: &str, key: &str, generalizers: &[String], format: &str) -> Result<()> {
    let format = parse_format(format)?;
    let root = catalog::lookup(bloq)?;
    let chain = generalizer_chain(generalizers)?;
    info!("Costing {root} by {key} with generalizers {chain:?}");

    match key.to_lowercase().as_str() {
        "gates" | "gate_counts" | "qec" => {
            let counts = get_cost_value(&root, &QecGatesCost, &chain)?;
            let t = counts.total_t_count();
            match format {
                Format::Json => {
                    let out = json!({
                        "bloq": root.to_string(),
                        "gate_counts": counts,
                        "total_t_count": t,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Text => {
                    println!("{} {}\n", style("Gate counts of").cyan().bold(), style(&root).bold());
                    for (name, n) in counts.fields() {
                        if !n.is_zero() {
                            println!("  {name:<12} {n}");
                        }
                    }
                    print_total("T-count", &t);
                }
            }
        }
        "t" | "t-count" | "t_count" => {
            let t = get_cost_value(&root, &TCount, &chain)?;
            match format {
                Format::Json => {
                    let out = json!({ "bloq": root.to_string(), "t_count": t });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Text => print_total(&format!("T-count of {root}"), &t),
            }
        }
        other => anyhow::bail!("Unknown cost key: '{other}'. Available: gates, t-count"),
    }

    Ok(())
}

fn print_total(label: &str, value: &SymbolicInt) {
    if value.is_symbolic() {
        println!(
            "\n{} {}  ({})",
            style(label).bold(),
            value,
            style(format!("O({})", value.big_o())).dim()
        );
    } else {
        println!("\n{} {}", style(label).bold(), value);
    }
}
