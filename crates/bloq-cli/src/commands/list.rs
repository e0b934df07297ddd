//! List command implementation.

use console::style;

use crate::catalog::ENTRIES;

/// Execute the list command.
pub fn execute() {
    println!("{} Available bloqs:\n", style("Bloq").cyan().bold());
    let width = ENTRIES.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in ENTRIES {
        println!(
            "  {}  {}  {}",
            style(format!("{:width$}", entry.name)).bold(),
            entry.about,
            style(entry.bloq()).dim(),
        );
    }
}
