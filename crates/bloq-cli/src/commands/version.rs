//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - call graphs and resource counts for bloqs",
        style("Bloq").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  bloq-ir     Bloqs, signatures, composites and symbolic sizes");
    println!("  bloq-count  Generalizers, call graphs and cost queries");
    println!("  bloq-cli    Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/hiq-lab/bloqcount").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
