//! Bloq Command-Line Interface
//!
//! Builds call graphs and resource counts for a catalogue of bloqs.
//!
//! ```text
//! bloq list
//! bloq graph qrom-symbolic --max-depth 2
//! bloq cost rotate-each -g generalize_rotation_angle --format json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod catalog;
mod commands;

use commands::{cost, graph, list, version};

/// Bloq - call graphs and resource counts for quantum programs
#[derive(Parser)]
#[command(name = "bloq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and print the call graph of a bloq
    Graph {
        /// Bloq name (see `bloq list`)
        bloq: String,

        /// Stop expanding at this depth
        #[arg(short = 'd', long, env = "BLOQ_MAX_DEPTH")]
        max_depth: Option<usize>,

        /// Comma-separated generalizers applied in order
        #[arg(short, long, env = "BLOQ_GENERALIZERS", value_delimiter = ',')]
        generalizers: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Compute a cost of a bloq
    Cost {
        /// Bloq name (see `bloq list`)
        bloq: String,

        /// Cost key (gates, t-count)
        #[arg(short, long, default_value = "gates")]
        key: String,

        /// Comma-separated generalizers applied in order
        #[arg(short, long, env = "BLOQ_GENERALIZERS", value_delimiter = ',')]
        generalizers: Vec<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the bloqs in the catalogue
    List,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Graph {
            bloq,
            max_depth,
            generalizers,
            format,
        } => graph::execute(&bloq, max_depth, &generalizers, &format),

        Commands::Cost {
            bloq,
            key,
            generalizers,
            format,
        } => cost::execute(&bloq, &key, &generalizers, &format),

        Commands::List => {
            list::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_graph() {
        let cli = Cli::try_parse_from(["bloq", "graph", "qrom", "-d", "2", "-g", "a,b"]).unwrap();
        match cli.command {
            Commands::Graph {
                bloq,
                max_depth,
                generalizers,
                format,
            } => {
                assert_eq!(bloq, "qrom");
                assert_eq!(max_depth, Some(2));
                assert_eq!(generalizers, ["a", "b"]);
                assert_eq!(format, "text");
            }
            _ => panic!("expected graph"),
        }
    }

    #[test]
    fn test_parse_cost_defaults() {
        let cli = Cli::try_parse_from(["bloq", "-vv", "cost", "and"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Cost { ref key, .. } if key == "gates"));
    }

    #[test]
    fn test_graph_requires_bloq() {
        assert!(Cli::try_parse_from(["bloq", "graph"]).is_err());
    }
}
