//! Shared helpers for CLI commands.

use anyhow::Result;
use bloq_count::GeneralizerChain;
use bloq_count::generalizer::by_name;

const GENERALIZERS: &[&str] = &[
    "identity",
    "ignore_split_join",
    "ignore_alloc_free",
    "generalize_rotation_angle",
];

/// Output formats understood by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Parse an output format name.
pub fn parse_format(format: &str) -> Result<Format> {
    match format.to_lowercase().as_str() {
        "text" | "txt" => Ok(Format::Text),
        "json" => Ok(Format::Json),
        other => anyhow::bail!("Unknown format: '{other}'. Available: text, json"),
    }
}

/// Chain the named generalizers in the order given. Empty names are skipped.
pub fn generalizer_chain(names: &[String]) -> Result<GeneralizerChain> {
    let mut chain = GeneralizerChain::new();
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let g = by_name(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown generalizer: '{name}'. Available: {}",
                GENERALIZERS.join(", ")
            )
        })?;
        chain.push(g);
    }
    Ok(chain)
}
