//! Error types for call-graph construction and cost queries.

use bloq_ir::DecomposeError;
use thiserror::Error;

/// Errors that can occur while counting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CountError {
    /// A decomposition failed for a reason other than "this is a leaf".
    #[error(transparent)]
    Decompose(#[from] DecomposeError),

    /// Expanding a bloq led back to itself.
    #[error("Call graph contains a cycle through {0}")]
    CyclicGraph(String),

    /// The generalizer dropped a root bloq.
    #[error("Generalizer dropped the root bloq {0}")]
    RootGeneralizedAway(String),

    /// The bloq is not a node of this call graph.
    #[error("Bloq {0} is not in the call graph")]
    UnknownNode(String),
}

/// Result type for counting operations.
pub type CountResult<T> = Result<T, CountError>;
