//! Error types for the IR crate.

use crate::signature::Side;
use thiserror::Error;

/// Errors raised while building signatures and composite bloqs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BloqError {
    /// Two registers on the same side share a name.
    #[error("Duplicate register '{name}' on the {side:?} side")]
    DuplicateRegister {
        /// The repeated register name.
        name: String,
        /// Side on which the name was repeated.
        side: Side,
    },

    /// A register name was not found in a signature.
    #[error("Register '{register}' not found{}", format_bloq_context(.bloq))]
    UnknownRegister {
        /// The missing register name.
        register: String,
        /// Optional bloq name for context.
        bloq: Option<String>,
    },

    /// A left register of an added bloq was not supplied.
    #[error("Register '{register}' of '{bloq}' was not connected")]
    MissingRegister {
        /// The unconnected register.
        register: String,
        /// Display name of the bloq being added.
        bloq: String,
    },

    /// A soquet was used more than once or does not exist.
    #[error("Soquet {0} is not available (already consumed or never produced)")]
    SoquetUnavailable(String),

    /// The wrong number of soquets was supplied for a shaped register.
    #[error("Register '{register}' expects {expected} soquets, got {got}")]
    SoquetCountMismatch {
        /// Register name.
        register: String,
        /// Expected number of soquets.
        expected: usize,
        /// Supplied number of soquets.
        got: usize,
    },

    /// Connected registers disagree on their concrete bit width.
    #[error("Cannot connect {from} ({from_bits} bits) to {to} ({to_bits} bits)")]
    DtypeMismatch {
        /// Producer soquet.
        from: String,
        /// Consumer soquet.
        to: String,
        /// Producer width.
        from_bits: i64,
        /// Consumer width.
        to_bits: i64,
    },

    /// Soquets were left unconsumed when the composite was finalized.
    #[error("Dangling soquets at finalize: {}", .0.join(", "))]
    DanglingSoquets(Vec<String>),

    /// The composite's wiring contains a cycle.
    #[error("Invalid composite structure: {0}")]
    InvalidComposite(String),

    /// A register shape is symbolic where a concrete size is required.
    #[error("Register '{0}' has a symbolic shape")]
    SymbolicShape(String),
}

/// Helper function to format optional bloq context.
#[allow(clippy::ref_option)]
fn format_bloq_context(bloq: &Option<String>) -> String {
    match bloq {
        Some(name) => format!(" (bloq: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type BloqResult<T> = Result<T, BloqError>;

/// Outcome of asking a bloq for its decomposition or callee counts.
///
/// `NotImplemented` and `Symbolic` mean "treat this bloq as a leaf". Only
/// `Failed` is a hard error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecomposeError {
    /// The bloq has no decomposition (typically a primitive gate).
    #[error("{0} has no decomposition")]
    NotImplemented(String),

    /// The decomposition needs concrete values for symbolic parameters.
    #[error("Cannot decompose {bloq}: {reason}")]
    Symbolic {
        /// Display name of the bloq.
        bloq: String,
        /// Which parameter blocked the decomposition.
        reason: String,
    },

    /// Building the decomposition failed.
    #[error("Decomposition of {bloq} failed: {source}")]
    Failed {
        /// Display name of the bloq.
        bloq: String,
        /// Underlying builder error.
        #[source]
        source: BloqError,
    },
}

impl DecomposeError {
    /// Whether the caller should stop here and treat the bloq as a leaf.
    pub fn is_leaf_signal(&self) -> bool {
        matches!(
            self,
            DecomposeError::NotImplemented(_) | DecomposeError::Symbolic { .. }
        )
    }

    /// Shorthand for `NotImplemented` from any displayable bloq.
    pub fn not_implemented(bloq: &impl std::fmt::Display) -> Self {
        DecomposeError::NotImplemented(bloq.to_string())
    }

    /// Shorthand for `Symbolic`.
    pub fn symbolic(bloq: &impl std::fmt::Display, reason: impl Into<String>) -> Self {
        DecomposeError::Symbolic {
            bloq: bloq.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for decomposition hooks.
pub type DecomposeResult<T> = Result<T, DecomposeError>;
