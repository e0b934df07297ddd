//! Bloq Intermediate Representation
//!
//! This crate provides the value types that resource counting works on:
//! bloqs, their typed ports, composite bloqs wired from smaller ones, and
//! symbolic sizes for problem instances that have not been fixed yet.
//!
//! # Core Components
//!
//! - **Bloqs**: the [`Bloq`] trait, with [`BloqRef`] as a shared handle that
//!   compares and hashes by value so bloqs can key memo tables
//! - **Signatures**: [`Register`], [`Side`], [`QDType`] and [`Signature`]
//! - **Composites**: [`CompositeBloq`] built through the linearity-checking
//!   [`BloqBuilder`]
//! - **Symbolic sizes**: [`SymbolicInt`] polynomials, [`Shaped`] stand-ins for
//!   arrays, [`ParameterExpression`] angles and the per-build
//!   [`SymbolAllocator`]
//! - **Costs**: [`GateCounts`], the tally a leaf bloq reports
//! - **Gates**: primitive, rotation, bookkeeping and data-loading bloqs in
//!   [`gates`]
//!
//! # Example: Defining a Composite Bloq
//!
//! ```rust
//! use bloq_ir::gates::{CNOT, TGate};
//! use bloq_ir::{Bloq, BloqBuilder, BloqCount, CompositeBloq, DecomposeResult};
//! use bloq_ir::{QDType, Signature};
//! use std::fmt;
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! struct TwoT;
//!
//! impl fmt::Display for TwoT {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "TwoT")
//!     }
//! }
//!
//! impl Bloq for TwoT {
//!     fn signature(&self) -> Signature {
//!         Signature::build(&[("a", QDType::QBit), ("b", QDType::QBit)])
//!     }
//!
//!     fn decompose_bloq(&self) -> DecomposeResult<CompositeBloq> {
//!         let (mut bb, regs) = BloqBuilder::from_signature(self.signature());
//!         let build = || -> bloq_ir::BloqResult<CompositeBloq> {
//!             let a = bb.add(TGate::default(), &[("q", regs["a"].clone())])?;
//!             let b = bb.add(TGate::default(), &[("q", regs["b"].clone())])?;
//!             let out = bb.add(CNOT, &[("ctrl", a["q"].clone()), ("target", b["q"].clone())])?;
//!             bb.finalize(&[("a", out["ctrl"].clone()), ("b", out["target"].clone())])
//!         };
//!         build().map_err(|source| bloq_ir::DecomposeError::Failed {
//!             bloq: self.to_string(),
//!             source,
//!         })
//!     }
//! }
//!
//! let counts = TwoT.decompose_bloq().unwrap().callee_counts();
//! assert_eq!(counts[0], BloqCount::of(TGate::default(), 2));
//! assert_eq!(counts[1], BloqCount::of(CNOT, 1));
//! ```

pub mod allocator;
pub mod bloq;
pub mod composite;
pub mod error;
pub mod gate_counts;
pub mod gates;
pub mod parameter;
pub mod shaped;
pub mod signature;
pub mod symbolic;

pub use allocator::SymbolAllocator;
pub use bloq::{Bloq, BloqCount, BloqEq, BloqRef};
pub use composite::{BinstRef, BloqBuilder, BloqInstance, CompositeBloq, Connection, Soquet};
pub use error::{BloqError, BloqResult, DecomposeError, DecomposeResult};
pub use gate_counts::GateCounts;
pub use parameter::ParameterExpression;
pub use shaped::{Shaped, Symbolic};
pub use signature::{QDType, Register, Side, Signature};
pub use symbolic::{Monomial, SymbolicInt};
