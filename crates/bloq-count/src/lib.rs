//! Call graphs and resource counts for bloqs.
//!
//! Given a root bloq, this crate expands it level by level into the bloqs
//! it calls, merges callees that a [`Generalizer`] says are equivalent, and
//! aggregates leaf counts bottom-up. Every distinct bloq is decomposed at
//! most once per build, so cost stays linear in the size of the call graph
//! even when the number of root-to-leaf paths is exponential.
//!
//! # Overview
//!
//! - [`build_call_graph`] / [`get_bloq_call_graph`] / [`CallGraphBuilder`]:
//!   the call graph with per-node leaf counts ([`Sigma`])
//! - [`get_bloq_callee_counts`] and [`build_cbloq_call_graph`]: one level
//!   of callees
//! - [`get_cost_value`] and [`query_costs`]: typed costs such as
//!   [`GateCounts`](bloq_ir::GateCounts) ([`QecGatesCost`]) or the T-count
//!   ([`TCount`])
//!
//! # Example: T-count of a QROM of unknown length
//!
//! ```rust
//! use bloq_count::{TCount, get_cost_value, identity};
//! use bloq_ir::gates::Qrom;
//! use bloq_ir::BloqRef;
//!
//! let qrom = BloqRef::new(Qrom::symbolic("N", "s", 8));
//! let t = get_cost_value(&qrom, &TCount, &identity()).unwrap();
//! assert_eq!(t.to_string(), "4*N - 4");
//! ```
//!
//! # Dropped bloqs
//!
//! A generalizer that returns `None` removes the bloq from the graph. Its
//! callees are attached to its caller with multiplied counts, so a dropped
//! leaf disappears from sigma. Cost queries still charge for dropped bloqs.

pub mod call_graph;
pub mod callees;
pub mod cost;
pub mod error;
pub mod generalizer;

pub use call_graph::{
    CallGraph, CallGraphBuilder, CallGraphOptions, KeepFn, Sigma, build_call_graph,
    get_bloq_call_graph, sorted_sigma,
};
pub use callees::{CalleeResolver, build_cbloq_call_graph, get_bloq_callee_counts};
pub use cost::{CostKey, CostValue, QecGatesCost, TCount, get_cost_value, query_costs};
pub use error::{CountError, CountResult};
pub use generalizer::{
    GeneralizeRotationAngle, Generalizer, GeneralizerChain, Identity, IgnoreAllocFree,
    IgnoreSplitJoin, identity,
};
