//! Typed cost values aggregated over the call graph.
//!
//! A [`CostKey`] says what a leaf costs; [`get_cost_value`] folds those
//! leaf costs through the callee counts, memoized per bloq.
//!
//! Dropping a callee in the generalizer changes node identity only. A
//! dropped callee is costed as the bloq it was before generalization, so
//! totals are the same with or without the drop.

use std::fmt;

use bloq_ir::{BloqRef, GateCounts, SymbolAllocator, SymbolicInt};
use rustc_hash::FxHashMap;
use tracing::{debug, instrument, warn};

use crate::callees::CalleeResolver;
use crate::error::{CountError, CountResult};
use crate::generalizer::Generalizer;

/// A commutative monoid that can be scaled by a call count.
pub trait CostValue: Clone + fmt::Debug + fmt::Display {
    /// The additive identity.
    fn zero() -> Self;

    /// `self += other`.
    fn accumulate(&mut self, other: &Self);

    /// `self * n`.
    fn scaled(&self, n: &SymbolicInt) -> Self;
}

impl CostValue for SymbolicInt {
    fn zero() -> Self {
        SymbolicInt::zero()
    }

    fn accumulate(&mut self, other: &Self) {
        *self += other;
    }

    fn scaled(&self, n: &SymbolicInt) -> Self {
        self * n
    }
}

impl CostValue for GateCounts {
    fn zero() -> Self {
        GateCounts::zero()
    }

    fn accumulate(&mut self, other: &Self) {
        *self += other;
    }

    fn scaled(&self, n: &SymbolicInt) -> Self {
        self.scale(n)
    }
}

/// A kind of cost, such as gate counts or T-count.
pub trait CostKey {
    /// The value type this key aggregates.
    type Value: CostValue;

    /// Name used in logs and output.
    fn name(&self) -> &str;

    /// A cost stated directly by the bloq, used instead of its callees.
    fn static_cost(&self, bloq: &BloqRef) -> Option<Self::Value> {
        let _ = bloq;
        None
    }

    /// Cost of a bloq that has no callees and no static cost.
    fn leaf_cost(&self, bloq: &BloqRef) -> Self::Value {
        warn!(bloq = %bloq, key = self.name(), "no cost known for leaf, counting zero");
        Self::Value::zero()
    }
}

/// Counts of T, Toffoli, CSwap, AND, Clifford, rotation and measurement
/// gates.
#[derive(Debug, Clone, Copy, Default)]
pub struct QecGatesCost;

impl CostKey for QecGatesCost {
    type Value = GateCounts;

    fn name(&self) -> &str {
        "gate_counts"
    }

    fn static_cost(&self, bloq: &BloqRef) -> Option<GateCounts> {
        bloq.my_gate_counts()
    }
}

/// Total T-count, with Toffolis, controlled swaps and ANDs synthesized at
/// the standard rates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TCount;

impl CostKey for TCount {
    type Value = SymbolicInt;

    fn name(&self) -> &str {
        "t_count"
    }

    fn static_cost(&self, bloq: &BloqRef) -> Option<SymbolicInt> {
        bloq.my_gate_counts().map(|gc| gc.total_t_count())
    }
}

struct CostQuery<'k, 'r, K: CostKey> {
    key: &'k K,
    resolver: CalleeResolver<'r>,
    memo: FxHashMap<BloqRef, K::Value>,
    in_progress: Vec<BloqRef>,
}

impl<K: CostKey> CostQuery<'_, '_, K> {
    fn cost(&mut self, bloq: &BloqRef) -> CountResult<K::Value> {
        if let Some(v) = self.memo.get(bloq) {
            return Ok(v.clone());
        }
        if self.in_progress.contains(bloq) {
            return Err(CountError::CyclicGraph(bloq.to_string()));
        }
        self.in_progress.push(bloq.clone());
        let value = self.compute(bloq);
        self.in_progress.pop();
        let value = value?;
        debug!(bloq = %bloq, key = self.key.name(), cost = %value, "costed");
        self.memo.insert(bloq.clone(), value.clone());
        Ok(value)
    }

    fn compute(&mut self, bloq: &BloqRef) -> CountResult<K::Value> {
        if let Some(v) = self.key.static_cost(bloq) {
            return Ok(v);
        }
        let callees = match self.resolver.raw_callees(bloq)? {
            Some(callees) if !callees.is_empty() => callees,
            _ => return Ok(self.key.leaf_cost(bloq)),
        };
        let mut total = K::Value::zero();
        for callee in &callees {
            let node = self
                .resolver
                .generalize(&callee.bloq)
                .unwrap_or_else(|| callee.bloq.clone());
            let c = self.cost(&node)?;
            total.accumulate(&c.scaled(&callee.count));
        }
        Ok(total)
    }
}

/// Cost of `bloq` under `key`, with callees generalized by `generalizer`.
#[instrument(skip_all, fields(bloq = %bloq, key = key.name()))]
pub fn get_cost_value<K: CostKey>(
    bloq: &BloqRef,
    key: &K,
    generalizer: &dyn Generalizer,
) -> CountResult<K::Value> {
    let mut ssa = SymbolAllocator::new();
    let mut query = CostQuery {
        key,
        resolver: CalleeResolver::new(generalizer, &mut ssa),
        memo: FxHashMap::default(),
        in_progress: Vec::new(),
    };
    let root = query.resolver.generalize(bloq).unwrap_or_else(|| bloq.clone());
    query.cost(&root)
}

/// Costs of `bloq` and of every bloq visited while costing it.
#[instrument(skip_all, fields(bloq = %bloq, key = key.name()))]
pub fn query_costs<K: CostKey>(
    bloq: &BloqRef,
    key: &K,
    generalizer: &dyn Generalizer,
) -> CountResult<FxHashMap<BloqRef, K::Value>> {
    let mut ssa = SymbolAllocator::new();
    let mut query = CostQuery {
        key,
        resolver: CalleeResolver::new(generalizer, &mut ssa),
        memo: FxHashMap::default(),
        in_progress: Vec::new(),
    };
    let root = query.resolver.generalize(bloq).unwrap_or_else(|| bloq.clone());
    query.cost(&root)?;
    Ok(query.memo)
}
