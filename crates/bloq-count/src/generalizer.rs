//! Generalizers: merge bloqs that should be counted as the same node.
//!
//! A generalizer maps a bloq either to the bloq that stands for it in the
//! call graph, or to `None` to drop it as a distinguishable node. Dropped
//! bloqs are not lost: the call graph splices their callees into the caller
//! and cost queries still charge for them.

use bloq_ir::gates::{Allocate, Free, Join, Rx, Rz, Split, ZPowGate};
use bloq_ir::{BloqRef, GateCounts, ParameterExpression, SymbolAllocator};

/// Maps a bloq to its stand-in, or `None` to drop it.
///
/// Implementations must be idempotent: generalizing an already generalized
/// bloq returns it unchanged.
pub trait Generalizer {
    /// Name used in logs.
    fn name(&self) -> &str {
        "generalizer"
    }

    /// The stand-in for `bloq`.
    fn generalize(&self, bloq: &BloqRef, ssa: &mut SymbolAllocator) -> Option<BloqRef>;
}

impl<F> Generalizer for F
where
    F: Fn(&BloqRef, &mut SymbolAllocator) -> Option<BloqRef>,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn generalize(&self, bloq: &BloqRef, ssa: &mut SymbolAllocator) -> Option<BloqRef> {
        self(bloq, ssa)
    }
}

/// Leaves every bloq as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Generalizer for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn generalize(&self, bloq: &BloqRef, _ssa: &mut SymbolAllocator) -> Option<BloqRef> {
        Some(bloq.clone())
    }
}

/// The generalizer that changes nothing.
pub fn identity() -> Identity {
    Identity
}

/// Drops [`Split`] and [`Join`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreSplitJoin;

impl Generalizer for IgnoreSplitJoin {
    fn name(&self) -> &str {
        "ignore_split_join"
    }

    fn generalize(&self, bloq: &BloqRef, _ssa: &mut SymbolAllocator) -> Option<BloqRef> {
        if bloq.is::<Split>() || bloq.is::<Join>() {
            return None;
        }
        Some(bloq.clone())
    }
}

/// Drops [`Allocate`] and [`Free`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreAllocFree;

impl Generalizer for IgnoreAllocFree {
    fn name(&self) -> &str {
        "ignore_alloc_free"
    }

    fn generalize(&self, bloq: &BloqRef, _ssa: &mut SymbolAllocator) -> Option<BloqRef> {
        if bloq.is::<Allocate>() || bloq.is::<Free>() {
            return None;
        }
        Some(bloq.clone())
    }
}

/// Replaces the concrete angle of every arbitrary-angle rotation with one
/// shared symbol, so rotations that differ only in angle become one node.
///
/// Angles that make the rotation a Clifford or a T gate are kept, which
/// keeps gate counts unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralizeRotationAngle;

impl GeneralizeRotationAngle {
    fn symbol(ssa: &mut SymbolAllocator) -> ParameterExpression {
        ParameterExpression::symbol(ssa.shared_symbol("theta"))
    }
}

impl Generalizer for GeneralizeRotationAngle {
    fn name(&self) -> &str {
        "generalize_rotation_angle"
    }

    fn generalize(&self, bloq: &BloqRef, ssa: &mut SymbolAllocator) -> Option<BloqRef> {
        if bloq.my_gate_counts() != Some(GateCounts::rotation(1)) {
            return Some(bloq.clone());
        }
        let generalized = if let Some(rz) = bloq.downcast_ref::<Rz>() {
            (!rz.angle.is_symbolic()).then(|| BloqRef::new(Rz::new(Self::symbol(ssa))))
        } else if let Some(rx) = bloq.downcast_ref::<Rx>() {
            (!rx.angle.is_symbolic()).then(|| BloqRef::new(Rx::new(Self::symbol(ssa))))
        } else if let Some(zpow) = bloq.downcast_ref::<ZPowGate>() {
            (!zpow.exponent.is_symbolic()).then(|| BloqRef::new(ZPowGate::new(Self::symbol(ssa))))
        } else {
            None
        };
        Some(generalized.unwrap_or_else(|| bloq.clone()))
    }
}

/// Applies generalizers in order, stopping at the first that drops the bloq.
#[derive(Default)]
pub struct GeneralizerChain {
    stages: Vec<Box<dyn Generalizer>>,
}

impl GeneralizerChain {
    /// An empty chain, equivalent to [`identity`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    #[must_use]
    pub fn with(mut self, generalizer: impl Generalizer + 'static) -> Self {
        self.stages.push(Box::new(generalizer));
        self
    }

    /// Append a boxed stage.
    pub fn push(&mut self, generalizer: Box<dyn Generalizer>) {
        self.stages.push(generalizer);
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True if the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Generalizer for GeneralizerChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn generalize(&self, bloq: &BloqRef, ssa: &mut SymbolAllocator) -> Option<BloqRef> {
        let mut current = bloq.clone();
        for stage in &self.stages {
            current = stage.generalize(&current, ssa)?;
        }
        Some(current)
    }
}

impl std::fmt::Debug for GeneralizerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|s| s.name()))
            .finish()
    }
}

/// Look up a built-in generalizer by name.
///
/// Known names are `identity`, `ignore_split_join`, `ignore_alloc_free` and
/// `generalize_rotation_angle`.
pub fn by_name(name: &str) -> Option<Box<dyn Generalizer>> {
    match name.trim() {
        "identity" => Some(Box::new(Identity)),
        "ignore_split_join" => Some(Box::new(IgnoreSplitJoin)),
        "ignore_alloc_free" => Some(Box::new(IgnoreAllocFree)),
        "generalize_rotation_angle" => Some(Box::new(GeneralizeRotationAngle)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloq_ir::gates::{Hadamard, TGate};
    use bloq_ir::QDType;
    use std::f64::consts::PI;

    fn apply(g: &dyn Generalizer, b: &BloqRef) -> Option<BloqRef> {
        g.generalize(b, &mut SymbolAllocator::new())
    }

    #[test]
    fn test_identity() {
        let t = BloqRef::new(TGate::default());
        assert_eq!(apply(&identity(), &t), Some(t));
    }

    #[test]
    fn test_ignore_bookkeeping() {
        let split = BloqRef::new(Split { n: 3 });
        let free = BloqRef::new(Free { dtype: QDType::QBit });
        let h = BloqRef::new(Hadamard);
        assert_eq!(apply(&IgnoreSplitJoin, &split), None);
        assert_eq!(apply(&IgnoreSplitJoin, &free), Some(free.clone()));
        assert_eq!(apply(&IgnoreAllocFree, &free), None);
        assert_eq!(apply(&IgnoreAllocFree, &h), Some(h));
    }

    #[test]
    fn test_rotations_share_one_symbol() {
        let mut ssa = SymbolAllocator::new();
        let g = GeneralizeRotationAngle;
        let a = g.generalize(&BloqRef::new(Rz::new(0.1)), &mut ssa).unwrap();
        let b = g.generalize(&BloqRef::new(Rz::new(0.2)), &mut ssa).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Rz(_theta0)");
        assert_eq!(g.generalize(&a, &mut ssa), Some(a.clone()));

        let t_like = BloqRef::new(Rz::new(PI / 4.0));
        assert_eq!(g.generalize(&t_like, &mut ssa), Some(t_like));
    }

    #[test]
    fn test_chain_stops_at_drop() {
        let chain = GeneralizerChain::new()
            .with(IgnoreSplitJoin)
            .with(|_: &BloqRef, _: &mut SymbolAllocator| -> Option<BloqRef> {
                panic!("stage after a drop must not run")
            });
        assert_eq!(apply(&chain, &BloqRef::new(Join { n: 2 })), None);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_closure_generalizer() {
        let to_t = |b: &BloqRef, _: &mut SymbolAllocator| {
            if b.is::<Hadamard>() {
                Some(BloqRef::new(TGate::default()))
            } else {
                Some(b.clone())
            }
        };
        let out = apply(&to_t, &BloqRef::new(Hadamard)).unwrap();
        assert!(out.is::<TGate>());
    }

    #[test]
    fn test_by_name() {
        assert!(by_name("ignore_split_join").is_some());
        assert!(by_name(" identity ").is_some());
        assert!(by_name("nope").is_none());
    }
}
