//! The decomposition driver: one level of callees per bloq, memoized.

use bloq_ir::{BloqCount, BloqRef, CompositeBloq, SymbolAllocator, SymbolicInt};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::{CountError, CountResult};
use crate::generalizer::Generalizer;

/// Counted children of a [`CompositeBloq`].
pub fn build_cbloq_call_graph(cbloq: &CompositeBloq) -> Vec<BloqCount> {
    cbloq.callee_counts()
}

/// Generalized callees of `bloq`, one level deep.
///
/// Callees that generalize to the same bloq are merged by adding their
/// counts; dropped callees are replaced by their own callees. If `bloq`
/// cannot be decomposed the result is empty when `ignore_decomp_failure`
/// is set and an error otherwise.
pub fn get_bloq_callee_counts(
    bloq: &BloqRef,
    generalizer: &dyn Generalizer,
    ssa: &mut SymbolAllocator,
    ignore_decomp_failure: bool,
) -> CountResult<Vec<BloqCount>> {
    let raw = match bloq.build_call_graph(ssa) {
        Ok(raw) => raw,
        Err(err) if err.is_leaf_signal() && ignore_decomp_failure => {
            debug!(bloq = %bloq, "no callees: {err}");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };
    let mut resolver = CalleeResolver::new(generalizer, ssa);
    resolver.generalize_callees(&raw)
}

/// Per-build memo of decompositions and generalizations.
///
/// Each distinct bloq is asked for its callees at most once and each
/// distinct callee is generalized at most once.
pub struct CalleeResolver<'a> {
    generalizer: &'a dyn Generalizer,
    ssa: &'a mut SymbolAllocator,
    raw: FxHashMap<BloqRef, Option<Vec<BloqCount>>>,
    generalized: FxHashMap<BloqRef, Option<BloqRef>>,
    resolved: FxHashMap<BloqRef, Option<Vec<BloqCount>>>,
    spliced: FxHashMap<BloqRef, Vec<BloqCount>>,
    splicing: Vec<BloqRef>,
    decompositions: usize,
}

impl<'a> CalleeResolver<'a> {
    /// A resolver with empty memo tables.
    pub fn new(generalizer: &'a dyn Generalizer, ssa: &'a mut SymbolAllocator) -> Self {
        Self {
            generalizer,
            ssa,
            raw: FxHashMap::default(),
            generalized: FxHashMap::default(),
            resolved: FxHashMap::default(),
            spliced: FxHashMap::default(),
            splicing: Vec::new(),
            decompositions: 0,
        }
    }

    /// Number of times a bloq was actually asked for its callees.
    pub fn decompositions(&self) -> usize {
        self.decompositions
    }

    /// The generalized stand-in for `bloq`, or `None` if it is dropped.
    pub fn generalize(&mut self, bloq: &BloqRef) -> Option<BloqRef> {
        if let Some(g) = self.generalized.get(bloq) {
            return g.clone();
        }
        let g = self.generalizer.generalize(bloq, self.ssa);
        if g.is_none() {
            trace!(bloq = %bloq, generalizer = self.generalizer.name(), "dropped");
        }
        self.generalized.insert(bloq.clone(), g.clone());
        g
    }

    /// Ungeneralized callees of `bloq`; `None` when it is a leaf.
    ///
    /// Only [`DecomposeError::Failed`](bloq_ir::DecomposeError::Failed) is
    /// an error.
    pub fn raw_callees(&mut self, bloq: &BloqRef) -> CountResult<Option<Vec<BloqCount>>> {
        if let Some(raw) = self.raw.get(bloq) {
            return Ok(raw.clone());
        }
        self.decompositions += 1;
        let raw = match bloq.build_call_graph(self.ssa) {
            Ok(callees) => Some(callees),
            Err(err) if err.is_leaf_signal() => {
                debug!(bloq = %bloq, "leaf: {err}");
                None
            }
            Err(err) => return Err(err.into()),
        };
        self.raw.insert(bloq.clone(), raw.clone());
        Ok(raw)
    }

    /// Generalized, merged callees of `bloq`; `None` when it is a leaf.
    ///
    /// A bloq whose callees are all dropped leaves returns an empty list.
    pub fn callees(&mut self, bloq: &BloqRef) -> CountResult<Option<Vec<BloqCount>>> {
        if let Some(resolved) = self.resolved.get(bloq) {
            return Ok(resolved.clone());
        }
        let resolved = match self.raw_callees(bloq)? {
            Some(raw) => Some(self.generalize_callees(&raw)?),
            None => None,
        };
        self.resolved.insert(bloq.clone(), resolved.clone());
        Ok(resolved)
    }

    /// Generalize a raw callee list, splicing dropped callees and merging
    /// duplicates in order of first appearance. Zero counts are removed.
    pub fn generalize_callees(&mut self, raw: &[BloqCount]) -> CountResult<Vec<BloqCount>> {
        let mut merged = Merged::default();
        for BloqCount { bloq, count } in raw {
            match self.generalize(bloq) {
                Some(g) => merged.add(g, count.clone()),
                None => {
                    for inner in self.splice(bloq)? {
                        merged.add(inner.bloq, &inner.count * count);
                    }
                }
            }
        }
        Ok(merged.finish())
    }

    /// What a dropped bloq expands to: its own generalized callees.
    fn splice(&mut self, dropped: &BloqRef) -> CountResult<Vec<BloqCount>> {
        if let Some(done) = self.spliced.get(dropped) {
            return Ok(done.clone());
        }
        if self.splicing.contains(dropped) {
            return Err(CountError::CyclicGraph(dropped.to_string()));
        }
        self.splicing.push(dropped.clone());
        let expanded = match self.raw_callees(dropped) {
            Ok(Some(raw)) => self.generalize_callees(&raw),
            Ok(None) => Ok(Vec::new()),
            Err(err) => Err(err),
        };
        self.splicing.pop();
        let expanded = expanded?;
        self.spliced.insert(dropped.clone(), expanded.clone());
        Ok(expanded)
    }
}

#[derive(Default)]
struct Merged {
    position: FxHashMap<BloqRef, usize>,
    entries: Vec<BloqCount>,
}

impl Merged {
    fn add(&mut self, bloq: BloqRef, count: SymbolicInt) {
        match self.position.get(&bloq) {
            Some(&i) => self.entries[i].count += count,
            None => {
                self.position.insert(bloq.clone(), self.entries.len());
                self.entries.push(BloqCount::new(bloq, count));
            }
        }
    }

    fn finish(self) -> Vec<BloqCount> {
        self.entries
            .into_iter()
            .filter(|bc| !bc.count.is_zero())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generalizer::{IgnoreSplitJoin, identity};
    use bloq_ir::gates::{Hadamard, Join, Rz, Split, TGate};
    use bloq_ir::{Bloq, BloqBuilder, DecomposeError, DecomposeResult, QDType, Signature};
    use std::fmt;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct HThenSplit;

    impl fmt::Display for HThenSplit {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "HThenSplit")
        }
    }

    impl Bloq for HThenSplit {
        fn signature(&self) -> Signature {
            Signature::build(&[("x", QDType::QAny(2.into()))])
        }

        fn decompose_bloq(&self) -> DecomposeResult<CompositeBloq> {
            let (mut bb, regs) = BloqBuilder::from_signature(self.signature());
            let fail = |source| DecomposeError::Failed {
                bloq: self.to_string(),
                source,
            };
            let bits = bb.add(Split { n: 2 }, &[("reg", regs["x"].clone())]).map_err(fail)?;
            let h0 = bb.add(Hadamard, &[("q", vec![bits["reg"][0].clone()])]).map_err(fail)?;
            let h1 = bb.add(Hadamard, &[("q", vec![bits["reg"][1].clone()])]).map_err(fail)?;
            let joined = bb
                .add(
                    Join { n: 2 },
                    &[("reg", vec![h0["q"][0].clone(), h1["q"][0].clone()])],
                )
                .map_err(fail)?;
            bb.finalize(&[("x", joined["reg"].clone())]).map_err(fail)
        }
    }

    #[test]
    fn test_flatten_composite() {
        let cbloq = HThenSplit.decompose_bloq().unwrap();
        let counts = build_cbloq_call_graph(&cbloq);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[1], BloqCount::of(Hadamard, 2));
    }

    #[test]
    fn test_callee_counts_with_and_without_generalizer() {
        let bloq = BloqRef::new(HThenSplit);
        let mut ssa = SymbolAllocator::new();
        let all = get_bloq_callee_counts(&bloq, &identity(), &mut ssa, false).unwrap();
        assert_eq!(all.len(), 3);

        let only_h = get_bloq_callee_counts(&bloq, &IgnoreSplitJoin, &mut ssa, false).unwrap();
        assert_eq!(only_h, vec![BloqCount::of(Hadamard, 2)]);
    }

    #[test]
    fn test_leaf_handling() {
        let t = BloqRef::new(TGate::default());
        let mut ssa = SymbolAllocator::new();
        assert!(get_bloq_callee_counts(&t, &identity(), &mut ssa, true).unwrap().is_empty());
        let err = get_bloq_callee_counts(&t, &identity(), &mut ssa, false).unwrap_err();
        assert!(matches!(err, CountError::Decompose(DecomposeError::NotImplemented(_))));
    }

    #[test]
    fn test_merging_after_generalization() {
        let raw = vec![
            BloqCount::of(Rz::new(0.1), 2),
            BloqCount::of(TGate::default(), 1),
            BloqCount::of(Rz::new(0.2), 3),
        ];
        let mut ssa = SymbolAllocator::new();
        let g = crate::generalizer::GeneralizeRotationAngle;
        let mut resolver = CalleeResolver::new(&g, &mut ssa);
        let out = resolver.generalize_callees(&raw).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].count, SymbolicInt::from(5));
        assert!(out[1].bloq.is::<TGate>());
    }

    #[test]
    fn test_decomposes_once() {
        let mut ssa = SymbolAllocator::new();
        let g = identity();
        let mut resolver = CalleeResolver::new(&g, &mut ssa);
        let bloq = BloqRef::new(HThenSplit);
        let first = resolver.callees(&bloq).unwrap();
        let second = resolver.callees(&BloqRef::new(HThenSplit)).unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.decompositions(), 1);
    }
}
