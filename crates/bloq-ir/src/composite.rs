//! Composite bloqs: linear wire graphs of bloq instances.
//!
//! A [`CompositeBloq`] is built with a [`BloqBuilder`], which enforces that
//! quantum data is neither copied nor dropped: every soquet produced by the
//! boundary or by an instance is consumed exactly once.

use petgraph::graph::DiGraph;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use tracing::trace;

use crate::allocator::SymbolAllocator;
use crate::bloq::{Bloq, BloqCount, BloqRef};
use crate::error::{BloqError, BloqResult, DecomposeResult};
use crate::signature::{QDType, Signature};
use crate::symbolic::SymbolicInt;

/// Endpoint owner of a soquet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinstRef {
    /// The composite's own inputs.
    LeftDangle,
    /// The composite's own outputs.
    RightDangle,
    /// The instance with this index.
    Instance(usize),
}

impl fmt::Display for BinstRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinstRef::LeftDangle => write!(f, "LeftDangle"),
            BinstRef::RightDangle => write!(f, "RightDangle"),
            BinstRef::Instance(i) => write!(f, "binst{i}"),
        }
    }
}

/// One element of one register of one instance (or of the boundary).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Soquet {
    /// Owner of the soquet.
    pub binst: BinstRef,
    /// Register name.
    pub register: String,
    /// Flat element index within a shaped register.
    pub index: usize,
}

impl Soquet {
    fn new(binst: BinstRef, register: &str, index: usize) -> Self {
        Self {
            binst,
            register: register.to_string(),
            index,
        }
    }
}

impl fmt::Display for Soquet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}[{}]", self.binst, self.register, self.index)
    }
}

/// A wire from a producing soquet to a consuming one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Producer side.
    pub left: Soquet,
    /// Consumer side.
    pub right: Soquet,
}

/// A bloq placed inside a composite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BloqInstance {
    /// Position in insertion order.
    pub index: usize,
    /// The placed bloq.
    pub bloq: BloqRef,
}

/// A bloq defined by a wiring of sub-bloqs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeBloq {
    signature: Signature,
    instances: Vec<BloqInstance>,
    connections: Vec<Connection>,
}

impl CompositeBloq {
    /// External ports.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Instances in insertion order.
    pub fn instances(&self) -> &[BloqInstance] {
        &self.instances
    }

    /// All wires.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Number of instances.
    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

    /// Instances in topological order of the wiring.
    pub fn bloq_instances(&self) -> BloqResult<Vec<&BloqInstance>> {
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(self.instances.len(), 0);
        let nodes: Vec<_> = self.instances.iter().map(|i| graph.add_node(i.index)).collect();
        for conn in &self.connections {
            if let (BinstRef::Instance(a), BinstRef::Instance(b)) =
                (conn.left.binst, conn.right.binst)
            {
                graph.add_edge(nodes[a], nodes[b], ());
            }
        }
        let order = petgraph::algo::toposort(&graph, None).map_err(|cycle| {
            BloqError::InvalidComposite(format!(
                "wiring cycle through binst{}",
                graph[cycle.node_id()]
            ))
        })?;
        Ok(order.into_iter().map(|n| &self.instances[graph[n]]).collect())
    }

    /// Direct children with multiplicities, in order of first appearance.
    pub fn callee_counts(&self) -> Vec<BloqCount> {
        let mut position: FxHashMap<&BloqRef, usize> = FxHashMap::default();
        let mut counts: Vec<(BloqRef, usize)> = Vec::new();
        for inst in &self.instances {
            match position.get(&inst.bloq) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    position.insert(&inst.bloq, counts.len());
                    counts.push((inst.bloq.clone(), 1));
                }
            }
        }
        counts
            .into_iter()
            .map(|(bloq, n)| BloqCount::new(bloq, n))
            .collect()
    }
}

impl fmt::Display for CompositeBloq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeBloq([{} instances])", self.instances.len())
    }
}

impl Bloq for CompositeBloq {
    fn signature(&self) -> Signature {
        self.signature.clone()
    }

    fn decompose_bloq(&self) -> DecomposeResult<CompositeBloq> {
        Ok(self.clone())
    }

    fn build_call_graph(&self, _ssa: &mut SymbolAllocator) -> DecomposeResult<Vec<BloqCount>> {
        Ok(self.callee_counts())
    }
}

/// Incremental, linearity-checked construction of a [`CompositeBloq`].
///
/// ```rust
/// use bloq_ir::gates::{CNOT, Hadamard};
/// use bloq_ir::{BloqBuilder, QDType, Signature};
///
/// let sig = Signature::build(&[("a", QDType::QBit), ("b", QDType::QBit)]);
/// let (mut bb, regs) = BloqBuilder::from_signature(sig);
/// let a = bb.add(Hadamard, &[("q", regs["a"].clone())]).unwrap();
/// let out = bb
///     .add(CNOT, &[("ctrl", a["q"].clone()), ("target", regs["b"].clone())])
///     .unwrap();
/// let cbloq = bb
///     .finalize(&[("a", out["ctrl"].clone()), ("b", out["target"].clone())])
///     .unwrap();
/// assert_eq!(cbloq.num_instances(), 2);
/// ```
#[derive(Debug)]
pub struct BloqBuilder {
    signature: Signature,
    instances: Vec<BloqInstance>,
    connections: Vec<Connection>,
    available: FxHashMap<Soquet, QDType>,
}

impl BloqBuilder {
    /// Start a composite with the given external signature.
    ///
    /// Returns the builder and the soquets of every input register.
    pub fn from_signature(signature: Signature) -> (Self, FxHashMap<String, Vec<Soquet>>) {
        let mut available = FxHashMap::default();
        let mut inputs = FxHashMap::default();
        for reg in signature.lefts() {
            let soqs: Vec<Soquet> = (0..reg.num_elements())
                .map(|i| Soquet::new(BinstRef::LeftDangle, reg.name(), i))
                .collect();
            for soq in &soqs {
                available.insert(soq.clone(), reg.dtype().clone());
            }
            inputs.insert(reg.name().to_string(), soqs);
        }
        let builder = Self {
            signature,
            instances: Vec::new(),
            connections: Vec::new(),
            available,
        };
        (builder, inputs)
    }

    /// Add `bloq`, wiring `inputs` into its left registers.
    ///
    /// Returns the soquets of its right registers. On error the builder is
    /// left unchanged.
    pub fn add<B: Bloq>(
        &mut self,
        bloq: B,
        inputs: &[(&str, Vec<Soquet>)],
    ) -> BloqResult<FxHashMap<String, Vec<Soquet>>> {
        self.add_ref(BloqRef::new(bloq), inputs)
    }

    /// [`add`](Self::add) for an already wrapped bloq.
    pub fn add_ref(
        &mut self,
        bloq: BloqRef,
        inputs: &[(&str, Vec<Soquet>)],
    ) -> BloqResult<FxHashMap<String, Vec<Soquet>>> {
        let sig = bloq.signature();
        let binst = BinstRef::Instance(self.instances.len());

        let mut wires = Vec::new();
        let mut consumed = FxHashSet::default();
        for (name, _) in inputs {
            if sig.get_left(name).is_none() {
                return Err(BloqError::UnknownRegister {
                    register: (*name).to_string(),
                    bloq: Some(bloq.to_string()),
                });
            }
        }
        for reg in sig.lefts() {
            let soqs = inputs
                .iter()
                .find(|(name, _)| *name == reg.name())
                .map(|(_, soqs)| soqs)
                .ok_or_else(|| BloqError::MissingRegister {
                    register: reg.name().to_string(),
                    bloq: bloq.to_string(),
                })?;
            if soqs.len() != reg.num_elements() {
                return Err(BloqError::SoquetCountMismatch {
                    register: reg.name().to_string(),
                    expected: reg.num_elements(),
                    got: soqs.len(),
                });
            }
            for (i, soq) in soqs.iter().enumerate() {
                let dtype = self
                    .available
                    .get(soq)
                    .filter(|_| !consumed.contains(soq))
                    .ok_or_else(|| BloqError::SoquetUnavailable(soq.to_string()))?;
                let target = Soquet::new(binst, reg.name(), i);
                check_widths(soq, dtype, &target, reg.dtype())?;
                consumed.insert(soq.clone());
                wires.push(Connection {
                    left: soq.clone(),
                    right: target,
                });
            }
        }

        for soq in &consumed {
            self.available.remove(soq);
        }
        self.connections.extend(wires);

        let mut outputs = FxHashMap::default();
        for reg in sig.rights() {
            let soqs: Vec<Soquet> = (0..reg.num_elements())
                .map(|i| Soquet::new(binst, reg.name(), i))
                .collect();
            for soq in &soqs {
                self.available.insert(soq.clone(), reg.dtype().clone());
            }
            outputs.insert(reg.name().to_string(), soqs);
        }

        trace!(bloq = %bloq, binst = %binst, "added instance");
        self.instances.push(BloqInstance {
            index: self.instances.len(),
            bloq,
        });
        Ok(outputs)
    }

    /// Wire `outputs` to the composite's right registers and finish.
    ///
    /// Fails if any produced soquet is left unconsumed.
    pub fn finalize(mut self, outputs: &[(&str, Vec<Soquet>)]) -> BloqResult<CompositeBloq> {
        for (name, _) in outputs {
            if self.signature.get_right(name).is_none() {
                return Err(BloqError::UnknownRegister {
                    register: (*name).to_string(),
                    bloq: None,
                });
            }
        }
        let rights: Vec<_> = self.signature.rights().cloned().collect();
        for reg in &rights {
            let soqs = outputs
                .iter()
                .find(|(name, _)| *name == reg.name())
                .map(|(_, soqs)| soqs)
                .ok_or_else(|| BloqError::MissingRegister {
                    register: reg.name().to_string(),
                    bloq: "CompositeBloq".to_string(),
                })?;
            if soqs.len() != reg.num_elements() {
                return Err(BloqError::SoquetCountMismatch {
                    register: reg.name().to_string(),
                    expected: reg.num_elements(),
                    got: soqs.len(),
                });
            }
            for (i, soq) in soqs.iter().enumerate() {
                let dtype = self
                    .available
                    .remove(soq)
                    .ok_or_else(|| BloqError::SoquetUnavailable(soq.to_string()))?;
                let target = Soquet::new(BinstRef::RightDangle, reg.name(), i);
                check_widths(soq, &dtype, &target, reg.dtype())?;
                self.connections.push(Connection {
                    left: soq.clone(),
                    right: target,
                });
            }
        }

        if !self.available.is_empty() {
            let mut dangling: Vec<_> = self.available.keys().cloned().collect();
            dangling.sort();
            return Err(BloqError::DanglingSoquets(
                dangling.iter().map(ToString::to_string).collect(),
            ));
        }

        Ok(CompositeBloq {
            signature: self.signature,
            instances: self.instances,
            connections: self.connections,
        })
    }
}

/// Widths must agree whenever both are concrete.
fn check_widths(from: &Soquet, from_ty: &QDType, to: &Soquet, to_ty: &QDType) -> BloqResult<()> {
    let (a, b): (SymbolicInt, SymbolicInt) = (from_ty.bitsize(), to_ty.bitsize());
    if let (Some(from_bits), Some(to_bits)) = (a.as_i64(), b.as_i64()) {
        if from_bits != to_bits {
            return Err(BloqError::DtypeMismatch {
                from: from.to_string(),
                to: to.to_string(),
                from_bits,
                to_bits,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{CNOT, Hadamard, TGate};
    use crate::signature::{QDType, Register, Side};

    fn two_qubits() -> Signature {
        Signature::build(&[("a", QDType::QBit), ("b", QDType::QBit)])
    }

    #[test]
    fn test_build_and_count() {
        let (mut bb, regs) = BloqBuilder::from_signature(two_qubits());
        let a = bb.add(TGate::default(), &[("q", regs["a"].clone())]).unwrap();
        let a = bb.add(TGate::default(), &[("q", a["q"].clone())]).unwrap();
        let b = bb.add(Hadamard, &[("q", regs["b"].clone())]).unwrap();
        let out = bb
            .add(CNOT, &[("ctrl", a["q"].clone()), ("target", b["q"].clone())])
            .unwrap();
        let cbloq = bb
            .finalize(&[("a", out["ctrl"].clone()), ("b", out["target"].clone())])
            .unwrap();

        let counts = cbloq.callee_counts();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0], BloqCount::of(TGate::default(), 2));
        assert_eq!(counts[1], BloqCount::of(Hadamard, 1));
        assert_eq!(counts[2], BloqCount::of(CNOT, 1));

        let order: Vec<usize> = cbloq.bloq_instances().unwrap().iter().map(|i| i.index).collect();
        let pos = |i: usize| order.iter().position(|&x| x == i).unwrap();
        assert!(pos(0) < pos(1));
        assert!(pos(1) < pos(3));
        assert!(pos(2) < pos(3));
    }

    #[test]
    fn test_soquet_used_twice() {
        let (mut bb, regs) = BloqBuilder::from_signature(two_qubits());
        bb.add(Hadamard, &[("q", regs["a"].clone())]).unwrap();
        let err = bb.add(Hadamard, &[("q", regs["a"].clone())]).unwrap_err();
        assert!(matches!(err, BloqError::SoquetUnavailable(_)));

        let err = bb
            .add(CNOT, &[("ctrl", regs["b"].clone()), ("target", regs["b"].clone())])
            .unwrap_err();
        assert!(matches!(err, BloqError::SoquetUnavailable(_)));
        assert_eq!(bb.instances.len(), 1);
    }

    #[test]
    fn test_missing_and_unknown_registers() {
        let (mut bb, regs) = BloqBuilder::from_signature(two_qubits());
        let err = bb.add(CNOT, &[("ctrl", regs["a"].clone())]).unwrap_err();
        assert!(matches!(err, BloqError::MissingRegister { .. }));
        let err = bb.add(Hadamard, &[("x", regs["a"].clone())]).unwrap_err();
        assert!(matches!(err, BloqError::UnknownRegister { .. }));
    }

    #[test]
    fn test_dangling_rejected() {
        let (bb, regs) = BloqBuilder::from_signature(two_qubits());
        let err = bb.finalize(&[("a", regs["a"].clone())]).unwrap_err();
        assert!(matches!(err, BloqError::MissingRegister { .. }));

        let sig = Signature::new(vec![
            Register::new("a", QDType::QBit).with_side(Side::Left),
        ])
        .unwrap();
        let (bb, _) = BloqBuilder::from_signature(sig);
        let err = bb.finalize(&[]).unwrap_err();
        assert!(matches!(err, BloqError::DanglingSoquets(ref s) if s.len() == 1));
    }

    #[test]
    fn test_width_mismatch() {
        let sig = Signature::build(&[("x", QDType::QAny(2.into()))]);
        let (mut bb, regs) = BloqBuilder::from_signature(sig);
        let err = bb.add(Hadamard, &[("q", regs["x"].clone())]).unwrap_err();
        assert!(matches!(err, BloqError::DtypeMismatch { from_bits: 2, to_bits: 1, .. }));
    }

    #[test]
    fn test_composite_is_a_bloq() {
        let (mut bb, regs) = BloqBuilder::from_signature(two_qubits());
        let a = bb.add(Hadamard, &[("q", regs["a"].clone())]).unwrap();
        let cbloq = bb
            .finalize(&[("a", a["q"].clone()), ("b", regs["b"].clone())])
            .unwrap();
        let wrapped = BloqRef::new(cbloq.clone());
        assert_eq!(wrapped.decompose_bloq().unwrap(), cbloq);
        let mut ssa = SymbolAllocator::new();
        assert_eq!(wrapped.build_call_graph(&mut ssa).unwrap(), cbloq.callee_counts());
        assert_eq!(wrapped.signature().n_qubits(), SymbolicInt::from(2));
    }
}
