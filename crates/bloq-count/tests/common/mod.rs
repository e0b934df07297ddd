//! Bloqs shared by the integration tests.

#![allow(dead_code)]

use std::fmt;

use bloq_ir::gates::TGate;
use bloq_ir::{
    Bloq, BloqBuilder, BloqCount, BloqRef, CompositeBloq, DecomposeError, DecomposeResult,
    GateCounts, QDType, Signature, SymbolAllocator,
};

fn one_qubit() -> Signature {
    Signature::build(&[("q", QDType::QBit)])
}

/// Chain `parts` one after another on a single qubit.
pub fn chain_on_one_qubit(name: &str, parts: &[BloqRef]) -> DecomposeResult<CompositeBloq> {
    let (mut bb, regs) = BloqBuilder::from_signature(one_qubit());
    let fail = |source| DecomposeError::Failed {
        bloq: name.to_string(),
        source,
    };
    let mut q = regs["q"].clone();
    for part in parts {
        let out = bb.add_ref(part.clone(), &[("q", q)]).map_err(fail)?;
        q = out["q"].clone();
    }
    bb.finalize(&[("q", q)]).map_err(fail)
}

/// Leaf costing `t` T gates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Leaf {
    pub name: &'static str,
    pub t: i64,
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Bloq for Leaf {
    fn signature(&self) -> Signature {
        one_qubit()
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::t(self.t))
    }
}

pub fn a() -> BloqRef {
    BloqRef::new(Leaf { name: "A", t: 1 })
}

pub fn c() -> BloqRef {
    BloqRef::new(Leaf { name: "C", t: 4 })
}

/// 3 x A then 2 x C.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct B;

impl fmt::Display for B {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")
    }
}

impl Bloq for B {
    fn signature(&self) -> Signature {
        one_qubit()
    }

    fn decompose_bloq(&self) -> DecomposeResult<CompositeBloq> {
        chain_on_one_qubit("B", &[a(), a(), a(), c(), c()])
    }
}

pub fn b() -> BloqRef {
    BloqRef::new(B)
}

/// A, B, A.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct D;

impl fmt::Display for D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D")
    }
}

impl Bloq for D {
    fn signature(&self) -> Signature {
        one_qubit()
    }

    fn decompose_bloq(&self) -> DecomposeResult<CompositeBloq> {
        chain_on_one_qubit("D", &[a(), b(), a()])
    }
}

pub fn d() -> BloqRef {
    BloqRef::new(D)
}

/// A bloq with explicitly listed callees; a leaf costing `t` when it has none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Synthetic {
    pub label: String,
    pub t: i64,
    pub callees: Vec<(Synthetic, i64)>,
}

impl Synthetic {
    pub fn leaf(label: impl Into<String>, t: i64) -> Self {
        Self {
            label: label.into(),
            t,
            callees: Vec::new(),
        }
    }

    pub fn node(label: impl Into<String>, callees: Vec<(Synthetic, i64)>) -> Self {
        Self {
            label: label.into(),
            t: 0,
            callees,
        }
    }

    /// T-count by direct recursion over every path.
    pub fn naive_t(&self) -> i64 {
        if self.callees.is_empty() {
            return self.t;
        }
        self.callees.iter().map(|(c, n)| n * c.naive_t()).sum()
    }
}

impl fmt::Display for Synthetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl Bloq for Synthetic {
    fn signature(&self) -> Signature {
        one_qubit()
    }

    fn build_call_graph(&self, _ssa: &mut SymbolAllocator) -> DecomposeResult<Vec<BloqCount>> {
        if self.callees.is_empty() {
            return Err(DecomposeError::NotImplemented(self.to_string()));
        }
        Ok(self
            .callees
            .iter()
            .map(|(c, n)| BloqCount::of(c.clone(), *n))
            .collect())
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        self.callees.is_empty().then(|| GateCounts::t(self.t))
    }
}

/// `Level(n)` calls `Level(n - 1)` a million times; `Level(0)` calls one T.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Level {
    pub n: u32,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level({})", self.n)
    }
}

impl Bloq for Level {
    fn signature(&self) -> Signature {
        one_qubit()
    }

    fn build_call_graph(&self, _ssa: &mut SymbolAllocator) -> DecomposeResult<Vec<BloqCount>> {
        Ok(match self.n {
            0 => vec![BloqCount::of(TGate::default(), 1)],
            n => vec![BloqCount::of(Level { n: n - 1 }, 1_000_000)],
        })
    }
}

/// Calls itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ouroboros;

impl fmt::Display for Ouroboros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ouroboros")
    }
}

impl Bloq for Ouroboros {
    fn signature(&self) -> Signature {
        one_qubit()
    }

    fn build_call_graph(&self, _ssa: &mut SymbolAllocator) -> DecomposeResult<Vec<BloqCount>> {
        Ok(vec![
            BloqCount::of(TGate::default(), 1),
            BloqCount::of(Ouroboros, 2),
        ])
    }
}

/// Its decomposition is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Broken;

impl fmt::Display for Broken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Broken")
    }
}

impl Bloq for Broken {
    fn signature(&self) -> Signature {
        one_qubit()
    }

    fn decompose_bloq(&self) -> DecomposeResult<CompositeBloq> {
        let (bb, _regs) = BloqBuilder::from_signature(one_qubit());
        // Drops the input qubit on the floor.
        bb.finalize(&[]).map_err(|source| DecomposeError::Failed {
            bloq: self.to_string(),
            source,
        })
    }
}
