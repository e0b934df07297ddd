//! Bloqs the CLI knows by name.

use std::f64::consts::PI;
use std::fmt;

use anyhow::Result;
use bloq_ir::gates::{Allocate, And, CNOT, Free, Join, Qrom, Rz, Split, Toffoli};
use bloq_ir::{
    Bloq, BloqBuilder, BloqRef, CompositeBloq, DecomposeError, DecomposeResult, ParameterExpression,
    QDType, Signature, SymbolicInt,
};
use ndarray::array;

/// `Rz(π / 2^(i+1))` on bit `i` of an `n`-qubit register.
///
/// The first two angles are a Clifford and a T gate; the rest are arbitrary
/// rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotateEach {
    pub n: usize,
}

impl fmt::Display for RotateEach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RotateEach({})", self.n)
    }
}

impl Bloq for RotateEach {
    fn signature(&self) -> Signature {
        Signature::build(&[("x", QDType::QAny(SymbolicInt::from(self.n)))])
    }

    fn decompose_bloq(&self) -> DecomposeResult<CompositeBloq> {
        let fail = |source| DecomposeError::Failed {
            bloq: self.to_string(),
            source,
        };
        let (mut bb, regs) = BloqBuilder::from_signature(self.signature());
        let bits = bb
            .add(Split { n: self.n }, &[("reg", regs["x"].clone())])
            .map_err(fail)?;
        let mut rotated = Vec::with_capacity(self.n);
        for (i, bit) in bits["reg"].iter().enumerate() {
            let angle = PI / 2f64.powi(i as i32 + 1);
            let out = bb
                .add(Rz::new(angle), &[("q", vec![bit.clone()])])
                .map_err(fail)?;
            rotated.extend(out["q"].iter().cloned());
        }
        let joined = bb
            .add(Join { n: self.n }, &[("reg", rotated)])
            .map_err(fail)?;
        bb.finalize(&[("x", joined["reg"].clone())]).map_err(fail)
    }
}

/// `exp(-i θ/2 Z⊗Z)` on two qubits, computed into a borrowed ancilla.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParityRotation {
    pub angle: ParameterExpression,
}

impl fmt::Display for ParityRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParityRotation({})", self.angle)
    }
}

impl Bloq for ParityRotation {
    fn signature(&self) -> Signature {
        Signature::build(&[("a", QDType::QBit), ("b", QDType::QBit)])
    }

    fn decompose_bloq(&self) -> DecomposeResult<CompositeBloq> {
        let fail = |source| DecomposeError::Failed {
            bloq: self.to_string(),
            source,
        };
        let (mut bb, regs) = BloqBuilder::from_signature(self.signature());
        let anc = bb
            .add(Allocate { dtype: QDType::QBit }, &[])
            .map_err(fail)?;
        let first = bb
            .add(CNOT, &[("ctrl", regs["a"].clone()), ("target", anc["reg"].clone())])
            .map_err(fail)?;
        let second = bb
            .add(CNOT, &[("ctrl", regs["b"].clone()), ("target", first["target"].clone())])
            .map_err(fail)?;
        let rotated = bb
            .add(Rz::new(self.angle.clone()), &[("q", second["target"].clone())])
            .map_err(fail)?;
        let third = bb
            .add(CNOT, &[("ctrl", second["ctrl"].clone()), ("target", rotated["q"].clone())])
            .map_err(fail)?;
        let fourth = bb
            .add(CNOT, &[("ctrl", first["ctrl"].clone()), ("target", third["target"].clone())])
            .map_err(fail)?;
        bb.add(Free { dtype: QDType::QBit }, &[("reg", fourth["target"].clone())])
            .map_err(fail)?;
        bb.finalize(&[("a", fourth["ctrl"].clone()), ("b", third["ctrl"].clone())])
            .map_err(fail)
    }
}

/// One catalogue entry.
pub struct Entry {
    pub name: &'static str,
    pub about: &'static str,
    make: fn() -> BloqRef,
}

impl Entry {
    pub fn bloq(&self) -> BloqRef {
        (self.make)()
    }
}

/// Every bloq the CLI can name.
pub const ENTRIES: &[Entry] = &[
    Entry {
        name: "qrom",
        about: "QROM over 8 concrete 4-bit words",
        make: || BloqRef::new(Qrom::new(array![3, 1, 4, 1, 5, 9, 2, 6], 4)),
    },
    Entry {
        name: "qrom-symbolic",
        about: "QROM over N words of 8 bits",
        make: || BloqRef::new(Qrom::symbolic("N", "s", 8)),
    },
    Entry {
        name: "rotate-each",
        about: "Split, rotate every bit by a different angle, join (6 qubits)",
        make: || BloqRef::new(RotateEach { n: 6 }),
    },
    Entry {
        name: "parity-rotation",
        about: "ZZ rotation by 0.3 through an allocated ancilla",
        make: || {
            BloqRef::new(ParityRotation {
                angle: ParameterExpression::constant(0.3),
            })
        },
    },
    Entry {
        name: "toffoli",
        about: "Toffoli gate",
        make: || BloqRef::new(Toffoli),
    },
    Entry {
        name: "and",
        about: "Logical AND into a fresh target",
        make: || BloqRef::new(And::default()),
    },
];

/// Look up a catalogue bloq by name.
pub fn lookup(name: &str) -> Result<BloqRef> {
    ENTRIES
        .iter()
        .find(|e| e.name == name)
        .map(Entry::bloq)
        .ok_or_else(|| {
            let known: Vec<_> = ENTRIES.iter().map(|e| e.name).collect();
            anyhow::anyhow!("Unknown bloq: '{name}'. Available: {}", known.join(", "))
        })
}
