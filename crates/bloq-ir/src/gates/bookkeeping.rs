//! Wire-management bloqs. They move or create qubits but apply no gates.

use std::fmt;

use crate::bloq::Bloq;
use crate::gate_counts::GateCounts;
use crate::signature::{QDType, Register, Side, Signature};
use crate::symbolic::SymbolicInt;

/// Split an `n`-qubit register into `n` single qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Split {
    /// Number of qubits.
    pub n: usize,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Split({})", self.n)
    }
}

impl Bloq for Split {
    fn signature(&self) -> Signature {
        Signature::from_iter_unchecked([
            Register::new("reg", QDType::QAny(SymbolicInt::from(self.n))).with_side(Side::Left),
            Register::new("reg", QDType::QBit)
                .with_shape(vec![self.n])
                .with_side(Side::Right),
        ])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::zero())
    }
}

/// Join `n` single qubits into one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Join {
    /// Number of qubits.
    pub n: usize,
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Join({})", self.n)
    }
}

impl Bloq for Join {
    fn signature(&self) -> Signature {
        Signature::from_iter_unchecked([
            Register::new("reg", QDType::QBit)
                .with_shape(vec![self.n])
                .with_side(Side::Left),
            Register::new("reg", QDType::QAny(SymbolicInt::from(self.n))).with_side(Side::Right),
        ])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::zero())
    }
}

/// Bring a fresh register in the zero state into scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Allocate {
    /// Type of the allocated register.
    pub dtype: QDType,
}

impl fmt::Display for Allocate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Allocate({})", self.dtype)
    }
}

impl Bloq for Allocate {
    fn signature(&self) -> Signature {
        Signature::from_iter_unchecked([
            Register::new("reg", self.dtype.clone()).with_side(Side::Right)
        ])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::zero())
    }
}

/// Release a register known to be in the zero state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Free {
    /// Type of the freed register.
    pub dtype: QDType,
}

impl fmt::Display for Free {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Free({})", self.dtype)
    }
}

impl Bloq for Free {
    fn signature(&self) -> Signature {
        Signature::from_iter_unchecked([
            Register::new("reg", self.dtype.clone()).with_side(Side::Left)
        ])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::BloqBuilder;
    use crate::gates::Hadamard;

    #[test]
    fn test_split_then_join() {
        let sig = Signature::build(&[("x", QDType::QAny(SymbolicInt::from(2)))]);
        let (mut bb, regs) = BloqBuilder::from_signature(sig);
        let bits = bb.add(Split { n: 2 }, &[("reg", regs["x"].clone())]).unwrap();
        let h = bb.add(Hadamard, &[("q", vec![bits["reg"][0].clone()])]).unwrap();
        let joined = bb
            .add(
                Join { n: 2 },
                &[("reg", vec![h["q"][0].clone(), bits["reg"][1].clone()])],
            )
            .unwrap();
        let cbloq = bb.finalize(&[("x", joined["reg"].clone())]).unwrap();
        assert_eq!(cbloq.callee_counts().len(), 3);
    }

    #[test]
    fn test_allocate_free_widths() {
        let alloc = Allocate {
            dtype: QDType::QAny(SymbolicInt::symbol("n")),
        };
        assert_eq!(alloc.signature().n_qubits(), SymbolicInt::symbol("n"));
        assert_eq!(alloc.signature().lefts().count(), 0);
        assert!(alloc.my_gate_counts().unwrap().is_zero());
    }
}
