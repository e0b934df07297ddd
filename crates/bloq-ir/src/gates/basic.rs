//! Primitive gates. All of them are leaves with fixed gate counts.

use std::fmt;

use crate::bloq::Bloq;
use crate::gate_counts::GateCounts;
use crate::signature::{QDType, Register, Side, Signature};
use crate::symbolic::SymbolicInt;

fn one_qubit() -> Signature {
    Signature::build(&[("q", QDType::QBit)])
}

macro_rules! clifford_1q {
    ($(#[$doc:meta])* $name:ident, $display:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $display)
            }
        }

        impl Bloq for $name {
            fn signature(&self) -> Signature {
                one_qubit()
            }

            fn my_gate_counts(&self) -> Option<GateCounts> {
                Some(GateCounts::clifford(1))
            }
        }
    };
}

clifford_1q!(
    /// Hadamard gate.
    Hadamard,
    "H"
);
clifford_1q!(
    /// Pauli-X gate.
    XGate,
    "X"
);

/// T gate or its adjoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TGate {
    /// True for T†.
    pub is_adjoint: bool,
}

impl TGate {
    /// The adjoint gate.
    pub fn adjoint(self) -> Self {
        Self {
            is_adjoint: !self.is_adjoint,
        }
    }
}

impl fmt::Display for TGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_adjoint { write!(f, "T†") } else { write!(f, "T") }
    }
}

impl Bloq for TGate {
    fn signature(&self) -> Signature {
        one_qubit()
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::t(1))
    }
}

/// S gate or its adjoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SGate {
    /// True for S†.
    pub is_adjoint: bool,
}

impl fmt::Display for SGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_adjoint { write!(f, "S†") } else { write!(f, "S") }
    }
}

impl Bloq for SGate {
    fn signature(&self) -> Signature {
        one_qubit()
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::clifford(1))
    }
}

/// Controlled NOT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CNOT;

impl fmt::Display for CNOT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CNOT")
    }
}

impl Bloq for CNOT {
    fn signature(&self) -> Signature {
        Signature::build(&[("ctrl", QDType::QBit), ("target", QDType::QBit)])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::clifford(1))
    }
}

/// Doubly controlled NOT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Toffoli;

impl fmt::Display for Toffoli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Toffoli")
    }
}

impl Bloq for Toffoli {
    fn signature(&self) -> Signature {
        Signature::from_iter_unchecked([
            Register::new("ctrl", QDType::QBit).with_shape(vec![2]),
            Register::new("target", QDType::QBit),
        ])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::toffoli(1))
    }
}

/// Controlled swap of two `bitsize`-qubit registers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CSwap {
    /// Width of each swapped register.
    pub bitsize: SymbolicInt,
}

impl CSwap {
    /// Controlled swap of `bitsize`-qubit registers.
    pub fn new(bitsize: impl Into<SymbolicInt>) -> Self {
        Self {
            bitsize: bitsize.into(),
        }
    }
}

impl fmt::Display for CSwap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CSwap({})", self.bitsize)
    }
}

impl Bloq for CSwap {
    fn signature(&self) -> Signature {
        Signature::build(&[
            ("ctrl", QDType::QBit),
            ("x", QDType::QAny(self.bitsize.clone())),
            ("y", QDType::QAny(self.bitsize.clone())),
        ])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::cswap(self.bitsize.clone()))
    }
}

/// Logical AND of two controls into a fresh target.
///
/// The uncompute direction consumes the target and is measurement based,
/// so it needs no T gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct And {
    /// Control value of the first control.
    pub cv1: bool,
    /// Control value of the second control.
    pub cv2: bool,
    /// True for the uncomputing direction.
    pub uncompute: bool,
}

impl Default for And {
    fn default() -> Self {
        Self {
            cv1: true,
            cv2: true,
            uncompute: false,
        }
    }
}

impl And {
    /// The uncomputing AND with the same control values.
    pub fn adjoint(self) -> Self {
        Self {
            uncompute: !self.uncompute,
            ..self
        }
    }
}

impl fmt::Display for And {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dag = if self.uncompute { "†" } else { "" };
        if self.cv1 && self.cv2 {
            write!(f, "And{dag}")
        } else {
            write!(f, "And{dag}({}, {})", u8::from(self.cv1), u8::from(self.cv2))
        }
    }
}

impl Bloq for And {
    fn signature(&self) -> Signature {
        let side = if self.uncompute { Side::Left } else { Side::Right };
        Signature::from_iter_unchecked([
            Register::new("ctrl", QDType::QBit).with_shape(vec![2]),
            Register::new("target", QDType::QBit).with_side(side),
        ])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        let flips = i64::from(!self.cv1) + i64::from(!self.cv2);
        if self.uncompute {
            Some(GateCounts::measurement(1) + GateCounts::clifford(1 + 2 * flips))
        } else {
            Some(GateCounts::and_bloq(1) + GateCounts::clifford(2 * flips))
        }
    }
}

/// Z-basis measurement of one qubit into a classical bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MeasureZ;

impl fmt::Display for MeasureZ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MeasZ")
    }
}

impl Bloq for MeasureZ {
    fn signature(&self) -> Signature {
        Signature::from_iter_unchecked([
            Register::new("q", QDType::QBit).with_side(Side::Left),
            Register::new("c", QDType::CBit).with_side(Side::Right),
        ])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(GateCounts::measurement(1))
    }
}
