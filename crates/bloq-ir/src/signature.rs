//! Registers and signatures: the typed ports of a bloq.

use crate::error::{BloqError, BloqResult};
use crate::symbolic::SymbolicInt;
use serde::Serialize;
use std::fmt;

/// Data type carried by a register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum QDType {
    /// A single qubit.
    QBit,
    /// A single classical bit.
    CBit,
    /// An untyped bag of qubits.
    QAny(SymbolicInt),
    /// An unsigned quantum integer.
    QUInt(SymbolicInt),
    /// A signed quantum integer.
    QInt(SymbolicInt),
}

impl QDType {
    /// Number of qubits one value of this type occupies.
    pub fn num_qubits(&self) -> SymbolicInt {
        match self {
            QDType::QBit => SymbolicInt::one(),
            QDType::CBit => SymbolicInt::zero(),
            QDType::QAny(n) | QDType::QUInt(n) | QDType::QInt(n) => n.clone(),
        }
    }

    /// Bit width including classical bits.
    pub fn bitsize(&self) -> SymbolicInt {
        match self {
            QDType::CBit => SymbolicInt::one(),
            other => other.num_qubits(),
        }
    }
}

impl fmt::Display for QDType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QDType::QBit => write!(f, "QBit()"),
            QDType::CBit => write!(f, "CBit()"),
            QDType::QAny(n) => write!(f, "QAny({n})"),
            QDType::QUInt(n) => write!(f, "QUInt({n})"),
            QDType::QInt(n) => write!(f, "QInt({n})"),
        }
    }
}

/// Direction of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    /// Input only: consumed by the bloq.
    Left,
    /// Output only: produced by the bloq.
    Right,
    /// Both input and output.
    Thru,
}

impl Side {
    /// True if the register is an input.
    pub fn is_left(self) -> bool {
        matches!(self, Side::Left | Side::Thru)
    }

    /// True if the register is an output.
    pub fn is_right(self) -> bool {
        matches!(self, Side::Right | Side::Thru)
    }
}

/// A named, typed, possibly multi-dimensional port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Register {
    name: String,
    dtype: QDType,
    shape: Vec<usize>,
    side: Side,
}

impl Register {
    /// A scalar thru-register.
    pub fn new(name: impl Into<String>, dtype: QDType) -> Self {
        Self {
            name: name.into(),
            dtype,
            shape: Vec::new(),
            side: Side::Thru,
        }
    }

    /// Set the side of this register.
    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Set the array shape of this register.
    #[must_use]
    pub fn with_shape(mut self, shape: Vec<usize>) -> Self {
        self.shape = shape;
        self
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Data type of each element.
    pub fn dtype(&self) -> &QDType {
        &self.dtype
    }

    /// Array shape (empty for scalars).
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Register side.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of elements (soquets) in this register.
    pub fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }

    /// Qubits across all elements.
    pub fn total_qubits(&self) -> SymbolicInt {
        self.dtype.num_qubits() * SymbolicInt::from(self.num_elements())
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.dtype)?;
        if !self.shape.is_empty() {
            write!(f, "{:?}", self.shape)?;
        }
        match self.side {
            Side::Thru => Ok(()),
            Side::Left => write!(f, " (left)"),
            Side::Right => write!(f, " (right)"),
        }
    }
}

/// Ordered collection of registers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Signature {
    registers: Vec<Register>,
}

impl Signature {
    /// Build a signature, rejecting duplicate names on the same side.
    pub fn new(registers: Vec<Register>) -> BloqResult<Self> {
        for (i, reg) in registers.iter().enumerate() {
            for prior in &registers[..i] {
                if prior.name != reg.name {
                    continue;
                }
                if prior.side.is_left() && reg.side.is_left() {
                    return Err(BloqError::DuplicateRegister {
                        name: reg.name.clone(),
                        side: Side::Left,
                    });
                }
                if prior.side.is_right() && reg.side.is_right() {
                    return Err(BloqError::DuplicateRegister {
                        name: reg.name.clone(),
                        side: Side::Right,
                    });
                }
            }
        }
        Ok(Self { registers })
    }

    /// Signature of scalar thru-registers, one per `(name, dtype)` pair.
    ///
    /// Names must be distinct; this is meant for bloq definitions with
    /// fixed register lists.
    pub fn build(regs: &[(&str, QDType)]) -> Self {
        Self {
            registers: regs
                .iter()
                .map(|(name, dtype)| Register::new(*name, dtype.clone()))
                .collect(),
        }
    }

    /// Signature for registers already known to have distinct names.
    pub(crate) fn from_iter_unchecked(registers: impl IntoIterator<Item = Register>) -> Self {
        Self {
            registers: registers.into_iter().collect(),
        }
    }

    /// All registers in declaration order.
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Input registers.
    pub fn lefts(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter().filter(|r| r.side.is_left())
    }

    /// Output registers.
    pub fn rights(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter().filter(|r| r.side.is_right())
    }

    /// Input register by name.
    pub fn get_left(&self, name: &str) -> Option<&Register> {
        self.lefts().find(|r| r.name == name)
    }

    /// Output register by name.
    pub fn get_right(&self, name: &str) -> Option<&Register> {
        self.rights().find(|r| r.name == name)
    }

    /// Number of registers.
    pub fn len(&self) -> usize {
        self.registers.len()
    }

    /// True if the signature has no registers.
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Qubits the bloq acts on: the larger of its input and output widths.
    ///
    /// When the two totals are symbolic and incomparable, their sum is
    /// returned as an upper bound.
    pub fn n_qubits(&self) -> SymbolicInt {
        let left: SymbolicInt = self.lefts().map(Register::total_qubits).sum();
        let right: SymbolicInt = self.rights().map(Register::total_qubits).sum();
        left.try_max(&right).unwrap_or_else(|| left + right)
    }
}
