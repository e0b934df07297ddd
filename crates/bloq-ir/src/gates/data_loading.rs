//! Loading classical data into quantum registers.

use ndarray::Array1;
use std::fmt;

use crate::allocator::SymbolAllocator;
use crate::bloq::{Bloq, BloqCount};
use crate::composite::CompositeBloq;
use crate::error::{DecomposeError, DecomposeResult};
use crate::gates::{And, CNOT};
use crate::shaped::{Shaped, Symbolic};
use crate::signature::{QDType, Signature};
use crate::symbolic::SymbolicInt;

/// Classical table held by a [`Qrom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QromData {
    /// Actual table contents.
    Concrete(Array1<u64>),
    /// Only the table's length is known.
    Shaped(Shaped),
}

impl QromData {
    /// Number of table entries.
    pub fn len(&self) -> SymbolicInt {
        match self {
            QromData::Concrete(data) => SymbolicInt::from(data.len()),
            QromData::Shaped(shaped) => shaped.size(),
        }
    }

    /// True if the table is concrete and empty.
    pub fn is_empty(&self) -> bool {
        self.len().is_zero()
    }

    /// True if the table length is symbolic.
    pub fn is_symbolic(&self) -> bool {
        match self {
            QromData::Concrete(_) => false,
            QromData::Shaped(shaped) => shaped.is_symbolic(),
        }
    }
}

impl Symbolic for QromData {
    fn is_symbolic(&self) -> bool {
        QromData::is_symbolic(self)
    }
}

/// Table lookup by unary iteration: `|i>|0> -> |i>|data[i]>`.
///
/// Its callee counts are stated directly, so they are available even when
/// the table length is a symbol. Building the explicit circuit needs
/// concrete data and is not provided here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Qrom {
    /// The table.
    pub data: QromData,
    /// Width of the selection register.
    pub selection_bitsize: SymbolicInt,
    /// Width of each table entry.
    pub target_bitsize: SymbolicInt,
}

impl Qrom {
    /// QROM over concrete data, with the smallest selection register that
    /// addresses every entry.
    pub fn new(data: Array1<u64>, target_bitsize: impl Into<SymbolicInt>) -> Self {
        let selection = usize::BITS - data.len().saturating_sub(1).leading_zeros();
        Self {
            data: QromData::Concrete(data),
            selection_bitsize: SymbolicInt::from(selection.max(1)),
            target_bitsize: target_bitsize.into(),
        }
    }

    /// QROM whose table is known only by its length.
    pub fn symbolic(
        len: impl Into<SymbolicInt>,
        selection_bitsize: impl Into<SymbolicInt>,
        target_bitsize: impl Into<SymbolicInt>,
    ) -> Self {
        Self {
            data: QromData::Shaped(Shaped::new(vec![len.into()])),
            selection_bitsize: selection_bitsize.into(),
            target_bitsize: target_bitsize.into(),
        }
    }

    fn num_cnots(&self) -> SymbolicInt {
        match &self.data {
            QromData::Concrete(data) => {
                SymbolicInt::from(data.iter().map(|v| v.count_ones() as usize).sum::<usize>())
            }
            QromData::Shaped(shaped) => &shaped.size() * &self.target_bitsize,
        }
    }

    /// ANDs in the unary-iteration ladder: one fewer than the entries, never
    /// negative. A symbolic length `N` is assumed to be at least one.
    fn num_ands(&self) -> SymbolicInt {
        let ladder = self.data.len() - 1;
        ladder.try_max(&SymbolicInt::zero()).unwrap_or(ladder)
    }
}

impl fmt::Display for Qrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QROM({})", self.data.len())
    }
}

impl Bloq for Qrom {
    fn signature(&self) -> Signature {
        Signature::build(&[
            ("selection", QDType::QUInt(self.selection_bitsize.clone())),
            ("target", QDType::QAny(self.target_bitsize.clone())),
        ])
    }

    fn decompose_bloq(&self) -> DecomposeResult<CompositeBloq> {
        if self.data.is_symbolic() {
            return Err(DecomposeError::symbolic(self, "table length is symbolic"));
        }
        Err(DecomposeError::NotImplemented(self.to_string()))
    }

    fn build_call_graph(&self, _ssa: &mut SymbolAllocator) -> DecomposeResult<Vec<BloqCount>> {
        let ladder = self.num_ands();
        let mut callees = Vec::new();
        if !ladder.is_zero() {
            callees.push(BloqCount::of(And::default(), ladder.clone()));
            callees.push(BloqCount::of(And::default().adjoint(), ladder));
        }
        let cnots = self.num_cnots();
        if !cnots.is_zero() {
            callees.push(BloqCount::of(CNOT, cnots));
        }
        Ok(callees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloq::BloqRef;
    use ndarray::array;

    #[test]
    fn test_concrete_counts() {
        let qrom = Qrom::new(array![1, 2, 3, 0], 2);
        assert_eq!(qrom.selection_bitsize, SymbolicInt::from(2));
        let callees = qrom.build_call_graph(&mut SymbolAllocator::new()).unwrap();
        assert_eq!(callees.len(), 3);
        assert_eq!(callees[0], BloqCount::of(And::default(), 3));
        assert_eq!(callees[2], BloqCount::of(CNOT, 4));
        assert!(qrom.decompose_bloq().unwrap_err().is_leaf_signal());
    }

    #[test]
    fn test_symbolic_length() {
        let qrom = Qrom::symbolic("N", "s", 8);
        assert!(qrom.data.is_symbolic());
        let err = qrom.decompose_bloq().unwrap_err();
        assert!(matches!(err, DecomposeError::Symbolic { .. }));

        let callees = qrom.build_call_graph(&mut SymbolAllocator::new()).unwrap();
        assert_eq!(callees[0].count.to_string(), "N - 1");
        assert_eq!(callees[2].count.to_string(), "8*N");
    }

    #[test]
    fn test_array_contents_distinguish_bloqs() {
        let a = BloqRef::new(Qrom::new(array![1, 2], 4));
        let b = BloqRef::new(Qrom::new(array![1, 2], 4));
        let c = BloqRef::new(Qrom::new(array![2, 1], 4));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_table_has_no_callees() {
        let qrom = Qrom::new(Array1::zeros(0), 1);
        assert!(qrom.data.is_empty());
        assert_eq!(qrom.num_ands(), SymbolicInt::zero());
        let callees = qrom.build_call_graph(&mut SymbolAllocator::new()).unwrap();
        assert!(callees.is_empty());

        let shaped = Qrom::symbolic(0, 1, 8);
        assert!(shaped.build_call_graph(&mut SymbolAllocator::new()).unwrap().is_empty());
    }

    #[test]
    fn test_single_entry_has_no_ladder() {
        let qrom = Qrom::new(array![5], 3);
        let callees = qrom.build_call_graph(&mut SymbolAllocator::new()).unwrap();
        assert_eq!(callees, vec![BloqCount::of(CNOT, 2)]);
    }
}
