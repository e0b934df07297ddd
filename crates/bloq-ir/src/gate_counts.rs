//! Gate tallies for fault-tolerant cost models.

use crate::symbolic::SymbolicInt;
use serde::Serialize;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Counts of the gates a surface-code cost model cares about.
///
/// Every field is a [`SymbolicInt`], so a tally may depend on unresolved
/// problem sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct GateCounts {
    /// T and T† gates.
    pub t: SymbolicInt,
    /// Toffoli (CCX) gates.
    pub toffoli: SymbolicInt,
    /// Controlled swaps.
    pub cswap: SymbolicInt,
    /// Logical-AND computations (uncomputation is measurement based and free).
    pub and_bloq: SymbolicInt,
    /// Clifford gates.
    pub clifford: SymbolicInt,
    /// Arbitrary-angle single-qubit rotations.
    pub rotation: SymbolicInt,
    /// Single-qubit measurements.
    pub measurement: SymbolicInt,
}

impl GateCounts {
    /// All zeros.
    pub fn zero() -> Self {
        Self::default()
    }

    /// `n` T gates.
    pub fn t(n: impl Into<SymbolicInt>) -> Self {
        Self {
            t: n.into(),
            ..Self::default()
        }
    }

    /// `n` Toffolis.
    pub fn toffoli(n: impl Into<SymbolicInt>) -> Self {
        Self {
            toffoli: n.into(),
            ..Self::default()
        }
    }

    /// `n` controlled swaps.
    pub fn cswap(n: impl Into<SymbolicInt>) -> Self {
        Self {
            cswap: n.into(),
            ..Self::default()
        }
    }

    /// `n` logical ANDs.
    pub fn and_bloq(n: impl Into<SymbolicInt>) -> Self {
        Self {
            and_bloq: n.into(),
            ..Self::default()
        }
    }

    /// `n` Cliffords.
    pub fn clifford(n: impl Into<SymbolicInt>) -> Self {
        Self {
            clifford: n.into(),
            ..Self::default()
        }
    }

    /// `n` rotations.
    pub fn rotation(n: impl Into<SymbolicInt>) -> Self {
        Self {
            rotation: n.into(),
            ..Self::default()
        }
    }

    /// `n` measurements.
    pub fn measurement(n: impl Into<SymbolicInt>) -> Self {
        Self {
            measurement: n.into(),
            ..Self::default()
        }
    }

    /// True if every field is zero.
    pub fn is_zero(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_zero())
    }

    /// Multiply every field by `n`.
    #[must_use]
    pub fn scale(&self, n: &SymbolicInt) -> Self {
        Self {
            t: &self.t * n,
            toffoli: &self.toffoli * n,
            cswap: &self.cswap * n,
            and_bloq: &self.and_bloq * n,
            clifford: &self.clifford * n,
            rotation: &self.rotation * n,
            measurement: &self.measurement * n,
        }
    }

    /// T-count after synthesizing Toffolis, controlled swaps and ANDs from T
    /// gates at the given rates. Rotations are not included.
    pub fn total_t_count_with(
        &self,
        ts_per_toffoli: i64,
        ts_per_cswap: i64,
        ts_per_and_bloq: i64,
    ) -> SymbolicInt {
        &self.t
            + self.toffoli.scale(ts_per_toffoli)
            + self.cswap.scale(ts_per_cswap)
            + self.and_bloq.scale(ts_per_and_bloq)
    }

    /// T-count with the standard rates: 4 per Toffoli, 7 per controlled
    /// swap and 4 per AND.
    pub fn total_t_count(&self) -> SymbolicInt {
        self.total_t_count_with(4, 7, 4)
    }

    /// Toffoli-count when every non-Clifford is a Toffoli-class gate.
    ///
    /// Returns `None` if the tally contains T gates or rotations, which do
    /// not convert.
    pub fn total_toffoli_only(&self) -> Option<SymbolicInt> {
        if !self.t.is_zero() || !self.rotation.is_zero() {
            return None;
        }
        Some(&self.toffoli + &self.cswap + &self.and_bloq)
    }

    /// T and CCZ counts, folding controlled swaps and ANDs into CCZs.
    pub fn total_t_and_ccz_count(&self) -> (SymbolicInt, SymbolicInt) {
        let ccz = &self.toffoli + &self.cswap + &self.and_bloq;
        (self.t.clone(), ccz)
    }

    /// Name/value pairs for every field, in declaration order.
    pub fn fields(&self) -> [(&'static str, &SymbolicInt); 7] {
        [
            ("t", &self.t),
            ("toffoli", &self.toffoli),
            ("cswap", &self.cswap),
            ("and_bloq", &self.and_bloq),
            ("clifford", &self.clifford),
            ("rotation", &self.rotation),
            ("measurement", &self.measurement),
        ]
    }
}

impl Add<&GateCounts> for &GateCounts {
    type Output = GateCounts;

    fn add(self, rhs: &GateCounts) -> GateCounts {
        GateCounts {
            t: &self.t + &rhs.t,
            toffoli: &self.toffoli + &rhs.toffoli,
            cswap: &self.cswap + &rhs.cswap,
            and_bloq: &self.and_bloq + &rhs.and_bloq,
            clifford: &self.clifford + &rhs.clifford,
            rotation: &self.rotation + &rhs.rotation,
            measurement: &self.measurement + &rhs.measurement,
        }
    }
}

impl Add for GateCounts {
    type Output = GateCounts;

    fn add(self, rhs: GateCounts) -> GateCounts {
        &self + &rhs
    }
}

impl AddAssign<&GateCounts> for GateCounts {
    fn add_assign(&mut self, rhs: &GateCounts) {
        *self = &*self + rhs;
    }
}

impl fmt::Display for GateCounts {
    /// Only nonzero fields are printed, e.g. `t: 4, clifford: 10`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.fields() {
            if value.is_zero() {
                continue;
            }
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
            first = false;
        }
        if first {
            write!(f, "-")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_t_count() {
        let gc = GateCounts {
            t: 2.into(),
            toffoli: 1.into(),
            cswap: 1.into(),
            and_bloq: 3.into(),
            ..GateCounts::default()
        };
        assert_eq!(gc.total_t_count(), SymbolicInt::from(2 + 4 + 7 + 12));
        assert_eq!(gc.total_t_count_with(7, 7, 4), SymbolicInt::from(2 + 7 + 7 + 12));
    }

    #[test]
    fn test_toffoli_only() {
        let gc = GateCounts::toffoli(3) + GateCounts::and_bloq(2) + GateCounts::clifford(9);
        assert_eq!(gc.total_toffoli_only(), Some(SymbolicInt::from(5)));
        assert_eq!((gc + GateCounts::t(1)).total_toffoli_only(), None);
    }

    #[test]
    fn test_symbolic_scale_and_display() {
        let n = SymbolicInt::symbol("N");
        let gc = (GateCounts::and_bloq(1) + GateCounts::clifford(2)).scale(&(n - 1));
        assert_eq!(gc.to_string(), "and_bloq: N - 1, clifford: 2*N - 2");
        assert_eq!(gc.total_t_count().to_string(), "4*N - 4");
        assert_eq!(GateCounts::zero().to_string(), "-");
        assert!(GateCounts::zero().is_zero());
    }

    #[test]
    fn test_t_and_ccz() {
        let gc = GateCounts::t(5) + GateCounts::toffoli(2) + GateCounts::cswap(1);
        let (t, ccz) = gc.total_t_and_ccz_count();
        assert_eq!(t, SymbolicInt::from(5));
        assert_eq!(ccz, SymbolicInt::from(3));
    }
}
