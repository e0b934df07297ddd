//! Stand-ins for array data whose shape may still be symbolic.

use crate::parameter::ParameterExpression;
use crate::symbolic::SymbolicInt;
use serde::Serialize;
use std::fmt;

/// Values that may contain unresolved symbols.
pub trait Symbolic {
    /// True if any part of the value is symbolic.
    fn is_symbolic(&self) -> bool;
}

impl Symbolic for SymbolicInt {
    fn is_symbolic(&self) -> bool {
        SymbolicInt::is_symbolic(self)
    }
}

impl Symbolic for ParameterExpression {
    fn is_symbolic(&self) -> bool {
        ParameterExpression::is_symbolic(self)
    }
}

impl<T: Symbolic> Symbolic for [T] {
    fn is_symbolic(&self) -> bool {
        self.iter().any(Symbolic::is_symbolic)
    }
}

/// An "array" known only by its shape.
///
/// Data-loading bloqs hold a `Shaped` in place of real contents so that
/// their cost can be stated for a problem size that has not been fixed,
/// e.g. a QROM over `N` entries.
///
/// ```rust
/// use bloq_ir::{Shaped, SymbolicInt};
///
/// let data = Shaped::new(vec![SymbolicInt::symbol("N")]);
/// assert!(data.is_symbolic());
/// assert_eq!(data.concrete_shape(), None);
///
/// let data = Shaped::from_dims(&[4, 8]);
/// assert_eq!(data.size().as_i64(), Some(32));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Shaped {
    shape: Vec<SymbolicInt>,
}

impl Shaped {
    /// Create a shaped stand-in from per-dimension extents.
    pub fn new(shape: Vec<SymbolicInt>) -> Self {
        Self { shape }
    }

    /// Create a fully concrete shape.
    pub fn from_dims(dims: &[usize]) -> Self {
        Self::new(dims.iter().map(|&d| SymbolicInt::from(d)).collect())
    }

    /// Extent of every dimension.
    pub fn shape(&self) -> &[SymbolicInt] {
        &self.shape
    }

    /// True if any dimension is symbolic.
    pub fn is_symbolic(&self) -> bool {
        self.shape.is_symbolic()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements (the product of all extents).
    pub fn size(&self) -> SymbolicInt {
        self.shape
            .iter()
            .fold(SymbolicInt::one(), |acc, d| &acc * d)
    }

    /// The shape as plain integers, if no dimension is symbolic.
    pub fn concrete_shape(&self) -> Option<Vec<usize>> {
        self.shape
            .iter()
            .map(|d| d.as_i64().and_then(|v| usize::try_from(v).ok()))
            .collect()
    }
}

impl Symbolic for Shaped {
    fn is_symbolic(&self) -> bool {
        Shaped::is_symbolic(self)
    }
}

impl fmt::Display for Shaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shaped(")?;
        for (i, d) in self.shape.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_shape() {
        let s = Shaped::from_dims(&[3, 5]);
        assert!(!s.is_symbolic());
        assert_eq!(s.ndim(), 2);
        assert_eq!(s.concrete_shape(), Some(vec![3, 5]));
        assert_eq!(s.size(), SymbolicInt::from(15));
    }

    #[test]
    fn test_symbolic_shape() {
        let n = SymbolicInt::symbol("N");
        let s = Shaped::new(vec![n.clone(), SymbolicInt::from(2)]);
        assert!(s.is_symbolic());
        assert_eq!(s.concrete_shape(), None);
        assert_eq!(s.size(), n * 2);
        assert_eq!(s.to_string(), "Shaped(N, 2)");
    }

    #[test]
    fn test_equal_shapes_are_equal() {
        let a = Shaped::new(vec![SymbolicInt::symbol("N")]);
        let b = Shaped::new(vec![SymbolicInt::symbol("N")]);
        assert_eq!(a, b);
        assert_ne!(a, Shaped::new(vec![SymbolicInt::symbol("M")]));
    }
}
