//! Symbolic integers used for call counts and register sizes.
//!
//! A [`SymbolicInt`] is a multivariate polynomial with arbitrary-precision
//! integer coefficients. Concrete integers are the constant polynomials, so one type serves as the
//! multiplicity semiring of the call graph whether or not a problem size has
//! been fixed.
//!
//! Polynomials are stored in canonical form (sorted monomials, no zero
//! coefficients). Two values are `==` and hash equally exactly when they are
//! the same polynomial, which is what memoization keys need.
//!
//! # Example
//!
//! ```rust
//! use bloq_ir::SymbolicInt;
//!
//! let n = SymbolicInt::symbol("N");
//! let t_count = SymbolicInt::from(4) * (n.clone() - 1);
//! assert_eq!(t_count.to_string(), "4*N - 4");
//! assert_eq!(t_count.eval(&[("N", 8)]), Some(28.into()));
//! assert_eq!(t_count.big_o().to_string(), "N");
//! ```

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Serialize, Serializer};

/// A product of symbols raised to positive powers. The empty monomial is `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Monomial(BTreeMap<String, u32>);

impl Monomial {
    /// The unit monomial.
    pub fn one() -> Self {
        Self::default()
    }

    /// A single symbol to the first power.
    pub fn symbol(name: impl Into<String>) -> Self {
        let mut powers = BTreeMap::new();
        powers.insert(name.into(), 1);
        Self(powers)
    }

    /// Check if this is the unit monomial.
    #[inline]
    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    /// Total degree.
    pub fn degree(&self) -> u32 {
        self.0.values().sum()
    }

    /// Iterate over `(symbol, power)` pairs in symbol order.
    pub fn powers(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(s, &p)| (s.as_str(), p))
    }

    fn product(&self, other: &Monomial) -> Monomial {
        let mut powers = self.0.clone();
        for (sym, p) in &other.0 {
            *powers.entry(sym.clone()).or_insert(0) += p;
        }
        Monomial(powers)
    }

    /// Graded lexicographic order: higher degree first, then the higher
    /// power of the alphabetically first symbol.
    fn grlex_cmp(&self, other: &Monomial) -> Ordering {
        other.degree().cmp(&self.degree()).then_with(|| {
            let symbols: BTreeSet<&String> = self.0.keys().chain(other.0.keys()).collect();
            for sym in symbols {
                let a = self.0.get(sym).copied().unwrap_or(0);
                let b = other.0.get(sym).copied().unwrap_or(0);
                if a != b {
                    return b.cmp(&a);
                }
            }
            Ordering::Equal
        })
    }

    /// `self` grows at least as fast as `other` when all symbols go to infinity.
    fn dominates(&self, other: &Monomial) -> bool {
        other
            .0
            .iter()
            .all(|(sym, p)| self.0.get(sym).is_some_and(|q| q >= p))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return write!(f, "1");
        }
        let mut first = true;
        for (sym, p) in self.powers() {
            if !first {
                write!(f, "*")?;
            }
            first = false;
            if p == 1 {
                write!(f, "{sym}")?;
            } else {
                write!(f, "{sym}^{p}")?;
            }
        }
        Ok(())
    }
}

/// An integer that may depend on named unknowns.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct SymbolicInt {
    terms: BTreeMap<Monomial, BigInt>,
}

impl SymbolicInt {
    /// The additive identity.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Self::constant(1)
    }

    /// A concrete integer.
    pub fn constant(value: impl Into<BigInt>) -> Self {
        let mut out = Self::zero();
        out.add_term(Monomial::one(), value.into());
        out
    }

    /// A bare symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        let mut out = Self::zero();
        out.add_term(Monomial::symbol(name), BigInt::one());
        out
    }

    fn add_term(&mut self, monomial: Monomial, coeff: BigInt) {
        if coeff.is_zero() {
            return;
        }
        match self.terms.entry(monomial) {
            Entry::Occupied(mut e) => {
                *e.get_mut() += coeff;
                if e.get().is_zero() {
                    e.remove();
                }
            }
            Entry::Vacant(e) => {
                e.insert(coeff);
            }
        }
    }

    /// Check if this is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Check if any term depends on a symbol.
    pub fn is_symbolic(&self) -> bool {
        self.terms.keys().any(|m| !m.is_one())
    }

    /// The concrete value, if there are no symbols.
    pub fn to_integer(&self) -> Option<BigInt> {
        if self.is_symbolic() {
            None
        } else {
            Some(self.constant_term())
        }
    }

    /// The concrete value, if there are no symbols and it fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        self.to_integer().and_then(|v| v.to_i64())
    }

    /// The coefficient of the unit monomial.
    pub fn constant_term(&self) -> BigInt {
        self.terms.get(&Monomial::one()).cloned().unwrap_or_default()
    }

    /// Iterate over `(monomial, coefficient)` pairs in canonical order.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &BigInt)> {
        self.terms.iter()
    }

    /// All symbol names appearing in this expression.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        self.terms
            .keys()
            .flat_map(|m| m.powers().map(|(s, _)| s.to_string()))
            .collect()
    }

    /// Highest total degree of any term (0 for constants and zero).
    pub fn degree(&self) -> u32 {
        self.terms.keys().map(Monomial::degree).max().unwrap_or(0)
    }

    /// Multiply by a concrete integer.
    #[must_use]
    pub fn scale(&self, factor: i64) -> Self {
        if factor == 0 {
            return Self::zero();
        }
        let factor = BigInt::from(factor);
        Self {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), c * &factor)).collect(),
        }
    }

    /// Raise to a non-negative integer power.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        let mut out = Self::one();
        for _ in 0..exp {
            out = &out * self;
        }
        out
    }

    /// Substitute `value` for every occurrence of `name`.
    #[must_use]
    pub fn subs(&self, name: &str, value: &SymbolicInt) -> Self {
        let mut out = Self::zero();
        for (mono, coeff) in &self.terms {
            let mut rest = BTreeMap::new();
            let mut power = 0;
            for (sym, p) in mono.powers() {
                if sym == name {
                    power = p;
                } else {
                    rest.insert(sym.to_string(), p);
                }
            }
            let mut term = Self::zero();
            term.add_term(Monomial(rest), coeff.clone());
            out += term * value.pow(power);
        }
        out
    }

    /// Evaluate with concrete values for symbols.
    ///
    /// Returns `None` if a symbol is left unbound.
    pub fn eval(&self, bindings: &[(&str, i64)]) -> Option<BigInt> {
        let mut total = BigInt::zero();
        for (mono, coeff) in &self.terms {
            let mut value = coeff.clone();
            for (sym, p) in mono.powers() {
                let (_, v) = bindings.iter().find(|(name, _)| *name == sym)?;
                value *= num_traits::pow(BigInt::from(*v), p as usize);
            }
            total += value;
        }
        Some(total)
    }

    /// The larger of two values when it can be decided for all non-negative
    /// assignments of the symbols.
    pub fn try_max(&self, other: &SymbolicInt) -> Option<SymbolicInt> {
        let diff = self - other;
        if diff.terms.values().all(|c| !c.is_negative()) {
            Some(self.clone())
        } else if diff.terms.values().all(|c| !c.is_positive()) {
            Some(other.clone())
        } else {
            None
        }
    }

    /// Asymptotic leading terms as every symbol goes to infinity.
    ///
    /// Keeps each monomial not dominated by another one, with unit
    /// coefficients, e.g. `4*N^2 + N*b + 7*N + 3` becomes `N^2 + N*b`.
    #[must_use]
    pub fn big_o(&self) -> Self {
        let monos: Vec<&Monomial> = self.terms.keys().collect();
        let mut out = Self::zero();
        for &m in &monos {
            let dominated = monos.iter().any(|&o| o != m && o.dominates(m));
            if !dominated {
                out.add_term(m.clone(), BigInt::one());
            }
        }
        out
    }
}

impl fmt::Display for SymbolicInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut ordered: Vec<(&Monomial, &BigInt)> = self.terms().collect();
        ordered.sort_by(|(a, _), (b, _)| a.grlex_cmp(b));

        for (i, (mono, coeff)) in ordered.into_iter().enumerate() {
            let magnitude = coeff.magnitude();
            match (i, coeff.is_negative()) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            if mono.is_one() {
                write!(f, "{magnitude}")?;
            } else if magnitude.is_one() {
                write!(f, "{mono}")?;
            } else {
                write!(f, "{magnitude}*{mono}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SymbolicInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolicInt({self})")
    }
}

impl Serialize for SymbolicInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_i64() {
            Some(v) => serializer.serialize_i64(v),
            None => serializer.collect_str(self),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for SymbolicInt {
                fn from(value: $t) -> Self {
                    SymbolicInt::constant(value)
                }
            }
        )*
    };
}

impl_from_int!(i128, i64, i32, u128, u64, u32, u16, u8, usize, BigInt);

impl From<&str> for SymbolicInt {
    fn from(name: &str) -> Self {
        SymbolicInt::symbol(name)
    }
}

impl Add<&SymbolicInt> for &SymbolicInt {
    type Output = SymbolicInt;

    fn add(self, rhs: &SymbolicInt) -> SymbolicInt {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl AddAssign<&SymbolicInt> for SymbolicInt {
    fn add_assign(&mut self, rhs: &SymbolicInt) {
        for (mono, coeff) in &rhs.terms {
            self.add_term(mono.clone(), coeff.clone());
        }
    }
}

impl AddAssign for SymbolicInt {
    fn add_assign(&mut self, rhs: SymbolicInt) {
        *self += &rhs;
    }
}

impl Neg for &SymbolicInt {
    type Output = SymbolicInt;

    fn neg(self) -> SymbolicInt {
        self.scale(-1)
    }
}

impl Neg for SymbolicInt {
    type Output = SymbolicInt;

    fn neg(self) -> SymbolicInt {
        self.scale(-1)
    }
}

impl Sub<&SymbolicInt> for &SymbolicInt {
    type Output = SymbolicInt;

    fn sub(self, rhs: &SymbolicInt) -> SymbolicInt {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl SubAssign<&SymbolicInt> for SymbolicInt {
    fn sub_assign(&mut self, rhs: &SymbolicInt) {
        for (mono, coeff) in &rhs.terms {
            self.add_term(mono.clone(), -coeff);
        }
    }
}

impl Mul<&SymbolicInt> for &SymbolicInt {
    type Output = SymbolicInt;

    fn mul(self, rhs: &SymbolicInt) -> SymbolicInt {
        let mut out = SymbolicInt::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &rhs.terms {
                out.add_term(ma.product(mb), ca * cb);
            }
        }
        out
    }
}

impl MulAssign<&SymbolicInt> for SymbolicInt {
    fn mul_assign(&mut self, rhs: &SymbolicInt) {
        *self = &*self * rhs;
    }
}

// Owned / mixed-reference forwarding so expressions read naturally.
macro_rules! forward_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<SymbolicInt> for SymbolicInt {
            type Output = SymbolicInt;
            fn $method(self, rhs: SymbolicInt) -> SymbolicInt {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&SymbolicInt> for SymbolicInt {
            type Output = SymbolicInt;
            fn $method(self, rhs: &SymbolicInt) -> SymbolicInt {
                (&self).$method(rhs)
            }
        }

        impl $trait<SymbolicInt> for &SymbolicInt {
            type Output = SymbolicInt;
            fn $method(self, rhs: SymbolicInt) -> SymbolicInt {
                self.$method(&rhs)
            }
        }

        impl $trait<i64> for SymbolicInt {
            type Output = SymbolicInt;
            fn $method(self, rhs: i64) -> SymbolicInt {
                (&self).$method(&SymbolicInt::constant(rhs))
            }
        }

        impl $trait<i64> for &SymbolicInt {
            type Output = SymbolicInt;
            fn $method(self, rhs: i64) -> SymbolicInt {
                self.$method(&SymbolicInt::constant(rhs))
            }
        }
    };
}

forward_binop!(Add, add);
forward_binop!(Sub, sub);
forward_binop!(Mul, mul);

impl Sum for SymbolicInt {
    fn sum<I: Iterator<Item = SymbolicInt>>(iter: I) -> Self {
        iter.fold(SymbolicInt::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a SymbolicInt> for SymbolicInt {
    fn sum<I: Iterator<Item = &'a SymbolicInt>>(iter: I) -> Self {
        iter.fold(SymbolicInt::zero(), |acc, x| acc + x)
    }
}
