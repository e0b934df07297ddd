//! Angle expressions for rotation bloqs.

use std::f64::consts::PI;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A symbolic or concrete continuous parameter, e.g. a rotation angle.
///
/// Equality and hashing are structural. Constants compare by bit pattern
/// after mapping `-0.0` to `0.0` and every NaN to one canonical NaN, so
/// `Eq` and `Hash` agree and bloqs holding angles can be memoization keys.
#[derive(Debug, Clone)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A symbolic parameter.
    Symbol(String),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Subtraction.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Multiplication.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Division.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for ParameterExpression {
    fn eq(&self, other: &Self) -> bool {
        use ParameterExpression as P;
        match (self, other) {
            (P::Constant(a), P::Constant(b)) => canonical_bits(*a) == canonical_bits(*b),
            (P::Symbol(a), P::Symbol(b)) => a == b,
            (P::Pi, P::Pi) => true,
            (P::Neg(a), P::Neg(b)) => a == b,
            (P::Add(a1, b1), P::Add(a2, b2))
            | (P::Sub(a1, b1), P::Sub(a2, b2))
            | (P::Mul(a1, b1), P::Mul(a2, b2))
            | (P::Div(a1, b1), P::Div(a2, b2)) => a1 == a2 && b1 == b2,
            _ => false,
        }
    }
}

impl Eq for ParameterExpression {}

impl Hash for ParameterExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ParameterExpression::Constant(v) => canonical_bits(*v).hash(state),
            ParameterExpression::Symbol(name) => name.hash(state),
            ParameterExpression::Pi => {}
            ParameterExpression::Neg(e) => e.hash(state),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => {
                a.hash(state);
                b.hash(state);
            }
        }
    }
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Create a π constant.
    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    /// Check if this expression contains any symbols.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Try to evaluate as a concrete f64 value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Neg(e) => e.as_f64().map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.as_f64()? + b.as_f64()?),
            ParameterExpression::Sub(a, b) => Some(a.as_f64()? - b.as_f64()?),
            ParameterExpression::Mul(a, b) => Some(a.as_f64()? * b.as_f64()?),
            ParameterExpression::Div(a, b) => {
                let divisor = b.as_f64()?;
                if divisor == 0.0 {
                    return None;
                }
                Some(a.as_f64()? / divisor)
            }
        }
    }

    /// Fold every constant subexpression into a single [`Constant`].
    ///
    /// Two angles that evaluate to the same number simplify to equal
    /// expressions, so call `simplify` before using an angle as a key.
    ///
    /// [`Constant`]: ParameterExpression::Constant
    #[must_use]
    pub fn simplify(&self) -> Self {
        if let Some(v) = self.as_f64() {
            return ParameterExpression::Constant(v);
        }
        let fold = |a: &ParameterExpression,
                    b: &ParameterExpression,
                    op: fn(f64, f64) -> Option<f64>,
                    rebuild: fn(Box<Self>, Box<Self>) -> Self| {
            let a = a.simplify();
            let b = b.simplify();
            match a.as_f64().zip(b.as_f64()).and_then(|(x, y)| op(x, y)) {
                Some(v) => ParameterExpression::Constant(v),
                None => rebuild(Box::new(a), Box::new(b)),
            }
        };
        match self {
            ParameterExpression::Neg(e) => {
                let e = e.simplify();
                match e.as_f64() {
                    Some(v) => ParameterExpression::Constant(-v),
                    None => ParameterExpression::Neg(Box::new(e)),
                }
            }
            ParameterExpression::Add(a, b) => {
                fold(a, b, |x, y| Some(x + y), ParameterExpression::Add)
            }
            ParameterExpression::Sub(a, b) => {
                fold(a, b, |x, y| Some(x - y), ParameterExpression::Sub)
            }
            ParameterExpression::Mul(a, b) => {
                fold(a, b, |x, y| Some(x * y), ParameterExpression::Mul)
            }
            ParameterExpression::Div(a, b) => fold(
                a,
                b,
                |x, y| if y == 0.0 { None } else { Some(x / y) },
                ParameterExpression::Div,
            ),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Pi => write!(f, "π"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<i32> for ParameterExpression {
    fn from(value: i32) -> Self {
        ParameterExpression::Constant(f64::from(value))
    }
}

impl From<&str> for ParameterExpression {
    fn from(name: &str) -> Self {
        ParameterExpression::Symbol(name.to_string())
    }
}

impl std::ops::Add for ParameterExpression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for ParameterExpression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ParameterExpression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for ParameterExpression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        ParameterExpression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for ParameterExpression {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        ParameterExpression::Div(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}
