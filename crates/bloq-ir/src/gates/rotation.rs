//! Single-qubit rotations parameterized by a continuous angle.
//!
//! Angles that are multiples of π/2 are Cliffords and odd multiples of π/4
//! are T gates up to Cliffords; every other angle, including every symbolic
//! one, is costed as one arbitrary rotation.

use std::f64::consts::PI;
use std::fmt;

use crate::bloq::Bloq;
use crate::gate_counts::GateCounts;
use crate::parameter::ParameterExpression;
use crate::signature::{QDType, Signature};

const ANGLE_TOLERANCE: f64 = 1e-12;

/// Gate counts of a Z rotation by `half_turns * π`.
fn z_rotation_counts(half_turns: Option<f64>) -> GateCounts {
    let Some(x) = half_turns else {
        return GateCounts::rotation(1);
    };
    let quarters = x * 4.0;
    let nearest = quarters.round();
    if (quarters - nearest).abs() > ANGLE_TOLERANCE {
        return GateCounts::rotation(1);
    }
    // nearest is a whole number of π/4 steps.
    if nearest.rem_euclid(2.0) == 0.0 {
        GateCounts::clifford(1)
    } else {
        GateCounts::t(1)
    }
}

/// Rotation about Z by `angle` radians.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rz {
    /// Rotation angle in radians.
    pub angle: ParameterExpression,
}

impl Rz {
    /// Rotation by `angle`; constant subexpressions are folded.
    pub fn new(angle: impl Into<ParameterExpression>) -> Self {
        Self {
            angle: angle.into().simplify(),
        }
    }
}

impl fmt::Display for Rz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rz({})", self.angle)
    }
}

impl Bloq for Rz {
    fn signature(&self) -> Signature {
        Signature::build(&[("q", QDType::QBit)])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(z_rotation_counts(self.angle.as_f64().map(|a| a / PI)))
    }
}

/// Rotation about X by `angle` radians.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rx {
    /// Rotation angle in radians.
    pub angle: ParameterExpression,
}

impl Rx {
    /// Rotation by `angle`; constant subexpressions are folded.
    pub fn new(angle: impl Into<ParameterExpression>) -> Self {
        Self {
            angle: angle.into().simplify(),
        }
    }
}

impl fmt::Display for Rx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rx({})", self.angle)
    }
}

impl Bloq for Rx {
    fn signature(&self) -> Signature {
        Signature::build(&[("q", QDType::QBit)])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        // Rx = H Rz H; the conjugating Hadamards are free in this model.
        Some(z_rotation_counts(self.angle.as_f64().map(|a| a / PI)))
    }
}

/// `Z^exponent`, a Z rotation by `exponent * π` up to global phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZPowGate {
    /// Exponent in half turns.
    pub exponent: ParameterExpression,
}

impl ZPowGate {
    /// `Z^exponent`; constant subexpressions are folded.
    pub fn new(exponent: impl Into<ParameterExpression>) -> Self {
        Self {
            exponent: exponent.into().simplify(),
        }
    }
}

impl fmt::Display for ZPowGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z**{}", self.exponent)
    }
}

impl Bloq for ZPowGate {
    fn signature(&self) -> Signature {
        Signature::build(&[("q", QDType::QBit)])
    }

    fn my_gate_counts(&self) -> Option<GateCounts> {
        Some(z_rotation_counts(self.exponent.as_f64()))
    }
}
