//! Gates, copy constraints and the structural fingerprint of a gate.

use crate::{
    circuits::{
        expr::Expr,
        variable::{RowRef, Variable},
    },
    error::CircuitError,
};
use arith_utils::CryptoDigest;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};

/// Cells read by a gate may sit at most this many rows away from the
/// activation row.
pub const MAX_ROTATION: i64 = 1;

/// A set of constraints that must all vanish wherever `selector` is on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct Gate<F: PrimeField> {
    pub selector: usize,
    pub constraints: Vec<Expr<F>>,
}

impl<F: PrimeField> Gate<F> {
    /// Highest degree among the constraints
    pub fn degree(&self) -> u64 {
        self.constraints.iter().map(Expr::degree).max().unwrap_or(0)
    }
}

/// Two cells that must hold the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConstraint {
    pub left: Variable,
    pub right: Variable,
}

/// What the selector cache is keyed by: the exact list of constraints.
#[derive(Serialize)]
#[serde(bound = "F: PrimeField")]
pub struct GateShape<'a, F: PrimeField> {
    pub constraints: &'a [Expr<F>],
}

impl<'a, F: PrimeField> CryptoDigest for GateShape<'a, F> {
    const PREFIX: &'static [u8; 15] = b"arith-gateshape";
}

/// Fingerprint of a [GateShape]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeSeed(pub [u8; 32]);

impl ShapeSeed {
    pub fn of<F: PrimeField>(constraints: &[Expr<F>]) -> Result<Self, CircuitError> {
        GateShape { constraints }
            .digest()
            .map(ShapeSeed)
            .map_err(|e| CircuitError::Digest(e.to_string()))
    }
}

/// Checks that every cell of `constraints` is relative and close enough to
/// the activation row.
pub(crate) fn check_constraints<F: PrimeField>(
    constraints: &[Expr<F>],
) -> Result<(), CircuitError> {
    for var in constraints.iter().flat_map(Expr::cells) {
        match var.row {
            RowRef::Absolute(_) => return Err(CircuitError::AbsoluteCellInGate(var)),
            RowRef::Relative(r) if r.abs() > MAX_ROTATION => {
                return Err(CircuitError::RotationTooLarge(r))
            }
            RowRef::Relative(_) => (),
        }
    }
    Ok(())
}
