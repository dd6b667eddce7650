//! Polynomial constraints over table cells.
//!
//! An [`Expr`] only ever refers to cells through *relative* variables: it is
//! anchored at a row when its gate is checked, so the same expression is
//! reused at every row where its selector is on.

use crate::{
    circuits::{
        table::AssignmentTable,
        variable::{ColumnKind, RowRef, Variable},
    },
    error::CircuitError,
};
use arith_utils::serialization::SerdeAs;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::{
    collections::BTreeSet,
    fmt,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub},
};

/// A multivariate polynomial in the cells around an activation row.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub enum Expr<F: PrimeField> {
    Constant(#[serde_as(as = "SerdeAs")] F),
    Cell(Variable),
    Add(Box<Expr<F>>, Box<Expr<F>>),
    Sub(Box<Expr<F>>, Box<Expr<F>>),
    Mul(Box<Expr<F>>, Box<Expr<F>>),
    Neg(Box<Expr<F>>),
    Pow(Box<Expr<F>>, u64),
}

impl<F: PrimeField> Expr<F> {
    pub fn zero() -> Self {
        Expr::Constant(F::zero())
    }

    pub fn one() -> Self {
        Expr::Constant(F::one())
    }

    pub fn constant(c: F) -> Self {
        Expr::Constant(c)
    }

    /// Cell of `kind` in `column`, `rotation` rows away from the activation row
    pub fn cell(kind: ColumnKind, column: usize, rotation: i64) -> Self {
        Expr::Cell(Variable::relative(kind, column, rotation))
    }

    pub fn pow(self, exp: u64) -> Self {
        Expr::Pow(Box::new(self), exp)
    }

    /// Total degree in the cells
    pub fn degree(&self) -> u64 {
        match self {
            Expr::Constant(_) => 0,
            Expr::Cell(_) => 1,
            Expr::Add(a, b) | Expr::Sub(a, b) => a.degree().max(b.degree()),
            Expr::Mul(a, b) => a.degree() + b.degree(),
            Expr::Neg(a) => a.degree(),
            Expr::Pow(a, e) => a.degree() * e,
        }
    }

    /// Every cell the expression reads
    pub fn cells(&self) -> Vec<Variable> {
        let mut out = vec![];
        self.collect_cells(&mut out);
        out
    }

    fn collect_cells(&self, out: &mut Vec<Variable>) {
        match self {
            Expr::Constant(_) => (),
            Expr::Cell(v) => out.push(*v),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) => {
                a.collect_cells(out);
                b.collect_cells(out);
            }
            Expr::Neg(a) | Expr::Pow(a, _) => a.collect_cells(out),
        }
    }

    /// The distinct row rotations the expression reads
    pub fn rotations(&self) -> BTreeSet<i64> {
        self.cells()
            .into_iter()
            .filter_map(|v| match v.row {
                RowRef::Relative(r) => Some(r),
                RowRef::Absolute(_) => None,
            })
            .collect()
    }

    /// Evaluate with every relative cell anchored at `row`
    pub fn evaluate(&self, table: &AssignmentTable<F>, row: usize) -> Result<F, CircuitError> {
        Ok(match self {
            Expr::Constant(c) => *c,
            Expr::Cell(v) => table.get(&v.resolve(row)?)?,
            Expr::Add(a, b) => a.evaluate(table, row)? + b.evaluate(table, row)?,
            Expr::Sub(a, b) => a.evaluate(table, row)? - b.evaluate(table, row)?,
            Expr::Mul(a, b) => a.evaluate(table, row)? * b.evaluate(table, row)?,
            Expr::Neg(a) => -a.evaluate(table, row)?,
            Expr::Pow(a, e) => a.evaluate(table, row)?.pow([*e]),
        })
    }
}

impl<F: PrimeField> From<u64> for Expr<F> {
    fn from(x: u64) -> Self {
        Expr::Constant(F::from(x))
    }
}

impl<F: PrimeField> Add for Expr<F> {
    type Output = Expr<F>;
    fn add(self, other: Self) -> Self {
        Expr::Add(Box::new(self), Box::new(other))
    }
}

impl<F: PrimeField> AddAssign for Expr<F> {
    fn add_assign(&mut self, other: Self) {
        *self = self.clone() + other;
    }
}

impl<F: PrimeField> Sub for Expr<F> {
    type Output = Expr<F>;
    fn sub(self, other: Self) -> Self {
        Expr::Sub(Box::new(self), Box::new(other))
    }
}

impl<F: PrimeField> Mul for Expr<F> {
    type Output = Expr<F>;
    fn mul(self, other: Self) -> Self {
        Expr::Mul(Box::new(self), Box::new(other))
    }
}

impl<F: PrimeField> MulAssign for Expr<F> {
    fn mul_assign(&mut self, other: Self) {
        *self = self.clone() * other;
    }
}

impl<F: PrimeField> Neg for Expr<F> {
    type Output = Expr<F>;
    fn neg(self) -> Self {
        Expr::Neg(Box::new(self))
    }
}

impl<F: PrimeField> fmt::Display for Expr<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(c) => write!(f, "{c}"),
            Expr::Cell(v) => {
                let kind = match v.kind {
                    ColumnKind::Witness => "w",
                    ColumnKind::PublicInput => "p",
                    ColumnKind::Constant => "c",
                    ColumnKind::Selector => "q",
                };
                match v.row {
                    RowRef::Relative(r) => write!(f, "{kind}{}[{r:+}]", v.column),
                    RowRef::Absolute(r) => write!(f, "{kind}{}@{r}", v.column),
                }
            }
            Expr::Add(a, b) => write!(f, "({a} + {b})"),
            Expr::Sub(a, b) => write!(f, "({a} - {b})"),
            Expr::Mul(a, b) => write!(f, "{a} * {b}"),
            Expr::Neg(a) => write!(f, "-{a}"),
            Expr::Pow(a, e) => write!(f, "({a})^{e}"),
        }
    }
}

//
// Helpers
//

/// Witness cell at `rotation`
pub fn witness<F: PrimeField>(column: usize, rotation: i64) -> Expr<F> {
    Expr::cell(ColumnKind::Witness, column, rotation)
}

/// Witness cell on the activation row
pub fn witness_curr<F: PrimeField>(column: usize) -> Expr<F> {
    witness(column, 0)
}

/// Witness cell on the row after the activation row
pub fn witness_next<F: PrimeField>(column: usize) -> Expr<F> {
    witness(column, 1)
}

/// Witness cell on the row before the activation row
pub fn witness_prev<F: PrimeField>(column: usize) -> Expr<F> {
    witness(column, -1)
}

/// Constant cell at `rotation`
pub fn constant<F: PrimeField>(column: usize, rotation: i64) -> Expr<F> {
    Expr::cell(ColumnKind::Constant, column, rotation)
}

/// Public input cell at `rotation`
pub fn public_input<F: PrimeField>(column: usize, rotation: i64) -> Expr<F> {
    Expr::cell(ColumnKind::PublicInput, column, rotation)
}

/// Vanishes exactly when `x` is one of `0, 1, .., bound - 1`:
/// `x * (x - 1) * .. * (x - (bound - 1))`
pub fn range_membership<F: PrimeField>(x: &Expr<F>, bound: u64) -> Expr<F> {
    (1..bound).fold(x.clone(), |acc, i| acc * (x.clone() - i.into()))
}
