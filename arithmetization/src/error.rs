//! This module implements the [`CircuitError`] and [`SatisfiabilityError`] types.

use crate::circuits::variable::{ColumnKind, Variable};
use arith_utils::FieldHelpersError;
use thiserror::Error;

/// Errors that abort the construction of a circuit or of its assignment.
///
/// None of these are recoverable: they point at a defect in a component (or
/// at its caller), and the table/circuit pair being built must be discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    #[error("{kind} column {column} does not exist (the table has {amount})")]
    ColumnOutOfRange {
        kind: ColumnKind,
        column: usize,
        amount: usize,
    },

    #[error("selector columns hold no values, cannot access {0:?}")]
    SelectorCell(Variable),

    #[error("row offset {offset} from row {base} falls before the first row")]
    RowOutOfRange { base: usize, offset: i64 },

    #[error("read of unassigned cell {0:?}")]
    UninitializedCell(Variable),

    #[error("variable {0:?} must be resolved to an absolute row first")]
    UnresolvedVariable(Variable),

    #[error("gate constraints may only reference relative cells, found {0:?}")]
    AbsoluteCellInGate(Variable),

    #[error("rotation {0} is outside the supported window")]
    RotationTooLarge(i64),

    #[error("gate {0} has no constraints")]
    EmptyGate(usize),

    #[error("selector range {first}..={last} is empty")]
    InvalidSelectorRange { first: usize, last: usize },

    #[error("{component}: got {got} {kind} columns, manifest allows {min}..={max}")]
    ManifestViolation {
        component: &'static str,
        kind: ColumnKind,
        got: usize,
        min: usize,
        max: String,
    },

    #[error("{component}: column {column} is used twice")]
    DuplicateColumn {
        component: &'static str,
        column: usize,
    },

    #[error("{component}: advanced {actual} rows, manifest declares {expected}")]
    RowsAmountMismatch {
        component: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{component}: emitted {actual} gates, manifest declares {expected}")]
    GatesAmountMismatch {
        component: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{component}: expected {expected} selectors, allocated {actual}")]
    SelectorCountMismatch {
        component: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{component}: invalid parameter: {reason}")]
    InvalidParameter {
        component: &'static str,
        reason: String,
    },

    #[error("{component}: invalid input: {reason}")]
    InvalidInput {
        component: &'static str,
        reason: String,
    },

    #[error("{component}: value for entry {entry} is not invertible")]
    NotInvertible {
        component: &'static str,
        entry: usize,
    },

    #[error("could not digest gate shape: {0}")]
    Digest(String),

    #[error("field conversion failed: {0}")]
    Field(#[from] FieldHelpersError),
}

/// Reasons a filled table does not satisfy a circuit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SatisfiabilityError {
    #[error("selector {0} is enabled in the table but the circuit has no such gate")]
    UnknownSelector(usize),

    #[error("constraint {index} of gate {selector} does not vanish at row {row}")]
    Constraint {
        selector: usize,
        row: usize,
        index: usize,
    },

    #[error("copy constraint between {0:?} and {1:?} does not hold")]
    CopyConstraint(Variable, Variable),

    #[error("table access failed while checking: {0}")]
    Table(#[from] CircuitError),
}
