//! The contract every component implements, and the bookkeeping helpers used
//! to hold components to their manifest.
//!
//! A component is laid out twice with the same parameters and start row:
//! once by [`Component::generate_circuit`] (gates, selectors, copy
//! constraints, constants) and once by [`Component::generate_assignments`]
//! (witness values). Both walk the rows, and call their children, in the
//! same order.

use crate::{
    circuits::{circuit::Circuit, table::AssignmentTable, variable::ColumnKind},
    error::CircuitError,
};
use ark_ff::PrimeField;
use log::debug;
use std::collections::HashSet;

/// An inclusive range of column counts; `max = None` is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmountRange {
    pub min: usize,
    pub max: Option<usize>,
}

impl AmountRange {
    pub fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    pub fn contains(&self, n: usize) -> bool {
        n >= self.min && self.max.map_or(true, |max| n <= max)
    }
}

/// The resource shape a component asks for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Manifest {
    pub witness_amount: AmountRange,
    pub constant_amount: AmountRange,
}

impl Manifest {
    /// Check a column assignment against the manifest
    pub fn check(
        &self,
        component: &'static str,
        columns: &ComponentColumns,
    ) -> Result<(), CircuitError> {
        for (kind, range, got) in [
            (ColumnKind::Witness, self.witness_amount, columns.witness.len()),
            (ColumnKind::Constant, self.constant_amount, columns.constant.len()),
        ] {
            if !range.contains(got) {
                return Err(CircuitError::ManifestViolation {
                    component,
                    kind,
                    got,
                    min: range.min,
                    max: range.max.map_or("inf".to_string(), |m| m.to_string()),
                });
            }
        }
        for list in [&columns.witness, &columns.constant] {
            let mut seen = HashSet::new();
            if let Some(column) = list.iter().find(|c| !seen.insert(**c)) {
                return Err(CircuitError::DuplicateColumn {
                    component,
                    column: *column,
                });
            }
        }
        Ok(())
    }
}

/// The table columns a component instance is wired to.
///
/// `w(i)` is the table column playing the role of the component's i-th
/// witness column, `c(i)` likewise for constants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentColumns {
    pub witness: Vec<usize>,
    pub constant: Vec<usize>,
}

impl ComponentColumns {
    pub fn new(witness: Vec<usize>, constant: Vec<usize>) -> Self {
        Self { witness, constant }
    }

    /// Columns `0..witness_amount` and `0..constant_amount` of the table
    pub fn contiguous(witness_amount: usize, constant_amount: usize) -> Self {
        Self {
            witness: (0..witness_amount).collect(),
            constant: (0..constant_amount).collect(),
        }
    }

    pub fn w(&self, i: usize) -> usize {
        self.witness[i]
    }

    pub fn c(&self, i: usize) -> usize {
        self.constant[i]
    }

    pub fn witness_amount(&self) -> usize {
        self.witness.len()
    }
}

/// Row cursor of one `generate_assignments` call
#[derive(Debug)]
pub struct RowCursor {
    start: usize,
    row: usize,
}

impl RowCursor {
    pub fn new(start: usize) -> Self {
        Self { start, row: start }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    /// Skip `n` rows, returning the row the skipped block started at
    pub fn advance(&mut self, n: usize) -> usize {
        let row = self.row;
        self.row += n;
        row
    }

    /// The cursor must have advanced by exactly `rows_amount`
    pub fn finish(self, component: &'static str, rows_amount: usize) -> Result<(), CircuitError> {
        let actual = self.row - self.start;
        if actual != rows_amount {
            return Err(CircuitError::RowsAmountMismatch {
                component,
                expected: rows_amount,
                actual,
            });
        }
        debug!("{component}: assigned rows {}..{}", self.start, self.row);
        Ok(())
    }
}

/// Fails unless a component allocated exactly `expected` selectors
pub fn check_selector_count(
    component: &'static str,
    expected: usize,
    selectors: &[usize],
) -> Result<(), CircuitError> {
    if selectors.len() != expected {
        return Err(CircuitError::SelectorCountMismatch {
            component,
            expected,
            actual: selectors.len(),
        });
    }
    Ok(())
}

/// Fails when a component added more gates to the circuit than it declares.
/// Fewer is fine: the rest were shared through the selector cache.
pub fn check_gates_amount(
    component: &'static str,
    gates_amount: usize,
    gates_before: usize,
    gates_after: usize,
) -> Result<(), CircuitError> {
    let added = gates_after - gates_before;
    if added > gates_amount {
        return Err(CircuitError::GatesAmountMismatch {
            component,
            expected: gates_amount,
            actual: added,
        });
    }
    Ok(())
}

/// A reusable piece of circuit.
pub trait Component<F: PrimeField> {
    /// Name used in errors and logs
    const NAME: &'static str;

    /// Cells the component reads, as absolute variables
    type Input;

    /// Cells the component exposes to its parent, as absolute variables
    type Output;

    fn manifest(&self) -> Manifest;

    /// Rows occupied, from the parameters alone
    fn rows_amount(&self) -> usize;

    /// Distinct gates used, from the parameters alone
    fn gates_amount(&self) -> usize;

    /// Cells exposed to the parent when laid out at `start_row`
    fn output(&self, start_row: usize) -> Result<Self::Output, CircuitError>;

    /// Fill `start_row..start_row + rows_amount()` with witness values
    fn generate_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &Self::Input,
        start_row: usize,
    ) -> Result<Self::Output, CircuitError>;

    /// Emit gates, selector activations, constants and copy constraints
    fn generate_circuit(
        &self,
        circuit: &mut Circuit<F>,
        table: &mut AssignmentTable<F>,
        input: &Self::Input,
        start_row: usize,
    ) -> Result<Self::Output, CircuitError>;
}
