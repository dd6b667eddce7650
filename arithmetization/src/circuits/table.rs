//! The assignment table: one growable column of field elements per witness,
//! public-input and constant column, plus selector activation records.

use crate::{
    circuits::variable::{ColumnKind, Variable},
    error::CircuitError,
};
use arith_utils::serialization::SerdeAs;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Number of columns of each kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableShape {
    pub witness: usize,
    pub public_input: usize,
    pub constant: usize,
}

impl TableShape {
    pub fn new(witness: usize, public_input: usize, constant: usize) -> Self {
        Self {
            witness,
            public_input,
            constant,
        }
    }

    /// Number of value columns of `kind` (selectors are not value columns)
    pub fn amount(&self, kind: ColumnKind) -> usize {
        match kind {
            ColumnKind::Witness => self.witness,
            ColumnKind::PublicInput => self.public_input,
            ColumnKind::Constant => self.constant,
            ColumnKind::Selector => 0,
        }
    }
}

/// A selector switched on for the inclusive row range `first_row..=last_row`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorActivation {
    pub selector: usize,
    pub first_row: usize,
    pub last_row: usize,
}

impl SelectorActivation {
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.first_row..=self.last_row
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows().contains(&row)
    }
}

type Column<F> = Vec<Option<F>>;

/// The table of witnesses. It only grows: cells are written, overwritten,
/// never removed.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct AssignmentTable<F: PrimeField> {
    shape: TableShape,
    #[serde_as(as = "Vec<Vec<Option<SerdeAs>>>")]
    witness: Vec<Column<F>>,
    #[serde_as(as = "Vec<Vec<Option<SerdeAs>>>")]
    public_input: Vec<Column<F>>,
    #[serde_as(as = "Vec<Vec<Option<SerdeAs>>>")]
    constant: Vec<Column<F>>,
    selectors: Vec<SelectorActivation>,
}

impl<F: PrimeField> AssignmentTable<F> {
    pub fn new(shape: TableShape) -> Self {
        Self {
            shape,
            witness: vec![vec![]; shape.witness],
            public_input: vec![vec![]; shape.public_input],
            constant: vec![vec![]; shape.constant],
            selectors: vec![],
        }
    }

    pub fn shape(&self) -> TableShape {
        self.shape
    }

    fn columns(&self, kind: ColumnKind) -> &[Column<F>] {
        match kind {
            ColumnKind::Witness => &self.witness,
            ColumnKind::PublicInput => &self.public_input,
            ColumnKind::Constant => &self.constant,
            ColumnKind::Selector => &[],
        }
    }

    fn columns_mut(&mut self, kind: ColumnKind) -> &mut [Column<F>] {
        match kind {
            ColumnKind::Witness => &mut self.witness,
            ColumnKind::PublicInput => &mut self.public_input,
            ColumnKind::Constant => &mut self.constant,
            ColumnKind::Selector => &mut [],
        }
    }

    fn check_column(&self, kind: ColumnKind, column: usize) -> Result<(), CircuitError> {
        let amount = self.shape.amount(kind);
        if column < amount {
            Ok(())
        } else {
            Err(CircuitError::ColumnOutOfRange {
                kind,
                column,
                amount,
            })
        }
    }

    /// Read the value of an absolute variable
    pub fn get(&self, var: &Variable) -> Result<F, CircuitError> {
        if var.kind == ColumnKind::Selector {
            return Err(CircuitError::SelectorCell(*var));
        }
        let row = var
            .absolute_row()
            .ok_or(CircuitError::UnresolvedVariable(*var))?;
        self.check_column(var.kind, var.column)?;
        self.columns(var.kind)[var.column]
            .get(row)
            .copied()
            .flatten()
            .ok_or(CircuitError::UninitializedCell(*var))
    }

    /// Write the value of an absolute variable, growing its column if needed
    pub fn set(&mut self, var: &Variable, value: F) -> Result<(), CircuitError> {
        if var.kind == ColumnKind::Selector {
            return Err(CircuitError::SelectorCell(*var));
        }
        let row = var
            .absolute_row()
            .ok_or(CircuitError::UnresolvedVariable(*var))?;
        self.check_column(var.kind, var.column)?;
        let column = &mut self.columns_mut(var.kind)[var.column];
        if column.len() <= row {
            column.resize(row + 1, None);
        }
        column[row] = Some(value);
        Ok(())
    }

    pub fn witness(&self, column: usize, row: usize) -> Result<F, CircuitError> {
        self.get(&Variable::witness(column, row))
    }

    pub fn set_witness(&mut self, column: usize, row: usize, value: F) -> Result<(), CircuitError> {
        self.set(&Variable::witness(column, row), value)
    }

    pub fn public_input(&self, column: usize, row: usize) -> Result<F, CircuitError> {
        self.get(&Variable::public_input(column, row))
    }

    pub fn set_public_input(
        &mut self,
        column: usize,
        row: usize,
        value: F,
    ) -> Result<(), CircuitError> {
        self.set(&Variable::public_input(column, row), value)
    }

    pub fn constant(&self, column: usize, row: usize) -> Result<F, CircuitError> {
        self.get(&Variable::constant(column, row))
    }

    pub fn set_constant(
        &mut self,
        column: usize,
        row: usize,
        value: F,
    ) -> Result<(), CircuitError> {
        self.set(&Variable::constant(column, row), value)
    }

    /// Switch `selector` on at a single row
    pub fn enable_selector(&mut self, selector: usize, row: usize) {
        self.selectors.push(SelectorActivation {
            selector,
            first_row: row,
            last_row: row,
        });
    }

    /// Switch `selector` on for every row of `first_row..=last_row`
    pub fn enable_selector_range(
        &mut self,
        selector: usize,
        first_row: usize,
        last_row: usize,
    ) -> Result<(), CircuitError> {
        if first_row > last_row {
            return Err(CircuitError::InvalidSelectorRange {
                first: first_row,
                last: last_row,
            });
        }
        self.selectors.push(SelectorActivation {
            selector,
            first_row,
            last_row,
        });
        Ok(())
    }

    pub fn selector_enabled(&self, selector: usize, row: usize) -> bool {
        self.selectors
            .iter()
            .any(|s| s.selector == selector && s.contains(row))
    }

    pub fn selector_activations(&self) -> &[SelectorActivation] {
        &self.selectors
    }

    /// Number of rows touched so far, by a cell or by a selector
    pub fn rows_amount(&self) -> usize {
        let cells = self
            .witness
            .iter()
            .chain(self.public_input.iter())
            .chain(self.constant.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        let selectors = self
            .selectors
            .iter()
            .map(|s| s.last_row + 1)
            .max()
            .unwrap_or(0);
        cells.max(selectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use strum::IntoEnumIterator;

    fn table() -> AssignmentTable<Fr> {
        AssignmentTable::new(TableShape::new(3, 1, 1))
    }

    #[test]
    fn unassigned_read_fails() {
        let mut t = table();
        assert_eq!(
            t.witness(0, 0),
            Err(CircuitError::UninitializedCell(Variable::witness(0, 0)))
        );
        t.set_witness(0, 5, Fr::from(1u64)).unwrap();
        // Growing the column does not assign the rows in between
        assert_eq!(
            t.witness(0, 2),
            Err(CircuitError::UninitializedCell(Variable::witness(0, 2)))
        );
        assert_eq!(t.witness(0, 5), Ok(Fr::from(1u64)));
    }

    #[test]
    fn column_out_of_range() {
        let mut t = table();
        for kind in ColumnKind::iter().filter(|k| *k != ColumnKind::Selector) {
            let amount = t.shape().amount(kind);
            let var = Variable::new(kind, amount, 0);
            assert_eq!(
                t.set(&var, Fr::from(0u64)),
                Err(CircuitError::ColumnOutOfRange {
                    kind,
                    column: amount,
                    amount
                })
            );
        }
        let selector = Variable::new(ColumnKind::Selector, 0, 0);
        assert_eq!(t.get(&selector), Err(CircuitError::SelectorCell(selector)));
    }

    #[test]
    fn writes_do_not_disturb_other_columns() {
        let mut t = table();
        t.set_witness(0, 1, Fr::from(10u64)).unwrap();
        t.set_witness(1, 1, Fr::from(11u64)).unwrap();
        t.set_constant(0, 1, Fr::from(12u64)).unwrap();
        t.set_witness(0, 1, Fr::from(20u64)).unwrap();
        assert_eq!(t.witness(0, 1), Ok(Fr::from(20u64)));
        assert_eq!(t.witness(1, 1), Ok(Fr::from(11u64)));
        assert_eq!(t.constant(0, 1), Ok(Fr::from(12u64)));
        assert_eq!(t.rows_amount(), 2);
    }

    #[test]
    fn relative_variables_are_rejected() {
        let t = table();
        let var = Variable::relative(ColumnKind::Witness, 0, 0);
        assert_eq!(t.get(&var), Err(CircuitError::UnresolvedVariable(var)));
    }

    #[test]
    fn selector_ranges() {
        let mut t = table();
        t.enable_selector_range(0, 2, 4).unwrap();
        t.enable_selector(1, 7);
        assert!(!t.selector_enabled(0, 1));
        assert!(t.selector_enabled(0, 2));
        assert!(t.selector_enabled(0, 4));
        assert!(!t.selector_enabled(0, 5));
        assert!(t.selector_enabled(1, 7));
        assert!(!t.selector_enabled(1, 4));
        assert_eq!(t.rows_amount(), 8);
        assert_eq!(
            t.enable_selector_range(0, 3, 2),
            Err(CircuitError::InvalidSelectorRange { first: 3, last: 2 })
        );
    }
}
