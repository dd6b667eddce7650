//! Cell references: column kind, column index and a row locator.

use crate::error::CircuitError;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The four kinds of columns of a table.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum ColumnKind {
    #[strum(serialize = "witness")]
    Witness,
    #[strum(serialize = "public input")]
    PublicInput,
    #[strum(serialize = "constant")]
    Constant,
    #[strum(serialize = "selector")]
    Selector,
}

/// Where a variable sits vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowRef {
    /// A fixed row of the table
    Absolute(usize),
    /// An offset from the row a gate (or a component) is anchored at
    Relative(i64),
}

/// A reference to one cell of the assignment table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub kind: ColumnKind,
    pub column: usize,
    pub row: RowRef,
}

impl Variable {
    pub fn new(kind: ColumnKind, column: usize, row: usize) -> Self {
        Self {
            kind,
            column,
            row: RowRef::Absolute(row),
        }
    }

    pub fn relative(kind: ColumnKind, column: usize, offset: i64) -> Self {
        Self {
            kind,
            column,
            row: RowRef::Relative(offset),
        }
    }

    pub fn witness(column: usize, row: usize) -> Self {
        Self::new(ColumnKind::Witness, column, row)
    }

    pub fn public_input(column: usize, row: usize) -> Self {
        Self::new(ColumnKind::PublicInput, column, row)
    }

    pub fn constant(column: usize, row: usize) -> Self {
        Self::new(ColumnKind::Constant, column, row)
    }

    /// The row of an absolute variable
    pub fn absolute_row(&self) -> Option<usize> {
        match self.row {
            RowRef::Absolute(row) => Some(row),
            RowRef::Relative(_) => None,
        }
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self.row, RowRef::Absolute(_))
    }

    /// Anchor a relative variable at `base`. Absolute variables are returned
    /// unchanged.
    pub fn resolve(&self, base: usize) -> Result<Self, CircuitError> {
        match self.row {
            RowRef::Absolute(_) => Ok(*self),
            RowRef::Relative(offset) => {
                let row = i64::try_from(base)
                    .ok()
                    .and_then(|base| base.checked_add(offset))
                    .and_then(|row| usize::try_from(row).ok())
                    .ok_or(CircuitError::RowOutOfRange { base, offset })?;
                Ok(Self::new(self.kind, self.column, row))
            }
        }
    }
}
