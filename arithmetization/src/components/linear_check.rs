//! Batched rational interpolation check, as used by dFRI.
//!
//! For every entry `l` of an evaluation map the component computes
//! `q_l = (y - z_l) / (x - xi)` and folds the results with a challenge
//! `theta`, so that the last accumulator equals
//! `sum_l theta^l * (y_{p(l)} - z_l) / (x - xi_{e(l)})`.
//!
//! Each entry fills a block of 9 cells, packed row-major across the witness
//! columns:
//!
//! ```text
//! x | xi | (x - xi)^-1 | y | z | q | theta | q_last | q_new
//! ```
//!
//! One gate, enabled on the first row of every block, holds
//!
//! ```text
//! (x - xi) * inv - 1            = 0
//! q * (x - xi) - (y - z)        = 0
//! q_new - (theta * q_last + q)  = 0
//! ```
//!
//! and copy constraints chain every `q_last` to the previous block's
//! `q_new`, the first one to a constant zero.

use crate::{
    circuits::{
        circuit::Circuit,
        component::{
            check_gates_amount, check_selector_count, AmountRange, Component, ComponentColumns,
            Manifest, RowCursor,
        },
        expr::{witness, Expr},
        table::AssignmentTable,
        variable::Variable,
    },
    error::CircuitError,
};
use arith_utils::math::ceil_div;
use ark_ff::PrimeField;

const X: usize = 0;
const XI: usize = 1;
const XSUBXIINV: usize = 2;
const Y: usize = 3;
const Z: usize = 4;
const Q: usize = 5;
const THETA: usize = 6;
const Q_LAST: usize = 7;
const Q_NEW: usize = 8;

/// Cells in one entry's block
pub const BLOCK_CELLS: usize = 9;

/// Below 5 columns a block would span more than two rows
pub const MIN_WITNESS_AMOUNT: usize = 5;

pub fn rows_per_block(witness_amount: usize) -> usize {
    ceil_div(BLOCK_CELLS, witness_amount)
}

pub fn rows_amount(witness_amount: usize, entries: usize) -> usize {
    entries * rows_per_block(witness_amount)
}

pub fn manifest() -> Manifest {
    Manifest {
        witness_amount: AmountRange::at_least(MIN_WITNESS_AMOUNT),
        constant_amount: AmountRange::at_least(1),
    }
}

/// `(point, polynomial)`: the entry uses `xi[point]` and `y[polynomial]`
pub type EvalMapEntry = (usize, usize);

#[derive(Clone, Debug)]
pub struct LinearCheckInput {
    pub x: Variable,
    pub theta: Variable,
    /// Evaluation points
    pub xi: Vec<Variable>,
    /// Polynomial values at `x`
    pub y: Vec<Variable>,
    /// Claimed evaluations, one per map entry
    pub z: Vec<Variable>,
    /// Entries in combination order
    pub eval_map: Vec<EvalMapEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearCheckOutput {
    pub q: Variable,
}

#[derive(Clone, Debug)]
pub struct LinearCheck {
    columns: ComponentColumns,
    entries: usize,
}

impl LinearCheck {
    pub const NAME: &'static str = "linear_check";

    pub fn new(columns: ComponentColumns, entries: usize) -> Result<Self, CircuitError> {
        manifest().check(Self::NAME, &columns)?;
        if entries == 0 {
            return Err(CircuitError::InvalidParameter {
                component: Self::NAME,
                reason: "the evaluation map must not be empty".to_string(),
            });
        }
        Ok(Self { columns, entries })
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    fn rows_per_block(&self) -> usize {
        rows_per_block(self.columns.witness_amount())
    }

    fn rows(&self) -> usize {
        rows_amount(self.columns.witness_amount(), self.entries)
    }

    fn block_row(&self, start_row: usize, block: usize) -> usize {
        start_row + block * self.rows_per_block()
    }

    /// Map entry laid out in `block`
    fn entry(&self, block: usize) -> usize {
        self.entries - 1 - block
    }

    /// Absolute cell `k` of the block starting at `block_row`
    fn var(&self, block_row: usize, k: usize) -> Variable {
        let width = self.columns.witness_amount();
        Variable::witness(self.columns.w(k % width), block_row + k / width)
    }

    /// Cell `k` relative to the first row of its block
    fn cell<F: PrimeField>(&self, k: usize) -> Expr<F> {
        let width = self.columns.witness_amount();
        witness(self.columns.w(k % width), (k / width) as i64)
    }

    fn gate<F: PrimeField>(&self) -> Vec<Expr<F>> {
        let diff = self.cell::<F>(X) - self.cell(XI);
        vec![
            diff.clone() * self.cell(XSUBXIINV) - Expr::one(),
            self.cell::<F>(Q) * diff - (self.cell(Y) - self.cell(Z)),
            self.cell::<F>(Q_NEW) - (self.cell::<F>(THETA) * self.cell(Q_LAST) + self.cell(Q)),
        ]
    }

    fn check_input(&self, input: &LinearCheckInput) -> Result<(), CircuitError> {
        let invalid = |reason: String| CircuitError::InvalidInput {
            component: Self::NAME,
            reason,
        };
        if input.eval_map.len() != self.entries {
            return Err(invalid(format!(
                "expected {} map entries, got {}",
                self.entries,
                input.eval_map.len()
            )));
        }
        if input.z.len() != self.entries {
            return Err(invalid(format!(
                "expected {} claimed evaluations, got {}",
                self.entries,
                input.z.len()
            )));
        }
        for (l, (point, polynomial)) in input.eval_map.iter().enumerate() {
            if *point >= input.xi.len() {
                return Err(invalid(format!("entry {l} uses missing point {point}")));
            }
            if *polynomial >= input.y.len() {
                return Err(invalid(format!(
                    "entry {l} uses missing polynomial {polynomial}"
                )));
            }
        }
        Ok(())
    }

    /// Input cells feeding `block`, in block order `x, xi, y, z, theta`
    fn block_inputs(&self, input: &LinearCheckInput, block: usize) -> [(usize, Variable); 5] {
        let l = self.entry(block);
        let (point, polynomial) = input.eval_map[l];
        [
            (X, input.x),
            (XI, input.xi[point]),
            (Y, input.y[polynomial]),
            (Z, input.z[l]),
            (THETA, input.theta),
        ]
    }

    fn result(&self, start_row: usize) -> LinearCheckOutput {
        LinearCheckOutput {
            q: self.var(self.block_row(start_row, self.entries - 1), Q_NEW),
        }
    }
}

impl<F: PrimeField> Component<F> for LinearCheck {
    const NAME: &'static str = LinearCheck::NAME;
    type Input = LinearCheckInput;
    type Output = LinearCheckOutput;

    fn manifest(&self) -> Manifest {
        manifest()
    }

    fn rows_amount(&self) -> usize {
        self.rows()
    }

    fn gates_amount(&self) -> usize {
        1
    }

    fn output(&self, start_row: usize) -> Result<LinearCheckOutput, CircuitError> {
        Ok(self.result(start_row))
    }

    fn generate_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &LinearCheckInput,
        start_row: usize,
    ) -> Result<LinearCheckOutput, CircuitError> {
        self.check_input(input)?;
        let mut cursor = RowCursor::new(start_row);
        let mut q_last = F::zero();

        for block in 0..self.entries {
            let row = cursor.advance(self.rows_per_block());
            let mut cells = [F::zero(); BLOCK_CELLS];
            for (k, var) in self.block_inputs(input, block) {
                cells[k] = table.get(&var)?;
            }

            let diff = cells[X] - cells[XI];
            cells[XSUBXIINV] = diff.inverse().ok_or(CircuitError::NotInvertible {
                component: Self::NAME,
                entry: self.entry(block),
            })?;
            cells[Q] = (cells[Y] - cells[Z]) * cells[XSUBXIINV];
            cells[Q_LAST] = q_last;
            cells[Q_NEW] = cells[THETA] * q_last + cells[Q];
            q_last = cells[Q_NEW];

            for (k, value) in cells.into_iter().enumerate() {
                let var = self.var(row, k);
                table.set(&var, value)?;
            }
        }

        cursor.finish(Self::NAME, self.rows())?;
        Ok(self.result(start_row))
    }

    fn generate_circuit(
        &self,
        circuit: &mut Circuit<F>,
        table: &mut AssignmentTable<F>,
        input: &LinearCheckInput,
        start_row: usize,
    ) -> Result<LinearCheckOutput, CircuitError> {
        self.check_input(input)?;

        let gates_before = circuit.gates_amount();
        let selector = circuit.add_gate_cached(self.gate())?.selector;
        check_selector_count(Self::NAME, 1, &[selector])?;
        check_gates_amount(Self::NAME, 1, gates_before, circuit.gates_amount())?;

        table.set_constant(self.columns.c(0), start_row, F::zero())?;
        let mut q_last_source = Variable::constant(self.columns.c(0), start_row);

        for block in 0..self.entries {
            let row = self.block_row(start_row, block);
            table.enable_selector(selector, row);
            for (k, var) in self.block_inputs(input, block) {
                circuit.add_copy_constraint(var, self.var(row, k))?;
            }
            circuit.add_copy_constraint(q_last_source, self.var(row, Q_LAST))?;
            q_last_source = self.var(row, Q_NEW);
        }

        Ok(self.result(start_row))
    }
}
