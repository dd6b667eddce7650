//! Range check: proves that a value `x` satisfies `x < 2^bits_amount`.
//!
//! The value is split, most significant bits first, into chunks of
//! [CHUNK_SIZE] bits, after being left-padded with zero bits to fill whole
//! rows. The first witness column carries a running sum; the other columns
//! carry the chunks of one row each.
//!
//! ```text
//! Row   | w(0)          | w(1) .. w(k)
//!     0 | 0             | (unused)
//!     1 | s1            | chunks 0 .. k-1
//!   ... | ...           | ...
//!     n | sn == x       | chunks (n-1)k .. nk-1
//! ```
//!
//! with `k = witness_amount - 1` and `s_i = s_{i-1} * 2^(2k) + Horner(chunks)`.
//!
//! Gate 0 (rows `1..=n`) constrains every chunk to `[0, 4)` and the running
//! sum recurrence. When `bits_amount` is odd, gate 1 (row 1 only) constrains
//! the first non-padding chunk to `[0, 2)`. Copy constraints tie the
//! initial sum and every padding chunk to a constant zero and the final sum
//! to `x`.

use crate::{
    circuits::{
        circuit::Circuit,
        component::{
            check_gates_amount, check_selector_count, AmountRange, Component, ComponentColumns,
            Manifest, RowCursor,
        },
        expr::{range_membership, witness_curr, witness_prev, Expr},
        table::AssignmentTable,
        variable::Variable,
    },
    error::CircuitError,
};
use arith_utils::{math::ceil_div, FieldHelpers};
use ark_ff::PrimeField;
use log::warn;

/// Width in bits of one chunk
pub const CHUNK_SIZE: usize = 2;

/// Witness columns not holding chunks (the running sum)
pub const RESERVED_COLUMNS: usize = 1;

pub fn chunks_per_row(witness_amount: usize) -> usize {
    witness_amount - RESERVED_COLUMNS
}

pub fn bits_per_row(witness_amount: usize) -> usize {
    chunks_per_row(witness_amount) * CHUNK_SIZE
}

pub fn rows_amount(witness_amount: usize, bits_amount: usize) -> usize {
    1 + ceil_div(bits_amount, bits_per_row(witness_amount))
}

pub fn gates_amount(bits_amount: usize) -> usize {
    1 + usize::from(bits_amount % CHUNK_SIZE != 0)
}

pub fn manifest() -> Manifest {
    Manifest {
        witness_amount: AmountRange::at_least(RESERVED_COLUMNS + 1),
        constant_amount: AmountRange::exactly(1),
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RangeCheckInput {
    pub x: Variable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeCheckOutput {
    /// The final running sum, equal to `x`
    pub value: Variable,
}

#[derive(Clone, Debug)]
pub struct RangeCheck {
    columns: ComponentColumns,
    bits_amount: usize,
}

impl RangeCheck {
    pub const NAME: &'static str = "range_check";

    pub fn new(columns: ComponentColumns, bits_amount: usize) -> Result<Self, CircuitError> {
        manifest().check(Self::NAME, &columns)?;
        Ok(Self {
            columns,
            bits_amount,
        })
    }

    pub fn bits_amount(&self) -> usize {
        self.bits_amount
    }

    pub fn chunks_per_row(&self) -> usize {
        chunks_per_row(self.columns.witness_amount())
    }

    pub fn bits_per_row(&self) -> usize {
        bits_per_row(self.columns.witness_amount())
    }

    fn rows(&self) -> usize {
        rows_amount(self.columns.witness_amount(), self.bits_amount)
    }

    /// Chunks laid out, padding included
    pub fn padded_chunks(&self) -> usize {
        (self.rows() - 1) * self.chunks_per_row()
    }

    /// Leading chunks made of padding only
    pub fn padding_size(&self) -> usize {
        self.padded_chunks() - ceil_div(self.bits_amount, CHUNK_SIZE)
    }

    /// Leading zero bits added in front of `x`
    pub fn padding_bits(&self) -> usize {
        self.padded_chunks() * CHUNK_SIZE - self.bits_amount
    }

    fn check_field<F: PrimeField>(&self) -> Result<(), CircuitError> {
        if self.bits_amount >= F::MODULUS_BIT_SIZE as usize {
            return Err(CircuitError::InvalidParameter {
                component: Self::NAME,
                reason: format!(
                    "{} bits do not fit below a {}-bit modulus",
                    self.bits_amount,
                    F::MODULUS_BIT_SIZE
                ),
            });
        }
        Ok(())
    }

    /// Big-endian chunks of the low `bits_amount` bits of `x`, left-padded
    /// to [Self::padded_chunks] chunks
    pub fn chunks<F: PrimeField>(&self, x: F) -> Vec<u64> {
        let bits = x.to_bits();
        let total = self.padded_chunks() * CHUNK_SIZE;
        let bit = |k: usize| {
            let position = total - 1 - k;
            position < self.bits_amount && bits[position]
        };
        (0..self.padded_chunks())
            .map(|chunk| {
                (0..CHUNK_SIZE).fold(0u64, |acc, t| {
                    (acc << 1) | u64::from(bit(chunk * CHUNK_SIZE + t))
                })
            })
            .collect()
    }

    fn main_gate<F: PrimeField>(&self) -> Vec<Expr<F>> {
        let w = |i| self.columns.w(i);
        let chunks_per_row = self.chunks_per_row();

        let mut constraints: Vec<Expr<F>> = (1..=chunks_per_row)
            .map(|j| range_membership(&witness_curr(w(j)), 1 << CHUNK_SIZE))
            .collect();

        let mut chunk_sum = Expr::<F>::zero();
        for j in 1..=chunks_per_row {
            let shift = (CHUNK_SIZE * (chunks_per_row - j)) as u64;
            chunk_sum += witness_curr(w(j)) * Expr::constant(F::two_pow(shift));
        }
        let row_shift = Expr::constant(F::two_pow(self.bits_per_row() as u64));
        constraints.push(witness_curr(w(0)) - (witness_prev(w(0)) * row_shift + chunk_sum));

        constraints
    }

    /// Only needed when the leading chunk is narrower than [CHUNK_SIZE]
    fn leading_chunk_gate<F: PrimeField>(&self) -> Option<Vec<Expr<F>>> {
        let leading_bits = self.bits_amount % CHUNK_SIZE;
        (leading_bits != 0).then(|| {
            let column = self.columns.w(RESERVED_COLUMNS + self.padding_size());
            vec![range_membership(&witness_curr(column), 1 << leading_bits)]
        })
    }

    fn result(&self, start_row: usize) -> RangeCheckOutput {
        RangeCheckOutput {
            value: Variable::witness(self.columns.w(0), start_row + self.rows() - 1),
        }
    }
}

impl<F: PrimeField> Component<F> for RangeCheck {
    const NAME: &'static str = RangeCheck::NAME;
    type Input = RangeCheckInput;
    type Output = RangeCheckOutput;

    fn manifest(&self) -> Manifest {
        manifest()
    }

    fn rows_amount(&self) -> usize {
        self.rows()
    }

    fn gates_amount(&self) -> usize {
        gates_amount(self.bits_amount)
    }

    fn output(&self, start_row: usize) -> Result<RangeCheckOutput, CircuitError> {
        Ok(self.result(start_row))
    }

    fn generate_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &RangeCheckInput,
        start_row: usize,
    ) -> Result<RangeCheckOutput, CircuitError> {
        self.check_field::<F>()?;
        let w = |i| self.columns.w(i);
        let mut cursor = RowCursor::new(start_row);

        let x = table.get(&input.x)?;
        if x.to_bits()[self.bits_amount..].iter().any(|b| *b) {
            warn!(
                "{}: value does not fit in {} bits, the assignment will not satisfy the circuit",
                Self::NAME,
                self.bits_amount
            );
        }

        let row = cursor.advance(1);
        table.set_witness(w(0), row, F::zero())?;

        let base = F::from(1u64 << CHUNK_SIZE);
        let mut sum = F::zero();
        for row_chunks in self.chunks(x).chunks(self.chunks_per_row()) {
            let row = cursor.advance(1);
            for (j, chunk) in row_chunks.iter().enumerate() {
                let chunk = F::from(*chunk);
                table.set_witness(w(RESERVED_COLUMNS + j), row, chunk)?;
                sum = sum * base + chunk;
            }
            table.set_witness(w(0), row, sum)?;
        }

        cursor.finish(Self::NAME, self.rows())?;
        Ok(self.result(start_row))
    }

    fn generate_circuit(
        &self,
        circuit: &mut Circuit<F>,
        table: &mut AssignmentTable<F>,
        input: &RangeCheckInput,
        start_row: usize,
    ) -> Result<RangeCheckOutput, CircuitError> {
        self.check_field::<F>()?;
        let w = |i| self.columns.w(i);
        let gates_amount = gates_amount(self.bits_amount);
        let rows = self.rows();

        let gates_before = circuit.gates_amount();
        let mut selectors = vec![circuit.add_gate_cached(self.main_gate())?.selector];
        if let Some(gate) = self.leading_chunk_gate() {
            selectors.push(circuit.add_gate_cached(gate)?.selector);
        }
        check_selector_count(Self::NAME, gates_amount, &selectors)?;
        check_gates_amount(Self::NAME, gates_amount, gates_before, circuit.gates_amount())?;

        if rows > 1 {
            table.enable_selector_range(selectors[0], start_row + 1, start_row + rows - 1)?;
        }
        if let Some(leading) = selectors.get(1) {
            table.enable_selector(*leading, start_row + 1);
        }

        table.set_constant(self.columns.c(0), start_row, F::zero())?;
        let zero = Variable::constant(self.columns.c(0), start_row);
        circuit.add_copy_constraint(Variable::witness(w(0), start_row), zero)?;
        for j in 0..self.padding_size() {
            circuit.add_copy_constraint(
                Variable::witness(w(RESERVED_COLUMNS + j), start_row + 1),
                zero,
            )?;
        }

        let output = self.result(start_row);
        circuit.add_copy_constraint(output.value, input.x)?;
        Ok(output)
    }
}

#[derive(Clone, Debug)]
pub struct RangeCheckMultiInput {
    pub xs: Vec<Variable>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeCheckMultiOutput {
    pub values: Vec<Variable>,
}

/// `amount` range checks of the same width, laid out back to back.
/// All of them share the gates of the first.
#[derive(Clone, Debug)]
pub struct RangeCheckMulti {
    child: RangeCheck,
    amount: usize,
}

impl RangeCheckMulti {
    pub const NAME: &'static str = "range_check_multi";

    pub fn new(
        columns: ComponentColumns,
        bits_amount: usize,
        amount: usize,
    ) -> Result<Self, CircuitError> {
        if amount == 0 {
            return Err(CircuitError::InvalidParameter {
                component: Self::NAME,
                reason: "at least one value must be checked".to_string(),
            });
        }
        Ok(Self {
            child: RangeCheck::new(columns, bits_amount)?,
            amount,
        })
    }

    fn check_input(&self, input: &RangeCheckMultiInput) -> Result<(), CircuitError> {
        if input.xs.len() != self.amount {
            return Err(CircuitError::InvalidInput {
                component: Self::NAME,
                reason: format!("expected {} values, got {}", self.amount, input.xs.len()),
            });
        }
        Ok(())
    }

    fn child_start(&self, start_row: usize, i: usize) -> usize {
        start_row + i * self.child.rows()
    }
}

impl<F: PrimeField> Component<F> for RangeCheckMulti {
    const NAME: &'static str = RangeCheckMulti::NAME;
    type Input = RangeCheckMultiInput;
    type Output = RangeCheckMultiOutput;

    fn manifest(&self) -> Manifest {
        manifest()
    }

    fn rows_amount(&self) -> usize {
        self.amount * self.child.rows()
    }

    fn gates_amount(&self) -> usize {
        gates_amount(self.child.bits_amount)
    }

    fn output(&self, start_row: usize) -> Result<RangeCheckMultiOutput, CircuitError> {
        Ok(RangeCheckMultiOutput {
            values: (0..self.amount)
                .map(|i| self.child.result(self.child_start(start_row, i)).value)
                .collect(),
        })
    }

    fn generate_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &RangeCheckMultiInput,
        start_row: usize,
    ) -> Result<RangeCheckMultiOutput, CircuitError> {
        self.check_input(input)?;
        let mut cursor = RowCursor::new(start_row);
        let mut values = Vec::with_capacity(self.amount);
        for x in &input.xs {
            let row = cursor.advance(self.child.rows());
            let out = self
                .child
                .generate_assignments(table, &RangeCheckInput { x: *x }, row)?;
            values.push(out.value);
        }
        cursor.finish(Self::NAME, <Self as Component<F>>::rows_amount(self))?;
        Ok(RangeCheckMultiOutput { values })
    }

    fn generate_circuit(
        &self,
        circuit: &mut Circuit<F>,
        table: &mut AssignmentTable<F>,
        input: &RangeCheckMultiInput,
        start_row: usize,
    ) -> Result<RangeCheckMultiOutput, CircuitError> {
        self.check_input(input)?;
        let gates_before = circuit.gates_amount();
        let mut values = Vec::with_capacity(self.amount);
        for (i, x) in input.xs.iter().enumerate() {
            let out = self.child.generate_circuit(
                circuit,
                table,
                &RangeCheckInput { x: *x },
                self.child_start(start_row, i),
            )?;
            values.push(out.value);
        }
        check_gates_amount(
            Self::NAME,
            <Self as Component<F>>::gates_amount(self),
            gates_before,
            circuit.gates_amount(),
        )?;
        Ok(RangeCheckMultiOutput { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn layout_for_five_bits_on_four_columns() {
        let rc = RangeCheck::new(ComponentColumns::contiguous(4, 1), 5).unwrap();
        assert_eq!(rc.chunks_per_row(), 3);
        assert_eq!(rc.bits_per_row(), 6);
        assert_eq!(<RangeCheck as Component<Fr>>::rows_amount(&rc), 2);
        assert_eq!(<RangeCheck as Component<Fr>>::gates_amount(&rc), 2);
        assert_eq!(rc.padded_chunks(), 3);
        assert_eq!(rc.padding_size(), 0);
        assert_eq!(rc.padding_bits(), 1);
        assert_eq!(rc.chunks(Fr::from(19u64)), vec![1, 0, 3]);
    }

    #[test]
    fn padding_chunks() {
        // 7 data chunks per row, 3 bits need 2 chunks: 5 padding chunks
        let rc = RangeCheck::new(ComponentColumns::contiguous(8, 1), 3).unwrap();
        assert_eq!(rc.padded_chunks(), 7);
        assert_eq!(rc.padding_size(), 5);
        assert_eq!(rc.padding_bits(), 11);
        assert_eq!(rc.chunks(Fr::from(0b101u64)), vec![0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn even_widths_need_one_gate() {
        for bits in [2, 4, 8, 64] {
            assert_eq!(gates_amount(bits), 1);
        }
        for bits in [1, 3, 9, 63] {
            assert_eq!(gates_amount(bits), 2);
        }
    }

    #[test]
    fn rows_amount_formula() {
        assert_eq!(rows_amount(4, 0), 1);
        assert_eq!(rows_amount(4, 6), 2);
        assert_eq!(rows_amount(4, 7), 3);
        assert_eq!(rows_amount(15, 64), 4);
    }

    #[test]
    fn manifest_requires_a_chunk_column() {
        assert!(RangeCheck::new(ComponentColumns::contiguous(1, 1), 8).is_err());
        assert!(RangeCheck::new(ComponentColumns::contiguous(2, 0), 8).is_err());
        assert!(RangeCheckMulti::new(ComponentColumns::contiguous(4, 1), 8, 0).is_err());
    }
}
