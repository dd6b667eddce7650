//! One-row field arithmetic: `z = x + y` and `z = x * y`.
//!
//! ```text
//! Column | Curr
//!   w(0) | x
//!   w(1) | y
//!   w(2) | z
//! ```

use crate::{
    circuits::{
        circuit::Circuit,
        component::{
            check_gates_amount, check_selector_count, AmountRange, Component, ComponentColumns,
            Manifest, RowCursor,
        },
        expr::{witness_curr, Expr},
        table::AssignmentTable,
        variable::Variable,
    },
    error::CircuitError,
};
use ark_ff::PrimeField;
use std::marker::PhantomData;

/// Operands of a binary operation
#[derive(Clone, Copy, Debug)]
pub struct BinaryInput {
    pub x: Variable,
    pub y: Variable,
}

/// The cell holding the result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinaryOutput {
    pub z: Variable,
}

/// The two operations laid out by [BinaryOperation]
pub trait Operation {
    const NAME: &'static str;
    fn apply<F: PrimeField>(x: F, y: F) -> F;
    fn constraint<F: PrimeField>(x: Expr<F>, y: Expr<F>, z: Expr<F>) -> Expr<F>;
}

#[derive(Clone, Copy, Debug)]
pub struct Add;

impl Operation for Add {
    const NAME: &'static str = "addition";
    fn apply<F: PrimeField>(x: F, y: F) -> F {
        x + y
    }
    fn constraint<F: PrimeField>(x: Expr<F>, y: Expr<F>, z: Expr<F>) -> Expr<F> {
        z - (x + y)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Mul;

impl Operation for Mul {
    const NAME: &'static str = "multiplication";
    fn apply<F: PrimeField>(x: F, y: F) -> F {
        x * y
    }
    fn constraint<F: PrimeField>(x: Expr<F>, y: Expr<F>, z: Expr<F>) -> Expr<F> {
        z - x * y
    }
}

#[derive(Clone, Debug)]
pub struct BinaryOperation<Op> {
    columns: ComponentColumns,
    _op: PhantomData<Op>,
}

pub type Addition = BinaryOperation<Add>;
pub type Multiplication = BinaryOperation<Mul>;

pub fn manifest() -> Manifest {
    Manifest {
        witness_amount: AmountRange::exactly(3),
        constant_amount: AmountRange::exactly(0),
    }
}

impl<Op: Operation> BinaryOperation<Op> {
    pub fn new(columns: ComponentColumns) -> Result<Self, CircuitError> {
        manifest().check(Op::NAME, &columns)?;
        Ok(Self {
            columns,
            _op: PhantomData,
        })
    }

    fn result(&self, start_row: usize) -> BinaryOutput {
        BinaryOutput {
            z: Variable::witness(self.columns.w(2), start_row),
        }
    }

    fn gate<F: PrimeField>(&self) -> Vec<Expr<F>> {
        let w = |i| witness_curr(self.columns.w(i));
        vec![Op::constraint(w(0), w(1), w(2))]
    }
}

impl<F: PrimeField, Op: Operation> Component<F> for BinaryOperation<Op> {
    const NAME: &'static str = Op::NAME;
    type Input = BinaryInput;
    type Output = BinaryOutput;

    fn manifest(&self) -> Manifest {
        manifest()
    }

    fn rows_amount(&self) -> usize {
        1
    }

    fn gates_amount(&self) -> usize {
        1
    }

    fn output(&self, start_row: usize) -> Result<BinaryOutput, CircuitError> {
        Ok(self.result(start_row))
    }

    fn generate_assignments(
        &self,
        table: &mut AssignmentTable<F>,
        input: &BinaryInput,
        start_row: usize,
    ) -> Result<BinaryOutput, CircuitError> {
        let mut cursor = RowCursor::new(start_row);
        let row = cursor.advance(1);
        let x = table.get(&input.x)?;
        let y = table.get(&input.y)?;
        table.set_witness(self.columns.w(0), row, x)?;
        table.set_witness(self.columns.w(1), row, y)?;
        table.set_witness(self.columns.w(2), row, Op::apply(x, y))?;
        cursor.finish(Op::NAME, 1)?;
        Ok(self.result(start_row))
    }

    fn generate_circuit(
        &self,
        circuit: &mut Circuit<F>,
        table: &mut AssignmentTable<F>,
        input: &BinaryInput,
        start_row: usize,
    ) -> Result<BinaryOutput, CircuitError> {
        let gates_before = circuit.gates_amount();
        let selector = circuit.add_gate_cached(self.gate())?.selector;
        check_selector_count(Op::NAME, 1, &[selector])?;
        check_gates_amount(Op::NAME, 1, gates_before, circuit.gates_amount())?;
        table.enable_selector(selector, start_row);

        circuit.add_copy_constraint(input.x, Variable::witness(self.columns.w(0), start_row))?;
        circuit.add_copy_constraint(input.y, Variable::witness(self.columns.w(1), start_row))?;
        Ok(self.result(start_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::{satisfiability::is_satisfied, table::TableShape};
    use ark_bn254::Fr;

    #[test]
    fn add_then_multiply() {
        let mut circuit = Circuit::<Fr>::new();
        let mut table = AssignmentTable::new(TableShape::new(3, 1, 0));
        table.set_public_input(0, 0, Fr::from(4u64)).unwrap();
        table.set_public_input(0, 1, Fr::from(5u64)).unwrap();
        let x = Variable::public_input(0, 0);
        let y = Variable::public_input(0, 1);

        let add = Addition::new(ComponentColumns::contiguous(3, 0)).unwrap();
        let mul = Multiplication::new(ComponentColumns::new(vec![2, 0, 1], vec![])).unwrap();

        let sum = add
            .generate_circuit(&mut circuit, &mut table, &BinaryInput { x, y }, 0)
            .unwrap();
        let product_input = BinaryInput { x: sum.z, y: x };
        let product = mul
            .generate_circuit(&mut circuit, &mut table, &product_input, 1)
            .unwrap();

        add.generate_assignments(&mut table, &BinaryInput { x, y }, 0)
            .unwrap();
        mul.generate_assignments(&mut table, &product_input, 1)
            .unwrap();

        assert_eq!(table.get(&sum.z), Ok(Fr::from(9u64)));
        assert_eq!(table.get(&product.z), Ok(Fr::from(36u64)));
        assert_eq!(product.z, Variable::witness(1, 1));
        assert_eq!(circuit.gates_amount(), 2);
        assert_eq!(is_satisfied(&circuit, &table), Ok(()));
    }

    #[test]
    fn wrong_column_count() {
        assert!(matches!(
            Addition::new(ComponentColumns::contiguous(2, 0)),
            Err(CircuitError::ManifestViolation { .. })
        ));
    }
}
