//! Checks a filled assignment table against a circuit, the way the proving
//! backend will: every gate must vanish on every row its selector is on, and
//! every copy constraint must join equal values.

use crate::{
    circuits::{circuit::Circuit, table::AssignmentTable},
    error::SatisfiabilityError,
};
use ark_ff::PrimeField;

pub fn is_satisfied<F: PrimeField>(
    circuit: &Circuit<F>,
    table: &AssignmentTable<F>,
) -> Result<(), SatisfiabilityError> {
    for activation in table.selector_activations() {
        let gate = circuit
            .gate(activation.selector)
            .ok_or(SatisfiabilityError::UnknownSelector(activation.selector))?;
        for row in activation.rows() {
            for (i, constraint) in gate.constraints.iter().enumerate() {
                if !constraint.evaluate(table, row)?.is_zero() {
                    return Err(SatisfiabilityError::Constraint {
                        selector: gate.selector,
                        row,
                        index: i + 1,
                    });
                }
            }
        }
    }

    for copy in circuit.copy_constraints() {
        if table.get(&copy.left)? != table.get(&copy.right)? {
            return Err(SatisfiabilityError::CopyConstraint(copy.left, copy.right));
        }
    }

    Ok(())
}
