//! The constraint builder: gates keyed by selector, copy constraints and the
//! cache that lets structurally identical gates share one selector.

use crate::{
    circuits::{
        expr::Expr,
        gate::{check_constraints, CopyConstraint, Gate, ShapeSeed},
        variable::{ColumnKind, Variable},
    },
    error::CircuitError,
};
use ark_ff::PrimeField;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of [Circuit::add_gate_cached]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectorAllocation {
    pub selector: usize,
    /// false when an identical gate already existed
    pub fresh: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct Circuit<F: PrimeField> {
    gates: Vec<Gate<F>>,
    copy_constraints: Vec<CopyConstraint>,
    selector_cache: HashMap<ShapeSeed, usize>,
}

impl<F: PrimeField> Circuit<F> {
    pub fn new() -> Self {
        Self {
            gates: vec![],
            copy_constraints: vec![],
            selector_cache: HashMap::new(),
        }
    }

    /// Append a new gate and return its fresh selector index.
    /// The gate is not registered in the selector cache.
    pub fn add_gate(&mut self, constraints: Vec<Expr<F>>) -> Result<usize, CircuitError> {
        let selector = self.gates.len();
        if constraints.is_empty() {
            return Err(CircuitError::EmptyGate(selector));
        }
        check_constraints(&constraints)?;
        debug!(
            "new gate {selector}: {} constraints of degree <= {}",
            constraints.len(),
            constraints.iter().map(Expr::degree).max().unwrap_or(0)
        );
        self.gates.push(Gate {
            selector,
            constraints,
        });
        Ok(selector)
    }

    /// Selector previously registered under `seed`
    pub fn find_selector(&self, seed: &ShapeSeed) -> Option<usize> {
        self.selector_cache.get(seed).copied()
    }

    /// Register `constraints` under `seed`, unless the seed is already known.
    pub fn add_gate_with_seed(
        &mut self,
        seed: ShapeSeed,
        constraints: Vec<Expr<F>>,
    ) -> Result<SelectorAllocation, CircuitError> {
        if let Some(selector) = self.find_selector(&seed) {
            debug!("gate shape cache hit: selector {selector}");
            return Ok(SelectorAllocation {
                selector,
                fresh: false,
            });
        }
        let selector = self.add_gate(constraints)?;
        self.selector_cache.insert(seed, selector);
        Ok(SelectorAllocation {
            selector,
            fresh: true,
        })
    }

    /// Probe the cache with the fingerprint of `constraints` and only add a
    /// gate on a miss.
    pub fn add_gate_cached(
        &mut self,
        constraints: Vec<Expr<F>>,
    ) -> Result<SelectorAllocation, CircuitError> {
        let seed = ShapeSeed::of(&constraints)?;
        self.add_gate_with_seed(seed, constraints)
    }

    /// Require `left` and `right` to hold equal values. Both must be
    /// absolute value cells.
    pub fn add_copy_constraint(
        &mut self,
        left: Variable,
        right: Variable,
    ) -> Result<(), CircuitError> {
        for var in [left, right] {
            if var.kind == ColumnKind::Selector {
                return Err(CircuitError::SelectorCell(var));
            }
            if !var.is_absolute() {
                return Err(CircuitError::UnresolvedVariable(var));
            }
        }
        trace!("copy constraint {left:?} == {right:?}");
        self.copy_constraints.push(CopyConstraint { left, right });
        Ok(())
    }

    pub fn gates(&self) -> &[Gate<F>] {
        &self.gates
    }

    pub fn gate(&self, selector: usize) -> Option<&Gate<F>> {
        self.gates.get(selector)
    }

    pub fn copy_constraints(&self) -> &[CopyConstraint] {
        &self.copy_constraints
    }

    pub fn gates_amount(&self) -> usize {
        self.gates.len()
    }
}
