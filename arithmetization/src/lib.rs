//! Plonkish arithmetization: the data structures a circuit is built from and
//! the components that fill them.
//!
//! A circuit is described by two objects that grow together:
//!
//! - an [AssignmentTable](circuits::table::AssignmentTable) of witness,
//!   public input and constant columns, plus the rows on which each selector
//!   is enabled;
//! - a [Circuit](circuits::circuit::Circuit): gates (polynomial constraints
//!   over relative cells, keyed by selector) and copy constraints between
//!   absolute cells.
//!
//! A [Component](circuits::component::Component) owns a contiguous range of
//! rows and knows how to fill it twice: once with the gates, selector
//! activations, constants and copy constraints
//! ([generate_circuit](circuits::component::Component::generate_circuit)),
//! and once with witness values
//! ([generate_assignments](circuits::component::Component::generate_assignments)).
//! Gates with the same shape share one selector through the cache held by
//! the circuit.

pub mod circuits;
pub mod components;
pub mod error;

pub use circuits::{
    circuit::{Circuit, SelectorAllocation},
    component::{Component, ComponentColumns, Manifest},
    satisfiability::is_satisfied,
    table::{AssignmentTable, TableShape},
    variable::{ColumnKind, Variable},
};
pub use error::{CircuitError, SatisfiabilityError};
