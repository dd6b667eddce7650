pub mod circuit;
pub mod component;
pub mod expr;
pub mod gate;
pub mod satisfiability;
pub mod table;
pub mod variable;
