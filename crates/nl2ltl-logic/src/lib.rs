//! nl2ltl formula core
//!
//! This crate defines the propositional/temporal formula AST shared by the
//! template catalog:
//! - future-time operators for LTLf (`X`, `F`, `G`, `U`)
//! - past-time operators for PPLTL (`Y`, `O`, `H`, `S`)
//!
//! Formulas are immutable value types with structural equality. A canonical
//! text form is provided by `Display` and read back by [`parse_formula`].

pub mod atom;
pub mod formula;
pub mod parser;

pub use atom::{Atom, AtomError};
pub use formula::{Formula, Logic};
pub use parser::{parse_formula, FormulaParseError};
