//! Relational algebra over finite tuple sets and rule-defined (possibly
//! infinite) relations, queried through a single `select` primitive.

pub mod algebra;
pub mod ast;
pub mod builtins;
mod closure;
pub mod error;
mod operators;
pub mod parser;
pub mod relation;
pub mod select;
pub mod solver;
pub mod tuple;


pub use error::{Error, ErrorKind, Result};
pub use parser::parse_equation;
pub use relation::{Cardinality, Relation};
pub use select::{Production, Rule, Selection};
pub use tuple::{Attribute, Heading, Tuple, Type, Value};
