//! The filter expression language used to narrow per-type reporting.
//!
//! A filter is compiled once per run and then evaluated for every
//! candidate type, so all rejection happens at compile time:
//! - `token`: splits the input into operator and predicate tokens
//! - `parse`: resolves parentheses and operator precedence, checks atoms
//! - `expr`: the compiled tree and its (infallible) evaluation

pub mod expr;
pub mod parse;
pub mod token;

pub use expr::FilterExpr;
pub use parse::compile;
