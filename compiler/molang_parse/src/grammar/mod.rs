//! Grammar rules, split by concern.
//!
//! - `expr`: statement sequences and the binary precedence chain
//! - `operators`: token to operator mapping
//! - `primary`: literals, paths, calls, grouping, blocks and loop forms

mod expr;
mod operators;
mod primary;
