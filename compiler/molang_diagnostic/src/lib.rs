//! Diagnostics for the MoLang compiler.
//!
//! Every compile-time and runtime error converts into a [`Diagnostic`]:
//! a stable [`ErrorCode`], a message, labelled source spans and notes.
//! The [`emitter`] module renders them for terminals.

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
