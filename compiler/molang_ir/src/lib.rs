//! Intermediate representation shared by every MoLang compiler phase.
//!
//! - [`Span`]: compact byte-offset source locations
//! - [`Token`] / [`TokenKind`] / [`TokenList`]: lexer output
//! - [`ExprArena`] / [`ExprId`] / [`ExprKind`]: flat, index-addressed AST
//! - [`BinaryOp`] / [`UnaryOp`]: operators with their numeric semantics
//! - [`ScopeKind`]: the closed scope vocabulary (`query`, `variable`, ...)
//! - [`MathFn`]: the built-in `math.*` table
//!
//! The AST is flattened into an arena: children are referenced by `ExprId`
//! and argument lists by `ExprRange`, so nodes are `Copy` and small.

/// Compile-time assertion that a type has the expected size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
pub mod builtins;
mod operators;
mod scope;
mod span;
mod token;

pub use ast::{Expr, ExprArena, ExprId, ExprKind, ExprRange, Name, NameRange};
pub use builtins::{MathFn, RandomSource};
pub use operators::{bool_to_f64, is_truthy, BinaryOp, UnaryOp};
pub use scope::ScopeKind;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
