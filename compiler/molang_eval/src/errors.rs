//! Error types of the compile and evaluate entry points.

use molang_diagnostic::{Diagnostic, ErrorCode};
use molang_ir::{ScopeKind, Span};
use molang_lexer::LexError;
use molang_parse::ParseError;
use molang_resolve::SemanticError;

/// Any failure of `compile`. A failed compile never produces an artifact and
/// never writes a cache entry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Lexical(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] ParseError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl CompileError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CompileError::Lexical(e) => e.code(),
            CompileError::Syntax(e) => e.code,
            CompileError::Semantic(e) => e.code(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            CompileError::Lexical(e) => e.span(),
            CompileError::Syntax(e) => e.span,
            CompileError::Semantic(e) => e.span(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CompileError::Lexical(e) => e.to_diagnostic(),
            CompileError::Syntax(e) => e.to_diagnostic(),
            CompileError::Semantic(e) => e.to_diagnostic(),
        }
    }
}

/// A host binding broke its contract during evaluation. Fatal to that one
/// evaluation only.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("member `{member}` is not callable")]
    NotCallable { member: String },

    #[error("member `{member}` is read-only")]
    ReadOnly { member: String },

    #[error("host error: {0}")]
    Host(String),
}

impl BindingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            BindingError::NotCallable { .. } => ErrorCode::E6001,
            BindingError::ReadOnly { .. } => ErrorCode::E6002,
            BindingError::Host(_) => ErrorCode::E6003,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            BindingError::NotCallable { .. } => {
                diag.with_note("the member exists but holds a value, not a function")
            }
            BindingError::ReadOnly { .. } => diag,
            BindingError::Host(_) => diag.with_note("raised by the host binding"),
        }
    }
}

/// Registering a binding for a scope the engine owns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    #[error("scope `{0}` is owned by the engine and cannot be bound")]
    EngineOwned(ScopeKind),
}

/// Failure of the one-shot compile-and-evaluate path.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Binding(#[from] BindingError),
}

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalError::Compile(e) => e.code(),
            EvalError::Binding(e) => e.code(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            EvalError::Compile(e) => e.to_diagnostic(),
            EvalError::Binding(e) => e.to_diagnostic(),
        }
    }
}
