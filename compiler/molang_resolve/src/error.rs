//! Semantic errors.

use molang_diagnostic::{Diagnostic, ErrorCode};
use molang_ir::{ScopeKind, Span};

/// Compile-time semantic error. Fatal to the compile call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    #[error("unknown scope `{name}`")]
    UnknownScope { name: String, span: Span },

    #[error("`{scope}` must be followed by a member name")]
    MissingMember { scope: ScopeKind, span: Span },

    #[error("unknown math member `math.{name}`")]
    UnknownBuiltin { name: String, span: Span },

    #[error("`math.{name}` expects {expected} argument(s), found {found}")]
    ArityMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("invalid assignment target: {reason}")]
    InvalidAssignmentTarget { reason: &'static str, span: Span },

    #[error("`{keyword}` outside of a loop")]
    ControlOutsideLoop { keyword: &'static str, span: Span },

    #[error("{message}")]
    BuiltinMisuse { message: String, span: Span },
}

impl SemanticError {
    pub fn span(&self) -> Span {
        match self {
            SemanticError::UnknownScope { span, .. }
            | SemanticError::MissingMember { span, .. }
            | SemanticError::UnknownBuiltin { span, .. }
            | SemanticError::ArityMismatch { span, .. }
            | SemanticError::InvalidAssignmentTarget { span, .. }
            | SemanticError::ControlOutsideLoop { span, .. }
            | SemanticError::BuiltinMisuse { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SemanticError::UnknownScope { .. } => ErrorCode::E2001,
            SemanticError::MissingMember { .. } => ErrorCode::E2002,
            SemanticError::UnknownBuiltin { .. } => ErrorCode::E2003,
            SemanticError::ArityMismatch { .. } => ErrorCode::E2004,
            SemanticError::InvalidAssignmentTarget { .. } => ErrorCode::E2005,
            SemanticError::ControlOutsideLoop { .. } => ErrorCode::E2006,
            SemanticError::BuiltinMisuse { .. } => ErrorCode::E2007,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            SemanticError::UnknownScope { span, .. } => diag
                .with_label(*span, "not a known scope")
                .with_note("valid scopes are query (q), variable (v), context (c), global, temp (t), math"),
            SemanticError::MissingMember { span, .. } => {
                diag.with_label(*span, "add a member, e.g. `variable.speed`")
            }
            SemanticError::UnknownBuiltin { span, .. } => {
                diag.with_label(*span, "not in the math table")
            }
            SemanticError::ArityMismatch { span, expected, .. } => {
                diag.with_label(*span, format!("expected {expected} argument(s)"))
            }
            SemanticError::InvalidAssignmentTarget { span, .. } => {
                diag.with_label(*span, "cannot assign here")
            }
            SemanticError::ControlOutsideLoop { span, .. } => diag
                .with_label(*span, "not inside `loop` or `for_each`"),
            SemanticError::BuiltinMisuse { span, .. } => diag.with_label(*span, "here"),
        }
    }
}
