//! Parse errors.

use molang_diagnostic::{Diagnostic, ErrorCode};
use molang_ir::Span;

/// Syntax error: an unexpected token. Aborts the parse; no partial AST is
/// returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub span: Span,
    /// What the parser was looking for, e.g. "`)`" or "expression".
    pub expected: String,
    /// Description of the token actually found.
    pub found: String,
    /// Opening delimiter for unclosed-delimiter errors.
    pub opened_at: Option<Span>,
}

impl ParseError {
    pub fn new(
        code: ErrorCode,
        span: Span,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        ParseError {
            code,
            span,
            expected: expected.into(),
            found: found.into(),
            opened_at: None,
        }
    }

    #[must_use]
    pub fn with_opened_at(mut self, span: Span) -> Self {
        self.opened_at = Some(span);
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code)
            .with_message(self.to_string())
            .with_label(self.span, format!("expected {}", self.expected));
        if let Some(open) = self.opened_at {
            diag = diag.with_secondary_label(open, "opened here");
        }
        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message() {
        let err = ParseError::new(ErrorCode::E1002, Span::new(3, 4), "expression", "`)`");
        assert_eq!(err.to_string(), "expected expression, found `)`");
    }

    #[test]
    fn test_diagnostic_labels() {
        let err = ParseError::new(ErrorCode::E1003, Span::point(9), "`)`", "end of input")
            .with_opened_at(Span::new(4, 5));
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E1003);
        assert_eq!(diag.labels.len(), 2);
        assert_eq!(diag.primary_span(), Some(Span::point(9)));
    }
}
