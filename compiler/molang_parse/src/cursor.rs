//! Token cursor for navigating the token stream.

use std::mem::discriminant;

use molang_diagnostic::ErrorCode;
use molang_ir::{Span, Token, TokenKind, TokenList};

use crate::ParseError;

/// Position in a token stream.
///
/// Invariant: the stream is non-empty and ends with `Eof`, and the cursor never
/// advances past that final token.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        let index = self.pos.min(self.tokens.len().saturating_sub(1));
        &self.tokens[index]
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check whether the current token has the same kind as `kind`, ignoring
    /// any payload.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        discriminant(self.current_kind()) == discriminant(kind)
    }

    /// Consume the current token and return it. `Eof` is never consumed.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of `kind` or fail with "expected `kind`".
    pub fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(ErrorCode::E1001, &kind.display_name()))
        }
    }

    /// Consume a closing delimiter opened at `open`. Running into end of
    /// input reports the delimiter as unclosed.
    pub fn expect_closing(&mut self, kind: &TokenKind, open: Span) -> Result<Span, ParseError> {
        if self.check(kind) {
            return Ok(self.advance().span);
        }
        let code = if self.is_at_end() {
            ErrorCode::E1003
        } else {
            ErrorCode::E1001
        };
        Err(self.unexpected(code, &kind.display_name()).with_opened_at(open))
    }

    /// Build an error describing the current token as unexpected.
    pub fn unexpected(&self, code: ErrorCode, expected: &str) -> ParseError {
        ParseError::new(
            code,
            self.current_span(),
            expected,
            self.current_kind().display_name(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn tokens(kinds: Vec<TokenKind>) -> TokenList {
        let mut list = TokenList::new();
        for (i, kind) in kinds.into_iter().enumerate() {
            let offset = u32::try_from(i).unwrap();
            list.push(Token::new(kind, Span::new(offset, offset + 1)));
        }
        list
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let list = tokens(vec![TokenKind::Number(1.0), TokenKind::Eof]);
        let mut cursor = Cursor::new(&list);
        assert!(cursor.check(&TokenKind::Number(0.0)));
        cursor.advance();
        assert!(cursor.is_at_end());
        cursor.advance();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.previous_span(), Span::new(0, 1));
    }

    #[test]
    fn test_expect_reports_found_token() {
        let list = tokens(vec![TokenKind::Semicolon, TokenKind::Eof]);
        let mut cursor = Cursor::new(&list);
        let err = cursor.expect(&TokenKind::RParen).unwrap_err();
        assert_eq!(err.code, ErrorCode::E1001);
        assert_eq!(err.expected, "`)`");
        assert_eq!(err.found, "`;`");
    }

    #[test]
    fn test_expect_closing_at_eof() {
        let list = tokens(vec![TokenKind::Eof]);
        let mut cursor = Cursor::new(&list);
        let err = cursor
            .expect_closing(&TokenKind::RParen, Span::new(0, 1))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::E1003);
        assert_eq!(err.opened_at, Some(Span::new(0, 1)));
    }
}
