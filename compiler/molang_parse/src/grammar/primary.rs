//! Primary expressions: literals, identifier paths, calls, grouping, blocks,
//! loop forms and control keywords.

use molang_diagnostic::ErrorCode;
use molang_ir::{ExprId, ExprKind, ExprRange, Name, Span, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current();
        let span = token.span;

        match &token.kind {
            TokenKind::Number(n) => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Number(*n), span))
            }
            TokenKind::True => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Number(1.0), span))
            }
            TokenKind::False => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Number(0.0), span))
            }
            TokenKind::Str(text) => {
                self.cursor.advance();
                let name = self.arena.intern(text);
                Ok(self.alloc(ExprKind::Str(name), span))
            }
            TokenKind::Ident(_) => self.parse_path_or_call(),
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect_closing(&TokenKind::RParen, span)?;
                Ok(inner)
            }
            TokenKind::LBrace => {
                self.cursor.advance();
                self.parse_sequence(Some(span))
            }
            TokenKind::Loop => self.parse_loop(),
            TokenKind::ForEach => self.parse_for_each(),
            TokenKind::Break => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Break, span))
            }
            TokenKind::Continue => {
                self.cursor.advance();
                Ok(self.alloc(ExprKind::Continue, span))
            }
            TokenKind::Return => {
                self.cursor.advance();
                let value = if self.at_statement_end() {
                    // Bare `return` yields void.
                    self.alloc(
                        ExprKind::Block {
                            stmts: ExprRange::EMPTY,
                            tail: None,
                        },
                        span,
                    )
                } else {
                    self.parse_expr()?
                };
                let full = span.merge(self.span_of(value));
                Ok(self.alloc(ExprKind::Return(value), full))
            }
            _ => Err(self.cursor.unexpected(ErrorCode::E1002, "expression")),
        }
    }

    fn at_statement_end(&self) -> bool {
        self.cursor.is_at_end()
            || self.cursor.check(&TokenKind::Semicolon)
            || self.cursor.check(&TokenKind::RBrace)
    }

    /// `ident(.ident)*`, optionally followed by a call argument list.
    fn parse_path_or_call(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        let mut names = Vec::with_capacity(3);
        names.push(self.expect_ident()?);

        while self.cursor.eat(&TokenKind::Dot) {
            names.push(self.expect_ident()?);
        }

        let path = self.arena.alloc_path(names);
        let path_span = start.merge(self.cursor.previous_span());
        let callee = self.alloc(ExprKind::Path(path), path_span);

        if !self.cursor.check(&TokenKind::LParen) {
            return Ok(callee);
        }
        let (args, close) = self.parse_args()?;
        Ok(self.alloc(ExprKind::Call { callee, args }, path_span.merge(close)))
    }

    fn expect_ident(&mut self) -> Result<Name, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(self.arena.intern(name))
            }
            _ => Err(self.cursor.unexpected(ErrorCode::E1001, "identifier")),
        }
    }

    /// `( expr (, expr)* )`. Returns the argument list and the span of `)`.
    fn parse_args(&mut self) -> Result<(ExprRange, Span), ParseError> {
        let open = self.cursor.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();

        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let close = self.cursor.expect_closing(&TokenKind::RParen, open)?;
        Ok((self.arena.alloc_list(args), close))
    }

    /// `loop(count, body)` or `loop(count) { ... }`.
    fn parse_loop(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.advance().span;
        let open = self.cursor.expect(&TokenKind::LParen)?;
        let count = self.parse_expr()?;
        let body = self.parse_loop_body(open)?;
        let span = start.merge(self.cursor.previous_span());
        Ok(self.alloc(ExprKind::Loop { count, body }, span))
    }

    /// `for_each(variable, collection, body)` or
    /// `for_each(variable, collection) { ... }`.
    fn parse_for_each(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.advance().span;
        let open = self.cursor.expect(&TokenKind::LParen)?;
        let variable = self.parse_expr()?;
        self.cursor.expect(&TokenKind::Comma)?;
        let collection = self.parse_expr()?;
        let body = self.parse_loop_body(open)?;
        let span = start.merge(self.cursor.previous_span());
        Ok(self.alloc(
            ExprKind::ForEach {
                variable,
                collection,
                body,
            },
            span,
        ))
    }

    /// The body of a loop form: either `, body)` inside the parentheses or a
    /// braced block after `)`.
    fn parse_loop_body(&mut self, open: Span) -> Result<ExprId, ParseError> {
        if self.cursor.eat(&TokenKind::Comma) {
            let body = self.parse_expr()?;
            self.cursor.expect_closing(&TokenKind::RParen, open)?;
            return Ok(body);
        }
        self.cursor.expect_closing(&TokenKind::RParen, open)?;
        let brace = self.cursor.expect(&TokenKind::LBrace)?;
        self.parse_sequence(Some(brace))
    }
}
