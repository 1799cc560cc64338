//! Statement sequences and the expression precedence chain.

use molang_diagnostic::ErrorCode;
use molang_ir::{BinaryOp, ExprId, ExprKind, Span, TokenKind};
use molang_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse `;`-separated statements up to end of input, or up to the `}`
    /// matching the `{` at `open`.
    ///
    /// Stray semicolons are ignored. At top level a lone trailing expression
    /// is returned as-is; braces always produce a `Block`.
    pub(crate) fn parse_sequence(&mut self, open: Option<Span>) -> Result<ExprId, ParseError> {
        let start = open.unwrap_or_else(|| self.cursor.current_span());
        let mut stmts = Vec::new();
        let mut tail = None;

        loop {
            while self.cursor.eat(&TokenKind::Semicolon) {}
            if self.at_sequence_end(open.is_some()) {
                break;
            }
            let expr = self.parse_expr()?;
            if self.cursor.eat(&TokenKind::Semicolon) {
                stmts.push(expr);
            } else if self.at_sequence_end(open.is_some()) {
                tail = Some(expr);
                break;
            } else {
                let expected = if open.is_some() {
                    "`;` or `}`"
                } else {
                    "`;` or end of input"
                };
                return Err(self.cursor.unexpected(ErrorCode::E1001, expected));
            }
        }

        let end = match open {
            Some(open_span) => self.cursor.expect_closing(&TokenKind::RBrace, open_span)?,
            None => {
                if stmts.is_empty() {
                    if let Some(expr) = tail {
                        return Ok(expr);
                    }
                }
                self.cursor.previous_span()
            }
        };

        let stmts = self.arena.alloc_list(stmts);
        Ok(self.alloc(ExprKind::Block { stmts, tail }, start.merge(end)))
    }

    fn at_sequence_end(&self, braced: bool) -> bool {
        self.cursor.is_at_end() || (braced && self.cursor.check(&TokenKind::RBrace))
    }

    /// Parse one expression. Every nesting construct re-enters here, so this
    /// is where the stack guard lives.
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    /// `target = value`, right-associative.
    fn parse_assignment(&mut self) -> Result<ExprId, ParseError> {
        let target = self.parse_ternary()?;
        if self.cursor.eat(&TokenKind::Eq) {
            let value = self.parse_expr()?;
            let span = self.span_of(target).merge(self.span_of(value));
            return Ok(self.alloc(ExprKind::Assign { target, value }, span));
        }
        Ok(target)
    }

    /// `cond ? then : else` and the else-less `cond ? then`.
    fn parse_ternary(&mut self) -> Result<ExprId, ParseError> {
        let cond = self.parse_binary_level(Self::parse_or, Self::match_coalesce_op)?;
        if !self.cursor.eat(&TokenKind::Question) {
            return Ok(cond);
        }

        let then_branch = self.parse_expr()?;
        if self.cursor.eat(&TokenKind::Colon) {
            let else_branch = self.parse_expr()?;
            let span = self.span_of(cond).merge(self.span_of(else_branch));
            return Ok(self.alloc(
                ExprKind::Ternary {
                    cond,
                    then_branch,
                    else_branch,
                },
                span,
            ));
        }

        let span = self.span_of(cond).merge(self.span_of(then_branch));
        Ok(self.alloc(ExprKind::Conditional { cond, then_branch }, span))
    }

    fn parse_or(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_and, Self::match_or_op)
    }

    fn parse_and(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_equality, Self::match_and_op)
    }

    fn parse_equality(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_comparison, Self::match_equality_op)
    }

    fn parse_comparison(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_additive, Self::match_comparison_op)
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_multiplicative, Self::match_additive_op)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_unary, Self::match_multiplicative_op)
    }

    /// One left-associative binary level: `next (op next)*`.
    fn parse_binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<ExprId, ParseError>,
        match_op: fn(&Self) -> Option<BinaryOp>,
    ) -> Result<ExprId, ParseError> {
        let mut left = next(self)?;
        while let Some(op) = match_op(self) {
            self.cursor.advance();
            let right = next(self)?;
            let span = self.span_of(left).merge(self.span_of(right));
            left = self.alloc(ExprKind::Binary { op, left, right }, span);
        }
        Ok(left)
    }

    /// Prefix `-` and `!`.
    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        if let Some(op) = self.match_unary_op() {
            let start = self.cursor.advance().span;
            let operand = ensure_sufficient_stack(|| self.parse_unary())?;
            let span = start.merge(self.span_of(operand));
            return Ok(self.alloc(ExprKind::Unary { op, operand }, span));
        }
        self.parse_arrow()
    }

    /// `receiver -> body`, left-associative.
    fn parse_arrow(&mut self) -> Result<ExprId, ParseError> {
        let mut receiver = self.parse_postfix()?;
        while self.cursor.eat(&TokenKind::Arrow) {
            let body = self.parse_postfix()?;
            let span = self.span_of(receiver).merge(self.span_of(body));
            receiver = self.alloc(ExprKind::Arrow { receiver, body }, span);
        }
        Ok(receiver)
    }

    /// Trailing `[index]` accesses.
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut base = self.parse_primary()?;
        while self.cursor.check(&TokenKind::LBracket) {
            let open = self.cursor.advance().span;
            let index = self.parse_expr()?;
            let close = self.cursor.expect_closing(&TokenKind::RBracket, open)?;
            let span = self.span_of(base).merge(close);
            base = self.alloc(ExprKind::Index { base, index }, span);
        }
        Ok(base)
    }
}
