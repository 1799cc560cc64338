//! Recursive descent parser for MoLang.
//!
//! Consumes a [`TokenList`] and produces a [`ParsedProgram`]: an
//! [`ExprArena`] plus the id of the root expression. A program is a sequence
//! of `;`-separated statements; a trailing expression without `;` is the
//! program's value. A program consisting of a single expression is returned
//! as that expression rather than wrapped in a block.
//!
//! Precedence, loosest first:
//!
//! | Level | Operators |
//! |-------|-----------|
//! | assignment | `=` (right-assoc) |
//! | ternary | `? :`, `?` (right-assoc) |
//! | coalesce | `??` |
//! | or | `\|\|` |
//! | and | `&&` |
//! | equality | `==` `!=` |
//! | comparison | `<` `<=` `>` `>=` |
//! | additive | `+` `-` |
//! | multiplicative | `*` `/` `%` |
//! | unary | `-` `!` |
//! | arrow | `->` |
//! | postfix | `[index]` |

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;

use molang_ir::{Expr, ExprArena, ExprId, ExprKind, Span, TokenList};
use tracing::trace;

/// Output of a successful parse.
#[derive(Clone, Debug)]
pub struct ParsedProgram {
    pub arena: ExprArena,
    pub root: ExprId,
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: ExprArena::new(),
        }
    }

    /// Parse a whole program.
    pub fn parse_program(mut self) -> Result<ParsedProgram, ParseError> {
        let root = self.parse_sequence(None)?;
        Ok(ParsedProgram {
            arena: self.arena,
            root,
        })
    }

    #[inline]
    pub(crate) fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    #[inline]
    pub(crate) fn span_of(&self, id: ExprId) -> Span {
        self.arena.get_expr(id).span
    }
}

/// Parse a token list.
pub fn parse(tokens: &TokenList) -> Result<ParsedProgram, ParseError> {
    let program = Parser::new(tokens).parse_program()?;
    trace!(exprs = program.arena.expr_count(), "parsed");
    Ok(program)
}
