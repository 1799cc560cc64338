//! Lexer for MoLang using logos.
//!
//! Produces a [`TokenList`] terminated by an `Eof` token. Identifiers and
//! keywords are case-insensitive and are lower-cased here, so later phases
//! only ever see canonical names. `#` starts a comment that runs to the end of
//! the line. The first unrecognized character aborts lexing.

use logos::Logos;
use molang_diagnostic::{Diagnostic, ErrorCode};
use molang_ir::{Span, Token, TokenKind, TokenList};
use tracing::trace;

/// Raw token from logos, before keyword classification.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
enum RawToken {
    // Integer, decimal and scientific forms, plus leading-dot decimals (`.5`).
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r"'[^']*'")]
    Str,

    // A quote with no closing partner before end of input.
    #[regex(r"'[^']*")]
    UnterminatedStr,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,

    #[token("+")]
    Plus,
    #[token("->")]
    Arrow,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!=")]
    NotEq,
    #[token("!")]
    Bang,
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("??")]
    DoubleQuestion,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
}

/// Lexical errors. Fatal to the compile call that produced them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("invalid character `{found}`")]
    InvalidCharacter { span: Span, found: char },
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::InvalidCharacter { span, .. } | LexError::UnterminatedString { span } => {
                *span
            }
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LexError::InvalidCharacter { .. } => ErrorCode::E0002,
            LexError::UnterminatedString { .. } => ErrorCode::E0001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            LexError::InvalidCharacter { span, .. } => {
                diag.with_label(*span, "not valid in an expression")
            }
            LexError::UnterminatedString { span } => diag
                .with_label(*span, "string starts here")
                .with_note("string literals are single-quoted: 'text'"),
        }
    }
}

/// Lex source text into tokens.
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    let mut tokens = TokenList::with_capacity(source.len() / 2 + 1);
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let slice = lexer.slice();
        let kind = match result {
            Ok(raw) => convert_token(raw, slice, span)?,
            Err(()) => {
                let found = slice.chars().next().unwrap_or('\u{fffd}');
                return Err(LexError::InvalidCharacter { span, found });
            }
        };
        tokens.push(Token::new(kind, span));
    }

    let end = Span::from_range(source.len()..source.len());
    tokens.push(Token::new(TokenKind::Eof, end));
    trace!(tokens = tokens.len(), bytes = source.len(), "lexed");
    Ok(tokens)
}

fn convert_token(raw: RawToken, slice: &str, span: Span) -> Result<TokenKind, LexError> {
    let kind = match raw {
        RawToken::Number(n) => TokenKind::Number(n),
        RawToken::Str => TokenKind::Str(slice[1..slice.len() - 1].into()),
        RawToken::UnterminatedStr => return Err(LexError::UnterminatedString { span }),
        RawToken::Ident => keyword_or_ident(slice),
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Bang => TokenKind::Bang,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::DoubleQuestion => TokenKind::DoubleQuestion,
        RawToken::Question => TokenKind::Question,
        RawToken::Colon => TokenKind::Colon,
    };
    Ok(kind)
}

fn keyword_or_ident(slice: &str) -> TokenKind {
    let lower = slice.to_ascii_lowercase();
    match lower.as_str() {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "return" => TokenKind::Return,
        "loop" => TokenKind::Loop,
        "for_each" => TokenKind::ForEach,
        _ => TokenKind::Ident(lower.into_boxed_str()),
    }
}

#[cfg(test)]
mod tests;
