#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).unwrap().kinds()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(name.into())
}

#[test]
fn test_empty_source_is_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
    assert_eq!(kinds("   \n\t "), vec![TokenKind::Eof]);
}

#[test]
fn test_numbers() {
    assert_eq!(
        kinds("1 2.5 .5 1e3 2.5E-2"),
        vec![
            TokenKind::Number(1.0),
            TokenKind::Number(2.5),
            TokenKind::Number(0.5),
            TokenKind::Number(1000.0),
            TokenKind::Number(0.025),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_dotted_path() {
    assert_eq!(
        kinds("variable.target.health"),
        vec![
            ident("variable"),
            TokenKind::Dot,
            ident("target"),
            TokenKind::Dot,
            ident("health"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_identifiers_are_lowercased() {
    assert_eq!(
        kinds("MATH.PI Math.Abs"),
        vec![
            ident("math"),
            TokenKind::Dot,
            ident("pi"),
            ident("math"),
            TokenKind::Dot,
            ident("abs"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_case_insensitive() {
    assert_eq!(
        kinds("TRUE false Break continue RETURN Loop for_each"),
        vec![
            TokenKind::True,
            TokenKind::False,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Return,
            TokenKind::Loop,
            TokenKind::ForEach,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_operators_prefer_longest_match() {
    assert_eq!(
        kinds("== != <= >= && || ?? -> = < > ! ? : - + * / %"),
        vec![
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::DoubleQuestion,
            TokenKind::Arrow,
            TokenKind::Eq,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Bang,
            TokenKind::Question,
            TokenKind::Colon,
            TokenKind::Minus,
            TokenKind::Plus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] , ;"),
        vec![
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_strings_keep_case() {
    assert_eq!(
        kinds("'Hello World' ''"),
        vec![
            TokenKind::Str("Hello World".into()),
            TokenKind::Str("".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    let source = "# leading comment\nt.x = 1; # trailing\n# last";
    assert_eq!(
        kinds(source),
        vec![
            ident("t"),
            TokenKind::Dot,
            ident("x"),
            TokenKind::Eq,
            TokenKind::Number(1.0),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_spans() {
    let tokens = lex("q.a + 10").unwrap();
    let spans: Vec<_> = tokens.iter().map(|t| t.span).collect();
    assert_eq!(
        spans,
        vec![
            Span::new(0, 1),
            Span::new(1, 2),
            Span::new(2, 3),
            Span::new(4, 5),
            Span::new(6, 8),
            Span::new(8, 8),
        ]
    );
}

#[test]
fn test_invalid_character() {
    let err = lex("1 + $").unwrap_err();
    assert_eq!(
        err,
        LexError::InvalidCharacter {
            span: Span::new(4, 5),
            found: '$'
        }
    );
    assert_eq!(err.code(), ErrorCode::E0002);
    assert_eq!(err.to_string(), "invalid character `$`");
}

#[test]
fn test_single_ampersand_is_invalid() {
    assert!(matches!(
        lex("1 & 0"),
        Err(LexError::InvalidCharacter { found: '&', .. })
    ));
}

#[test]
fn test_unterminated_string() {
    let err = lex("'abc").unwrap_err();
    assert_eq!(
        err,
        LexError::UnterminatedString {
            span: Span::new(0, 4)
        }
    );
    let diag = err.to_diagnostic();
    assert_eq!(diag.code, ErrorCode::E0001);
    assert_eq!(diag.notes.len(), 1);
}

proptest! {
    #[test]
    fn prop_decimal_literals_lex_to_their_value(n in 0.0f64..1.0e12) {
        let text = format!("{n}");
        let tokens = lex(&text).unwrap();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(&tokens[0].kind, &TokenKind::Number(text.parse::<f64>().unwrap()));
    }

    #[test]
    fn prop_identifiers_lex_lowercase(name in "[a-zA-Z_][a-zA-Z0-9_]{0,12}") {
        let kind = lex(&name).unwrap()[0].kind.clone();
        let lower = name.to_ascii_lowercase();
        let is_keyword = matches!(
            lower.as_str(),
            "true" | "false" | "break" | "continue" | "return" | "loop" | "for_each"
        );
        if !is_keyword {
            prop_assert_eq!(kind, TokenKind::Ident(lower.into()));
        }
    }
}
