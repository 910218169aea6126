//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers, points and their `~` negative forms)
//! - Text literals with escape sequences
//! - Operators and punctuation
//! - Comments
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};
use crate::{errors::errors::ErrorImpl, Position};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().iter().map(|t| t.kind).collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("var fixed func show throw integer point text state empty"),
        vec![
            TokenKind::Var,
            TokenKind::Fixed,
            TokenKind::Func,
            TokenKind::Show,
            TokenKind::Throw,
            TokenKind::Integer,
            TokenKind::Point,
            TokenKind::Text,
            TokenKind::State,
            TokenKind::Empty,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo bar_baz myVar123_ABC").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "bar_baz");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "myVar123_ABC");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_state_literals() {
    let tokens = tokenize("YES NO").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::StateLiteral);
    assert_eq!(tokens[0].value, "YES");
    assert_eq!(tokens[1].kind, TokenKind::StateLiteral);
    assert_eq!(tokens[1].value, "NO");
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 3.14 ~7 ~2.5 0").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::IntegerLiteral);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::PointLiteral);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::NegIntegerLiteral);
    assert_eq!(tokens[2].value, "~7");
    assert_eq!(tokens[3].kind, TokenKind::NegPointLiteral);
    assert_eq!(tokens[3].value, "~2.5");
    assert_eq!(tokens[4].kind, TokenKind::IntegerLiteral);
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tilde_before_identifier_is_an_operator() {
    assert_eq!(
        kinds("~x ~(1)"),
        vec![
            TokenKind::Tilde,
            TokenKind::Identifier,
            TokenKind::Tilde,
            TokenKind::OpenParen,
            TokenKind::IntegerLiteral,
            TokenKind::CloseParen,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_text() {
    let tokens = tokenize(r#""hello" "multiple words" """#).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::TextLiteral);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "multiple words");
    assert_eq!(tokens[2].value, "");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_text_escapes() {
    let tokens = tokenize(r#""line\nbreak" "tab\there" "back\\slash" "say \"hi\"""#).unwrap();

    assert_eq!(tokens[0].value, "line\nbreak");
    assert_eq!(tokens[1].value, "tab\there");
    assert_eq!(tokens[2].value, "back\\slash");
    assert_eq!(tokens[3].value, "say \"hi\"");
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / % == != < > <= >= = && || ! ~"),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Assignment,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::Tilde,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_compound_assignment() {
    assert_eq!(
        kinds("+= -= *= /= %="),
        vec![
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::StarEquals,
            TokenKind::SlashEquals,
            TokenKind::PercentEquals,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] , ;"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let tokens = tokenize("var x = 5; # trailing comment\n# whole line\nshow x;").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Var);
    assert_eq!(tokens[4].kind, TokenKind::Semicolon);
    assert_eq!(tokens[5].kind, TokenKind::Show);
    assert_eq!(tokens[6].value, "x");
    assert_eq!(tokens[8].kind, TokenKind::EOF);
}

#[test]
fn test_token_positions() {
    let tokens = tokenize("var x = 5;\n  show x;").unwrap();

    assert_eq!(tokens[0].span.start, Position(1, 1));
    assert_eq!(tokens[0].span.end, Position(1, 4));
    assert_eq!(tokens[1].span.start, Position(1, 5));
    assert_eq!(tokens[5].kind, TokenKind::Show);
    assert_eq!(tokens[5].span.start, Position(2, 3));
    assert_eq!(tokens[6].span.start, Position(2, 8));
}

#[test]
fn test_tokenize_simple_program() {
    let tokens = tokenize("var x = 42;").unwrap();

    assert_eq!(tokens.len(), 6); // var, x, =, 42, ;, EOF
    assert_eq!(tokens[0].kind, TokenKind::Var);
    assert_eq!(tokens[1].value, "x");
    assert_eq!(tokens[2].kind, TokenKind::Assignment);
    assert_eq!(tokens[3].value, "42");
    assert_eq!(tokens[4].kind, TokenKind::Semicolon);
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_unrecognized_token() {
    let error = tokenize("var x = @;").unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(*error.get_position(), Position(1, 9));
}

#[test]
fn test_identifier_must_start_lowercase() {
    let error = tokenize("var Arg = 2;").unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidIdentifier");

    let error = tokenize("var _start = 3;").unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidIdentifier");
}

#[test]
fn test_identifier_length_limit() {
    assert!(tokenize("var abcdefghijklmnopqrst = 7;").is_ok());

    let error = tokenize("var abcdefghijklmnopqrstuvwxyz = 7;").unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::InvalidIdentifier { .. }));
    assert_eq!(*error.get_position(), Position(1, 5));
}

#[test]
fn test_integer_digit_limit() {
    assert!(tokenize("123456789").is_ok());
    assert!(tokenize("000123456789").is_ok());

    let error = tokenize("1234567890").unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidInteger");

    let error = tokenize("~1234567890").unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidInteger");
}

#[test]
fn test_point_digit_limit() {
    assert!(tokenize("123456789.123456789").is_ok());

    let error = tokenize("1.1234567890").unwrap_err();
    assert_eq!(error.get_error_name(), "InvalidPoint");
}

#[test]
fn test_unterminated_text() {
    let error = tokenize("show \"oops;").unwrap_err();

    assert_eq!(error.get_error_name(), "UnterminatedText");
    assert_eq!(*error.get_position(), Position(1, 6));
}

#[test]
fn test_tokenize_mixed_expression() {
    assert_eq!(
        kinds("x + 5 * (y - 3)"),
        vec![
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::IntegerLiteral,
            TokenKind::Star,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Dash,
            TokenKind::IntegerLiteral,
            TokenKind::CloseParen,
            TokenKind::EOF,
        ]
    );
}
