use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("fixed", TokenKind::Fixed);
        map.insert("func", TokenKind::Func);
        map.insert("show", TokenKind::Show);
        map.insert("throw", TokenKind::Throw);
        map.insert("integer", TokenKind::Integer);
        map.insert("point", TokenKind::Point);
        map.insert("text", TokenKind::Text);
        map.insert("state", TokenKind::State);
        map.insert("empty", TokenKind::Empty);
        map.insert("YES", TokenKind::StateLiteral);
        map.insert("NO", TokenKind::StateLiteral);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,

    // Literals
    TextLiteral,
    IntegerLiteral,
    NegIntegerLiteral,
    PointLiteral,
    NegPointLiteral,
    StateLiteral,
    Empty,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=
    Tilde,      // ~

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Semicolon,
    Comma,

    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Var,
    Fixed,
    Func,
    Show,
    Throw,
    Integer,
    Point,
    Text,
    State,
}

impl TokenKind {
    /// Whether this kind names a cast target (`integer`, `point`, `text`, `state`).
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Integer | TokenKind::Point | TokenKind::Text | TokenKind::State
        )
    }

    pub fn is_assignment_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Assignment
                | TokenKind::PlusEquals
                | TokenKind::MinusEquals
                | TokenKind::StarEquals
                | TokenKind::SlashEquals
                | TokenKind::PercentEquals
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    pub fn debug(&self) {
        if self.is_one_of_many(&[
            TokenKind::TextLiteral,
            TokenKind::Identifier,
            TokenKind::IntegerLiteral,
            TokenKind::NegIntegerLiteral,
            TokenKind::PointLiteral,
            TokenKind::NegPointLiteral,
            TokenKind::StateLiteral,
        ]) {
            tracing::trace!(kind = %self.kind, value = %self.value, "token");
        } else {
            tracing::trace!(kind = %self.kind, "token");
        }
    }
}
