use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A fatal front-end error. Lexing and parsing stop at the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::InvalidIdentifier { .. } => "InvalidIdentifier",
            ErrorImpl::InvalidInteger { .. } => "InvalidInteger",
            ErrorImpl::InvalidPoint { .. } => "InvalidPoint",
            ErrorImpl::UnterminatedText => "UnterminatedText",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::SemanticErrors { .. } => "SemanticErrors",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::InvalidIdentifier { identifier, reason } => ErrorTip::Suggestion(format!(
                "Invalid identifier `{}`: {}",
                identifier, reason
            )),
            ErrorImpl::InvalidInteger { literal } => ErrorTip::Suggestion(format!(
                "Integer literal `{}` exceeds the maximum of 9 digits",
                literal
            )),
            ErrorImpl::InvalidPoint { literal } => ErrorTip::Suggestion(format!(
                "Point literal `{}` has more than 9 digits before or after the decimal point",
                literal
            )),
            ErrorImpl::UnterminatedText => {
                ErrorTip::Suggestion(String::from("Text literal is missing its closing `\"`"))
            }
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::SemanticErrors { count } => ErrorTip::Suggestion(format!(
                "{} semantic error(s) must be fixed before code generation",
                count
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.internal_error, self.position)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("invalid identifier {identifier:?}: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },
    #[error("integer literal {literal:?} is too long")]
    InvalidInteger { literal: String },
    #[error("point literal {literal:?} is too long")]
    InvalidPoint { literal: String },
    #[error("unterminated text literal")]
    UnterminatedText,
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("semantic analysis reported {count} error(s)")]
    SemanticErrors { count: usize },
}

/// Classification of a recoverable semantic diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticErrorKind {
    DuplicateDeclaration,
    UndeclaredReference,
    ImmutableReassignment,
    TypeMismatch,
    ArityMismatch,
    UndefinedFunction,
    CastFailure,
    UnsupportedOperator,
    EvaluationFailure,
    MisplacedThrow,
}

impl Display for SemanticErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A recoverable diagnostic recorded by the semantic analyzer.
///
/// These never abort a pass; the analyzer keeps an ordered list of them.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (line {line}, column {column})")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, message: impl Into<String>, position: Position) -> Self {
        SemanticError {
            kind,
            message: message.into(),
            line: position.line(),
            column: position.column(),
        }
    }

    pub fn position(&self) -> Position {
        Position(self.line, self.column)
    }
}
