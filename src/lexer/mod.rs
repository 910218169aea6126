//! Lexical analysis module for Minima.
//!
//! This module contains the lexer (tokenizer) that converts source code
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization of source code using regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Negative numeric literals spelled with a leading `~`
//! - Line/column tracking for error reporting
//! - `#` comments and whitespace handling

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
