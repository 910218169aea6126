//! Error types and error handling for the front end.
//!
//! This module defines the error types used throughout compilation:
//!
//! - Fatal lexer/parser errors with source position information
//! - Recoverable semantic diagnostics collected by the analyzer
//! - Error names and suggestions used by the diagnostic renderer

pub mod errors;
