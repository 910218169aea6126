//! Python code generation for Minima programs.
//!
//! This module renders a parsed program into a single self-contained Python
//! script:
//!
//! - `generator`: output buffer, indentation counter, preamble and entry guard
//! - `stmt`: statement rendering, including function bodies and scope declarations
//! - `expr`: expression rendering, literals and identifier mangling
//!
//! When an [`Analysis`](crate::analyzer::analyzer::Analysis) is attached, the
//! resolved value of each node steers text concatenation and casts.

pub mod expr;
pub mod generator;
pub mod stmt;
