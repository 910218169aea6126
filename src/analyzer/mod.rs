//! Semantic analysis for Minima.
//!
//! - `symbol_table`: arena of nested variable scopes plus the global function namespace
//! - `value`: typed values and the coercion rules between them
//! - `analyzer`: the post-order pass that reduces expressions and records diagnostics
//!
//! The pass never stops at an error. Each problem becomes one
//! `SemanticError` and the offending expression reduces to `Unknown`.

pub mod analyzer;
pub mod symbol_table;
pub mod value;
