//! End-to-end pipeline: source text to Python.

use std::time::Instant;

use crate::{
    analyzer::analyzer::{analyze, Analysis},
    ast::ast::Program,
    codegen::generator::PythonGenerator,
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Shown in diagnostics.
    pub file_name: String,
    /// Spaces per nesting level in the generated Python.
    pub indent_width: usize,
    /// Generate code even when the analysis reported errors.
    pub allow_semantic_errors: bool,
    pub emit_entry_guard: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            file_name: String::from("main.mn"),
            indent_width: 4,
            allow_semantic_errors: false,
            emit_entry_guard: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Compilation {
    pub program: Program,
    pub analysis: Analysis,
    pub python: String,
}

/// Tokenizes, parses and analyzes `source`.
///
/// Only lexer and parser failures are errors here; semantic problems are
/// left in the returned [`Analysis`].
pub fn check(source: &str) -> Result<(Program, Analysis), Error> {
    let start = Instant::now();
    let tokens = tokenize(source)?;
    tracing::debug!(tokens = tokens.len(), elapsed = ?start.elapsed(), "tokenized");

    let parse_start = Instant::now();
    let program = parse(tokens)?;
    tracing::debug!(statements = program.body.len(), elapsed = ?parse_start.elapsed(), "parsed");

    let analysis_start = Instant::now();
    let analysis = analyze(&program);
    tracing::debug!(
        errors = analysis.errors.len(),
        elapsed = ?analysis_start.elapsed(),
        "analyzed"
    );

    Ok((program, analysis))
}

/// Renders Python for an analyzed program, whatever its diagnostics.
pub fn generate(program: &Program, analysis: &Analysis, options: &CompileOptions) -> String {
    PythonGenerator::with_analysis(analysis)
        .indent_width(options.indent_width)
        .entry_guard(options.emit_entry_guard)
        .render_program(program)
}

/// Runs the whole pipeline.
///
/// Unless `allow_semantic_errors` is set, a program with semantic errors
/// fails with [`ErrorImpl::SemanticErrors`] positioned at the first one.
pub fn compile(source: &str, options: &CompileOptions) -> Result<Compilation, Error> {
    let (program, analysis) = check(source)?;

    if let Some(first) = analysis.errors.first() {
        if !options.allow_semantic_errors {
            return Err(Error::new(
                ErrorImpl::SemanticErrors {
                    count: analysis.errors.len(),
                },
                first.position(),
            ));
        }
        tracing::warn!(
            file = %options.file_name,
            errors = analysis.errors.len(),
            "generating code despite semantic errors"
        );
    }

    let python = generate(&program, &analysis, options);

    Ok(Compilation {
        program,
        analysis,
        python,
    })
}
