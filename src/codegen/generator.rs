use std::collections::HashSet;

use itertools::Itertools;

use crate::{
    analyzer::{analyzer::Analysis, value::TypedValue},
    ast::ast::{NodeId, Program},
};

use super::stmt::gen_statement;

/// Name of the one runtime helper every generated script defines.
pub const SHOW_HELPER: &str = "_minima_show";

/// Renders a Minima program as Python source.
///
/// A generator is consumed by [`PythonGenerator::render_program`], so no
/// buffer or indentation state outlives one generation call.
pub struct PythonGenerator<'a> {
    analysis: Option<&'a Analysis>,
    lines: Vec<String>,
    indentation: usize,
    indent_width: usize,
    emit_entry_guard: bool,
    /// Names bound locally by each enclosing function, innermost last.
    function_locals: Vec<HashSet<String>>,
}

impl Default for PythonGenerator<'_> {
    fn default() -> Self {
        PythonGenerator {
            analysis: None,
            lines: Vec::new(),
            indentation: 0,
            indent_width: 4,
            emit_entry_guard: true,
            function_locals: Vec::new(),
        }
    }
}

impl<'a> PythonGenerator<'a> {
    /// A purely syntactic generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator that consults the analyzer's resolved values.
    pub fn with_analysis(analysis: &'a Analysis) -> Self {
        PythonGenerator {
            analysis: Some(analysis),
            ..Self::default()
        }
    }

    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    pub fn entry_guard(mut self, emit: bool) -> Self {
        self.emit_entry_guard = emit;
        self
    }

    pub fn value_of(&self, id: NodeId) -> Option<&'a TypedValue> {
        self.analysis?.value_of(id)
    }

    pub fn compound_target_of(&self, id: NodeId) -> Option<&'a TypedValue> {
        self.analysis?.compound_target_of(id)
    }

    /// Appends one line at the current indentation.
    pub fn add_line(&mut self, line: impl AsRef<str>) {
        let pad = self.pad(self.indentation);
        self.lines.push(format!("{}{}", pad, line.as_ref()));
    }

    pub fn increase_indent(&mut self) {
        self.indentation += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indentation = self.indentation.saturating_sub(1);
    }

    pub fn function_depth(&self) -> usize {
        self.function_locals.len()
    }

    pub fn enter_function(&mut self, locals: HashSet<String>) {
        self.function_locals.push(locals);
    }

    pub fn exit_function(&mut self) {
        self.function_locals.pop();
    }

    /// Whether `name` is bound by one of the enclosing functions.
    pub fn is_enclosing_local(&self, name: &str) -> bool {
        self.function_locals.iter().any(|locals| locals.contains(name))
    }

    /// Renders the whole script: preamble, program body, then the entry guard.
    pub fn render_program(mut self, program: &Program) -> String {
        let mut sections = vec![self.render_preamble()];

        for stmt in &program.body {
            gen_statement(&mut self, stmt);
        }
        sections.push(std::mem::take(&mut self.lines).join("\n"));

        if self.emit_entry_guard {
            sections.push(self.render_main_stub());
        }

        let mut output = sections.into_iter().filter(|s| !s.is_empty()).join("\n\n");
        output.push('\n');

        tracing::debug!(
            statements = program.body.len(),
            lines = output.lines().count(),
            analysed = self.analysis.is_some(),
            "generated python"
        );

        output
    }

    fn pad(&self, depth: usize) -> String {
        " ".repeat(depth * self.indent_width)
    }

    /// The show helper prints a value in Minima's printable form. With
    /// `emit` false it only returns that text.
    fn render_preamble(&self) -> String {
        let one = self.pad(1);
        let two = self.pad(2);

        [
            format!("def {}(value, emit=True):", SHOW_HELPER),
            format!("{}if value is True:", one),
            format!("{}text = \"YES\"", two),
            format!("{}elif value is False:", one),
            format!("{}text = \"NO\"", two),
            format!("{}elif value is None:", one),
            format!("{}text = \"empty\"", two),
            format!("{}elif isinstance(value, list):", one),
            format!(
                "{}text = \"[\" + \", \".join({}(item, False) for item in value) + \"]\"",
                two, SHOW_HELPER
            ),
            format!("{}else:", one),
            format!("{}text = str(value)", two),
            format!("{}if emit:", one),
            format!("{}print(text)", two),
            format!("{}return text", one),
        ]
        .join("\n")
    }

    fn render_main_stub(&self) -> String {
        format!("if __name__ == \"__main__\":\n{}pass", self.pad(1))
    }
}
