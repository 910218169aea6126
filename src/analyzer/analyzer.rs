use std::collections::HashMap;

use crate::{
    ast::{
        ast::{NodeId, Program},
        expressions::{Expr, ExprKind, Literal},
        statements::{AssignmentStmt, FnDeclStmt, Stmt, VarDeclStmt},
    },
    errors::errors::{SemanticError, SemanticErrorKind},
    Position,
};

use super::{
    symbol_table::SymbolTable,
    value::{cast, evaluate_binary, evaluate_unary, TypedValue, ValueError},
};

/// Everything one analysis run leaves behind.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Diagnostics in the order they were found.
    pub errors: Vec<SemanticError>,
    /// Global and function scopes as they stood at the end of the run.
    pub symbols: SymbolTable,
    /// Reduced value of every expression node.
    pub values: HashMap<NodeId, TypedValue>,
    /// Value an assignee held just before a compound assignment, keyed by
    /// the right-hand expression.
    pub compound_targets: HashMap<NodeId, TypedValue>,
}

impl Analysis {
    /// A run with no diagnostics is semantically accepted.
    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn value_of(&self, id: NodeId) -> Option<&TypedValue> {
        self.values.get(&id)
    }

    pub fn compound_target_of(&self, id: NodeId) -> Option<&TypedValue> {
        self.compound_targets.get(&id)
    }
}

#[derive(Debug, Default)]
pub struct Analyzer {
    pub symbols: SymbolTable,
    pub errors: Vec<SemanticError>,
    pub values: HashMap<NodeId, TypedValue>,
    pub compound_targets: HashMap<NodeId, TypedValue>,
    function_depth: usize,
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer::default()
    }

    pub fn report(&mut self, kind: SemanticErrorKind, message: impl Into<String>, position: Position) {
        let error = SemanticError::new(kind, message, position);
        tracing::debug!(kind = %error.kind, %position, message = %error.message, "semantic error");
        self.errors.push(error);
    }

    /// Records a coercion failure and hands back the placeholder value.
    pub fn report_value_error(&mut self, error: ValueError, position: Position) -> TypedValue {
        self.report(error.kind(), error.to_string(), position);
        TypedValue::Unknown
    }

    pub fn finish(self) -> Analysis {
        Analysis {
            errors: self.errors,
            symbols: self.symbols,
            values: self.values,
            compound_targets: self.compound_targets,
        }
    }

    /// Declares a variable or parameter in the current scope.
    ///
    /// Returns `false` (after reporting) when the name is taken.
    fn declare(&mut self, name: &str, fixed: bool, position: Position, duplicate: String) -> bool {
        if self.symbols.lookup_function(name).is_some() {
            self.report(
                SemanticErrorKind::DuplicateDeclaration,
                format!("'{}' is already defined as a function", name),
                position,
            );
            return false;
        }

        if !self.symbols.define_variable(name, fixed, position) {
            self.report(SemanticErrorKind::DuplicateDeclaration, duplicate, position);
            return false;
        }

        true
    }

    fn assign(&mut self, name: &str, value: TypedValue) {
        if let Some(symbol) = self.symbols.lookup_variable_mut(name) {
            symbol.value = value;
        }
    }
}

/// Runs the semantic pass over a whole program.
pub fn analyze(program: &Program) -> Analysis {
    let mut analyzer = Analyzer::new();

    for stmt in &program.body {
        analyze_stmt(&mut analyzer, stmt);
    }

    tracing::debug!(
        errors = analyzer.errors.len(),
        scopes = analyzer.symbols.scopes().len(),
        "semantic analysis finished"
    );

    analyzer.finish()
}

pub fn analyze_stmt(analyzer: &mut Analyzer, stmt: &Stmt) {
    match stmt {
        Stmt::VarDecl(decl) => analyze_var_decl(analyzer, decl),
        Stmt::Assignment(assignment) => analyze_assignment(analyzer, assignment),
        Stmt::FnDecl(func) => analyze_fn_decl(analyzer, func),
        Stmt::Show(show) => {
            analyze_expr(analyzer, &show.expression);
        }
        Stmt::Throw(throw) => {
            analyze_expr(analyzer, &throw.expression);
            if analyzer.function_depth == 0 {
                analyzer.report(
                    SemanticErrorKind::MisplacedThrow,
                    "`throw` is only allowed inside a function body",
                    throw.span.start,
                );
            }
        }
        Stmt::Expression(expression) => {
            analyze_expr(analyzer, &expression.expression);
        }
    }
}

fn analyze_var_decl(analyzer: &mut Analyzer, decl: &VarDeclStmt) {
    for declarator in &decl.declarators {
        let name = &declarator.identifier;
        let position = declarator.span.start;

        // The initializer is reduced before the name exists, so `var x = x;` is an error.
        let value = match &declarator.assigned_value {
            Some(expr) => analyze_expr(analyzer, expr),
            None => TypedValue::Empty,
        };

        let duplicate = if decl.is_fixed {
            format!("Fixed variable '{}' is already declared in this scope", name)
        } else {
            format!("Variable '{}' is already declared in this scope", name)
        };

        if analyzer.declare(name, decl.is_fixed, position, duplicate) {
            tracing::debug!(%name, fixed = decl.is_fixed, %value, "declared variable");
            analyzer.assign(name, value);
        }
    }
}

fn analyze_assignment(analyzer: &mut Analyzer, assignment: &AssignmentStmt) {
    let value = analyze_expr(analyzer, &assignment.value);
    let name = &assignment.assignee;
    let position = assignment.assignee_span.start;

    let Some(symbol) = analyzer.symbols.lookup_variable(name) else {
        analyzer.report(
            SemanticErrorKind::UndeclaredReference,
            format!("Variable '{}' is not declared", name),
            position,
        );
        return;
    };

    if symbol.fixed {
        analyzer.report(
            SemanticErrorKind::ImmutableReassignment,
            format!("Fixed variable '{}' cannot be reassigned", name),
            position,
        );
        return;
    }

    let value = match assignment.operator.binary_op() {
        None => value,
        Some(operator) => {
            let previous = symbol.value.clone();
            let combined = match evaluate_binary(operator, &previous, &value) {
                Ok(combined) => combined,
                Err(error) => analyzer.report_value_error(error, assignment.value.span.start),
            };
            analyzer.compound_targets.insert(assignment.value.id, previous);
            combined
        }
    };

    tracing::debug!(%name, %value, "reassigned variable");
    analyzer.assign(name, value);
}

fn analyze_fn_decl(analyzer: &mut Analyzer, func: &FnDeclStmt) {
    let name = &func.name;
    let position = func.name_span.start;
    let params: Vec<String> = func.parameters.iter().map(|param| param.name.clone()).collect();

    if analyzer.symbols.lookup_global_variable(name).is_some() {
        analyzer.report(
            SemanticErrorKind::DuplicateDeclaration,
            format!("Function '{}' conflicts with the global variable '{}'", name, name),
            position,
        );
    } else if analyzer.symbols.lookup_variable(name).is_some() {
        // Nested functions still bind the module-level name in the generated code.
        analyzer.report(
            SemanticErrorKind::DuplicateDeclaration,
            format!("Function '{}' conflicts with the variable '{}' in an enclosing scope", name, name),
            position,
        );
    } else if !analyzer.symbols.define_function(name, params, position) {
        analyzer.report(
            SemanticErrorKind::DuplicateDeclaration,
            format!("Function '{}' is already defined", name),
            position,
        );
    } else {
        tracing::debug!(%name, arity = func.parameters.len(), "registered function");
    }

    // The body is analyzed even when registration failed.
    analyzer.symbols.enter_scope();
    analyzer.function_depth += 1;

    for param in &func.parameters {
        let duplicate = format!(
            "Parameter '{}' is already declared in function '{}'",
            param.name, name
        );
        if analyzer.declare(&param.name, false, param.span.start, duplicate) {
            analyzer.assign(&param.name, TypedValue::Unknown);
        }
    }

    for stmt in &func.body {
        analyze_stmt(analyzer, stmt);
    }

    analyzer.function_depth -= 1;
    analyzer.symbols.exit_scope();
}

/// Reduces an expression to a value, children first, and remembers the result.
pub fn analyze_expr(analyzer: &mut Analyzer, expr: &Expr) -> TypedValue {
    let value = reduce_expr(analyzer, expr);
    analyzer.values.insert(expr.id, value.clone());
    value
}

fn reduce_expr(analyzer: &mut Analyzer, expr: &Expr) -> TypedValue {
    match &expr.kind {
        ExprKind::Literal(literal) => match literal {
            Literal::Integer(value) => TypedValue::Integer(*value),
            Literal::Point(value) => TypedValue::Point(*value),
            Literal::State(value) => TypedValue::State(*value),
            Literal::Text(value) => TypedValue::Text(value.clone()),
            Literal::Empty => TypedValue::Empty,
        },
        ExprKind::Identifier(name) => match analyzer.symbols.lookup_variable(name) {
            // Values are copied out, so later reassignment leaves this result alone.
            Some(symbol) => symbol.value.clone(),
            None => {
                analyzer.report(
                    SemanticErrorKind::UndeclaredReference,
                    format!("Variable '{}' is not declared", name),
                    expr.span.start,
                );
                TypedValue::Unknown
            }
        },
        ExprKind::Call {
            callee,
            callee_span,
            arguments,
        } => {
            for argument in arguments {
                analyze_expr(analyzer, argument);
            }

            let expected = analyzer.symbols.lookup_function(callee).map(|func| func.arity());
            match expected {
                None => analyzer.report(
                    SemanticErrorKind::UndefinedFunction,
                    format!("Function '{}' is not defined", callee),
                    callee_span.start,
                ),
                Some(expected) if expected != arguments.len() => analyzer.report(
                    SemanticErrorKind::ArityMismatch,
                    format!(
                        "Function '{}' expects {} arguments, got {}",
                        callee,
                        expected,
                        arguments.len()
                    ),
                    callee_span.start,
                ),
                Some(_) => {}
            }

            TypedValue::Unknown
        }
        ExprKind::List(items) => TypedValue::List(
            items
                .iter()
                .map(|item| analyze_expr(analyzer, item))
                .collect(),
        ),
        ExprKind::Binary {
            left,
            operator,
            right,
        } => {
            let left_value = analyze_expr(analyzer, left);
            let right_value = analyze_expr(analyzer, right);

            match evaluate_binary(*operator, &left_value, &right_value) {
                Ok(value) => value,
                Err(error) => analyzer.report_value_error(error, expr.span.start),
            }
        }
        ExprKind::Unary { operator, operand } => {
            let operand_value = analyze_expr(analyzer, operand);

            match evaluate_unary(*operator, &operand_value) {
                Ok(value) => value,
                Err(error) => analyzer.report_value_error(error, expr.span.start),
            }
        }
        ExprKind::Cast { target, operand } => {
            let operand_value = analyze_expr(analyzer, operand);

            match cast(*target, &operand_value) {
                Ok(value) => value,
                Err(error) => analyzer.report_value_error(error, expr.span.start),
            }
        }
        ExprKind::Grouping(inner) => analyze_expr(analyzer, inner),
    }
}
