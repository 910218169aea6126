use std::collections::HashSet;

use itertools::Itertools;

use crate::{
    analyzer::value::ValueTag,
    ast::statements::{AssignOp, AssignmentStmt, FnDeclStmt, Stmt},
};

use super::{
    expr::{gen_expression, host_identifier, stringify},
    generator::{PythonGenerator, SHOW_HELPER},
};

pub fn gen_statement(generator: &mut PythonGenerator, statement: &Stmt) {
    match statement {
        Stmt::VarDecl(decl) => {
            for declarator in &decl.declarators {
                let value = match &declarator.assigned_value {
                    Some(expr) => gen_expression(generator, expr),
                    None => String::from("None"),
                };
                generator.add_line(format!(
                    "{} = {}",
                    host_identifier(&declarator.identifier),
                    value
                ));
            }
        }
        Stmt::Assignment(assignment) => gen_assignment(generator, assignment),
        Stmt::FnDecl(func) => gen_fn_decl(generator, func),
        Stmt::Show(show) => {
            let value = gen_expression(generator, &show.expression);
            generator.add_line(format!("{}({})", SHOW_HELPER, value));
        }
        Stmt::Throw(throw) => {
            let value = gen_expression(generator, &throw.expression);
            generator.add_line(format!("return {}", value));
        }
        Stmt::Expression(expression) => {
            let value = gen_expression(generator, &expression.expression);
            generator.add_line(value);
        }
    }
}

fn gen_assignment(generator: &mut PythonGenerator, assignment: &AssignmentStmt) {
    let name = host_identifier(&assignment.assignee);
    let value = gen_expression(generator, &assignment.value);

    let Some(operator) = assignment.operator.binary_op() else {
        generator.add_line(format!("{} = {}", name, value));
        return;
    };

    let target = generator.compound_target_of(assignment.value.id).map(|v| v.tag());
    let operand = generator.value_of(assignment.value.id).map(|v| v.tag());

    if assignment.operator == AssignOp::AddAssign {
        match (target, operand) {
            (Some(ValueTag::Text), Some(tag)) => {
                generator.add_line(format!("{} += {}", name, stringify(value, tag)));
                return;
            }
            (Some(tag), Some(ValueTag::Text)) => {
                let current = stringify(name.clone(), tag);
                generator.add_line(format!("{} = ({} + {})", name, current, value));
                return;
            }
            _ => {}
        }
    }

    let value = match operand {
        Some(ValueTag::Empty) => String::from("0"),
        _ => value,
    };

    match target {
        // Rebinding keeps a shared list from being extended in place.
        Some(tag @ (ValueTag::Empty | ValueTag::List | ValueTag::Unknown)) => {
            let current = if tag == ValueTag::Empty { String::from("0") } else { name.clone() };
            generator.add_line(format!(
                "{} = ({} {} {})",
                name,
                current,
                operator.symbol(),
                value
            ));
        }
        _ => generator.add_line(format!("{} {} {}", name, assignment.operator.symbol(), value)),
    }
}

fn gen_fn_decl(generator: &mut PythonGenerator, func: &FnDeclStmt) {
    // A nested `def` still has to bind the module-level name.
    if generator.function_depth() > 0 {
        generator.add_line(format!("global {}", host_identifier(&func.name)));
    }

    generator.add_line(format!(
        "def {}({}):",
        host_identifier(&func.name),
        func.parameters
            .iter()
            .map(|param| host_identifier(&param.name))
            .join(", ")
    ));
    generator.increase_indent();

    let mut locals: HashSet<String> = func.parameters.iter().map(|param| param.name.clone()).collect();
    for stmt in &func.body {
        if let Stmt::VarDecl(decl) = stmt {
            locals.extend(decl.declarators.iter().map(|d| d.identifier.clone()));
        }
    }

    // Assignments to names bound outside this body reach the outer binding.
    let (enclosing, global): (Vec<&String>, Vec<&String>) = func
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Assignment(assignment) => Some(&assignment.assignee),
            _ => None,
        })
        .filter(|name| !locals.contains(name.as_str()))
        .unique()
        .partition(|name| generator.is_enclosing_local(name));

    if !global.is_empty() {
        generator.add_line(format!(
            "global {}",
            global.iter().map(|name| host_identifier(name)).join(", ")
        ));
    }
    if !enclosing.is_empty() {
        generator.add_line(format!(
            "nonlocal {}",
            enclosing.iter().map(|name| host_identifier(name)).join(", ")
        ));
    }

    tracing::trace!(name = %func.name, locals = locals.len(), "generating function");
    generator.enter_function(locals);

    if func.body.is_empty() {
        generator.add_line("pass");
    }
    for stmt in &func.body {
        gen_statement(generator, stmt);
    }

    generator.exit_function();
    generator.decrease_indent();
}
