use std::collections::HashSet;

use itertools::Itertools;
use lazy_static::lazy_static;

use crate::{
    analyzer::value::{TypedValue, ValueTag},
    ast::expressions::{BinaryOp, CastTarget, Expr, ExprKind, Literal, UnaryOp},
};

use super::generator::{PythonGenerator, SHOW_HELPER};

lazy_static! {
    /// Python keywords plus the builtins generated code relies on.
    static ref HOST_RESERVED: HashSet<&'static str> = HashSet::from([
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in",
        "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
        "with", "yield", "bool", "float", "int", "str", "print", "isinstance", "list",
    ]);
}

/// Python spelling of a Minima identifier.
///
/// Names Python would read as keywords or needed builtins get a `_mn_`
/// prefix. Minima identifiers never start with `_`, so the result cannot
/// collide with another user name.
pub fn host_identifier(name: &str) -> String {
    if HOST_RESERVED.contains(name) {
        format!("_mn_{}", name)
    } else {
        name.to_string()
    }
}

/// Double-quoted Python string literal for `value`.
pub fn python_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Python float literal. `{:?}` always keeps a fraction or exponent.
pub fn python_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Renders an already generated operand as text, by its resolved tag.
///
/// Values only known at run time go through the show helper, so they print
/// the way `show` would print them.
pub fn stringify(rendered: String, tag: ValueTag) -> String {
    match tag {
        ValueTag::Text => rendered,
        ValueTag::State => format!("(\"YES\" if {} else \"NO\")", rendered),
        ValueTag::Empty => python_string("empty"),
        ValueTag::Integer | ValueTag::Point => format!("str({})", rendered),
        ValueTag::List | ValueTag::Unknown => format!("{}({}, False)", SHOW_HELPER, rendered),
    }
}

fn tag_of(generator: &PythonGenerator, expression: &Expr) -> Option<ValueTag> {
    generator.value_of(expression.id).map(TypedValue::tag)
}

pub fn gen_expression(generator: &PythonGenerator, expression: &Expr) -> String {
    match &expression.kind {
        ExprKind::Literal(literal) => gen_literal(literal),
        ExprKind::Identifier(name) => host_identifier(name),
        ExprKind::Call {
            callee, arguments, ..
        } => format!(
            "{}({})",
            host_identifier(callee),
            arguments
                .iter()
                .map(|argument| gen_expression(generator, argument))
                .join(", ")
        ),
        ExprKind::List(items) => format!(
            "[{}]",
            items.iter().map(|item| gen_expression(generator, item)).join(", ")
        ),
        ExprKind::Binary {
            left,
            operator,
            right,
        } => gen_binary(generator, expression, *operator, left, right),
        ExprKind::Unary { operator, operand } => match operator {
            UnaryOp::Not => format!("(not {})", gen_condition(generator, operand)),
            UnaryOp::Negate => format!("(-{})", gen_expression(generator, operand)),
        },
        ExprKind::Cast { target, operand } => gen_cast(generator, *target, operand),
        ExprKind::Grouping(inner) => format!("({})", gen_expression(generator, inner)),
    }
}

fn gen_literal(literal: &Literal) -> String {
    match literal {
        Literal::Integer(value) => value.to_string(),
        Literal::Point(value) => python_float(*value),
        Literal::State(true) => String::from("True"),
        Literal::State(false) => String::from("False"),
        Literal::Text(value) => python_string(value),
        Literal::Empty => String::from("None"),
    }
}

fn gen_binary(
    generator: &PythonGenerator,
    expression: &Expr,
    operator: BinaryOp,
    left: &Expr,
    right: &Expr,
) -> String {
    let left_tag = tag_of(generator, left);
    let right_tag = tag_of(generator, right);

    let concatenates = operator == BinaryOp::Add
        && (matches!(generator.value_of(expression.id), Some(TypedValue::Text(_)))
            || matches!(
                (left_tag, right_tag),
                (Some(ValueTag::Text), Some(ValueTag::Unknown))
                    | (Some(ValueTag::Unknown), Some(ValueTag::Text))
            ));

    if concatenates {
        return format!(
            "({} + {})",
            gen_text_operand(generator, left, left_tag),
            gen_text_operand(generator, right, right_tag)
        );
    }

    match operator {
        // Both sides are always evaluated, as in the analyzer.
        BinaryOp::Or => format!(
            "(bool({}) | bool({}))",
            gen_condition(generator, left),
            gen_condition(generator, right)
        ),
        BinaryOp::And => format!(
            "(bool({}) & bool({}))",
            gen_condition(generator, left),
            gen_condition(generator, right)
        ),
        BinaryOp::Less | BinaryOp::LessEquals | BinaryOp::Greater | BinaryOp::GreaterEquals
            if never_ordered(left_tag, right_tag) =>
        {
            // Still evaluates both sides, then yields NO.
            format!(
                "({}, {}, False)[-1]",
                gen_expression(generator, left),
                gen_expression(generator, right)
            )
        }
        _ if operator.is_comparison() => format!(
            "({} {} {})",
            gen_expression(generator, left),
            operator.symbol(),
            gen_expression(generator, right)
        ),
        _ => format!(
            "({} {} {})",
            gen_numeric_operand(generator, left, left_tag),
            operator.symbol(),
            gen_numeric_operand(generator, right, right_tag)
        ),
    }
}

/// Only text pairs and number-or-state pairs have an order.
fn never_ordered(left: Option<ValueTag>, right: Option<ValueTag>) -> bool {
    let numeric = |tag: ValueTag| matches!(tag, ValueTag::Integer | ValueTag::Point | ValueTag::State);

    match (left, right) {
        (Some(ValueTag::Unknown), _) | (_, Some(ValueTag::Unknown)) | (None, _) | (_, None) => false,
        (Some(ValueTag::Text), Some(ValueTag::Text)) => false,
        (Some(left), Some(right)) => !(numeric(left) && numeric(right)),
    }
}

/// `empty` counts as 0 in arithmetic.
fn gen_numeric_operand(generator: &PythonGenerator, operand: &Expr, tag: Option<ValueTag>) -> String {
    match tag {
        Some(ValueTag::Empty) => String::from("0"),
        _ => gen_expression(generator, operand),
    }
}

/// Lists are falsy, even non-empty ones.
fn gen_condition(generator: &PythonGenerator, operand: &Expr) -> String {
    let rendered = gen_expression(generator, operand);
    match tag_of(generator, operand) {
        Some(ValueTag::List) => format!("({}, False)[-1]", rendered),
        _ => rendered,
    }
}

fn gen_text_operand(generator: &PythonGenerator, operand: &Expr, tag: Option<ValueTag>) -> String {
    let rendered = gen_expression(generator, operand);
    match tag {
        Some(tag) => stringify(rendered, tag),
        None => rendered,
    }
}

fn gen_cast(generator: &PythonGenerator, target: CastTarget, operand: &Expr) -> String {
    let rendered = gen_expression(generator, operand);
    let tag = tag_of(generator, operand);

    match (target, tag) {
        // Lists and `empty` survive every cast unchanged.
        (_, Some(ValueTag::List | ValueTag::Empty)) => rendered,
        (CastTarget::Text, Some(tag @ (ValueTag::State | ValueTag::Unknown))) => stringify(rendered, tag),
        (CastTarget::Integer, _) => format!("int({})", rendered),
        (CastTarget::Point, _) => format!("float({})", rendered),
        (CastTarget::Text, _) => format!("str({})", rendered),
        (CastTarget::State, _) => format!("bool({})", rendered),
    }
}
