//! Typed values and the coercion rules that combine them.
//!
//! Everything here is a pure function over [`TypedValue`]s. Failures come
//! back as [`ValueError`]; the analyzer decides how to report them.

use std::{cmp::Ordering, fmt::Display};

use itertools::Itertools;
use thiserror::Error;

use crate::{
    ast::expressions::{BinaryOp, CastTarget, UnaryOp},
    errors::errors::SemanticErrorKind,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Integer(i64),
    Point(f64),
    State(bool),
    Text(String),
    List(Vec<TypedValue>),
    Empty,
    /// Placeholder for a value that could not be determined. Not a runtime type.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Integer,
    Point,
    State,
    Text,
    List,
    Empty,
    Unknown,
}

impl Display for ValueTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueTag::Integer => "integer",
            ValueTag::Point => "point",
            ValueTag::State => "state",
            ValueTag::Text => "text",
            ValueTag::List => "list",
            ValueTag::Empty => "empty",
            ValueTag::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

impl TypedValue {
    pub fn tag(&self) -> ValueTag {
        match self {
            TypedValue::Integer(_) => ValueTag::Integer,
            TypedValue::Point(_) => ValueTag::Point,
            TypedValue::State(_) => ValueTag::State,
            TypedValue::Text(_) => ValueTag::Text,
            TypedValue::List(_) => ValueTag::List,
            TypedValue::Empty => ValueTag::Empty,
            TypedValue::Unknown => ValueTag::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypedValue::Unknown)
    }

    fn is_numeric(&self) -> bool {
        matches!(self, TypedValue::Integer(_) | TypedValue::Point(_))
    }
}

/// Printable form, as `show` would print it.
impl Display for TypedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypedValue::Integer(value) => write!(f, "{}", value),
            TypedValue::Point(value) => write!(f, "{}", printable_point(*value)),
            TypedValue::State(true) => write!(f, "YES"),
            TypedValue::State(false) => write!(f, "NO"),
            TypedValue::Text(value) => write!(f, "{}", value),
            TypedValue::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            TypedValue::Empty => write!(f, "empty"),
            TypedValue::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("`+` not allowed between a list and a non-list")]
    ListConcatenation,
    #[error("`{operator}` not allowed on {tag} type")]
    TypeMismatch { operator: String, tag: ValueTag },
    #[error("Unsupported operator `{operator}` for {tag} values")]
    UnsupportedOperator { operator: String, tag: ValueTag },
    #[error("{message}")]
    EvaluationFailure { message: String },
    #[error("Cannot cast {tag} value `{value}` to {target}")]
    CastFailure {
        value: String,
        tag: ValueTag,
        target: CastTarget,
    },
}

impl ValueError {
    pub fn kind(&self) -> SemanticErrorKind {
        match self {
            ValueError::ListConcatenation | ValueError::TypeMismatch { .. } => {
                SemanticErrorKind::TypeMismatch
            }
            ValueError::UnsupportedOperator { .. } => SemanticErrorKind::UnsupportedOperator,
            ValueError::EvaluationFailure { .. } => SemanticErrorKind::EvaluationFailure,
            ValueError::CastFailure { .. } => SemanticErrorKind::CastFailure,
        }
    }

    fn evaluation(message: impl Into<String>) -> Self {
        ValueError::EvaluationFailure {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericTarget {
    Integer,
    Point,
}

/// A value on the numeric path of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Point(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(value) => value as f64,
            Number::Point(value) => value,
        }
    }
}

/// Shortest round-trip spelling of a point value, switching to exponent
/// form below `1e-4` and from `1e16` up (`1e+16`, `1.5e-05`).
pub fn printable_point(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() {
        return value.to_string();
    }

    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let shortest = format!("{:e}", value);
        return match shortest.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or_default();
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            }
            None => shortest,
        };
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Numeric view of a value.
///
/// `State` becomes `1`/`0` in the requested mode. `Integer` and `Point`
/// pass through untouched; widening is the caller's job. Text, lists,
/// `empty` and `unknown` read as zero.
pub fn to_numeric(value: &TypedValue, target: NumericTarget) -> Number {
    match (value, target) {
        (TypedValue::Integer(value), _) => Number::Integer(*value),
        (TypedValue::Point(value), _) => Number::Point(*value),
        (TypedValue::State(state), NumericTarget::Integer) => Number::Integer(i64::from(*state)),
        (TypedValue::State(state), NumericTarget::Point) => {
            Number::Point(if *state { 1.0 } else { 0.0 })
        }
        (
            TypedValue::Text(_) | TypedValue::List(_) | TypedValue::Empty | TypedValue::Unknown,
            NumericTarget::Integer,
        ) => Number::Integer(0),
        (
            TypedValue::Text(_) | TypedValue::List(_) | TypedValue::Empty | TypedValue::Unknown,
            NumericTarget::Point,
        ) => Number::Point(0.0),
    }
}

/// Truthiness: states are themselves, numbers are nonzero, text is non-empty.
pub fn to_bool(value: &TypedValue) -> bool {
    match value {
        TypedValue::State(state) => *state,
        TypedValue::Integer(value) => *value != 0,
        TypedValue::Point(value) => *value != 0.0,
        TypedValue::Text(value) => !value.is_empty(),
        TypedValue::List(_) | TypedValue::Empty | TypedValue::Unknown => false,
    }
}

/// Combines two reduced operands.
///
/// Both operands are always already evaluated, so `||` and `&&` never
/// short-circuit. An `Unknown` operand yields `Unknown` without a new error.
pub fn evaluate_binary(
    operator: BinaryOp,
    left: &TypedValue,
    right: &TypedValue,
) -> Result<TypedValue, ValueError> {
    if left.is_unknown() || right.is_unknown() {
        return Ok(TypedValue::Unknown);
    }

    match operator {
        BinaryOp::Or => return Ok(TypedValue::State(to_bool(left) || to_bool(right))),
        BinaryOp::And => return Ok(TypedValue::State(to_bool(left) && to_bool(right))),
        _ if operator.is_comparison() => return compare(operator, left, right),
        _ => {}
    }

    match (left, right) {
        (TypedValue::List(left), TypedValue::List(right)) if operator == BinaryOp::Add => {
            let items = left.iter().chain(right.iter()).cloned().collect();
            return Ok(TypedValue::List(items));
        }
        (TypedValue::List(_), _) | (_, TypedValue::List(_)) if operator == BinaryOp::Add => {
            return Err(ValueError::ListConcatenation);
        }
        (TypedValue::List(_), _) | (_, TypedValue::List(_)) => {
            return Err(ValueError::UnsupportedOperator {
                operator: operator.to_string(),
                tag: ValueTag::List,
            });
        }
        (TypedValue::Text(_), _) | (_, TypedValue::Text(_)) if operator == BinaryOp::Add => {
            return Ok(TypedValue::Text(format!("{}{}", left, right)));
        }
        (TypedValue::Text(_), _) | (_, TypedValue::Text(_)) => {
            return Err(ValueError::TypeMismatch {
                operator: operator.to_string(),
                tag: ValueTag::Text,
            });
        }
        _ => {}
    }

    // State op State stays in integer mode; State op Point promotes.
    let use_point = operator == BinaryOp::Divide
        || matches!(left, TypedValue::Point(_))
        || matches!(right, TypedValue::Point(_));

    if use_point {
        let left = to_numeric(left, NumericTarget::Point).as_f64();
        let right = to_numeric(right, NumericTarget::Point).as_f64();
        point_arithmetic(operator, left, right).map(TypedValue::Point)
    } else {
        match (
            to_numeric(left, NumericTarget::Integer),
            to_numeric(right, NumericTarget::Integer),
        ) {
            (Number::Integer(left), Number::Integer(right)) => {
                integer_arithmetic(operator, left, right).map(TypedValue::Integer)
            }
            (left, right) => {
                point_arithmetic(operator, left.as_f64(), right.as_f64()).map(TypedValue::Point)
            }
        }
    }
}

fn integer_arithmetic(operator: BinaryOp, left: i64, right: i64) -> Result<i64, ValueError> {
    let result = match operator {
        BinaryOp::Add => left.checked_add(right),
        BinaryOp::Subtract => left.checked_sub(right),
        BinaryOp::Multiply => left.checked_mul(right),
        BinaryOp::Divide | BinaryOp::Modulo if right == 0 => {
            return Err(ValueError::evaluation("Division by zero"));
        }
        BinaryOp::Divide => left.checked_div(right),
        // Floored, so the sign follows the divisor.
        BinaryOp::Modulo => left.checked_rem(right).map(|remainder| {
            if remainder != 0 && (remainder < 0) != (right < 0) {
                remainder + right
            } else {
                remainder
            }
        }),
        _ => {
            return Err(ValueError::UnsupportedOperator {
                operator: operator.to_string(),
                tag: ValueTag::Integer,
            })
        }
    };

    result.ok_or_else(|| {
        ValueError::evaluation(format!("Integer overflow evaluating {} {} {}", left, operator, right))
    })
}

fn point_arithmetic(operator: BinaryOp, left: f64, right: f64) -> Result<f64, ValueError> {
    let result = match operator {
        BinaryOp::Add => left + right,
        BinaryOp::Subtract => left - right,
        BinaryOp::Multiply => left * right,
        BinaryOp::Divide | BinaryOp::Modulo if right == 0.0 => {
            return Err(ValueError::evaluation("Division by zero"));
        }
        BinaryOp::Divide => left / right,
        BinaryOp::Modulo => {
            let remainder = left % right;
            if remainder != 0.0 && (remainder < 0.0) != (right < 0.0) {
                remainder + right
            } else {
                remainder
            }
        }
        _ => {
            return Err(ValueError::UnsupportedOperator {
                operator: operator.to_string(),
                tag: ValueTag::Point,
            })
        }
    };

    if !result.is_finite() {
        return Err(ValueError::evaluation(format!(
            "Non-finite result evaluating {} {} {}",
            left, operator, right
        )));
    }

    Ok(result)
}

fn numeric_pair(left: &TypedValue, right: &TypedValue) -> Option<(Number, Number)> {
    let numeric_like = |value: &TypedValue| value.is_numeric() || matches!(value, TypedValue::State(_));
    if !(numeric_like(left) && numeric_like(right)) {
        return None;
    }

    Some((
        to_numeric(left, NumericTarget::Integer),
        to_numeric(right, NumericTarget::Integer),
    ))
}

fn order_values(left: &TypedValue, right: &TypedValue) -> Option<Ordering> {
    match (left, right) {
        (TypedValue::Text(left), TypedValue::Text(right)) => Some(left.cmp(right)),
        _ => match numeric_pair(left, right)? {
            (Number::Integer(left), Number::Integer(right)) => Some(left.cmp(&right)),
            (left, right) => left.as_f64().partial_cmp(&right.as_f64()),
        },
    }
}

fn values_equal(left: &TypedValue, right: &TypedValue) -> bool {
    match (left, right) {
        (TypedValue::List(left), TypedValue::List(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(left, right)| values_equal(left, right))
        }
        (TypedValue::Empty, TypedValue::Empty) => true,
        _ => order_values(left, right) == Some(Ordering::Equal),
    }
}

/// Equality and ordering comparisons. Always produces a `State`.
///
/// Numbers and states compare numerically, text compares lexicographically
/// and lists compare element-wise for equality. Any other pairing is
/// unequal and never ordered.
pub fn compare(
    operator: BinaryOp,
    left: &TypedValue,
    right: &TypedValue,
) -> Result<TypedValue, ValueError> {
    if left.is_unknown() || right.is_unknown() {
        return Ok(TypedValue::Unknown);
    }

    let result = match operator {
        BinaryOp::Equals => values_equal(left, right),
        BinaryOp::NotEquals => !values_equal(left, right),
        BinaryOp::Less | BinaryOp::LessEquals | BinaryOp::Greater | BinaryOp::GreaterEquals => {
            match order_values(left, right) {
                Some(ordering) => match operator {
                    BinaryOp::Less => ordering == Ordering::Less,
                    BinaryOp::LessEquals => ordering != Ordering::Greater,
                    BinaryOp::Greater => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                },
                None => {
                    tracing::debug!(
                        %operator,
                        left = %left.tag(),
                        right = %right.tag(),
                        "ordering incompatible values"
                    );
                    false
                }
            }
        }
        _ => {
            return Err(ValueError::UnsupportedOperator {
                operator: operator.to_string(),
                tag: left.tag(),
            })
        }
    };

    Ok(TypedValue::State(result))
}

/// `!` and `~`.
pub fn evaluate_unary(operator: UnaryOp, operand: &TypedValue) -> Result<TypedValue, ValueError> {
    if operand.is_unknown() {
        return Ok(TypedValue::Unknown);
    }

    match operator {
        UnaryOp::Not => Ok(TypedValue::State(!to_bool(operand))),
        UnaryOp::Negate => match operand {
            TypedValue::State(state) => Ok(TypedValue::Integer(-i64::from(*state))),
            TypedValue::Integer(value) => value
                .checked_neg()
                .map(TypedValue::Integer)
                .ok_or_else(|| ValueError::evaluation(format!("Integer overflow negating {}", value))),
            TypedValue::Point(value) => Ok(TypedValue::Point(-value)),
            other => Err(ValueError::TypeMismatch {
                operator: operator.to_string(),
                tag: other.tag(),
            }),
        },
    }
}

/// Explicit typecast.
///
/// `List`, `Empty` and `Unknown` pass through unchanged whatever the target.
pub fn cast(target: CastTarget, value: &TypedValue) -> Result<TypedValue, ValueError> {
    let failure = || ValueError::CastFailure {
        value: value.to_string(),
        tag: value.tag(),
        target,
    };

    let result = match (target, value) {
        (_, TypedValue::List(_) | TypedValue::Empty | TypedValue::Unknown) => value.clone(),

        (CastTarget::Integer, TypedValue::Integer(value)) => TypedValue::Integer(*value),
        (CastTarget::Integer, TypedValue::Point(point)) => {
            let truncated = point.trunc();
            if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                return Err(failure());
            }
            TypedValue::Integer(truncated as i64)
        }
        (CastTarget::Integer, TypedValue::Text(text)) => {
            TypedValue::Integer(text.trim().parse::<i64>().map_err(|_| failure())?)
        }
        (CastTarget::Integer, TypedValue::State(state)) => TypedValue::Integer(i64::from(*state)),

        (CastTarget::Point, TypedValue::Integer(value)) => TypedValue::Point(*value as f64),
        (CastTarget::Point, TypedValue::Point(value)) => TypedValue::Point(*value),
        (CastTarget::Point, TypedValue::Text(text)) => {
            let parsed = text.trim().parse::<f64>().map_err(|_| failure())?;
            if !parsed.is_finite() {
                return Err(failure());
            }
            TypedValue::Point(parsed)
        }
        (CastTarget::Point, TypedValue::State(state)) => {
            TypedValue::Point(if *state { 1.0 } else { 0.0 })
        }

        (CastTarget::Text, value) => TypedValue::Text(value.to_string()),

        (CastTarget::State, value) => TypedValue::State(to_bool(value)),
    };

    Ok(result)
}
