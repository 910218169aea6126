use crate::{
    ast::expressions::{BinaryOp, CastTarget, Expr, ExprKind, Literal, UnaryOp},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ));
        };

        let operator_bp = parser.current_binding_power();
        left = led_fn(parser, left, operator_bp)?;
    }

    Ok(left)
}

fn number_error(parser: &Parser) -> Error {
    Error::new(
        ErrorImpl::NumberParseError {
            token: parser.current_token().value.clone(),
        },
        parser.get_position(),
    )
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let kind = match token.kind {
        TokenKind::IntegerLiteral | TokenKind::NegIntegerLiteral => {
            let digits = token.value.trim_start_matches('~');
            let value: i64 = digits.parse().map_err(|_| number_error(parser))?;
            if token.kind == TokenKind::NegIntegerLiteral {
                ExprKind::Literal(Literal::Integer(-value))
            } else {
                ExprKind::Literal(Literal::Integer(value))
            }
        }
        TokenKind::PointLiteral | TokenKind::NegPointLiteral => {
            let digits = token.value.trim_start_matches('~');
            let value: f64 = digits.parse().map_err(|_| number_error(parser))?;
            if token.kind == TokenKind::NegPointLiteral {
                ExprKind::Literal(Literal::Point(-value))
            } else {
                ExprKind::Literal(Literal::Point(value))
            }
        }
        TokenKind::TextLiteral => ExprKind::Literal(Literal::Text(token.value.clone())),
        TokenKind::StateLiteral => ExprKind::Literal(Literal::State(token.value == "YES")),
        TokenKind::Empty => ExprKind::Literal(Literal::Empty),
        TokenKind::Identifier => ExprKind::Identifier(token.value.clone()),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    parser.advance();
    Ok(parser.mk_expr(kind, token.span))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    let operator = match kind {
        TokenKind::Or => BinaryOp::Or,
        TokenKind::And => BinaryOp::And,
        TokenKind::Equals => BinaryOp::Equals,
        TokenKind::NotEquals => BinaryOp::NotEquals,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEquals => BinaryOp::LessEquals,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Dash => BinaryOp::Subtract,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Percent => BinaryOp::Modulo,
        _ => return None,
    };
    Some(operator)
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let Some(operator) = binary_operator(parser.current_token_kind()) else {
        return Err(parser.unexpected("expected a binary operator"));
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;
    let span = left.span.to(&right.span);

    Ok(parser.mk_expr(
        ExprKind::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        },
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Not => UnaryOp::Not,
        _ => UnaryOp::Negate,
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;
    let span = operator_token.span.to(&operand.span);

    Ok(parser.mk_expr(
        ExprKind::Unary {
            operator,
            operand: Box::new(operand),
        },
        span,
    ))
}

fn cast_target(kind: TokenKind) -> Option<CastTarget> {
    match kind {
        TokenKind::Integer => Some(CastTarget::Integer),
        TokenKind::Point => Some(CastTarget::Point),
        TokenKind::Text => Some(CastTarget::Text),
        TokenKind::State => Some(CastTarget::State),
        _ => None,
    }
}

/// `(expr)` or the prefix cast form `(integer) expr`.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;

    if parser.current_token_kind().is_type_keyword() && parser.peek_kind(1) == TokenKind::CloseParen
    {
        let target = cast_target(parser.advance().kind);
        parser.expect(TokenKind::CloseParen)?;

        let operand = parse_expr(parser, BindingPower::Unary)?;
        let span = Span::new(start, operand.span.end);

        return match target {
            Some(target) => Ok(parser.mk_expr(
                ExprKind::Cast {
                    target,
                    operand: Box::new(operand),
                },
                span,
            )),
            None => Err(parser.unexpected("expected a type name")),
        };
    }

    let inner = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    Ok(parser.mk_expr(ExprKind::Grouping(Box::new(inner)), Span::new(start, end)))
}

/// `integer(expr)`, `point(expr)`, `text(expr)`, `state(expr)`.
pub fn parse_cast_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let target_token = parser.advance().clone();
    let Some(target) = cast_target(target_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: target_token.value,
            },
            target_token.span.start,
        ));
    };

    let error = parser.unexpected("expected `(` after a type name in a cast");
    parser.expect_error(TokenKind::OpenParen, Some(error))?;
    let operand = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    Ok(parser.mk_expr(
        ExprKind::Cast {
            target,
            operand: Box::new(operand),
        },
        Span::new(target_token.span.start, end),
    ))
}

pub fn parse_list_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start;

    let mut items = vec![];
    if parser.current_token_kind() != TokenKind::CloseBracket {
        loop {
            items.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    let end = parser.expect(TokenKind::CloseBracket)?.span.end;

    Ok(parser.mk_expr(ExprKind::List(items), Span::new(start, end)))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let callee_span = left.span;
    let ExprKind::Identifier(callee) = left.kind else {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: String::from("("),
                message: String::from("only named functions can be called"),
            },
            parser.get_position(),
        ));
    };

    parser.advance();

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    Ok(parser.mk_expr(
        ExprKind::Call {
            callee,
            callee_span,
            arguments,
        },
        Span::new(callee_span.start, end),
    ))
}
