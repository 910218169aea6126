use crate::{
    ast::statements::{
        AssignOp, AssignmentStmt, Declarator, ExpressionStmt, FnDeclStmt, Parameter, ShowStmt,
        Stmt, ThrowStmt, VarDeclStmt,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::parser::Parser;

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(stmt_fn) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return stmt_fn(parser);
    }

    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1).is_assignment_operator()
    {
        return parse_assignment_stmt(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::Semicolon)?.span.end;

    Ok(Stmt::Expression(ExpressionStmt {
        span: Span::new(expression.span.start, end),
        expression,
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();
    let is_fixed = start_token.kind == TokenKind::Fixed;

    let mut declarators = vec![];
    loop {
        let error = parser.unexpected("expected identifier during variable declaration");
        let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

        let assigned_value = if parser.current_token_kind() == TokenKind::Assignment {
            parser.advance();
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };

        declarators.push(Declarator {
            identifier: name.value,
            assigned_value,
            span: Span::new(name.span.start, parser.previous_end()),
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    let end = parser.expect(TokenKind::Semicolon)?.span.end;

    Ok(Stmt::VarDecl(VarDeclStmt {
        is_fixed,
        declarators,
        span: Span::new(start_token.span.start, end),
    }))
}

fn assignment_operator(kind: TokenKind) -> Option<AssignOp> {
    match kind {
        TokenKind::Assignment => Some(AssignOp::Assign),
        TokenKind::PlusEquals => Some(AssignOp::AddAssign),
        TokenKind::MinusEquals => Some(AssignOp::SubtractAssign),
        TokenKind::StarEquals => Some(AssignOp::MultiplyAssign),
        TokenKind::SlashEquals => Some(AssignOp::DivideAssign),
        TokenKind::PercentEquals => Some(AssignOp::ModuloAssign),
        _ => None,
    }
}

pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let assignee = parser.expect(TokenKind::Identifier)?;

    let Some(operator) = assignment_operator(parser.current_token_kind()) else {
        return Err(parser.unexpected("expected an assignment operator"));
    };
    parser.advance();

    let value = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::Semicolon)?.span.end;

    Ok(Stmt::Assignment(AssignmentStmt {
        assignee: assignee.value,
        assignee_span: assignee.span,
        operator,
        value,
        span: Span::new(assignee.span.start, end),
    }))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let error = parser.unexpected("expected function name after `func`");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let error = parser.unexpected("expected parameter name");
            let parameter = parser.expect_error(TokenKind::Identifier, Some(error))?;
            parameters.push(Parameter {
                name: parameter.value,
                span: parameter.span,
            });

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
            } else {
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::OpenCurly)?;

    let mut body = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected("expected `}` to close the function body"));
        }
        body.push(parse_stmt(parser)?);
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span.end;

    Ok(Stmt::FnDecl(FnDeclStmt {
        name: name.value,
        name_span: name.span,
        parameters,
        body,
        span: Span::new(start, end),
    }))
}

pub fn parse_show_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let expression = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::Semicolon)?.span.end;

    Ok(Stmt::Show(ShowStmt {
        expression,
        span: Span::new(start, end),
    }))
}

pub fn parse_throw_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;

    let expression = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::Semicolon)?.span.end;

    Ok(Stmt::Throw(ThrowStmt {
        expression,
        span: Span::new(start, end),
    }))
}
