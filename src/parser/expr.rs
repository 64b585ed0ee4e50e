use crate::{
    ast::{
        expressions::{BinaryOperator, CallExpr, Expr, Literal, UnaryOperator},
        types::Type,
    },
    errors::errors::{Diagnostic, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Diagnostic> {
    parser.enter_nested()?;
    let result = parse_expr_nested(parser, bp);
    parser.leave_nested();
    result
}

fn parse_expr_nested(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Diagnostic> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Diagnostic::new(
            ErrorImpl::ExpectedExpression {
                found: parser.current_token().describe(),
            },
            parser.current_token().span,
        ));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            break;
        };

        let operator_bp = parser.current_binding_power();
        left = led(parser, left, operator_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let token = parser.current_token().clone();

    let value = match token.kind {
        TokenKind::Number => match token.value.parse::<f64>() {
            Ok(number) => Literal::Number(number),
            Err(_) => {
                return Err(Diagnostic::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span,
                ))
            }
        },
        TokenKind::String => Literal::Text(token.value),
        TokenKind::True => Literal::Boolean(true),
        TokenKind::False => Literal::Boolean(false),
        TokenKind::Nothing => Literal::Nothing,
        TokenKind::Identifier => {
            parser.advance();
            return Ok(Expr::Identifier {
                name: token.value,
                span: token.span,
            });
        }
        TokenKind::Input => {
            parser.advance();
            return Ok(Expr::Input { span: token.span });
        }
        _ => return Err(parser.unexpected_token()),
    };

    parser.advance();
    Ok(Expr::Literal {
        value,
        span: token.span,
    })
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Diagnostic> {
    let operator_token = parser.advance();
    let Some(operator) = BinaryOperator::from_token(operator_token.kind) else {
        return Err(Diagnostic::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.describe(),
            },
            operator_token.span,
        ));
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary {
        span: left.get_span().to(right.get_span()),
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// `EXPR is a number` and the other `is a` phrases.
pub fn parse_type_check_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Diagnostic> {
    let check = parser.advance();
    let Some(ty) = Type::from_type_check(check.kind) else {
        return Err(Diagnostic::new(
            ErrorImpl::UnexpectedToken {
                token: check.describe(),
            },
            check.span,
        ));
    };

    Ok(Expr::TypeCheck {
        span: left.get_span().to(&check.span),
        operand: Box::new(left),
        ty,
    })
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let operator_token = parser.advance();
    let Some(operator) = UnaryOperator::from_token(operator_token.kind) else {
        return Err(Diagnostic::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.describe(),
            },
            operator_token.span,
        ));
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary {
        span: operator_token.span.to(operand.get_span()),
        operator,
        operand: Box::new(operand),
    })
}

/// `character at INDEX of TEXT`
pub fn parse_character_at_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let start = parser.advance().span.start;

    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Of)?;
    let text = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::CharacterAt {
        span: Span::new(start, text.get_span().end),
        index: Box::new(index),
        text: Box::new(text),
    })
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let start = parser.advance().span.start;

    parser.skip_newlines();
    let inner = parse_expr(parser, BindingPower::Default)?;
    parser.skip_newlines();
    let end = parser.expect(TokenKind::CloseParen)?.span.end;

    Ok(Expr::Parenthesized {
        inner: Box::new(inner),
        span: Span::new(start, end),
    })
}

/// Reports a comma directly before a closing bracket, which is then accepted.
fn trailing_comma(parser: &mut Parser, comma: Span) {
    parser.report(Diagnostic::new(ErrorImpl::TrailingComma, comma));
}

/// `[a, b]` is a list, `[key: value]` a table and `[:]` the empty table.
///
/// Newlines are allowed between elements.
pub fn parse_collection_expr(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    let start = parser.advance().span.start;
    parser.skip_newlines();

    if parser.current_token_kind() == TokenKind::CloseBracket {
        let end = parser.advance().span.end;
        return Ok(Expr::List {
            elements: vec![],
            span: Span::new(start, end),
        });
    }

    if parser.current_token_kind() == TokenKind::Colon
        && parser.peek_token().kind == TokenKind::CloseBracket
    {
        parser.advance();
        let end = parser.advance().span.end;
        return Ok(Expr::Table {
            entries: vec![],
            span: Span::new(start, end),
        });
    }

    let first = parse_expr(parser, BindingPower::Default)?;
    parser.skip_newlines();

    if parser.current_token_kind() == TokenKind::Colon {
        let mut entries = vec![(first, parse_table_value(parser)?)];

        while parser.current_token_kind() == TokenKind::Comma {
            let comma = parser.advance().span;
            parser.skip_newlines();
            if parser.current_token_kind() == TokenKind::CloseBracket {
                trailing_comma(parser, comma);
                break;
            }

            let key = parse_expr(parser, BindingPower::Default)?;
            parser.skip_newlines();
            entries.push((key, parse_table_value(parser)?));
        }

        let end = parser.expect(TokenKind::CloseBracket)?.span.end;
        return Ok(Expr::Table {
            entries,
            span: Span::new(start, end),
        });
    }

    let mut elements = vec![first];
    while parser.current_token_kind() == TokenKind::Comma {
        let comma = parser.advance().span;
        parser.skip_newlines();
        if parser.current_token_kind() == TokenKind::CloseBracket {
            trailing_comma(parser, comma);
            break;
        }

        elements.push(parse_expr(parser, BindingPower::Default)?);
        parser.skip_newlines();
    }

    let end = parser.expect(TokenKind::CloseBracket)?.span.end;
    Ok(Expr::List {
        elements,
        span: Span::new(start, end),
    })
}

/// Parses `: VALUE` inside a table, leaving the parser after any newlines.
fn parse_table_value(parser: &mut Parser) -> Result<Expr, Diagnostic> {
    parser.expect(TokenKind::Colon)?;
    parser.skip_newlines();
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.skip_newlines();
    Ok(value)
}

/// Parses `(a, b, ...)`, used by calls in expressions and by `call ... with`.
pub fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Diagnostic> {
    parser.expect(TokenKind::OpenParen)?;
    parser.skip_newlines();

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, BindingPower::Default)?);
            parser.skip_newlines();

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            let comma = parser.advance().span;
            parser.skip_newlines();
            if parser.current_token_kind() == TokenKind::CloseParen {
                trailing_comma(parser, comma);
                break;
            }
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(arguments)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Diagnostic> {
    let Expr::Identifier { name, span } = left else {
        return Err(Diagnostic::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: "(".to_string(),
                message: "only a step or riser can be called by name".to_string(),
            },
            parser.current_token().span,
        ));
    };

    let arguments = parse_arguments(parser)?;

    Ok(Expr::Call(CallExpr {
        callee: name,
        arguments,
        storing_result_in: None,
        span: Span::new(span.start, parser.get_position()),
    }))
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Diagnostic> {
    parser.advance();

    parser.skip_newlines();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.skip_newlines();
    let end = parser.expect(TokenKind::CloseBracket)?.span.end;

    Ok(Expr::Index {
        span: Span::new(left.get_span().start, end),
        base: Box::new(left),
        index: Box::new(index),
    })
}

/// `EXPR as TYPE`, or `EXPR as decimal(PLACES)` to format a number.
///
/// An unknown type is reported and kept as an empty conversion, so whatever
/// follows cannot attach to `EXPR`.
pub fn parse_conversion_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Diagnostic> {
    parser.advance();

    if parser.current_token().kind == TokenKind::Identifier
        && parser.current_token().value == "decimal"
        && parser.peek_token().kind == TokenKind::OpenParen
    {
        parser.advance();
        parser.expect(TokenKind::OpenParen)?;
        parser.skip_newlines();
        let places = parse_expr(parser, BindingPower::Default)?;
        parser.skip_newlines();
        let end = parser.expect(TokenKind::CloseParen)?.span.end;

        return Ok(Expr::FormatNumber {
            span: Span::new(left.get_span().start, end),
            operand: Box::new(left),
            places: Box::new(places),
        });
    }

    let ty = parse_type(parser)?;
    Ok(Expr::Conversion {
        span: Span::new(left.get_span().start, parser.get_position()),
        operand: Box::new(left),
        ty,
    })
}
