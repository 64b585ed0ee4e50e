use crate::{
    ast::{
        expressions::{CallExpr, Expr},
        statements::{ElifClause, SectionKind, Stmt},
        types::Type,
    },
    errors::errors::{Diagnostic, ErrorImpl},
    lexer::tokens::TokenKind,
    Position,
};

use super::{
    expr::{parse_arguments, parse_expr},
    lookups::BindingPower,
    parser::Parser,
    types::parse_type,
};

const IF_CLOSERS: &[TokenKind] = &[TokenKind::OtherwiseIf, TokenKind::Otherwise];
const ATTEMPT_CLOSERS: &[TokenKind] = &[TokenKind::IfUnsuccessful, TokenKind::ThenContinue];
const UNSUCCESSFUL_CLOSERS: &[TokenKind] = &[TokenKind::ThenContinue];

/// Words from other languages, and the Steps phrase to use instead.
const WRONG_KEYWORDS: &[(&str, &str)] = &[
    ("else", "otherwise"),
    ("elif", "otherwise if"),
    ("elseif", "otherwise if"),
    ("print", "display"),
    ("show", "display"),
    ("function", "step:"),
    ("def", "step:"),
    ("func", "step:"),
    ("try", "attempt:"),
    ("catch", "if unsuccessful:"),
    ("except", "if unsuccessful:"),
    ("finally", "then continue:"),
    ("let", "declare:"),
    ("var", "declare:"),
    ("foreach", "for each"),
    ("loop", "repeat"),
];

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let kind = parser.current_token_kind();

    match parser.get_stmt_lookup().get(&kind).copied() {
        Some(stmt_fn) => stmt_fn(parser),
        None => Err(parser.unexpected_token()),
    }
}

/// A line starting with a name: `x = 1`, `x as number`, `x[i] = 1` or `greet(x)`.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let name = parser.current_token().clone();

    match parser.peek_token().kind {
        TokenKind::Assignment => {
            parser.advance();
            parser.advance();
            let value = parse_expr(parser, BindingPower::Default)?;
            let span = parser.span_from(name.span.start);
            parser.end_statement();

            Ok(Stmt::Assignment {
                target: name.value,
                index: None,
                value,
                span,
            })
        }
        TokenKind::As => {
            parser.advance();
            parse_declaration_rest(parser, name.span.start, name.value)
        }
        TokenKind::OpenBracket => {
            parser.advance();
            let index = parse_target_index(parser)?;
            parser.expect(TokenKind::Assignment)?;
            let value = parse_expr(parser, BindingPower::Default)?;
            let span = parser.span_from(name.span.start);
            parser.end_statement();

            Ok(Stmt::Assignment {
                target: name.value,
                index,
                value,
                span,
            })
        }
        TokenKind::OpenParen => match parse_expr(parser, BindingPower::Default)? {
            Expr::Call(call) => {
                parser.end_statement();
                Ok(Stmt::Call(call))
            }
            other => Err(Diagnostic::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: name.value,
                    message: "a value on its own is not a statement".to_string(),
                },
                *other.get_span(),
            )),
        },
        _ => {
            let word = name.value.to_lowercase();
            if let Some((_, correct)) = WRONG_KEYWORDS.iter().find(|(wrong, _)| *wrong == word) {
                return Err(Diagnostic::new(
                    ErrorImpl::WrongKeyword {
                        found: name.value,
                        correct: correct.to_string(),
                    },
                    name.span,
                ));
            }

            Err(Diagnostic::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: name.value,
                    message: "a line starting with a name must assign it with '=' or declare it with 'as'"
                        .to_string(),
                },
                name.span,
            ))
        }
    }
}

/// `[INDEX]` after an assignment target, or nothing.
fn parse_target_index(parser: &mut Parser) -> Result<Option<Expr>, Diagnostic> {
    if parser.current_token_kind() != TokenKind::OpenBracket {
        return Ok(None);
    }

    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;
    Ok(Some(index))
}

/// `declare:` alone opens a declaration section, followed by a name it
/// declares a single variable.
pub fn parse_declare_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let keyword = parser.advance();

    if matches!(
        parser.current_token_kind(),
        TokenKind::Newline | TokenKind::EOF | TokenKind::Note | TokenKind::NoteBlock
    ) {
        return Ok(Stmt::Section {
            kind: SectionKind::Declare,
            span: keyword.span,
        });
    }

    let name = parser.expect_identifier()?;
    parse_declaration_rest(parser, keyword.span.start, name.value)
}

/// Everything after `NAME as`: `TYPE [fixed] [= EXPR]`.
fn parse_declaration_rest(parser: &mut Parser, start: Position, name: String) -> Result<Stmt, Diagnostic> {
    parser.expect(TokenKind::As)?;
    let ty = parse_type(parser)?;

    let fixed = parser.current_token_kind() == TokenKind::Fixed && ty != Some(Type::Fixed);
    if fixed {
        parser.advance();
    }

    let value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let span = parser.span_from(start);
    parser.end_statement();

    Ok(Stmt::Declaration {
        name,
        ty,
        fixed,
        value,
        span,
    })
}

pub fn parse_do_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let keyword = parser.advance();

    Ok(Stmt::Section {
        kind: SectionKind::Do,
        span: keyword.span,
    })
}

/// `set NAME to EXPR` and `set NAME[INDEX] to EXPR`
pub fn parse_set_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.advance().span.start;

    let target = parser.expect_identifier()?.value;
    let index = parse_target_index(parser)?;
    parser.expect(TokenKind::To)?;
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = parser.span_from(start);
    parser.end_statement();

    Ok(Stmt::Assignment {
        target,
        index,
        value,
        span,
    })
}

/// `call NAME [with ARGS] [storing result in NAME]`
///
/// Arguments are either wrapped in parentheses or a bare comma separated list.
pub fn parse_call_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.advance().span.start;
    let callee = parser.expect_identifier()?.value;

    let mut arguments = vec![];
    if parser.current_token_kind() == TokenKind::With {
        parser.advance();

        if parser.current_token_kind() == TokenKind::OpenParen {
            arguments = parse_arguments(parser)?;
        } else {
            loop {
                arguments.push(parse_expr(parser, BindingPower::Default)?);
                if parser.current_token_kind() != TokenKind::Comma {
                    break;
                }
                parser.advance();
            }
        }
    }

    let storing_result_in = if parser.current_token_kind() == TokenKind::StoringResultIn {
        parser.advance();
        Some(parser.expect_identifier()?.value)
    } else {
        None
    };

    let span = parser.span_from(start);
    parser.end_statement();

    Ok(Stmt::Call(CallExpr {
        callee,
        arguments,
        storing_result_in,
        span,
    }))
}

pub fn parse_display_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.advance().span.start;
    let value = parse_expr(parser, BindingPower::Default)?;

    let span = parser.span_from(start);
    parser.end_statement();

    Ok(Stmt::Display { value, span })
}

pub fn parse_input_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.advance().span.start;
    let name = parser.expect_identifier()?.value;

    let span = parser.span_from(start);
    parser.end_statement();

    Ok(Stmt::Input { name, span })
}

/// `return` with an optional value.
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.advance().span.start;

    let value = if parser.at_boundary() {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    let span = parser.span_from(start);
    parser.end_statement();

    Ok(Stmt::Return { value, span })
}

pub fn parse_exit_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let span = parser.advance().span;
    parser.end_statement();

    Ok(Stmt::Exit { span })
}

/// `if COND: ...`, then any number of `otherwise if COND: ...` and at most one
/// `otherwise: ...`.
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let indent = parser.line_indent();
    let start = parser.advance().span.start;

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let body = parser.parse_block("if", indent, IF_CLOSERS, parser.span_from(start));

    let mut elifs = vec![];
    while parser.claim_closer(TokenKind::OtherwiseIf, indent) {
        let elif_start = parser.advance().span.start;

        let condition = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Colon)?;
        let header = parser.span_from(elif_start);
        let body = parser.parse_block("otherwise if", indent, IF_CLOSERS, header);

        elifs.push(ElifClause {
            condition,
            body,
            span: parser.span_from(elif_start),
        });
    }

    let else_body = if parser.claim_closer(TokenKind::Otherwise, indent) {
        let otherwise = parser.advance().span;
        parser.expect(TokenKind::Colon)?;
        Some(parser.parse_block("otherwise", indent, &[], otherwise))
    } else {
        None
    };

    Ok(Stmt::If {
        condition,
        body,
        elifs,
        else_body,
        span: parser.span_from(start),
    })
}

/// `repeat N times:`, or `repeat` in front of a `for each` or `while` loop.
pub fn parse_repeat_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let indent = parser.line_indent();
    let start = parser.advance().span.start;

    match parser.current_token_kind() {
        TokenKind::ForEach => return parse_for_each_rest(parser, start, indent),
        TokenKind::While => return parse_while_rest(parser, start, indent),
        _ => {}
    }

    let count = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Times)?;
    parser.expect(TokenKind::Colon)?;
    let body = parser.parse_block("repeat", indent, &[], parser.span_from(start));

    Ok(Stmt::Repeat {
        count,
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_for_each_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let indent = parser.line_indent();
    let start = parser.current_token().span.start;
    parse_for_each_rest(parser, start, indent)
}

/// `for each NAME in EXPR: ...`, from the `for each` keyword on.
fn parse_for_each_rest(parser: &mut Parser, start: Position, indent: usize) -> Result<Stmt, Diagnostic> {
    parser.expect(TokenKind::ForEach)?;

    let variable = parser.expect_identifier()?.value;
    parser.expect(TokenKind::In)?;
    let iterable = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let body = parser.parse_block("for each", indent, &[], parser.span_from(start));

    Ok(Stmt::ForEach {
        variable,
        iterable,
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let indent = parser.line_indent();
    let start = parser.current_token().span.start;
    parse_while_rest(parser, start, indent)
}

/// `while COND: ...`, from the `while` keyword on.
fn parse_while_rest(parser: &mut Parser, start: Position, indent: usize) -> Result<Stmt, Diagnostic> {
    parser.expect(TokenKind::While)?;

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let body = parser.parse_block("while", indent, &[], parser.span_from(start));

    Ok(Stmt::While {
        condition,
        body,
        span: parser.span_from(start),
    })
}

/// `attempt: ... if unsuccessful: ... [then continue: ...]`
///
/// A missing `if unsuccessful:` is reported but the statement is kept.
pub fn parse_attempt_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let indent = parser.line_indent();
    let keyword = parser.advance().span;
    let start = keyword.start;

    let body = parser.parse_block("attempt:", indent, ATTEMPT_CLOSERS, keyword);

    let unsuccessful = if parser.claim_closer(TokenKind::IfUnsuccessful, indent) {
        let header = parser.advance().span;
        parser.parse_block("if unsuccessful:", indent, UNSUCCESSFUL_CLOSERS, header)
    } else {
        let found = parser.current_token().describe();
        let span = parser.current_token().span;
        parser.report(Diagnostic::new(
            ErrorImpl::ExpectedToken {
                expected: TokenKind::IfUnsuccessful.as_text().to_string(),
                found,
            },
            span,
        ));
        vec![]
    };

    let then_continue = if parser.claim_closer(TokenKind::ThenContinue, indent) {
        let header = parser.advance().span;
        Some(parser.parse_block("then continue:", indent, &[], header))
    } else {
        None
    };

    Ok(Stmt::Attempt {
        body,
        unsuccessful,
        then_continue,
        span: parser.span_from(start),
    })
}

/// `add VALUE to TARGET`
pub fn parse_add_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.advance().span.start;

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::To)?;
    let target = parse_expr(parser, BindingPower::Default)?;

    let span = parser.span_from(start);
    parser.end_statement();

    Ok(Stmt::Add {
        value,
        target,
        span,
    })
}

/// `remove VALUE from TARGET`
pub fn parse_remove_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let start = parser.advance().span.start;

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::From)?;
    let target = parse_expr(parser, BindingPower::Default)?;

    let span = parser.span_from(start);
    parser.end_statement();

    Ok(Stmt::Remove {
        value,
        target,
        span,
    })
}

pub fn parse_note_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let note = parser.advance();

    Ok(match note.kind {
        TokenKind::NoteBlock => Stmt::BlockComment {
            text: note.value,
            span: note.span,
        },
        _ => Stmt::Comment {
            text: note.value,
            span: note.span,
        },
    })
}

/// A closing keyword that no open statement is waiting for.
pub fn parse_stray_closer_stmt(parser: &mut Parser) -> Result<Stmt, Diagnostic> {
    let token = parser.current_token();

    let message = match token.kind {
        TokenKind::OtherwiseIf | TokenKind::Otherwise => "it must follow the body of an 'if'",
        TokenKind::IfUnsuccessful | TokenKind::ThenContinue => {
            "it must follow the body of an 'attempt:'"
        }
        _ => "there is no open 'note block:' to end",
    };

    Err(Diagnostic::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: token.describe(),
            message: message.to_string(),
        },
        token.span,
    ))
}
