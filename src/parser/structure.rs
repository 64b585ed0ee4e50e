//! Structure headers and the signature clauses of steps and risers.

use crate::{
    ast::{
        ast::{Parameter, StructureDef, StructureKind},
        types::Type,
    },
    errors::errors::{Diagnostic, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser, types::parse_type};

/// A structure whose header has been read but whose end has not.
#[derive(Debug)]
pub struct OpenScope {
    pub def: StructureDef,
    /// Set once a statement other than a note was added
    pub body_started: bool,
    pub seen_clauses: Vec<TokenKind>,
}

impl OpenScope {
    pub fn new(def: StructureDef) -> Self {
        OpenScope {
            def,
            body_started: false,
            seen_clauses: vec![],
        }
    }
}

enum ClauseValue {
    BelongsTo(String),
    Expects(Vec<Parameter>),
    Returns(Option<String>, Option<Type>),
}

/// Parses `building: NAME` and its siblings.
///
/// Any open structure of the same or a deeper rank is closed first, so a new
/// `step:` ends the previous step and its risers.
pub fn parse_structure_header(parser: &mut Parser) {
    let header = parser.advance();
    let Some(kind) = StructureKind::from_token(header.kind) else {
        return;
    };

    parser.close_scopes(kind.depth());

    let name = if parser.current_token_kind() == TokenKind::Identifier {
        Some(parser.advance().value)
    } else {
        let found = parser.current_token().describe();
        let span = parser.current_token().span;
        parser.report_syntax(Diagnostic::new(ErrorImpl::ExpectedIdentifier { found }, span));
        None
    };

    let span = parser.span_from(header.span.start);
    if name.is_some() {
        parser.end_statement();
    } else {
        parser.synchronize();
    }

    parser.open_scope(StructureDef {
        kind,
        name: name.unwrap_or_default(),
        clauses: None,
        body: vec![],
        children: vec![],
        span,
    });
}

/// Parses `belongs to:`, `expects:` or `returns:`.
///
/// A clause is only kept when it directly follows the header of a step or
/// riser. Anywhere else it is still parsed, then dropped with an error.
pub fn parse_clause(parser: &mut Parser) {
    let clause = parser.current_token().clone();
    let start = parser.get_consumed();

    let value = match parse_clause_value(parser) {
        Ok(value) => value,
        Err(diagnostic) => {
            parser.recover(diagnostic, start);
            return;
        }
    };

    let in_place = parser
        .current_scope()
        .is_some_and(|scope| scope.def.kind.accepts_clauses() && !scope.body_started);
    if !in_place {
        parser.report(Diagnostic::new(
            ErrorImpl::MisplacedClause {
                clause: clause.kind.as_text().to_string(),
            },
            clause.span,
        ));
        return;
    }

    let duplicate = parser
        .current_scope()
        .is_some_and(|scope| scope.seen_clauses.contains(&clause.kind));
    if duplicate {
        parser.report(Diagnostic::new(
            ErrorImpl::DuplicateClause {
                clause: clause.kind.as_text().to_string(),
            },
            clause.span,
        ));
        return;
    }

    let end = parser.get_position();
    if let Some(scope) = parser.current_scope_mut() {
        scope.seen_clauses.push(clause.kind);
        scope.def.span.end = end;

        let clauses = scope.def.clauses.get_or_insert_with(Default::default);
        match value {
            ClauseValue::BelongsTo(name) => clauses.belongs_to = Some(name),
            ClauseValue::Expects(parameters) => clauses.expects = parameters,
            ClauseValue::Returns(name, ty) => {
                clauses.returns_name = name;
                clauses.returns = ty;
            }
        }
    }
}

fn parse_clause_value(parser: &mut Parser) -> Result<ClauseValue, Diagnostic> {
    let keyword = parser.advance();

    let value = match keyword.kind {
        TokenKind::BelongsTo => ClauseValue::BelongsTo(parser.expect_identifier()?.value),
        TokenKind::Expects => ClauseValue::Expects(parse_parameters(parser)?),
        TokenKind::Returns => parse_returns(parser)?,
        _ => {
            return Err(Diagnostic::new(
                ErrorImpl::UnexpectedToken {
                    token: keyword.describe(),
                },
                keyword.span,
            ))
        }
    };

    parser.end_statement();
    Ok(value)
}

/// `nothing`, a bare `TYPE`, or `NAME [as TYPE]` naming the result.
fn parse_returns(parser: &mut Parser) -> Result<ClauseValue, Diagnostic> {
    match parser.current_token_kind() {
        TokenKind::Nothing => {
            parser.advance();
            Ok(ClauseValue::Returns(None, None))
        }
        TokenKind::Identifier => {
            let name = parser.advance().value;
            let ty = if parser.current_token_kind() == TokenKind::As {
                parser.advance();
                parse_type(parser)?
            } else {
                None
            };
            Ok(ClauseValue::Returns(Some(name), ty))
        }
        _ => Ok(ClauseValue::Returns(None, parse_type(parser)?)),
    }
}

/// `nothing`, or `NAME [as TYPE] [= DEFAULT]` separated by commas.
fn parse_parameters(parser: &mut Parser) -> Result<Vec<Parameter>, Diagnostic> {
    if parser.current_token_kind() == TokenKind::Nothing {
        parser.advance();
        return Ok(vec![]);
    }

    let mut parameters = vec![];
    loop {
        parameters.push(parse_parameter(parser)?);

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    Ok(parameters)
}

fn parse_parameter(parser: &mut Parser) -> Result<Parameter, Diagnostic> {
    let name = parser.expect_identifier()?;

    let ty = if parser.current_token_kind() == TokenKind::As {
        parser.advance();
        parse_type(parser)?
    } else {
        None
    };

    let default = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    Ok(Parameter {
        name: name.value,
        ty,
        default,
        span: Span::new(name.span.start, parser.get_position()),
    })
}
