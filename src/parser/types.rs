//! Type annotation parsing.
//!
//! Steps has a closed set of type keywords (`number`, `text`, `boolean`,
//! `list`, `table`, `fixed`), so a type is always a single token and no
//! lookup table is needed.

use crate::{
    ast::types::Type,
    errors::errors::{Diagnostic, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Parses a type keyword.
///
/// # Returns
///
/// - `Ok(Some(type))` for a type keyword
/// - `Ok(None)` for a plain name, after reporting it as an unknown type. The
///   name is consumed so the surrounding statement can carry on.
/// - `Err` for anything else
pub fn parse_type(parser: &mut Parser) -> Result<Option<Type>, Diagnostic> {
    let kind = parser.current_token_kind();

    if let Some(ty) = Type::from_token(kind) {
        parser.advance();
        return Ok(Some(ty));
    }

    if kind == TokenKind::Identifier {
        let token = parser.advance();
        parser.report(Diagnostic::new(
            ErrorImpl::UnknownType {
                type_: token.value,
            },
            token.span,
        ));
        return Ok(None);
    }

    let token = parser.current_token();
    Err(Diagnostic::new(
        ErrorImpl::ExpectedToken {
            expected: "a type".to_string(),
            found: token.describe(),
        },
        token.span,
    ))
}
