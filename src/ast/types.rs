//! Type annotations written in declarations, parameters and step signatures.

use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Number,
    Text,
    Boolean,
    List,
    Table,
    Fixed,
}

impl Type {
    /// Maps a type keyword onto its type. Every other token yields `None`.
    pub fn from_token(kind: TokenKind) -> Option<Type> {
        match kind {
            TokenKind::NumberType => Some(Type::Number),
            TokenKind::TextType => Some(Type::Text),
            TokenKind::BooleanType => Some(Type::Boolean),
            TokenKind::ListType => Some(Type::List),
            TokenKind::TableType => Some(Type::Table),
            TokenKind::Fixed => Some(Type::Fixed),
            _ => None,
        }
    }

    /// The type tested by an `is a ...` phrase.
    pub fn from_type_check(kind: TokenKind) -> Option<Type> {
        match kind {
            TokenKind::IsANumber => Some(Type::Number),
            TokenKind::IsAText => Some(Type::Text),
            TokenKind::IsABoolean => Some(Type::Boolean),
            TokenKind::IsAList => Some(Type::List),
            TokenKind::IsATable => Some(Type::Table),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Type::Number => "number",
            Type::Text => "text",
            Type::Boolean => "boolean",
            Type::List => "list",
            Type::Table => "table",
            Type::Fixed => "fixed",
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}
