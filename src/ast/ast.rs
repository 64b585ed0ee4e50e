use std::fmt::Display;

use crate::{lexer::tokens::TokenKind, Span};

use super::{expressions::Expr, statements::Stmt, types::Type};

/// Root of a parsed buffer. Owns every node below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
    pub span: Span,
}

impl Program {
    /// Top-level structures, skipping bare statements.
    pub fn structures(&self) -> impl Iterator<Item = &StructureDef> {
        self.items.iter().filter_map(|item| match item {
            Item::Structure(structure) => Some(structure),
            Item::Statement(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Structure(StructureDef),
    Statement(Stmt),
}

/// Rank of a structure, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StructureKind {
    Building,
    Floor,
    Step,
    Riser,
}

impl StructureKind {
    pub fn from_token(kind: TokenKind) -> Option<StructureKind> {
        match kind {
            TokenKind::Building => Some(StructureKind::Building),
            TokenKind::Floor => Some(StructureKind::Floor),
            TokenKind::Step => Some(StructureKind::Step),
            TokenKind::Riser => Some(StructureKind::Riser),
            _ => None,
        }
    }

    /// Building is 0, riser is 3.
    pub fn depth(&self) -> u8 {
        *self as u8
    }

    /// Whether `belongs to:`, `expects:` and `returns:` may follow the header.
    pub fn accepts_clauses(&self) -> bool {
        matches!(self, StructureKind::Step | StructureKind::Riser)
    }
}

impl Display for StructureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureKind::Building => write!(f, "building"),
            StructureKind::Floor => write!(f, "floor"),
            StructureKind::Step => write!(f, "step"),
            StructureKind::Riser => write!(f, "riser"),
        }
    }
}

/// A `building:`, `floor:`, `step:` or `riser:` section.
///
/// The section runs until the next header of equal or outer rank. Its own
/// statements always come before its first child in the source, so `body`
/// and `children` together keep source order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDef {
    pub kind: StructureKind,
    pub name: String,
    pub clauses: Option<StepClauses>,
    pub body: Vec<Stmt>,
    pub children: Vec<StructureDef>,
    pub span: Span,
}

/// The signature lines directly under a step or riser header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepClauses {
    pub belongs_to: Option<String>,
    pub expects: Vec<Parameter>,
    /// Name given to the result in `returns: NAME as TYPE`
    pub returns_name: Option<String>,
    pub returns: Option<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    /// `None` when no type was written, or it was not recognised
    pub ty: Option<Type>,
    pub default: Option<Expr>,
    pub span: Span,
}
