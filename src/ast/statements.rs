use crate::Span;

use super::{
    expressions::{CallExpr, Expr},
    types::Type,
};

/// One `otherwise if` arm of an `if` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ElifClause {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Declare,
    Do,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `declare: NAME as TYPE [fixed] [= EXPR]`, or `NAME as TYPE ...`
    ///
    /// `ty` is `None` when the written type was not recognised.
    Declaration {
        name: String,
        ty: Option<Type>,
        fixed: bool,
        value: Option<Expr>,
        span: Span,
    },
    /// `NAME = EXPR`, `set NAME to EXPR`, and their `NAME[INDEX]` forms
    Assignment {
        target: String,
        index: Option<Expr>,
        value: Expr,
        span: Span,
    },
    Call(CallExpr),
    Display {
        value: Expr,
        span: Span,
    },
    Input {
        name: String,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Exit {
        span: Span,
    },
    If {
        condition: Expr,
        body: Vec<Stmt>,
        elifs: Vec<ElifClause>,
        else_body: Option<Vec<Stmt>>,
        span: Span,
    },
    Repeat {
        count: Expr,
        body: Vec<Stmt>,
        span: Span,
    },
    ForEach {
        variable: String,
        iterable: Expr,
        body: Vec<Stmt>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        span: Span,
    },
    Attempt {
        body: Vec<Stmt>,
        unsuccessful: Vec<Stmt>,
        then_continue: Option<Vec<Stmt>>,
        span: Span,
    },
    /// `add VALUE to TARGET`
    Add {
        value: Expr,
        target: Expr,
        span: Span,
    },
    /// `remove VALUE from TARGET`
    Remove {
        value: Expr,
        target: Expr,
        span: Span,
    },
    Comment {
        text: String,
        span: Span,
    },
    BlockComment {
        text: String,
        span: Span,
    },
    /// A bare `declare:` or `do:` line opening a section of a step
    Section {
        kind: SectionKind,
        span: Span,
    },
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Declaration { span, .. }
            | Stmt::Assignment { span, .. }
            | Stmt::Display { span, .. }
            | Stmt::Input { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Exit { span }
            | Stmt::If { span, .. }
            | Stmt::Repeat { span, .. }
            | Stmt::ForEach { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Attempt { span, .. }
            | Stmt::Add { span, .. }
            | Stmt::Remove { span, .. }
            | Stmt::Comment { span, .. }
            | Stmt::BlockComment { span, .. }
            | Stmt::Section { span, .. } => span,
            Stmt::Call(call) => &call.span,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Stmt::Comment { .. } | Stmt::BlockComment { .. })
    }
}
