use std::fmt::Display;

use crate::{lexer::tokens::TokenKind, Span};

use super::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
    Boolean(bool),
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    IsEqualTo,
    Equals,
    IsNotEqualTo,
    Contains,
    StartsWith,
    EndsWith,
    IsIn,
    IsLessThan,
    IsGreaterThan,
    IsLessThanOrEqualTo,
    IsGreaterThanOrEqualTo,
    Add,
    Subtract,
    AddedTo,
    SplitBy,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOperator> {
        let operator = match kind {
            TokenKind::Or => BinaryOperator::Or,
            TokenKind::And => BinaryOperator::And,
            TokenKind::IsEqualTo => BinaryOperator::IsEqualTo,
            TokenKind::Equals => BinaryOperator::Equals,
            TokenKind::IsNotEqualTo => BinaryOperator::IsNotEqualTo,
            TokenKind::Contains => BinaryOperator::Contains,
            TokenKind::StartsWith => BinaryOperator::StartsWith,
            TokenKind::EndsWith => BinaryOperator::EndsWith,
            TokenKind::IsIn => BinaryOperator::IsIn,
            TokenKind::IsLessThan => BinaryOperator::IsLessThan,
            TokenKind::IsGreaterThan => BinaryOperator::IsGreaterThan,
            TokenKind::IsLessThanOrEqualTo => BinaryOperator::IsLessThanOrEqualTo,
            TokenKind::IsGreaterThanOrEqualTo => BinaryOperator::IsGreaterThanOrEqualTo,
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Subtract,
            TokenKind::AddedTo => BinaryOperator::AddedTo,
            TokenKind::SplitBy => BinaryOperator::SplitBy,
            TokenKind::Star => BinaryOperator::Multiply,
            TokenKind::Slash => BinaryOperator::Divide,
            TokenKind::Percent | TokenKind::Modulo => BinaryOperator::Modulo,
            _ => return None,
        };
        Some(operator)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Or => "or",
            BinaryOperator::And => "and",
            BinaryOperator::IsEqualTo => "is equal to",
            BinaryOperator::Equals => "equals",
            BinaryOperator::IsNotEqualTo => "is not equal to",
            BinaryOperator::Contains => "contains",
            BinaryOperator::StartsWith => "starts with",
            BinaryOperator::EndsWith => "ends with",
            BinaryOperator::IsIn => "is in",
            BinaryOperator::IsLessThan => "is less than",
            BinaryOperator::IsGreaterThan => "is greater than",
            BinaryOperator::IsLessThanOrEqualTo => "is less than or equal to",
            BinaryOperator::IsGreaterThanOrEqualTo => "is greater than or equal to",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::AddedTo => "added to",
            BinaryOperator::SplitBy => "split by",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "modulo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    LengthOf,
    Negate,
    TypeOf,
}

impl UnaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<UnaryOperator> {
        match kind {
            TokenKind::Not => Some(UnaryOperator::Not),
            TokenKind::LengthOf => Some(UnaryOperator::LengthOf),
            TokenKind::Minus => Some(UnaryOperator::Negate),
            TokenKind::TypeOf => Some(UnaryOperator::TypeOf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "not",
            UnaryOperator::LengthOf => "length of",
            UnaryOperator::Negate => "-",
            UnaryOperator::TypeOf => "type of",
        }
    }
}

/// A call to a named step or riser.
///
/// As an expression (`total(a, b)`) only `callee` and `arguments` are set.
/// The `call` statement may also name a variable receiving the result.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: String,
    pub arguments: Vec<Expr>,
    pub storing_result_in: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal {
        value: Literal,
        span: Span,
    },
    Identifier {
        name: String,
        span: Span,
    },
    /// A line read from the user, as in `set name to input`
    Input {
        span: Span,
    },
    List {
        elements: Vec<Expr>,
        span: Span,
    },
    /// `[key: value, ...]`, or `[:]` when empty
    Table {
        entries: Vec<(Expr, Expr)>,
        span: Span,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expr>,
        span: Span,
    },
    Call(CallExpr),
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    Parenthesized {
        inner: Box<Expr>,
        span: Span,
    },
    /// `character at INDEX of TEXT`
    CharacterAt {
        index: Box<Expr>,
        text: Box<Expr>,
        span: Span,
    },
    /// `EXPR is a TYPE`
    TypeCheck {
        operand: Box<Expr>,
        ty: Type,
        span: Span,
    },
    /// `EXPR as TYPE`, with `ty` empty when the type word was not recognised
    Conversion {
        operand: Box<Expr>,
        ty: Option<Type>,
        span: Span,
    },
    /// `EXPR as decimal(PLACES)`
    FormatNumber {
        operand: Box<Expr>,
        places: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal { span, .. }
            | Expr::Identifier { span, .. }
            | Expr::Input { span }
            | Expr::List { span, .. }
            | Expr::Table { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Index { span, .. }
            | Expr::Parenthesized { span, .. }
            | Expr::CharacterAt { span, .. }
            | Expr::TypeCheck { span, .. }
            | Expr::Conversion { span, .. }
            | Expr::FormatNumber { span, .. } => span,
            Expr::Call(call) => &call.span,
        }
    }
}

fn write_all(f: &mut std::fmt::Formatter<'_>, exprs: &[Expr]) -> std::fmt::Result {
    for expr in exprs {
        write!(f, " {}", expr)?;
    }
    Ok(())
}

/// Prefix form used for inspecting trees, e.g. `(+ 2 (* 3 4))`.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal { value, .. } => match value {
                Literal::Number(number) => write!(f, "{}", number),
                Literal::Text(text) => write!(f, "{:?}", text),
                Literal::Boolean(boolean) => write!(f, "{}", boolean),
                Literal::Nothing => write!(f, "nothing"),
            },
            Expr::Identifier { name, .. } => write!(f, "{}", name),
            Expr::Input { .. } => write!(f, "input"),
            Expr::List { elements, .. } => {
                write!(f, "(list")?;
                write_all(f, elements)?;
                write!(f, ")")
            }
            Expr::Table { entries, .. } => {
                write!(f, "(table")?;
                for (key, value) in entries {
                    write!(f, " ({} {})", key, value)?;
                }
                write!(f, ")")
            }
            Expr::Binary {
                operator,
                left,
                right,
                ..
            } => write!(f, "({} {} {})", operator.as_str(), left, right),
            Expr::Unary {
                operator, operand, ..
            } => write!(f, "({} {})", operator.as_str(), operand),
            Expr::Call(call) => {
                write!(f, "(call {}", call.callee)?;
                write_all(f, &call.arguments)?;
                write!(f, ")")
            }
            Expr::Index { base, index, .. } => write!(f, "(index {} {})", base, index),
            Expr::Parenthesized { inner, .. } => write!(f, "(group {})", inner),
            Expr::CharacterAt { index, text, .. } => {
                write!(f, "(character at {} {})", index, text)
            }
            Expr::TypeCheck { operand, ty, .. } => write!(f, "(is a {} {})", ty, operand),
            Expr::Conversion { operand, ty, .. } => match ty {
                Some(ty) => write!(f, "(as {} {})", operand, ty),
                None => write!(f, "(as {} ?)", operand),
            },
            Expr::FormatNumber {
                operand, places, ..
            } => write!(f, "(as {} decimal {})", operand, places),
        }
    }
}
