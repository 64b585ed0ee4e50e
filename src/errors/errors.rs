use std::fmt::Display;

use thiserror::Error;

use crate::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A problem found in the source, with the span it points at.
#[derive(Error, Debug, Clone)]
#[error("{internal_error}")]
pub struct Diagnostic {
    severity: Severity,
    internal_error: ErrorImpl,
    span: Span,
}

impl Diagnostic {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Diagnostic {
            severity: error_impl.default_severity(),
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// The human-readable message.
    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedCharacter { .. } => "UnrecognisedCharacter",
            ErrorImpl::InvalidEscape { .. } => "InvalidEscape",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedBlockComment => "UnterminatedBlockComment",
            ErrorImpl::ExpectedIdentifier { .. } => "ExpectedIdentifier",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::ExpectedEndOfStatement { .. } => "ExpectedEndOfStatement",
            ErrorImpl::ExpectedExpression { .. } => "ExpectedExpression",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::WrongKeyword { .. } => "WrongKeyword",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::MisplacedClause { .. } => "MisplacedClause",
            ErrorImpl::EmptyBlock { .. } => "EmptyBlock",
            ErrorImpl::DuplicateClause { .. } => "DuplicateClause",
            ErrorImpl::TrailingComma => "TrailingComma",
            ErrorImpl::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }

    /// Stable diagnostic code, e.g. `E104`.
    pub fn get_code(&self) -> &'static str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedCharacter { .. } => "E101",
            ErrorImpl::InvalidEscape { .. } => "E103",
            ErrorImpl::UnterminatedString => "E104",
            ErrorImpl::UnterminatedBlockComment => "E106",
            ErrorImpl::ExpectedIdentifier { .. } => "E201",
            ErrorImpl::ExpectedToken { .. } => "E202",
            ErrorImpl::ExpectedEndOfStatement { .. } => "E203",
            ErrorImpl::ExpectedExpression { .. } => "E205",
            ErrorImpl::UnexpectedToken { .. } => "E207",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "E207",
            ErrorImpl::WrongKeyword { .. } => "E208",
            ErrorImpl::UnknownType { .. } => "E209",
            ErrorImpl::MisplacedClause { .. } => "E210",
            ErrorImpl::EmptyBlock { .. } => "E211",
            ErrorImpl::DuplicateClause { .. } => "E212",
            ErrorImpl::TrailingComma => "E213",
            ErrorImpl::UnexpectedEndOfInput => "E214",
            ErrorImpl::NumberParseError { .. } => "E215",
            ErrorImpl::NestingTooDeep { .. } => "E216",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedCharacter { character } => match character.as_str() {
                "<" => ErrorTip::Suggestion(String::from("write 'is less than'")),
                ">" => ErrorTip::Suggestion(String::from("write 'is greater than'")),
                "!" => ErrorTip::Suggestion(String::from("write 'not'")),
                "&" => ErrorTip::Suggestion(String::from("write 'and'")),
                "|" => ErrorTip::Suggestion(String::from("write 'or'")),
                "'" => ErrorTip::Suggestion(String::from("text uses double quotes")),
                "{" | "}" | ";" => ErrorTip::Suggestion(String::from(
                    "blocks start with ':' and statements end at the end of the line",
                )),
                _ => ErrorTip::None,
            },
            ErrorImpl::InvalidEscape { .. } => ErrorTip::Suggestion(String::from(
                "supported escapes are \\n, \\t, \\r, \\\\ and \\\"",
            )),
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("add a closing \" before the end of the line"))
            }
            ErrorImpl::UnterminatedBlockComment => ErrorTip::Suggestion(String::from(
                "finish the block with a line containing only 'end note'",
            )),
            ErrorImpl::ExpectedToken { expected, .. } if expected == ":" => {
                ErrorTip::Suggestion(String::from("block headers end with a colon"))
            }
            ErrorImpl::WrongKeyword { correct, .. } => {
                ErrorTip::Suggestion(format!("write '{}'", correct))
            }
            ErrorImpl::UnknownType { type_ } => match suggest_type(type_) {
                Some(correct) => ErrorTip::Suggestion(format!("did you mean '{}'?", correct)),
                None => ErrorTip::Suggestion(String::from(
                    "known types: number, text, boolean, list, table, fixed",
                )),
            },
            ErrorImpl::MisplacedClause { .. } => ErrorTip::Suggestion(String::from(
                "move it directly under the step or riser header",
            )),
            ErrorImpl::TrailingComma => ErrorTip::Suggestion(String::from("remove the last comma")),
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("`{}` is not a valid number", token))
            }
            ErrorImpl::NestingTooDeep { .. } => ErrorTip::Suggestion(String::from(
                "move part of it into a separate step or a variable",
            )),
            _ => ErrorTip::None,
        }
    }
}

/// Maps a type name from another language onto its Steps spelling.
pub fn suggest_type(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "string" | "str" => Some("text"),
        "int" | "integer" | "float" | "double" | "decimal" => Some("number"),
        "bool" => Some("boolean"),
        "array" | "vec" | "vector" => Some("list"),
        "dict" | "dictionary" | "map" | "hashmap" | "object" => Some("table"),
        "const" | "constant" | "final" => Some("fixed"),
        _ => None,
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("Unexpected character '{character}'. Steps doesn't use this symbol.")]
    UnrecognisedCharacter { character: String },
    #[error("Unknown escape sequence '{sequence}' in text.")]
    InvalidEscape { sequence: String },
    #[error("String starting here was never closed.")]
    UnterminatedString,
    #[error("Note block starting here was never closed with 'end note'.")]
    UnterminatedBlockComment,
    #[error("Expected a name here, but found '{found}'.")]
    ExpectedIdentifier { found: String },
    #[error("Expected '{expected}' here, but found '{found}'.")]
    ExpectedToken { expected: String, found: String },
    #[error("Expected end of line after the statement, but found '{found}'.")]
    ExpectedEndOfStatement { found: String },
    #[error("Expected a value here, but found '{found}'.")]
    ExpectedExpression { found: String },
    #[error("Unexpected '{token}' here.")]
    UnexpectedToken { token: String },
    #[error("Unexpected '{token}' here: {message}.")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("Steps uses '{correct}' instead of '{found}'.")]
    WrongKeyword { found: String, correct: String },
    #[error("Unknown type '{type_}'.")]
    UnknownType { type_: String },
    #[error("'{clause}' is only allowed directly after a step or riser header.")]
    MisplacedClause { clause: String },
    #[error("'{keyword}' has an empty body.")]
    EmptyBlock { keyword: String },
    #[error("'{clause}' is given more than once, the first one is kept.")]
    DuplicateClause { clause: String },
    #[error("A list cannot end with a comma.")]
    TrailingComma,
    #[error("Unexpected end of input.")]
    UnexpectedEndOfInput,
    #[error("Could not read the number '{token}'.")]
    NumberParseError { token: String },
    #[error("Nested more than {limit} levels deep.")]
    NestingTooDeep { limit: usize },
}

impl ErrorImpl {
    pub fn default_severity(&self) -> Severity {
        match self {
            ErrorImpl::EmptyBlock { .. } | ErrorImpl::DuplicateClause { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
