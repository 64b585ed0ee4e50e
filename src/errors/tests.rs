//! Unit tests for error handling.
//!
//! This module contains tests for diagnostic codes, severities, tips and the
//! caret report.

use crate::errors::errors::{suggest_type, Diagnostic, ErrorImpl, ErrorTip, Severity};
use crate::errors::render::render_diagnostic;
use crate::{parse, Position, Span};

fn span_at(offset: u32, line: u32, column: u32) -> Span {
    Span::at(Position::new(offset, line, column))
}

#[test]
fn test_diagnostic_creation() {
    let diagnostic = Diagnostic::new(
        ErrorImpl::UnrecognisedCharacter {
            character: "@".to_string(),
        },
        span_at(10, 1, 11),
    );

    assert!(matches!(
        diagnostic.get_error(),
        ErrorImpl::UnrecognisedCharacter { .. }
    ));
    assert_eq!(diagnostic.get_error_name(), "UnrecognisedCharacter");
    assert_eq!(diagnostic.get_code(), "E101");
    assert_eq!(diagnostic.get_span().start.offset, 10);
    assert!(diagnostic.is_error());
}

#[test]
fn test_diagnostic_message() {
    let diagnostic = Diagnostic::new(
        ErrorImpl::ExpectedToken {
            expected: ":".to_string(),
            found: "end of line".to_string(),
        },
        span_at(0, 1, 1),
    );

    assert_eq!(
        diagnostic.message(),
        "Expected ':' here, but found 'end of line'."
    );
    assert_eq!(diagnostic.to_string(), diagnostic.message());
}

#[test]
fn test_warning_severity() {
    let empty = Diagnostic::new(
        ErrorImpl::EmptyBlock {
            keyword: "if".to_string(),
        },
        span_at(0, 1, 1),
    );
    let duplicate = Diagnostic::new(
        ErrorImpl::DuplicateClause {
            clause: "returns:".to_string(),
        },
        span_at(0, 1, 1),
    );

    assert_eq!(empty.get_severity(), Severity::Warning);
    assert_eq!(duplicate.get_severity(), Severity::Warning);
    assert!(!empty.is_error());
    assert_eq!(Severity::Warning.to_string(), "warning");
}

#[test]
fn test_codes_are_shared_by_detailed_variant() {
    let plain = Diagnostic::new(
        ErrorImpl::UnexpectedToken {
            token: ")".to_string(),
        },
        span_at(0, 1, 1),
    );
    let detailed = Diagnostic::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: "otherwise".to_string(),
            message: "it must follow the body of an 'if'".to_string(),
        },
        span_at(0, 1, 1),
    );

    assert_eq!(plain.get_code(), "E207");
    assert_eq!(detailed.get_code(), "E207");
    assert_ne!(plain.get_error_name(), detailed.get_error_name());
}

#[test]
fn test_nesting_too_deep() {
    let diagnostic = Diagnostic::new(ErrorImpl::NestingTooDeep { limit: 100 }, span_at(0, 1, 1));

    assert_eq!(diagnostic.get_code(), "E216");
    assert_eq!(diagnostic.message(), "Nested more than 100 levels deep.");
    assert!(diagnostic.is_error());
}

#[test]
fn test_error_tip_none() {
    let diagnostic = Diagnostic::new(ErrorImpl::UnexpectedEndOfInput, span_at(0, 1, 1));

    assert!(matches!(diagnostic.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_for_symbols() {
    let diagnostic = Diagnostic::new(
        ErrorImpl::UnrecognisedCharacter {
            character: "<".to_string(),
        },
        span_at(0, 1, 1),
    );

    match diagnostic.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("is less than")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_for_missing_colon() {
    let diagnostic = Diagnostic::new(
        ErrorImpl::ExpectedToken {
            expected: ":".to_string(),
            found: "end of line".to_string(),
        },
        span_at(0, 1, 1),
    );

    assert_eq!(
        diagnostic.get_tip().to_string(),
        "block headers end with a colon"
    );
}

#[test]
fn test_error_tip_for_unknown_type() {
    let known = Diagnostic::new(
        ErrorImpl::UnknownType {
            type_: "string".to_string(),
        },
        span_at(0, 1, 1),
    );
    assert_eq!(known.get_tip().to_string(), "did you mean 'text'?");

    let unknown = Diagnostic::new(
        ErrorImpl::UnknownType {
            type_: "Widget".to_string(),
        },
        span_at(0, 1, 1),
    );
    assert!(unknown.get_tip().to_string().starts_with("known types"));
}

#[test]
fn test_suggest_type() {
    assert_eq!(suggest_type("Int"), Some("number"));
    assert_eq!(suggest_type("bool"), Some("boolean"));
    assert_eq!(suggest_type("dict"), Some("table"));
    assert_eq!(suggest_type("widget"), None);
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_render_diagnostic() {
    let source = "x = 1\ndisplay \"abc";
    let (_, diagnostics) = parse(source);
    assert_eq!(diagnostics.len(), 1);

    let report = render_diagnostic(&diagnostics[0], source, Some("main.steps"));
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(
        lines,
        vec![
            "error[E104]: String starting here was never closed. (add a closing \" before the end of the line)",
            "-> main.steps",
            "  |",
            "2 | display \"abc",
            "  | --------^",
        ]
    );
}

#[test]
fn test_render_strips_indentation() {
    let source = "x = 1\n    display @";
    let (_, diagnostics) = parse(source);
    assert_eq!(diagnostics.len(), 1);

    let report = render_diagnostic(&diagnostics[0], source, None);
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(
        lines[0],
        "error[E101]: Unexpected character '@'. Steps doesn't use this symbol."
    );
    assert_eq!(lines[1], "-> <string>");
    assert_eq!(lines[3], "2 | display @");
    assert_eq!(lines[4], "  | --------^");
}

#[test]
fn test_render_warning() {
    let source = "repeat 3 times:";
    let (_, diagnostics) = parse(source);
    assert_eq!(diagnostics.len(), 1);

    let report = render_diagnostic(&diagnostics[0], source, None);
    assert!(report.starts_with("warning[E211]: 'repeat' has an empty body.\n"));
}
