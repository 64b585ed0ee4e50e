//! Integration tests for end-to-end parsing.
//!
//! These tests run whole Steps programs through the public entry points,
//! from source text through tokenization and parsing to rendered diagnostics.

use steps::{
    ast::{
        ast::{Item, StructureKind},
        statements::Stmt,
        types::Type,
    },
    errors::render::render_diagnostic,
    lexer::{lexer::tokenize, tokens::TokenKind},
    parse,
};

const INVENTORY: &str = "\
building: inventory_app
    note: keeps track of items

    floor: storage
        step: add_item
            belongs to: storage
            expects: item as text, quantity as number = 1
            returns: boolean
            declare:
                current as list
            do:
                if quantity is less than 1:
                    display \"nothing to add\"
                    return false
                repeat quantity times:
                    add item to current
                return true

        step: count_items
            expects: items as list
            returns: number
            return length of items

    floor: reports
        step: summary
            declare:
                total as number = 0
            do:
                for each entry in [1, 2, 3]:
                    set total to total + entry
                attempt:
                    display total / 0
                if unsuccessful:
                    display \"could not divide\"
                display \"total: \" added to total as text
";

#[test]
fn test_parse_complete_program() {
    let (program, diagnostics) = parse(INVENTORY);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);

    let buildings: Vec<_> = program.structures().collect();
    assert_eq!(buildings.len(), 1);

    let app = buildings[0];
    assert_eq!(app.kind, StructureKind::Building);
    assert_eq!(app.name, "inventory_app");
    assert!(matches!(app.body.as_slice(), [Stmt::Comment { .. }]));
    assert_eq!(app.children.len(), 2);

    let storage = &app.children[0];
    assert_eq!(storage.name, "storage");
    assert_eq!(storage.children.len(), 2);

    let add_item = &storage.children[0];
    let clauses = add_item.clauses.as_ref().expect("add_item has clauses");
    assert_eq!(clauses.belongs_to.as_deref(), Some("storage"));
    assert_eq!(clauses.expects.len(), 2);
    assert_eq!(clauses.expects[1].ty, Some(Type::Number));
    assert!(clauses.expects[1].default.is_some());
    assert_eq!(clauses.returns, Some(Type::Boolean));
    assert_eq!(add_item.body.len(), 6);
    assert!(matches!(add_item.body[3], Stmt::If { ref body, .. } if body.len() == 2));
    assert!(matches!(add_item.body[4], Stmt::Repeat { .. }));

    let summary = &app.children[1].children[0];
    assert_eq!(summary.name, "summary");
    assert_eq!(summary.body.len(), 6);
    assert!(matches!(summary.body[3], Stmt::ForEach { .. }));
    assert!(matches!(
        summary.body[4],
        Stmt::Attempt { ref unsuccessful, then_continue: None, .. } if unsuccessful.len() == 1
    ));
    match &summary.body[5] {
        Stmt::Display { value, .. } => {
            assert_eq!(value.to_string(), "(added to \"total: \" (as total text))")
        }
        other => panic!("expected a display, got {:?}", other),
    }
}

#[test]
fn test_structure_spans_cover_their_bodies() {
    let (program, _) = parse(INVENTORY);
    let app = program.structures().next().expect("a building");
    let storage = &app.children[0];
    let reports = &app.children[1];

    assert_eq!(app.span.start.line, 1);
    assert_eq!(storage.span.start.line, 4);
    assert!(storage.span.end.offset <= reports.span.start.offset);
    assert_eq!(app.span.end, reports.span.end);
}

#[test]
fn test_collects_every_error() {
    let source = "\
step: broken
    display \"unclosed
    set x 5
    print x
    display 0
    returns: number
display 1
";
    let (program, diagnostics) = parse(source);
    let codes: Vec<_> = diagnostics.iter().map(|diagnostic| diagnostic.get_code()).collect();

    assert_eq!(codes, vec!["E104", "E202", "E208", "E210"]);

    let step = program.structures().next().expect("a step");
    assert_eq!(step.body.len(), 2);
    assert!(step.clauses.is_none());

    for diagnostic in &diagnostics {
        let report = render_diagnostic(diagnostic, source, Some("broken.steps"));
        assert!(report.contains("-> broken.steps"));
        assert!(report.lines().count() == 5, "unexpected report:\n{}", report);
    }
}

#[test]
fn test_top_level_statements() {
    let (program, diagnostics) = parse("display \"hello\"\nstep: main\n    display 1");

    assert!(diagnostics.is_empty());
    assert_eq!(program.items.len(), 2);
    assert!(matches!(program.items[0], Item::Statement(Stmt::Display { .. })));
    assert!(matches!(program.items[1], Item::Structure(_)));
}

#[test]
fn test_empty_source() {
    let (program, diagnostics) = parse("");

    assert!(program.items.is_empty());
    assert!(diagnostics.is_empty());
    assert_eq!(tokenize("").len(), 1);
}

#[test]
fn test_tokenize_program() {
    let tokens = tokenize("step: greet\n    display \"hi\"");
    let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Step,
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Display,
            TokenKind::String,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_garbage_input_terminates() {
    let inputs = [
        "}{;<>",
        "if if if",
        "step: step: step:",
        "[[[[",
        "\"",
        "note block:\nnever closed",
        "otherwise otherwise",
        ":::",
        "attempt: if unsuccessful: then continue:",
        "call",
        "expects: a as",
        "repeat for each",
    ];

    for input in inputs {
        let (_, diagnostics) = parse(input);
        assert!(!diagnostics.is_empty(), "no diagnostics for {:?}", input);
        for diagnostic in &diagnostics {
            assert!(diagnostic.get_span().end.offset as usize <= input.len());
        }
    }
}
