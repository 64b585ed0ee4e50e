//! Unit tests for the lexer module.
//!
//! Covers:
//! - Single reserved words and multi-word phrases
//! - Colon keywords and the placement rule for `for each`
//! - Text literals with escapes, numbers and illegal characters
//! - Line and block notes
//! - Positions, lookahead and restarting

use super::{
    lexer::{tokenize, tokenize_with_diagnostics, Lexer},
    tokens::TokenKind,
};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).iter().map(|token| token.kind).collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "set to call with display input return exit repeat times in while add remove from";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Set,
            TokenKind::To,
            TokenKind::Call,
            TokenKind::With,
            TokenKind::Display,
            TokenKind::Input,
            TokenKind::Return,
            TokenKind::Exit,
            TokenKind::Repeat,
            TokenKind::Times,
            TokenKind::In,
            TokenKind::While,
            TokenKind::Add,
            TokenKind::Remove,
            TokenKind::From,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_operator_words_and_literals() {
    let source = "and or not equals contains modulo of true false nothing";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::Equals,
            TokenKind::Contains,
            TokenKind::Modulo,
            TokenKind::Of,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Nothing,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_type_words() {
    assert_eq!(
        kinds("number text boolean list table fixed as"),
        vec![
            TokenKind::NumberType,
            TokenKind::TextType,
            TokenKind::BooleanType,
            TokenKind::ListType,
            TokenKind::TableType,
            TokenKind::Fixed,
            TokenKind::As,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("total_price _hidden Count2 display_name");

    assert!(tokens[..4]
        .iter()
        .all(|token| token.kind == TokenKind::Identifier));
    assert_eq!(tokens[0].value, "total_price");
    assert_eq!(tokens[3].value, "display_name");
}

#[test]
fn test_longest_phrase_wins() {
    let tokens = tokenize("a is less than or equal to b");

    assert_eq!(tokens[1].kind, TokenKind::IsLessThanOrEqualTo);
    assert_eq!(tokens[1].value, "is less than or equal to");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "b");
}

#[test]
fn test_phrase_falls_back_to_shorter_match() {
    assert_eq!(
        kinds("a is less than or b"),
        vec![
            TokenKind::Identifier,
            TokenKind::IsLessThan,
            TokenKind::Or,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_incomplete_phrase_is_identifiers() {
    assert_eq!(
        kinds("is a"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::EOF]
    );
    assert_eq!(
        kinds("is inside"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::EOF]
    );
}

#[test]
fn test_comparison_phrases() {
    assert_eq!(
        kinds("is equal to is not equal to is greater than is greater than or equal to is in"),
        vec![
            TokenKind::IsEqualTo,
            TokenKind::IsNotEqualTo,
            TokenKind::IsGreaterThan,
            TokenKind::IsGreaterThanOrEqualTo,
            TokenKind::IsIn,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_expression_phrases() {
    assert_eq!(
        kinds("starts with ends with added to split by length of type of character at"),
        vec![
            TokenKind::StartsWith,
            TokenKind::EndsWith,
            TokenKind::AddedTo,
            TokenKind::SplitBy,
            TokenKind::LengthOf,
            TokenKind::TypeOf,
            TokenKind::CharacterAt,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_type_check_phrases() {
    assert_eq!(
        kinds("x is a number"),
        vec![TokenKind::Identifier, TokenKind::IsANumber, TokenKind::EOF]
    );
    assert_eq!(
        kinds("x is a table"),
        vec![TokenKind::Identifier, TokenKind::IsATable, TokenKind::EOF]
    );
}

#[test]
fn test_phrase_words_may_be_separated_by_tabs() {
    let tokens = tokenize("a is\tequal  to b");

    assert_eq!(tokens[1].kind, TokenKind::IsEqualTo);
    assert_eq!(tokens[1].value, "is\tequal  to");
}

#[test]
fn test_phrase_does_not_cross_lines() {
    assert_eq!(
        kinds("a is\nequal to b"),
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Identifier,
            TokenKind::To,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_colon_keywords() {
    let tokens = tokenize("step: Greet");

    assert_eq!(tokens[0].kind, TokenKind::Step);
    assert_eq!(tokens[0].value, "step:");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "Greet");

    assert_eq!(kinds("floor :")[0], TokenKind::Floor);
    assert_eq!(kinds("belongs to: Main")[0], TokenKind::BelongsTo);
    assert_eq!(kinds("attempt:")[0], TokenKind::Attempt);
    assert_eq!(kinds("then continue:")[0], TokenKind::ThenContinue);
    assert_eq!(kinds("do:")[0], TokenKind::Do);
    assert_eq!(kinds("declare:")[0], TokenKind::Declare);
}

#[test]
fn test_header_words_without_colon_are_identifiers() {
    assert_eq!(
        kinds("step = floor + riser"),
        vec![
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_if_unsuccessful_needs_colon() {
    assert_eq!(kinds("if unsuccessful:")[0], TokenKind::IfUnsuccessful);
    assert_eq!(
        kinds("if unsuccessful"),
        vec![TokenKind::If, TokenKind::Identifier, TokenKind::EOF]
    );
    assert_eq!(
        kinds("if ready:"),
        vec![
            TokenKind::If,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_otherwise_forms() {
    assert_eq!(
        kinds("otherwise if x: otherwise:"),
        vec![
            TokenKind::OtherwiseIf,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Otherwise,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_for_each_at_statement_start() {
    assert_eq!(
        kinds("for each item in items:"),
        vec![
            TokenKind::ForEach,
            TokenKind::Identifier,
            TokenKind::In,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_for_each_inside_expression_is_identifiers() {
    let tokens = tokenize("display for each");

    assert_eq!(tokens[0].kind, TokenKind::Display);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "for");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "each");
}

#[test]
fn test_for_each_needs_a_loop_header() {
    assert_eq!(
        kinds("for each = 1"),
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::EOF,
        ]
    );
    assert_eq!(kinds("for each\n")[0], TokenKind::Identifier);
    assert_eq!(kinds("for each item\n")[0], TokenKind::Identifier);
    assert_eq!(kinds("for each item inside")[0], TokenKind::Identifier);
    assert_eq!(kinds("for  each\titem  in items:")[0], TokenKind::ForEach);
}

#[test]
fn test_unicode_identifiers() {
    let (tokens, diagnostics) = tokenize_with_diagnostics("café = größe\nlength of 名前");

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "café");
    assert_eq!(tokens[0].span.end.column, 5);
    assert_eq!(tokens[2].value, "größe");
    assert_eq!(tokens[4].kind, TokenKind::LengthOf);
    assert_eq!(tokens[5].kind, TokenKind::Identifier);
    assert_eq!(tokens[5].value, "名前");
}

#[test]
fn test_for_each_after_repeat_colon_and_newline() {
    assert_eq!(kinds("repeat for each x in xs:")[1], TokenKind::ForEach);
    assert_eq!(kinds("if ready: for each x in xs:")[3], TokenKind::ForEach);
    assert_eq!(kinds("display 1\nfor each x in xs:")[3], TokenKind::ForEach);
}

#[test]
fn test_newlines_are_tokens() {
    assert_eq!(
        kinds("a\n\nb"),
        vec![
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Newline,
            TokenKind::Identifier,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) [ ] , : = + - * / %"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Assignment,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_numbers() {
    let (tokens, diagnostics) = tokenize_with_diagnostics("42 3.14 7.");

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[2].value, "7");
    assert_eq!(tokens[3].kind, TokenKind::Error);
    assert_eq!(tokens[3].value, ".");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_code(), "E101");
}

#[test]
fn test_tokenize_string_with_escapes() {
    let (tokens, diagnostics) = tokenize_with_diagnostics(r#""say \"hi\"\tnow\\""#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "say \"hi\"\tnow\\");
    assert_eq!(tokens[1].kind, TokenKind::EOF);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_string_keeps_interior_whitespace() {
    let tokens = tokenize("\"a   b\tc\"");

    assert_eq!(tokens[0].value, "a   b\tc");
}

#[test]
fn test_invalid_escape_is_reported() {
    let (tokens, diagnostics) = tokenize_with_diagnostics(r#""a\qb""#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "a\\qb");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_code(), "E103");
    assert_eq!(diagnostics[0].get_span().start.column, 3);
    assert_eq!(diagnostics[0].get_span().len(), 2);
}

#[test]
fn test_unterminated_string() {
    let (tokens, diagnostics) = tokenize_with_diagnostics("display \"abc\ndisplay 1");

    assert_eq!(
        tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![
            TokenKind::Display,
            TokenKind::Error,
            TokenKind::Newline,
            TokenKind::Display,
            TokenKind::Number,
            TokenKind::EOF,
        ]
    );
    assert_eq!(tokens[1].value, "\"abc");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_code(), "E104");
    assert_eq!(diagnostics[0].get_span().start.column, 9);
}

#[test]
fn test_unrecognised_character() {
    let (tokens, diagnostics) = tokenize_with_diagnostics("x @ y");

    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert_eq!(tokens[1].value, "@");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_error_name(), "UnrecognisedCharacter");
}

#[test]
fn test_line_note_is_prose() {
    let tokens = tokenize("note: declare: x as number\ndisplay x");

    assert_eq!(tokens[0].kind, TokenKind::Note);
    assert_eq!(tokens[0].value, "declare: x as number");
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!(tokens[2].kind, TokenKind::Display);
}

#[test]
fn test_block_note() {
    let source = "note block:\nstep: not a step\n  if x:\n  end note\ndisplay 1";
    let (tokens, diagnostics) = tokenize_with_diagnostics(source);

    assert_eq!(tokens[0].kind, TokenKind::NoteBlock);
    assert_eq!(tokens[0].value, "step: not a step\n  if x:");
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!(tokens[2].kind, TokenKind::Display);
    assert_eq!(tokens[3].kind, TokenKind::Number);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_block_note_keeps_header_text() {
    let tokens = tokenize("note block: first\nsecond\nend note");

    assert_eq!(tokens[0].value, "first\nsecond");
    assert_eq!(tokens[1].kind, TokenKind::EOF);
}

#[test]
fn test_unterminated_block_note() {
    let (tokens, diagnostics) = tokenize_with_diagnostics("note block:\nabc\ndef");

    assert_eq!(tokens[0].kind, TokenKind::NoteBlock);
    assert_eq!(tokens[0].value, "abc\ndef");
    assert_eq!(tokens[1].kind, TokenKind::EOF);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].get_code(), "E106");
    assert_eq!(diagnostics[0].get_span().start.offset, 0);
}

#[test]
fn test_token_positions() {
    let tokens = tokenize("set x to 1\n  display x");
    let display = &tokens[5];

    assert_eq!(display.kind, TokenKind::Display);
    assert_eq!(display.span.start.offset, 13);
    assert_eq!(display.span.start.line, 2);
    assert_eq!(display.span.start.column, 3);
    assert_eq!(display.span.len(), 7);
}

#[test]
fn test_columns_count_characters() {
    let tokens = tokenize("\"éé\" x");

    assert_eq!(tokens[1].span.start.offset, 7);
    assert_eq!(tokens[1].span.start.column, 6);
}

#[test]
fn test_peek_does_not_consume() {
    let mut lexer = Lexer::new("set x");

    assert_eq!(lexer.peek_token().kind, TokenKind::Set);
    assert_eq!(lexer.peek_token().kind, TokenKind::Set);
    assert_eq!(lexer.next_token().kind, TokenKind::Set);
    assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
    assert_eq!(lexer.next_token().kind, TokenKind::EOF);
    assert_eq!(lexer.next_token().kind, TokenKind::EOF);
}

#[test]
fn test_reset_restarts_the_stream() {
    let mut lexer = Lexer::new("display @");

    let first: Vec<TokenKind> = lexer.by_ref().map(|token| token.kind).collect();
    assert_eq!(lexer.take_diagnostics().len(), 1);

    lexer.reset();
    let second: Vec<TokenKind> = lexer.by_ref().map(|token| token.kind).collect();

    assert_eq!(first, second);
    assert_eq!(lexer.take_diagnostics().len(), 1);
}

#[test]
fn test_empty_source() {
    let tokens = tokenize("");

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::EOF);
}
