use std::collections::HashMap;

use crate::{
    ast::{expressions::Expr, statements::Stmt},
    errors::errors::Diagnostic,
    lexer::tokens::TokenKind,
};

use super::{expr::*, parser::Parser, stmt::*};

/// Operator precedence, weakest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Or,
    And,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Postfix,
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Diagnostic>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Diagnostic>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Diagnostic>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Logical
    parser.led(TokenKind::Or, BindingPower::Or, parse_binary_expr);
    parser.led(TokenKind::And, BindingPower::And, parse_binary_expr);

    // Equality and membership
    parser.led(TokenKind::IsEqualTo, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Equals, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::IsNotEqualTo, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::Contains, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::StartsWith, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::EndsWith, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::IsIn, BindingPower::Equality, parse_binary_expr);
    parser.led(TokenKind::IsANumber, BindingPower::Equality, parse_type_check_expr);
    parser.led(TokenKind::IsAText, BindingPower::Equality, parse_type_check_expr);
    parser.led(TokenKind::IsABoolean, BindingPower::Equality, parse_type_check_expr);
    parser.led(TokenKind::IsAList, BindingPower::Equality, parse_type_check_expr);
    parser.led(TokenKind::IsATable, BindingPower::Equality, parse_type_check_expr);

    // Relational
    parser.led(TokenKind::IsLessThan, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::IsGreaterThan, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::IsLessThanOrEqualTo, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::IsGreaterThanOrEqualTo, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Minus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::AddedTo, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::SplitBy, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Modulo, BindingPower::Multiplicative, parse_binary_expr);

    // Postfix
    parser.led(TokenKind::OpenParen, BindingPower::Postfix, parse_call_expr);
    parser.led(TokenKind::OpenBracket, BindingPower::Postfix, parse_index_expr);
    parser.led(TokenKind::As, BindingPower::Postfix, parse_conversion_expr);

    // Literals and symbols
    parser.nud(TokenKind::Number, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::Nothing, parse_primary_expr);
    parser.nud(TokenKind::Input, parse_primary_expr);
    parser.nud(TokenKind::OpenBracket, parse_collection_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);

    // Prefix
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::LengthOf, parse_prefix_expr);
    parser.nud(TokenKind::Minus, parse_prefix_expr);
    parser.nud(TokenKind::TypeOf, parse_prefix_expr);
    parser.nud(TokenKind::CharacterAt, parse_character_at_expr);

    // Statements
    parser.stmt(TokenKind::Identifier, parse_identifier_stmt);
    parser.stmt(TokenKind::Declare, parse_declare_stmt);
    parser.stmt(TokenKind::Do, parse_do_stmt);
    parser.stmt(TokenKind::Set, parse_set_stmt);
    parser.stmt(TokenKind::Call, parse_call_stmt);
    parser.stmt(TokenKind::Display, parse_display_stmt);
    parser.stmt(TokenKind::Input, parse_input_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::Exit, parse_exit_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::Repeat, parse_repeat_stmt);
    parser.stmt(TokenKind::ForEach, parse_for_each_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::Attempt, parse_attempt_stmt);
    parser.stmt(TokenKind::Add, parse_add_stmt);
    parser.stmt(TokenKind::Remove, parse_remove_stmt);
    parser.stmt(TokenKind::Note, parse_note_stmt);
    parser.stmt(TokenKind::NoteBlock, parse_note_stmt);

    // Closers with nothing open to close
    parser.stmt(TokenKind::OtherwiseIf, parse_stray_closer_stmt);
    parser.stmt(TokenKind::Otherwise, parse_stray_closer_stmt);
    parser.stmt(TokenKind::IfUnsuccessful, parse_stray_closer_stmt);
    parser.stmt(TokenKind::ThenContinue, parse_stray_closer_stmt);
    parser.stmt(TokenKind::EndNote, parse_stray_closer_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
