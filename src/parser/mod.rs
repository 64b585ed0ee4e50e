//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms Steps source text into a
//! `Program`. It uses a Pratt parser for expressions with proper operator
//! precedence and handles:
//!
//! - Structure headers and step clauses (building, floor, step, riser)
//! - Statement parsing (declarations, assignments, calls, control flow)
//! - Expression parsing (operator phrases, calls, indexing, literals)
//! - Type annotations
//! - Error recovery and reporting
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod structure;
pub mod types;
