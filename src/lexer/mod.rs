//! Lexical analysis for Steps source text.
//!
//! The lexer turns a source buffer into a lazy stream of tokens. It handles:
//!
//! - Multi-word keyword phrases, matched longest-first through a word trie
//! - Significant newlines
//! - Text and number literals
//! - Line and block notes, captured verbatim
//! - Positions (byte offset, line, column) for every token

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
