//! Diagnostics produced while lexing and parsing.
//!
//! This module defines:
//!
//! - `Diagnostic`, an error or warning attached to a source span
//! - `ErrorImpl`, the individual problems and their messages
//! - Stable codes and suggestion tips for each problem
//! - Caret-style rendering of a diagnostic against its source

pub mod errors;
pub mod render;

#[cfg(test)]
mod tests;
