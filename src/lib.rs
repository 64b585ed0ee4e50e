#![allow(clippy::module_inception)]

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

pub use crate::parser::parser::parse;

/// A location in the source buffer.
///
/// `offset` is a byte offset, `line` and `column` are 1-based with the
/// column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(offset: u32, line: u32, column: u32) -> Self {
        Position {
            offset,
            line,
            column,
        }
    }

    /// The position of the first character of any buffer.
    pub fn start() -> Self {
        Position::new(0, 1, 1)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// An empty span sitting at `position`.
    pub fn at(position: Position) -> Self {
        Span::new(position, position)
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Covers both spans, assuming `self` comes first.
    pub fn to(&self, other: &Span) -> Span {
        Span::new(self.start, other.end)
    }
}

/// Finds the line that holds the byte `position`.
///
/// Returns the 1-based line number, the line text without its line ending,
/// and the byte offset of `position` inside that line. A position at the very
/// end of the buffer resolves to the last line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let text = line.trim_end_matches(['\n', '\r']);
            return Some((line_number, text.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // `pos` is the end of the buffer
    if source.is_empty() || source.ends_with('\n') {
        Some((line_number, String::new(), 0))
    } else {
        let last = source.rsplit('\n').next().unwrap_or("");
        Some((line_number - 1, last.trim_end_matches('\r').to_string(), last.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::{get_line_at_position, Position, Span};

    const SOURCE: &str = "Hello, world!\nstep: Greet\n\n    display name\n";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = get_line_at_position(SOURCE, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = get_line_at_position(SOURCE, 32).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "    display name");
        assert_eq!(line_pos, 5);
    }

    #[test]
    fn test_get_line_at_end_of_buffer() {
        let (line_number, line, line_pos) = get_line_at_position("display x", 9).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "display x");
        assert_eq!(line_pos, 9);

        let (line_number, line, _) = get_line_at_position(SOURCE, SOURCE.len() as u32).unwrap();
        assert_eq!(line_number, 5);
        assert_eq!(line, "");
    }

    #[test]
    fn test_get_line_out_of_range() {
        assert!(get_line_at_position("abc", 10).is_none());
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(Position::new(4, 1, 5), Position::new(9, 1, 10));
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::at(Position::start()).is_empty());
    }
}
