use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{
    errors::errors::{Diagnostic, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, KEYWORD_TRIE};

/// Handles a pattern match of `len` bytes at the lexer's position. Returns
/// `None` when the matched text produces no token.
pub type RegexHandler = fn(&mut Lexer<'_>, usize) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^[ \\t\\r]+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^\\n").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Newline) },
        RegexPattern { regex: Regex::new("^\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^[0-9]+(\\.[0-9]+)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^[\\p{Alphabetic}_][\\p{Alphabetic}\\p{N}_]*").unwrap(), handler: word_handler },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen) },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen) },
        RegexPattern { regex: Regex::new("^\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket) },
        RegexPattern { regex: Regex::new("^\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket) },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma) },
        RegexPattern { regex: Regex::new("^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon) },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment) },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus) },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Minus) },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star) },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash) },
        RegexPattern { regex: Regex::new("^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent) },
    ];
}

/// A lazy, restartable tokenizer over a source buffer.
///
/// Tokens are produced on demand through `next_token` and `peek_token`.
/// Lexical problems are reported twice: as an `Error` token in the stream, and
/// as a diagnostic collected until `take_diagnostics` is called.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    column: u32,
    /// Kind of the last token produced, used to place multi-word phrases
    previous: Option<TokenKind>,
    peeked: Option<Token>,
    diagnostics: Vec<Diagnostic>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Lexer<'src> {
        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 1,
            previous: None,
            peeked: None,
            diagnostics: vec![],
            finished: false,
        }
    }

    /// Consumes and returns the next token. Once the buffer is exhausted every
    /// call returns `EOF`.
    pub fn next_token(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        };
        self.peeked.insert(token)
    }

    /// Rewinds to the start of the buffer and forgets collected diagnostics.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.line = 1;
        self.column = 1;
        self.previous = None;
        self.peeked = None;
        self.diagnostics.clear();
        self.finished = false;
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn cursor_position(&self) -> Position {
        Position::new(self.pos as u32, self.line, self.column)
    }

    pub fn advance_n(&mut self, n: usize) {
        let source = self.source;
        let end = (self.pos + n).min(source.len());
        for ch in source[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    /// Builds a token from the next `len` bytes and moves past them.
    pub fn make_token(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.cursor_position();
        let value = self.remainder()[..len].to_string();
        self.advance_n(len);

        MK_TOKEN!(kind, value, Span::new(start, self.cursor_position()))
    }

    pub fn remainder(&self) -> &'src str {
        let source = self.source;
        &source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn report(&mut self, error: ErrorImpl, span: Span) {
        self.diagnostics.push(Diagnostic::new(error, span));
    }

    /// Whether a statement may begin at the current token.
    fn in_statement_position(&self) -> bool {
        match self.previous {
            None => true,
            Some(kind) => {
                matches!(kind, TokenKind::Newline | TokenKind::Colon | TokenKind::Repeat)
                    || kind.ends_with_colon()
            }
        }
    }

    fn scan(&mut self) -> Token {
        loop {
            if self.at_eof() {
                let position = self.cursor_position();
                self.previous = Some(TokenKind::EOF);
                return MK_TOKEN!(TokenKind::EOF, String::new(), Span::at(position));
            }

            let remaining = self.remainder();
            let mut matched = None;

            for pattern in PATTERNS.iter() {
                if let Some(found) = pattern.regex.find(remaining) {
                    matched = Some((pattern.handler, found.end()));
                    break;
                }
            }

            let produced = match matched {
                Some((handler, len)) => handler(self, len),
                None => Some(self.unrecognised_character()),
            };

            if let Some(token) = produced {
                trace!("{} {:?} at {}:{}", token.kind, token.value, token.span.start.line, token.span.start.column);
                self.previous = Some(token.kind);
                return token;
            }
        }
    }

    fn unrecognised_character(&mut self) -> Token {
        let len = self.remainder().chars().next().map_or(1, char::len_utf8);
        let token = self.make_token(TokenKind::Error, len);
        self.report(
            ErrorImpl::UnrecognisedCharacter {
                character: token.value.clone(),
            },
            token.span,
        );
        token
    }

    /// Finds the longest keyword phrase starting with `word` at byte `start`.
    ///
    /// Returns the phrase kind and the byte offset where it ends.
    fn match_keyword(&self, start: usize, word: &str) -> Option<(TokenKind, usize)> {
        let source = self.source;
        let mut node = KEYWORD_TRIE.child(word)?;
        let mut cursor = start + word.len();
        let mut best = None;

        loop {
            if let Some(kind) = node.terminal {
                if self.allowed_here(kind, cursor) {
                    best = Some((kind, cursor));
                }
            }

            let next = skip_inline_whitespace(source, cursor);

            if let Some(kind) = node.colon_terminal {
                if source[next..].starts_with(':') && self.allowed_here(kind, next + 1) {
                    best = Some((kind, next + 1));
                }
            }

            if next == cursor {
                break;
            }

            let len = word_length(&source[next..]);
            match node.child(&source[next..next + len]) {
                Some(child) if len > 0 => {
                    node = child;
                    cursor = next + len;
                }
                _ => break,
            }
        }

        best
    }

    /// Whether a phrase of `kind` ending at byte `end` can be produced here.
    fn allowed_here(&self, kind: TokenKind, end: usize) -> bool {
        !kind.needs_statement_position()
            || (self.in_statement_position() && self.loop_header_follows(end))
    }

    /// Whether `NAME in` comes after byte `from`.
    fn loop_header_follows(&self, from: usize) -> bool {
        let source = self.source;

        let name_start = skip_inline_whitespace(source, from);
        let starts_name = source[name_start..]
            .chars()
            .next()
            .is_some_and(|ch| ch.is_alphabetic() || ch == '_');
        if name_start == from || !starts_name {
            return false;
        }

        let name_end = name_start + word_length(&source[name_start..]);
        let in_start = skip_inline_whitespace(source, name_end);
        in_start > name_end && &source[in_start..in_start + word_length(&source[in_start..])] == "in"
    }

    /// Replaces a `note:` token's text with the rest of its line.
    fn line_comment(&mut self, mut token: Token) -> Token {
        let rest = self.remainder();
        let end = rest.find('\n').unwrap_or(rest.len());

        token.value = rest[..end].trim().to_string();
        self.advance_n(end);
        token.span.end = self.cursor_position();
        token
    }

    /// Captures raw lines after `note block:` up to a line reading `end note`.
    fn block_comment(&mut self, mut token: Token) -> Token {
        let header = token.span;
        let mut lines = vec![];

        let rest = self.remainder();
        let end = rest.find('\n').unwrap_or(rest.len());
        let first = rest[..end].trim();
        if !first.is_empty() {
            lines.push(first.to_string());
        }
        self.advance_n(end);

        let mut closed = false;
        while !self.at_eof() {
            // positioned on the newline ending the previous line
            let rest = &self.remainder()[1..];
            let len = rest.find('\n').unwrap_or(rest.len());
            let line = &rest[..len];
            self.advance_n(1 + len);

            if line.trim() == "end note" {
                closed = true;
                break;
            }
            lines.push(line.trim_end_matches('\r').to_string());
        }

        if !closed {
            self.report(ErrorImpl::UnterminatedBlockComment, header);
        }

        token.value = lines.join("\n");
        token.span.end = self.cursor_position();
        token
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token up to and including `EOF`.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        let token = self.next_token();
        if token.kind == TokenKind::EOF {
            self.finished = true;
        }
        Some(token)
    }
}

fn skip_inline_whitespace(source: &str, from: usize) -> usize {
    from + source[from..]
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count()
}

/// Byte length of the word at the start of `text`.
fn word_length(text: &str) -> usize {
    text.char_indices()
        .find(|(_, ch)| !(ch.is_alphanumeric() || *ch == '_'))
        .map_or(text.len(), |(index, _)| index)
}

fn skip_handler(lexer: &mut Lexer, len: usize) -> Option<Token> {
    lexer.advance_n(len);
    None
}

fn number_handler(lexer: &mut Lexer, len: usize) -> Option<Token> {
    Some(lexer.make_token(TokenKind::Number, len))
}

fn word_handler(lexer: &mut Lexer, len: usize) -> Option<Token> {
    let start = lexer.pos;
    let word = &lexer.remainder()[..len];

    let (kind, end) = lexer
        .match_keyword(start, word)
        .unwrap_or((TokenKind::Identifier, start + len));
    let token = lexer.make_token(kind, end - start);

    match kind {
        TokenKind::Note => Some(lexer.line_comment(token)),
        TokenKind::NoteBlock => Some(lexer.block_comment(token)),
        _ => Some(token),
    }
}

fn string_handler(lexer: &mut Lexer, _len: usize) -> Option<Token> {
    let start = lexer.cursor_position();
    let text = lexer.remainder();

    let mut result = String::new();
    let mut escapes = vec![];
    let mut chars = text.char_indices().skip(1).peekable();
    let mut end = None;

    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' => {
                end = Some(index + 1);
                break;
            }
            '\n' => break,
            '\\' => match chars.peek().map(|(_, next)| *next) {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('r') => result.push('\r'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some(next) if next != '\n' => {
                    escapes.push((index, next));
                    result.push('\\');
                    result.push(next);
                }
                _ => {
                    result.push(ch);
                    continue;
                }
            },
            _ => {
                result.push(ch);
                continue;
            }
        }
        // an escape consumed two characters
        chars.next();
    }

    let Some(end) = end else {
        // unterminated: the token runs to the end of the line
        let len = text.find('\n').unwrap_or(text.len());
        let token = lexer.make_token(TokenKind::Error, len);
        lexer.report(ErrorImpl::UnterminatedString, token.span);
        return Some(token);
    };

    for (index, escaped) in escapes {
        let escape_start = offset_position(start, &text[..index]);
        let escape_end = offset_position(start, &text[..index + 1 + escaped.len_utf8()]);
        lexer.report(
            ErrorImpl::InvalidEscape {
                sequence: format!("\\{}", escaped),
            },
            Span::new(escape_start, escape_end),
        );
    }

    lexer.advance_n(end);
    Some(MK_TOKEN!(TokenKind::String, result, Span::new(start, lexer.cursor_position())))
}

/// Position reached by moving from `start` across `text`, which holds no newline.
fn offset_position(start: Position, text: &str) -> Position {
    Position::new(
        start.offset + text.len() as u32,
        start.line,
        start.column + text.chars().count() as u32,
    )
}

/// Tokenizes the whole buffer. The result always ends with `EOF`.
///
/// Lexical problems show up as `Error` tokens; use `tokenize_with_diagnostics`
/// to also receive their messages.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

pub fn tokenize_with_diagnostics(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lex = Lexer::new(source);
    let tokens: Vec<Token> = lex.by_ref().collect();
    (tokens, lex.take_diagnostics())
}
