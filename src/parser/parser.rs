//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the driver loop. The
//! parser pulls tokens lazily from the lexer and uses a Pratt parser approach
//! with NUD/LED handlers for expressions and a statement lookup for lines.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//!
//! Besides the tables it keeps the stack of open structures (building, floor,
//! step, riser) and the closers that the statements currently being parsed
//! are waiting for, e.g. `otherwise` for an open `if`.

use std::{collections::HashMap, mem};

use log::{debug, info, trace};

use crate::{
    ast::{
        ast::{Item, Program, StructureDef},
        statements::Stmt,
    },
    errors::errors::{Diagnostic, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
    structure::{parse_clause, parse_structure_header, OpenScope},
};

/// Deepest nesting of expressions and blocks the parser descends into.
pub const MAX_NESTING: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockMode {
    /// Body follows the colon on the same line
    Inline,
    /// Body lines are indented deeper than the owner
    Indented,
    /// Body lines sit at the owner's indentation
    Flat,
}

/// The main parser structure that maintains parsing state.
///
/// This struct owns the lexer and maintains lookup tables for parsing
/// statements and expressions. It tracks the current token, the open
/// structures, and every diagnostic reported so far.
pub struct Parser<'src> {
    /// Token source
    lexer: Lexer<'src>,
    source: &'src str,
    /// The token being looked at
    current: Token,
    /// Kind of the last consumed token
    previous_kind: Option<TokenKind>,
    /// End of the last consumed token that was not a newline
    previous_end: Position,
    /// Number of tokens consumed so far
    consumed: usize,
    diagnostics: Vec<Diagnostic>,
    reported_end_of_input: bool,
    /// Structures that have not been closed yet, outermost first
    scopes: Vec<OpenScope>,
    /// Finished top-level items
    items: Vec<Item>,
    /// Closing keywords the enclosing statements wait for, innermost last
    closers: Vec<&'static [TokenKind]>,
    /// Expressions and statements currently being parsed inside each other
    depth: usize,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl<'src> Parser<'src> {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `source` - The buffer to parse
    ///
    /// # Returns
    ///
    /// A new Parser positioned on the first token, with empty lookup tables.
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();

        Parser {
            lexer,
            source,
            current,
            previous_kind: None,
            previous_end: Position::start(),
            consumed: 0,
            diagnostics: vec![],
            reported_end_of_input: false,
            scopes: vec![],
            items: vec![],
            closers: vec![],
            depth: 0,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Returns the token after the current one without consuming anything.
    pub fn peek_token(&mut self) -> &Token {
        self.lexer.peek_token()
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        let previous = mem::replace(&mut self.current, next);

        self.previous_kind = Some(previous.kind);
        if previous.kind != TokenKind::Newline {
            self.previous_end = previous.span.end;
        }
        self.consumed += 1;
        previous
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns a Diagnostic.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Diagnostic>,
    ) -> Result<Token, Diagnostic> {
        if self.current_token_kind() == expected_kind {
            return Ok(self.advance());
        }

        match error {
            Some(error) => Err(error),
            None => Err(Diagnostic::new(
                ErrorImpl::ExpectedToken {
                    expected: expected_kind.as_text().to_string(),
                    found: self.current.describe(),
                },
                self.current.span,
            )),
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Diagnostic> {
        self.expect_error(expected_kind, None)
    }

    /// Expects a name, failing with `ExpectedIdentifier`.
    pub fn expect_identifier(&mut self) -> Result<Token, Diagnostic> {
        let error = Diagnostic::new(
            ErrorImpl::ExpectedIdentifier {
                found: self.current.describe(),
            },
            self.current.span,
        );
        self.expect_error(TokenKind::Identifier, Some(error))
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Binding power of the current token, `Default` if it is no operator.
    pub fn current_binding_power(&self) -> BindingPower {
        self.binding_power_lookup
            .get(&self.current_token_kind())
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Leaves the binding power alone, since `-` and `[` are both prefix and
    /// infix.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// End of the last consumed token, newlines excluded.
    pub fn get_position(&self) -> Position {
        self.previous_end
    }

    /// Number of tokens consumed so far, used to tell whether a failed
    /// statement made progress.
    pub fn get_consumed(&self) -> usize {
        self.consumed
    }

    /// Span from `start` up to the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.previous_end)
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Reports a syntax error found at the current token.
    ///
    /// Errors at a lexer `Error` token are dropped since the lexer has already
    /// explained it, and running into the end of input is reported only once.
    pub fn report_syntax(&mut self, diagnostic: Diagnostic) {
        match self.current_token_kind() {
            TokenKind::Error => {}
            TokenKind::EOF => {
                if !self.reported_end_of_input {
                    self.reported_end_of_input = true;
                    let span = self.current.span;
                    self.report(Diagnostic::new(ErrorImpl::UnexpectedEndOfInput, span));
                }
            }
            _ => self.report(diagnostic),
        }
    }

    /// Error for a token that fits nowhere.
    pub fn unexpected_token(&self) -> Diagnostic {
        Diagnostic::new(
            ErrorImpl::UnexpectedToken {
                token: self.current.describe(),
            },
            self.current.span,
        )
    }

    pub fn skip_newlines(&mut self) {
        while self.current_token_kind() == TokenKind::Newline {
            self.advance();
        }
    }

    /// Whether the current token is the first one on its line.
    pub fn at_line_start(&self) -> bool {
        matches!(self.previous_kind, None | Some(TokenKind::Newline))
    }

    /// Count of spaces and tabs leading the current token's line.
    pub fn line_indent(&self) -> usize {
        let offset = (self.current.span.start.offset as usize).min(self.source.len());
        let line_start = self.source[..offset].rfind('\n').map_or(0, |index| index + 1);

        self.source[line_start..]
            .chars()
            .take_while(|ch| *ch == ' ' || *ch == '\t')
            .count()
    }

    /// Whether some enclosing statement is waiting for `kind`.
    pub fn is_closer(&self, kind: TokenKind) -> bool {
        self.closers.iter().any(|closers| closers.contains(&kind))
    }

    /// Whether the current token can follow a complete statement on the same
    /// line.
    pub fn at_boundary(&self) -> bool {
        let kind = self.current_token_kind();
        matches!(
            kind,
            TokenKind::EOF | TokenKind::Newline | TokenKind::Note | TokenKind::NoteBlock
        ) || kind.is_structure_header()
            || kind.is_clause()
            || self.is_closer(kind)
    }

    /// Checks that a statement ends here. A newline is consumed, any other
    /// boundary is left for the caller.
    pub fn expect_end_of_statement(&mut self) -> Result<(), Diagnostic> {
        if self.current_token_kind() == TokenKind::Newline {
            self.advance();
            return Ok(());
        }
        if self.at_boundary() {
            return Ok(());
        }

        Err(Diagnostic::new(
            ErrorImpl::ExpectedEndOfStatement {
                found: self.current.describe(),
            },
            self.current.span,
        ))
    }

    /// Like `expect_end_of_statement`, but reports leftovers and skips them so
    /// the statement itself is kept.
    pub fn end_statement(&mut self) {
        if let Err(diagnostic) = self.expect_end_of_statement() {
            self.report_syntax(diagnostic);
            self.synchronize();
        }
    }

    /// Skips to a point where parsing can safely resume.
    pub fn synchronize(&mut self) {
        loop {
            let kind = self.current_token_kind();
            match kind {
                TokenKind::EOF => return,
                TokenKind::Newline => {
                    self.advance();
                    return;
                }
                _ if kind.starts_statement()
                    || kind.is_structure_header()
                    || kind.is_clause()
                    || self.is_closer(kind) =>
                {
                    return
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Reports `diagnostic` and moves past the broken statement.
    ///
    /// # Arguments
    ///
    /// * `diagnostic` - Why the statement failed
    /// * `start` - Value of the consumed counter when the statement began
    pub fn recover(&mut self, diagnostic: Diagnostic, start: usize) {
        debug!(
            "recovering from {} at {}:{}",
            diagnostic.get_code(),
            diagnostic.get_span().start.line,
            diagnostic.get_span().start.column
        );
        self.report_syntax(diagnostic);

        if self.consumed == start && self.has_tokens() {
            self.advance();
        }
        self.synchronize();
    }

    /// Goes one level deeper, failing once `MAX_NESTING` is reached.
    pub fn enter_nested(&mut self) -> Result<(), Diagnostic> {
        if self.depth >= MAX_NESTING {
            return Err(Diagnostic::new(
                ErrorImpl::NestingTooDeep { limit: MAX_NESTING },
                self.current.span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Parses one statement, recovering from any error in it.
    pub fn parse_statement_or_recover(&mut self) -> Option<Stmt> {
        let start = self.get_consumed();
        trace!("statement at {:?}", self.current_token_kind());

        let result = self.enter_nested().and_then(|()| {
            let stmt = parse_stmt(self);
            self.leave_nested();
            stmt
        });

        match result {
            Ok(stmt) => Some(stmt),
            Err(diagnostic) => {
                self.recover(diagnostic, start);
                None
            }
        }
    }

    /// Parses the body after a block header's colon.
    ///
    /// A body on the same line as the colon ends with that line. Otherwise it
    /// is indented when its first line is deeper than `owner_indent`, and
    /// then ends at the first line that is not; flat bodies end only at a
    /// header, a clause, a closer or the end of input.
    ///
    /// # Arguments
    ///
    /// * `keyword` - Header keyword, used for the empty body warning
    /// * `owner_indent` - Indentation of the line holding the header
    /// * `closers` - Keywords that end this body and continue the owner
    /// * `header` - Span reported when the body is empty
    ///
    /// # Returns
    ///
    /// The statements of the body.
    pub fn parse_block(
        &mut self,
        keyword: &str,
        owner_indent: usize,
        closers: &'static [TokenKind],
        header: Span,
    ) -> Vec<Stmt> {
        let mode = if self.current_token_kind() == TokenKind::Newline {
            self.skip_newlines();
            if self.line_indent() > owner_indent {
                BlockMode::Indented
            } else {
                BlockMode::Flat
            }
        } else {
            BlockMode::Inline
        };

        self.closers.push(closers);
        let mut body = vec![];

        loop {
            if mode == BlockMode::Inline {
                if self.current_token_kind() == TokenKind::Newline || self.at_line_start() {
                    break;
                }
            } else {
                self.skip_newlines();
            }

            let kind = self.current_token_kind();
            if kind == TokenKind::EOF
                || kind.is_structure_header()
                || kind.is_clause()
                || self.is_closer(kind)
            {
                break;
            }
            if mode == BlockMode::Indented && self.at_line_start() && self.line_indent() <= owner_indent {
                break;
            }

            if let Some(stmt) = self.parse_statement_or_recover() {
                body.push(stmt);
            }
        }

        self.closers.pop();

        if body.is_empty() {
            self.report(Diagnostic::new(
                ErrorImpl::EmptyBlock {
                    keyword: keyword.to_string(),
                },
                header,
            ));
        }
        body
    }

    /// Whether the current token, after blank lines, is the closer `kind`
    /// belonging to a header indented by `indent`.
    ///
    /// On a line of its own the closer must sit at the header's indentation,
    /// so a nested `if` does not take its parent's `otherwise`.
    pub fn claim_closer(&mut self, kind: TokenKind, indent: usize) -> bool {
        self.skip_newlines();
        self.current_token_kind() == kind && (!self.at_line_start() || self.line_indent() == indent)
    }

    pub fn current_scope(&self) -> Option<&OpenScope> {
        self.scopes.last()
    }

    pub fn current_scope_mut(&mut self) -> Option<&mut OpenScope> {
        self.scopes.last_mut()
    }

    /// Closes every open structure at `depth` or deeper.
    pub fn close_scopes(&mut self, depth: u8) {
        while self
            .scopes
            .last()
            .is_some_and(|scope| scope.def.kind.depth() >= depth)
        {
            if let Some(scope) = self.scopes.pop() {
                self.attach(scope.def);
            }
        }
    }

    pub fn open_scope(&mut self, def: StructureDef) {
        debug!("opened {} '{}'", def.kind, def.name);
        self.scopes.push(OpenScope::new(def));
    }

    fn attach(&mut self, def: StructureDef) {
        debug!("closed {} '{}'", def.kind, def.name);

        match self.scopes.last_mut() {
            Some(parent) => {
                parent.def.span.end = def.span.end;
                parent.def.children.push(def);
            }
            None => self.items.push(Item::Structure(def)),
        }
    }

    /// Appends a statement to the innermost structure, or to the program.
    pub fn push_statement(&mut self, stmt: Stmt) {
        match self.scopes.last_mut() {
            Some(scope) => {
                if !stmt.is_comment() {
                    scope.body_started = true;
                }
                scope.def.span.end = stmt.get_span().end;
                scope.def.body.push(stmt);
            }
            None => self.items.push(Item::Statement(stmt)),
        }
    }

    /// Parses the whole buffer.
    pub fn parse_program(&mut self) -> Program {
        loop {
            self.skip_newlines();
            let kind = self.current_token_kind();

            if kind == TokenKind::EOF {
                break;
            }

            if kind.is_structure_header() {
                parse_structure_header(self);
            } else if kind.is_clause() {
                parse_clause(self);
            } else if let Some(stmt) = self.parse_statement_or_recover() {
                self.push_statement(stmt);
            }
        }

        self.close_scopes(0);

        Program {
            items: mem::take(&mut self.items),
            span: Span::new(Position::start(), self.current.span.end),
        }
    }

    /// All diagnostics from lexing and parsing, in source order.
    pub fn into_diagnostics(mut self) -> Vec<Diagnostic> {
        let mut diagnostics = self.lexer.take_diagnostics();
        diagnostics.append(&mut self.diagnostics);
        diagnostics.sort_by_key(|diagnostic| diagnostic.get_span().start.offset);
        diagnostics
    }
}

/// Parses a buffer into a Program.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses everything up to the end of
/// input. Parsing never stops at the first problem, every diagnostic found
/// along the way is returned with the tree.
///
/// # Arguments
///
/// * `source` - The source text
///
/// # Returns
///
/// A tuple containing:
/// - The Program, holding whatever could be parsed
/// - Lexer and parser diagnostics ordered by position
pub fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
    info!("parsing {} bytes", source.len());

    let mut parser = Parser::new(source);
    create_token_lookups(&mut parser);

    let program = parser.parse_program();
    let diagnostics = parser.into_diagnostics();

    info!(
        "parsed {} items with {} diagnostics",
        program.items.len(),
        diagnostics.len()
    );
    (program, diagnostics)
}
