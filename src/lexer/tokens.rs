use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

/// Every reserved word and phrase of the language.
///
/// Words are matched one at a time, separated by spaces or tabs. A trailing
/// `:` means the phrase is only a keyword when a colon follows it (spaces
/// before the colon are allowed), and the colon becomes part of the token.
pub const KEYWORD_PHRASES: &[(&str, TokenKind)] = &[
    // Structure
    ("building:", TokenKind::Building),
    ("floor:", TokenKind::Floor),
    ("step:", TokenKind::Step),
    ("riser:", TokenKind::Riser),
    ("belongs to:", TokenKind::BelongsTo),
    ("expects:", TokenKind::Expects),
    ("returns:", TokenKind::Returns),
    ("declare:", TokenKind::Declare),
    ("do:", TokenKind::Do),
    // Comments
    ("note:", TokenKind::Note),
    ("note block:", TokenKind::NoteBlock),
    ("end note", TokenKind::EndNote),
    // Variables
    ("as", TokenKind::As),
    ("set", TokenKind::Set),
    ("to", TokenKind::To),
    // Invocation
    ("call", TokenKind::Call),
    ("with", TokenKind::With),
    ("storing result in", TokenKind::StoringResultIn),
    ("display", TokenKind::Display),
    ("input", TokenKind::Input),
    ("return", TokenKind::Return),
    ("exit", TokenKind::Exit),
    // Control flow
    ("if", TokenKind::If),
    ("otherwise if", TokenKind::OtherwiseIf),
    ("otherwise", TokenKind::Otherwise),
    ("repeat", TokenKind::Repeat),
    ("times", TokenKind::Times),
    ("for each", TokenKind::ForEach),
    ("in", TokenKind::In),
    ("while", TokenKind::While),
    ("attempt:", TokenKind::Attempt),
    ("if unsuccessful:", TokenKind::IfUnsuccessful),
    ("then continue:", TokenKind::ThenContinue),
    // Collections
    ("add", TokenKind::Add),
    ("remove", TokenKind::Remove),
    ("from", TokenKind::From),
    // Operators
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("not", TokenKind::Not),
    ("is equal to", TokenKind::IsEqualTo),
    ("is not equal to", TokenKind::IsNotEqualTo),
    ("equals", TokenKind::Equals),
    ("is less than", TokenKind::IsLessThan),
    ("is greater than", TokenKind::IsGreaterThan),
    ("is less than or equal to", TokenKind::IsLessThanOrEqualTo),
    ("is greater than or equal to", TokenKind::IsGreaterThanOrEqualTo),
    ("is in", TokenKind::IsIn),
    ("contains", TokenKind::Contains),
    ("starts with", TokenKind::StartsWith),
    ("ends with", TokenKind::EndsWith),
    ("added to", TokenKind::AddedTo),
    ("split by", TokenKind::SplitBy),
    ("modulo", TokenKind::Modulo),
    ("length of", TokenKind::LengthOf),
    ("type of", TokenKind::TypeOf),
    ("character at", TokenKind::CharacterAt),
    ("of", TokenKind::Of),
    ("is a number", TokenKind::IsANumber),
    ("is a text", TokenKind::IsAText),
    ("is a boolean", TokenKind::IsABoolean),
    ("is a list", TokenKind::IsAList),
    ("is a table", TokenKind::IsATable),
    // Literals
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("nothing", TokenKind::Nothing),
    // Types
    ("number", TokenKind::NumberType),
    ("text", TokenKind::TextType),
    ("boolean", TokenKind::BooleanType),
    ("list", TokenKind::ListType),
    ("table", TokenKind::TableType),
    ("fixed", TokenKind::Fixed),
];

/// One word of a keyword phrase.
#[derive(Debug, Default)]
pub struct KeywordNode {
    pub children: HashMap<&'static str, KeywordNode>,
    /// Kind produced when the phrase stops at this word.
    pub terminal: Option<TokenKind>,
    /// Kind produced when the phrase stops here and a `:` follows.
    pub colon_terminal: Option<TokenKind>,
}

impl KeywordNode {
    pub fn child(&self, word: &str) -> Option<&KeywordNode> {
        self.children.get(word)
    }

    fn insert(&mut self, phrase: &'static str, kind: TokenKind) {
        let (words, needs_colon) = match phrase.strip_suffix(':') {
            Some(stripped) => (stripped, true),
            None => (phrase, false),
        };

        let mut node = self;
        for word in words.split_whitespace() {
            node = node.children.entry(word).or_default();
        }

        if needs_colon {
            node.colon_terminal = Some(kind);
        } else {
            node.terminal = Some(kind);
        }
    }
}

lazy_static! {
    pub static ref KEYWORD_TRIE: KeywordNode = {
        let mut root = KeywordNode::default();
        for &(phrase, kind) in KEYWORD_PHRASES {
            root.insert(phrase, kind);
        }
        root
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Error,
    Newline,
    Number,
    String,
    Identifier,
    Note,
    NoteBlock,

    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Colon,
    Assignment,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Structure
    Building,
    Floor,
    Step,
    Riser,
    BelongsTo,
    Expects,
    Returns,
    Declare,
    Do,
    EndNote,

    // Reserved
    As,
    Set,
    To,
    Call,
    With,
    StoringResultIn,
    Display,
    Input,
    Return,
    Exit,
    If,
    OtherwiseIf,
    Otherwise,
    Repeat,
    Times,
    ForEach,
    In,
    While,
    Attempt,
    IfUnsuccessful,
    ThenContinue,
    Add,
    Remove,
    From,

    // Operators
    And,
    Or,
    Not,
    IsEqualTo,
    IsNotEqualTo,
    Equals,
    IsLessThan,
    IsGreaterThan,
    IsLessThanOrEqualTo,
    IsGreaterThanOrEqualTo,
    IsIn,
    Contains,
    StartsWith,
    EndsWith,
    AddedTo,
    SplitBy,
    Modulo,
    LengthOf,
    TypeOf,
    CharacterAt,
    Of,
    IsANumber,
    IsAText,
    IsABoolean,
    IsAList,
    IsATable,

    True,
    False,
    Nothing,

    NumberType,
    TextType,
    BooleanType,
    ListType,
    TableType,
    Fixed,
}

impl TokenKind {
    /// How the kind is written in source, for messages.
    pub fn as_text(&self) -> &'static str {
        if let Some((phrase, _)) = KEYWORD_PHRASES.iter().find(|(_, kind)| kind == self) {
            return *phrase;
        }

        match self {
            TokenKind::EOF => "end of input",
            TokenKind::Error => "invalid text",
            TokenKind::Newline => "end of line",
            TokenKind::Number => "a number",
            TokenKind::String => "text",
            TokenKind::Identifier => "a name",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Assignment => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            _ => "keyword",
        }
    }

    /// `building:`, `floor:`, `step:` or `riser:`.
    pub fn is_structure_header(&self) -> bool {
        matches!(
            self,
            TokenKind::Building | TokenKind::Floor | TokenKind::Step | TokenKind::Riser
        )
    }

    pub fn is_clause(&self) -> bool {
        matches!(
            self,
            TokenKind::BelongsTo | TokenKind::Expects | TokenKind::Returns
        )
    }

    /// Keywords that carry their own colon and open a body or section.
    pub fn ends_with_colon(&self) -> bool {
        matches!(
            self,
            TokenKind::Building
                | TokenKind::Floor
                | TokenKind::Step
                | TokenKind::Riser
                | TokenKind::BelongsTo
                | TokenKind::Expects
                | TokenKind::Returns
                | TokenKind::Declare
                | TokenKind::Do
                | TokenKind::Attempt
                | TokenKind::IfUnsuccessful
                | TokenKind::ThenContinue
        )
    }

    /// Phrases made of words that are not reserved on their own. They are only
    /// recognised where a statement can begin and `NAME in` follows, so `for`
    /// and `each` stay usable as names everywhere else.
    pub fn needs_statement_position(&self) -> bool {
        matches!(self, TokenKind::ForEach)
    }

    /// Keywords that can begin a statement.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Set
                | TokenKind::Call
                | TokenKind::Display
                | TokenKind::Input
                | TokenKind::Return
                | TokenKind::Exit
                | TokenKind::If
                | TokenKind::Repeat
                | TokenKind::ForEach
                | TokenKind::While
                | TokenKind::Attempt
                | TokenKind::Add
                | TokenKind::Remove
                | TokenKind::Declare
                | TokenKind::Do
                | TokenKind::Note
                | TokenKind::NoteBlock
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    /// The token as it should appear inside a message.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EOF | TokenKind::Newline => String::from(self.kind.as_text()),
            TokenKind::Note => String::from("note:"),
            TokenKind::NoteBlock => String::from("note block:"),
            _ => self.value.clone(),
        }
    }
}
