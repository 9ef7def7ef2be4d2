//! Lexical tokens

use crate::ast::CheckKind;
use lj_span::Span;
use std::fmt;

/// A single lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is, including its literal payload
    pub kind: TokenKind,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Creates a token
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The token's literal value, if it carries one
    ///
    /// Block braces and parentheses report their own character, literals and
    /// single-line comments report their text. Multi-line comments carry a list
    /// of lines instead, see [`TokenKind::MultiLineComment`].
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::BlockStart => Some("{"),
            TokenKind::BlockEnd => Some("}"),
            TokenKind::OpenParen => Some("("),
            TokenKind::CloseParen => Some(")"),
            TokenKind::Identifier(value)
            | TokenKind::Integer(value)
            | TokenKind::Float(value)
            | TokenKind::String(value)
            | TokenKind::SingleLineComment(value) => Some(value),
            _ => None,
        }
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `\n`
    LineBreak,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `{`
    BlockStart,
    /// `}`
    BlockEnd,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,

    /// Identifier, possibly dotted (`a.b.c`)
    Identifier(String),
    /// Integer literal text
    Integer(String),
    /// Float literal text
    Float(String),
    /// String literal contents, without quotes
    String(String),

    /// `$`
    Assignment,
    /// `@`
    Iterator,
    /// `?`
    IfStatement,
    /// `!`
    ReturnStatement,
    /// `else`
    Else,
    /// `use`
    Import,
    /// `as`
    ImportAs,
    /// `export`
    Export,
    /// `make`
    Make,
    /// `set`
    Set,
    /// `get`
    Get,
    /// `is`
    EqualityCheck,
    /// `kinda`
    ApproxCheck,
    /// `contains`
    ContainsCheck,
    /// `exists`
    ExistsCheck,
    /// `def`
    Definition,

    /// `// ...` comment text
    SingleLineComment(String),
    /// `/* ... */` comment, split into lines
    MultiLineComment(Vec<String>),
}

impl TokenKind {
    /// The if-statement check this token introduces, if any
    #[must_use]
    pub fn check_kind(&self) -> Option<CheckKind> {
        match self {
            Self::EqualityCheck => Some(CheckKind::Equality),
            Self::ApproxCheck => Some(CheckKind::Approx),
            Self::ContainsCheck => Some(CheckKind::Contains),
            Self::ExistsCheck => Some(CheckKind::Exists),
            _ => None,
        }
    }

    /// Whether the parser treats this token as carrying no meaning
    #[must_use]
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Self::LineBreak | Self::SingleLineComment(_) | Self::MultiLineComment(_)
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineBreak => write!(formatter, "line break"),
            Self::ArrayStart => write!(formatter, "["),
            Self::ArrayEnd => write!(formatter, "]"),
            Self::BlockStart => write!(formatter, "{{"),
            Self::BlockEnd => write!(formatter, "}}"),
            Self::OpenParen => write!(formatter, "("),
            Self::CloseParen => write!(formatter, ")"),
            Self::Identifier(name) => write!(formatter, "identifier `{name}`"),
            Self::Integer(value) | Self::Float(value) => write!(formatter, "number `{value}`"),
            Self::String(value) => write!(formatter, "string '{value}'"),
            Self::Assignment => write!(formatter, "$"),
            Self::Iterator => write!(formatter, "@"),
            Self::IfStatement => write!(formatter, "?"),
            Self::ReturnStatement => write!(formatter, "!"),
            Self::Else => write!(formatter, "else"),
            Self::Import => write!(formatter, "use"),
            Self::ImportAs => write!(formatter, "as"),
            Self::Export => write!(formatter, "export"),
            Self::Make => write!(formatter, "make"),
            Self::Set => write!(formatter, "set"),
            Self::Get => write!(formatter, "get"),
            Self::EqualityCheck => write!(formatter, "is"),
            Self::ApproxCheck => write!(formatter, "kinda"),
            Self::ContainsCheck => write!(formatter, "contains"),
            Self::ExistsCheck => write!(formatter, "exists"),
            Self::Definition => write!(formatter, "def"),
            Self::SingleLineComment(_) | Self::MultiLineComment(_) => write!(formatter, "comment"),
        }
    }
}
