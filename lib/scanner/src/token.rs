use std::fmt::{self, Display};

use cursor::{Line, SourceRange};

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub literal: Option<Literal<'a>>,
    pub range: SourceRange<'a>,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, range: impl Into<SourceRange<'a>>) -> Token<'a> {
        Self { kind, literal: None, range: range.into() }
    }

    pub fn with_literal(mut self, literal: Literal<'a>) -> Token<'a> {
        self.literal = Some(literal);
        self
    }

    pub fn lexeme(&self) -> &'a str {
        self.range.lexeme()
    }

    pub fn line(&self) -> Line {
        self.range.line()
    }

    /// Byte offset of the lexeme in the source.
    pub fn position(&self) -> usize {
        self.range.position()
    }

    pub fn length(&self) -> usize {
        self.range.len()
    }
}

/// Renders the token the way it would be written in source, so string
/// literals get their quotes back.
impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "\"{}\"", self.lexeme()),
            _ => write!(f, "{}", self.lexeme()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Bool(bool),
    Number(f64),
    Str(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    String,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    #[strum(serialize = "EOF")]
    Eof,
}

impl TokenKind {
    /// Keywords that start a statement. The parser resumes at these after an
    /// error.
    pub fn is_statement_boundary(self) -> bool {
        use TokenKind::*;
        matches!(self, Class | Fun | Var | For | If | While | Print | Return)
    }
}
