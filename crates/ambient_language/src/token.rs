//! Token types for externs sources.
//!
//! Tokens are the output of the lexer and input to the statement parser.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text this token covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }
}

/// Token types for the externs statement subset.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Punctuation
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `=`
    Eq,

    // Keywords
    /// `var`, `let`, or `const`
    Var,
    /// `function`
    Function,

    // Literals
    /// Identifier like `https` or `var_args`
    Ident(String),
    /// String literal like `'https'`
    String(String),
    /// Numeric literal
    Number(f64),

    // Comments
    /// `/** ... */`, holding the text between the delimiters
    DocComment(String),
    /// `/* ... */`, holding the text between the delimiters
    BlockComment(String),
    /// `// ...`
    LineComment(String),

    // Meta
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns true if this token kind never affects statement structure.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::LineComment(_))
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Dot => "'.'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::Eq => "'='",
            Self::Var => "var",
            Self::Function => "function",
            Self::Ident(_) => "identifier",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::DocComment(_) => "doc comment",
            Self::BlockComment(_) => "comment",
            Self::LineComment(_) => "line comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}
