//! Lexer for externs sources.
//!
//! The lexer converts source text into a stream of tokens. Doc comments
//! (`/** ... */`) are kept as tokens because they carry the type information
//! for the statement that follows them.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer for externs source code.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::point(start, start_line, start_column),
            );
        };
        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '.' => self.single(TokenKind::Dot),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            '=' => self.single(TokenKind::Eq),
            '/' => self.scan_slash(),
            '\'' | '"' => self.scan_string(c),
            c if c.is_ascii_digit() => self.scan_number(),
            '-' if self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            c if is_ident_start(c) => self.scan_ident(),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
        )
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// Comments are included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks at the character `n` positions ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Advances past `n` characters.
    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Scans a comment starting with `/`.
    fn scan_slash(&mut self) -> TokenKind {
        match self.peek_char_n(1) {
            Some('/') => self.scan_line_comment(),
            Some('*') => self.scan_block_comment(),
            _ => {
                self.advance();
                TokenKind::Error("unexpected character: /".into())
            }
        }
    }

    fn scan_line_comment(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        TokenKind::LineComment(text)
    }

    /// Scans `/* ... */` or `/** ... */`.
    ///
    /// `/**/` is an empty plain comment, not a doc comment.
    fn scan_block_comment(&mut self) -> TokenKind {
        let is_doc = self.rest.starts_with("/**") && !self.rest.starts_with("/**/");
        let opener = if is_doc { 3 } else { 2 };
        self.advance_n(opener);

        let Some(close) = self.rest.find("*/") else {
            self.advance_n(self.rest.chars().count());
            return TokenKind::Error("unterminated comment".into());
        };
        let text = self.rest[..close].to_string();
        self.advance_n(text.chars().count() + 2);

        if is_doc {
            TokenKind::DocComment(text)
        } else {
            TokenKind::BlockComment(text)
        }
    }

    /// Scans a string literal delimited by `quote`.
    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.advance(); // consume opening quote
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some(c @ ('\\' | '\'' | '"')) => text.push(c),
                        Some(c) => {
                            return TokenKind::Error(format!("invalid escape sequence: \\{c}"));
                        }
                        None => {
                            return TokenKind::Error(
                                "unexpected end of input in string escape".into(),
                            );
                        }
                    }
                    self.advance();
                }
                Some('\n') | None => {
                    return TokenKind::Error("unterminated string literal".into());
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
        TokenKind::String(text)
    }

    /// Scans a number (integer or decimal).
    fn scan_number(&mut self) -> TokenKind {
        let start = self.position;
        let mut has_dot = false;

        if self.peek_char() == Some('-') {
            self.advance();
        }

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.'
                && !has_dot
                && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
            {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.position];
        match text.parse::<f64>() {
            Ok(n) => TokenKind::Number(n),
            Err(e) => TokenKind::Error(format!("invalid number: {e}")),
        }
    }

    /// Scans an identifier or keyword.
    fn scan_ident(&mut self) -> TokenKind {
        let start = self.position;
        while self.peek_char().is_some_and(is_ident_char) {
            self.advance();
        }
        let name = &self.source[start..self.position];

        match name {
            "var" | "let" | "const" => TokenKind::Var,
            "function" => TokenKind::Function,
            _ => TokenKind::Ident(name.to_string()),
        }
    }
}

/// Returns true if `c` can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Returns true if `c` can appear in an identifier (not at start).
fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
