//! Statement parser for externs sources.
//!
//! The parser turns the token stream into a [`SourceFile`]: stub statements
//! paired with the doc comment right before them, plus file-level metadata
//! and `BEGIN_NODE_INCLUDE` module bindings found in comments.

use ambient_foundation::{Error, ErrorKind, QualifiedName, Result};
use tracing::trace;

use crate::ast::{
    Expr, FileHeader, Literal, ModuleInclude, ObjectEntry, SourceFile, Statement, StatementKind,
};
use crate::doc::DocComment;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

const INCLUDE_BEGIN: &str = "BEGIN_NODE_INCLUDE";
const INCLUDE_END: &str = "END_NODE_INCLUDE";

/// Parser for externs source code.
pub struct Parser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Source text (for error messages).
    source: &'src str,
    /// Byte offset just past the last consumed token.
    last_end: usize,
}

impl<'src> Parser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            source,
            last_end: 0,
        }
    }

    /// Parses the whole source.
    ///
    /// # Errors
    /// Returns `ParseError` for lexical errors and `MalformedDeclaration`
    /// for statements outside the stub forms, or for a doc comment that
    /// does not parse.
    pub fn parse_source(&mut self) -> Result<SourceFile> {
        let mut file = SourceFile::default();
        let mut pending: Option<DocComment> = None;

        loop {
            match &self.current.kind {
                TokenKind::Eof => break,
                TokenKind::LineComment(_) | TokenKind::Semicolon => self.advance(),
                TokenKind::BlockComment(text) => {
                    let text = text.clone();
                    file.includes.extend(self.scan_includes(&text)?);
                    self.advance();
                }
                TokenKind::DocComment(text) => {
                    let text = text.clone();
                    if text.contains(INCLUDE_BEGIN) {
                        file.includes.extend(self.scan_includes(&text)?);
                    } else {
                        let doc = DocComment::parse(&text, self.current.span)?;
                        if let Some(previous) = pending.take() {
                            Self::set_aside(&mut file, previous);
                        }
                        pending = Some(doc);
                    }
                    self.advance();
                }
                TokenKind::Error(msg) => {
                    let msg = msg.clone();
                    return Err(self.syntax_error(&msg));
                }
                _ => {
                    let doc = match pending.take() {
                        Some(doc) if doc.is_header() => {
                            Self::set_aside(&mut file, doc);
                            None
                        }
                        other => other,
                    };
                    let statement = self.parse_statement(doc)?;
                    trace!(target_name = %statement.target(), line = statement.span.line, "parsed statement");
                    file.statements.push(statement);
                }
            }
        }

        if let Some(doc) = pending {
            Self::set_aside(&mut file, doc);
        }
        Ok(file)
    }

    /// Records a doc comment that is not attached to a statement.
    fn set_aside(file: &mut SourceFile, doc: DocComment) {
        if doc.is_header() && file.header.is_none() {
            file.header = Some(FileHeader::from_doc(&doc));
        } else {
            trace!(line = doc.span.line, "dangling doc comment");
        }
    }

    /// Parses one stub statement.
    fn parse_statement(&mut self, doc: Option<DocComment>) -> Result<Statement> {
        let start = self.current.span;

        let kind = match &self.current.kind {
            TokenKind::Var => {
                self.bump();
                let name = self.expect_ident()?;
                let value = if self.eat(&TokenKind::Eq) {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                self.expect_end()?;
                StatementKind::Var { name, value }
            }
            TokenKind::Function => {
                self.bump();
                let name = self.expect_ident()?;
                let params = self.parse_function_rest()?;
                self.eat(&TokenKind::Semicolon);
                StatementKind::Function { name, params }
            }
            TokenKind::Ident(_) => {
                let target = self.parse_path()?;
                if self.eat(&TokenKind::Eq) {
                    let value = self.parse_expr()?;
                    self.expect_end()?;
                    StatementKind::Assign { target, value }
                } else {
                    self.expect_end()?;
                    StatementKind::Declare { target }
                }
            }
            other => {
                return Err(self.malformed(&format!(
                    "expected a declaration statement, found {}",
                    other.name()
                )));
            }
        };

        Ok(Statement {
            doc,
            kind,
            span: start.to(self.previous_end(start)),
        })
    }

    /// Parses the right-hand side of an assignment.
    fn parse_expr(&mut self) -> Result<Expr> {
        match &self.current.kind {
            TokenKind::Function => {
                self.bump();
                // A named function expression keeps only its parameters.
                if matches!(self.current.kind, TokenKind::Ident(_)) {
                    self.bump();
                }
                let params = self.parse_function_rest()?;
                Ok(Expr::Function { params })
            }
            TokenKind::LBrace => self.parse_object(),
            TokenKind::Ident(_) => Ok(Expr::Path(self.parse_path()?)),
            TokenKind::String(s) => {
                let s = s.clone();
                self.bump();
                Ok(Expr::Literal(Literal::String(s)))
            }
            TokenKind::Number(n) => {
                let n = *n;
                self.bump();
                Ok(Expr::Literal(Literal::Number(n)))
            }
            _ => Err(self.unexpected("a function, object, path or literal")),
        }
    }

    /// Parses `(a, b) {}` after the `function` keyword and optional name.
    fn parse_function_rest(&mut self) -> Result<Vec<String>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.eat(&TokenKind::RParen) {
            loop {
                params.push(self.expect_ident()?);
                if self.eat(&TokenKind::RParen) {
                    break;
                }
                self.expect(&TokenKind::Comma)?;
            }
        }
        self.expect(&TokenKind::LBrace)?;
        if !self.eat(&TokenKind::RBrace) {
            return Err(self.malformed("stub function bodies must be empty"));
        }
        Ok(params)
    }

    /// Parses an object literal.
    fn parse_object(&mut self) -> Result<Expr> {
        self.expect(&TokenKind::LBrace)?;
        let mut entries = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            let key = match &self.current.kind {
                TokenKind::Ident(k) | TokenKind::String(k) => k.clone(),
                _ => return Err(self.unexpected("a property key")),
            };
            self.bump();
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_expr()?;
            entries.push(ObjectEntry { key, value });

            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace)?;
                break;
            }
        }
        Ok(Expr::Object(entries))
    }

    /// Parses `a.b.c`.
    fn parse_path(&mut self) -> Result<QualifiedName> {
        let mut segments = vec![self.expect_ident()?];
        while self.eat(&TokenKind::Dot) {
            segments.push(self.expect_ident()?);
        }
        Ok(QualifiedName::new(segments))
    }

    /// Scans a comment body for `var x = require('m');` lines between the
    /// include markers.
    fn scan_includes(&self, text: &str) -> Result<Vec<ModuleInclude>> {
        let Some(begin) = text.find(INCLUDE_BEGIN) else {
            return Ok(Vec::new());
        };
        let inner = &text[begin + INCLUDE_BEGIN.len()..];
        let inner = inner.find(INCLUDE_END).map_or(inner, |end| &inner[..end]);

        let span = self.current.span;
        let tokens: Vec<TokenKind> = Lexer::tokenize_all(inner)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect();

        let mut includes = Vec::new();
        let mut rest = tokens.as_slice();
        loop {
            match rest {
                [TokenKind::Eof] | [] => break,
                [
                    TokenKind::Var,
                    TokenKind::Ident(binding),
                    TokenKind::Eq,
                    TokenKind::Ident(require),
                    TokenKind::LParen,
                    TokenKind::String(module),
                    TokenKind::RParen,
                    tail @ ..,
                ] if require == "require" => {
                    includes.push(ModuleInclude {
                        binding: binding.clone(),
                        module: module.clone(),
                        span,
                    });
                    rest = match tail {
                        [TokenKind::Semicolon, after @ ..] => after,
                        _ => tail,
                    };
                }
                _ => {
                    return Err(Error::malformed("unrecognized line in module include block")
                        .with_context(span.context()));
                }
            }
        }
        Ok(includes)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.last_end = self.current.span.end;
        self.current = self.lexer.next_token();
    }

    /// Advances within a statement, where plain comments are ignored.
    fn bump(&mut self) {
        self.advance();
        while matches!(
            self.current.kind,
            TokenKind::LineComment(_) | TokenKind::BlockComment(_)
        ) {
            self.current = self.lexer.next_token();
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Expects the current token to be of a specific kind, then advances.
    fn expect(&mut self, expected: &TokenKind) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(expected.name()))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        if let TokenKind::Ident(name) = &self.current.kind {
            let name = name.clone();
            self.bump();
            Ok(name)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// Expects a statement terminator. A missing `;` is accepted before a
    /// comment or end of input.
    fn expect_end(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::DocComment(_) => Ok(()),
            _ => Err(self.unexpected("';'")),
        }
    }

    fn previous_end(&self, start: Span) -> Span {
        Span::point(self.last_end.max(start.end), start.line, start.column)
    }

    fn unexpected(&self, expected: &str) -> Error {
        if let TokenKind::Error(msg) = &self.current.kind {
            return self.syntax_error(msg);
        }
        self.malformed(&format!(
            "expected {expected}, found {}",
            self.current.kind.name()
        ))
    }

    /// Creates a malformed-declaration error at the current position.
    fn malformed(&self, message: &str) -> Error {
        let span = self.current.span;
        Error::malformed(format!("{message}: `{}`", self.line_text(span)))
            .with_context(span.context())
    }

    /// Creates a parse error at the current position.
    fn syntax_error(&self, message: &str) -> Error {
        let span = self.current.span;
        Error::new(ErrorKind::ParseError {
            message: message.to_string(),
            line: span.line,
            column: span.column,
        })
        .with_context(span.context())
    }

    /// Gets the source line containing a span, for error messages.
    fn line_text(&self, span: Span) -> &str {
        let line_start = self.source[..span.start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = self.source[span.start..]
            .find('\n')
            .map_or(self.source.len(), |i| span.start + i);
        self.source[line_start..line_end].trim()
    }
}

/// Parses an externs source.
///
/// # Errors
/// Returns an error if the source is not a sequence of stub statements.
pub fn parse(source: &str) -> Result<SourceFile> {
    Parser::new(source).parse_source()
}
