//! Doc-comment parsing.
//!
//! A doc comment is the `/** ... */` block that precedes a stub statement.
//! Its free text becomes the description and every `@` that starts a word
//! opens a tag. Tags that carry a type take it in braces, as in
//! `@param {string=} host`; `@extends` and `@implements` also accept a bare
//! name.

use std::fmt;

use ambient_foundation::{Error, Result};
use tracing::trace;

use crate::span::Span;
use crate::type_parser::{ParamType, parse_param_type, parse_type};

/// A recognized doc-comment tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `@constructor`
    Constructor,
    /// `@interface`
    Interface,
    /// `@record`, a structural interface
    Record,
    /// `@extends`
    Extends,
    /// `@implements`
    Implements,
    /// `@param`
    Param,
    /// `@return` or `@returns`
    Return,
    /// `@type`
    Type,
    /// `@typedef`
    Typedef,
    /// `@const` or `@final`
    Const,
    /// `@enum`
    Enum,
    /// `@template`
    Template,
    /// `@this`
    This,
    /// `@deprecated`
    Deprecated,
    /// `@see`
    See,
    /// `@nosideeffects`
    NoSideEffects,
    /// `@fileoverview`
    FileOverview,
    /// `@externs`
    Externs,
    /// Any tag this parser does not know.
    Unknown(String),
}

impl Tag {
    /// Looks up a tag by its name without the `@`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "constructor" => Self::Constructor,
            "interface" => Self::Interface,
            "record" => Self::Record,
            "extends" => Self::Extends,
            "implements" => Self::Implements,
            "param" => Self::Param,
            "return" | "returns" => Self::Return,
            "type" => Self::Type,
            "typedef" => Self::Typedef,
            "const" | "final" => Self::Const,
            "enum" => Self::Enum,
            "template" => Self::Template,
            "this" => Self::This,
            "deprecated" => Self::Deprecated,
            "see" => Self::See,
            "nosideeffects" => Self::NoSideEffects,
            "fileoverview" => Self::FileOverview,
            "externs" => Self::Externs,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Returns true if the tag may be followed by a `{type}`.
    #[must_use]
    pub const fn takes_type(&self) -> bool {
        matches!(
            self,
            Self::Extends
                | Self::Implements
                | Self::Param
                | Self::Return
                | Self::Type
                | Self::Typedef
                | Self::Const
                | Self::Enum
                | Self::This
        )
    }

    /// Returns true if the type may be written without braces.
    const fn allows_bare_type(&self) -> bool {
        matches!(self, Self::Extends | Self::Implements)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Constructor => "constructor",
            Self::Interface => "interface",
            Self::Record => "record",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::Param => "param",
            Self::Return => "return",
            Self::Type => "type",
            Self::Typedef => "typedef",
            Self::Const => "const",
            Self::Enum => "enum",
            Self::Template => "template",
            Self::This => "this",
            Self::Deprecated => "deprecated",
            Self::See => "see",
            Self::NoSideEffects => "nosideeffects",
            Self::FileOverview => "fileoverview",
            Self::Externs => "externs",
            Self::Unknown(name) => name,
        };
        write!(f, "@{name}")
    }
}

/// One tag of a doc comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocTag {
    /// Which tag this is.
    pub tag: Tag,
    /// The braced (or bare, for `@extends`) type, if one was written.
    pub ty: Option<ParamType>,
    /// The parameter name of an `@param` tag.
    pub name: Option<String>,
    /// Remaining free text after the type and name.
    pub text: String,
    /// Where the tag starts.
    pub span: Span,
}

/// A parsed doc comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocComment {
    /// Free text before the first tag.
    pub description: String,
    /// Tags in source order.
    pub tags: Vec<DocTag>,
    /// The whole comment.
    pub span: Span,
}

impl DocComment {
    /// Parses the body of a `/** ... */` comment.
    ///
    /// `body` is the text between the delimiters and `span` covers the
    /// whole comment including them.
    ///
    /// # Errors
    /// Returns `MalformedDeclaration` if a type does not parse, a brace is
    /// unbalanced, or `=`/`...` appears on a tag other than `@param`.
    pub fn parse(body: &str, span: Span) -> Result<Self> {
        let mut doc = Self {
            span,
            ..Self::default()
        };
        let mut description = Vec::new();
        let mut chunk: Option<Chunk> = None;
        let mut depth = 0usize;

        for (index, raw) in body.split('\n').enumerate() {
            let (offset, content) = strip_leader(raw);
            let line = span.line + u32::try_from(index).unwrap_or(u32::MAX);
            // The body starts three columns after the opening `/**`.
            let first_column = if index == 0 { span.column + 3 } else { 1 };

            for (start, piece) in split_tags(content, &mut depth) {
                if piece.starts_with('@') {
                    if let Some(done) = chunk.take() {
                        doc.tags.push(done.finish()?);
                    }
                    let column = first_column + column_of(raw, offset + start);
                    chunk = Some(Chunk {
                        text: piece.to_string(),
                        span: Span::point(span.start, line, column),
                    });
                } else if let Some(open) = chunk.as_mut() {
                    open.text.push('\n');
                    open.text.push_str(piece);
                } else if !piece.is_empty() {
                    description.push(piece);
                }
            }
        }
        if let Some(done) = chunk.take() {
            doc.tags.push(done.finish()?);
        }

        doc.description = description.join("\n");
        Ok(doc)
    }

    /// Returns true if the comment has the given tag.
    #[must_use]
    pub fn has(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|t| &t.tag == tag)
    }

    /// Returns the first occurrence of a tag.
    #[must_use]
    pub fn find(&self, tag: &Tag) -> Option<&DocTag> {
        self.tags.iter().find(|t| &t.tag == tag)
    }

    /// Returns every occurrence of a tag.
    pub fn all<'a>(&'a self, tag: &'a Tag) -> impl Iterator<Item = &'a DocTag> + 'a {
        self.tags.iter().filter(move |t| &t.tag == tag)
    }

    /// Returns the `@param` tags in order.
    pub fn params(&self) -> impl Iterator<Item = &DocTag> {
        self.tags.iter().filter(|t| t.tag == Tag::Param)
    }

    /// Returns the tags this parser does not recognize.
    pub fn unknown_tags(&self) -> impl Iterator<Item = &DocTag> {
        self.tags
            .iter()
            .filter(|t| matches!(t.tag, Tag::Unknown(_)))
    }

    /// Returns true if this comment describes the file rather than a statement.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.has(&Tag::FileOverview) || self.has(&Tag::Externs)
    }

    /// Returns the names listed by `@template` tags.
    #[must_use]
    pub fn template_names(&self) -> Vec<String> {
        self.all(&Tag::Template)
            .flat_map(|t| t.text.split(',').map(str::trim).map(str::to_string))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Raw text of one tag, gathered across continuation lines.
struct Chunk {
    text: String,
    span: Span,
}

impl Chunk {
    fn finish(self) -> Result<DocTag> {
        let span = self.span;
        let with_span = |e: Error| e.with_context(span.context());

        let text = self.text.trim_end();
        let after_at = &text[1..];
        let name_end = after_at
            .find(|c: char| c.is_whitespace() || c == '{')
            .unwrap_or(after_at.len());
        let tag = Tag::from_name(&after_at[..name_end]);
        let mut rest = after_at[name_end..].trim_start();

        if let Tag::Unknown(name) = &tag {
            trace!(tag = %name, line = span.line, "unrecognized doc tag");
        }

        let mut ty = None;
        if tag.takes_type() {
            if rest.starts_with('{') {
                let close = matching_brace(rest).ok_or_else(|| {
                    with_span(Error::malformed(format!("unbalanced braces in {tag} type")))
                })?;
                let type_text = &rest[1..close];
                ty = Some(parse_tag_type(&tag, type_text).map_err(with_span)?);
                rest = rest[close + 1..].trim_start();
            } else if tag.allows_bare_type() && !rest.is_empty() {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                ty = Some(parse_tag_type(&tag, &rest[..end]).map_err(with_span)?);
                rest = rest[end..].trim_start();
            }
        }

        let mut name = None;
        if tag == Tag::Param && !rest.is_empty() {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            name = Some(rest[..end].to_string());
            rest = rest[end..].trim_start();
        }

        Ok(DocTag {
            tag,
            ty,
            name,
            text: rest.to_string(),
            span,
        })
    }
}

fn parse_tag_type(tag: &Tag, text: &str) -> Result<ParamType> {
    if *tag == Tag::Param {
        parse_param_type(text)
    } else {
        parse_type(text).map(|expr| ParamType {
            expr,
            optional: false,
            variadic: false,
        })
    }
}

/// Splits a comment line where a new tag starts.
///
/// A tag starts at an `@` followed by a letter, at the start of the line or
/// after whitespace, outside any braces. `depth` carries brace nesting across
/// lines. Returns each piece with its byte offset in `line`.
fn split_tags<'a>(line: &'a str, depth: &mut usize) -> Vec<(usize, &'a str)> {
    let mut starts = vec![0];
    let mut previous = ' ';
    let bytes = line.as_bytes();
    for (i, c) in line.char_indices() {
        match c {
            '{' => *depth += 1,
            '}' => *depth = depth.saturating_sub(1),
            '@' if i > 0
                && *depth == 0
                && previous.is_whitespace()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic) =>
            {
                starts.push(i);
            }
            _ => {}
        }
        previous = c;
    }

    let mut pieces = Vec::with_capacity(starts.len());
    for (n, &start) in starts.iter().enumerate() {
        let end = starts.get(n + 1).copied().unwrap_or(line.len());
        pieces.push((start, line[start..end].trim_end()));
    }
    pieces
}

/// Returns the byte index of the brace closing the one at index 0.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Strips the leading whitespace and `*` decoration of a comment line.
///
/// Returns the byte offset where the content starts and the content.
fn strip_leader(raw: &str) -> (usize, &str) {
    let trimmed = raw.trim_start();
    let mut offset = raw.len() - trimmed.len();
    let content = match trimmed.strip_prefix('*') {
        Some(after) => {
            offset += 1;
            let inner = after.trim_start();
            offset += after.len() - inner.len();
            inner
        }
        None => trimmed,
    };
    (offset, content.trim_end())
}

fn column_of(raw: &str, offset: usize) -> u32 {
    u32::try_from(raw[..offset].chars().count()).unwrap_or(u32::MAX)
}
