//! Lexer and parsers for externs declaration sources.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of externs source text
//! - [`Parser`] - Stub statements paired with their doc comments
//! - [`DocComment`] - Tag extraction from `/** ... */` blocks
//! - [`parse_type`] / [`parse_param_type`] - The braced type expression grammar

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod doc;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;
pub mod type_parser;

pub use ast::{
    Expr, FileHeader, Literal, ModuleInclude, ObjectEntry, SourceFile, Statement, StatementKind,
};
pub use doc::{DocComment, DocTag, Tag};
pub use lexer::Lexer;
pub use parser::{Parser, parse};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use type_parser::{ParamType, check_variadic_last, parse_param_type, parse_type};
