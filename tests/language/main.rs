//! Integration tests for Layer 1: Language
//!
//! Tests for the lexer, statement parser, doc comments, and type grammar.

mod doc;
mod types;
