//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: TypeExpr, QualifiedName, and Error.

mod errors;
mod types;
